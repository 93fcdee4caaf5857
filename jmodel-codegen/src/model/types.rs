//! The Java type system.
//!
//! Types are plain values. Class-like types point into the
//! [`CodeModel`](super::CodeModel) arena through [`ClassId`] handles, so
//! questions about names, packages and nesting go through the model.

use jmodel_core::{Error, Result};

use super::ClassId;

/// A primitive type, including `void`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl Primitive {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Char => "char",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Void => "void",
        }
    }

    /// Simple name of the `java.lang` wrapper class.
    pub fn boxed_name(&self) -> &'static str {
        match self {
            Self::Boolean => "Boolean",
            Self::Byte => "Byte",
            Self::Char => "Character",
            Self::Short => "Short",
            Self::Int => "Integer",
            Self::Long => "Long",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::Void => "Void",
        }
    }

    /// Parse a primitive keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "boolean" => Self::Boolean,
            "byte" => Self::Byte,
            "char" => Self::Char,
            "short" => Self::Short,
            "int" => Self::Int,
            "long" => Self::Long,
            "float" => Self::Float,
            "double" => Self::Double,
            "void" => Self::Void,
            _ => return None,
        })
    }
}

/// A type variable, either declared on a class or method or referenced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeVar {
    pub name: String,
    /// Upper bound (`T extends Bound`).
    pub bound: Option<Box<Type>>,
}

impl TypeVar {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bound: None,
        }
    }

    pub fn bounded(name: impl Into<String>, bound: Type) -> Self {
        Self {
            name: name.into(),
            bound: Some(Box::new(bound)),
        }
    }
}

/// A wildcard type argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Wildcard {
    /// `?`
    Unbounded,
    /// `? extends T`
    Extends(Box<Type>),
    /// `? super T`
    Super(Box<Type>),
}

/// A Java type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Primitive(Primitive),
    /// A class, interface, enum or annotation type used raw.
    Reference(ClassId),
    /// An array. Prefer [`Type::array`]; a narrowed component built here
    /// directly is printed erased.
    Array(Box<Type>),
    /// A generic instantiation such as `List<String>`.
    Narrowed { basis: ClassId, args: Vec<Type> },
    Var(TypeVar),
    Wildcard(Wildcard),
    /// An anonymous class; rendered and collected as its base type.
    Anonymous(ClassId),
}

impl Type {
    /// Create an array type.
    ///
    /// Arrays of generic instantiations are illegal in Java, so a narrowed
    /// component is rejected. Use [`Type::erased_array`] to erase first.
    pub fn array(component: Type) -> Result<Type> {
        match &component {
            Type::Narrowed { .. } => Err(Error::construction(
                "array component must be erased; arrays of generic instantiations are illegal",
            )),
            Type::Wildcard(_) => Err(Error::construction(
                "a wildcard cannot be an array component",
            )),
            Type::Anonymous(_) => Err(Error::construction(
                "an anonymous class cannot be an array component",
            )),
            Type::Primitive(Primitive::Void) => {
                Err(Error::construction("void cannot be an array component"))
            }
            _ => Ok(Type::Array(Box::new(component))),
        }
    }

    /// Create an array of the raw form of `component`.
    pub fn erased_array(component: Type) -> Result<Type> {
        Self::array(component.raw())
    }

    /// Instantiate a generic type with type arguments.
    ///
    /// Narrowing an already narrowed type appends to its arguments.
    pub fn narrow(self, args: impl IntoIterator<Item = Type>) -> Result<Type> {
        let new_args: Vec<Type> = args.into_iter().collect();
        if let Some(arg) = new_args.iter().find(|a| a.is_primitive()) {
            return Err(Error::construction(format!(
                "type argument cannot be primitive: {arg:?}"
            )));
        }
        match self {
            Type::Reference(basis) => Ok(Type::Narrowed {
                basis,
                args: new_args,
            }),
            Type::Narrowed { basis, mut args } => {
                args.extend(new_args);
                Ok(Type::Narrowed { basis, args })
            }
            other => Err(Error::construction(format!(
                "only class types can be narrowed, not {other:?}"
            ))),
        }
    }

    /// A type variable reference.
    pub fn var(name: impl Into<String>) -> Type {
        Type::Var(TypeVar::new(name))
    }

    /// `?`
    pub fn wildcard() -> Type {
        Type::Wildcard(Wildcard::Unbounded)
    }

    /// `? extends bound`
    pub fn wildcard_extends(bound: Type) -> Type {
        Type::Wildcard(Wildcard::Extends(Box::new(bound)))
    }

    /// `? super bound`
    pub fn wildcard_super(bound: Type) -> Type {
        Type::Wildcard(Wildcard::Super(Box::new(bound)))
    }

    /// Drop type arguments from a narrowed type; every other type is unchanged.
    pub fn raw(&self) -> Type {
        match self {
            Type::Narrowed { basis, .. } => Type::Reference(*basis),
            other => other.clone(),
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Primitive(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array(_))
    }

    /// Class-like types: references, narrowed and anonymous types.
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            Type::Reference(_) | Type::Narrowed { .. } | Type::Anonymous(_)
        )
    }

    /// The class handle behind a reference or narrowed type.
    pub fn class_id(&self) -> Option<ClassId> {
        match self {
            Type::Reference(id) | Type::Narrowed { basis: id, .. } => Some(*id),
            _ => None,
        }
    }

    /// The component of an array type.
    pub fn element_type(&self) -> Option<&Type> {
        match self {
            Type::Array(component) => Some(component),
            _ => None,
        }
    }

    /// Strip every array dimension, returning the innermost type and the
    /// number of dimensions removed.
    pub fn innermost(&self) -> (&Type, usize) {
        let mut ty = self;
        let mut dims = 0;
        while let Type::Array(component) = ty {
            ty = component;
            dims += 1;
        }
        (ty, dims)
    }
}

impl From<Primitive> for Type {
    fn from(primitive: Primitive) -> Self {
        Type::Primitive(primitive)
    }
}

impl From<ClassId> for Type {
    fn from(id: ClassId) -> Self {
        Type::Reference(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(n: u32) -> ClassId {
        ClassId::from_raw(n)
    }

    #[test]
    fn test_array_rejects_narrowed_component() {
        let narrowed = Type::from(class(1)).narrow([Type::from(class(2))]).unwrap();
        let err = Type::array(narrowed).unwrap_err();
        assert!(matches!(err, Error::Construction(_)));
    }

    #[test]
    fn test_erased_array_uses_raw_component() {
        let narrowed = Type::from(class(1)).narrow([Type::from(class(2))]).unwrap();
        let array = Type::erased_array(narrowed).unwrap();
        assert_eq!(array, Type::Array(Box::new(Type::Reference(class(1)))));
    }

    #[test]
    fn test_array_rejects_void_and_wildcards() {
        assert!(Type::array(Primitive::Void.into()).is_err());
        assert!(Type::array(Type::wildcard()).is_err());
        assert!(Type::array(Primitive::Int.into()).is_ok());
        assert!(Type::array(Type::var("T")).is_ok());
    }

    #[test]
    fn test_narrow_appends_arguments() {
        let once = Type::from(class(1)).narrow([Type::from(class(2))]).unwrap();
        let twice = once.narrow([Type::from(class(3))]).unwrap();
        assert_eq!(
            twice,
            Type::Narrowed {
                basis: class(1),
                args: vec![Type::Reference(class(2)), Type::Reference(class(3))],
            }
        );
    }

    #[test]
    fn test_narrow_rejects_primitive_arguments() {
        let result = Type::from(class(1)).narrow([Type::from(Primitive::Int)]);
        assert!(matches!(result, Err(Error::Construction(_))));
        assert!(Type::from(Primitive::Int).narrow([]).is_err());
    }

    #[test]
    fn test_innermost() {
        let int2d = Type::array(Type::array(Primitive::Int.into()).unwrap()).unwrap();
        let (inner, dims) = int2d.innermost();
        assert_eq!(inner, &Type::Primitive(Primitive::Int));
        assert_eq!(dims, 2);
    }

    #[test]
    fn test_primitive_keywords() {
        assert_eq!(Primitive::from_keyword("int"), Some(Primitive::Int));
        assert_eq!(Primitive::from_keyword("Integer"), None);
        assert_eq!(Primitive::Char.boxed_name(), "Character");
    }
}
