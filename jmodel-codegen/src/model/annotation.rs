//! Annotation uses and member values.

use indexmap::IndexMap;

use super::{ClassId, Type};

/// A value assigned to an annotation member.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    String(String),
    /// A class literal (`Foo.class`).
    Class(Type),
    /// An enum constant (`ElementType.FIELD`).
    Enum { ty: ClassId, constant: String },
    Annotation(AnnotationUse),
    Array(Vec<AnnotationValue>),
}

impl AnnotationValue {
    /// Short description of the value's kind, used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Int(_) => "int",
            Self::Long(_) => "long",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::Char(_) => "char",
            Self::String(_) => "String",
            Self::Class(_) => "class literal",
            Self::Enum { .. } => "enum constant",
            Self::Annotation(_) => "annotation",
            Self::Array(_) => "array",
        }
    }

    pub fn enum_constant(ty: ClassId, constant: impl Into<String>) -> Self {
        Self::Enum {
            ty,
            constant: constant.into(),
        }
    }
}

impl From<bool> for AnnotationValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for AnnotationValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<i64> for AnnotationValue {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<f64> for AnnotationValue {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<char> for AnnotationValue {
    fn from(v: char) -> Self {
        Self::Char(v)
    }
}

impl From<&str> for AnnotationValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for AnnotationValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Type> for AnnotationValue {
    fn from(v: Type) -> Self {
        Self::Class(v)
    }
}

impl From<AnnotationUse> for AnnotationValue {
    fn from(v: AnnotationUse) -> Self {
        Self::Annotation(v)
    }
}

/// An annotation applied to a declaration, with its member values in
/// insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationUse {
    annotation: ClassId,
    members: IndexMap<String, AnnotationValue>,
}

impl AnnotationUse {
    pub fn new(annotation: ClassId) -> Self {
        Self {
            annotation,
            members: IndexMap::new(),
        }
    }

    /// The annotation type.
    pub fn annotation(&self) -> ClassId {
        self.annotation
    }

    /// Set a member value, replacing any previous one.
    pub fn param(&mut self, name: impl Into<String>, value: impl Into<AnnotationValue>) -> &mut Self {
        self.members.insert(name.into(), value.into());
        self
    }

    /// The array value of a member, created empty if missing or not an array.
    pub fn param_array(&mut self, name: impl Into<String>) -> &mut Vec<AnnotationValue> {
        let entry = self
            .members
            .entry(name.into())
            .or_insert_with(|| AnnotationValue::Array(Vec::new()));
        if !matches!(entry, AnnotationValue::Array(_)) {
            *entry = AnnotationValue::Array(Vec::new());
        }
        let AnnotationValue::Array(items) = entry else {
            unreachable!("member was just set to an array")
        };
        items
    }

    /// Set a member to a fresh nested annotation and return it.
    pub fn nested(&mut self, name: impl Into<String>, annotation: ClassId) -> &mut AnnotationUse {
        let entry = self.members.entry(name.into()).or_insert_with(|| {
            AnnotationValue::Annotation(AnnotationUse::new(annotation))
        });
        if !matches!(entry, AnnotationValue::Annotation(u) if u.annotation == annotation) {
            *entry = AnnotationValue::Annotation(AnnotationUse::new(annotation));
        }
        let AnnotationValue::Annotation(nested) = entry else {
            unreachable!("member was just set to an annotation")
        };
        nested
    }

    pub fn get(&self, name: &str) -> Option<&AnnotationValue> {
        self.members.get(name)
    }

    pub fn members(&self) -> impl Iterator<Item = (&str, &AnnotationValue)> {
        self.members.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether the use can be written in the single-element form `@A(v)`.
    pub fn is_single_value(&self) -> bool {
        self.members.len() == 1 && self.members.contains_key("value")
    }
}
