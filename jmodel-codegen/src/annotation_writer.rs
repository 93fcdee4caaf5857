//! Validating writer for annotation members.
//!
//! An [`AnnotationShape`] describes the members an annotation type declares:
//! their names, kinds and defaults. An [`AnnotationWriter`] sets members of
//! an [`AnnotationUse`] by name and checks every value against that shape:
//!
//! - a value equal to the declared default is not written;
//! - a value of the wrong kind fails with `TypeMismatch`;
//! - an undeclared member fails with `UnknownMember`;
//! - array members hand out an [`ArrayWriter`], annotation members a nested
//!   [`AnnotationWriter`] of the same shape.
//!
//! ```
//! use jmodel_codegen::{AnnotationShape, AnnotationUse, AnnotationWriter, CodeModel, MemberKind};
//!
//! let mut model = CodeModel::new();
//! let column = model.reference("javax.persistence.Column").unwrap();
//! let shape = AnnotationShape::new(&model, column)
//!     .member_with_default("name", MemberKind::String, "")
//!     .member_with_default("nullable", MemberKind::Bool, true);
//!
//! let mut annotation = AnnotationUse::new(column);
//! let mut writer = AnnotationWriter::new(&shape, &mut annotation).unwrap();
//! writer.set("name", "user_id").unwrap();
//! writer.set("nullable", true).unwrap();
//! assert!(writer.set("nullable", 1).is_err());
//!
//! assert_eq!(annotation.members().count(), 1);
//! ```

use indexmap::IndexMap;
use jmodel_core::{ClassKind, Error, Result};

use crate::model::{AnnotationUse, AnnotationValue, ClassId, CodeModel, Primitive, Type};

/// The declared type of an annotation member.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberKind {
    Bool,
    Int,
    Long,
    Float,
    Double,
    Char,
    String,
    /// `Class<?>`
    Class,
    /// A constant of the given enum.
    Enum(ClassId),
    Annotation(Box<AnnotationShape>),
    Array(Box<MemberKind>),
}

impl MemberKind {
    pub fn describe(&self) -> String {
        match self {
            Self::Bool => "boolean".into(),
            Self::Int => "int".into(),
            Self::Long => "long".into(),
            Self::Float => "float".into(),
            Self::Double => "double".into(),
            Self::Char => "char".into(),
            Self::String => "String".into(),
            Self::Class => "class literal".into(),
            Self::Enum(_) => "enum constant".into(),
            Self::Annotation(shape) => format!("@{}", shape.name),
            Self::Array(element) => format!("{}[]", element.describe()),
        }
    }

    /// Whether `value` can be assigned to a member of this kind.
    ///
    /// Numeric members accept narrower numeric values, and array members
    /// accept a single element.
    pub fn accepts(&self, value: &AnnotationValue) -> bool {
        use AnnotationValue as V;
        match (self, value) {
            (Self::Bool, V::Bool(_))
            | (Self::Int, V::Int(_))
            | (Self::Long, V::Long(_) | V::Int(_))
            | (Self::Float, V::Float(_) | V::Int(_) | V::Long(_))
            | (Self::Double, V::Double(_) | V::Float(_) | V::Int(_) | V::Long(_))
            | (Self::Char, V::Char(_))
            | (Self::String, V::String(_))
            | (Self::Class, V::Class(_)) => true,
            (Self::Enum(id), V::Enum { ty, .. }) => id == ty,
            (Self::Annotation(shape), V::Annotation(use_)) => {
                shape.annotation == use_.annotation()
            }
            (Self::Array(element), V::Array(items)) => items.iter().all(|i| element.accepts(i)),
            (Self::Array(element), single) => element.accepts(single),
            _ => false,
        }
    }
}

/// One declared member of an annotation type.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberShape {
    pub name: String,
    pub kind: MemberKind,
    pub default: Option<AnnotationValue>,
}

/// The members an annotation type declares.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationShape {
    annotation: ClassId,
    name: String,
    members: IndexMap<String, MemberShape>,
}

impl AnnotationShape {
    /// An empty shape for `annotation`; add members with the builder methods.
    pub fn new(model: &CodeModel, annotation: ClassId) -> Self {
        Self {
            annotation,
            name: model.full_name(annotation),
            members: IndexMap::new(),
        }
    }

    /// Declare a member without a default.
    pub fn member(mut self, name: impl Into<String>, kind: MemberKind) -> Self {
        let name = name.into();
        self.members.insert(
            name.clone(),
            MemberShape {
                name,
                kind,
                default: None,
            },
        );
        self
    }

    /// Declare a member with a default value.
    pub fn member_with_default(
        mut self,
        name: impl Into<String>,
        kind: MemberKind,
        default: impl Into<AnnotationValue>,
    ) -> Self {
        let name = name.into();
        self.members.insert(
            name.clone(),
            MemberShape {
                name,
                kind,
                default: Some(default.into()),
            },
        );
        self
    }

    /// Derive the shape of an `@interface` defined in `model` from its
    /// methods.
    pub fn from_declaration(model: &CodeModel, annotation: ClassId) -> Result<Self> {
        Self::derive(model, annotation, &mut Vec::new())
    }

    fn derive(model: &CodeModel, annotation: ClassId, visiting: &mut Vec<ClassId>) -> Result<Self> {
        let class = model.class(annotation);
        if class.kind() != ClassKind::Annotation {
            return Err(Error::construction(format!(
                "{} is not an annotation type",
                model.full_name(annotation)
            )));
        }
        if visiting.contains(&annotation) {
            return Err(Error::illegal_state(format!(
                "annotation {} contains itself",
                model.full_name(annotation)
            )));
        }
        visiting.push(annotation);

        let mut shape = Self::new(model, annotation);
        for method in class.methods().iter().filter(|m| !m.is_constructor()) {
            let Some(ty) = method.return_type() else {
                continue;
            };
            let kind = member_kind(model, ty, visiting).map_err(|err| match err {
                Error::IllegalState(_) => err,
                _ => Error::construction(format!(
                    "member '{}' of {} has no annotation member type",
                    method.name(),
                    shape.name
                )),
            })?;
            shape.members.insert(
                method.name().to_string(),
                MemberShape {
                    name: method.name().to_string(),
                    kind,
                    default: method.default_value().cloned(),
                },
            );
        }

        visiting.pop();
        Ok(shape)
    }

    pub fn annotation(&self) -> ClassId {
        self.annotation
    }

    /// Fully qualified name of the annotation type.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, member: &str) -> Option<&MemberShape> {
        self.members.get(member)
    }

    pub fn members(&self) -> impl Iterator<Item = &MemberShape> {
        self.members.values()
    }

    fn lookup(&self, member: &str) -> Result<&MemberShape> {
        self.members.get(member).ok_or_else(|| Error::UnknownMember {
            annotation: self.name.clone(),
            member: member.to_string(),
        })
    }
}

fn member_kind(model: &CodeModel, ty: &Type, visiting: &mut Vec<ClassId>) -> Result<MemberKind> {
    let unsupported = || Error::construction("not an annotation member type");
    match ty {
        Type::Primitive(primitive) => match primitive {
            Primitive::Boolean => Ok(MemberKind::Bool),
            Primitive::Byte | Primitive::Short | Primitive::Int => Ok(MemberKind::Int),
            Primitive::Long => Ok(MemberKind::Long),
            Primitive::Float => Ok(MemberKind::Float),
            Primitive::Double => Ok(MemberKind::Double),
            Primitive::Char => Ok(MemberKind::Char),
            Primitive::Void => Err(unsupported()),
        },
        Type::Array(component) => Ok(MemberKind::Array(Box::new(member_kind(
            model, component, visiting,
        )?))),
        Type::Reference(id) | Type::Narrowed { basis: id, .. } => {
            match model.full_name(*id).as_str() {
                "java.lang.String" => return Ok(MemberKind::String),
                "java.lang.Class" => return Ok(MemberKind::Class),
                _ => {}
            }
            match model.class(*id).kind() {
                ClassKind::Enum => Ok(MemberKind::Enum(*id)),
                ClassKind::Annotation => Ok(MemberKind::Annotation(Box::new(
                    AnnotationShape::derive(model, *id, visiting)?,
                ))),
                _ => Err(unsupported()),
            }
        }
        _ => Err(unsupported()),
    }
}

/// Sets members of one annotation use, validated against its shape.
#[derive(Debug)]
pub struct AnnotationWriter<'a> {
    shape: &'a AnnotationShape,
    target: &'a mut AnnotationUse,
}

impl<'a> AnnotationWriter<'a> {
    /// Fails when `target` is a use of another annotation type.
    pub fn new(shape: &'a AnnotationShape, target: &'a mut AnnotationUse) -> Result<Self> {
        if target.annotation() != shape.annotation {
            return Err(Error::construction(format!(
                "cannot write a different annotation through the shape of {}",
                shape.name
            )));
        }
        Ok(Self { shape, target })
    }

    pub fn shape(&self) -> &AnnotationShape {
        self.shape
    }

    pub fn annotation_use(&self) -> &AnnotationUse {
        self.target
    }

    /// Set a member. A value equal to the declared default is skipped.
    pub fn set(&mut self, member: &str, value: impl Into<AnnotationValue>) -> Result<&mut Self> {
        let value = value.into();
        let shape = self.shape.lookup(member)?;
        if shape.default.as_ref() == Some(&value) {
            return Ok(self);
        }
        if !shape.kind.accepts(&value) {
            return Err(Error::type_mismatch(
                member,
                shape.kind.describe(),
                value.describe(),
            ));
        }
        self.target.param(member, value);
        Ok(self)
    }

    /// Writer for the elements of an array member.
    pub fn array(&mut self, member: &str) -> Result<ArrayWriter<'_>> {
        let shape = self.shape.lookup(member)?;
        let MemberKind::Array(element) = &shape.kind else {
            return Err(Error::type_mismatch(member, shape.kind.describe(), "array"));
        };
        Ok(ArrayWriter {
            member: &shape.name,
            element,
            items: self.target.param_array(member),
        })
    }

    /// Writer for an annotation-typed member.
    pub fn nested(&mut self, member: &str) -> Result<AnnotationWriter<'_>> {
        let shape = self.shape.lookup(member)?;
        let MemberKind::Annotation(nested) = &shape.kind else {
            return Err(Error::type_mismatch(
                member,
                shape.kind.describe(),
                "annotation",
            ));
        };
        Ok(AnnotationWriter {
            shape: nested,
            target: self.target.nested(member, nested.annotation),
        })
    }
}

/// Appends elements to an array member.
#[derive(Debug)]
pub struct ArrayWriter<'a> {
    member: &'a str,
    element: &'a MemberKind,
    items: &'a mut Vec<AnnotationValue>,
}

impl ArrayWriter<'_> {
    pub fn add(&mut self, value: impl Into<AnnotationValue>) -> Result<&mut Self> {
        let value = value.into();
        if !self.element.accepts(&value) || matches!(value, AnnotationValue::Array(_)) {
            return Err(Error::type_mismatch(
                self.member,
                self.element.describe(),
                value.describe(),
            ));
        }
        self.items.push(value);
        Ok(self)
    }

    /// Append an annotation element and return a writer for it.
    pub fn annotate(&mut self) -> Result<AnnotationWriter<'_>> {
        let MemberKind::Annotation(shape) = self.element else {
            return Err(Error::type_mismatch(
                self.member,
                self.element.describe(),
                "annotation",
            ));
        };
        self.items
            .push(AnnotationValue::Annotation(AnnotationUse::new(shape.annotation)));
        match self.items.last_mut() {
            Some(AnnotationValue::Annotation(target)) => Ok(AnnotationWriter { shape, target }),
            _ => Err(Error::illegal_state(format!(
                "lost the element just added to '{}'",
                self.member
            ))),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
