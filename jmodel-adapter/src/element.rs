//! Declaration records.
//!
//! These mirror what an annotation processor observes about compiled
//! declarations: packages, types, members and the type expressions they use.
//! They are plain data; [`ModelAdapter`](crate::ModelAdapter) turns them into
//! a [`CodeModel`](jmodel_codegen::CodeModel).
//!
//! In TOML a set looks like:
//!
//! ```toml
//! [render]
//! indent = 4
//!
//! [[package]]
//! name = "com.example"
//!
//! [[package.type]]
//! name = "User"
//! kind = "class"
//! modifiers = ["public"]
//!
//! [[package.type.field]]
//! name = "name"
//! modifiers = ["private"]
//! type = { kind = "declared", name = "java.lang.String" }
//! ```

use std::collections::BTreeMap;
use std::fmt;

use jmodel_codegen::RenderOptions;
use jmodel_core::{Indent, LineSeparator};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// Everything a declaration file describes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeclarationSet {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default, rename = "package")]
    pub packages: Vec<PackageElement>,
}

/// The `[render]` table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    #[serde(default, deserialize_with = "deserialize_indent")]
    pub indent: Indent,
    #[serde(default)]
    pub line_separator: LineSeparator,
    #[serde(default)]
    pub error_types: ErrorTypePolicy,
}

impl RenderConfig {
    pub fn options(&self) -> RenderOptions {
        RenderOptions::new()
            .indent(self.indent)
            .line_separator(self.line_separator)
    }
}

/// What to do with a type the compiler could not resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorTypePolicy {
    /// Abort with `ErrorTypeFound`.
    #[default]
    Fail,
    /// Keep the type as a placeholder named as written.
    Placeholder,
}

/// `indent = 4` or `indent = "tab"`.
fn deserialize_indent<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Indent, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Width(u8),
        Name(String),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Width(0) => Err(D::Error::custom("indent width must be at least 1")),
        Repr::Width(width) => Ok(Indent::Spaces(width)),
        Repr::Name(name) if name == "tab" => Ok(Indent::Tab),
        Repr::Name(name) => Err(D::Error::custom(format!(
            "unknown indent '{name}', expected a width or \"tab\""
        ))),
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageElement {
    /// Dotted package name; empty for the unnamed package.
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub types: Vec<TypeElement>,
}

/// Kinds of type declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Class,
    Interface,
    Enum,
    AnnotationType,
    Record,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Class => "class",
            ElementKind::Interface => "interface",
            ElementKind::Enum => "enum",
            ElementKind::AnnotationType => "annotation_type",
            ElementKind::Record => "record",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Modifiers as the compiler reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementModifier {
    Public,
    Protected,
    Private,
    Abstract,
    Default,
    Static,
    Sealed,
    NonSealed,
    Final,
    Transient,
    Volatile,
    Synchronized,
    Native,
    Strictfp,
}

impl ElementModifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementModifier::Public => "public",
            ElementModifier::Protected => "protected",
            ElementModifier::Private => "private",
            ElementModifier::Abstract => "abstract",
            ElementModifier::Default => "default",
            ElementModifier::Static => "static",
            ElementModifier::Sealed => "sealed",
            ElementModifier::NonSealed => "non-sealed",
            ElementModifier::Final => "final",
            ElementModifier::Transient => "transient",
            ElementModifier::Volatile => "volatile",
            ElementModifier::Synchronized => "synchronized",
            ElementModifier::Native => "native",
            ElementModifier::Strictfp => "strictfp",
        }
    }
}

impl fmt::Display for ElementModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A class, interface, enum or annotation type.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeElement {
    pub name: String,
    pub kind: ElementKind,
    #[serde(default)]
    pub modifiers: Vec<ElementModifier>,
    #[serde(default)]
    pub type_params: Vec<TypeParamElement>,
    pub superclass: Option<TypeMirror>,
    #[serde(default)]
    pub interfaces: Vec<TypeMirror>,
    #[serde(default)]
    pub annotations: Vec<AnnotationMirror>,
    #[serde(default)]
    pub javadoc: Vec<String>,
    /// Enum constants, in declaration order.
    #[serde(default)]
    pub constants: Vec<String>,
    #[serde(default, rename = "field")]
    pub fields: Vec<FieldElement>,
    #[serde(default, rename = "method")]
    pub methods: Vec<MethodElement>,
    #[serde(default, rename = "nested")]
    pub nested: Vec<TypeElement>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeParamElement {
    pub name: String,
    pub bound: Option<TypeMirror>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldElement {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeMirror,
    #[serde(default)]
    pub modifiers: Vec<ElementModifier>,
    #[serde(default)]
    pub annotations: Vec<AnnotationMirror>,
    #[serde(default)]
    pub javadoc: Vec<String>,
}

/// A method, or a constructor when `constructor` is set.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodElement {
    /// Ignored for constructors.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub constructor: bool,
    #[serde(default)]
    pub modifiers: Vec<ElementModifier>,
    #[serde(default)]
    pub type_params: Vec<TypeParamElement>,
    /// `void` when absent.
    pub returns: Option<TypeMirror>,
    #[serde(default, rename = "param")]
    pub params: Vec<ParamElement>,
    /// The last parameter is a varargs parameter; its type is the element type.
    #[serde(default)]
    pub varargs: bool,
    #[serde(default)]
    pub throws: Vec<TypeMirror>,
    #[serde(default)]
    pub annotations: Vec<AnnotationMirror>,
    /// Default value of an annotation type member.
    pub default: Option<AnnotationValueMirror>,
    #[serde(default)]
    pub javadoc: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamElement {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeMirror,
    #[serde(default)]
    pub modifiers: Vec<ElementModifier>,
    #[serde(default)]
    pub annotations: Vec<AnnotationMirror>,
}

/// A type expression.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum TypeMirror {
    /// `int`, `boolean`, ... including `void`.
    Primitive { name: String },
    /// A class type, nested classes written with `$` or `.` after their
    /// outer class.
    Declared {
        name: String,
        #[serde(default)]
        args: Vec<TypeMirror>,
    },
    Array { component: Box<TypeMirror> },
    TypeVar { name: String },
    Wildcard {
        extends: Option<Box<TypeMirror>>,
        #[serde(rename = "super")]
        super_bound: Option<Box<TypeMirror>>,
    },
    /// A type the compiler could not resolve.
    Error { name: String },
}

impl TypeMirror {
    pub fn declared(name: impl Into<String>) -> Self {
        TypeMirror::Declared {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn primitive(name: impl Into<String>) -> Self {
        TypeMirror::Primitive { name: name.into() }
    }
}

/// An annotation as written on a declaration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnnotationMirror {
    /// Qualified name of the annotation type.
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub values: BTreeMap<String, AnnotationValueMirror>,
}

/// An annotation member value.
///
/// Plain TOML values cover booleans, numbers, strings and arrays; other
/// values are tables tagged with `kind`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AnnotationValueMirror {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<AnnotationValueMirror>),
    Tagged(TaggedValue),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaggedValue {
    Char { value: char },
    Long { value: i64 },
    Class {
        #[serde(rename = "type")]
        ty: TypeMirror,
    },
    Enum {
        #[serde(rename = "type")]
        ty: String,
        constant: String,
    },
    Annotation(AnnotationMirror),
}
