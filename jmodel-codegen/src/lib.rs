//! Java code model and renderer.
//!
//! Build packages, classes, members and method bodies in a [`CodeModel`],
//! then hand a top-level class to a [`Renderer`] to get a compilation unit
//! whose type references are as short as they can be without ambiguity.
//!
//! # Module Organization
//!
//! - [`model`] - Packages, classes, members and the [`Type`] system
//! - [`ast`] - Expressions, statements and blocks
//! - [`annotation_writer`] - Validating writer for annotation members
//! - [`render`] - Collector, import resolver and printer
//!
//! # Example
//!
//! ```
//! use jmodel_codegen::{ClassKind, CodeModel, Modifiers, Renderer, Type};
//!
//! let mut model = CodeModel::new();
//! let pkg = model.package("com.example");
//! let list = model.reference("java.util.List").unwrap();
//! let string = model.reference("java.lang.String").unwrap();
//!
//! let class = model
//!     .define_class(pkg, Modifiers::PUBLIC, "Names", ClassKind::Class)
//!     .unwrap();
//! let names = Type::from(list).narrow([Type::from(string)]).unwrap();
//! model
//!     .class_mut(class)
//!     .field(Modifiers::PRIVATE, names, "names")
//!     .unwrap();
//!
//! let source = Renderer::default().render(&model, class).unwrap();
//! assert!(source.contains("import java.util.List;"));
//! assert!(source.contains("private List<String> names;"));
//! ```

pub mod annotation_writer;
pub mod ast;
pub mod model;
pub mod render;

pub use annotation_writer::{AnnotationShape, AnnotationWriter, ArrayWriter, MemberKind};
pub use ast::{BinaryOp, Block, Expr, LocalVar, Stmt, UnaryOp};
pub use jmodel_core::{
    ClassKind, Error, Indent, LineSeparator, Modifier, Modifiers, Result, SourceFile,
};
pub use model::{
    AnnotationUse, AnnotationValue, ClassData, ClassId, ClassOrigin, ClassOwner, CodeModel,
    Field, Method, Package, PackageId, Param, Primitive, Type, TypeVar, Wildcard,
};
pub use render::{RenderOptions, Renderer};
