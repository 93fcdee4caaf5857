//! Builds jmodel code models from declaration records.
//!
//! A [`DeclarationSet`] describes packages and type declarations the way an
//! annotation processor sees them: kinds, modifiers, type mirrors, annotation
//! mirrors. [`ModelAdapter`] turns a set into a
//! [`CodeModel`](jmodel_codegen::CodeModel) ready to render.
//!
//! # Example
//!
//! ```
//! use std::str::FromStr;
//!
//! use jmodel_adapter::{DeclarationSet, ModelAdapter};
//! use jmodel_codegen::Renderer;
//!
//! let set = DeclarationSet::from_str(r#"
//! [[package]]
//! name = "com.example"
//!
//! [[package.type]]
//! name = "Greeter"
//! kind = "interface"
//! modifiers = ["public"]
//!
//! [[package.type.method]]
//! name = "greet"
//! returns = { kind = "declared", name = "java.lang.String" }
//! "#).unwrap();
//!
//! let adapted = ModelAdapter::default().build(&set).unwrap();
//! let source = Renderer::new(set.render.options())
//!     .render(&adapted.model, adapted.classes[0])
//!     .unwrap();
//! assert!(source.contains("String greet();"));
//! ```

mod adapter;
mod element;
mod error;
pub mod mapping;
mod parse;

pub use adapter::{AdaptedModel, ModelAdapter};
pub use element::{
    AnnotationMirror, AnnotationValueMirror, DeclarationSet, ElementKind, ElementModifier,
    ErrorTypePolicy, FieldElement, MethodElement, PackageElement, ParamElement, RenderConfig,
    TaggedValue, TypeElement, TypeMirror, TypeParamElement,
};
pub use error::{AdapterError, Result};
