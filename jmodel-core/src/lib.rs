//! Core types and utilities shared by the jmodel crates.
//!
//! This crate provides the error type, formatting configuration, Java
//! modifier and declaration kinds, and identifier helpers used by
//! `jmodel-codegen` and `jmodel-adapter`.

mod error;
mod file;
mod format;
mod kind;
mod modifiers;
mod utils;

pub use error::{Error, Result};
pub use file::SourceFile;
pub use format::{Indent, LineSeparator};
pub use kind::ClassKind;
pub use modifiers::{Modifier, Modifiers};
pub use utils::{
    is_identifier_part, is_identifier_start, is_java_keyword, quotify, validate_identifier,
};
