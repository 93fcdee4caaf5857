//! Expressions, statements and blocks.
//!
//! Every node owns its children. Nodes print themselves through the
//! [`Generable`](crate::render::Generable) and
//! [`Statement`](crate::render::Statement) capabilities, so the same tree
//! is walked by the collector, the printer and the error scan.

mod block;
mod expr;
mod stmt;

use jmodel_core::{Error, Result, validate_identifier};

pub use block::Block;
pub use expr::{BinaryOp, Expr, Receiver, UnaryOp};
pub use stmt::{Case, Catch, For, ForEach, If, LocalVar, Stmt, Switch, Try, While};

fn check_local_name(name: &str) -> Result<()> {
    match validate_identifier(name) {
        Some(reason) => Err(Error::construction(format!(
            "invalid variable name '{name}': {reason}"
        ))),
        None => Ok(()),
    }
}
