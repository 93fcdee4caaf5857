//! Statement blocks and their builders.

use jmodel_core::{Modifiers, Result};

use super::stmt::{For, ForEach, If, LocalVar, Stmt, Switch, Try, While};
use super::{BinaryOp, Expr};
use crate::model::Type;
use crate::render::{Formatter, Generable, TokenSink};

/// A `{ ... }` block.
///
/// Builder methods append a statement and return whatever the caller is
/// likely to fill in next: the nested block of a loop, the `If` of a
/// conditional, or the block itself for simple statements.
#[derive(Debug, Clone, Default)]
pub struct Block {
    stmts: Vec<Stmt>,
}

/// Push `$stmt` and return a mutable reference to the payload of variant `$variant`.
macro_rules! push_compound {
    ($block:expr, $variant:ident($value:expr)) => {{
        match $block.push(Stmt::$variant($value)) {
            Stmt::$variant(inner) => inner,
            _ => unreachable!(concat!("pushed a ", stringify!($variant))),
        }
    }};
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statements(&self) -> &[Stmt] {
        &self.stmts
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }

    fn push(&mut self, stmt: Stmt) -> &mut Stmt {
        let index = self.stmts.len();
        self.stmts.push(stmt);
        &mut self.stmts[index]
    }

    /// Append any statement.
    pub fn add(&mut self, stmt: Stmt) -> &mut Self {
        self.stmts.push(stmt);
        self
    }

    /// Append an expression statement, typically a call.
    pub fn add_expr(&mut self, expr: Expr) -> &mut Self {
        self.add(Stmt::Expr(expr))
    }

    /// Declare a local variable and return an expression naming it.
    pub fn decl(&mut self, ty: Type, name: &str, init: Option<Expr>) -> Result<Expr> {
        self.decl_with(Modifiers::NONE, ty, name, init)
    }

    /// Declare a local variable with modifiers (typically `final`).
    pub fn decl_with(
        &mut self,
        mods: Modifiers,
        ty: Type,
        name: &str,
        init: Option<Expr>,
    ) -> Result<Expr> {
        super::check_local_name(name)?;
        let var = LocalVar::new(mods, ty, name, init);
        let expr = var.as_expr();
        self.stmts.push(Stmt::Local(var));
        Ok(expr)
    }

    /// `target = value;`
    pub fn assign(&mut self, target: Expr, value: Expr) -> &mut Self {
        self.add_expr(target.assign(value))
    }

    /// `target op= value;`
    pub fn assign_op(&mut self, target: Expr, op: BinaryOp, value: Expr) -> &mut Self {
        self.add_expr(target.assign_op(op, value))
    }

    /// `return value;`
    pub fn return_value(&mut self, value: Expr) -> &mut Self {
        self.add(Stmt::Return(Some(value)))
    }

    /// `return;`
    pub fn return_void(&mut self) -> &mut Self {
        self.add(Stmt::Return(None))
    }

    /// `throw value;`
    pub fn throw(&mut self, value: Expr) -> &mut Self {
        self.add(Stmt::Throw(value))
    }

    pub fn add_break(&mut self) -> &mut Self {
        self.add(Stmt::Break(None))
    }

    pub fn add_continue(&mut self) -> &mut Self {
        self.add(Stmt::Continue(None))
    }

    pub fn label(&mut self, name: impl Into<String>) -> &mut Self {
        self.add(Stmt::Label(name.into()))
    }

    /// A statement given as source text.
    pub fn direct(&mut self, source: impl Into<String>) -> &mut Self {
        self.add(Stmt::Direct(source.into()))
    }

    /// `if (cond) { ... }`
    pub fn if_then(&mut self, cond: Expr) -> &mut If {
        push_compound!(
            self,
            If(If {
                cond,
                then: Block::new(),
                otherwise: None,
            })
        )
    }

    /// `while (cond) { ... }`
    pub fn while_loop(&mut self, cond: Expr) -> &mut Block {
        &mut push_compound!(
            self,
            While(While {
                cond,
                body: Block::new(),
                do_while: false,
            })
        )
        .body
    }

    /// `do { ... } while (cond);`
    pub fn do_while(&mut self, cond: Expr) -> &mut Block {
        &mut push_compound!(
            self,
            While(While {
                cond,
                body: Block::new(),
                do_while: true,
            })
        )
        .body
    }

    /// `for (...; ...; ...) { ... }`
    pub fn for_loop(&mut self) -> &mut For {
        push_compound!(self, For(For::default()))
    }

    /// `for (ty name : iterable) { ... }`; returns the loop body and an
    /// expression naming the loop variable.
    pub fn for_each(&mut self, ty: Type, name: &str, iterable: Expr) -> Result<(&mut Block, Expr)> {
        super::check_local_name(name)?;
        let var = LocalVar::new(Modifiers::NONE, ty, name, None);
        let expr = var.as_expr();
        let stmt = push_compound!(
            self,
            ForEach(ForEach {
                var,
                iterable,
                body: Block::new(),
            })
        );
        Ok((&mut stmt.body, expr))
    }

    /// `switch (selector) { ... }`
    pub fn switch(&mut self, selector: Expr) -> &mut Switch {
        push_compound!(
            self,
            Switch(Switch {
                selector,
                cases: Vec::new(),
            })
        )
    }

    /// `try { ... }`
    pub fn try_block(&mut self) -> &mut Try {
        push_compound!(self, Try(Try::default()))
    }

    /// `synchronized (lock) { ... }`
    pub fn synchronized(&mut self, lock: Expr) -> &mut Block {
        match self.push(Stmt::Synchronized {
            lock,
            body: Block::new(),
        }) {
            Stmt::Synchronized { body, .. } => body,
            _ => unreachable!("pushed a synchronized statement"),
        }
    }

    /// A nested `{ ... }` block.
    pub fn block(&mut self) -> &mut Block {
        push_compound!(self, Block(Block::new()))
    }
}

impl Generable for Block {
    fn generate<S: TokenSink>(&self, f: &mut Formatter<'_, S>) {
        f.p("{").nl().i();
        for stmt in &self.stmts {
            f.s(stmt);
        }
        f.o().p("}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Primitive;

    #[test]
    fn test_builders_append_in_order() {
        let mut block = Block::new();
        let x = block
            .decl(Primitive::Int.into(), "x", Some(Expr::int(1)))
            .unwrap();
        block.assign(x.clone(), Expr::int(2));
        block.if_then(x.clone().gt(Expr::int(0))).then_block().return_value(x);
        assert_eq!(block.statements().len(), 3);
        assert!(matches!(block.statements()[2], Stmt::If(_)));
    }

    #[test]
    fn test_decl_rejects_keyword() {
        let mut block = Block::new();
        assert!(block.decl(Primitive::Int.into(), "int", None).is_err());
        assert!(block.is_empty());
    }

    #[test]
    fn test_else_if_chains() {
        let mut block = Block::new();
        let cond = block.if_then(Expr::name("a"));
        cond.then_block().return_void();
        cond.else_if(Expr::name("b")).then_block().return_void();
        let Stmt::If(outer) = &block.statements()[0] else {
            panic!("expected an if statement");
        };
        let otherwise = outer.otherwise.as_ref().unwrap();
        assert!(matches!(otherwise.statements(), [Stmt::If(_)]));
    }
}
