//! Statements and local variables.

use jmodel_core::{Modifiers, Result};

use super::{Block, Expr};
use crate::model::Type;
use crate::render::{Declarable, Formatter, Generable, Statement, TokenSink};

/// A local variable declaration.
#[derive(Debug, Clone)]
pub struct LocalVar {
    pub mods: Modifiers,
    pub ty: Type,
    pub name: String,
    pub init: Option<Expr>,
}

impl LocalVar {
    pub fn new(mods: Modifiers, ty: Type, name: impl Into<String>, init: Option<Expr>) -> Self {
        Self {
            mods,
            ty,
            name: name.into(),
            init,
        }
    }

    /// An expression naming this variable.
    pub fn as_expr(&self) -> Expr {
        Expr::name(&self.name)
    }
}

impl Declarable for LocalVar {
    fn declare<S: TokenSink>(&self, f: &mut Formatter<'_, S>) {
        f.modifiers(self.mods).ty(&self.ty).id(&self.name);
        if let Some(init) = &self.init {
            f.p(" = ").g(init);
        }
    }
}

/// `if (cond) { ... } else { ... }`
#[derive(Debug, Clone)]
pub struct If {
    pub cond: Expr,
    pub then: Block,
    pub otherwise: Option<Block>,
}

impl If {
    pub fn then_block(&mut self) -> &mut Block {
        &mut self.then
    }

    pub fn else_block(&mut self) -> &mut Block {
        self.otherwise.get_or_insert_with(Block::new)
    }

    /// Chain `else if (cond)`.
    pub fn else_if(&mut self, cond: Expr) -> &mut If {
        self.else_block().if_then(cond)
    }

    /// The `if` this one chains to when its else branch holds only that.
    fn chained(&self) -> Option<&If> {
        match self.otherwise.as_ref().map(|b| b.statements()) {
            Some([Stmt::If(inner)]) => Some(inner),
            _ => None,
        }
    }
}

/// `while (cond) { ... }` or `do { ... } while (cond);`
#[derive(Debug, Clone)]
pub struct While {
    pub cond: Expr,
    pub body: Block,
    pub do_while: bool,
}

/// `for (init; cond; update) { ... }`
#[derive(Debug, Clone, Default)]
pub struct For {
    pub init: Option<LocalVar>,
    pub cond: Option<Expr>,
    pub update: Vec<Expr>,
    pub body: Block,
}

impl For {
    /// Declare the loop variable.
    pub fn init(&mut self, ty: Type, name: &str, value: Expr) -> Result<Expr> {
        super::check_local_name(name)?;
        self.init = Some(LocalVar::new(Modifiers::NONE, ty, name, Some(value)));
        Ok(Expr::name(name))
    }

    pub fn test(&mut self, cond: Expr) -> &mut Self {
        self.cond = Some(cond);
        self
    }

    pub fn update(&mut self, update: Expr) -> &mut Self {
        self.update.push(update);
        self
    }

    pub fn body(&mut self) -> &mut Block {
        &mut self.body
    }
}

/// `for (T var : iterable) { ... }`
#[derive(Debug, Clone)]
pub struct ForEach {
    pub var: LocalVar,
    pub iterable: Expr,
    pub body: Block,
}

/// One `case` of a switch; `label` is `None` for `default`.
#[derive(Debug, Clone)]
pub struct Case {
    pub label: Option<Expr>,
    pub body: Block,
}

/// `switch (selector) { ... }`
#[derive(Debug, Clone)]
pub struct Switch {
    pub selector: Expr,
    pub cases: Vec<Case>,
}

impl Switch {
    /// Add `case label:` and return its body.
    pub fn case(&mut self, label: Expr) -> &mut Block {
        self.push_case(Some(label))
    }

    /// Add `default:` and return its body.
    pub fn default_case(&mut self) -> &mut Block {
        self.push_case(None)
    }

    fn push_case(&mut self, label: Option<Expr>) -> &mut Block {
        let index = self.cases.len();
        self.cases.push(Case {
            label,
            body: Block::new(),
        });
        &mut self.cases[index].body
    }
}

/// A `catch` clause; several types make a multi-catch.
#[derive(Debug, Clone)]
pub struct Catch {
    pub types: Vec<Type>,
    pub var: String,
    pub body: Block,
}

/// `try (resources) { ... } catch (...) { ... } finally { ... }`
#[derive(Debug, Clone, Default)]
pub struct Try {
    pub resources: Vec<LocalVar>,
    pub body: Block,
    pub catches: Vec<Catch>,
    pub finally: Option<Block>,
}

impl Try {
    pub fn body(&mut self) -> &mut Block {
        &mut self.body
    }

    /// Add a try-with-resources variable.
    pub fn resource(&mut self, ty: Type, name: &str, init: Expr) -> Result<Expr> {
        super::check_local_name(name)?;
        self.resources
            .push(LocalVar::new(Modifiers::NONE, ty, name, Some(init)));
        Ok(Expr::name(name))
    }

    /// Add `catch (ty var)` and return its body.
    pub fn catch(&mut self, ty: Type, var: &str) -> Result<&mut Block> {
        self.multi_catch(vec![ty], var)
    }

    /// Add `catch (A | B var)` and return its body.
    pub fn multi_catch(&mut self, types: Vec<Type>, var: &str) -> Result<&mut Block> {
        super::check_local_name(var)?;
        let index = self.catches.len();
        self.catches.push(Catch {
            types,
            var: var.to_string(),
            body: Block::new(),
        });
        Ok(&mut self.catches[index].body)
    }

    pub fn finally(&mut self) -> &mut Block {
        self.finally.get_or_insert_with(Block::new)
    }
}

/// A statement.
#[derive(Debug, Clone)]
pub enum Stmt {
    /// An expression evaluated for its effect.
    Expr(Expr),
    Local(LocalVar),
    Return(Option<Expr>),
    Throw(Expr),
    Break(Option<String>),
    Continue(Option<String>),
    /// `label:`
    Label(String),
    If(If),
    While(While),
    For(For),
    ForEach(ForEach),
    Switch(Switch),
    Try(Try),
    Synchronized { lock: Expr, body: Block },
    Block(Block),
    /// Source text printed as a line of its own.
    Direct(String),
}

/// `keyword (cond)`, without doubling the parentheses of an expression
/// that prints its own.
fn keyword_cond<S: TokenSink>(f: &mut Formatter<'_, S>, keyword: &str, cond: &Expr) {
    if cond.is_parenthesized() {
        f.p(keyword).p(" ").g(cond);
    } else {
        f.p(keyword).p(" (").g(cond).p(")");
    }
}

impl Statement for If {
    fn state<S: TokenSink>(&self, f: &mut Formatter<'_, S>) {
        keyword_cond(f, "if", &self.cond);
        f.g(&self.then);
        if let Some(inner) = self.chained() {
            f.p(" else ");
            inner.state(f);
            return;
        }
        if let Some(otherwise) = &self.otherwise {
            f.p(" else").g(otherwise);
        }
        f.nl();
    }
}

impl Statement for Stmt {
    fn state<S: TokenSink>(&self, f: &mut Formatter<'_, S>) {
        match self {
            Stmt::Expr(expr) => {
                f.g(expr).p(";").nl();
            }
            Stmt::Local(var) => {
                f.d(var).p(";").nl();
            }
            Stmt::Return(None) => {
                f.p("return;").nl();
            }
            Stmt::Return(Some(value)) => {
                f.p("return ").g(value).p(";").nl();
            }
            Stmt::Throw(value) => {
                f.p("throw ").g(value).p(";").nl();
            }
            Stmt::Break(label) | Stmt::Continue(label) => {
                f.p(if matches!(self, Stmt::Break(_)) {
                    "break"
                } else {
                    "continue"
                });
                if let Some(label) = label {
                    f.p(label);
                }
                f.p(";").nl();
            }
            Stmt::Label(label) => {
                f.p(label).p(":").nl();
            }
            Stmt::If(stmt) => stmt.state(f),
            Stmt::While(stmt) if stmt.do_while => {
                f.p("do").g(&stmt.body).p(" ");
                keyword_cond(f, "while", &stmt.cond);
                f.p(";").nl();
            }
            Stmt::While(stmt) => {
                keyword_cond(f, "while", &stmt.cond);
                f.g(&stmt.body).nl();
            }
            Stmt::For(stmt) => {
                f.p("for (");
                if let Some(init) = &stmt.init {
                    f.d(init);
                }
                f.p(";");
                if let Some(cond) = &stmt.cond {
                    f.g(cond);
                }
                f.p(";").list(&stmt.update).p(")").g(&stmt.body).nl();
            }
            Stmt::ForEach(stmt) => {
                f.p("for (")
                    .modifiers(stmt.var.mods)
                    .ty(&stmt.var.ty)
                    .id(&stmt.var.name)
                    .p(" : ")
                    .g(&stmt.iterable)
                    .p(")")
                    .g(&stmt.body)
                    .nl();
            }
            Stmt::Switch(stmt) => {
                keyword_cond(f, "switch", &stmt.selector);
                f.p(" {").nl().i();
                for case in &stmt.cases {
                    match &case.label {
                        Some(label) => f.p("case ").g(label).p(":"),
                        None => f.p("default:"),
                    };
                    f.nl().i();
                    for inner in case.body.statements() {
                        f.s(inner);
                    }
                    f.o();
                }
                f.o().p("}").nl();
            }
            Stmt::Try(stmt) => {
                f.p("try");
                if !stmt.resources.is_empty() {
                    f.p(" (");
                    for (i, resource) in stmt.resources.iter().enumerate() {
                        if i > 0 {
                            f.p(";");
                        }
                        f.d(resource);
                    }
                    f.p(")");
                }
                f.g(&stmt.body);
                for catch in &stmt.catches {
                    f.p(" catch (");
                    for (i, ty) in catch.types.iter().enumerate() {
                        if i > 0 {
                            f.p(" | ");
                        }
                        f.ty(ty);
                    }
                    f.id(&catch.var).p(")").g(&catch.body);
                }
                if let Some(finally) = &stmt.finally {
                    f.p(" finally").g(finally);
                }
                f.nl();
            }
            Stmt::Synchronized { lock, body } => {
                keyword_cond(f, "synchronized", lock);
                f.g(body).nl();
            }
            Stmt::Block(block) => {
                f.g(block).nl();
            }
            Stmt::Direct(source) => {
                f.p(source).nl();
            }
        }
    }
}

impl Generable for LocalVar {
    fn generate<S: TokenSink>(&self, f: &mut Formatter<'_, S>) {
        f.id(&self.name);
    }
}
