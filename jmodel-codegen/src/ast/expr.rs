//! Expressions.

use jmodel_core::quotify;

use crate::model::{ClassId, Type};
use crate::render::{Formatter, Generable, TokenSink};

/// Prefix and postfix unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `!x`
    Not,
    /// `~x`
    Complement,
    /// `++x`
    PreIncr,
    /// `--x`
    PreDecr,
    /// `x++`
    PostIncr,
    /// `x--`
    PostDecr,
}

impl UnaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "!",
            Self::Complement => "~",
            Self::PreIncr | Self::PostIncr => "++",
            Self::PreDecr | Self::PostDecr => "--",
        }
    }

    /// Increment and decrement bind tightly and print without parentheses.
    fn is_tight(&self) -> bool {
        !matches!(self, Self::Neg | Self::Not | Self::Complement)
    }

    fn is_postfix(&self) -> bool {
        matches!(self, Self::PostIncr | Self::PostDecr)
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    UShr,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    BitAnd,
    BitOr,
    BitXor,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::UShr => ">>>",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::And => "&&",
            Self::Or => "||",
        }
    }

    /// Whether `op=` is a valid compound assignment.
    pub fn has_compound_assignment(&self) -> bool {
        matches!(
            self,
            Self::Add
                | Self::Sub
                | Self::Mul
                | Self::Div
                | Self::Rem
                | Self::Shl
                | Self::Shr
                | Self::UShr
                | Self::BitAnd
                | Self::BitOr
                | Self::BitXor
        )
    }
}

/// What a field access or method call is applied to.
#[derive(Debug, Clone)]
pub enum Receiver {
    Expr(Box<Expr>),
    /// A static access through a type (`Math.max`).
    Type(Type),
}

/// An expression.
///
/// Expressions own their sub-expressions. Reusing one in two places
/// takes a `.clone()`.
#[derive(Debug, Clone)]
pub enum Expr {
    Null,
    This,
    Super,
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    Str(String),
    /// Source text printed as is.
    Atom(String),
    /// Source text printed in parentheses.
    Direct(String),
    /// A plain identifier: a local variable, parameter or field.
    Name(String),
    Field {
        receiver: Receiver,
        name: String,
    },
    Invoke {
        receiver: Option<Receiver>,
        type_args: Vec<Type>,
        name: String,
        args: Vec<Expr>,
    },
    /// `new T(args)`; an [`Type::Anonymous`] type also prints its body.
    New {
        ty: Type,
        args: Vec<Expr>,
    },
    /// `new T[n]` or `new T[] {a, b}`.
    NewArray {
        element: Type,
        dims: Vec<Expr>,
        init: Option<Vec<Expr>>,
    },
    ArrayAccess {
        array: Box<Expr>,
        index: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// `target = value`, or `target op= value` with a compound operator.
    Assign {
        op: Option<BinaryOp>,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Conditional {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    Cast {
        ty: Type,
        expr: Box<Expr>,
    },
    InstanceOf {
        expr: Box<Expr>,
        ty: Type,
    },
    /// `T.class`
    ClassLiteral(Type),
}

impl Expr {
    // =========================================================================
    // Literals
    // =========================================================================

    pub fn null() -> Self {
        Self::Null
    }

    pub fn this() -> Self {
        Self::This
    }

    pub fn super_() -> Self {
        Self::Super
    }

    pub fn bool(value: bool) -> Self {
        Self::Bool(value)
    }

    pub fn int(value: i32) -> Self {
        Self::Int(value)
    }

    pub fn long(value: i64) -> Self {
        Self::Long(value)
    }

    /// A float literal. Infinities and NaN become `java.lang.Float` constants.
    pub fn float(value: f32) -> Self {
        if value.is_nan() {
            Self::Atom("java.lang.Float.NaN".into())
        } else if value == f32::INFINITY {
            Self::Atom("java.lang.Float.POSITIVE_INFINITY".into())
        } else if value == f32::NEG_INFINITY {
            Self::Atom("java.lang.Float.NEGATIVE_INFINITY".into())
        } else {
            Self::Float(value)
        }
    }

    /// A double literal. Infinities and NaN become `java.lang.Double` constants.
    pub fn double(value: f64) -> Self {
        if value.is_nan() {
            Self::Atom("java.lang.Double.NaN".into())
        } else if value == f64::INFINITY {
            Self::Atom("java.lang.Double.POSITIVE_INFINITY".into())
        } else if value == f64::NEG_INFINITY {
            Self::Atom("java.lang.Double.NEGATIVE_INFINITY".into())
        } else {
            Self::Double(value)
        }
    }

    pub fn char(value: char) -> Self {
        Self::Char(value)
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::Str(value.into())
    }

    /// Source text, parenthesized when printed.
    pub fn direct(source: impl Into<String>) -> Self {
        Self::Direct(source.into())
    }

    // =========================================================================
    // Names, fields and calls
    // =========================================================================

    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// `self.name`
    pub fn field(self, name: impl Into<String>) -> Self {
        Self::Field {
            receiver: Receiver::Expr(Box::new(self)),
            name: name.into(),
        }
    }

    /// `Type.name`, also used for enum constants.
    pub fn static_field(ty: impl Into<Type>, name: impl Into<String>) -> Self {
        Self::Field {
            receiver: Receiver::Type(ty.into()),
            name: name.into(),
        }
    }

    /// `this.name`
    pub fn this_field(name: impl Into<String>) -> Self {
        Self::This.field(name)
    }

    /// An unqualified call: `name()`.
    pub fn invoke(name: impl Into<String>) -> Self {
        Self::Invoke {
            receiver: None,
            type_args: Vec::new(),
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// A call on this expression: `self.name()`.
    pub fn call(self, name: impl Into<String>) -> Self {
        Self::Invoke {
            receiver: Some(Receiver::Expr(Box::new(self))),
            type_args: Vec::new(),
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// A static call: `Type.name()`.
    pub fn static_invoke(ty: impl Into<Type>, name: impl Into<String>) -> Self {
        Self::Invoke {
            receiver: Some(Receiver::Type(ty.into())),
            type_args: Vec::new(),
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// `new T()`
    pub fn new_instance(ty: impl Into<Type>) -> Self {
        Self::New {
            ty: ty.into(),
            args: Vec::new(),
        }
    }

    /// `new T[size]`
    pub fn new_array(element: impl Into<Type>, size: Expr) -> Self {
        Self::NewArray {
            element: element.into(),
            dims: vec![size],
            init: None,
        }
    }

    /// `new T[] {items}`
    pub fn array_init(element: impl Into<Type>, items: Vec<Expr>) -> Self {
        Self::NewArray {
            element: element.into(),
            dims: Vec::new(),
            init: Some(items),
        }
    }

    /// Append an argument to a call, an instance creation or an array
    /// initializer. Other expressions are returned unchanged.
    pub fn arg(mut self, arg: Expr) -> Self {
        match &mut self {
            Self::Invoke { args, .. } | Self::New { args, .. } => args.push(arg),
            Self::NewArray {
                init: Some(items), ..
            } => items.push(arg),
            _ => {}
        }
        self
    }

    /// Append several arguments.
    pub fn args(self, args: impl IntoIterator<Item = Expr>) -> Self {
        args.into_iter().fold(self, Self::arg)
    }

    /// Add an explicit type argument to a call: `Collections.<T>emptyList()`.
    pub fn type_arg(mut self, ty: Type) -> Self {
        if let Self::Invoke { type_args, .. } = &mut self {
            type_args.push(ty);
        }
        self
    }

    /// `self[index]`
    pub fn component(self, index: Expr) -> Self {
        Self::ArrayAccess {
            array: Box::new(self),
            index: Box::new(index),
        }
    }

    /// `T.class`
    pub fn dot_class(ty: impl Into<Type>) -> Self {
        Self::ClassLiteral(ty.into())
    }

    // =========================================================================
    // Operators
    // =========================================================================

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Self::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn neg(self) -> Self {
        Self::unary(UnaryOp::Neg, self)
    }

    pub fn not(self) -> Self {
        Self::unary(UnaryOp::Not, self)
    }

    pub fn incr(self) -> Self {
        Self::unary(UnaryOp::PostIncr, self)
    }

    pub fn decr(self) -> Self {
        Self::unary(UnaryOp::PostDecr, self)
    }

    pub fn plus(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Add, self, rhs)
    }

    pub fn minus(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Sub, self, rhs)
    }

    pub fn mul(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Mul, self, rhs)
    }

    pub fn div(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Div, self, rhs)
    }

    pub fn lt(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Lt, self, rhs)
    }

    pub fn gt(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Gt, self, rhs)
    }

    pub fn le(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Le, self, rhs)
    }

    pub fn ge(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Ge, self, rhs)
    }

    /// `==`
    pub fn equal(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Eq, self, rhs)
    }

    /// `!=`
    pub fn not_equal(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Ne, self, rhs)
    }

    pub fn and(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::And, self, rhs)
    }

    pub fn or(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Or, self, rhs)
    }

    /// `self = value`
    pub fn assign(self, value: Expr) -> Self {
        Self::Assign {
            op: None,
            target: Box::new(self),
            value: Box::new(value),
        }
    }

    /// `self op= value`
    pub fn assign_op(self, op: BinaryOp, value: Expr) -> Self {
        Self::Assign {
            op: Some(op),
            target: Box::new(self),
            value: Box::new(value),
        }
    }

    /// `cond ? then : otherwise`
    pub fn cond(cond: Expr, then: Expr, otherwise: Expr) -> Self {
        Self::Conditional {
            cond: Box::new(cond),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }

    pub fn cast(ty: impl Into<Type>, expr: Expr) -> Self {
        Self::Cast {
            ty: ty.into(),
            expr: Box::new(expr),
        }
    }

    pub fn instance_of(self, ty: impl Into<Type>) -> Self {
        Self::InstanceOf {
            expr: Box::new(self),
            ty: ty.into(),
        }
    }

    /// Whether the printed form is already wrapped in parentheses.
    pub fn is_parenthesized(&self) -> bool {
        match self {
            Self::Unary { op, .. } => !op.is_tight(),
            Self::Binary { .. }
            | Self::Conditional { .. }
            | Self::Cast { .. }
            | Self::InstanceOf { .. }
            | Self::Direct(_) => true,
            _ => false,
        }
    }

    /// The anonymous class an instance creation expression carries.
    pub fn anonymous_class(&self) -> Option<ClassId> {
        match self {
            Self::New {
                ty: Type::Anonymous(id),
                ..
            } => Some(*id),
            _ => None,
        }
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Self::string(value)
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl Generable for Receiver {
    fn generate<S: TokenSink>(&self, f: &mut Formatter<'_, S>) {
        match self {
            Receiver::Expr(expr) => f.g(expr.as_ref()),
            Receiver::Type(ty) => f.ty(ty),
        };
    }
}

impl Generable for Expr {
    fn generate<S: TokenSink>(&self, f: &mut Formatter<'_, S>) {
        match self {
            Expr::Null => f.p("null"),
            Expr::This => f.p("this"),
            Expr::Super => f.p("super"),
            Expr::Bool(value) => f.p(if *value { "true" } else { "false" }),
            Expr::Int(value) => f.p(&value.to_string()),
            Expr::Long(value) => f.p(&format!("{value}L")),
            Expr::Float(value) => f.p(&format!("{value:?}F")),
            Expr::Double(value) => f.p(&format!("{value:?}D")),
            Expr::Char(value) => f.p(&quotify('\'', &value.to_string())),
            Expr::Str(value) => f.p(&quotify('"', value)),
            Expr::Atom(source) => f.p(source),
            Expr::Direct(source) => f.p("(").p(source).p(")"),
            Expr::Name(name) => f.id(name),
            Expr::Field { receiver, name } => f.g(receiver).p(".").p(name),
            Expr::Invoke {
                receiver,
                type_args,
                name,
                args,
            } => {
                match receiver {
                    Some(receiver) => {
                        f.g(receiver).p(".");
                        if !type_args.is_empty() {
                            f.p("<").types(type_args).close_type_args();
                        }
                        f.p(name);
                    }
                    None => {
                        f.id(name);
                    }
                }
                f.p("(").list(args).p(")")
            }
            Expr::New { ty, args } => {
                f.p("new ").ty(ty).p("(").list(args).p(")");
                if let Type::Anonymous(id) = ty {
                    f.class_body(*id);
                }
                f
            }
            Expr::NewArray {
                element,
                dims,
                init,
            } => {
                f.p("new ").ty(element);
                for dim in dims {
                    f.p("[").g(dim).p("]");
                }
                if let Some(items) = init {
                    f.p("[]").p("{").list(items).p("}");
                }
                f
            }
            Expr::ArrayAccess { array, index } => f.g(array.as_ref()).p("[").g(index.as_ref()).p("]"),
            Expr::Unary { op, operand } => {
                if !op.is_tight() {
                    f.p("(").p(op.symbol()).g(operand.as_ref()).p(")")
                } else if op.is_postfix() {
                    f.g(operand.as_ref()).p(op.symbol())
                } else {
                    f.p(op.symbol()).g(operand.as_ref())
                }
            }
            Expr::Binary { op, lhs, rhs } => f
                .p("(")
                .g(lhs.as_ref())
                .p(&format!(" {} ", op.symbol()))
                .g(rhs.as_ref())
                .p(")"),
            Expr::Assign { op, target, value } => {
                let symbol = match op {
                    Some(op) => format!(" {}= ", op.symbol()),
                    None => " = ".to_string(),
                };
                f.g(target.as_ref()).p(&symbol).g(value.as_ref())
            }
            Expr::Conditional {
                cond,
                then,
                otherwise,
            } => f
                .p("(")
                .g(cond.as_ref())
                .p(" ? ")
                .g(then.as_ref())
                .p(" : ")
                .g(otherwise.as_ref())
                .p(")"),
            Expr::Cast { ty, expr } => f.p("((").ty(ty).p(")").g(expr.as_ref()).p(")"),
            Expr::InstanceOf { expr, ty } => f
                .p("(")
                .g(expr.as_ref())
                .p(" instanceof ")
                .ty(ty)
                .p(")"),
            Expr::ClassLiteral(ty) => f.ty(ty).p(".class"),
        };
    }
}
