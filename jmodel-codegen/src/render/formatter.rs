//! The traversal shared by every render pass.
//!
//! [`Formatter`] walks declarations, statements and expressions and reports
//! what it sees to a [`TokenSink`]. The collector, the printer and the
//! error scan are sinks; each one cares about a different subset of the
//! events, so the tree is described once and walked three ways.

use jmodel_core::Modifiers;

use crate::model::{AnnotationUse, ClassId, CodeModel, Type, TypeVar, Wildcard};

/// Stands for the `>` that closes a type argument list, so the printer
/// can tell it apart from the greater-than operator when spacing tokens.
pub const CLOSE_TYPE_ARGS: char = '\u{FFFF}';

/// Receives the events of a traversal.
///
/// Every method defaults to doing nothing.
pub trait TokenSink {
    /// Source text.
    fn text(&mut self, _text: &str) {}

    fn newline(&mut self) {}

    fn indent(&mut self) {}

    fn outdent(&mut self) {}

    /// A plain identifier: a variable, parameter, field or method name.
    fn identifier(&mut self, _name: &str) {}

    /// A class in type position. The sink prints it.
    fn reference(&mut self, _model: &CodeModel, _id: ClassId) {}

    /// The name of a class being declared. The traversal prints the name
    /// itself.
    fn declared_type(&mut self, _model: &CodeModel, _id: ClassId) {}
}

/// Something that prints as an expression or a type.
pub trait Generable {
    fn generate<S: TokenSink>(&self, f: &mut Formatter<'_, S>);
}

/// Something that prints as a declaration.
pub trait Declarable {
    fn declare<S: TokenSink>(&self, f: &mut Formatter<'_, S>);
}

/// Something that prints as a statement, newline included.
pub trait Statement {
    fn state<S: TokenSink>(&self, f: &mut Formatter<'_, S>);
}

/// Walks a model, forwarding tokens to a sink.
pub struct Formatter<'m, S> {
    model: &'m CodeModel,
    sink: S,
}

impl<'m, S: TokenSink> Formatter<'m, S> {
    pub fn new(model: &'m CodeModel, sink: S) -> Self {
        Self { model, sink }
    }

    pub fn model(&self) -> &'m CodeModel {
        self.model
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    // =========================================================================
    // Tokens
    // =========================================================================

    /// Print text.
    pub fn p(&mut self, text: &str) -> &mut Self {
        self.sink.text(text);
        self
    }

    /// End the line.
    pub fn nl(&mut self) -> &mut Self {
        self.sink.newline();
        self
    }

    /// Indent following lines.
    pub fn i(&mut self) -> &mut Self {
        self.sink.indent();
        self
    }

    /// Outdent following lines.
    pub fn o(&mut self) -> &mut Self {
        self.sink.outdent();
        self
    }

    /// Print an identifier.
    pub fn id(&mut self, name: &str) -> &mut Self {
        self.sink.identifier(name);
        self.sink.text(name);
        self
    }

    /// Close a type argument list.
    pub fn close_type_args(&mut self) -> &mut Self {
        let mut buf = [0u8; 4];
        self.sink.text(CLOSE_TYPE_ARGS.encode_utf8(&mut buf));
        self
    }

    pub fn g<G: Generable + ?Sized>(&mut self, g: &G) -> &mut Self {
        g.generate(self);
        self
    }

    pub fn d<D: Declarable + ?Sized>(&mut self, d: &D) -> &mut Self {
        d.declare(self);
        self
    }

    pub fn s<T: Statement + ?Sized>(&mut self, s: &T) -> &mut Self {
        s.state(self);
        self
    }

    /// Print items separated by commas.
    pub fn list<G: Generable>(&mut self, items: &[G]) -> &mut Self {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.p(",");
            }
            self.g(item);
        }
        self
    }

    // =========================================================================
    // Types
    // =========================================================================

    /// Print a type.
    pub fn ty(&mut self, ty: &Type) -> &mut Self {
        match ty {
            Type::Primitive(primitive) => self.p(primitive.keyword()),
            Type::Reference(id) => self.class_ref(*id),
            Type::Narrowed { basis, args } => self
                .class_ref(*basis)
                .p("<")
                .types(args)
                .close_type_args(),
            // Generic arrays are illegal, so a narrowed component prints raw
            Type::Array(component) => match component.as_ref() {
                Type::Narrowed { basis, .. } => self.class_ref(*basis).p("[]"),
                component => self.ty(component).p("[]"),
            },
            Type::Var(var) => self.id(&var.name),
            Type::Wildcard(Wildcard::Unbounded) => self.p("?"),
            Type::Wildcard(Wildcard::Extends(bound)) => self.p("? extends ").ty(bound),
            Type::Wildcard(Wildcard::Super(bound)) => self.p("? super ").ty(bound),
            Type::Anonymous(id) => {
                let model = self.model;
                match model.class(*id).superclass() {
                    Some(base) => self.ty(base),
                    None => self.class_ref(model.object()),
                }
            }
        }
    }

    /// Print types separated by commas.
    pub fn types(&mut self, types: &[Type]) -> &mut Self {
        for (i, ty) in types.iter().enumerate() {
            if i > 0 {
                self.p(",");
            }
            self.ty(ty);
        }
        self
    }

    /// Print a reference to a class; the sink decides how it is spelled.
    pub fn class_ref(&mut self, id: ClassId) -> &mut Self {
        self.sink.reference(self.model, id);
        self
    }

    /// Print the simple name of a class being declared.
    pub fn declared_name(&mut self, id: ClassId) -> &mut Self {
        self.sink.declared_type(self.model, id);
        let model = self.model;
        self.p(model.class(id).name())
    }

    /// `<A, B extends Bound & Other>`, or nothing.
    pub fn type_params(&mut self, params: &[TypeVar]) -> &mut Self {
        if params.is_empty() {
            return self;
        }
        self.p("<");
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.p(",");
            }
            self.id(&param.name);
            if let Some(bound) = &param.bound {
                self.p(" extends ").ty(bound);
            }
        }
        self.close_type_args()
    }

    // =========================================================================
    // Declaration parts
    // =========================================================================

    /// Print modifiers in canonical order.
    pub fn modifiers(&mut self, mods: Modifiers) -> &mut Self {
        for modifier in mods.iter() {
            self.p(modifier.keyword());
        }
        self
    }

    /// Print annotations, each on its own line when `own_line` is set.
    pub fn annotations(&mut self, annotations: &[AnnotationUse], own_line: bool) -> &mut Self {
        for annotation in annotations {
            self.g(annotation);
            if own_line {
                self.nl();
            }
        }
        self
    }

    /// Print a javadoc comment.
    pub fn javadoc(&mut self, lines: &[String]) -> &mut Self {
        if lines.is_empty() {
            return self;
        }
        self.p("/**").nl();
        for line in lines {
            if line.is_empty() {
                self.p(" *");
            } else {
                self.p(&format!(" * {line}"));
            }
            self.nl();
        }
        self.p(" */").nl()
    }
}

impl Generable for Type {
    fn generate<S: TokenSink>(&self, f: &mut Formatter<'_, S>) {
        f.ty(self);
    }
}
