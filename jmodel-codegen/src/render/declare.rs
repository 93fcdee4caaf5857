//! Declarations: classes, members and annotations.

use jmodel_core::ClassKind;

use super::formatter::{Declarable, Formatter, Generable, TokenSink};
use crate::ast::Expr;
use crate::model::{
    AnnotationUse, AnnotationValue, ClassId, EnumConstant, Field, InitBlock, Method, Param, Type,
};

impl<S: TokenSink> Formatter<'_, S> {
    /// Print a class declaration, header and body, followed by a newline.
    pub fn declare_class(&mut self, id: ClassId) -> &mut Self {
        let model = self.model();
        let class = model.class(id);

        self.javadoc(class.javadoc_lines())
            .annotations(class.annotations(), true)
            .modifiers(class.modifiers())
            .p(class.kind().keyword())
            .declared_name(id)
            .type_params(class.type_params());

        match class.kind() {
            ClassKind::Interface | ClassKind::Annotation => {
                if !class.interfaces().is_empty() {
                    self.p(" extends ").types(class.interfaces());
                }
            }
            ClassKind::Class | ClassKind::Enum => {
                let object = Type::Reference(model.object());
                if let Some(superclass) = class.superclass().filter(|s| **s != object) {
                    self.p(" extends ").ty(superclass);
                }
                if !class.interfaces().is_empty() {
                    self.p(" implements ").types(class.interfaces());
                }
            }
        }

        self.class_body(id).nl()
    }

    /// Print `{ ... }` with the members of a class. Also used for the body
    /// of anonymous classes.
    pub fn class_body(&mut self, id: ClassId) -> &mut Self {
        let model = self.model();
        let class = model.class(id);

        self.p("{").nl().i();

        let constants = class.enum_constants();
        for (i, constant) in constants.iter().enumerate() {
            self.d(constant);
            if i + 1 < constants.len() {
                self.p(",").nl();
            } else {
                self.p(";").nl();
            }
        }

        let has_members = class.fields().next().is_some()
            || !class.init_blocks().is_empty()
            || !class.methods().is_empty()
            || class.nested().next().is_some();
        if class.kind() == ClassKind::Enum && constants.is_empty() && has_members {
            self.p(";").nl();
        }

        let mut printed = !constants.is_empty();
        let mut fields = class.fields().peekable();
        if fields.peek().is_some() {
            if printed {
                self.nl();
            }
            for field in fields {
                self.d(field);
            }
            printed = true;
        }

        for block in class.init_blocks() {
            self.separate(&mut printed).d(block);
        }
        for ctor in class.constructors() {
            self.separate(&mut printed).d(ctor);
        }
        for method in class.methods().iter().filter(|m| !m.is_constructor()) {
            self.separate(&mut printed).d(method);
        }
        for nested in class.nested() {
            self.separate(&mut printed).declare_class(nested);
        }

        self.o().p("}")
    }

    /// A blank line between member groups, except before the first one.
    fn separate(&mut self, printed: &mut bool) -> &mut Self {
        if *printed {
            self.nl();
        }
        *printed = true;
        self
    }
}

impl Declarable for ClassId {
    fn declare<S: TokenSink>(&self, f: &mut Formatter<'_, S>) {
        f.declare_class(*self);
    }
}

impl Declarable for EnumConstant {
    fn declare<S: TokenSink>(&self, f: &mut Formatter<'_, S>) {
        f.javadoc(self.javadoc_lines()).id(self.name());
        if !self.args.is_empty() {
            f.p("(").list(&self.args).p(")");
        }
    }
}

impl Declarable for Field {
    fn declare<S: TokenSink>(&self, f: &mut Formatter<'_, S>) {
        f.javadoc(self.javadoc_lines())
            .annotations(self.annotations(), true)
            .modifiers(self.mods)
            .ty(&self.ty)
            .id(self.name());
        if let Some(init) = &self.init {
            f.p(" = ").g(init);
        }
        f.p(";").nl();
    }
}

impl Declarable for InitBlock {
    fn declare<S: TokenSink>(&self, f: &mut Formatter<'_, S>) {
        if self.is_static {
            f.p("static");
        }
        f.g(&self.body).nl();
    }
}

impl Declarable for Param {
    fn declare<S: TokenSink>(&self, f: &mut Formatter<'_, S>) {
        f.annotations(self.annotations(), false)
            .modifiers(self.mods)
            .ty(&self.ty)
            .id(self.name());
    }
}

impl Declarable for Method {
    fn declare<S: TokenSink>(&self, f: &mut Formatter<'_, S>) {
        f.javadoc(self.javadoc_lines())
            .annotations(self.annotations(), true)
            .modifiers(self.mods);
        if !self.type_params().is_empty() {
            if !self.mods.is_empty() {
                f.p(" ");
            }
            f.type_params(self.type_params());
        }

        match self.return_type() {
            Some(ty) => {
                f.ty(ty).id(self.name());
            }
            None => {
                f.p(self.name());
            }
        }

        f.p("(");
        for (i, param) in self.params().iter().enumerate() {
            if i > 0 {
                f.p(",");
            }
            f.d(param);
        }
        if let Some(varargs) = self.varargs_param() {
            if !self.params().is_empty() {
                f.p(",");
            }
            f.annotations(varargs.annotations(), false)
                .modifiers(varargs.mods)
                .ty(&varargs.ty)
                .p("... ")
                .id(varargs.name());
        }
        f.p(")");

        if !self.throws_list().is_empty() {
            f.p(" throws ").types(self.throws_list());
        }
        if let Some(value) = self.default_value() {
            f.p(" default ").g(value);
        }
        match self.body() {
            Some(body) => f.g(body),
            None => f.p(";"),
        };
        f.nl();
    }
}

impl Generable for AnnotationUse {
    fn generate<S: TokenSink>(&self, f: &mut Formatter<'_, S>) {
        f.p("@").class_ref(self.annotation());
        if self.is_empty() {
            return;
        }
        f.p("(");
        if self.is_single_value() {
            if let Some(value) = self.get("value") {
                f.g(value);
            }
        } else {
            for (i, (name, value)) in self.members().enumerate() {
                if i > 0 {
                    f.p(",");
                }
                f.p(name).p(" = ").g(value);
            }
        }
        f.p(")");
    }
}

impl Generable for AnnotationValue {
    fn generate<S: TokenSink>(&self, f: &mut Formatter<'_, S>) {
        match self {
            AnnotationValue::Bool(value) => f.g(&Expr::bool(*value)),
            AnnotationValue::Int(value) => f.g(&Expr::int(*value)),
            AnnotationValue::Long(value) => f.g(&Expr::long(*value)),
            AnnotationValue::Float(value) => f.g(&Expr::float(*value)),
            AnnotationValue::Double(value) => f.g(&Expr::double(*value)),
            AnnotationValue::Char(value) => f.g(&Expr::char(*value)),
            AnnotationValue::String(value) => f.g(&Expr::string(value.as_str())),
            AnnotationValue::Class(ty) => f.ty(ty).p(".class"),
            AnnotationValue::Enum { ty, constant } => f.class_ref(*ty).p(".").p(constant),
            AnnotationValue::Annotation(annotation) => f.g(annotation),
            AnnotationValue::Array(items) => f.p("{").list(items).p("}"),
        };
    }
}
