//! Two-phase construction of a code model from declaration records.
//!
//! Every type is declared before any member is filled in, so members may
//! refer to types declared later in the set, or to each other. Annotation
//! member defaults and annotations come last, once every annotation type has
//! its members and its shape can be derived.

use std::collections::HashMap;

use jmodel_codegen::{
    AnnotationShape, AnnotationUse, AnnotationValue, AnnotationWriter, ClassId, ClassOwner,
    CodeModel, MemberKind, Primitive, Type,
};
use jmodel_core::{ClassKind, Error};

use crate::element::{
    AnnotationMirror, AnnotationValueMirror, DeclarationSet, ErrorTypePolicy, MethodElement,
    TaggedValue, TypeElement, TypeMirror, TypeParamElement,
};
use crate::{AdapterError, Result, mapping};

/// A model built from a declaration set.
#[derive(Debug)]
pub struct AdaptedModel {
    pub model: CodeModel,
    /// Top-level classes, in declaration order.
    pub classes: Vec<ClassId>,
}

/// Builds [`CodeModel`] entities from declaration records.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelAdapter {
    policy: ErrorTypePolicy,
}

impl ModelAdapter {
    pub fn new(policy: ErrorTypePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ErrorTypePolicy {
        self.policy
    }

    /// Build a fresh model holding every declaration of `set`.
    pub fn build(&self, set: &DeclarationSet) -> Result<AdaptedModel> {
        let mut model = CodeModel::new();
        let classes = self.build_into(&mut model, set)?;
        Ok(AdaptedModel { model, classes })
    }

    /// Add the declarations of `set` to `model` and return the new
    /// top-level classes.
    pub fn build_into(&self, model: &mut CodeModel, set: &DeclarationSet) -> Result<Vec<ClassId>> {
        let mut builder = Builder {
            model,
            policy: self.policy,
            declared: HashMap::new(),
            types: Vec::new(),
            defaults: Vec::new(),
            annotations: Vec::new(),
            shapes: HashMap::new(),
        };

        let mut top_level = Vec::new();
        for package in &set.packages {
            let pkg = builder.model.package(&package.name);
            for element in &package.types {
                let id = builder.declare(pkg.into(), &package.name, element, &Scope::default())?;
                top_level.push(id);
            }
        }

        let types = std::mem::take(&mut builder.types);
        for (id, element, scope) in &types {
            builder.fill(*id, *element, scope)?;
        }

        builder.apply_defaults()?;
        builder.apply_annotations()?;

        tracing::debug!(
            "adapted {} top-level types ({} in total)",
            top_level.len(),
            types.len()
        );
        Ok(top_level)
    }
}

/// Type variables visible at some point of a declaration.
#[derive(Debug, Clone, Default)]
struct Scope {
    owner: String,
    vars: Vec<String>,
}

impl Scope {
    fn child(&self, owner: impl Into<String>, params: &[TypeParamElement]) -> Scope {
        let mut vars = self.vars.clone();
        vars.extend(params.iter().map(|p| p.name.clone()));
        Scope {
            owner: owner.into(),
            vars,
        }
    }

    fn contains(&self, name: &str) -> bool {
        self.vars.iter().any(|v| v == name)
    }
}

/// Where an annotation goes once it is built.
#[derive(Debug)]
enum Target {
    Class(ClassId),
    Field(ClassId, String),
    Method(ClassId, usize),
    Param(ClassId, usize, usize),
}

struct Builder<'m, 's> {
    model: &'m mut CodeModel,
    policy: ErrorTypePolicy,
    /// Qualified names of the classes this set declares.
    declared: HashMap<String, ClassId>,
    types: Vec<(ClassId, &'s TypeElement, Scope)>,
    defaults: Vec<(ClassId, usize, &'s AnnotationValueMirror)>,
    annotations: Vec<(Target, &'s AnnotationMirror)>,
    shapes: HashMap<ClassId, Option<AnnotationShape>>,
}

impl<'s> Builder<'_, 's> {
    // =========================================================================
    // Phase 1: declare
    // =========================================================================

    fn declare(
        &mut self,
        owner: ClassOwner,
        prefix: &str,
        element: &'s TypeElement,
        parent: &Scope,
    ) -> Result<ClassId> {
        let kind = mapping::class_kind(element.kind, &element.name)?;
        let qualified = qualify(prefix, &element.name);
        let mods = mapping::type_modifiers(kind, &element.modifiers, &qualified);
        let id = self.model.define_class(owner, mods, &element.name, kind)?;
        tracing::trace!("declared {} {qualified}", kind.keyword());

        let scope = parent.child(qualified.as_str(), &element.type_params);
        self.declared.insert(qualified.clone(), id);
        self.types.push((id, element, scope.clone()));
        for nested in &element.nested {
            self.declare(id.into(), &qualified, nested, &scope)?;
        }
        Ok(id)
    }

    // =========================================================================
    // Phase 2: fill members
    // =========================================================================

    fn fill(&mut self, id: ClassId, element: &'s TypeElement, scope: &Scope) -> Result<()> {
        for param in &element.type_params {
            let bound = self.bound(param, scope)?;
            let class = self.model.class_mut(id);
            match bound {
                Some(bound) => class.generify_bounded(&param.name, bound)?,
                None => class.generify(&param.name)?,
            };
        }

        if let Some(superclass) = &element.superclass {
            let ty = self.to_type(superclass, scope)?;
            let is_object = ty.class_id() == Some(self.model.object());
            if self.model.class(id).kind() == ClassKind::Class && !is_object {
                self.model.class_mut(id).extends(ty)?;
            }
        }
        for interface in &element.interfaces {
            let ty = self.to_type(interface, scope)?;
            self.model.class_mut(id).implements(ty)?;
        }

        let class = self.model.class_mut(id);
        for line in &element.javadoc {
            class.javadoc(line.as_str());
        }
        for constant in &element.constants {
            class.enum_constant(constant)?;
        }

        for field in &element.fields {
            let ty = self.to_type(&field.ty, scope)?;
            let owner = format!("{}.{}", scope.owner, field.name);
            let mods = mapping::modifiers(&field.modifiers, &owner);
            let decl = self.model.class_mut(id).field(mods, ty, &field.name)?;
            for line in &field.javadoc {
                decl.javadoc(line.as_str());
            }
            for annotation in &field.annotations {
                self.annotations
                    .push((Target::Field(id, field.name.clone()), annotation));
            }
        }

        for method in &element.methods {
            self.fill_method(id, method, scope)?;
        }

        for annotation in &element.annotations {
            self.annotations.push((Target::Class(id), annotation));
        }
        Ok(())
    }

    fn fill_method(&mut self, id: ClassId, method: &'s MethodElement, scope: &Scope) -> Result<()> {
        let name = if method.constructor {
            self.model.class(id).name().to_string()
        } else {
            method.name.clone()
        };
        let owner = format!("{}.{}", scope.owner, name);
        let scope = scope.child(owner.as_str(), &method.type_params);

        let mut type_params = Vec::with_capacity(method.type_params.len());
        for param in &method.type_params {
            type_params.push((param.name.as_str(), self.bound(param, &scope)?));
        }
        let return_type = match &method.returns {
            Some(ty) => self.to_type(ty, &scope)?,
            None => Primitive::Void.into(),
        };
        let mut params = Vec::with_capacity(method.params.len());
        for param in &method.params {
            let ty = self.to_type(&param.ty, &scope)?;
            let mods = mapping::modifiers(&param.modifiers, &owner);
            params.push((mods, ty, param.name.as_str()));
        }
        let mut throws = Vec::with_capacity(method.throws.len());
        for ty in &method.throws {
            throws.push(self.to_type(ty, &scope)?);
        }

        let mods = mapping::modifiers(&method.modifiers, &owner);
        let class = self.model.class_mut(id);
        let index = class.methods().len();
        let target = if method.constructor {
            class.constructor(mods)
        } else {
            class.method(mods, return_type, &method.name)?
        };

        for (name, bound) in type_params {
            match bound {
                Some(bound) => target.generify_bounded(name, bound)?,
                None => target.generify(name)?,
            };
        }
        let count = params.len();
        for (i, (mods, ty, name)) in params.into_iter().enumerate() {
            if method.varargs && i + 1 == count {
                let element = match ty {
                    Type::Array(component) => *component,
                    other => other,
                };
                target.varargs(element, name)?;
                if let Some(param) = target.param_mut(i) {
                    param.mods = mods;
                }
            } else {
                target.param_with(mods, ty, name)?;
            }
        }
        for ty in throws {
            target.throws(ty);
        }
        for line in &method.javadoc {
            target.javadoc(line.as_str());
        }

        if let Some(default) = &method.default {
            self.defaults.push((id, index, default));
        }
        for annotation in &method.annotations {
            self.annotations.push((Target::Method(id, index), annotation));
        }
        for (i, param) in method.params.iter().enumerate() {
            for annotation in &param.annotations {
                self.annotations
                    .push((Target::Param(id, index, i), annotation));
            }
        }
        Ok(())
    }

    fn bound(&mut self, param: &TypeParamElement, scope: &Scope) -> Result<Option<Type>> {
        param
            .bound
            .as_ref()
            .map(|bound| self.to_type(bound, scope))
            .transpose()
    }

    // =========================================================================
    // Phase 3: annotation defaults and annotations
    // =========================================================================

    fn apply_defaults(&mut self) -> Result<()> {
        for (id, index, value) in std::mem::take(&mut self.defaults) {
            let model: &CodeModel = self.model;
            let method = &model.class(id).methods()[index];
            let hint = method.return_type().and_then(|ty| member_hint(model, ty));
            let name = method.name().to_string();
            let value = self.annotation_value(value, hint.as_ref(), &name)?;
            self.model.class_mut(id).methods_mut()[index].set_default(value);
        }
        Ok(())
    }

    fn apply_annotations(&mut self) -> Result<()> {
        for (target, mirror) in std::mem::take(&mut self.annotations) {
            let built = self.build_annotation(mirror)?;
            let slot = match &target {
                Target::Class(id) => Some(self.model.class_mut(*id).annotate(built.annotation())),
                Target::Field(id, name) => self
                    .model
                    .class_mut(*id)
                    .field_named_mut(name)
                    .map(|field| field.annotate(built.annotation())),
                Target::Method(id, index) => self
                    .model
                    .class_mut(*id)
                    .methods_mut()
                    .get_mut(*index)
                    .map(|method| method.annotate(built.annotation())),
                Target::Param(id, index, param) => self
                    .model
                    .class_mut(*id)
                    .methods_mut()
                    .get_mut(*index)
                    .and_then(|method| method.param_mut(*param))
                    .map(|param| param.annotate(built.annotation())),
            };
            match slot {
                Some(slot) => *slot = built,
                None => {
                    return Err(Error::illegal_state(format!(
                        "annotation target {target:?} disappeared while adapting"
                    ))
                    .into());
                }
            }
        }
        Ok(())
    }

    fn build_annotation(&mut self, mirror: &AnnotationMirror) -> Result<AnnotationUse> {
        let id = self.resolve_class(&mirror.ty)?;
        let mut annotation = AnnotationUse::new(id);

        match self.shape(id) {
            Some(shape) => {
                let mut values = Vec::with_capacity(mirror.values.len());
                for (member, value) in &mirror.values {
                    let hint = shape.get(member).map(|m| m.kind.clone());
                    values.push((member, self.annotation_value(value, hint.as_ref(), member)?));
                }
                let mut writer = AnnotationWriter::new(&shape, &mut annotation)?;
                for (member, value) in values {
                    writer.set(member, value)?;
                }
            }
            None => {
                for (member, value) in &mirror.values {
                    let value = self.annotation_value(value, None, member)?;
                    annotation.param(member.as_str(), value);
                }
            }
        }
        Ok(annotation)
    }

    /// The shape of an annotation type this set declares, derived once.
    ///
    /// Annotation types from outside the set have no members in the model,
    /// so their uses are written without validation. The same holds for
    /// declared ones whose members use external enum or annotation types.
    fn shape(&mut self, id: ClassId) -> Option<AnnotationShape> {
        if let Some(cached) = self.shapes.get(&id) {
            return cached.clone();
        }
        let class = self.model.class(id);
        let shape = if class.is_defined() && class.kind() == ClassKind::Annotation {
            match AnnotationShape::from_declaration(self.model, id) {
                Ok(shape) => Some(shape),
                Err(err) => {
                    tracing::warn!(
                        "writing uses of {} without validation: {err}",
                        self.model.full_name(id)
                    );
                    None
                }
            }
        } else {
            None
        };
        self.shapes.insert(id, shape.clone());
        shape
    }

    fn annotation_value(
        &mut self,
        value: &AnnotationValueMirror,
        hint: Option<&MemberKind>,
        member: &str,
    ) -> Result<AnnotationValue> {
        use AnnotationValueMirror as M;

        Ok(match value {
            M::Bool(value) => AnnotationValue::Bool(*value),
            M::Int(value) => match hint {
                Some(MemberKind::Long) => AnnotationValue::Long(*value),
                Some(MemberKind::Float) => AnnotationValue::Float(*value as f32),
                Some(MemberKind::Double) => AnnotationValue::Double(*value as f64),
                _ => match i32::try_from(*value) {
                    Ok(int) => AnnotationValue::Int(int),
                    Err(_) => AnnotationValue::Long(*value),
                },
            },
            M::Float(value) => match hint {
                Some(MemberKind::Float) => AnnotationValue::Float(*value as f32),
                _ => AnnotationValue::Double(*value),
            },
            M::String(value) => match hint {
                Some(MemberKind::Char) => {
                    let mut chars = value.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => AnnotationValue::Char(c),
                        _ => {
                            return Err(AdapterError::invalid_value(
                                member,
                                format!("expected a single character, found \"{value}\""),
                            ));
                        }
                    }
                }
                Some(MemberKind::Enum(ty)) => AnnotationValue::enum_constant(*ty, value.as_str()),
                _ => AnnotationValue::String(value.clone()),
            },
            M::Array(items) => {
                let element = match hint {
                    Some(MemberKind::Array(element)) => Some(element.as_ref()),
                    other => other,
                };
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    if matches!(item, M::Array(_)) {
                        return Err(AdapterError::invalid_value(
                            member,
                            "annotation arrays cannot be nested",
                        ));
                    }
                    values.push(self.annotation_value(item, element, member)?);
                }
                AnnotationValue::Array(values)
            }
            M::Tagged(TaggedValue::Char { value }) => AnnotationValue::Char(*value),
            M::Tagged(TaggedValue::Long { value }) => AnnotationValue::Long(*value),
            M::Tagged(TaggedValue::Class { ty }) => {
                let scope = Scope {
                    owner: format!("annotation member '{member}'"),
                    vars: Vec::new(),
                };
                AnnotationValue::Class(self.to_type(ty, &scope)?)
            }
            M::Tagged(TaggedValue::Enum { ty, constant }) => {
                AnnotationValue::enum_constant(self.resolve_class(ty)?, constant.as_str())
            }
            M::Tagged(TaggedValue::Annotation(mirror)) => {
                AnnotationValue::Annotation(self.build_annotation(mirror)?)
            }
        })
    }

    // =========================================================================
    // Types
    // =========================================================================

    /// A class this set declares, or an external reference.
    fn resolve_class(&mut self, name: &str) -> Result<ClassId> {
        if let Some(id) = self.declared.get(&name.replace('$', ".")) {
            return Ok(*id);
        }
        Ok(self.model.reference(name)?)
    }

    fn to_type(&mut self, mirror: &TypeMirror, scope: &Scope) -> Result<Type> {
        match mirror {
            TypeMirror::Primitive { name } => Primitive::from_keyword(name)
                .map(Type::from)
                .ok_or_else(|| Box::new(AdapterError::UnknownPrimitive { name: name.clone() })),
            TypeMirror::Declared { name, args } => {
                let id = self.resolve_class(name)?;
                if args.is_empty() {
                    return Ok(id.into());
                }
                let mut narrowed = Vec::with_capacity(args.len());
                for arg in args {
                    narrowed.push(self.to_type(arg, scope)?);
                }
                Ok(Type::from(id).narrow(narrowed)?)
            }
            TypeMirror::Array { component } => {
                let component = self.to_type(component, scope)?;
                Ok(Type::erased_array(component)?)
            }
            TypeMirror::TypeVar { name } => {
                if scope.contains(name) {
                    Ok(Type::var(name.as_str()))
                } else {
                    Err(Box::new(AdapterError::UnknownTypeVariable {
                        name: name.clone(),
                        scope: scope.owner.clone(),
                    }))
                }
            }
            TypeMirror::Wildcard {
                extends,
                super_bound,
            } => match (extends, super_bound) {
                (None, None) => Ok(Type::wildcard()),
                (Some(bound), None) => Ok(Type::wildcard_extends(self.to_type(bound, scope)?)),
                (None, Some(bound)) => Ok(Type::wildcard_super(self.to_type(bound, scope)?)),
                (Some(_), Some(_)) => Err(Error::construction(
                    "a wildcard has either an extends or a super bound, not both",
                )
                .into()),
            },
            TypeMirror::Error { name } => match self.policy {
                ErrorTypePolicy::Fail => Err(Box::new(AdapterError::ErrorTypeFound {
                    name: name.clone(),
                })),
                ErrorTypePolicy::Placeholder => {
                    tracing::debug!("keeping unresolved type '{name}' as a placeholder");
                    Ok(self.model.error_type(name).into())
                }
            },
        }
    }
}

fn qualify(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

/// How to read plain values given for a member of type `ty`.
fn member_hint(model: &CodeModel, ty: &Type) -> Option<MemberKind> {
    match ty {
        Type::Primitive(Primitive::Long) => Some(MemberKind::Long),
        Type::Primitive(Primitive::Float) => Some(MemberKind::Float),
        Type::Primitive(Primitive::Double) => Some(MemberKind::Double),
        Type::Primitive(Primitive::Char) => Some(MemberKind::Char),
        Type::Array(component) => {
            member_hint(model, component).map(|kind| MemberKind::Array(Box::new(kind)))
        }
        Type::Reference(id) if model.class(*id).kind() == ClassKind::Enum => {
            Some(MemberKind::Enum(*id))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn build(toml: &str) -> Result<AdaptedModel> {
        let set = DeclarationSet::from_str(toml)?;
        ModelAdapter::new(set.render.error_types).build(&set)
    }

    #[test]
    fn test_forward_references_resolve() {
        let adapted = build(
            r#"
            [[package]]
            name = "p"

            [[package.type]]
            name = "A"
            kind = "class"

            [[package.type.field]]
            name = "b"
            type = { kind = "declared", name = "p.B" }

            [[package.type]]
            name = "B"
            kind = "class"
            "#,
        )
        .unwrap();

        let model = &adapted.model;
        let (a, b) = (adapted.classes[0], adapted.classes[1]);
        let field = model.class(a).field_named("b").unwrap();
        assert_eq!(field.ty, Type::Reference(b));
        assert!(model.class(b).is_defined());
    }

    #[test]
    fn test_nested_types_are_declared_under_their_outer() {
        let adapted = build(
            r#"
            [[package]]
            name = "p"

            [[package.type]]
            name = "Outer"
            kind = "class"

            [[package.type.nested]]
            name = "Inner"
            kind = "interface"
            modifiers = ["public", "static", "abstract"]

            [[package.type.field]]
            name = "inner"
            type = { kind = "declared", name = "p.Outer$Inner" }
            "#,
        )
        .unwrap();

        let model = &adapted.model;
        let outer = adapted.classes[0];
        let inner = model.class(outer).nested_named("Inner").unwrap();
        assert_eq!(model.class(inner).modifiers(), jmodel_core::Modifiers::PUBLIC);
        assert_eq!(
            model.class(outer).field_named("inner").unwrap().ty,
            Type::Reference(inner)
        );
    }

    #[test]
    fn test_error_type_policy() {
        let source = r#"
            [[package]]
            name = "p"

            [[package.type]]
            name = "A"
            kind = "class"

            [[package.type.field]]
            name = "missing"
            type = { kind = "error", name = "Generated" }
            "#;
        let set = DeclarationSet::from_str(source).unwrap();

        let err = ModelAdapter::new(ErrorTypePolicy::Fail)
            .build(&set)
            .unwrap_err();
        assert!(err.is_error_type_found());

        let adapted = ModelAdapter::new(ErrorTypePolicy::Placeholder)
            .build(&set)
            .unwrap();
        let ty = &adapted.model.class(adapted.classes[0]).field_named("missing").unwrap().ty;
        assert!(adapted.model.is_error(ty.class_id().unwrap()));
    }

    #[test]
    fn test_undeclared_type_variable() {
        let err = build(
            r#"
            [[package]]
            name = "p"

            [[package.type]]
            name = "Box"
            kind = "class"

            [[package.type.field]]
            name = "value"
            type = { kind = "type_var", name = "T" }
            "#,
        )
        .unwrap_err();
        assert!(matches!(*err, AdapterError::UnknownTypeVariable { ref name, .. } if name == "T"));
    }

    #[test]
    fn test_unsupported_kind() {
        let err = build(
            r#"
            [[package]]
            name = "p"

            [[package.type]]
            name = "Point"
            kind = "record"
            "#,
        )
        .unwrap_err();
        assert!(matches!(*err, AdapterError::UnsupportedKind { .. }));
    }

    #[test]
    fn test_duplicate_type_is_a_collision() {
        let err = build(
            r#"
            [[package]]
            name = "p"

            [[package.type]]
            name = "A"
            kind = "class"

            [[package.type]]
            name = "A"
            kind = "enum"
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            *err,
            AdapterError::Model(Error::NameCollision { .. })
        ));
    }

    #[test]
    fn test_annotation_values_checked_against_declaration() {
        let source = |value: &str| {
            format!(
                r#"
                [[package]]
                name = "p"

                [[package.type]]
                name = "Limit"
                kind = "annotation_type"

                [[package.type.method]]
                name = "max"
                returns = {{ kind = "primitive", name = "long" }}

                [[package.type.method]]
                name = "unit"
                returns = {{ kind = "declared", name = "java.lang.String" }}
                default = "items"

                [[package.type]]
                name = "Api"
                kind = "interface"

                [[package.type.method]]
                name = "list"
                annotations = [{{ type = "p.Limit", values = {value} }}]
                "#
            )
        };

        let adapted = build(&source(r#"{ max = 10, unit = "items" }"#)).unwrap();
        let model = &adapted.model;
        let method = &model.class(adapted.classes[1]).methods()[0];
        let annotation = &method.annotations()[0];
        assert_eq!(annotation.get("max"), Some(&AnnotationValue::Long(10)));
        assert_eq!(annotation.get("unit"), None);

        let err = build(&source(r#"{ max = "ten" }"#)).unwrap_err();
        assert!(matches!(*err, AdapterError::Model(Error::TypeMismatch { .. })));

        let err = build(&source(r#"{ min = 1 }"#)).unwrap_err();
        assert!(matches!(*err, AdapterError::Model(Error::UnknownMember { .. })));
    }
}
