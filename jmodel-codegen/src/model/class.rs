//! Class entries and their members.

use indexmap::IndexMap;
use jmodel_core::{ClassKind, Error, Modifier, Modifiers, Result, validate_identifier};

use super::{AnnotationUse, AnnotationValue, ClassId, PackageId, Type, TypeVar};
use crate::ast::{Block, Expr};

/// Where a class entry comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassOrigin {
    /// Declared in this model and rendered by it.
    Defined,
    /// An already-compiled type that is only referenced.
    External,
    /// A placeholder for a type that could not be resolved.
    Error,
    /// An anonymous class body; its base type is the superclass.
    Anonymous,
}

/// A class, interface, enum or annotation type.
///
/// Entries live in the [`CodeModel`](super::CodeModel) arena. Relations to
/// other entries (outer class, nested classes, package) are handles.
#[derive(Debug, Clone)]
pub struct ClassData {
    pub(crate) id: ClassId,
    pub(crate) name: String,
    pub(crate) kind: ClassKind,
    pub(crate) origin: ClassOrigin,
    pub(crate) package: PackageId,
    pub(crate) outer: Option<ClassId>,
    pub(crate) nested: IndexMap<String, ClassId>,
    mods: Modifiers,
    superclass: Option<Type>,
    interfaces: Vec<Type>,
    type_params: Vec<TypeVar>,
    fields: IndexMap<String, Field>,
    methods: Vec<Method>,
    enum_constants: Vec<EnumConstant>,
    init_blocks: Vec<InitBlock>,
    annotations: Vec<AnnotationUse>,
    javadoc: Vec<String>,
}

impl ClassData {
    pub(crate) fn new(
        id: ClassId,
        name: String,
        kind: ClassKind,
        origin: ClassOrigin,
        package: PackageId,
        outer: Option<ClassId>,
        mods: Modifiers,
    ) -> Self {
        Self {
            id,
            name,
            kind,
            origin,
            package,
            outer,
            nested: IndexMap::new(),
            mods,
            superclass: None,
            interfaces: Vec::new(),
            type_params: Vec::new(),
            fields: IndexMap::new(),
            methods: Vec::new(),
            enum_constants: Vec::new(),
            init_blocks: Vec::new(),
            annotations: Vec::new(),
            javadoc: Vec::new(),
        }
    }

    pub fn id(&self) -> ClassId {
        self.id
    }

    /// Simple name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    pub fn origin(&self) -> ClassOrigin {
        self.origin
    }

    pub fn is_defined(&self) -> bool {
        self.origin == ClassOrigin::Defined
    }

    pub fn is_error(&self) -> bool {
        self.origin == ClassOrigin::Error
    }

    pub fn is_anonymous(&self) -> bool {
        self.origin == ClassOrigin::Anonymous
    }

    pub fn package(&self) -> PackageId {
        self.package
    }

    /// The immediately enclosing class.
    pub fn outer(&self) -> Option<ClassId> {
        self.outer
    }

    pub fn modifiers(&self) -> Modifiers {
        self.mods
    }

    pub fn set_modifiers(&mut self, mods: Modifiers) -> &mut Self {
        self.mods = mods;
        self
    }

    pub fn superclass(&self) -> Option<&Type> {
        self.superclass.as_ref()
    }

    pub fn interfaces(&self) -> &[Type] {
        &self.interfaces
    }

    pub fn type_params(&self) -> &[TypeVar] {
        &self.type_params
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    pub fn field_named(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn field_named_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.get_mut(name)
    }

    /// Methods and constructors in declaration order.
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn methods_mut(&mut self) -> &mut [Method] {
        &mut self.methods
    }

    pub fn constructors(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter().filter(|m| m.is_constructor())
    }

    pub fn nested(&self) -> impl Iterator<Item = ClassId> + '_ {
        self.nested.values().copied()
    }

    pub fn nested_named(&self, name: &str) -> Option<ClassId> {
        self.nested.get(name).copied()
    }

    pub fn enum_constants(&self) -> &[EnumConstant] {
        &self.enum_constants
    }

    pub fn init_blocks(&self) -> &[InitBlock] {
        &self.init_blocks
    }

    pub fn annotations(&self) -> &[AnnotationUse] {
        &self.annotations
    }

    pub fn javadoc_lines(&self) -> &[String] {
        &self.javadoc
    }

    // =========================================================================
    // Builders
    // =========================================================================

    /// Set the superclass.
    pub fn extends(&mut self, ty: Type) -> Result<&mut Self> {
        if self.kind != ClassKind::Class {
            return Err(Error::construction(format!(
                "{} '{}' cannot extend a class",
                self.kind.keyword(),
                self.name
            )));
        }
        if !matches!(ty, Type::Reference(_) | Type::Narrowed { .. }) {
            return Err(Error::construction(format!(
                "'{}' can only extend a class type",
                self.name
            )));
        }
        self.superclass = Some(ty);
        Ok(self)
    }

    /// Add an implemented interface (an extended interface for interfaces).
    pub fn implements(&mut self, ty: Type) -> Result<&mut Self> {
        if !matches!(ty, Type::Reference(_) | Type::Narrowed { .. }) {
            return Err(Error::construction(format!(
                "'{}' can only implement interface types",
                self.name
            )));
        }
        if !self.interfaces.contains(&ty) {
            self.interfaces.push(ty);
        }
        Ok(self)
    }

    pub(crate) fn set_anonymous_base(&mut self, base: Type) {
        self.superclass = Some(base);
    }

    /// Declare a type parameter and return a reference to it.
    pub fn generify(&mut self, name: &str) -> Result<Type> {
        self.generify_var(TypeVar::new(name))
    }

    /// Declare a bounded type parameter (`T extends Bound`).
    pub fn generify_bounded(&mut self, name: &str, bound: Type) -> Result<Type> {
        self.generify_var(TypeVar::bounded(name, bound))
    }

    fn generify_var(&mut self, var: TypeVar) -> Result<Type> {
        push_type_param(&mut self.type_params, var, &self.name)
    }

    /// Add a field.
    pub fn field(&mut self, mods: Modifiers, ty: Type, name: &str) -> Result<&mut Field> {
        check_identifier(name, "field")?;
        if self.fields.contains_key(name) {
            return Err(Error::name_collision(name, format!("fields of {}", self.name)));
        }
        let field = Field {
            mods,
            ty,
            name: name.to_string(),
            init: None,
            annotations: Vec::new(),
            javadoc: Vec::new(),
        };
        Ok(self.fields.entry(name.to_string()).or_insert(field))
    }

    /// Rename a field in place; its declaration order is kept.
    pub fn rename_field(&mut self, old: &str, new: &str) -> Result<&mut Field> {
        check_identifier(new, "field")?;
        if old != new && self.fields.contains_key(new) {
            return Err(Error::name_collision(new, format!("fields of {}", self.name)));
        }
        let Some((index, _, mut field)) = self.fields.shift_remove_full(old) else {
            return Err(Error::illegal_state(format!(
                "{} has no field named '{old}'",
                self.name
            )));
        };
        field.name = new.to_string();
        self.fields.shift_insert(index, new.to_string(), field);
        Ok(&mut self.fields[index])
    }

    /// Add a method. Abstract, native and plain interface methods start
    /// without a body.
    pub fn method(&mut self, mods: Modifiers, return_type: Type, name: &str) -> Result<&mut Method> {
        check_identifier(name, "method")?;
        let bodyless = mods.contains(Modifier::Abstract)
            || mods.contains(Modifier::Native)
            || (self.kind.is_interface()
                && !mods.contains(Modifier::Default)
                && !mods.contains(Modifier::Static));
        let method = Method::new(self.id, name.to_string(), false, mods, Some(return_type), !bodyless);
        let index = self.methods.len();
        self.methods.push(method);
        Ok(&mut self.methods[index])
    }

    /// Add a constructor.
    pub fn constructor(&mut self, mods: Modifiers) -> &mut Method {
        let ctor = Method::new(self.id, self.name.clone(), true, mods, None, true);
        let index = self.methods.len();
        self.methods.push(ctor);
        &mut self.methods[index]
    }

    /// Add an enum constant.
    pub fn enum_constant(&mut self, name: &str) -> Result<&mut EnumConstant> {
        if self.kind != ClassKind::Enum {
            return Err(Error::construction(format!(
                "'{}' is not an enum and cannot declare constant '{name}'",
                self.name
            )));
        }
        check_identifier(name, "enum constant")?;
        if self.enum_constants.iter().any(|c| c.name == name) {
            return Err(Error::name_collision(
                name,
                format!("constants of {}", self.name),
            ));
        }
        let index = self.enum_constants.len();
        self.enum_constants.push(EnumConstant {
            name: name.to_string(),
            args: Vec::new(),
            javadoc: Vec::new(),
        });
        Ok(&mut self.enum_constants[index])
    }

    /// Add an instance or static initializer and return its body.
    pub fn init_block(&mut self, is_static: bool) -> &mut Block {
        let index = self.init_blocks.len();
        self.init_blocks.push(InitBlock {
            is_static,
            body: Block::new(),
        });
        &mut self.init_blocks[index].body
    }

    /// Annotate the class.
    pub fn annotate(&mut self, annotation: ClassId) -> &mut AnnotationUse {
        push_annotation(&mut self.annotations, annotation)
    }

    /// Append a javadoc line.
    pub fn javadoc(&mut self, line: impl Into<String>) -> &mut Self {
        self.javadoc.push(line.into());
        self
    }
}

fn check_identifier(name: &str, what: &str) -> Result<()> {
    match validate_identifier(name) {
        Some(reason) => Err(Error::construction(format!("invalid {what} name '{name}': {reason}"))),
        None => Ok(()),
    }
}

pub(crate) fn check_type_name(name: &str) -> Result<()> {
    check_identifier(name, "type")
}

fn push_type_param(params: &mut Vec<TypeVar>, var: TypeVar, owner: &str) -> Result<Type> {
    check_identifier(&var.name, "type parameter")?;
    if params.iter().any(|p| p.name == var.name) {
        return Err(Error::name_collision(
            var.name,
            format!("type parameters of {owner}"),
        ));
    }
    let reference = Type::Var(var.clone());
    params.push(var);
    Ok(reference)
}

fn push_annotation(annotations: &mut Vec<AnnotationUse>, annotation: ClassId) -> &mut AnnotationUse {
    let index = annotations.len();
    annotations.push(AnnotationUse::new(annotation));
    &mut annotations[index]
}

/// A field declaration.
#[derive(Debug, Clone)]
pub struct Field {
    pub mods: Modifiers,
    pub ty: Type,
    name: String,
    pub init: Option<Expr>,
    annotations: Vec<AnnotationUse>,
    javadoc: Vec<String>,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the initializer.
    pub fn init(&mut self, init: Expr) -> &mut Self {
        self.init = Some(init);
        self
    }

    pub fn annotate(&mut self, annotation: ClassId) -> &mut AnnotationUse {
        push_annotation(&mut self.annotations, annotation)
    }

    pub fn annotations(&self) -> &[AnnotationUse] {
        &self.annotations
    }

    pub fn javadoc(&mut self, line: impl Into<String>) -> &mut Self {
        self.javadoc.push(line.into());
        self
    }

    pub fn javadoc_lines(&self) -> &[String] {
        &self.javadoc
    }

    /// An expression naming this field (`name`).
    pub fn as_expr(&self) -> Expr {
        Expr::name(&self.name)
    }
}

/// A method parameter.
#[derive(Debug, Clone)]
pub struct Param {
    pub mods: Modifiers,
    pub ty: Type,
    name: String,
    annotations: Vec<AnnotationUse>,
}

impl Param {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn annotate(&mut self, annotation: ClassId) -> &mut AnnotationUse {
        push_annotation(&mut self.annotations, annotation)
    }

    pub fn annotations(&self) -> &[AnnotationUse] {
        &self.annotations
    }
}

/// A method or constructor.
#[derive(Debug, Clone)]
pub struct Method {
    owner: ClassId,
    name: String,
    constructor: bool,
    pub mods: Modifiers,
    return_type: Option<Type>,
    type_params: Vec<TypeVar>,
    params: Vec<Param>,
    varargs: Option<Param>,
    throws: Vec<Type>,
    annotations: Vec<AnnotationUse>,
    body: Option<Block>,
    default_value: Option<AnnotationValue>,
    javadoc: Vec<String>,
}

impl Method {
    fn new(
        owner: ClassId,
        name: String,
        constructor: bool,
        mods: Modifiers,
        return_type: Option<Type>,
        has_body: bool,
    ) -> Self {
        Self {
            owner,
            name,
            constructor,
            mods,
            return_type,
            type_params: Vec::new(),
            params: Vec::new(),
            varargs: None,
            throws: Vec::new(),
            annotations: Vec::new(),
            body: has_body.then(Block::new),
            default_value: None,
            javadoc: Vec::new(),
        }
    }

    /// The declaring class.
    pub fn owner(&self) -> ClassId {
        self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_constructor(&self) -> bool {
        self.constructor
    }

    /// Return type; `None` for constructors.
    pub fn return_type(&self) -> Option<&Type> {
        self.return_type.as_ref()
    }

    pub fn type_params(&self) -> &[TypeVar] {
        &self.type_params
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn varargs_param(&self) -> Option<&Param> {
        self.varargs.as_ref()
    }

    /// The parameter at `index`, counting the varargs parameter last.
    pub fn param_mut(&mut self, index: usize) -> Option<&mut Param> {
        if index == self.params.len() {
            return self.varargs.as_mut();
        }
        self.params.get_mut(index)
    }

    pub fn throws_list(&self) -> &[Type] {
        &self.throws
    }

    pub fn annotations(&self) -> &[AnnotationUse] {
        &self.annotations
    }

    pub fn body(&self) -> Option<&Block> {
        self.body.as_ref()
    }

    pub fn default_value(&self) -> Option<&AnnotationValue> {
        self.default_value.as_ref()
    }

    pub fn javadoc_lines(&self) -> &[String] {
        &self.javadoc
    }

    /// Declare a method type parameter.
    pub fn generify(&mut self, name: &str) -> Result<Type> {
        push_type_param(&mut self.type_params, TypeVar::new(name), &self.name)
    }

    /// Declare a bounded method type parameter.
    pub fn generify_bounded(&mut self, name: &str, bound: Type) -> Result<Type> {
        push_type_param(&mut self.type_params, TypeVar::bounded(name, bound), &self.name)
    }

    /// Add a parameter and return an expression naming it.
    pub fn param(&mut self, ty: Type, name: &str) -> Result<Expr> {
        self.param_with(Modifiers::NONE, ty, name).map(|p| Expr::name(&p.name))
    }

    /// Add a parameter with modifiers and return it for further decoration.
    pub fn param_with(&mut self, mods: Modifiers, ty: Type, name: &str) -> Result<&mut Param> {
        self.check_param_name(name)?;
        if self.varargs.is_some() {
            return Err(Error::construction(format!(
                "cannot add '{name}' to {} after its varargs parameter",
                self.name
            )));
        }
        let index = self.params.len();
        self.params.push(Param {
            mods,
            ty,
            name: name.to_string(),
            annotations: Vec::new(),
        });
        Ok(&mut self.params[index])
    }

    /// Set the trailing varargs parameter (`T... name`). `ty` is the element type.
    pub fn varargs(&mut self, ty: Type, name: &str) -> Result<Expr> {
        self.check_param_name(name)?;
        if self.varargs.is_some() {
            return Err(Error::construction(format!(
                "{} already has a varargs parameter",
                self.name
            )));
        }
        self.varargs = Some(Param {
            mods: Modifiers::NONE,
            ty,
            name: name.to_string(),
            annotations: Vec::new(),
        });
        Ok(Expr::name(name))
    }

    fn check_param_name(&self, name: &str) -> Result<()> {
        check_identifier(name, "parameter")?;
        let taken = self.params.iter().chain(self.varargs.iter()).any(|p| p.name == name);
        if taken {
            return Err(Error::name_collision(
                name,
                format!("parameters of {}", self.name),
            ));
        }
        Ok(())
    }

    /// Add a thrown exception type.
    pub fn throws(&mut self, ty: Type) -> &mut Self {
        if !self.throws.contains(&ty) {
            self.throws.push(ty);
        }
        self
    }

    /// The body, created empty if the method had none.
    pub fn body_mut(&mut self) -> &mut Block {
        self.body.get_or_insert_with(Block::new)
    }

    /// Drop the body, turning the method into a declaration.
    pub fn remove_body(&mut self) -> &mut Self {
        self.body = None;
        self
    }

    /// Default value of an annotation type member.
    pub fn set_default(&mut self, value: impl Into<AnnotationValue>) -> &mut Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn annotate(&mut self, annotation: ClassId) -> &mut AnnotationUse {
        push_annotation(&mut self.annotations, annotation)
    }

    pub fn javadoc(&mut self, line: impl Into<String>) -> &mut Self {
        self.javadoc.push(line.into());
        self
    }
}

/// An enum constant with optional constructor arguments.
#[derive(Debug, Clone)]
pub struct EnumConstant {
    name: String,
    pub args: Vec<Expr>,
    javadoc: Vec<String>,
}

impl EnumConstant {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arg(&mut self, arg: Expr) -> &mut Self {
        self.args.push(arg);
        self
    }

    pub fn javadoc(&mut self, line: impl Into<String>) -> &mut Self {
        self.javadoc.push(line.into());
        self
    }

    pub fn javadoc_lines(&self) -> &[String] {
        &self.javadoc
    }
}

/// An instance or static initializer block.
#[derive(Debug, Clone)]
pub struct InitBlock {
    pub is_static: bool,
    pub body: Block,
}
