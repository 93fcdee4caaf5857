//! Type model: packages, classes and the types that refer to them.
//!
//! [`CodeModel`] is an arena. Packages and classes are addressed by
//! [`PackageId`] and [`ClassId`] handles, and every relation between them
//! (outer class, nested classes, owning package) is stored as a handle.
//!
//! The model is mutated through `&mut CodeModel` while it is built and read
//! through `&CodeModel` while it is rendered, so a finished model can be
//! shared between threads rendering different classes.

mod annotation;
mod class;
mod types;

use indexmap::IndexMap;
use jmodel_core::{ClassKind, Error, Modifiers, Result};

pub use annotation::{AnnotationUse, AnnotationValue};
pub use class::{ClassData, ClassOrigin, EnumConstant, Field, InitBlock, Method, Param};
pub use types::{Primitive, Type, TypeVar, Wildcard};

/// Name of the implicitly imported package.
pub const BUILTIN_PACKAGE: &str = "java.lang";

/// Handle to a package in a [`CodeModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageId(u32);

impl PackageId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle to a class entry in a [`CodeModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u32);

impl ClassId {
    fn index(self) -> usize {
        self.0 as usize
    }

    #[cfg(test)]
    pub(crate) fn from_raw(raw: u32) -> Self {
        Self(raw)
    }
}

/// A package and the top-level classes it holds.
#[derive(Debug, Clone)]
pub struct Package {
    name: String,
    classes: IndexMap<String, ClassId>,
}

impl Package {
    /// Dotted name; empty for the unnamed package.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_unnamed(&self) -> bool {
        self.name.is_empty()
    }

    /// Top-level classes (defined and referenced) in insertion order.
    pub fn classes(&self) -> impl Iterator<Item = ClassId> + '_ {
        self.classes.values().copied()
    }

    pub fn get(&self, name: &str) -> Option<ClassId> {
        self.classes.get(name).copied()
    }
}

/// Where a class is declared: directly in a package or inside another class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassOwner {
    Package(PackageId),
    Class(ClassId),
}

impl From<PackageId> for ClassOwner {
    fn from(id: PackageId) -> Self {
        Self::Package(id)
    }
}

impl From<ClassId> for ClassOwner {
    fn from(id: ClassId) -> Self {
        Self::Class(id)
    }
}

/// The root of a code model.
#[derive(Debug, Clone)]
pub struct CodeModel {
    packages: Vec<Package>,
    package_names: IndexMap<String, PackageId>,
    classes: Vec<ClassData>,
    error_types: IndexMap<String, ClassId>,
    object: ClassId,
}

impl Default for CodeModel {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeModel {
    /// Create a model holding the unnamed package, `java.lang` and
    /// `java.lang.Object`.
    pub fn new() -> Self {
        let mut model = Self {
            packages: Vec::new(),
            package_names: IndexMap::new(),
            classes: Vec::new(),
            error_types: IndexMap::new(),
            object: ClassId(0),
        };
        model.package("");
        let builtin = model.package(BUILTIN_PACKAGE);
        model.object = model.insert_top_level(
            builtin,
            "Object",
            ClassKind::Class,
            ClassOrigin::External,
            Modifiers::PUBLIC,
        );
        model
    }

    // =========================================================================
    // Packages
    // =========================================================================

    /// The unnamed package.
    pub fn root_package(&self) -> PackageId {
        PackageId(0)
    }

    /// `java.lang`.
    pub fn builtin_package(&self) -> PackageId {
        PackageId(1)
    }

    /// Get or create the package with the given dotted name.
    pub fn package(&mut self, name: &str) -> PackageId {
        if let Some(id) = self.package_names.get(name) {
            return *id;
        }
        let id = PackageId(self.packages.len() as u32);
        self.packages.push(Package {
            name: name.to_string(),
            classes: IndexMap::new(),
        });
        self.package_names.insert(name.to_string(), id);
        id
    }

    /// Find a package without creating it.
    pub fn find_package(&self, name: &str) -> Option<PackageId> {
        self.package_names.get(name).copied()
    }

    pub fn package_data(&self, id: PackageId) -> &Package {
        &self.packages[id.index()]
    }

    pub fn packages(&self) -> impl Iterator<Item = (PackageId, &Package)> {
        self.packages
            .iter()
            .enumerate()
            .map(|(i, p)| (PackageId(i as u32), p))
    }

    // =========================================================================
    // Defining classes
    // =========================================================================

    /// Define a new class in a package or as a nested class of another
    /// defined class.
    ///
    /// Fails with `NameCollision` when the name is already taken at that
    /// scope, or when a nested class would share its name with an
    /// enclosing class. The model is left untouched on failure.
    pub fn define_class(
        &mut self,
        owner: impl Into<ClassOwner>,
        mods: Modifiers,
        name: &str,
        kind: ClassKind,
    ) -> Result<ClassId> {
        class::check_type_name(name)?;
        match owner.into() {
            ClassOwner::Package(pkg) => {
                let package = &self.packages[pkg.index()];
                if package.classes.contains_key(name) {
                    let scope = if package.is_unnamed() {
                        "the unnamed package".to_string()
                    } else {
                        format!("package {}", package.name)
                    };
                    return Err(Error::name_collision(name, scope));
                }
                Ok(self.insert_top_level(pkg, name, kind, ClassOrigin::Defined, mods))
            }
            ClassOwner::Class(outer) => {
                if !self.class(outer).is_defined() {
                    return Err(Error::construction(format!(
                        "cannot declare '{name}' inside {}, which is not defined in this model",
                        self.full_name(outer)
                    )));
                }
                if self.class(outer).nested.contains_key(name) {
                    return Err(Error::name_collision(name, self.full_name(outer)));
                }
                let mut enclosing = Some(outer);
                while let Some(id) = enclosing {
                    if self.class(id).name == name {
                        return Err(Error::name_collision(
                            name,
                            format!("enclosing classes of {}", self.full_name(outer)),
                        ));
                    }
                    enclosing = self.class(id).outer;
                }
                Ok(self.insert_nested(outer, name, kind, ClassOrigin::Defined, mods))
            }
        }
    }

    /// Create an anonymous class whose base is `base`.
    ///
    /// The returned class can hold fields and methods; use it through
    /// [`Type::Anonymous`] in an instance creation expression.
    pub fn anonymous_class(&mut self, base: Type) -> Result<ClassId> {
        let Some(basis) = base.class_id() else {
            return Err(Error::construction(format!(
                "an anonymous class must extend a class or interface, not {base:?}"
            )));
        };
        let base_data = self.class(basis);
        let name = base_data.name.clone();
        let package = base_data.package;
        let id = ClassId(self.classes.len() as u32);
        let mut data = ClassData::new(
            id,
            name,
            ClassKind::Class,
            ClassOrigin::Anonymous,
            package,
            None,
            Modifiers::NONE,
        );
        data.set_anonymous_base(base);
        self.classes.push(data);
        Ok(id)
    }

    fn insert_top_level(
        &mut self,
        pkg: PackageId,
        name: &str,
        kind: ClassKind,
        origin: ClassOrigin,
        mods: Modifiers,
    ) -> ClassId {
        let id = ClassId(self.classes.len() as u32);
        self.classes.push(ClassData::new(
            id,
            name.to_string(),
            kind,
            origin,
            pkg,
            None,
            mods,
        ));
        self.packages[pkg.index()]
            .classes
            .insert(name.to_string(), id);
        id
    }

    fn insert_nested(
        &mut self,
        outer: ClassId,
        name: &str,
        kind: ClassKind,
        origin: ClassOrigin,
        mods: Modifiers,
    ) -> ClassId {
        let id = ClassId(self.classes.len() as u32);
        let package = self.class(outer).package;
        self.classes.push(ClassData::new(
            id,
            name.to_string(),
            kind,
            origin,
            package,
            Some(outer),
            mods,
        ));
        self.classes[outer.index()]
            .nested
            .insert(name.to_string(), id);
        id
    }

    // =========================================================================
    // References
    // =========================================================================

    /// Reference an already-compiled class by its binary name, such as
    /// `java.util.Map$Entry`.
    ///
    /// Returns the existing entry when the class is already known,
    /// including classes defined in this model.
    ///
    /// Nothing is registered when the name cannot be referenced.
    pub fn reference(&mut self, qualified: &str) -> Result<ClassId> {
        let (package, binary) = split_binary_name(qualified);
        let segments: Vec<&str> = binary.split('$').collect();
        self.check_reference(package, &segments)?;

        let pkg = self.package(package);
        let mut id = self.reference_in(pkg, segments[0])?;
        for segment in &segments[1..] {
            id = self.reference_nested(id, segment)?;
        }
        Ok(id)
    }

    /// Walk the known part of a binary name and validate the rest.
    fn check_reference(&self, package: &str, segments: &[&str]) -> Result<()> {
        let mut known = self
            .find_package(package)
            .and_then(|pkg| self.package_data(pkg).get(segments[0]));
        if known.is_none() {
            class::check_type_name(segments[0])?;
        }
        for segment in &segments[1..] {
            known = match known.map(|outer| (outer, self.class(outer).nested_named(segment))) {
                Some((_, Some(id))) => Some(id),
                Some((outer, None)) if self.class(outer).is_defined() => {
                    return Err(Error::illegal_state(format!(
                        "{} has no nested class named '{segment}'",
                        self.full_name(outer)
                    )));
                }
                _ => {
                    class::check_type_name(segment)?;
                    None
                }
            };
        }
        Ok(())
    }

    /// Reference a top-level class of `pkg` by simple name.
    pub fn reference_in(&mut self, pkg: PackageId, name: &str) -> Result<ClassId> {
        if let Some(id) = self.packages[pkg.index()].get(name) {
            return Ok(id);
        }
        class::check_type_name(name)?;
        Ok(self.insert_top_level(
            pkg,
            name,
            ClassKind::Class,
            ClassOrigin::External,
            Modifiers::NONE,
        ))
    }

    /// Reference a class nested in `outer`.
    ///
    /// A class defined in this model only knows the nested classes that were
    /// defined in it; asking it for any other fails with `IllegalState`.
    pub fn reference_nested(&mut self, outer: ClassId, name: &str) -> Result<ClassId> {
        if let Some(id) = self.class(outer).nested_named(name) {
            return Ok(id);
        }
        if self.class(outer).is_defined() {
            return Err(Error::illegal_state(format!(
                "{} has no nested class named '{name}'",
                self.full_name(outer)
            )));
        }
        class::check_type_name(name)?;
        Ok(self.insert_nested(
            outer,
            name,
            ClassKind::Class,
            ClassOrigin::External,
            Modifiers::NONE,
        ))
    }

    /// A placeholder for a type that could not be resolved.
    ///
    /// Placeholders live in the unnamed package, are never registered in it,
    /// and are printed by the name they were given.
    pub fn error_type(&mut self, name: &str) -> ClassId {
        if let Some(id) = self.error_types.get(name) {
            return *id;
        }
        let id = ClassId(self.classes.len() as u32);
        self.classes.push(ClassData::new(
            id,
            name.to_string(),
            ClassKind::Class,
            ClassOrigin::Error,
            self.root_package(),
            None,
            Modifiers::NONE,
        ));
        self.error_types.insert(name.to_string(), id);
        id
    }

    /// Find a class by binary name without creating it.
    pub fn lookup(&self, qualified: &str) -> Option<ClassId> {
        let (package, binary) = split_binary_name(qualified);
        let pkg = self.find_package(package)?;
        let mut segments = binary.split('$');
        let mut id = self.package_data(pkg).get(segments.next()?)?;
        for segment in segments {
            id = self.class(id).nested_named(segment)?;
        }
        Some(id)
    }

    /// `java.lang.Object`.
    pub fn object(&self) -> ClassId {
        self.object
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn class(&self, id: ClassId) -> &ClassData {
        &self.classes[id.index()]
    }

    pub fn class_mut(&mut self, id: ClassId) -> &mut ClassData {
        &mut self.classes[id.index()]
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassData> {
        self.classes.iter()
    }

    /// Canonical name, with `.` between nested classes. Anonymous classes
    /// report their base's name.
    pub fn full_name(&self, id: ClassId) -> String {
        self.qualified_name(id, '.')
    }

    /// Binary name, with `$` between nested classes.
    pub fn binary_name(&self, id: ClassId) -> String {
        self.qualified_name(id, '$')
    }

    fn qualified_name(&self, id: ClassId, separator: char) -> String {
        let data = self.class(id);
        match data.origin {
            ClassOrigin::Error => return data.name.clone(),
            ClassOrigin::Anonymous => {
                if let Some(basis) = data.superclass().and_then(Type::class_id) {
                    return self.qualified_name(basis, separator);
                }
            }
            _ => {}
        }
        if let Some(outer) = data.outer {
            return format!("{}{separator}{}", self.qualified_name(outer, separator), data.name);
        }
        let package = self.package_data(data.package);
        if package.is_unnamed() {
            data.name.clone()
        } else {
            format!("{}.{}", package.name, data.name)
        }
    }

    pub fn package_of(&self, id: ClassId) -> PackageId {
        self.class(id).package
    }

    /// The top-level class enclosing `id` (itself when top-level).
    pub fn outermost(&self, id: ClassId) -> ClassId {
        let mut current = id;
        while let Some(outer) = self.class(current).outer {
            current = outer;
        }
        current
    }

    /// Classes defined directly in `pkg`.
    pub fn top_level_classes(&self, pkg: PackageId) -> impl Iterator<Item = ClassId> + '_ {
        self.package_data(pkg)
            .classes()
            .filter(|id| self.class(*id).is_defined())
    }

    /// Every top-level class defined anywhere in the model.
    pub fn defined_classes(&self) -> impl Iterator<Item = ClassId> + '_ {
        self.packages().flat_map(|(pkg, _)| self.top_level_classes(pkg))
    }

    pub fn is_error(&self, id: ClassId) -> bool {
        self.class(id).is_error()
    }

    /// The raw form of `ty`.
    ///
    /// Type variables and wildcards erase to their bound, or to `Object`
    /// when unbounded. Anonymous classes erase to their base.
    pub fn erasure(&self, ty: &Type) -> Type {
        match ty {
            Type::Primitive(_) | Type::Reference(_) => ty.clone(),
            Type::Narrowed { basis, .. } => Type::Reference(*basis),
            Type::Array(component) => Type::Array(Box::new(self.erasure(component))),
            Type::Var(var) => match &var.bound {
                Some(bound) => self.erasure(bound),
                None => Type::Reference(self.object),
            },
            Type::Wildcard(Wildcard::Extends(bound)) => self.erasure(bound),
            Type::Wildcard(_) => Type::Reference(self.object),
            Type::Anonymous(id) => match self.class(*id).superclass() {
                Some(base) => self.erasure(base),
                None => Type::Reference(self.object),
            },
        }
    }

    /// The class immediately enclosing the class behind `ty`.
    pub fn outer(&self, ty: &Type) -> Option<ClassId> {
        ty.class_id().and_then(|id| self.class(id).outer)
    }

    /// The package of the class behind `ty`. Arrays report their
    /// component's package; primitives, type variables and wildcards have none.
    pub fn owning_package(&self, ty: &Type) -> Option<PackageId> {
        match ty {
            Type::Reference(id) | Type::Narrowed { basis: id, .. } | Type::Anonymous(id) => {
                Some(self.class(*id).package)
            }
            Type::Array(component) => self.owning_package(component),
            Type::Primitive(_) | Type::Var(_) | Type::Wildcard(_) => None,
        }
    }
}

/// Split `a.b.C$D` into its package and binary class name.
fn split_binary_name(qualified: &str) -> (&str, &str) {
    match qualified.rsplit_once('.') {
        Some((package, binary)) => (package, binary),
        None => ("", qualified),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_is_idempotent() {
        let mut model = CodeModel::new();
        let a = model.package("com.example");
        let b = model.package("com.example");
        assert_eq!(a, b);
        assert_eq!(model.package_data(a).name(), "com.example");
        assert_eq!(model.find_package("java.lang"), Some(model.builtin_package()));
        assert!(model.package_data(model.root_package()).is_unnamed());
    }

    #[test]
    fn test_define_class_collision() {
        let mut model = CodeModel::new();
        let pkg = model.package("com.example");
        let first = model
            .define_class(pkg, Modifiers::PUBLIC, "Foo", ClassKind::Class)
            .unwrap();
        let err = model
            .define_class(pkg, Modifiers::NONE, "Foo", ClassKind::Interface)
            .unwrap_err();
        assert!(matches!(err, Error::NameCollision { .. }));
        assert_eq!(model.class(first).kind(), ClassKind::Class);
        assert_eq!(model.package_data(pkg).classes().count(), 1);
    }

    #[test]
    fn test_nested_class_cannot_shadow_enclosing() {
        let mut model = CodeModel::new();
        let pkg = model.package("p");
        let outer = model
            .define_class(pkg, Modifiers::PUBLIC, "Outer", ClassKind::Class)
            .unwrap();
        let inner = model
            .define_class(outer, Modifiers::NONE, "Inner", ClassKind::Class)
            .unwrap();
        assert!(matches!(
            model.define_class(inner, Modifiers::NONE, "Outer", ClassKind::Class),
            Err(Error::NameCollision { .. })
        ));
        assert!(matches!(
            model.define_class(outer, Modifiers::NONE, "Inner", ClassKind::Enum),
            Err(Error::NameCollision { .. })
        ));
        assert_eq!(model.full_name(inner), "p.Outer.Inner");
        assert_eq!(model.binary_name(inner), "p.Outer$Inner");
        assert_eq!(model.outermost(inner), outer);
    }

    #[test]
    fn test_define_class_rejects_keyword() {
        let mut model = CodeModel::new();
        let pkg = model.package("p");
        let err = model
            .define_class(pkg, Modifiers::NONE, "class", ClassKind::Class)
            .unwrap_err();
        assert!(matches!(err, Error::Construction(_)));
    }

    #[test]
    fn test_failed_reference_registers_nothing() {
        let mut model = CodeModel::new();
        let err = model.reference("java.util.Map$1bad").unwrap_err();
        assert!(matches!(err, Error::Construction(_)));
        assert_eq!(model.lookup("java.util.Map"), None);

        assert!(model.reference("fresh.pkg.A$1x").is_err());
        assert_eq!(model.find_package("fresh.pkg"), None);

        let pkg = model.package("p");
        let outer = model
            .define_class(pkg, Modifiers::PUBLIC, "Outer", ClassKind::Class)
            .unwrap();
        let err = model.reference("p.Outer$Missing$Deeper").unwrap_err();
        assert!(matches!(err, Error::IllegalState(_)));
        assert_eq!(model.class(outer).nested().count(), 0);
    }

    #[test]
    fn test_reference_binary_name() {
        let mut model = CodeModel::new();
        let entry = model.reference("java.util.Map$Entry").unwrap();
        let map = model.reference("java.util.Map").unwrap();
        assert_eq!(model.class(entry).outer(), Some(map));
        assert_eq!(model.full_name(entry), "java.util.Map.Entry");
        assert_eq!(model.lookup("java.util.Map$Entry"), Some(entry));
        assert_eq!(model.lookup("java.util.Set"), None);
    }

    #[test]
    fn test_reference_returns_defined_class() {
        let mut model = CodeModel::new();
        let pkg = model.package("p");
        let defined = model
            .define_class(pkg, Modifiers::PUBLIC, "A", ClassKind::Class)
            .unwrap();
        assert_eq!(model.reference("p.A").unwrap(), defined);
        assert_eq!(model.reference("java.lang.Object").unwrap(), model.object());
    }

    #[test]
    fn test_reference_nested_in_defined_class_must_exist() {
        let mut model = CodeModel::new();
        let pkg = model.package("p");
        let outer = model
            .define_class(pkg, Modifiers::PUBLIC, "A", ClassKind::Class)
            .unwrap();
        let err = model.reference_nested(outer, "Missing").unwrap_err();
        assert!(matches!(err, Error::IllegalState(_)));
    }

    #[test]
    fn test_error_type_is_deduplicated() {
        let mut model = CodeModel::new();
        let a = model.error_type("Unknown");
        let b = model.error_type("Unknown");
        assert_eq!(a, b);
        assert!(model.is_error(a));
        assert_eq!(model.full_name(a), "Unknown");
        assert_eq!(model.package_data(model.root_package()).get("Unknown"), None);
    }

    #[test]
    fn test_erasure() {
        let mut model = CodeModel::new();
        let list = model.reference("java.util.List").unwrap();
        let string = model.reference("java.lang.String").unwrap();
        let narrowed = Type::from(list).narrow([Type::from(string)]).unwrap();
        assert_eq!(model.erasure(&narrowed), Type::Reference(list));
        assert_eq!(
            model.erasure(&Type::var("T")),
            Type::Reference(model.object())
        );
        let bounded = Type::Var(TypeVar::bounded("T", narrowed.clone()));
        assert_eq!(model.erasure(&bounded), Type::Reference(list));
        let array = Type::erased_array(narrowed).unwrap();
        assert_eq!(array, Type::Array(Box::new(Type::Reference(list))));
    }

    #[test]
    fn test_outer_and_owning_package() {
        let mut model = CodeModel::new();
        let entry = model.reference("java.util.Map$Entry").unwrap();
        let map = model.lookup("java.util.Map").unwrap();
        let util = model.find_package("java.util").unwrap();
        let ty = Type::from(entry);
        assert_eq!(model.outer(&ty), Some(map));
        assert_eq!(model.owning_package(&ty), Some(util));
        let array = Type::array(ty).unwrap();
        assert_eq!(model.owning_package(&array), Some(util));
        assert_eq!(model.owning_package(&Type::var("T")), None);
        assert_eq!(model.owning_package(&Primitive::Int.into()), None);
    }

    #[test]
    fn test_anonymous_class_uses_base_name() {
        let mut model = CodeModel::new();
        let runnable = model.reference("java.lang.Runnable").unwrap();
        let anon = model.anonymous_class(Type::from(runnable)).unwrap();
        assert_eq!(model.full_name(anon), "java.lang.Runnable");
        assert!(model.class(anon).is_anonymous());
        assert!(model.anonymous_class(Type::var("T")).is_err());
    }

    #[test]
    fn test_model_is_sync() {
        fn assert_sync<T: Sync + Send>() {}
        assert_sync::<CodeModel>();
    }
}
