//! Import and ambiguity resolution.
//!
//! Given the usage table of a unit, decide for every short name whether the
//! class behind it can be referred to by its short name (possibly through an
//! import), through an enclosing class (`Outer.Inner`), or only by its fully
//! qualified name.
//!
//! A short name is ambiguous when, checked in order:
//!
//! 1. more than one class is referenced by it;
//! 2. it is also used as an identifier and at least one class is
//!    referenced by it;
//! 3. its single class lives in `java.lang` and a class defined in the
//!    rendered class's package has the same name.

use indexmap::IndexSet;

use super::collect::{Usage, UsageTable};
use crate::model::{ClassId, CodeModel};

/// Which classes a unit may name by their short name, and the import lines
/// that make that legal.
#[derive(Debug, Clone)]
pub struct Resolution {
    target: ClassId,
    visible: IndexSet<ClassId>,
    imports: Vec<String>,
}

impl Resolution {
    /// The class being rendered.
    pub fn target(&self) -> ClassId {
        self.target
    }

    /// Whether `id` is printed by its short name.
    pub fn is_visible(&self, id: ClassId) -> bool {
        self.visible.contains(&id)
    }

    pub fn visible(&self) -> impl Iterator<Item = ClassId> + '_ {
        self.visible.iter().copied()
    }

    /// Fully qualified names to import, sorted and without duplicates.
    pub fn imports(&self) -> &[String] {
        &self.imports
    }
}

/// Resolve the usages collected for `target`.
pub fn resolve(model: &CodeModel, target: ClassId, usages: &UsageTable) -> Resolution {
    let mut resolver = Resolver {
        model,
        target,
        usages,
        visible: IndexSet::new(),
    };

    for (name, usage) in usages.iter() {
        if usage.refs.is_empty() {
            continue;
        }
        match usage.single() {
            Some(id) if !resolver.is_ambiguous(usage) => {
                if resolver.should_be_imported(id) {
                    resolver.visible.insert(id);
                } else {
                    resolver.import_outer(id);
                }
            }
            _ => {
                tracing::trace!("'{name}' is ambiguous across {} classes", usage.refs.len());
                for id in &usage.refs {
                    resolver.import_outer(*id);
                }
            }
        }
    }

    resolver.visible.insert(target);

    let mut imports: Vec<String> = resolver
        .visible
        .iter()
        .filter(|id| !resolver.is_implicitly_imported(**id))
        .map(|id| model.full_name(*id))
        .collect();
    imports.sort();
    imports.dedup();

    Resolution {
        target,
        visible: resolver.visible,
        imports,
    }
}

struct Resolver<'a> {
    model: &'a CodeModel,
    target: ClassId,
    usages: &'a UsageTable,
    visible: IndexSet<ClassId>,
}

impl Resolver<'_> {
    fn is_ambiguous(&self, usage: &Usage) -> bool {
        if usage.refs.len() > 1 {
            return true;
        }
        if usage.used_as_identifier && !usage.refs.is_empty() {
            return true;
        }
        match usage.single() {
            Some(id) => self.shadows_builtin(id),
            None => false,
        }
    }

    /// A `java.lang` class whose name a class in the target's package also
    /// declares. The implicit import would lose to the package member.
    fn shadows_builtin(&self, id: ClassId) -> bool {
        let model = self.model;
        let class = model.class(id);
        if class.package() != model.builtin_package() {
            return false;
        }
        let package = model.package_of(self.target);
        model
            .top_level_classes(package)
            .any(|sibling| model.class(sibling).name() == class.name())
    }

    /// Whether `id` should be named by its short name once unambiguous.
    ///
    /// Nested classes qualify only when their name embeds their outer
    /// class's name (`Map.Entry` does not, `Outer.OuterBuilder` does), so
    /// the short name still says where the class comes from.
    fn should_be_imported(&self, id: ClassId) -> bool {
        let class = self.model.class(id);
        match class.outer() {
            Some(outer) => {
                class.name().contains(self.model.class(outer).name())
                    && self.should_be_imported(outer)
            }
            None => true,
        }
    }

    /// Make the closest enclosing class of `id` that can be named
    /// unambiguously visible, so `id` prints as `Outer.Inner`.
    fn import_outer(&mut self, id: ClassId) {
        let mut current = self.model.class(id).outer();
        while let Some(outer) = current {
            if self.causes_no_ambiguities(outer) && self.should_be_imported(outer) {
                tracing::trace!(
                    "'{}' resolves through {}",
                    self.model.class(id).name(),
                    self.model.full_name(outer)
                );
                self.visible.insert(outer);
                return;
            }
            current = self.model.class(outer).outer();
        }
    }

    fn causes_no_ambiguities(&self, id: ClassId) -> bool {
        let unambiguous = match self.usages.get(self.model.class(id).name()) {
            Some(usage) => !self.is_ambiguous(usage) && usage.refs.contains(&id),
            None => !self.shadows_builtin(id),
        };
        unambiguous && !self.name_taken(id)
    }

    /// Another class already named by the same short name in this unit,
    /// or a member class of the target that would shadow an import.
    ///
    /// Outers reached through `import_outer` need not appear in the usage
    /// table, so two of them can share a name without the table noticing.
    fn name_taken(&self, id: ClassId) -> bool {
        let model = self.model;
        let name = model.class(id).name();
        std::iter::once(self.target)
            .chain(model.class(self.target).nested())
            .chain(self.visible.iter().copied())
            .any(|other| other != id && model.class(other).name() == name)
    }

    /// Visible classes that need no import line.
    fn is_implicitly_imported(&self, id: ClassId) -> bool {
        let model = self.model;
        if model.outermost(id) == self.target {
            return true;
        }
        let class = model.class(id);
        if class.outer().is_some() {
            return false;
        }
        let package = class.package();
        package == model.root_package()
            || package == model.builtin_package()
            || package == model.package_of(self.target)
    }
}
