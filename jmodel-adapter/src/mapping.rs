//! Translation of element kinds and modifiers into model kinds and modifiers.

use jmodel_core::{ClassKind, Modifier, Modifiers};

use crate::element::{ElementKind, ElementModifier};
use crate::{AdapterError, Result};

/// Map a declaration kind; records and other kinds are not supported.
pub fn class_kind(kind: ElementKind, name: &str) -> Result<ClassKind> {
    match kind {
        ElementKind::Class => Ok(ClassKind::Class),
        ElementKind::Interface => Ok(ClassKind::Interface),
        ElementKind::Enum => Ok(ClassKind::Enum),
        ElementKind::AnnotationType => Ok(ClassKind::Annotation),
        other => Err(Box::new(AdapterError::UnsupportedKind {
            kind: other.to_string(),
            name: name.to_string(),
        })),
    }
}

/// Map one modifier; `None` for modifiers the model does not carry.
pub fn modifier(modifier: ElementModifier) -> Option<Modifier> {
    match modifier {
        ElementModifier::Abstract => Some(Modifier::Abstract),
        ElementModifier::Final => Some(Modifier::Final),
        ElementModifier::Native => Some(Modifier::Native),
        ElementModifier::Private => Some(Modifier::Private),
        ElementModifier::Protected => Some(Modifier::Protected),
        ElementModifier::Public => Some(Modifier::Public),
        ElementModifier::Static => Some(Modifier::Static),
        ElementModifier::Synchronized => Some(Modifier::Synchronized),
        ElementModifier::Transient => Some(Modifier::Transient),
        ElementModifier::Volatile => Some(Modifier::Volatile),
        ElementModifier::Default
        | ElementModifier::Sealed
        | ElementModifier::NonSealed
        | ElementModifier::Strictfp => None,
    }
}

/// Map a modifier list, skipping unsupported modifiers with a warning.
pub fn modifiers(list: &[ElementModifier], owner: &str) -> Modifiers {
    list.iter()
        .filter_map(|m| {
            let mapped = modifier(*m);
            if mapped.is_none() {
                tracing::warn!("skipping unsupported modifier '{m}' on {owner}");
            }
            mapped
        })
        .collect()
}

/// Modifiers of a type declaration. Interfaces are implicitly abstract and,
/// when nested, implicitly static, so both are dropped for them.
pub fn type_modifiers(kind: ClassKind, list: &[ElementModifier], owner: &str) -> Modifiers {
    let mods = modifiers(list, owner);
    if kind == ClassKind::Interface {
        mods.without(Modifier::Abstract).without(Modifier::Static)
    } else {
        mods
    }
}
