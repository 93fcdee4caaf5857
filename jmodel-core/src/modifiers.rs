//! Java modifiers.

use std::ops::BitOr;

/// A single Java modifier keyword.
///
/// Variants are declared in the order they are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Default,
    Static,
    Final,
    Transient,
    Volatile,
    Synchronized,
    Native,
    Strictfp,
}

impl Modifier {
    const ALL: [Modifier; 12] = [
        Self::Public,
        Self::Protected,
        Self::Private,
        Self::Abstract,
        Self::Default,
        Self::Static,
        Self::Final,
        Self::Transient,
        Self::Volatile,
        Self::Synchronized,
        Self::Native,
        Self::Strictfp,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
            Self::Abstract => "abstract",
            Self::Default => "default",
            Self::Static => "static",
            Self::Final => "final",
            Self::Transient => "transient",
            Self::Volatile => "volatile",
            Self::Synchronized => "synchronized",
            Self::Native => "native",
            Self::Strictfp => "strictfp",
        }
    }

    const fn bit(self) -> u16 {
        1 << self as u16
    }
}

/// A set of modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(u16);

impl Modifiers {
    /// The empty set (package-private).
    pub const NONE: Self = Self(0);
    pub const PUBLIC: Self = Self(Modifier::Public.bit());
    pub const PRIVATE: Self = Self(Modifier::Private.bit());

    /// Add a modifier.
    pub fn with(self, modifier: Modifier) -> Self {
        Self(self.0 | modifier.bit())
    }

    /// Remove a modifier.
    pub fn without(self, modifier: Modifier) -> Self {
        Self(self.0 & !modifier.bit())
    }

    pub fn contains(&self, modifier: Modifier) -> bool {
        self.0 & modifier.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterate in printing order.
    pub fn iter(&self) -> impl Iterator<Item = Modifier> + '_ {
        Modifier::ALL.into_iter().filter(|m| self.contains(*m))
    }
}

impl From<Modifier> for Modifiers {
    fn from(modifier: Modifier) -> Self {
        Self(modifier.bit())
    }
}

impl BitOr<Modifier> for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Modifier) -> Modifiers {
        self.with(rhs)
    }
}

impl BitOr for Modifier {
    type Output = Modifiers;

    fn bitor(self, rhs: Modifier) -> Modifiers {
        Modifiers::from(self).with(rhs)
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Modifiers) -> Modifiers {
        Self(self.0 | rhs.0)
    }
}

impl FromIterator<Modifier> for Modifiers {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, Self::with)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printing_order() {
        let mods = Modifier::Final | Modifier::Static | Modifier::Public;
        let keywords: Vec<_> = mods.iter().map(|m| m.keyword()).collect();
        assert_eq!(keywords, vec!["public", "static", "final"]);
    }

    #[test]
    fn test_with_without() {
        let mods = Modifiers::PUBLIC.with(Modifier::Abstract);
        assert!(mods.contains(Modifier::Abstract));
        let mods = mods.without(Modifier::Abstract);
        assert!(!mods.contains(Modifier::Abstract));
        assert_eq!(mods, Modifiers::PUBLIC);
    }

    #[test]
    fn test_from_iter() {
        let mods: Modifiers = [Modifier::Private, Modifier::Final].into_iter().collect();
        assert!(mods.contains(Modifier::Private));
        assert!(mods.contains(Modifier::Final));
        assert!(!mods.contains(Modifier::Static));
        assert!(Modifiers::NONE.is_empty());
    }
}
