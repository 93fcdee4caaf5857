/// The kind of a declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    Enum,
    Annotation,
}

impl ClassKind {
    /// The keyword introducing a declaration of this kind.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::Annotation => "@interface",
        }
    }

    /// Interfaces and annotation types.
    pub fn is_interface(&self) -> bool {
        matches!(self, Self::Interface | Self::Annotation)
    }
}
