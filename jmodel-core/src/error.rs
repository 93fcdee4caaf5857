use thiserror::Error;

/// Result type for jmodel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or rendering a code model.
#[derive(Debug, Error)]
pub enum Error {
    /// A type or entity could not be constructed as requested.
    #[error("illegal construction: {0}")]
    Construction(String),

    /// A name is already taken at the given scope.
    #[error("'{name}' is already defined in {scope}")]
    NameCollision { name: String, scope: String },

    /// The model violates a structural invariant.
    #[error("illegal state: {0}")]
    IllegalState(String),

    /// An annotation member was given a value of the wrong type.
    #[error("annotation member '{member}' expects {expected} but was given {found}")]
    TypeMismatch {
        member: String,
        expected: String,
        found: String,
    },

    /// An annotation member that the annotation does not declare.
    #[error("annotation {annotation} has no member '{member}'")]
    UnknownMember { annotation: String, member: String },

    /// An unresolved placeholder type was found.
    #[error("unresolved type '{name}'")]
    ErrorTypeFound { name: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a construction error.
    pub fn construction(message: impl Into<String>) -> Self {
        Self::Construction(message.into())
    }

    /// Create a name collision error.
    pub fn name_collision(name: impl Into<String>, scope: impl Into<String>) -> Self {
        Self::NameCollision {
            name: name.into(),
            scope: scope.into(),
        }
    }

    /// Create an illegal state error.
    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::IllegalState(message.into())
    }

    /// Create a type mismatch error.
    pub fn type_mismatch(
        member: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            member: member.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Whether this is the non-fatal placeholder diagnostic.
    pub fn is_error_type_found(&self) -> bool {
        matches!(self, Self::ErrorTypeFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_collision_message() {
        let err = Error::name_collision("Foo", "package com.example");
        assert_eq!(
            err.to_string(),
            "'Foo' is already defined in package com.example"
        );
    }

    #[test]
    fn test_type_mismatch_message() {
        let err = Error::type_mismatch("value", "int", "string");
        assert_eq!(
            err.to_string(),
            "annotation member 'value' expects int but was given string"
        );
    }

    #[test]
    fn test_is_error_type_found() {
        let err = Error::ErrorTypeFound {
            name: "Missing".into(),
        };
        assert!(err.is_error_type_found());
        assert!(!Error::construction("nope").is_error_type_found());
    }
}
