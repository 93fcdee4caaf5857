use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for adapter operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<AdapterError>>;

#[derive(Debug, Error, Diagnostic)]
pub enum AdapterError {
    #[error("failed to read '{path}'")]
    #[diagnostic(code(jmodel::io), help("check that the declaration file exists and is readable"))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse declarations")]
    #[diagnostic(code(jmodel::parse_error))]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },

    #[error("unsupported kind '{kind}' for type '{name}'")]
    #[diagnostic(
        code(jmodel::unsupported_kind),
        help("supported kinds are: class, interface, enum, annotation_type")
    )]
    UnsupportedKind { kind: String, name: String },

    #[error("unknown primitive type '{name}'")]
    #[diagnostic(
        code(jmodel::unknown_primitive),
        help("valid primitives are: boolean, byte, char, short, int, long, float, double, void")
    )]
    UnknownPrimitive { name: String },

    #[error("type variable '{name}' is not declared in {scope}")]
    #[diagnostic(
        code(jmodel::unknown_type_variable),
        help("declare '{name}' in the type_params of the type or method that uses it")
    )]
    UnknownTypeVariable { name: String, scope: String },

    #[error("unresolved type '{name}'")]
    #[diagnostic(
        code(jmodel::error_type),
        help("set error_types = \"placeholder\" in [render] to keep unresolved types as written")
    )]
    ErrorTypeFound { name: String },

    #[error("invalid value for annotation member '{member}': {message}")]
    #[diagnostic(code(jmodel::invalid_value))]
    InvalidValue { member: String, message: String },

    #[error("failed to build the code model")]
    #[diagnostic(code(jmodel::model))]
    Model(#[from] jmodel_core::Error),
}

impl AdapterError {
    /// Create a parse error from a toml error with source context
    pub fn parse(source: toml::de::Error, src: &str, filename: &str) -> Box<Self> {
        let span = source.span().map(SourceSpan::from);
        Box::new(AdapterError::Parse {
            src: NamedSource::new(filename, src.to_string()),
            span,
            source,
        })
    }

    pub fn invalid_value(member: impl Into<String>, message: impl Into<String>) -> Box<Self> {
        Box::new(AdapterError::InvalidValue {
            member: member.into(),
            message: message.into(),
        })
    }

    /// Whether this error reports an unresolved type, from the adapter or
    /// from a render-time scan.
    pub fn is_error_type_found(&self) -> bool {
        match self {
            AdapterError::ErrorTypeFound { .. } => true,
            AdapterError::Model(err) => err.is_error_type_found(),
            _ => false,
        }
    }
}

impl From<jmodel_core::Error> for Box<AdapterError> {
    fn from(err: jmodel_core::Error) -> Self {
        Box::new(AdapterError::Model(err))
    }
}
