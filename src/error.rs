//! Error types for record encoding and decoding.

use std::fmt;

/// Coarse classification of a [`CodecError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Conversion,
    Format,
    InvalidShape,
    ReflectiveAccess,
}

/// Error type for scalar and record conversions
#[derive(Debug, Clone, PartialEq)]
pub enum CodecError {
    /// A scalar value or text could not be converted to or from the requested kind.
    Conversion {
        target: String,
        value: String,
        reason: String,
    },
    /// Record text does not follow the `name ASSOC value` pair grammar.
    Format {
        chunk: String,
        reason: String,
    },
    /// The bean type declares something other than getters and setters.
    InvalidShape {
        type_name: String,
        offending: Vec<String>,
    },
    /// A field accessor could not be found or invoked.
    ReflectiveAccess {
        type_name: String,
        member: String,
        reason: String,
    },
}

impl CodecError {
    pub fn conversion(
        target: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CodecError::Conversion {
            target: target.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn format(chunk: impl Into<String>, reason: impl Into<String>) -> Self {
        CodecError::Format {
            chunk: chunk.into(),
            reason: reason.into(),
        }
    }

    pub fn reflective_access(
        type_name: impl Into<String>,
        member: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CodecError::ReflectiveAccess {
            type_name: type_name.into(),
            member: member.into(),
            reason: reason.into(),
        }
    }

    /// Which branch of the error taxonomy this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::Conversion { .. } => ErrorKind::Conversion,
            CodecError::Format { .. } => ErrorKind::Format,
            CodecError::InvalidShape { .. } => ErrorKind::InvalidShape,
            CodecError::ReflectiveAccess { .. } => ErrorKind::ReflectiveAccess,
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Conversion { target, value, reason } => {
                write!(f, "Cannot convert '{}' as {}: {}", value, target, reason)
            }
            CodecError::Format { chunk, reason } => {
                write!(f, "Malformed record chunk '{}': {}", chunk, reason)
            }
            CodecError::InvalidShape { type_name, offending } => {
                write!(
                    f,
                    "Type {} is not a bean: non-accessor methods [{}]",
                    type_name,
                    offending.join(", ")
                )
            }
            CodecError::ReflectiveAccess { type_name, member, reason } => {
                write!(f, "Cannot access {}::{}: {}", type_name, member, reason)
            }
        }
    }
}

impl std::error::Error for CodecError {}

/// Error type for loading and validating a codec configuration
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Yaml(err)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Yaml(e) => write!(f, "YAML error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Yaml(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind() {
        let err = CodecError::format("abc", "missing associator");
        assert_eq!(err.kind(), ErrorKind::Format);

        let err = CodecError::conversion("char", "ab", "expected exactly one character");
        assert_eq!(err.kind(), ErrorKind::Conversion);
    }

    #[test]
    fn test_error_display() {
        let err = CodecError::InvalidShape {
            type_name: "Order".to_string(),
            offending: vec!["total".to_string(), "describe".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Type Order is not a bean: non-accessor methods [total, describe]"
        );

        let err = CodecError::reflective_access("Order", "set_code", "no such field");
        assert_eq!(err.to_string(), "Cannot access Order::set_code: no such field");
    }
}
