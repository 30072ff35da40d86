//! Error types module
//!
//! Configuration problems are fatal and surface as [`ConfigError`] when a
//! [`ConfigModel`](crate::ConfigModel) is loaded or a pipeline is built.
//! Everything that goes wrong while validating a single file is reported
//! through the validation result instead.

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed configuration document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Missing configuration section '{0}'")]
    MissingSection(&'static str),

    #[error("Configuration section '{0}' is empty")]
    EmptySection(String),

    #[error("{location}: missing required field '{field}'")]
    MissingField {
        location: String,
        field: &'static str,
    },

    #[error("{location}: invalid value for '{field}': {reason}")]
    InvalidField {
        location: String,
        field: &'static str,
        reason: String,
    },

    #[error("{location}: references unknown plugin or step '{reference}'")]
    UnknownPluginReference { location: String, reference: String },

    #[error("{location}: custom validator '{name}' is not registered")]
    UnregisteredValidator { location: String, name: String },

    #[error("Invalid engine settings: {0}")]
    Settings(String),

    #[error("Failed to initialize step executor: {0}")]
    Executor(String),
}

impl ConfigError {
    pub(crate) fn invalid(
        location: impl Into<String>,
        field: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        ConfigError::InvalidField {
            location: location.into(),
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(location: impl Into<String>, field: &'static str) -> Self {
        ConfigError::MissingField {
            location: location.into(),
            field,
        }
    }
}

/// Returned by [`ConfigModel::lookup`](crate::ConfigModel::lookup) when no
/// rule exists for a (category, extension) pair.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("Unknown file category '{0}'")]
    UnknownCategory(String),

    #[error("Extension '{extension}' is not allowed for category '{category}'")]
    UnknownExtension { category: String, extension: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_name_location() {
        let err = ConfigError::invalid("Documents.pdf", "magic_bytes", "not hex");
        assert_eq!(
            err.to_string(),
            "Documents.pdf: invalid value for 'magic_bytes': not hex"
        );

        let err = ConfigError::missing("plugins.av.scan", "timeout");
        assert_eq!(
            err.to_string(),
            "plugins.av.scan: missing required field 'timeout'"
        );
    }

    #[test]
    fn test_lookup_error_messages() {
        let err = LookupError::UnknownExtension {
            category: "Documents".to_string(),
            extension: "exe".to_string(),
        };
        assert!(err.to_string().contains("exe"));
        assert!(err.to_string().contains("Documents"));
    }
}
