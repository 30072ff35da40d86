use std::path::PathBuf;

use serde::Serialize;

/// Outcome of validating one file.
///
/// `checksum` is only set for valid files. `output_path` is only set when the
/// file was written to an output directory under its final name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub reason: String,
    /// Base64 SHA-256 of the original bytes.
    pub checksum: Option<String>,
    pub output_path: Option<PathBuf>,
    /// Sanitized (or encoded) name the file was accepted under.
    pub file_name: Option<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: reason.into(),
            checksum: None,
            output_path: None,
            file_name: None,
            warnings: Vec::new(),
        }
    }

    pub fn accepted(
        file_name: String,
        checksum: String,
        output_path: Option<PathBuf>,
        warnings: Vec<String>,
    ) -> Self {
        let reason = if warnings.is_empty() {
            format!("File is valid: {}", file_name)
        } else {
            format!(
                "File is valid: {} (warnings: {})",
                file_name,
                warnings.join("; ")
            )
        };

        Self {
            valid: true,
            reason,
            checksum: Some(checksum),
            output_path,
            file_name: Some(file_name),
            warnings,
        }
    }

    /// Attach warnings gathered before the file was rejected.
    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }
}
