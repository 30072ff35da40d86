//! Static file checks and the reasons a file is rejected.

use filegate_core::{ExtensionRule, LookupError};
use filegate_plugins::StepOutcome;

use crate::mime::MimeDetector;
use crate::signature::{contains_bytes, ends_with_bytes, starts_with_bytes};

/// Why a file was rejected. The display text becomes the result's reason.
#[derive(Debug, thiserror::Error)]
pub enum Rejection {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("File name '{0}' has no extension")]
    MissingExtension(String),

    #[error("Invalid mime type for {rule}: expected {expected}, detected {detected}")]
    MimeMismatch {
        rule: String,
        expected: String,
        detected: String,
    },

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Magic bytes not found for {0}")]
    MagicBytesMissing(String),

    #[error("Header signature does not match for {0}")]
    HeaderMismatch(String),

    #[error("Footer signature does not match for {0}")]
    FooterMismatch(String),

    #[error("Step '{step}' {outcome}")]
    StepFailed { step: String, outcome: StepOutcome },

    #[error("Custom validator '{name}' {outcome}")]
    CustomValidatorFailed { name: String, outcome: StepOutcome },

    #[error("Failed to stage file for plugin steps: {0}")]
    Staging(String),

    #[error("Failed to write output file: {0}")]
    Output(String),

    #[error("Validation cancelled")]
    Cancelled,
}

pub fn validate_mime_type(
    detector: &dyn MimeDetector,
    rule: &ExtensionRule,
    content: &[u8],
) -> Result<(), Rejection> {
    let detected = detector.detect(content, &rule.extension);
    tracing::debug!(
        rule = %rule.label(),
        expected = %rule.mime_type,
        detected = ?detected,
        "Checking mime type"
    );

    match detected {
        Some(detected) if detected.eq_ignore_ascii_case(&rule.mime_type) => Ok(()),
        detected => Err(Rejection::MimeMismatch {
            rule: rule.label(),
            expected: rule.mime_type.clone(),
            detected: detected.unwrap_or_else(|| "unknown".to_string()),
        }),
    }
}

pub fn validate_file_size(rule: &ExtensionRule, size: usize) -> Result<(), Rejection> {
    let size = size as u64;
    if rule.has_size_limit() && size > rule.max_size {
        return Err(Rejection::FileTooLarge {
            size,
            max: rule.max_size,
        });
    }
    Ok(())
}

pub fn validate_magic_bytes(rule: &ExtensionRule, content: &[u8]) -> Result<(), Rejection> {
    if contains_bytes(content, &rule.magic_bytes) {
        Ok(())
    } else {
        Err(Rejection::MagicBytesMissing(rule.label()))
    }
}

pub fn validate_header(rule: &ExtensionRule, content: &[u8]) -> Result<(), Rejection> {
    if starts_with_bytes(content, &rule.header_signature) {
        Ok(())
    } else {
        Err(Rejection::HeaderMismatch(rule.label()))
    }
}

pub fn validate_footer(rule: &ExtensionRule, content: &[u8]) -> Result<(), Rejection> {
    if ends_with_bytes(content, &rule.footer_signature) {
        Ok(())
    } else {
        Err(Rejection::FooterMismatch(rule.label()))
    }
}
