//! Serde shapes of the JSON configuration document.
//!
//! These mirror the document literally; [`crate::model`] turns them into the
//! validated [`ConfigModel`](crate::ConfigModel).

use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub(crate) struct RawDocument {
    #[serde(alias = "Validations")]
    pub validations: Option<Map<String, Value>>,
    #[serde(alias = "Plugins")]
    pub plugins: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawRule {
    pub mime_type: Option<String>,
    pub magic_bytes: Option<String>,
    pub header_signatures: Option<String>,
    pub footer_signatures: Option<String>,
    pub max_size: Option<Value>,
    #[serde(default)]
    pub name_encoding: bool,
    #[serde(default)]
    pub change_ownership: bool,
    pub change_ownership_user: Option<String>,
    pub change_ownership_mode: Option<String>,
    #[serde(default)]
    pub custom_validators: Map<String, Value>,
    #[serde(default, alias = "plugins")]
    pub extension_plugins: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawStep {
    #[serde(rename = "type")]
    pub step_type: Option<Value>,
    #[serde(default)]
    pub run_before: bool,
    #[serde(default)]
    pub run_after: bool,
    pub timeout: Option<Value>,
    pub on_timeout_or_fail: Option<String>,
    #[serde(alias = "command")]
    pub endpoint: Option<String>,
    pub method: Option<String>,
    #[serde(default)]
    pub headers: Map<String, Value>,
    pub body: Option<Value>,
    pub body_format: Option<String>,
    pub http_pass_code: Option<Value>,
    pub http_fail_code: Option<Value>,
    pub creds_path: Option<PathBuf>,
    pub response: Option<String>,
}

/// Read a non-negative integer written either as a JSON number or a numeric
/// string (`4000` and `"4000"` are equivalent).
pub(crate) fn lenient_u64(value: &Value) -> Result<u64, String> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| format!("expected a non-negative integer, got {}", n)),
        Value::String(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| format!("expected a non-negative integer, got '{}'", s)),
        other => Err(format!("expected a number, got {}", other)),
    }
}

/// Same as [`lenient_u64`] but allows fractions.
pub(crate) fn lenient_f64(value: &Value) -> Result<f64, String> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| format!("expected a number, got {}", n)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("expected a number, got '{}'", s)),
        other => Err(format!("expected a number, got {}", other)),
    }
}
