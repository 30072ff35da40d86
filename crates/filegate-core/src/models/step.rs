use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

/// What the orchestrator does with a failed or timed-out step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OnFailPolicy {
    /// Reject the file.
    Fail,
    /// Record a warning and keep validating.
    Warn,
}

impl FromStr for OnFailPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(OnFailPolicy::Fail),
            "warn" => Ok(OnFailPolicy::Warn),
            other => Err(format!("expected 'fail' or 'warn', got '{}'", other)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            other => Err(format!("unsupported HTTP method '{}'", other)),
        }
    }
}

/// How an HTTP step's body template is sent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BodyFormat {
    #[default]
    Json,
    Raw,
    /// `application/x-www-form-urlencoded`; the body template is an object
    /// of fields.
    Form,
    /// `multipart/form-data` with the candidate bytes as the `file` part; the
    /// body template, if any, adds text fields.
    Multipart,
}

impl BodyFormat {
    /// Form and multipart bodies are built from an object of fields.
    pub fn takes_fields(self) -> bool {
        matches!(self, BodyFormat::Form | BodyFormat::Multipart)
    }
}

impl FromStr for BodyFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(BodyFormat::Json),
            "raw" => Ok(BodyFormat::Raw),
            "form" => Ok(BodyFormat::Form),
            "multipart" => Ok(BodyFormat::Multipart),
            other => Err(format!(
                "expected 'json', 'raw', 'form' or 'multipart', got '{}'",
                other
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CliStep {
    /// Program and arguments separated by whitespace; may contain placeholders.
    pub command: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HttpStep {
    pub endpoint: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub body_format: BodyFormat,
    pub pass_code: u16,
    pub fail_code: Option<u16>,
}

/// Step variants. The set is closed: new kinds are added here and in the
/// executor dispatcher.
#[derive(Clone, Debug, PartialEq)]
pub enum StepKind {
    Cli(CliStep),
    Http(HttpStep),
}

impl StepKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            StepKind::Cli(_) => "cli",
            StepKind::Http(_) => "http",
        }
    }
}

/// One step of a plugin, immutable after the configuration is loaded.
#[derive(Clone, Debug, PartialEq)]
pub struct StepDefinition {
    /// `plugin.step`, unique across the configuration.
    pub key: String,
    pub plugin: String,
    pub name: String,
    pub kind: StepKind,
    pub run_before: bool,
    pub run_after: bool,
    pub timeout: Duration,
    pub on_fail: OnFailPolicy,
    pub creds_path: Option<PathBuf>,
    /// Expected output, e.g. `"OK: ${verdict}"`.
    pub response: Option<String>,
}

impl StepDefinition {
    /// A rule references a step either by its plugin name or by its full key.
    pub fn matches_reference(&self, reference: &str) -> bool {
        reference == self.plugin || reference == self.key
    }
}

/// A plugin and the steps that survived parsing, in declaration order.
#[derive(Clone, Debug, PartialEq)]
pub struct PluginDefinition {
    pub name: String,
    pub steps: Vec<StepDefinition>,
}
