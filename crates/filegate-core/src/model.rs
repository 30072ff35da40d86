//! Typed, validated configuration model.
//!
//! A [`ConfigModel`] is built once from the JSON document, checked eagerly,
//! and shared read-only (usually behind an `Arc`) by every validation.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::Duration;

use serde_json::{Map, Value};

use crate::config::EngineSettings;
use crate::document::{lenient_f64, lenient_u64, RawDocument, RawRule, RawStep};
use crate::error::{ConfigError, LookupError};
use crate::models::{
    BodyFormat, CliStep, CustomValidatorRef, ExtensionRule, HttpMethod, HttpStep, OnFailPolicy,
    OwnershipChange, PluginDefinition, StepDefinition, StepKind,
};
use crate::pattern::decode_hex_pattern;

const DEFAULT_HTTP_PASS_CODE: u16 = 200;

#[derive(Clone, Debug)]
pub struct ConfigModel {
    categories: HashMap<String, HashMap<String, ExtensionRule>>,
    plugins: Vec<PluginDefinition>,
}

impl ConfigModel {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Load the document named by `FILEGATE_CONFIG_PATH`.
    pub fn from_settings(settings: &EngineSettings) -> Result<Self, ConfigError> {
        let path = settings.config_path.as_deref().ok_or_else(|| {
            ConfigError::Settings("FILEGATE_CONFIG_PATH is not set".to_string())
        })?;
        Self::from_json_file(path)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        let document: RawDocument = serde_json::from_value(value)?;

        let validations = document
            .validations
            .ok_or(ConfigError::MissingSection("validations"))?;
        if validations.is_empty() {
            return Err(ConfigError::EmptySection("validations".to_string()));
        }

        // Plugins first: rules may only reference declared plugins and steps.
        let mut declared = HashSet::new();
        let mut plugins = Vec::new();
        for (plugin_name, steps) in document.plugins.unwrap_or_default() {
            plugins.push(parse_plugin(&plugin_name, steps, &mut declared)?);
        }

        let mut categories = HashMap::new();
        for (category, extensions) in validations {
            let Value::Object(extensions) = extensions else {
                return Err(ConfigError::invalid(
                    format!("validations.{}", category),
                    "category",
                    "expected an object of extensions",
                ));
            };
            if extensions.is_empty() {
                return Err(ConfigError::EmptySection(format!("validations.{}", category)));
            }

            let mut rules = HashMap::new();
            for (extension, raw) in extensions {
                let rule = parse_rule(&category, &extension, raw, &declared)?;
                let label = rule.label();
                if rules.insert(rule.extension.clone(), rule).is_some() {
                    return Err(ConfigError::invalid(
                        label,
                        "extension",
                        "declared more than once",
                    ));
                }
            }
            categories.insert(category, rules);
        }

        tracing::debug!(
            categories = categories.len(),
            plugins = plugins.len(),
            "Loaded validation configuration"
        );

        Ok(Self {
            categories,
            plugins,
        })
    }

    /// Find the rule for a (category, extension) pair.
    ///
    /// The category must match exactly; the extension is matched
    /// case-insensitively and may carry a leading dot.
    pub fn lookup(&self, category: &str, extension: &str) -> Result<&ExtensionRule, LookupError> {
        let rules = self
            .categories
            .get(category)
            .ok_or_else(|| LookupError::UnknownCategory(category.to_string()))?;

        let extension = normalize_extension(extension);
        rules
            .get(&extension)
            .ok_or_else(|| LookupError::UnknownExtension {
                category: category.to_string(),
                extension,
            })
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    pub fn rules(&self) -> impl Iterator<Item = &ExtensionRule> {
        self.categories.values().flat_map(|rules| rules.values())
    }

    /// Plugins in declaration order.
    pub fn plugins(&self) -> &[PluginDefinition] {
        &self.plugins
    }

    /// Every parsed step, plugin by plugin, in declaration order.
    pub fn steps(&self) -> impl Iterator<Item = &StepDefinition> {
        self.plugins.iter().flat_map(|plugin| plugin.steps.iter())
    }
}

fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_ascii_lowercase()
}

fn decode_field(location: &str, field: &'static str, pattern: &str) -> Result<Vec<u8>, ConfigError> {
    decode_hex_pattern(pattern)
        .map_err(|e| ConfigError::invalid(location, field, format!("malformed hex pattern: {}", e)))
}

fn parse_rule(
    category: &str,
    extension: &str,
    raw: Value,
    declared_plugins: &HashSet<String>,
) -> Result<ExtensionRule, ConfigError> {
    let location = format!("{}.{}", category, extension);
    let extension = normalize_extension(extension);
    if extension.is_empty() {
        return Err(ConfigError::invalid(location, "extension", "extension is empty"));
    }

    let raw: RawRule = serde_json::from_value(raw)
        .map_err(|e| ConfigError::invalid(&location, "rule", e.to_string()))?;

    let mime_type = raw
        .mime_type
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ConfigError::missing(&location, "mime_type"))?;

    let magic_hex = raw
        .magic_bytes
        .ok_or_else(|| ConfigError::missing(&location, "magic_bytes"))?;
    let magic_bytes = decode_field(&location, "magic_bytes", &magic_hex)?;
    if magic_bytes.is_empty() {
        return Err(ConfigError::invalid(&location, "magic_bytes", "pattern is empty"));
    }

    let header_signature = match raw.header_signatures.as_deref() {
        Some(pattern) => decode_field(&location, "header_signatures", pattern)?,
        None => Vec::new(),
    };
    let footer_signature = match raw.footer_signatures.as_deref() {
        Some(pattern) => decode_field(&location, "footer_signatures", pattern)?,
        None => Vec::new(),
    };

    let max_size = raw
        .max_size
        .as_ref()
        .ok_or_else(|| ConfigError::missing(&location, "max_size"))
        .and_then(|v| lenient_u64(v).map_err(|r| ConfigError::invalid(&location, "max_size", r)))?;

    let ownership = if raw.change_ownership {
        let user = raw
            .change_ownership_user
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ConfigError::missing(&location, "change_ownership_user"))?;
        let mode = raw
            .change_ownership_mode
            .map(|m| m.trim().to_string())
            .ok_or_else(|| ConfigError::missing(&location, "change_ownership_mode"))?;
        if mode.is_empty() || !mode.chars().all(|c| matches!(c, 'r' | 'w' | 'x')) {
            return Err(ConfigError::invalid(
                &location,
                "change_ownership_mode",
                format!("'{}' is not a combination of r, w and x", mode),
            ));
        }
        Some(OwnershipChange { user, mode })
    } else {
        None
    };

    let mut custom_validators = Vec::with_capacity(raw.custom_validators.len());
    for (name, entry) in raw.custom_validators {
        let entry_point: (String, String) = serde_json::from_value(entry).map_err(|_| {
            ConfigError::invalid(
                &location,
                "custom_validators",
                format!("'{}' must be a [type, function] pair", name),
            )
        })?;
        custom_validators.push(CustomValidatorRef { name, entry_point });
    }

    for reference in &raw.extension_plugins {
        if !declared_plugins.contains(reference) {
            return Err(ConfigError::UnknownPluginReference {
                location: location.clone(),
                reference: reference.clone(),
            });
        }
    }

    Ok(ExtensionRule {
        category: category.to_string(),
        extension,
        mime_type,
        magic_bytes,
        header_signature,
        footer_signature,
        max_size,
        name_encoding: raw.name_encoding,
        ownership,
        custom_validators,
        plugins: raw.extension_plugins,
    })
}

fn parse_plugin(
    name: &str,
    steps: Value,
    declared: &mut HashSet<String>,
) -> Result<PluginDefinition, ConfigError> {
    let location = format!("plugins.{}", name);
    if name.trim().is_empty() || name.contains('.') {
        return Err(ConfigError::invalid(
            location,
            "plugin",
            "plugin names must be non-empty and contain no '.'",
        ));
    }
    let Value::Object(steps) = steps else {
        return Err(ConfigError::invalid(location, "plugin", "expected an object of steps"));
    };

    declared.insert(name.to_string());

    let mut parsed = Vec::with_capacity(steps.len());
    for (step_name, raw) in steps {
        let key = format!("{}.{}", name, step_name);
        declared.insert(key.clone());
        if let Some(step) = parse_step(name, &step_name, key, raw)? {
            parsed.push(step);
        }
    }

    Ok(PluginDefinition {
        name: name.to_string(),
        steps: parsed,
    })
}

/// Returns `Ok(None)` for steps of an unsupported type, which are dropped.
fn parse_step(
    plugin: &str,
    name: &str,
    key: String,
    raw: Value,
) -> Result<Option<StepDefinition>, ConfigError> {
    let location = format!("plugins.{}", key);
    let raw: RawStep = serde_json::from_value(raw)
        .map_err(|e| ConfigError::invalid(&location, "step", e.to_string()))?;

    let step_type = match raw.step_type {
        Some(Value::String(s)) => s.trim().to_ascii_lowercase(),
        Some(other) => {
            return Err(ConfigError::invalid(
                &location,
                "type",
                format!("expected a string, got {}", other),
            ))
        }
        None => return Err(ConfigError::missing(&location, "type")),
    };
    if step_type != "cli" && step_type != "http" {
        tracing::warn!(step = %key, step_type = %step_type, "Ignoring step with unsupported type");
        return Ok(None);
    }

    let timeout_secs = raw
        .timeout
        .as_ref()
        .ok_or_else(|| ConfigError::missing(&location, "timeout"))
        .and_then(|v| lenient_f64(v).map_err(|r| ConfigError::invalid(&location, "timeout", r)))?;
    if timeout_secs <= 0.0 {
        return Err(ConfigError::invalid(
            &location,
            "timeout",
            "must be a positive number of seconds",
        ));
    }
    let timeout = Duration::try_from_secs_f64(timeout_secs)
        .map_err(|e| ConfigError::invalid(&location, "timeout", e.to_string()))?;

    let on_fail = raw
        .on_timeout_or_fail
        .as_deref()
        .ok_or_else(|| ConfigError::missing(&location, "on_timeout_or_fail"))?
        .parse::<OnFailPolicy>()
        .map_err(|r| ConfigError::invalid(&location, "on_timeout_or_fail", r))?;

    let endpoint = raw
        .endpoint
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ConfigError::missing(&location, "endpoint"))?;

    if let Some(path) = &raw.creds_path {
        if !path.exists() {
            return Err(ConfigError::invalid(
                &location,
                "creds_path",
                format!("{} does not exist", path.display()),
            ));
        }
    }

    let kind = if step_type == "cli" {
        StepKind::Cli(CliStep { command: endpoint })
    } else {
        StepKind::Http(parse_http(
            &location,
            endpoint,
            raw.method.as_deref(),
            raw.headers,
            raw.body,
            raw.body_format.as_deref(),
            raw.http_pass_code.as_ref(),
            raw.http_fail_code.as_ref(),
        )?)
    };

    Ok(Some(StepDefinition {
        key,
        plugin: plugin.to_string(),
        name: name.to_string(),
        kind,
        run_before: raw.run_before,
        run_after: raw.run_after,
        timeout,
        on_fail,
        creds_path: raw.creds_path,
        response: raw.response.filter(|r| !r.is_empty()),
    }))
}

#[allow(clippy::too_many_arguments)]
fn parse_http(
    location: &str,
    endpoint: String,
    method: Option<&str>,
    headers: Map<String, Value>,
    body: Option<Value>,
    body_format: Option<&str>,
    pass_code: Option<&Value>,
    fail_code: Option<&Value>,
) -> Result<HttpStep, ConfigError> {
    if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
        return Err(ConfigError::invalid(
            location,
            "endpoint",
            format!("'{}' is not an http(s) URL", endpoint),
        ));
    }

    let method = match method {
        Some(m) => m
            .parse::<HttpMethod>()
            .map_err(|r| ConfigError::invalid(location, "method", r))?,
        None => HttpMethod::Post,
    };

    let headers = headers
        .into_iter()
        .map(|(name, value)| match value {
            Value::String(value) => Ok((name, value)),
            other => Err(ConfigError::invalid(
                location,
                "headers",
                format!("header '{}' must be a string, got {}", name, other),
            )),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let body_format = match body_format {
        Some(f) => f
            .parse::<BodyFormat>()
            .map_err(|r| ConfigError::invalid(location, "body_format", r))?,
        None => BodyFormat::default(),
    };
    if body_format.takes_fields() {
        if let Some(fields) = &body {
            if !fields.is_object() {
                return Err(ConfigError::invalid(
                    location,
                    "body",
                    "form and multipart bodies must be an object of fields",
                ));
            }
        }
    }

    let pass_code = match pass_code {
        Some(v) => status_code(location, "http_pass_code", v)?,
        None => DEFAULT_HTTP_PASS_CODE,
    };
    let fail_code = fail_code
        .map(|v| status_code(location, "http_fail_code", v))
        .transpose()?;
    if fail_code == Some(pass_code) {
        return Err(ConfigError::invalid(
            location,
            "http_fail_code",
            "must differ from http_pass_code",
        ));
    }

    Ok(HttpStep {
        endpoint,
        method,
        headers,
        body,
        body_format,
        pass_code,
        fail_code,
    })
}

fn status_code(location: &str, field: &'static str, value: &Value) -> Result<u16, ConfigError> {
    let code = lenient_u64(value).map_err(|r| ConfigError::invalid(location, field, r))?;
    if !(100..=599).contains(&code) {
        return Err(ConfigError::invalid(
            location,
            field,
            format!("{} is not an HTTP status code", code),
        ));
    }
    Ok(code as u16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_document() -> Value {
        json!({
            "Validations": {
                "Documents": {
                    "pdf": {
                        "mime_type": "application/pdf",
                        "magic_bytes": "25504446",
                        "header_signatures": "25504446",
                        "footer_signatures": "2525454f46",
                        "max_size": "4000",
                        "name_encoding": true,
                        "extension_plugins": ["av.scan", "remote"]
                    },
                    "TXT": {
                        "mime_type": "text/plain",
                        "magic_bytes": "48",
                        "max_size": 0
                    }
                }
            },
            "Plugins": {
                "av": {
                    "scan": {
                        "type": "cli",
                        "run_before": true,
                        "endpoint": "clamscan ${filePath}",
                        "timeout": 30,
                        "on_timeout_or_fail": "fail"
                    },
                    "legacy": {
                        "type": "ftp",
                        "endpoint": "ftp://example",
                        "timeout": 30,
                        "on_timeout_or_fail": "warn"
                    }
                },
                "remote": {
                    "check": {
                        "type": "http",
                        "run_after": true,
                        "endpoint": "https://scanner.example.com/scan",
                        "method": "post",
                        "headers": { "Authorization": "Bearer ${creds.token}" },
                        "body": { "content": "${fileContent}" },
                        "timeout": 0.5,
                        "on_timeout_or_fail": "warn",
                        "http_pass_code": 200,
                        "http_fail_code": "422"
                    }
                }
            }
        })
    }

    #[test]
    fn test_lookup_rule() {
        let model = ConfigModel::from_value(sample_document()).unwrap();
        let rule = model.lookup("Documents", "pdf").unwrap();

        assert_eq!(rule.mime_type, "application/pdf");
        assert_eq!(rule.magic_bytes, vec![0x25, 0x50, 0x44, 0x46]);
        assert_eq!(rule.footer_signature, b"%%EOF".to_vec());
        assert_eq!(rule.max_size, 4000);
        assert!(rule.name_encoding);
        assert_eq!(rule.plugins, vec!["av.scan", "remote"]);
    }

    #[test]
    fn test_lookup_is_case_insensitive_for_extensions() {
        let model = ConfigModel::from_value(sample_document()).unwrap();
        assert!(model.lookup("Documents", "PDF").is_ok());
        assert!(model.lookup("Documents", ".txt").is_ok());
        assert!(model.lookup("Documents", "txt").unwrap().header_signature.is_empty());
    }

    #[test]
    fn test_lookup_not_found() {
        let model = ConfigModel::from_value(sample_document()).unwrap();
        assert_eq!(
            model.lookup("Images", "pdf").unwrap_err(),
            LookupError::UnknownCategory("Images".to_string())
        );
        assert_eq!(
            model.lookup("Documents", "exe").unwrap_err(),
            LookupError::UnknownExtension {
                category: "Documents".to_string(),
                extension: "exe".to_string(),
            }
        );
        // Categories are matched exactly.
        assert!(model.lookup("documents", "pdf").is_err());
    }

    #[test]
    fn test_unknown_step_types_are_dropped() {
        let model = ConfigModel::from_value(sample_document()).unwrap();
        let keys: Vec<&str> = model.steps().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["av.scan", "remote.check"]);
    }

    #[test]
    fn test_http_step_parsing() {
        let model = ConfigModel::from_value(sample_document()).unwrap();
        let step = model.steps().find(|s| s.key == "remote.check").unwrap();

        assert_eq!(step.timeout, Duration::from_millis(500));
        assert_eq!(step.on_fail, OnFailPolicy::Warn);
        assert!(step.run_after);
        assert!(!step.run_before);
        match &step.kind {
            StepKind::Http(http) => {
                assert_eq!(http.method, HttpMethod::Post);
                assert_eq!(http.pass_code, 200);
                assert_eq!(http.fail_code, Some(422));
                assert_eq!(http.headers[0].0, "Authorization");
                assert_eq!(http.body_format, BodyFormat::Json);
            }
            other => panic!("expected an HTTP step, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_validations_section() {
        let err = ConfigModel::from_value(json!({ "plugins": {} })).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSection("validations")));
    }

    #[test]
    fn test_missing_magic_bytes_is_rejected() {
        let mut doc = sample_document();
        doc["Validations"]["Documents"]["pdf"]
            .as_object_mut()
            .unwrap()
            .remove("magic_bytes");
        let err = ConfigModel::from_value(doc).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingField {
                field: "magic_bytes",
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_hex_is_rejected() {
        let mut doc = sample_document();
        doc["Validations"]["Documents"]["pdf"]["footer_signatures"] = json!("%%EOF");
        let err = ConfigModel::from_value(doc).unwrap_err();
        assert!(err.to_string().contains("footer_signatures"));
    }

    #[test]
    fn test_unknown_rule_key_is_rejected() {
        let mut doc = sample_document();
        doc["Validations"]["Documents"]["pdf"]["fail_fast"] = json!(true);
        assert!(ConfigModel::from_value(doc).is_err());
    }

    #[test]
    fn test_unknown_plugin_reference_is_rejected() {
        let mut doc = sample_document();
        doc["Validations"]["Documents"]["pdf"]["extension_plugins"] = json!(["av.missing"]);
        let err = ConfigModel::from_value(doc).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnknownPluginReference { ref reference, .. } if reference == "av.missing"
        ));
    }

    #[test]
    fn test_missing_step_type_is_rejected() {
        let mut doc = sample_document();
        doc["Plugins"]["av"]["scan"]
            .as_object_mut()
            .unwrap()
            .remove("type");
        let err = ConfigModel::from_value(doc).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { field: "type", .. }));
    }

    #[test]
    fn test_non_positive_timeout_is_rejected() {
        let mut doc = sample_document();
        doc["Plugins"]["av"]["scan"]["timeout"] = json!(0);
        assert!(ConfigModel::from_value(doc).is_err());
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let mut doc = sample_document();
        doc["Plugins"]["av"]["scan"]["on_timeout_or_fail"] = json!("ignore");
        let err = ConfigModel::from_value(doc).unwrap_err();
        assert!(err.to_string().contains("on_timeout_or_fail"));
    }

    #[test]
    fn test_ownership_requires_valid_mode() {
        let mut doc = sample_document();
        doc["Validations"]["Documents"]["pdf"]["change_ownership"] = json!(true);
        doc["Validations"]["Documents"]["pdf"]["change_ownership_user"] = json!("nobody");
        doc["Validations"]["Documents"]["pdf"]["change_ownership_mode"] = json!("rwz");
        assert!(ConfigModel::from_value(doc.clone()).is_err());

        doc["Validations"]["Documents"]["pdf"]["change_ownership_mode"] = json!("rw");
        let model = ConfigModel::from_value(doc).unwrap();
        let ownership = model.lookup("Documents", "pdf").unwrap().ownership.clone();
        assert_eq!(
            ownership,
            Some(OwnershipChange {
                user: "nobody".to_string(),
                mode: "rw".to_string(),
            })
        );
    }

    #[test]
    fn test_custom_validator_references() {
        let mut doc = sample_document();
        doc["Validations"]["Documents"]["pdf"]["custom_validators"] =
            json!({ "pdf_structure": ["PdfInspector", "inspect"] });
        let model = ConfigModel::from_value(doc.clone()).unwrap();
        let rule = model.lookup("Documents", "pdf").unwrap();
        assert_eq!(rule.custom_validators[0].name, "pdf_structure");
        assert_eq!(
            rule.custom_validators[0].entry_point,
            ("PdfInspector".to_string(), "inspect".to_string())
        );

        doc["Validations"]["Documents"]["pdf"]["custom_validators"] =
            json!({ "pdf_structure": "PdfInspector" });
        assert!(ConfigModel::from_value(doc).is_err());
    }

    #[test]
    fn test_missing_creds_path_is_rejected() {
        let mut doc = sample_document();
        doc["Plugins"]["av"]["scan"]["creds_path"] = json!("/definitely/not/here/creds");
        let err = ConfigModel::from_value(doc).unwrap_err();
        assert!(err.to_string().contains("creds_path"));
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, sample_document().to_string()).unwrap();

        let model = ConfigModel::from_json_file(&path).unwrap();
        assert!(model.has_category("Documents"));
        assert_eq!(model.plugins().len(), 2);

        let err = ConfigModel::from_json_file(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_from_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filegate.json");
        std::fs::write(&path, sample_document().to_string()).unwrap();

        let settings = EngineSettings {
            config_path: Some(path),
            ..EngineSettings::default()
        };
        let model = ConfigModel::from_settings(&settings).unwrap();
        assert!(model.lookup("Documents", "pdf").is_ok());

        let err = ConfigModel::from_settings(&EngineSettings::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Settings(_)));
    }

    #[test]
    fn test_form_body_must_be_an_object() {
        let mut doc = sample_document();
        doc["Plugins"]["remote"]["check"]["body_format"] = json!("multipart");
        let model = ConfigModel::from_value(doc.clone()).unwrap();
        let step = model.steps().find(|s| s.key == "remote.check").unwrap();
        assert!(matches!(
            &step.kind,
            StepKind::Http(http) if http.body_format == BodyFormat::Multipart
        ));

        doc["Plugins"]["remote"]["check"]["body_format"] = json!("form");
        doc["Plugins"]["remote"]["check"]["body"] = json!("content=${fileContent}");
        let err = ConfigModel::from_value(doc).unwrap_err();
        assert!(err.to_string().contains("object of fields"));
    }

    #[test]
    fn test_malformed_json() {
        let err = ConfigModel::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
