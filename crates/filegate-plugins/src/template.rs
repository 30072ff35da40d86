//! `${name}` placeholder substitution for step commands, URLs, headers and
//! bodies.
//!
//! | Placeholder | Value |
//! |---|---|
//! | `${filePath}` | staged copy of the candidate |
//! | `${fileName}` | sanitized file name |
//! | `${fileContent}` | Base64 of the candidate bytes |
//! | `${fileChecksum}`, `${fileChecksum.sha256}` | SHA-256, hex |
//! | `${fileChecksum.sha512}` | SHA-512, hex |
//! | `${credsPath}` | the step's `creds_path` |
//! | `${creds.NAME}` | trimmed contents of `creds_path/NAME` |
//!
//! Unknown placeholders are left untouched. Credentials are read once, when
//! the step's placeholders are loaded.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde_json::Value;

use filegate_core::{StepDefinition, StepKind};

use crate::input::StepInput;

pub struct Placeholders<'a> {
    step: &'a StepDefinition,
    input: &'a StepInput<'a>,
    credentials: HashMap<String, String>,
}

impl<'a> Placeholders<'a> {
    /// Prepare substitution for `step`, reading every credential its
    /// templates reference.
    pub async fn load(step: &'a StepDefinition, input: &'a StepInput<'a>) -> Result<Self> {
        let mut placeholders = Self {
            step,
            input,
            credentials: HashMap::new(),
        };

        for name in credential_names(step) {
            let secret = read_credential(placeholders.creds_path()?, &name).await?;
            placeholders.credentials.insert(name, secret);
        }
        Ok(placeholders)
    }

    fn resolve(&self, name: &str) -> Result<Option<String>> {
        let value = match name {
            "filePath" => self.input.path.display().to_string(),
            "fileName" => self.input.file_name.to_string(),
            "fileContent" => self.input.content_base64(),
            "fileChecksum" | "fileChecksum.sha256" => self.input.sha256_hex(),
            "fileChecksum.sha512" => self.input.sha512_hex(),
            "credsPath" => self.creds_path()?.display().to_string(),
            _ => match name.strip_prefix("creds.") {
                Some(secret) => self
                    .credentials
                    .get(secret)
                    .cloned()
                    .ok_or_else(|| anyhow!("credential '{}' was not loaded", secret))?,
                None => return Ok(None),
            },
        };
        Ok(Some(value))
    }

    fn creds_path(&self) -> Result<&Path> {
        self.step
            .creds_path
            .as_deref()
            .ok_or_else(|| anyhow!("step '{}' has no creds_path configured", self.step.key))
    }

    /// Substitute every known placeholder in `template`.
    pub fn render(&self, template: &str) -> Result<String> {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("${") {
            let Some(len) = rest[start + 2..].find('}') else {
                break;
            };
            let name = &rest[start + 2..start + 2 + len];
            out.push_str(&rest[..start]);
            match self.resolve(name)? {
                Some(value) => out.push_str(&value),
                None => out.push_str(&rest[start..start + 3 + len]),
            }
            rest = &rest[start + 3 + len..];
        }

        out.push_str(rest);
        Ok(out)
    }

    /// Render every string inside a JSON body template.
    pub fn render_json(&self, template: &Value) -> Result<Value> {
        Ok(match template {
            Value::String(s) => Value::String(self.render(s)?),
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.render_json(item))
                    .collect::<Result<_>>()?,
            ),
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| Ok((k.clone(), self.render_json(v)?)))
                    .collect::<Result<_>>()?,
            ),
            other => other.clone(),
        })
    }
}

/// `${...}` names in `template`, in order.
fn placeholder_names(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        names.push(&rest[start + 2..start + 2 + len]);
        rest = &rest[start + 3 + len..];
    }
    names
}

fn collect_credentials(template: &str, names: &mut BTreeSet<String>) {
    names.extend(
        placeholder_names(template)
            .into_iter()
            .filter_map(|name| name.strip_prefix("creds."))
            .map(str::to_string),
    );
}

fn collect_json_credentials(template: &Value, names: &mut BTreeSet<String>) {
    match template {
        Value::String(s) => collect_credentials(s, names),
        Value::Array(items) => items
            .iter()
            .for_each(|item| collect_json_credentials(item, names)),
        Value::Object(map) => map
            .values()
            .for_each(|value| collect_json_credentials(value, names)),
        _ => {}
    }
}

/// Credential names referenced anywhere in the step's templates.
fn credential_names(step: &StepDefinition) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    match &step.kind {
        StepKind::Cli(cli) => collect_credentials(&cli.command, &mut names),
        StepKind::Http(http) => {
            collect_credentials(&http.endpoint, &mut names);
            for (_, value) in &http.headers {
                collect_credentials(value, &mut names);
            }
            if let Some(body) = &http.body {
                collect_json_credentials(body, &mut names);
            }
        }
    }
    names
}

async fn read_credential(creds_path: &Path, name: &str) -> Result<String> {
    if name.is_empty() || name.contains(['/', '\\']) || name == ".." || name == "." {
        return Err(anyhow!("invalid credential name '{}'", name));
    }

    let path = creds_path.join(name);
    let secret = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read credential {}", path.display()))?;
    Ok(secret.trim().to_string())
}
