//! Expected-output patterns such as `"Success: ${verdict}"`.
//!
//! The literal text before the first placeholder must appear in the step
//! output. Placeholder values are captured as whitespace-delimited tokens and
//! reported back in the outcome detail.

use regex::Regex;

use crate::outcome::StepOutcome;

#[derive(Debug)]
pub struct ResponsePattern {
    prefix: String,
    names: Vec<String>,
    matcher: Option<Regex>,
}

impl ResponsePattern {
    pub fn parse(pattern: &str) -> Self {
        let prefix = match pattern.find("${") {
            Some(idx) => pattern[..idx].to_string(),
            None => pattern.to_string(),
        };

        let mut names = Vec::new();
        let mut expr = String::new();
        let mut rest = pattern;
        while let Some(start) = rest.find("${") {
            let Some(len) = rest[start + 2..].find('}') else {
                break;
            };
            expr.push_str(&regex::escape(&rest[..start]));
            expr.push_str(r"(\S+)");
            names.push(rest[start + 2..start + 2 + len].to_string());
            rest = &rest[start + 3 + len..];
        }
        expr.push_str(&regex::escape(rest));

        let matcher = if names.is_empty() {
            None
        } else {
            Regex::new(&expr).ok()
        };

        Self {
            prefix,
            names,
            matcher,
        }
    }

    /// Captured `name=value` pairs, or `None` when the prefix is absent.
    pub fn matches(&self, output: &str) -> Option<Vec<(String, String)>> {
        if !output.contains(&self.prefix) {
            return None;
        }

        let captured = self
            .matcher
            .as_ref()
            .and_then(|re| re.captures(output))
            .map(|caps| {
                self.names
                    .iter()
                    .enumerate()
                    .filter_map(|(i, name)| {
                        caps.get(i + 1)
                            .map(|m| (name.clone(), m.as_str().to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Some(captured)
    }
}

/// Turn step output into an outcome when the step declares a response pattern.
pub(crate) fn check_response(pattern: &str, output: &str, on_success: String) -> StepOutcome {
    let pattern = ResponsePattern::parse(pattern);
    match pattern.matches(output) {
        Some(captured) if captured.is_empty() => StepOutcome::passed(on_success),
        Some(captured) => {
            let values: Vec<String> = captured
                .into_iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect();
            StepOutcome::passed(format!("{} ({})", on_success, values.join(", ")))
        }
        None => StepOutcome::failed(format!(
            "expected output '{}' not found",
            pattern.prefix.trim()
        )),
    }
}
