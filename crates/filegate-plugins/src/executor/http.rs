use std::time::{Duration, Instant};

use anyhow::Context;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method};

use filegate_core::{BodyFormat, HttpMethod, HttpStep, StepDefinition};
use serde_json::Value;

use super::truncate_output;
use crate::input::StepInput;
use crate::outcome::StepOutcome;
use crate::response::check_response;
use crate::template::Placeholders;

/// Runs HTTP steps against remote scanning services.
///
/// The step timeout is the deadline for the whole exchange, body included.
/// A status equal to the pass code passes; anything else fails.
#[derive(Clone, Debug)]
pub struct HttpExecutor {
    client: Client,
}

impl HttpExecutor {
    pub fn new(connect_timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    #[tracing::instrument(skip_all, fields(step = %step.key, kind = step.kind.type_name()))]
    pub async fn run(
        &self,
        step: &StepDefinition,
        http: &HttpStep,
        input: &StepInput<'_>,
    ) -> StepOutcome {
        let start = Instant::now();

        let request = match self.build_request(step, http, input).await {
            Ok(request) => request,
            Err(e) => return StepOutcome::errored(format!("{:#}", e)),
        };

        let exchange = async {
            let response = request.send().await?;
            let status = response.status().as_u16();
            // Only read the body when it decides the outcome.
            let body = if status == http.pass_code && step.response.is_some() {
                response.text().await?
            } else {
                String::new()
            };
            Ok::<_, reqwest::Error>((status, body))
        };

        let (status, body) = match tokio::time::timeout(step.timeout, exchange).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) if e.is_timeout() => {
                return StepOutcome::timed_out(format!("request timed out: {}", e));
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Step request failed");
                return StepOutcome::errored(format!("request failed: {}", e));
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = step.timeout.as_millis() as u64,
                    "Step request timed out, aborted"
                );
                return StepOutcome::timed_out(format!(
                    "no response after {:.1}s",
                    step.timeout.as_secs_f64()
                ));
            }
        };

        tracing::debug!(
            status,
            duration_ms = start.elapsed().as_millis() as u64,
            "Step request finished"
        );

        if status == http.pass_code {
            let detail = format!("HTTP {}", status);
            match &step.response {
                Some(pattern) => match check_response(pattern, &body, detail) {
                    outcome if outcome.is_passed() => outcome,
                    outcome => StepOutcome::failed(format!(
                        "{} (body: {})",
                        outcome.detail,
                        truncate_output(&body)
                    )),
                },
                None => StepOutcome::passed(detail),
            }
        } else if http.fail_code == Some(status) {
            StepOutcome::failed(format!("HTTP {} (fail code)", status))
        } else {
            StepOutcome::failed(format!(
                "unexpected HTTP status {} (expected {})",
                status, http.pass_code
            ))
        }
    }

    async fn build_request(
        &self,
        step: &StepDefinition,
        http: &HttpStep,
        input: &StepInput<'_>,
    ) -> anyhow::Result<reqwest::RequestBuilder> {
        let placeholders = Placeholders::load(step, input).await?;

        let url = placeholders.render(&http.endpoint)?;
        let mut request = self
            .client
            .request(method(http.method), &url)
            .timeout(step.timeout);

        for (name, value) in &http.headers {
            request = request.header(name.as_str(), placeholders.render(value)?);
        }

        let body = http
            .body
            .as_ref()
            .map(|body| placeholders.render_json(body))
            .transpose()?;

        Ok(match (http.body_format, body) {
            // The candidate is always uploaded, with or without extra fields.
            (BodyFormat::Multipart, body) => {
                request.multipart(multipart_form(body.as_ref(), input)?)
            }
            (_, None) => request,
            (BodyFormat::Json, Some(body)) => request.json(&body),
            (BodyFormat::Raw, Some(body)) => request.body(field_text(body)),
            (BodyFormat::Form, Some(body)) => request.form(&form_fields(Some(&body))),
        })
    }
}

fn field_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Fields of a rendered form body. Load-time checks guarantee an object.
fn form_fields(body: Option<&Value>) -> Vec<(String, String)> {
    match body {
        Some(Value::Object(map)) => map
            .iter()
            .map(|(name, value)| (name.clone(), field_text(value.clone())))
            .collect(),
        _ => Vec::new(),
    }
}

fn multipart_form(body: Option<&Value>, input: &StepInput<'_>) -> anyhow::Result<Form> {
    let file = Part::bytes(input.content.to_vec())
        .file_name(input.file_name.to_string())
        .mime_str("application/octet-stream")
        .context("Failed to build multipart file part")?;

    let form = form_fields(body)
        .into_iter()
        .fold(Form::new(), |form, (name, value)| form.text(name, value));
    Ok(form.part("file", file))
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}
