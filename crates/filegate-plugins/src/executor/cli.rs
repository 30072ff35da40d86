use std::process::Stdio;
use std::time::Instant;

use tokio::process::Command;

use filegate_core::{CliStep, StepDefinition};

use super::truncate_output;
use crate::input::StepInput;
use crate::outcome::StepOutcome;
use crate::response::check_response;
use crate::template::Placeholders;

/// Runs command-line steps.
///
/// The command is split on whitespace before placeholders are substituted,
/// so substituted values never turn into extra arguments and no shell is
/// involved. The child is killed if the step times out or is cancelled.
#[derive(Clone, Debug, Default)]
pub struct CliExecutor;

impl CliExecutor {
    pub fn new() -> Self {
        Self
    }

    #[tracing::instrument(skip_all, fields(step = %step.key, kind = step.kind.type_name()))]
    pub async fn run(
        &self,
        step: &StepDefinition,
        cli: &CliStep,
        input: &StepInput<'_>,
    ) -> StepOutcome {
        let start = Instant::now();
        let placeholders = match Placeholders::load(step, input).await {
            Ok(placeholders) => placeholders,
            Err(e) => return StepOutcome::errored(format!("{:#}", e)),
        };

        let argv = match cli
            .command
            .split_whitespace()
            .map(|arg| placeholders.render(arg))
            .collect::<anyhow::Result<Vec<_>>>()
        {
            Ok(argv) => argv,
            Err(e) => return StepOutcome::errored(format!("{:#}", e)),
        };
        let Some((program, args)) = argv.split_first() else {
            return StepOutcome::errored("empty command");
        };

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();
        let child = match child {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!(program = %program, error = %e, "Failed to start step process");
                return StepOutcome::errored(format!("failed to start '{}': {}", program, e));
            }
        };

        // On timeout the child is dropped with the future and killed.
        let output = match tokio::time::timeout(step.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return StepOutcome::errored(format!("failed to wait for '{}': {}", program, e));
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = step.timeout.as_millis() as u64,
                    "Step process timed out, killed"
                );
                return StepOutcome::timed_out(format!(
                    "no result after {:.1}s",
                    step.timeout.as_secs_f64()
                ));
            }
        };

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        tracing::debug!(
            status = %output.status,
            duration_ms = start.elapsed().as_millis() as u64,
            "Step process finished"
        );

        if !output.status.success() {
            return StepOutcome::failed(format!(
                "{}: {}",
                output.status,
                truncate_output(&text)
            ));
        }

        match &step.response {
            Some(pattern) => check_response(pattern, &text, output.status.to_string()),
            None => StepOutcome::passed(output.status.to_string()),
        }
    }
}
