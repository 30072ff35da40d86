//! Step execution.
//!
//! Every step kind has one executor. [`StepDispatcher`] routes a step to the
//! executor for its [`StepKind`]; the pipeline only sees the [`StepExecutor`]
//! trait so tests can swap in their own.

mod cli;
mod http;

use std::time::Duration;

use async_trait::async_trait;

use filegate_core::{StepDefinition, StepKind};

use crate::input::StepInput;
use crate::outcome::StepOutcome;

pub use cli::CliExecutor;
pub use http::HttpExecutor;

/// Runs one step against the candidate file.
///
/// Implementations must honour `step.timeout` and must never panic on
/// external failures: every problem becomes a non-passing [`StepOutcome`].
/// Dropping the returned future cancels the step.
#[async_trait]
pub trait StepExecutor: Send + Sync {
    async fn execute(&self, step: &StepDefinition, input: &StepInput<'_>) -> StepOutcome;
}

#[derive(Clone, Debug)]
pub struct StepDispatcher {
    cli: CliExecutor,
    http: HttpExecutor,
}

impl StepDispatcher {
    pub fn new(http_connect_timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            cli: CliExecutor::new(),
            http: HttpExecutor::new(http_connect_timeout)?,
        })
    }
}

#[async_trait]
impl StepExecutor for StepDispatcher {
    async fn execute(&self, step: &StepDefinition, input: &StepInput<'_>) -> StepOutcome {
        match &step.kind {
            StepKind::Cli(cli) => self.cli.run(step, cli, input).await,
            StepKind::Http(http) => self.http.run(step, http, input).await,
        }
    }
}

/// Keep the tail of long process or response output for log and reason text.
pub(crate) fn truncate_output(output: &str) -> String {
    const MAX_OUTPUT_CHARS: usize = 500;

    let trimmed = output.trim();
    let count = trimmed.chars().count();
    if count <= MAX_OUTPUT_CHARS {
        return trimmed.to_string();
    }
    let tail: String = trimmed.chars().skip(count - MAX_OUTPUT_CHARS).collect();
    format!("...{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_output_keeps_tail() {
        assert_eq!(truncate_output("  short \n"), "short");

        let long = format!("{}END", "x".repeat(1000));
        let truncated = truncate_output(&long);
        assert!(truncated.starts_with("..."));
        assert!(truncated.ends_with("END"));
        assert_eq!(truncated.chars().count(), 503);
    }
}
