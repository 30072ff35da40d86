//! Running one phase of plugin steps.

use std::sync::Arc;

use futures::stream::{self, StreamExt};

use filegate_core::{OnFailPolicy, StepDefinition};
use filegate_plugins::{Phase, StepExecutor, StepInput};

use crate::validator::Rejection;

/// Run `steps` with at most `limit` in flight, judging outcomes in
/// declaration order.
///
/// The first failing `fail`-policy step rejects the file; returning drops the
/// stream, which cancels every step still running. Failures of `warn`-policy
/// steps are appended to `warnings`.
pub(crate) async fn run_phase(
    executor: &dyn StepExecutor,
    phase: Phase,
    steps: &[Arc<StepDefinition>],
    input: &StepInput<'_>,
    limit: usize,
    warnings: &mut Vec<String>,
) -> Result<(), Rejection> {
    if steps.is_empty() {
        return Ok(());
    }

    tracing::info!(phase = %phase, steps = steps.len(), limit, "Running plugin steps");

    let pending: Vec<_> = steps
        .iter()
        .map(|step| async move {
            let outcome = executor.execute(step, input).await;
            (step, outcome)
        })
        .collect();
    let mut outcomes = stream::iter(pending).buffered(limit.max(1));

    while let Some((step, outcome)) = outcomes.next().await {
        if outcome.is_passed() {
            tracing::debug!(step = %step.key, detail = %outcome.detail, "Step passed");
            continue;
        }

        match step.on_fail {
            OnFailPolicy::Fail => {
                tracing::warn!(step = %step.key, outcome = %outcome, "Step failed, rejecting file");
                return Err(Rejection::StepFailed {
                    step: step.key.clone(),
                    outcome,
                });
            }
            OnFailPolicy::Warn => {
                tracing::warn!(step = %step.key, outcome = %outcome, "Step failed, continuing (warn)");
                warnings.push(format!("Step '{}' {}", step.key, outcome));
            }
        }
    }

    Ok(())
}
