use std::time::{Duration, Instant};

use filegate_core::{CliStep, OnFailPolicy, StepDefinition, StepKind};
use filegate_plugins::{
    CliExecutor, OutcomeStatus, StagedFile, StepDispatcher, StepExecutor, StepInput,
};

fn cli_step(command: &str, timeout: Duration) -> StepDefinition {
    StepDefinition {
        key: "scanner.run".to_string(),
        plugin: "scanner".to_string(),
        name: "run".to_string(),
        kind: StepKind::Cli(CliStep {
            command: command.to_string(),
        }),
        run_before: true,
        run_after: false,
        timeout,
        on_fail: OnFailPolicy::Fail,
        creds_path: None,
        response: None,
    }
}

async fn run(step: &StepDefinition, content: &[u8]) -> filegate_plugins::StepOutcome {
    let staged = StagedFile::stage(content, "sample.pdf", None).await.unwrap();
    let input = StepInput::new(content, "sample.pdf", &staged);
    let StepKind::Cli(cli) = &step.kind else {
        unreachable!("cli step expected")
    };
    CliExecutor::new().run(step, cli, &input).await
}

#[tokio::test]
async fn test_zero_exit_passes() {
    let outcome = run(&cli_step("true", Duration::from_secs(5)), b"%PDF-1.4").await;
    assert_eq!(outcome.status, OutcomeStatus::Passed);
}

#[tokio::test]
async fn test_non_zero_exit_fails() {
    let outcome = run(&cli_step("false", Duration::from_secs(5)), b"%PDF-1.4").await;
    assert_eq!(outcome.status, OutcomeStatus::Failed);
}

#[tokio::test]
async fn test_file_path_placeholder_points_at_staged_copy() {
    let step = cli_step("grep -q %PDF ${filePath}", Duration::from_secs(5));

    let outcome = run(&step, b"%PDF-1.4 body %%EOF").await;
    assert_eq!(outcome.status, OutcomeStatus::Passed, "{}", outcome);

    let outcome = run(&step, b"GIF89a").await;
    assert_eq!(outcome.status, OutcomeStatus::Failed);
}

#[tokio::test]
async fn test_timeout_kills_process() {
    let step = cli_step("sleep 30", Duration::from_millis(200));

    let start = Instant::now();
    let outcome = run(&step, b"%PDF").await;

    assert_eq!(outcome.status, OutcomeStatus::TimedOut);
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_missing_program_errors() {
    let step = cli_step("filegate-no-such-binary --flag", Duration::from_secs(5));
    let outcome = run(&step, b"%PDF").await;

    assert_eq!(outcome.status, OutcomeStatus::Errored);
    assert!(outcome.detail.contains("filegate-no-such-binary"));
}

#[tokio::test]
async fn test_response_pattern() {
    let mut step = cli_step("echo Success: clean", Duration::from_secs(5));
    step.response = Some("Success: ${scanner.verdict}".to_string());

    let outcome = run(&step, b"%PDF").await;
    assert_eq!(outcome.status, OutcomeStatus::Passed);
    assert!(outcome.detail.contains("scanner.verdict=clean"));

    let mut step = cli_step("echo Error: infected", Duration::from_secs(5));
    step.response = Some("Success: ${scanner.verdict}".to_string());

    let outcome = run(&step, b"%PDF").await;
    assert_eq!(outcome.status, OutcomeStatus::Failed);
}

#[tokio::test]
async fn test_dispatcher_routes_cli_steps() {
    let dispatcher = StepDispatcher::new(Duration::from_secs(5)).unwrap();
    let step = cli_step("true", Duration::from_secs(5));

    let staged = StagedFile::stage(b"%PDF", "sample.pdf", None).await.unwrap();
    let input = StepInput::new(b"%PDF", "sample.pdf", &staged);

    assert!(dispatcher.execute(&step, &input).await.is_passed());
}
