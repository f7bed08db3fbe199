//! End-to-end scenario runs against the scripted session double.

use bidi_smoke::error::SmokeError;
use bidi_smoke::scenario::{self, Scenario};
use bidi_smoke::testing::{CaptureScript, ScriptedAction, ScriptedSession, exception_result};
use serde_json::json;
use std::time::Duration;
use tempfile::TempDir;

fn test_scenario(dir: &TempDir) -> Scenario {
    Scenario {
        url: "data:text/html,<h1 id='target'>capture me</h1>".to_string(),
        expression: "document.querySelector('#target')".to_string(),
        browser_log: dir.path().join("chrome_debug.log"),
        driver_log: dir.path().join("chromedriver.log"),
        settle_pause: Duration::ZERO,
    }
}

#[tokio::test]
async fn happy_path_completes_and_tears_down_once() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("chrome_debug.log"), "browser was here\n").unwrap();
    std::fs::write(dir.path().join("chromedriver.log"), "driver was here\n").unwrap();
    let scenario = test_scenario(&dir);

    let session = ScriptedSession::happy();
    let probe = session.clone();

    scenario::run(&scenario, session).await.unwrap();

    assert_eq!(probe.end_count(), 1);
    assert_eq!(
        probe.actions(),
        vec![
            ScriptedAction::NewTab,
            ScriptedAction::Navigate {
                url: scenario.url.clone()
            },
            ScriptedAction::Evaluate {
                expression: scenario.expression.clone()
            },
            ScriptedAction::Capture {
                shared_id: "elem-1".to_string()
            },
            ScriptedAction::FetchLogs,
            ScriptedAction::End,
        ]
    );
}

#[tokio::test]
async fn evaluation_failure_aborts_before_any_capture() {
    let dir = tempfile::tempdir().unwrap();
    let scenario = test_scenario(&dir);

    let session = ScriptedSession::happy();
    session.set_evaluation(exception_result("ReferenceError: nope is not defined"));
    let probe = session.clone();

    let err = scenario::run(&scenario, session).await.unwrap_err();
    assert!(matches!(err, SmokeError::ElementLookup { .. }));

    let actions = probe.actions();
    assert!(
        !actions
            .iter()
            .any(|action| matches!(action, ScriptedAction::Capture { .. }))
    );
    assert_eq!(probe.end_count(), 1);
}

#[tokio::test]
async fn missing_capture_payload_reads_as_a_regression_and_still_tears_down() {
    let dir = tempfile::tempdir().unwrap();
    let scenario = test_scenario(&dir);

    let session = ScriptedSession::happy();
    session.set_capture(CaptureScript::Absent);
    let probe = session.clone();

    let err = scenario::run(&scenario, session).await.unwrap_err();
    assert!(matches!(err, SmokeError::CaptureShape { .. }));
    assert!(err.to_string().contains("regression"));

    // The best-effort browser-log dump still happened before propagation.
    let actions = probe.actions();
    assert!(
        actions
            .iter()
            .any(|action| matches!(action, ScriptedAction::FetchLogs))
    );
    assert_eq!(probe.end_count(), 1);
}

#[tokio::test]
async fn wrong_signature_fails_as_an_equality_mismatch_and_still_tears_down() {
    let dir = tempfile::tempdir().unwrap();
    let scenario = test_scenario(&dir);

    let session = ScriptedSession::happy();
    session.set_capture(CaptureScript::Payload(json!("abcdefghij")));
    let probe = session.clone();

    let err = scenario::run(&scenario, session).await.unwrap_err();
    match &err {
        SmokeError::SignatureMismatch { expected, found } => {
            assert_eq!(*expected, "iVBOR");
            assert_eq!(found, "abcde");
        }
        other => panic!("expected a signature mismatch, got {other:?}"),
    }
    assert!(err.to_string().contains("iVBOR"));
    assert_eq!(probe.end_count(), 1);
}

#[tokio::test]
async fn missing_external_logs_do_not_fail_the_run() {
    let dir = tempfile::tempdir().unwrap();
    // Neither log file exists; teardown prints two notices and nothing errors.
    let scenario = test_scenario(&dir);

    let session = ScriptedSession::happy();
    let probe = session.clone();

    scenario::run(&scenario, session).await.unwrap();
    assert_eq!(probe.end_count(), 1);
}

#[tokio::test]
async fn a_log_fetch_failure_never_changes_the_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let scenario = test_scenario(&dir);

    let session = ScriptedSession::happy();
    session.fail_log_fetch();
    let probe = session.clone();

    scenario::run(&scenario, session).await.unwrap();
    assert_eq!(probe.end_count(), 1);
}

#[tokio::test]
async fn navigation_failure_still_tears_down() {
    let dir = tempfile::tempdir().unwrap();
    let scenario = test_scenario(&dir);

    let session = ScriptedSession::happy();
    session.fail_navigate();
    let probe = session.clone();

    let err = scenario::run(&scenario, session).await.unwrap_err();
    assert!(matches!(err, SmokeError::Navigation { .. }));

    let actions = probe.actions();
    assert!(
        !actions
            .iter()
            .any(|action| matches!(action, ScriptedAction::Evaluate { .. }))
    );
    assert_eq!(probe.end_count(), 1);
}

#[tokio::test]
async fn a_primary_error_wins_over_a_termination_error() {
    let dir = tempfile::tempdir().unwrap();
    let scenario = test_scenario(&dir);

    let session = ScriptedSession::happy();
    session.set_capture(CaptureScript::Payload(json!("abcdefghij")));
    session.fail_end();
    let probe = session.clone();

    let err = scenario::run(&scenario, session).await.unwrap_err();
    assert!(matches!(err, SmokeError::SignatureMismatch { .. }));
    assert_eq!(probe.end_count(), 1);
}

#[tokio::test]
async fn a_termination_error_surfaces_when_the_steps_succeeded() {
    let dir = tempfile::tempdir().unwrap();
    let scenario = test_scenario(&dir);

    let session = ScriptedSession::happy();
    session.fail_end();
    let probe = session.clone();

    let err = scenario::run(&scenario, session).await.unwrap_err();
    assert!(matches!(err, SmokeError::Session(_)));
    assert_eq!(probe.end_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn the_settle_pause_runs_before_teardown() {
    let dir = tempfile::tempdir().unwrap();
    let mut scenario = test_scenario(&dir);
    scenario.settle_pause = Duration::from_secs(2);

    let session = ScriptedSession::happy();
    let probe = session.clone();

    let started = tokio::time::Instant::now();
    scenario::run(&scenario, session).await.unwrap();

    assert!(started.elapsed() >= Duration::from_secs(2));
    assert_eq!(probe.end_count(), 1);
}
