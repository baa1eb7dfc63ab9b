//! Tests for retry module

use super::*;
use crate::http::FetchOutcome;
use serde_json::json;
use std::time::Duration;
use test_case::test_case;

fn page_body(ids: &[&str], next: Option<&str>) -> String {
    let records: Vec<_> = ids.iter().map(|id| json!({ "id": id })).collect();
    let mut body = json!({ "resultList": { "result": records } });
    if let Some(next) = next {
        body["nextCursorMark"] = json!(next);
    }
    body.to_string()
}

fn transient() -> FetchOutcome {
    FetchOutcome::TransientFailure("connection reset".to_string())
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_retry_config_default() {
    let config = RetryConfig::default();
    assert_eq!(config.max_retries, 3);
    assert_eq!(config.backoff_base, 2);
    assert_eq!(config.max_backoff, Duration::from_secs(300));
}

#[test]
fn test_retry_config_builder() {
    let config = RetryConfig::new()
        .with_max_retries(5)
        .with_backoff_base(3)
        .with_max_backoff(Duration::from_secs(20));

    assert_eq!(config.max_retries, 5);
    assert_eq!(config.backoff_base, 3);
    assert_eq!(config.max_backoff, Duration::from_secs(20));
}

// ============================================================================
// Success Tests
// ============================================================================

#[test]
fn test_success_proceeds_and_counts_records() {
    let policy = RetryPolicy::default();
    let mut state = RetryState::new();

    let action = policy.decide(
        FetchOutcome::Success(page_body(&["a", "b", "c"], Some("C1"))),
        &mut state,
    );

    match action {
        Action::Proceed(page) => {
            assert_eq!(page.len(), 3);
            assert_eq!(page.next_cursor.unwrap().as_str(), "C1");
        }
        other => panic!("Expected Proceed, got {other:?}"),
    }
    assert_eq!(state.records_retrieved, 3);
}

#[test]
fn test_success_resets_failure_streak() {
    let policy = RetryPolicy::default();
    let mut state = RetryState::new();

    policy.decide(transient(), &mut state);
    policy.decide(transient(), &mut state);
    assert_eq!(state.consecutive_failures, 2);

    policy.decide(FetchOutcome::Success(page_body(&["a"], None)), &mut state);
    assert_eq!(state.consecutive_failures, 0);
    assert_eq!(state.records_retrieved, 1);
}

#[test]
fn test_malformed_success_aborts() {
    let policy = RetryPolicy::default();
    let mut state = RetryState::new();

    let action = policy.decide(
        FetchOutcome::Success(r#"{"unexpected": true}"#.to_string()),
        &mut state,
    );

    assert!(matches!(
        action,
        Action::Abort(AbortReason::MalformedResponse(_))
    ));
    assert_eq!(state.records_retrieved, 0);
}

// ============================================================================
// Rate Limit Tests
// ============================================================================

#[test]
fn test_rate_limited_waits_as_instructed() {
    let policy = RetryPolicy::default();
    let mut state = RetryState::new();

    let action = policy.decide(
        FetchOutcome::RateLimited {
            retry_after_secs: 5,
        },
        &mut state,
    );

    assert_eq!(action, Action::WaitThenRetry(Duration::from_secs(5)));
}

#[test]
fn test_rate_limited_is_not_bounded_by_max_retries() {
    let policy = RetryPolicy::new(RetryConfig::new().with_max_retries(1));
    let mut state = RetryState::new();

    for _ in 0..50 {
        let action = policy.decide(
            FetchOutcome::RateLimited {
                retry_after_secs: 60,
            },
            &mut state,
        );
        assert!(matches!(action, Action::WaitThenRetry(_)));
    }
    assert_eq!(state.consecutive_failures, 0);
}

#[test]
fn test_rate_limit_does_not_reset_transient_streak() {
    let policy = RetryPolicy::default();
    let mut state = RetryState::new();

    policy.decide(transient(), &mut state);
    policy.decide(
        FetchOutcome::RateLimited {
            retry_after_secs: 1,
        },
        &mut state,
    );
    assert_eq!(state.consecutive_failures, 1);
}

// ============================================================================
// Transient Failure Tests
// ============================================================================

#[test]
fn test_transient_backoff_sequence_then_abort() {
    let policy = RetryPolicy::default();
    let mut state = RetryState::new();

    assert_eq!(
        policy.decide(transient(), &mut state),
        Action::BackoffThenRetry(Duration::from_secs(2))
    );
    assert_eq!(
        policy.decide(transient(), &mut state),
        Action::BackoffThenRetry(Duration::from_secs(4))
    );
    assert_eq!(
        policy.decide(transient(), &mut state),
        Action::BackoffThenRetry(Duration::from_secs(8))
    );

    let action = policy.decide(transient(), &mut state);
    match action {
        Action::Abort(reason @ AbortReason::MaxRetriesExceeded { .. }) => {
            assert_eq!(reason.to_string(), "max retries exceeded");
            if let AbortReason::MaxRetriesExceeded {
                failures,
                last_error,
            } = reason
            {
                assert_eq!(failures, 4);
                assert_eq!(last_error, "connection reset");
            }
        }
        other => panic!("Expected MaxRetriesExceeded, got {other:?}"),
    }
}

#[test]
fn test_zero_max_retries_aborts_on_first_failure() {
    let policy = RetryPolicy::new(RetryConfig::new().with_max_retries(0));
    let mut state = RetryState::new();

    assert!(matches!(
        policy.decide(transient(), &mut state),
        Action::Abort(AbortReason::MaxRetriesExceeded { failures: 1, .. })
    ));
}

#[test_case(1, 2 ; "first failure")]
#[test_case(2, 4 ; "second failure")]
#[test_case(3, 8 ; "third failure")]
#[test_case(8, 256 ; "eighth failure")]
#[test_case(9, 300 ; "capped")]
#[test_case(64, 300 ; "saturates")]
fn test_backoff_delay(failures: u32, expected_secs: u64) {
    let policy = RetryPolicy::default();
    assert_eq!(policy.backoff(failures), Duration::from_secs(expected_secs));
}

// ============================================================================
// Fatal Failure Tests
// ============================================================================

#[test_case(400 ; "bad request")]
#[test_case(404 ; "not found")]
#[test_case(500 ; "server error")]
#[test_case(503 ; "unavailable")]
fn test_fatal_status_aborts(status: u16) {
    let policy = RetryPolicy::default();
    let mut state = RetryState::new();

    let action = policy.decide(FetchOutcome::FatalFailure { status }, &mut state);
    assert_eq!(action, Action::Abort(AbortReason::NonRetryableStatus(status)));
    assert_eq!(state.consecutive_failures, 0);
}

#[test]
fn test_abort_reason_display() {
    assert_eq!(
        AbortReason::NonRetryableStatus(404).to_string(),
        "non-retryable HTTP status 404"
    );
    assert_eq!(AbortReason::UserInterrupt.to_string(), "user interrupt");
    assert!(AbortReason::UserInterrupt.is_user_interrupt());
    assert_eq!(
        AbortReason::SinkFailure("disk full".to_string()).to_string(),
        "sink failure: disk full"
    );
}
