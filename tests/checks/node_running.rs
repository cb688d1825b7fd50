//! Integration tests for node discovery polling.

use std::time::Duration;

use controller_checks::test_harness::{init_test_logging, FakeRosGraph};
use controller_checks::{assert_node_running, check_node_running, CheckError, POLL_INTERVAL_MS};
use tokio::time::Instant;

use super::assert_elapsed;

/// Tests that a node registering part way through the budget is picked up.
///
/// **Flow:**
/// 1. Schedules `robot_state_publisher` to appear after 2 seconds
/// 2. Runs the check with the default 5 second budget
///
/// **Expected Behavior:**
/// - The check succeeds on the first scan after the node appears
#[tokio::test(start_paused = true)]
async fn test_node_registers_before_timeout() {
    init_test_logging();

    let mut graph = FakeRosGraph::new();
    graph.add_node_after("robot_state_publisher", "/", Duration::from_secs(2));

    let start = Instant::now();
    check_node_running(&graph, "robot_state_publisher", Duration::from_secs(5))
        .await
        .unwrap();

    assert_elapsed(
        start,
        Duration::from_secs(2),
        Duration::from_millis(POLL_INTERVAL_MS),
    );
}

/// Tests that a node which never registers fails within timeout plus one
/// poll interval.
#[tokio::test(start_paused = true)]
async fn test_node_never_registers() {
    init_test_logging();

    let mut graph = FakeRosGraph::new();
    graph.add_node("controller_manager", "/");

    let start = Instant::now();
    let err = check_node_running(&graph, "missing_node", Duration::from_secs(5))
        .await
        .unwrap_err();

    assert!(matches!(err, CheckError::NodeNotFound { .. }));
    assert_eq!(err.to_string(), "missing_node not found!");
    assert_elapsed(
        start,
        Duration::from_secs(5),
        Duration::from_millis(POLL_INTERVAL_MS),
    );
}

/// Tests the zero-timeout boundary: exactly one scan happens.
#[tokio::test(start_paused = true)]
async fn test_zero_timeout_scans_exactly_once() {
    init_test_logging();

    let mut present = FakeRosGraph::new();
    present.add_node("robot_state_publisher", "/");
    check_node_running(&present, "robot_state_publisher", Duration::ZERO)
        .await
        .unwrap();
    assert_eq!(present.node_name_queries(), 1);

    let absent = FakeRosGraph::new();
    let result = check_node_running(&absent, "robot_state_publisher", Duration::ZERO).await;
    assert!(result.is_err());
    assert_eq!(absent.node_name_queries(), 1);
}

/// Tests that discovery errors end the check instead of being retried.
#[tokio::test(start_paused = true)]
async fn test_discovery_error_propagates() {
    init_test_logging();

    let mut graph = FakeRosGraph::new();
    graph.fail_with("rcl context is invalid");

    let err = check_node_running(&graph, "robot_state_publisher", Duration::from_secs(5))
        .await
        .unwrap_err();

    match err {
        CheckError::Backend(inner) => assert_eq!(inner.to_string(), "rcl context is invalid"),
        other => panic!("Expected Backend error, got {other:?}"),
    }
    assert_eq!(graph.node_name_queries(), 1);
}

#[tokio::test(start_paused = true)]
#[should_panic(expected = "ghost not found!")]
async fn test_assert_node_running_panics_with_diagnostic() {
    let graph = FakeRosGraph::new();
    assert_node_running(&graph, "ghost", Duration::from_millis(200)).await;
}
