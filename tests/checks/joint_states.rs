//! Integration tests for joint state topic validation.
//!
//! Every test also checks that the subscription is torn down, whichever way
//! the check ended.

use std::time::Duration;

use controller_checks::test_harness::{init_test_logging, ScriptedJointStateSource};
use controller_checks::{
    assert_joint_states_published, check_joint_states_published, CheckError, JointState,
    DEFAULT_TOPIC_TIMEOUT_MS,
};
use tokio::time::Instant;

use super::assert_elapsed;

const TOPIC: &str = "/joint_states";

fn source_publishing(names: &[&str]) -> ScriptedJointStateSource {
    let mut source = ScriptedJointStateSource::new();
    source.publish(TOPIC, JointState::from_names(names));
    source
}

fn topic_timeout() -> Duration {
    Duration::from_millis(DEFAULT_TOPIC_TIMEOUT_MS)
}

/// Tests that joint names are compared without regard to order.
#[tokio::test(start_paused = true)]
async fn test_joint_order_does_not_matter() {
    init_test_logging();

    let source = source_publishing(&["a", "b"]);
    check_joint_states_published(&source, TOPIC, &["b", "a"], topic_timeout())
        .await
        .unwrap();

    assert_eq!(source.opened_waiters(), 1);
    assert_eq!(source.shutdown_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_joint_count_mismatch() {
    init_test_logging();

    let source = source_publishing(&["a", "b"]);
    let err = check_joint_states_published(&source, TOPIC, &["a", "b", "c"], topic_timeout())
        .await
        .unwrap_err();

    match err {
        CheckError::JointCountMismatch { expected, actual } => {
            assert_eq!(expected, 3);
            assert_eq!(actual, 2);
        }
        other => panic!("Expected JointCountMismatch, got {other:?}"),
    }
    assert_eq!(source.shutdown_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_joint_names_mismatch() {
    init_test_logging();

    let source = source_publishing(&["joint1", "joint2"]);
    let err = check_joint_states_published(&source, TOPIC, &["joint1", "joint3"], topic_timeout())
        .await
        .unwrap_err();

    assert!(matches!(err, CheckError::JointNamesMismatch { .. }));
    assert!(err.to_string().starts_with("Wrong joint names"));
    assert_eq!(source.shutdown_count(), 1);
}

/// Tests that duplicated names cannot stand in for a missing joint.
#[tokio::test(start_paused = true)]
async fn test_duplicate_joint_names_mismatch() {
    init_test_logging();

    let source = source_publishing(&["joint1", "joint1"]);
    let result =
        check_joint_states_published(&source, TOPIC, &["joint1", "joint2"], topic_timeout()).await;

    assert!(matches!(result, Err(CheckError::JointNamesMismatch { .. })));
}

/// Tests the silent topic case.
///
/// **Expected Behavior:**
/// - The check waits the whole 20 second budget
/// - It fails naming the topic
/// - The waiter is still shut down
#[tokio::test(start_paused = true)]
async fn test_no_message_published() {
    init_test_logging();

    let mut source = ScriptedJointStateSource::new();
    source.publish("/other/joint_states", JointState::from_names(&["a"]));

    let start = Instant::now();
    let err = check_joint_states_published(&source, TOPIC, &["a"], topic_timeout())
        .await
        .unwrap_err();

    assert!(matches!(err, CheckError::TopicNotReceived { .. }));
    assert_eq!(err.to_string(), "Topic '/joint_states' not found!");
    assert_elapsed(start, topic_timeout(), Duration::from_millis(10));
    assert_eq!(source.shutdown_count(), 1);
}

/// Tests that only the first received message is validated.
#[tokio::test(start_paused = true)]
async fn test_first_message_is_validated() {
    init_test_logging();

    let mut source = ScriptedJointStateSource::new();
    source
        .publish(TOPIC, JointState::from_names(&["a", "b"]))
        .publish(TOPIC, JointState::from_names(&["a", "b", "c"]));

    check_joint_states_published(&source, TOPIC, &["a", "b"], topic_timeout())
        .await
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_expected_names_accept_owned_strings() {
    init_test_logging();

    let source = source_publishing(&["shoulder_pan_joint", "elbow_joint"]);
    let expected: Vec<String> = vec!["elbow_joint".into(), "shoulder_pan_joint".into()];

    check_joint_states_published(&source, TOPIC, &expected, topic_timeout())
        .await
        .unwrap();
}

#[tokio::test(start_paused = true)]
#[should_panic(expected = "Wrong number of joints in message")]
async fn test_assert_joint_states_published_panics_with_diagnostic() {
    let source = source_publishing(&["a"]);
    assert_joint_states_published(&source, TOPIC, &["a", "b"], topic_timeout()).await;
}
