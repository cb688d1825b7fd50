use std::collections::BTreeSet;
use std::time::Duration;

use crate::client::{JointStateSource, TopicWaiter, WaiterGuard};
use crate::error::CheckError;

/// Waits for a `JointState` message on `topic` and checks its joint names.
///
/// Names are compared as a set since publishers may order joints differently.
/// The subscription is shut down on every return path.
pub async fn check_joint_states_published<J, S>(
    source: &J,
    topic: &str,
    joint_names: &[S],
    timeout: Duration,
) -> Result<(), CheckError>
where
    J: JointStateSource,
    S: AsRef<str>,
{
    log::info!("Waiting up to {timeout:?} for joint states on '{topic}'");

    let mut waiter = WaiterGuard::new(source.wait_for_topics(&[topic.to_string()], timeout)?);

    if !waiter.wait().await? {
        log::warn!("No message received on '{topic}'");
        return Err(CheckError::TopicNotReceived {
            topic: topic.to_string(),
        });
    }

    let messages = waiter.received_messages(topic);
    let Some(msg) = messages.first() else {
        return Err(CheckError::TopicNotReceived {
            topic: topic.to_string(),
        });
    };

    if msg.name.len() != joint_names.len() {
        return Err(CheckError::JointCountMismatch {
            expected: joint_names.len(),
            actual: msg.name.len(),
        });
    }

    let received: BTreeSet<&str> = msg.name.iter().map(String::as_str).collect();
    let expected: BTreeSet<&str> = joint_names.iter().map(|name| name.as_ref()).collect();
    if received != expected {
        return Err(CheckError::JointNamesMismatch {
            expected: expected.into_iter().map(str::to_string).collect(),
            actual: msg.name.clone(),
        });
    }

    log::info!("Joint states on '{topic}' carry the expected joints");
    Ok(())
}
