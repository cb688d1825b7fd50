use std::time::Duration;

use thiserror::Error;

use crate::messages::NodeIdentity;

/// Failure of one of the polling checks.
///
/// The `Display` text is the diagnostic a test prints, so every variant names
/// what was expected and what was actually observed.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("{node} not found!")]
    NodeNotFound { node: String },

    #[error(
        "Controller node(s) not found: {}, but seeing {}",
        format_missing_nodes(.namespace, .missing),
        format_identities(.seen)
    )]
    ControllerNodesNotFound {
        namespace: String,
        missing: Vec<String>,
        seen: Vec<NodeIdentity>,
    },

    #[error("No controllers found!")]
    NoControllers { manager: String },

    #[error("Controller(s) not found or not {state}: {}", .missing.join(", "))]
    ControllersNotInState { state: String, missing: Vec<String> },

    #[error("No hardware components found!")]
    NoHardwareComponents { manager: String },

    #[error("Hardware component(s) not found or not {state}: {}", .missing.join(", "))]
    HardwareComponentsNotInState { state: String, missing: Vec<String> },

    #[error("Service call to '{service}' timed out after {timeout:?}")]
    ServiceTimeout { service: String, timeout: Duration },

    #[error("Topic '{topic}' not found!")]
    TopicNotReceived { topic: String },

    #[error("Wrong number of joints in message: expected {expected}, got {actual}")]
    JointCountMismatch { expected: usize, actual: usize },

    #[error("Wrong joint names: expected {expected:?}, got {actual:?}")]
    JointNamesMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

fn format_missing_nodes(namespace: &str, missing: &[String]) -> String {
    missing
        .iter()
        .map(|name| format!("ns: {namespace}, ctrl:{name}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_identities(seen: &[NodeIdentity]) -> String {
    let pairs: Vec<String> = seen
        .iter()
        .map(|id| format!("('{}', '{}')", id.name, id.namespace))
        .collect();
    format!("[{}]", pairs.join(", "))
}
