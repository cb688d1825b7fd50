pub mod checks;
pub mod client;
pub mod config;
pub mod error;
pub mod messages;
pub mod namespace;
pub mod polling;

#[cfg(any(test, feature = "test-harness"))]
pub mod test_harness;

// Re-export commonly used items
pub use checks::{
    assert_controllers_running, assert_hardware_components_state, assert_joint_states_published,
    assert_node_running, check_controllers_running, check_hardware_components_state,
    check_joint_states_published, check_node_running, ControllerCheck,
};
pub use client::{ControllerManagerClient, JointStateSource, NodeGraph, TopicWaiter};
pub use config::{load_config, CheckConfig};
pub use error::CheckError;
pub use messages::{
    ControllerState, HardwareComponentInfo, JointState, LifecycleState, NodeIdentity,
};

// Default timeouts, matching the launch-test conventions of ros2_control
pub const DEFAULT_NODE_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_CONTROLLERS_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_SERVICE_CALL_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_TOPIC_TIMEOUT_MS: u64 = 20_000;
pub const POLL_INTERVAL_MS: u64 = 100;

pub const DEFAULT_CONTROLLER_STATE: &str = "active";
pub const CONTROLLER_MANAGER_NODE: &str = "controller_manager";
