//! Polling checks for launch tests.
//!
//! Each `check_*` function returns a [`CheckError`] describing what was
//! expected and what was seen. The `assert_*` wrappers panic with that same
//! message for tests that want assertion semantics.

pub mod controllers;
pub mod hardware;
pub mod joint_states;
pub mod node;

use std::collections::BTreeMap;
use std::time::Duration;

pub use controllers::check_controllers_running;
pub use hardware::check_hardware_components_state;
pub use joint_states::check_joint_states_published;
pub use node::check_node_running;

use crate::client::{ControllerManagerClient, JointStateSource, NodeGraph};
use crate::error::CheckError;
use crate::namespace::{controller_manager_name, normalize_namespace};
use crate::{
    DEFAULT_CONTROLLERS_TIMEOUT_MS, DEFAULT_CONTROLLER_STATE, DEFAULT_SERVICE_CALL_TIMEOUT_MS,
};

/// Options shared by the controller and hardware component checks.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerCheck {
    pub namespace: String,
    pub state: String,
    /// Budget for each polling phase
    pub timeout: Duration,
    /// Budget for a single service call
    pub service_timeout: Duration,
}

impl Default for ControllerCheck {
    fn default() -> Self {
        Self {
            namespace: String::new(),
            state: DEFAULT_CONTROLLER_STATE.to_string(),
            timeout: Duration::from_millis(DEFAULT_CONTROLLERS_TIMEOUT_MS),
            service_timeout: Duration::from_millis(DEFAULT_SERVICE_CALL_TIMEOUT_MS),
        }
    }
}

impl ControllerCheck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn namespace(mut self, namespace: &str) -> Self {
        self.namespace = namespace.to_string();
        self
    }

    pub fn state(mut self, state: &str) -> Self {
        self.state = state.to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn service_timeout(mut self, timeout: Duration) -> Self {
        self.service_timeout = timeout;
        self
    }

    pub fn canonical_namespace(&self) -> String {
        normalize_namespace(&self.namespace)
    }

    pub fn manager_name(&self) -> String {
        controller_manager_name(&self.namespace)
    }
}

/// Found flags for one polling phase, keyed by expected name.
pub(crate) fn found_map<S: AsRef<str>>(names: &[S]) -> BTreeMap<String, bool> {
    names
        .iter()
        .map(|name| (name.as_ref().to_string(), false))
        .collect()
}

pub(crate) fn all_found(found: &BTreeMap<String, bool>) -> bool {
    found.values().all(|is_found| *is_found)
}

pub(crate) fn missing(found: &BTreeMap<String, bool>) -> Vec<String> {
    found
        .iter()
        .filter(|(_, is_found)| !**is_found)
        .map(|(name, _)| name.clone())
        .collect()
}

pub async fn assert_node_running<G: NodeGraph>(graph: &G, node_name: &str, timeout: Duration) {
    if let Err(e) = check_node_running(graph, node_name, timeout).await {
        panic!("{e}");
    }
}

pub async fn assert_controllers_running<G, C, S>(
    graph: &G,
    client: &C,
    controllers: &[S],
    options: &ControllerCheck,
) where
    G: NodeGraph,
    C: ControllerManagerClient,
    S: AsRef<str>,
{
    if let Err(e) = check_controllers_running(graph, client, controllers, options).await {
        panic!("{e}");
    }
}

pub async fn assert_joint_states_published<J, S>(
    source: &J,
    topic: &str,
    joint_names: &[S],
    timeout: Duration,
) where
    J: JointStateSource,
    S: AsRef<str>,
{
    if let Err(e) = check_joint_states_published(source, topic, joint_names, timeout).await {
        panic!("{e}");
    }
}

pub async fn assert_hardware_components_state<C, S>(
    client: &C,
    components: &[S],
    options: &ControllerCheck,
) where
    C: ControllerManagerClient,
    S: AsRef<str>,
{
    if let Err(e) = check_hardware_components_state(client, components, options).await {
        panic!("{e}");
    }
}

/// Runs one service call under its own timeout.
pub(crate) async fn call_with_timeout<T, Fut>(
    service: &str,
    timeout: Duration,
    call: Fut,
) -> Result<T, CheckError>
where
    Fut: std::future::Future<Output = anyhow::Result<T>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(CheckError::ServiceTimeout {
            service: service.to_string(),
            timeout,
        }),
    }
}
