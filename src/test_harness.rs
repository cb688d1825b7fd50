//! In-memory backends for exercising the checks without a middleware.
//!
//! Enabled for unit tests and behind the `test-harness` feature for the
//! integration tests. Everything here is driven by tokio time, so tests run
//! with `#[tokio::test(start_paused = true)]` and never sleep for real.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::client::{ControllerManagerClient, JointStateSource, NodeGraph, TopicWaiter};
use crate::messages::{ControllerState, HardwareComponentInfo, JointState, NodeIdentity};

/// Installs env_logger once per test binary.
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

struct ScheduledNode {
    identity: NodeIdentity,
    visible_from: Instant,
}

/// ROS graph whose nodes become visible at scheduled times.
pub struct FakeRosGraph {
    nodes: Vec<ScheduledNode>,
    failure: Option<String>,
    name_queries: AtomicUsize,
    pair_queries: AtomicUsize,
}

impl Default for FakeRosGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeRosGraph {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            failure: None,
            name_queries: AtomicUsize::new(0),
            pair_queries: AtomicUsize::new(0),
        }
    }

    /// Registers a node that is visible immediately.
    pub fn add_node(&mut self, name: &str, namespace: &str) -> &mut Self {
        self.add_node_after(name, namespace, Duration::ZERO)
    }

    /// Registers a node that shows up `delay` after this call.
    pub fn add_node_after(&mut self, name: &str, namespace: &str, delay: Duration) -> &mut Self {
        self.nodes.push(ScheduledNode {
            identity: NodeIdentity::new(name, namespace),
            visible_from: Instant::now() + delay,
        });
        self
    }

    /// Makes every discovery query fail with `message`.
    pub fn fail_with(&mut self, message: &str) -> &mut Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn node_name_queries(&self) -> usize {
        self.name_queries.load(Ordering::Relaxed)
    }

    pub fn node_pair_queries(&self) -> usize {
        self.pair_queries.load(Ordering::Relaxed)
    }

    fn visible(&self) -> Result<Vec<NodeIdentity>> {
        if let Some(message) = &self.failure {
            return Err(anyhow::anyhow!("{message}"));
        }
        let now = Instant::now();
        Ok(self
            .nodes
            .iter()
            .filter(|node| node.visible_from <= now)
            .map(|node| node.identity.clone())
            .collect())
    }
}

impl NodeGraph for FakeRosGraph {
    async fn node_names(&self) -> Result<Vec<String>> {
        self.name_queries.fetch_add(1, Ordering::Relaxed);
        Ok(self.visible()?.into_iter().map(|id| id.name).collect())
    }

    async fn node_names_and_namespaces(&self) -> Result<Vec<NodeIdentity>> {
        self.pair_queries.fetch_add(1, Ordering::Relaxed);
        self.visible()
    }
}

/// Responses replayed by [`ScriptedControllerManager`], in call order.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ControllerManagerScript {
    pub controllers: Vec<Vec<ControllerState>>,
    pub hardware_components: Vec<Vec<HardwareComponentInfo>>,
}

#[derive(Default)]
struct ScriptState {
    controllers: VecDeque<Vec<ControllerState>>,
    hardware_components: VecDeque<Vec<HardwareComponentInfo>>,
    requested_managers: Vec<String>,
}

/// Controller manager that replays scripted `list_*` responses.
///
/// Each call consumes the next scripted response; once only one is left it is
/// repeated forever. An unscripted service returns an empty list.
pub struct ScriptedControllerManager {
    state: Mutex<ScriptState>,
    response_delay: Duration,
}

impl Default for ScriptedControllerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedControllerManager {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ScriptState::default()),
            response_delay: Duration::ZERO,
        }
    }

    /// Builds a manager from a JSON script, see [`ControllerManagerScript`].
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        let script: ControllerManagerScript =
            serde_json::from_value(value).context("Invalid controller manager script")?;
        let mut manager = Self::new();
        let state = manager.state.get_mut();
        state.controllers = script.controllers.into();
        state.hardware_components = script.hardware_components.into();
        Ok(manager)
    }

    pub fn push_controllers(&mut self, controllers: Vec<ControllerState>) -> &mut Self {
        self.state.get_mut().controllers.push_back(controllers);
        self
    }

    pub fn push_hardware_components(
        &mut self,
        components: Vec<HardwareComponentInfo>,
    ) -> &mut Self {
        self.state.get_mut().hardware_components.push_back(components);
        self
    }

    /// Delays every response, to exercise per-call timeouts.
    pub fn with_response_delay(mut self, delay: Duration) -> Self {
        self.response_delay = delay;
        self
    }

    /// Managers addressed so far, one entry per call.
    pub async fn requested_managers(&self) -> Vec<String> {
        self.state.lock().await.requested_managers.clone()
    }

    async fn respond<T: Clone>(
        &self,
        manager: &str,
        pick: impl FnOnce(&mut ScriptState) -> &mut VecDeque<Vec<T>>,
    ) -> Vec<T> {
        if !self.response_delay.is_zero() {
            tokio::time::sleep(self.response_delay).await;
        }
        let mut state = self.state.lock().await;
        state.requested_managers.push(manager.to_string());
        let queue = pick(&mut *state);
        if queue.len() > 1 {
            queue.pop_front().unwrap_or_default()
        } else {
            queue.front().cloned().unwrap_or_default()
        }
    }
}

impl ControllerManagerClient for ScriptedControllerManager {
    async fn list_controllers(
        &self,
        manager: &str,
        _timeout: Duration,
    ) -> Result<Vec<ControllerState>> {
        Ok(self.respond(manager, |state| &mut state.controllers).await)
    }

    async fn list_hardware_components(
        &self,
        manager: &str,
        _timeout: Duration,
    ) -> Result<Vec<HardwareComponentInfo>> {
        Ok(self
            .respond(manager, |state| &mut state.hardware_components)
            .await)
    }
}

/// Joint state source backed by messages published up front.
#[derive(Default)]
pub struct ScriptedJointStateSource {
    messages: HashMap<String, Vec<JointState>>,
    shutdowns: Arc<AtomicUsize>,
    opened: AtomicUsize,
}

impl ScriptedJointStateSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&mut self, topic: &str, msg: JointState) -> &mut Self {
        self.messages.entry(topic.to_string()).or_default().push(msg);
        self
    }

    /// Number of waiters created so far.
    pub fn opened_waiters(&self) -> usize {
        self.opened.load(Ordering::Relaxed)
    }

    /// Number of waiters that were shut down.
    pub fn shutdown_count(&self) -> usize {
        self.shutdowns.load(Ordering::Relaxed)
    }
}

impl JointStateSource for ScriptedJointStateSource {
    type Waiter = ScriptedTopicWaiter;

    fn wait_for_topics(&self, topics: &[String], timeout: Duration) -> Result<Self::Waiter> {
        self.opened.fetch_add(1, Ordering::Relaxed);
        let messages = topics
            .iter()
            .filter_map(|topic| {
                self.messages
                    .get(topic)
                    .map(|msgs| (topic.clone(), msgs.clone()))
            })
            .collect();

        Ok(ScriptedTopicWaiter {
            topics: topics.to_vec(),
            messages,
            timeout,
            shutdowns: self.shutdowns.clone(),
            shut_down: false,
        })
    }
}

pub struct ScriptedTopicWaiter {
    topics: Vec<String>,
    messages: HashMap<String, Vec<JointState>>,
    timeout: Duration,
    shutdowns: Arc<AtomicUsize>,
    shut_down: bool,
}

impl TopicWaiter for ScriptedTopicWaiter {
    async fn wait(&mut self) -> Result<bool> {
        let all_received = self
            .topics
            .iter()
            .all(|topic| self.messages.get(topic).is_some_and(|msgs| !msgs.is_empty()));
        if !all_received {
            tokio::time::sleep(self.timeout).await;
        }
        Ok(all_received)
    }

    fn received_messages(&self, topic: &str) -> Vec<JointState> {
        self.messages.get(topic).cloned().unwrap_or_default()
    }

    fn shutdown(&mut self) {
        if !self.shut_down {
            self.shut_down = true;
            self.shutdowns.fetch_add(1, Ordering::Relaxed);
        }
    }
}
