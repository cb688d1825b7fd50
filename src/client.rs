//! Collaborator interfaces the checks poll.
//!
//! Backends (an rclrs node, a recorded graph, the in-memory harness) implement
//! these traits. The checks only ever issue read-only queries through them.

#![allow(async_fn_in_trait)]

use anyhow::Result;
use std::time::Duration;

use crate::messages::{ControllerState, HardwareComponentInfo, JointState, NodeIdentity};

/// Graph discovery on the middleware.
pub trait NodeGraph {
    /// Names of every node currently known to discovery.
    async fn node_names(&self) -> Result<Vec<String>>;

    /// Every known node together with its namespace.
    async fn node_names_and_namespaces(&self) -> Result<Vec<NodeIdentity>>;
}

/// Client for the controller manager services.
pub trait ControllerManagerClient {
    /// Calls `<manager>/list_controllers`.
    async fn list_controllers(
        &self,
        manager: &str,
        timeout: Duration,
    ) -> Result<Vec<ControllerState>>;

    /// Calls `<manager>/list_hardware_components`.
    async fn list_hardware_components(
        &self,
        manager: &str,
        timeout: Duration,
    ) -> Result<Vec<HardwareComponentInfo>>;
}

/// Subscription set waiting for the first message on each of its topics.
pub trait TopicWaiter {
    /// Resolves to `true` once every topic received a message, `false` when
    /// the waiter's timeout expired first.
    async fn wait(&mut self) -> Result<bool>;

    fn received_messages(&self, topic: &str) -> Vec<JointState>;

    /// Destroys the subscriptions. Must be safe to call more than once.
    fn shutdown(&mut self);
}

/// Factory for joint state subscriptions.
pub trait JointStateSource {
    type Waiter: TopicWaiter;

    fn wait_for_topics(&self, topics: &[String], timeout: Duration) -> Result<Self::Waiter>;
}

/// Shuts the wrapped waiter down when dropped, whatever path the check took.
pub struct WaiterGuard<W: TopicWaiter> {
    waiter: W,
}

impl<W: TopicWaiter> WaiterGuard<W> {
    pub fn new(waiter: W) -> Self {
        Self { waiter }
    }
}

impl<W: TopicWaiter> std::ops::Deref for WaiterGuard<W> {
    type Target = W;

    fn deref(&self) -> &W {
        &self.waiter
    }
}

impl<W: TopicWaiter> std::ops::DerefMut for WaiterGuard<W> {
    fn deref_mut(&mut self) -> &mut W {
        &mut self.waiter
    }
}

impl<W: TopicWaiter> Drop for WaiterGuard<W> {
    fn drop(&mut self) {
        self.waiter.shutdown();
    }
}
