use std::time::Duration;

use crate::client::NodeGraph;
use crate::error::CheckError;
use crate::polling::poll_until;

/// Waits until `node_name` shows up in graph discovery.
///
/// Scans every 100 ms. At least one scan runs even with a zero timeout.
pub async fn check_node_running<G: NodeGraph>(
    graph: &G,
    node_name: &str,
    timeout: Duration,
) -> Result<(), CheckError> {
    log::info!("Waiting up to {timeout:?} for node '{node_name}'");

    let found = poll_until(timeout, || async move {
        let names = graph.node_names().await?;
        log::debug!("Discovery reports {} node(s)", names.len());
        Ok::<_, CheckError>(names.iter().any(|name| name == node_name).then_some(()))
    })
    .await?;

    if found.is_none() {
        log::warn!("Node '{node_name}' not found within {timeout:?}");
        return Err(CheckError::NodeNotFound {
            node: node_name.to_string(),
        });
    }

    log::info!("Node '{node_name}' is running");
    Ok(())
}
