use crate::checks::{all_found, call_with_timeout, found_map, missing, ControllerCheck};
use crate::client::{ControllerManagerClient, NodeGraph};
use crate::error::CheckError;
use crate::polling::Poller;

/// Waits until every controller in `controllers` runs in the requested state.
///
/// Runs in two phases, each with the full `options.timeout`:
/// 1. the controller nodes must appear in discovery under the canonical namespace;
/// 2. the controller manager must list every controller in `options.state`.
///
/// An empty `list_controllers` response fails at once instead of being retried.
pub async fn check_controllers_running<G, C, S>(
    graph: &G,
    client: &C,
    controllers: &[S],
    options: &ControllerCheck,
) -> Result<(), CheckError>
where
    G: NodeGraph,
    C: ControllerManagerClient,
    S: AsRef<str>,
{
    let namespace = options.canonical_namespace();
    log::info!(
        "Checking {} controller(s) in namespace {namespace} for state '{}'",
        controllers.len(),
        options.state
    );

    wait_for_controller_nodes(graph, controllers, &namespace, options).await?;
    wait_for_controller_state(client, controllers, options).await?;

    log::info!("All controllers in {namespace} are {}", options.state);
    Ok(())
}

async fn wait_for_controller_nodes<G, S>(
    graph: &G,
    controllers: &[S],
    namespace: &str,
    options: &ControllerCheck,
) -> Result<(), CheckError>
where
    G: NodeGraph,
    S: AsRef<str>,
{
    let mut found = found_map(controllers);
    if all_found(&found) {
        return Ok(());
    }
    let mut poller = Poller::new(options.timeout);

    loop {
        let nodes = graph.node_names_and_namespaces().await?;
        for (name, is_found) in found.iter_mut() {
            if nodes
                .iter()
                .any(|node| node.name == *name && node.namespace == namespace)
            {
                *is_found = true;
            }
        }

        if all_found(&found) {
            log::debug!(
                "Controller nodes present after {} scan(s)",
                poller.intervals() + 1
            );
            return Ok(());
        }

        if !poller.next_scan().await {
            break;
        }
    }

    let missing = missing(&found);
    log::warn!("Controller node(s) missing in {namespace}: {missing:?}");
    let seen = graph.node_names_and_namespaces().await?;
    Err(CheckError::ControllerNodesNotFound {
        namespace: namespace.to_string(),
        missing,
        seen,
    })
}

async fn wait_for_controller_state<C, S>(
    client: &C,
    controllers: &[S],
    options: &ControllerCheck,
) -> Result<(), CheckError>
where
    C: ControllerManagerClient,
    S: AsRef<str>,
{
    let manager = options.manager_name();
    let service = format!("{manager}/list_controllers");
    let mut found = found_map(controllers);
    if all_found(&found) {
        return Ok(());
    }
    let mut poller = Poller::new(options.timeout);

    loop {
        let listed = call_with_timeout(
            &service,
            options.service_timeout,
            client.list_controllers(&manager, options.service_timeout),
        )
        .await?;

        if listed.is_empty() {
            log::warn!("{service} returned no controllers");
            return Err(CheckError::NoControllers { manager });
        }

        // flags are sticky: a controller seen in the target state stays found
        for controller in &listed {
            if controller.state != options.state {
                continue;
            }
            if let Some(is_found) = found.get_mut(&controller.name) {
                *is_found = true;
            }
        }

        if all_found(&found) {
            return Ok(());
        }

        log::debug!("Waiting on controller(s) {:?}", missing(&found));

        if !poller.next_scan().await {
            break;
        }
    }

    let missing = missing(&found);
    log::warn!("Controller(s) not {}: {missing:?}", options.state);
    Err(CheckError::ControllersNotInState {
        state: options.state.clone(),
        missing,
    })
}
