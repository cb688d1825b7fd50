use crate::checks::{all_found, call_with_timeout, found_map, missing, ControllerCheck};
use crate::client::ControllerManagerClient;
use crate::error::CheckError;
use crate::polling::Poller;

/// Waits until every named hardware component reports the lifecycle label
/// `options.state`.
pub async fn check_hardware_components_state<C, S>(
    client: &C,
    components: &[S],
    options: &ControllerCheck,
) -> Result<(), CheckError>
where
    C: ControllerManagerClient,
    S: AsRef<str>,
{
    let manager = options.manager_name();
    let service = format!("{manager}/list_hardware_components");
    let mut found = found_map(components);
    if all_found(&found) {
        return Ok(());
    }
    let mut poller = Poller::new(options.timeout);

    log::info!(
        "Waiting up to {:?} for {} hardware component(s) on {manager} to be '{}'",
        options.timeout,
        components.len(),
        options.state
    );

    loop {
        let listed = call_with_timeout(
            &service,
            options.service_timeout,
            client.list_hardware_components(&manager, options.service_timeout),
        )
        .await?;

        if listed.is_empty() {
            log::warn!("{service} returned no hardware components");
            return Err(CheckError::NoHardwareComponents { manager });
        }

        for component in &listed {
            if component.state.label != options.state {
                continue;
            }
            if let Some(is_found) = found.get_mut(&component.name) {
                *is_found = true;
            }
        }

        if all_found(&found) {
            log::info!("Hardware components on {manager} are {}", options.state);
            return Ok(());
        }

        if !poller.next_scan().await {
            break;
        }
    }

    let missing = missing(&found);
    log::warn!("Hardware component(s) not {}: {missing:?}", options.state);
    Err(CheckError::HardwareComponentsNotInState {
        state: options.state.clone(),
        missing,
    })
}
