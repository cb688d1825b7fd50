//! Namespace handling shared by the controller and hardware checks.

use crate::CONTROLLER_MANAGER_NODE;

/// Canonical namespace form: one leading slash, no trailing slash, `/` for root.
pub fn normalize_namespace(namespace: &str) -> String {
    let trimmed = namespace.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Name of the controller manager node serving `namespace`.
///
/// The root manager is addressed by its relative name; every other manager by
/// its fully qualified name, e.g. `/robot1/controller_manager`.
pub fn controller_manager_name(namespace: &str) -> String {
    let canonical = normalize_namespace(namespace);
    if canonical == "/" {
        CONTROLLER_MANAGER_NODE.to_string()
    } else {
        format!("{canonical}/{CONTROLLER_MANAGER_NODE}")
    }
}
