use serde::{Deserialize, Serialize};
use std::fmt;

/// A node as reported by graph discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeIdentity {
    pub name: String,
    pub namespace: String,
}

impl NodeIdentity {
    pub fn new(name: &str, namespace: &str) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.to_string(),
        }
    }
}

impl fmt::Display for NodeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.ends_with('/') {
            write!(f, "{}{}", self.namespace, self.name)
        } else {
            write!(f, "{}/{}", self.namespace, self.name)
        }
    }
}

/// One entry of the controller manager's `list_controllers` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerState {
    pub name: String,
    pub state: String,
    #[serde(rename = "type", default)]
    pub controller_type: String,
}

impl ControllerState {
    pub fn new(name: &str, state: &str) -> Self {
        Self {
            name: name.to_string(),
            state: state.to_string(),
            controller_type: String::new(),
        }
    }

    pub fn with_type(mut self, controller_type: &str) -> Self {
        self.controller_type = controller_type.to_string();
        self
    }
}

/// `sensor_msgs/JointState`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JointState {
    pub name: Vec<String>,
    #[serde(default)]
    pub position: Vec<f64>,
    #[serde(default)]
    pub velocity: Vec<f64>,
    #[serde(default)]
    pub effort: Vec<f64>,
}

impl JointState {
    /// Message carrying only joint names, with every value vector zeroed.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let name: Vec<String> = names.iter().map(|n| n.as_ref().to_string()).collect();
        let zeros = vec![0.0; name.len()];
        Self {
            name,
            position: zeros.clone(),
            velocity: zeros.clone(),
            effort: zeros,
        }
    }
}

// lifecycle_msgs/State primary state ids
pub const PRIMARY_STATE_UNKNOWN: u8 = 0;
pub const PRIMARY_STATE_UNCONFIGURED: u8 = 1;
pub const PRIMARY_STATE_INACTIVE: u8 = 2;
pub const PRIMARY_STATE_ACTIVE: u8 = 3;
pub const PRIMARY_STATE_FINALIZED: u8 = 4;

/// Lifecycle state of a managed node or hardware component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleState {
    pub id: u8,
    pub label: String,
}

impl LifecycleState {
    pub fn new(id: u8, label: &str) -> Self {
        Self {
            id,
            label: label.to_string(),
        }
    }

    pub fn unknown() -> Self {
        Self::new(PRIMARY_STATE_UNKNOWN, "unknown")
    }

    pub fn unconfigured() -> Self {
        Self::new(PRIMARY_STATE_UNCONFIGURED, "unconfigured")
    }

    pub fn inactive() -> Self {
        Self::new(PRIMARY_STATE_INACTIVE, "inactive")
    }

    pub fn active() -> Self {
        Self::new(PRIMARY_STATE_ACTIVE, "active")
    }

    pub fn finalized() -> Self {
        Self::new(PRIMARY_STATE_FINALIZED, "finalized")
    }
}

impl Default for LifecycleState {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Hardware component information reported by the controller manager.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HardwareComponentInfo {
    pub name: String,
    /// Component classification: "actuator", "sensor" or "system"
    #[serde(rename = "type", default)]
    pub component_type: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub plugin_name: String,
    #[serde(default)]
    pub is_async: bool,
    /// Read/write rate in Hz
    #[serde(default)]
    pub rw_rate: u32,
    #[serde(default)]
    pub state: LifecycleState,
    #[serde(default)]
    pub state_interfaces: Vec<String>,
    #[serde(default)]
    pub command_interfaces: Vec<String>,
}

impl HardwareComponentInfo {
    pub fn new(name: &str, component_type: &str, state: LifecycleState) -> Self {
        Self {
            name: name.to_string(),
            component_type: component_type.to_string(),
            state,
            ..Default::default()
        }
    }
}
