use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::checks::ControllerCheck;
use crate::{
    DEFAULT_CONTROLLERS_TIMEOUT_MS, DEFAULT_CONTROLLER_STATE, DEFAULT_NODE_TIMEOUT_MS,
    DEFAULT_SERVICE_CALL_TIMEOUT_MS, DEFAULT_TOPIC_TIMEOUT_MS,
};

const ENV_PREFIX: &str = "CONTROLLER_CHECKS_";

/// Default timeouts and targets used by a launch test suite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    pub node_timeout_ms: u64,
    pub controllers_timeout_ms: u64,
    pub service_call_timeout_ms: u64,
    pub topic_timeout_ms: u64,
    pub namespace: String,
    pub controller_state: String,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            node_timeout_ms: DEFAULT_NODE_TIMEOUT_MS,
            controllers_timeout_ms: DEFAULT_CONTROLLERS_TIMEOUT_MS,
            service_call_timeout_ms: DEFAULT_SERVICE_CALL_TIMEOUT_MS,
            topic_timeout_ms: DEFAULT_TOPIC_TIMEOUT_MS,
            namespace: String::new(),
            controller_state: DEFAULT_CONTROLLER_STATE.to_string(),
        }
    }
}

impl CheckConfig {
    pub fn validate(&self) -> Result<()> {
        if self.node_timeout_ms == 0 {
            return Err(anyhow::anyhow!("node_timeout_ms must be greater than 0"));
        }

        if self.controllers_timeout_ms == 0 {
            return Err(anyhow::anyhow!(
                "controllers_timeout_ms must be greater than 0"
            ));
        }

        if self.service_call_timeout_ms == 0 {
            return Err(anyhow::anyhow!(
                "service_call_timeout_ms must be greater than 0"
            ));
        }

        if self.topic_timeout_ms == 0 {
            return Err(anyhow::anyhow!("topic_timeout_ms must be greater than 0"));
        }

        if self.controller_state.trim().is_empty() {
            return Err(anyhow::anyhow!("controller_state must not be empty"));
        }

        Ok(())
    }

    pub fn node_timeout(&self) -> Duration {
        Duration::from_millis(self.node_timeout_ms)
    }

    pub fn controllers_timeout(&self) -> Duration {
        Duration::from_millis(self.controllers_timeout_ms)
    }

    pub fn service_call_timeout(&self) -> Duration {
        Duration::from_millis(self.service_call_timeout_ms)
    }

    pub fn topic_timeout(&self) -> Duration {
        Duration::from_millis(self.topic_timeout_ms)
    }

    /// Options for the controller and hardware checks built from this config.
    pub fn controller_check(&self) -> ControllerCheck {
        ControllerCheck::new()
            .namespace(&self.namespace)
            .state(&self.controller_state)
            .timeout(self.controllers_timeout())
            .service_timeout(self.service_call_timeout())
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `CONTROLLER_CHECKS_*` overrides from `lookup`. Unparsable
    /// numbers are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));
        let millis = |name: &str| var(name).and_then(|v| v.parse::<u64>().ok());

        if let Some(ms) = millis("NODE_TIMEOUT_MS") {
            self.node_timeout_ms = ms;
        }

        if let Some(ms) = millis("CONTROLLERS_TIMEOUT_MS") {
            self.controllers_timeout_ms = ms;
        }

        if let Some(ms) = millis("SERVICE_CALL_TIMEOUT_MS") {
            self.service_call_timeout_ms = ms;
        }

        if let Some(ms) = millis("TOPIC_TIMEOUT_MS") {
            self.topic_timeout_ms = ms;
        }

        if let Some(namespace) = var("NAMESPACE") {
            self.namespace = namespace;
        }

        if let Some(state) = var("CONTROLLER_STATE") {
            self.controller_state = state;
        }
    }
}

/// Load configuration: env vars > config file > defaults
pub fn load_config(config_path: Option<&Path>) -> Result<CheckConfig> {
    let mut config = CheckConfig::default();

    if let Some(path) = config_path {
        if path.exists() {
            let file_content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;

            config = toml::from_str(&file_content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

            log::info!("Loaded check configuration from file: {}", path.display());
        } else {
            log::info!("Config file not found: {}, using defaults", path.display());
        }
    }

    config.apply_env_overrides();

    config
        .validate()
        .with_context(|| "Configuration validation failed")?;

    log::debug!("Final check config: {config:?}");

    Ok(config)
}
