//! Registry configuration

use dockman_core::{ContainerId, Error, Result};
use serde::{Deserialize, Serialize};

/// Default container tool
pub const DEFAULT_TOOL: &str = "docker";

/// Registry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Executable name or path of the container tool
    pub tool: String,

    /// Keep the last built collection and return it from later listings
    pub cache: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            tool: DEFAULT_TOOL.to_string(),
            cache: false,
        }
    }
}

impl RegistryConfig {
    /// Create a new registry configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use another tool with the same command line (e.g. `podman`)
    #[must_use]
    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = tool.into();
        self
    }

    /// Enable or disable collection caching
    #[must_use]
    pub fn with_cache(mut self, enable: bool) -> Self {
        self.cache = enable;
        self
    }

    /// Check the configuration before use
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] if the tool is blank.
    pub fn validate(&self) -> Result<()> {
        if self.tool.trim().is_empty() {
            return Err(Error::InvalidConfig {
                message: "Container tool cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    /// `<tool> ps -a`
    #[must_use]
    pub fn list_all_command(&self) -> Vec<String> {
        vec![self.tool.clone(), "ps".to_string(), "-a".to_string()]
    }

    /// `<tool> ps`
    #[must_use]
    pub fn list_running_command(&self) -> Vec<String> {
        vec![self.tool.clone(), "ps".to_string()]
    }

    /// `<tool> stop <id>`
    #[must_use]
    pub fn stop_command(&self, id: &ContainerId) -> Vec<String> {
        vec![self.tool.clone(), "stop".to_string(), id.to_string()]
    }

    /// `<tool> rm <id>`
    #[must_use]
    pub fn remove_command(&self, id: &ContainerId) -> Vec<String> {
        vec![self.tool.clone(), "rm".to_string(), id.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegistryConfig::default();
        assert_eq!(config.tool, "docker");
        assert!(!config.cache);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = RegistryConfig::new().with_tool("podman").with_cache(true);
        assert_eq!(config.tool, "podman");
        assert!(config.cache);
        assert_eq!(config.list_all_command(), ["podman", "ps", "-a"]);
    }

    #[test]
    fn test_commands() {
        let config = RegistryConfig::new();
        let id = ContainerId::new("web").unwrap();
        assert_eq!(config.list_running_command(), ["docker", "ps"]);
        assert_eq!(config.stop_command(&id), ["docker", "stop", "web"]);
        assert_eq!(config.remove_command(&id), ["docker", "rm", "web"]);
    }

    #[test]
    fn test_blank_tool_rejected() {
        let config = RegistryConfig::new().with_tool("  ");
        assert!(matches!(config.validate(), Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn test_config_serde_defaults() {
        let config: RegistryConfig = serde_json::from_str(r#"{"cache":true}"#).unwrap();
        assert_eq!(config.tool, "docker");
        assert!(config.cache);
    }
}
