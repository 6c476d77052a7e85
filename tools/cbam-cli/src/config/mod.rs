mod context;
mod file;

pub use context::*;
pub use file::*;

use anyhow::Result;
use cbam_client::CatalogVersion;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Main CLI configuration structure
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CliConfig {
    pub contexts: HashMap<String, ContextConfig>,
    pub current_context: String,
}

/// Connection settings stored under one context name
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ContextConfig {
    pub host: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub catalog_version: Option<CatalogVersion>,
    pub insecure: Option<bool>,
    /// Default `vnf wait` timeout in seconds
    pub wait_timeout: Option<u64>,
}

impl ContextConfig {
    /// Copy of this context with the client secret masked, for display.
    pub fn redacted(&self) -> Self {
        Self {
            client_secret: self.client_secret.as_ref().map(|_| "****".into()),
            ..self.clone()
        }
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        let mut contexts = HashMap::new();
        contexts.insert("default".to_string(), ContextConfig::default());

        Self {
            contexts,
            current_context: "default".to_string(),
        }
    }
}

impl CliConfig {
    /// Get the current context configuration
    pub fn current_context(&self) -> Option<&ContextConfig> {
        self.contexts.get(&self.current_context)
    }

    /// Get a specific context configuration
    pub fn get_context(&self, name: &str) -> Option<&ContextConfig> {
        self.contexts.get(name)
    }

    /// Set the current context
    pub fn set_current_context(&mut self, name: String) -> Result<()> {
        if !self.contexts.contains_key(&name) {
            return Err(anyhow::anyhow!("Context '{}' does not exist", name));
        }
        self.current_context = name;
        Ok(())
    }

    /// Update or create a context
    pub fn set_context(&mut self, name: String, config: ContextConfig) {
        self.contexts.insert(name, config);
    }

    /// All context names, sorted
    pub fn list_contexts(&self) -> Vec<&String> {
        let mut names: Vec<_> = self.contexts.keys().collect();
        names.sort();
        names
    }

    /// Copy of the configuration safe to print.
    pub fn redacted(&self) -> Self {
        Self {
            contexts: self
                .contexts
                .iter()
                .map(|(name, ctx)| (name.clone(), ctx.redacted()))
                .collect(),
            current_context: self.current_context.clone(),
        }
    }
}

/// Load or create configuration from a specific path
pub async fn load_or_create_config_from_path(
    config_path: &std::path::Path,
) -> Result<CliConfig> {
    if config_path.exists() {
        return file::load_config_from_path(config_path).await;
    }
    let config = CliConfig::default();
    file::save_config_to_path(&config, config_path).await?;
    Ok(config)
}
