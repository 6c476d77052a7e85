use super::{CliConfig, ContextConfig, file};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Context management operations
pub struct ContextManager {
    config: CliConfig,
    config_path: PathBuf,
}

impl ContextManager {
    /// Load the configuration from `$CBAM_CONFIG_PATH` or `~/.cbam/config.yml`,
    /// creating it when missing.
    pub async fn new() -> Result<Self> {
        Self::with_config_path(file::get_config_file_path()?).await
    }

    /// Create a context manager bound to a specific config file
    pub async fn with_config_path<P: AsRef<Path>>(
        config_path: P,
    ) -> Result<Self> {
        let config =
            super::load_or_create_config_from_path(config_path.as_ref())
                .await?;
        Ok(Self {
            config,
            config_path: config_path.as_ref().to_path_buf(),
        })
    }

    pub fn config(&self) -> &CliConfig {
        &self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Save configuration changes
    pub async fn save(&self) -> Result<()> {
        file::save_config_to_path(&self.config, &self.config_path).await
    }

    /// Merge the given fields into a context (the current one when `name` is
    /// `None`), creating it if needed. Unset fields keep their stored value.
    pub async fn set_context(
        &mut self,
        name: Option<String>,
        update: ContextConfig,
    ) -> Result<()> {
        let context_name =
            name.unwrap_or_else(|| self.config.current_context.clone());

        let mut context = self
            .config
            .get_context(&context_name)
            .cloned()
            .unwrap_or_default();

        if update.host.is_some() {
            context.host = update.host;
        }
        if update.client_id.is_some() {
            context.client_id = update.client_id;
        }
        if update.client_secret.is_some() {
            context.client_secret = update.client_secret;
        }
        if update.catalog_version.is_some() {
            context.catalog_version = update.catalog_version;
        }
        if update.insecure.is_some() {
            context.insecure = update.insecure;
        }
        if update.wait_timeout.is_some() {
            context.wait_timeout = update.wait_timeout;
        }

        self.config.set_context(context_name.clone(), context);

        // If the current context points nowhere, adopt the one just written
        if !self
            .config
            .contexts
            .contains_key(&self.config.current_context)
        {
            self.config.current_context = context_name;
        }

        self.save().await
    }

    /// Switch to a different context
    pub async fn select_context(&mut self, name: String) -> Result<()> {
        self.config.set_current_context(name)?;
        self.save().await
    }

    /// Get current context configuration
    pub fn get_current_context(&self) -> Option<&ContextConfig> {
        self.config.current_context()
    }

    /// The named context, or the current one when `name` is `None`.
    pub fn resolve_context(&self, name: Option<&str>) -> Result<ContextConfig> {
        match name {
            Some(name) => self.config.get_context(name).cloned().ok_or_else(
                || anyhow::anyhow!("Context '{}' does not exist", name),
            ),
            None => Ok(self.get_current_context().cloned().unwrap_or_default()),
        }
    }

    pub fn list_contexts(&self) -> Vec<&String> {
        self.config.list_contexts()
    }
}
