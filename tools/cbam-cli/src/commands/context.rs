use crate::config::{ContextConfig, ContextManager};
use crate::types::ContextOperation;
use anyhow::Result;

/// Handle context management commands
pub async fn handle_context_command(
    operation: &ContextOperation,
) -> Result<()> {
    let mut manager = ContextManager::new().await?;
    handle_context_command_with_manager(operation, &mut manager).await
}

/// Handle context management commands with a specific ContextManager
pub async fn handle_context_command_with_manager(
    operation: &ContextOperation,
    manager: &mut ContextManager,
) -> Result<()> {
    match operation {
        ContextOperation::Set {
            name,
            host,
            client_id,
            client_secret,
            catalog_version,
            insecure,
            wait_timeout,
        } => {
            let update = ContextConfig {
                host: host.clone(),
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
                catalog_version: *catalog_version,
                insecure: *insecure,
                wait_timeout: *wait_timeout,
            };
            handle_context_set(name.clone(), update, manager).await
        }
        ContextOperation::Get => handle_context_get(manager),
        ContextOperation::Select { name } => {
            handle_context_select(name.clone(), manager).await
        }
    }
}

async fn handle_context_set(
    name: Option<String>,
    update: ContextConfig,
    manager: &mut ContextManager,
) -> Result<()> {
    manager.set_context(name.clone(), update).await?;

    let context_name =
        name.unwrap_or_else(|| manager.config().current_context.clone());
    println!("ctx:'{}' updated successfully", context_name);

    if let Some(context) = manager.config().get_context(&context_name) {
        println!("Configuration:");
        if let Some(host) = &context.host {
            println!("  host: '{}'", host);
        }
        if let Some(id) = &context.client_id {
            println!("  clientId: '{}'", id);
        }
        if context.client_secret.is_some() {
            println!("  clientSecret: '****'");
        }
        if let Some(version) = &context.catalog_version {
            println!("  catalogVersion: '{}'", version);
        }
        if let Some(insecure) = &context.insecure {
            println!("  insecure: {}", insecure);
        }
        if let Some(timeout) = &context.wait_timeout {
            println!("  waitTimeout: {}s", timeout);
        }
    }

    Ok(())
}

fn handle_context_get(manager: &ContextManager) -> Result<()> {
    println!("# {}", manager.config_path().display());
    let contexts = manager
        .list_contexts()
        .into_iter()
        .cloned()
        .collect::<Vec<_>>();
    println!("# contexts: {}", contexts.join(", "));
    let config_json =
        serde_json::to_string_pretty(&manager.config().redacted())?;
    println!("{}", config_json);
    Ok(())
}

async fn handle_context_select(
    name: String,
    manager: &mut ContextManager,
) -> Result<()> {
    manager.select_context(name.clone()).await?;
    println!("Switched to context '{}'", name);
    Ok(())
}
