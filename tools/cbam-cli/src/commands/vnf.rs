use crate::output::print_output;
use crate::types::{ConnectionArgs, VnfOperation, WaitState};
use anyhow::Context;
use cbam_client::{
    CbamClient, HttpTransport, JsonInput, TerminateVnfRequest,
};
use serde_json::{Map, Value};
use std::io::Read;
use std::time::Duration;

pub async fn handle_vnf_command(
    operation: &VnfOperation,
    conn: &ConnectionArgs,
) -> anyhow::Result<()> {
    let mut client = conn.connect().await?;
    run_vnf_operation(operation, &mut client).await
}

/// Execute one VNF operation against an already connected client
pub async fn run_vnf_operation<T: HttpTransport>(
    operation: &VnfOperation,
    client: &mut CbamClient<T>,
) -> anyhow::Result<()> {
    match operation {
        VnfOperation::List { output } => {
            let vnfs = client.get_vnfs().await?;
            print_output(&serde_json::to_value(vnfs)?, &output.output)
        }
        VnfOperation::Get { id, output } => {
            let vnf = client.get_vnf(id).await?;
            print_output(&serde_json::to_value(vnf)?, &output.output)
        }
        VnfOperation::Find { name, output } => {
            let vnf = client.get_vnf_by_name(name).await?;
            print_output(&serde_json::to_value(vnf)?, &output.output)
        }
        VnfOperation::Create {
            vnfd_id,
            name,
            description,
            output,
        } => {
            let vnf = client
                .create_vnf(vnfd_id, name, description.as_deref())
                .await?;
            print_output(&serde_json::to_value(vnf)?, &output.output)
        }
        VnfOperation::Delete { id } => {
            client.delete_vnf(id).await?;
            println!("VNF '{}' deleted", id);
            Ok(())
        }
        VnfOperation::Instantiate { id, body } => {
            let request = read_json_input(body)?;
            let response = client.instantiate_vnf(id, &request).await?;
            println!("Instantiation of VNF '{}' requested", id);
            print_if_present(&response)
        }
        VnfOperation::Modify { id, body } => {
            let modifications = read_json_input(body)?;
            let response = client.modify_vnf(id, &modifications).await?;
            println!("Modification of VNF '{}' requested", id);
            print_if_present(&response)
        }
        VnfOperation::Terminate {
            id,
            termination_type,
            graceful_timeout,
            params,
        } => {
            let request = TerminateVnfRequest {
                termination_type: termination_type.clone(),
                graceful_termination_timeout: *graceful_timeout,
                additional_params: parse_key_value_pairs(params)?,
            };
            let response = client.terminate_vnf(id, &request).await?;
            println!("Termination of VNF '{}' requested", id);
            print_if_present(&response)
        }
        VnfOperation::Wait {
            id,
            state,
            timeout,
            interval,
        } => {
            let timeout = timeout.map(Duration::from_secs);
            let interval = interval.map(Duration::from_secs);
            let vnf = match state {
                WaitState::Instantiated => {
                    client
                        .wait_until_vnf_is_instantiated(id, timeout, interval)
                        .await?
                }
                WaitState::Terminated => {
                    client
                        .wait_until_vnf_is_terminated(id, timeout, interval)
                        .await?
                }
            };
            println!(
                "VNF '{}' is {}",
                id,
                vnf.instantiation_state.as_deref().unwrap_or("unknown")
            );
            Ok(())
        }
    }
}

fn read_json_input(
    source: &clap_stdin::FileOrStdin,
) -> anyhow::Result<JsonInput> {
    let mut text = String::new();
    source
        .clone()
        .into_reader()
        .context("Failed to open request body")?
        .read_to_string(&mut text)
        .context("Failed to read request body")?;
    Ok(JsonInput::Text(text))
}

fn print_if_present(response: &Value) -> anyhow::Result<()> {
    if !response.is_null() {
        println!("{}", serde_json::to_string_pretty(response)?);
    }
    Ok(())
}

/// Parse `key=value` arguments into a JSON object. Values that parse as JSON
/// (numbers, booleans, objects) keep their type; anything else is a string.
pub fn parse_key_value_pairs(
    pairs: &[String],
) -> anyhow::Result<Map<String, Value>> {
    let mut map = Map::new();
    for kv in pairs {
        let (key, value) = kv.split_once('=').ok_or_else(|| {
            anyhow::anyhow!("Invalid key-value format: {}", kv)
        })?;
        let value = serde_json::from_str(value)
            .unwrap_or_else(|_| Value::String(value.to_string()));
        map.insert(key.to_string(), value);
    }
    Ok(map)
}
