mod commands;
mod config;
mod output;
mod types;

use std::process;

pub use config::{CliConfig, ContextConfig, ContextManager};
pub use output::{OutputArgs, print_output};
pub use types::{
    CbamCli, CbamCommands, ConnectionArgs, ContextOperation, OutputFormat,
    PackageOperation, ResolvedConnection, VnfOperation, WaitState,
};

pub async fn run(cli: CbamCli) {
    match &cli.command {
        CbamCommands::Vnf { opt, conn } => {
            if let Err(e) = commands::handle_vnf_command(opt, conn).await {
                eprintln!("VNF command failed: {}", e);
                process::exit(1);
            }
        }
        CbamCommands::Package { opt, conn } => {
            if let Err(e) = commands::handle_package_command(opt, conn).await {
                eprintln!("Package command failed: {}", e);
                process::exit(1);
            }
        }
        CbamCommands::Context { opt } => {
            if let Err(e) = commands::handle_context_command(opt).await {
                eprintln!("Context command failed: {}", e);
                process::exit(1);
            }
        }
    }
}
