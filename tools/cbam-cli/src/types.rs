use crate::config::{ContextConfig, ContextManager};
use cbam_client::{CatalogVersion, CbamClient, CbamEnv, Credentials};
use std::path::PathBuf;
use std::time::Duration;

use crate::output::OutputArgs;

/// Version string including the git commit, leaked to get a static str
fn get_version_info() -> &'static str {
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = option_env!("GIT_HASH").unwrap_or("unknown");
    Box::leak(format!("{} (git {})", version, git_hash).into_boxed_str())
}

/// Main CLI structure
#[derive(clap::Parser, Clone, Debug)]
#[clap(author, version = get_version_info(), about, long_about = None)]
pub struct CbamCli {
    #[command(subcommand)]
    pub command: CbamCommands,
}

/// Available CLI commands
#[derive(clap::Subcommand, Clone, Debug)]
pub enum CbamCommands {
    /// VNF instance lifecycle operations
    #[clap(aliases = &["v", "instance"])]
    Vnf {
        #[command(subcommand)]
        opt: VnfOperation,
        #[clap(flatten)]
        conn: ConnectionArgs,
    },
    /// VNF package (VNFD) catalog operations
    #[clap(aliases = &["pkg", "p", "vnfd"])]
    Package {
        #[command(subcommand)]
        opt: PackageOperation,
        #[clap(flatten)]
        conn: ConnectionArgs,
    },
    /// Context management operations
    #[clap(aliases = &["ctx"])]
    Context {
        #[command(subcommand)]
        opt: ContextOperation,
    },
}

/// Connection settings. Each value falls back to the selected context and
/// then to the environment (`HOST`, `CLIENT_ID`, `CLIENT_SECRET`, ...).
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// CBAM host, or a full base URL with scheme
    #[arg(long, global = true)]
    pub host: Option<String>,
    /// OAuth2 client id
    #[arg(long, global = true)]
    pub client_id: Option<String>,
    /// OAuth2 client secret
    #[arg(long, global = true)]
    pub client_secret: Option<String>,
    /// Catalog API version (`SOL005` or `v18`)
    #[arg(long, global = true)]
    pub catalog_version: Option<CatalogVersion>,
    /// Accept invalid TLS certificates
    #[arg(long, default_value = "false", global = true)]
    pub insecure: bool,
    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,
    /// Use this context instead of the current one
    #[arg(long, global = true)]
    pub context: Option<String>,
}

/// Connection settings after merging flags, context and environment
#[derive(Debug, Clone)]
pub struct ResolvedConnection {
    pub credentials: Credentials,
    pub catalog: CatalogVersion,
    pub wait_timeout: Option<Duration>,
}

impl ConnectionArgs {
    /// Merge explicit arguments over `context`, then `env`
    pub fn resolve(
        &self,
        context: &ContextConfig,
        env: &CbamEnv,
    ) -> anyhow::Result<ResolvedConnection> {
        let mut options = env.transport_options();
        options.accept_invalid_certs = self.insecure
            || context.insecure.unwrap_or(options.accept_invalid_certs);
        if let Some(secs) = self.timeout_secs {
            options.timeout = Some(Duration::from_secs(secs));
        }

        let credentials = env
            .credentials(
                self.host.clone().or_else(|| context.host.clone()),
                self.client_id.clone().or_else(|| context.client_id.clone()),
                self.client_secret
                    .clone()
                    .or_else(|| context.client_secret.clone()),
            )?
            .with_options(options);
        let catalog = match self.catalog_version.or(context.catalog_version) {
            Some(version) => version,
            None => env.catalog_version()?,
        };

        Ok(ResolvedConnection {
            credentials,
            catalog,
            wait_timeout: context.wait_timeout.map(Duration::from_secs),
        })
    }

    /// Resolve the settings and open an authenticated session
    pub async fn connect(&self) -> anyhow::Result<CbamClient> {
        let manager = ContextManager::new().await?;
        let context = manager.resolve_context(self.context.as_deref())?;
        let env = CbamEnv::load()?;
        let resolved = self.resolve(&context, &env)?;
        tracing::debug!("using connection settings: {:?}", resolved);

        let mut client =
            CbamClient::connect(resolved.credentials, resolved.catalog)
                .await?;
        if let Some(timeout) = resolved.wait_timeout {
            client.set_wait_until_timeout(timeout);
        }
        Ok(client)
    }
}

/// VNF instance operations
#[derive(clap::Subcommand, Clone, Debug)]
pub enum VnfOperation {
    /// List all VNF instances
    #[clap(aliases = &["ls", "l"])]
    List {
        #[clap(flatten)]
        output: OutputArgs,
    },
    /// Get a VNF instance by id
    #[clap(aliases = &["g"])]
    Get {
        id: String,
        #[clap(flatten)]
        output: OutputArgs,
    },
    /// Find the first VNF instance with the given name
    #[clap(aliases = &["f"])]
    Find {
        name: String,
        #[clap(flatten)]
        output: OutputArgs,
    },
    /// Create a VNF instance from a VNFD
    #[clap(aliases = &["c"])]
    Create {
        vnfd_id: String,
        name: String,
        /// Instance description
        #[arg(short, long)]
        description: Option<String>,
        #[clap(flatten)]
        output: OutputArgs,
    },
    /// Delete a VNF instance
    #[clap(aliases = &["rm", "d"])]
    Delete { id: String },
    /// Instantiate a VNF instance
    /// Example: `cbam-cli vnf instantiate <id> -b instantiate.json`
    Instantiate {
        id: String,
        /// Instantiation request as a JSON file (use `-` for stdin)
        #[arg(short, long)]
        body: clap_stdin::FileOrStdin,
    },
    /// Modify (PATCH) a VNF instance
    Modify {
        id: String,
        /// Modifications as a JSON file (use `-` for stdin)
        #[arg(short, long)]
        body: clap_stdin::FileOrStdin,
    },
    /// Terminate a VNF instance
    Terminate {
        id: String,
        /// GRACEFUL or FORCEFUL
        #[arg(long, default_value = "GRACEFUL")]
        termination_type: String,
        /// Graceful termination timeout in seconds
        #[arg(long)]
        graceful_timeout: Option<u64>,
        /// Additional parameters (format: key=value)
        #[arg(short = 'a', long = "param")]
        params: Vec<String>,
    },
    /// Wait until a VNF instance reaches an instantiation state
    #[clap(aliases = &["w"])]
    Wait {
        id: String,
        #[arg(long, value_enum, default_value = "instantiated")]
        state: WaitState,
        /// Give up after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
        /// Seconds between polls
        #[arg(long)]
        interval: Option<u64>,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitState {
    Instantiated,
    Terminated,
}

/// VNF package operations
#[derive(clap::Subcommand, Clone, Debug)]
pub enum PackageOperation {
    /// List VNF packages
    #[clap(aliases = &["ls", "l"])]
    List {
        #[clap(flatten)]
        output: OutputArgs,
    },
    /// Get a VNF package by id
    #[clap(aliases = &["g"])]
    Get {
        id: String,
        #[clap(flatten)]
        output: OutputArgs,
    },
    /// Delete a VNF package
    #[clap(aliases = &["rm", "d"])]
    Delete { id: String },
    /// Onboard a VNF package archive
    #[clap(aliases = &["upload", "o"])]
    Onboard {
        /// Path to the package zip
        file: PathBuf,
        #[clap(flatten)]
        output: OutputArgs,
    },
}

/// Context management operations
#[derive(clap::Subcommand, Clone, Debug)]
pub enum ContextOperation {
    /// Configure connection settings
    #[clap(aliases = &["s", "update"])]
    Set {
        /// Context name (defaults to current)
        name: Option<String>,
        /// CBAM host or base URL
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        client_id: Option<String>,
        #[arg(long)]
        client_secret: Option<String>,
        /// Catalog API version (`SOL005` or `v18`)
        #[arg(long)]
        catalog_version: Option<CatalogVersion>,
        /// Accept invalid TLS certificates
        #[arg(long)]
        insecure: Option<bool>,
        /// Default timeout in seconds for `vnf wait`
        #[arg(long)]
        wait_timeout: Option<u64>,
    },
    /// Display the configuration
    #[clap(aliases = &["g", "show"])]
    Get,
    /// Switch to a different context
    #[clap(aliases = &["use"])]
    Select {
        /// Context name
        name: String,
    },
}

/// Available output formats
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
}
