use crate::catalog::CatalogVersion;
use crate::error::{CbamError, Result};
use envconfig::Envconfig;
use std::fmt;
use std::time::Duration;

/// Options applied uniformly to every request, token requests included.
#[derive(Debug, Clone)]
pub struct TransportOptions {
    /// Skip TLS certificate verification (self-signed lab installs).
    pub accept_invalid_certs: bool,
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            accept_invalid_certs: false,
            timeout: None,
            user_agent: concat!("cbam-client/", env!("CARGO_PKG_VERSION"))
                .to_string(),
        }
    }
}

/// Connection credentials for one CBAM installation
#[derive(Clone)]
pub struct Credentials {
    host: String,
    client_id: String,
    client_secret: String,
    options: TransportOptions,
}

impl Credentials {
    pub fn new(
        host: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            options: TransportOptions::default(),
        }
    }

    pub fn with_options(mut self, options: TransportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn options(&self) -> &TransportOptions {
        &self.options
    }

    /// Base URL every path is appended to.
    ///
    /// A bare host is addressed over `https://`; a value that already carries
    /// an `http://` or `https://` scheme is used as given.
    pub fn base_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("options", &self.options)
            .finish()
    }
}

/// Connection settings read from the process environment.
#[derive(Envconfig, Clone, Debug)]
pub struct CbamEnv {
    #[envconfig(from = "HOST")]
    pub host: Option<String>,
    #[envconfig(from = "CLIENT_ID")]
    pub client_id: Option<String>,
    #[envconfig(from = "CLIENT_SECRET")]
    pub client_secret: Option<String>,
    #[envconfig(from = "CATALOG_VERSION", default = "SOL005")]
    pub catalog_version: String,
    #[envconfig(from = "CBAM_INSECURE", default = "false")]
    pub insecure: bool,
    #[envconfig(from = "CBAM_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

impl CbamEnv {
    /// Load a `.env` file from the working directory when present, then read
    /// the environment. Variables already set are not overridden.
    pub fn load() -> Result<Self> {
        match dotenv::dotenv() {
            Ok(path) => tracing::debug!("loaded environment from {:?}", path),
            Err(e) if e.not_found() => {}
            Err(e) => {
                return Err(CbamError::config_error(format!(
                    "failed to read .env file: {}",
                    e
                )));
            }
        }
        Self::init_from_env()
            .map_err(|e| CbamError::config_error(e.to_string()))
    }

    pub fn catalog_version(&self) -> Result<CatalogVersion> {
        self.catalog_version.parse()
    }

    pub fn transport_options(&self) -> TransportOptions {
        TransportOptions {
            accept_invalid_certs: self.insecure,
            timeout: self.timeout_secs.map(Duration::from_secs),
            ..Default::default()
        }
    }

    /// Merge explicit values over the environment. Explicit values win.
    pub fn credentials(
        &self,
        host: Option<String>,
        client_id: Option<String>,
        client_secret: Option<String>,
    ) -> Result<Credentials> {
        let host = require(host.or_else(|| self.host.clone()), "host")?;
        let client_id =
            require(client_id.or_else(|| self.client_id.clone()), "client id")?;
        let client_secret = require(
            client_secret.or_else(|| self.client_secret.clone()),
            "client secret",
        )?;
        Ok(Credentials::new(host, client_id, client_secret)
            .with_options(self.transport_options()))
    }
}

fn require(value: Option<String>, what: &str) -> Result<String> {
    value.filter(|v| !v.is_empty()).ok_or_else(|| {
        CbamError::config_error(format!("CBAM {} is not configured", what))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> CbamEnv {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CbamEnv::init_from_hashmap(&map).unwrap()
    }

    #[test]
    fn test_base_url_defaults_to_https() {
        let creds = Credentials::new("cbam.lab:8443", "robot", "secret");
        assert_eq!(creds.base_url(), "https://cbam.lab:8443");

        let creds = Credentials::new("http://127.0.0.1:9000/", "robot", "s");
        assert_eq!(creds.base_url(), "http://127.0.0.1:9000");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = Credentials::new("cbam.lab", "robot", "r0b07");
        let printed = format!("{:?}", creds);
        assert!(printed.contains("robot"));
        assert!(!printed.contains("r0b07"));
    }

    #[test]
    fn test_env_defaults() {
        let env = env_from(&[]);
        assert_eq!(env.catalog_version, "SOL005");
        assert!(!env.insecure);
        assert_eq!(env.timeout_secs, None);
        assert_eq!(env.catalog_version().unwrap(), CatalogVersion::Sol005);
    }

    #[test]
    fn test_explicit_values_win_over_env() {
        let env = env_from(&[
            ("HOST", "env.host"),
            ("CLIENT_ID", "env-id"),
            ("CLIENT_SECRET", "env-secret"),
            ("CBAM_INSECURE", "true"),
            ("CBAM_TIMEOUT_SECS", "12"),
        ]);
        let creds = env
            .credentials(Some("arg.host".to_string()), None, None)
            .unwrap();
        assert_eq!(creds.host(), "arg.host");
        assert_eq!(creds.client_id(), "env-id");
        assert_eq!(creds.client_secret(), "env-secret");
        assert!(creds.options().accept_invalid_certs);
        assert_eq!(creds.options().timeout, Some(Duration::from_secs(12)));
    }

    #[test]
    fn test_missing_secret_is_config_error() {
        let env = env_from(&[("HOST", "env.host"), ("CLIENT_ID", "id")]);
        let err = env.credentials(None, None, None).unwrap_err();
        assert!(matches!(err, CbamError::Config(_)));
        assert!(err.to_string().contains("client secret"));
    }
}
