use crate::catalog::CatalogVersion;
use crate::config::{CbamEnv, Credentials};
use crate::connection::Connection;
use crate::error::Result;
use crate::poll::DEFAULT_WAIT_TIMEOUT;
use crate::transport::{HttpTransport, ReqwestTransport};
use std::time::Duration;
use tracing::info;

/// One authenticated session against a CBAM installation, bound to a catalog
/// version for its whole lifetime.
///
/// Every operation takes `&mut self`: requests are issued one at a time and
/// the token pair is never touched concurrently. Wrap the client in a
/// `tokio::sync::Mutex` to share it between tasks.
pub struct CbamClient<T = ReqwestTransport> {
    connection: Connection<T>,
    catalog: CatalogVersion,
    wait_timeout: Duration,
}

impl CbamClient<ReqwestTransport> {
    pub async fn connect(
        credentials: Credentials,
        catalog: CatalogVersion,
    ) -> Result<Self> {
        info!(
            "connecting to {} (catalog {})",
            credentials.base_url(),
            catalog
        );
        let connection = Connection::connect(credentials).await?;
        Ok(Self::from_connection(connection, catalog))
    }

    /// Connect with everything taken from the environment (and `.env`).
    pub async fn from_env() -> Result<Self> {
        let env = CbamEnv::load()?;
        let catalog = env.catalog_version()?;
        let credentials = env.credentials(None, None, None)?;
        Self::connect(credentials, catalog).await
    }
}

impl<T: HttpTransport> CbamClient<T> {
    pub async fn with_transport(
        credentials: Credentials,
        catalog: CatalogVersion,
        transport: T,
    ) -> Result<Self> {
        let connection =
            Connection::with_transport(credentials, transport).await?;
        Ok(Self::from_connection(connection, catalog))
    }

    pub fn from_connection(
        connection: Connection<T>,
        catalog: CatalogVersion,
    ) -> Self {
        Self {
            connection,
            catalog,
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
        }
    }

    pub fn catalog_version(&self) -> CatalogVersion {
        self.catalog
    }

    pub fn connection(&self) -> &Connection<T> {
        &self.connection
    }

    pub fn connection_mut(&mut self) -> &mut Connection<T> {
        &mut self.connection
    }

    /// Timeout used by the `wait_until_*` helpers when none is given.
    pub fn wait_timeout(&self) -> Duration {
        self.wait_timeout
    }

    pub fn set_wait_until_timeout(&mut self, timeout: Duration) {
        self.wait_timeout = timeout;
    }
}
