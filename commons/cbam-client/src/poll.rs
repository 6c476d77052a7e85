use crate::client::CbamClient;
use crate::error::{CbamError, Result};
use crate::models::{InstantiationState, VnfInstance};
use crate::transport::HttpTransport;
use std::time::Duration;
use tracing::{debug, instrument};

pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(300);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_WAIT_TIMEOUT,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl PollSettings {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }

    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(CbamError::InvalidPollSettings(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl<T: HttpTransport> CbamClient<T> {
    /// Poll the instance until its `instantiationState` equals `target`.
    ///
    /// A poll is made at every multiple of `interval` strictly below
    /// `timeout`, so a 10 s timeout with a 5 s interval polls twice. An
    /// instance that reports no state yet is treated as not matching.
    #[instrument(level = "debug", skip(self))]
    pub async fn wait_for_instantiation_state(
        &mut self,
        vnf_id: &str,
        target: InstantiationState,
        settings: PollSettings,
    ) -> Result<VnfInstance> {
        settings.validate()?;
        let mut index: u32 = 0;
        while settings.interval * index < settings.timeout {
            let vnf = self.get_vnf(vnf_id).await?;
            if vnf.is_in_state(target) {
                return Ok(vnf);
            }
            debug!(
                "VNF {} is {:?}, waiting for {}",
                vnf_id, vnf.instantiation_state, target
            );
            tokio::time::sleep(settings.interval).await;
            index += 1;
        }
        Err(CbamError::PollTimeout {
            vnf_id: vnf_id.to_string(),
            target: target.to_string(),
            timeout: settings.timeout,
        })
    }

    pub async fn wait_until_vnf_is_instantiated(
        &mut self,
        vnf_id: &str,
        timeout: Option<Duration>,
        interval: Option<Duration>,
    ) -> Result<VnfInstance> {
        let settings = self.poll_settings(timeout, interval);
        self.wait_for_instantiation_state(
            vnf_id,
            InstantiationState::Instantiated,
            settings,
        )
        .await
    }

    pub async fn wait_until_vnf_is_terminated(
        &mut self,
        vnf_id: &str,
        timeout: Option<Duration>,
        interval: Option<Duration>,
    ) -> Result<VnfInstance> {
        let settings = self.poll_settings(timeout, interval);
        self.wait_for_instantiation_state(
            vnf_id,
            InstantiationState::NotInstantiated,
            settings,
        )
        .await
    }

    fn poll_settings(
        &self,
        timeout: Option<Duration>,
        interval: Option<Duration>,
    ) -> PollSettings {
        PollSettings {
            timeout: timeout.unwrap_or_else(|| self.wait_timeout()),
            interval: interval.unwrap_or(DEFAULT_POLL_INTERVAL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogVersion;
    use crate::config::Credentials;
    use crate::mock::MockTransport;
    use crate::transport::HttpResponse;
    use serde_json::json;
    use tokio::time::Instant;

    async fn client(mock: &MockTransport) -> CbamClient<MockTransport> {
        mock.push_json(200, json!({"access_token": "a", "refresh_token": "r"}));
        CbamClient::with_transport(
            Credentials::new("cbam.lab", "robot", "r0b07"),
            CatalogVersion::Sol005,
            mock.clone(),
        )
        .await
        .unwrap()
    }

    fn vnf(state: Option<&str>) -> serde_json::Value {
        match state {
            Some(s) => json!({"id": "vnf-1", "instantiationState": s}),
            None => json!({"id": "vnf-1"}),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_match_does_not_sleep() {
        let mock = MockTransport::new();
        let mut client = client(&mock).await;
        mock.push_json(200, vnf(Some("INSTANTIATED")));

        let start = Instant::now();
        let out = client
            .wait_until_vnf_is_instantiated("vnf-1", None, None)
            .await
            .unwrap();
        assert_eq!(out.id, "vnf-1");
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(mock.request_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_state_only_body_returns_immediately() {
        let mock = MockTransport::with_default(HttpResponse::json_body(
            200,
            &json!({"instantiationState": "INSTANTIATED"}),
        ));
        let mut client = client(&mock).await;

        let start = Instant::now();
        let out = client
            .wait_until_vnf_is_instantiated("vnf-1", None, None)
            .await
            .unwrap();
        assert_eq!(out.state(), Some(InstantiationState::Instantiated));
        assert!(out.id.is_empty());
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(mock.request_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_after_two_polls() {
        let mock = MockTransport::with_default(HttpResponse::json_body(
            200,
            &vnf(Some("NOT_INSTANTIATED")),
        ));
        let mut client = client(&mock).await;

        let err = client
            .wait_for_instantiation_state(
                "vnf-1",
                InstantiationState::Instantiated,
                PollSettings::new(
                    Duration::from_secs(10),
                    Duration::from_secs(5),
                ),
            )
            .await
            .unwrap_err();
        match &err {
            CbamError::PollTimeout {
                vnf_id,
                target,
                timeout,
            } => {
                assert_eq!(vnf_id, "vnf-1");
                assert_eq!(target, "INSTANTIATED");
                assert_eq!(*timeout, Duration::from_secs(10));
            }
            other => panic!("unexpected error {:?}", other),
        }
        // one token request plus two polls
        assert_eq!(mock.request_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_state_keeps_polling() {
        let mock = MockTransport::new();
        let mut client = client(&mock).await;
        mock.push_json(200, vnf(None));
        mock.push_json(200, vnf(Some("INSTANTIATED")));
        mock.push_json(200, vnf(Some("NOT_INSTANTIATED")));

        let start = Instant::now();
        let out = client
            .wait_until_vnf_is_terminated(
                "vnf-1",
                Some(Duration::from_secs(60)),
                Some(Duration::from_secs(2)),
            )
            .await
            .unwrap();
        assert_eq!(out.state(), Some(InstantiationState::NotInstantiated));
        assert_eq!(start.elapsed(), Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_zero_interval_is_rejected() {
        let mock = MockTransport::new();
        let mut client = client(&mock).await;

        let err = client
            .wait_until_vnf_is_instantiated(
                "vnf-1",
                None,
                Some(Duration::ZERO),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CbamError::InvalidPollSettings(_)));
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_wait_timeout_is_the_default() {
        let mock = MockTransport::with_default(HttpResponse::json_body(
            200,
            &vnf(Some("NOT_INSTANTIATED")),
        ));
        let mut client = client(&mock).await;
        client.set_wait_until_timeout(Duration::from_secs(15));

        let err = client
            .wait_until_vnf_is_instantiated("vnf-1", None, None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("15 seconds"));
        assert_eq!(mock.request_count(), 4);
    }

    #[tokio::test]
    async fn test_poll_error_is_propagated() {
        let mock = MockTransport::new();
        let mut client = client(&mock).await;
        mock.push_response(HttpResponse::new(404, "gone"));

        let err = client
            .wait_until_vnf_is_instantiated("vnf-1", None, None)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
    }
}
