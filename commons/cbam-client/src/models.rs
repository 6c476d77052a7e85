use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Instantiation state reported on a VNF instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstantiationState {
    Instantiated,
    NotInstantiated,
}

impl InstantiationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstantiationState::Instantiated => "INSTANTIATED",
            InstantiationState::NotInstantiated => "NOT_INSTANTIATED",
        }
    }
}

impl fmt::Display for InstantiationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstantiationState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INSTANTIATED" => Ok(InstantiationState::Instantiated),
            "NOT_INSTANTIATED" => Ok(InstantiationState::NotInstantiated),
            other => Err(format!("unknown instantiation state '{}'", other)),
        }
    }
}

/// A VNF instance as returned by the lifecycle API. Fields this crate does
/// not model are kept in `extra` and written back out unchanged. Only the
/// state is needed for polling, so a body without `id` still parses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VnfInstance {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub vnf_instance_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vnf_instance_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vnfd_id: Option<String>,
    /// Raw state string; unknown values are kept rather than rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instantiation_state: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VnfInstance {
    /// Parsed instantiation state, `None` when absent or unrecognized.
    pub fn state(&self) -> Option<InstantiationState> {
        self.instantiation_state
            .as_deref()
            .and_then(|s| s.parse().ok())
    }

    pub fn is_in_state(&self, target: InstantiationState) -> bool {
        self.state() == Some(target)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVnfRequest {
    pub vnfd_id: String,
    pub vnf_instance_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vnf_instance_description: Option<String>,
}

impl CreateVnfRequest {
    pub fn new(vnfd_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            vnfd_id: vnfd_id.into(),
            vnf_instance_name: name.into(),
            vnf_instance_description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.vnf_instance_description = Some(description.into());
        self
    }
}

pub const DEFAULT_TERMINATION_TYPE: &str = "GRACEFUL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminateVnfRequest {
    pub termination_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graceful_termination_timeout: Option<u64>,
    #[serde(default)]
    pub additional_params: Map<String, Value>,
}

impl Default for TerminateVnfRequest {
    fn default() -> Self {
        Self {
            termination_type: DEFAULT_TERMINATION_TYPE.to_string(),
            graceful_termination_timeout: None,
            additional_params: Map::new(),
        }
    }
}

impl TerminateVnfRequest {
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.graceful_termination_timeout = Some(seconds);
        self
    }

    pub fn with_param(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.additional_params.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_instance_keeps_unknown_fields() {
        let raw = json!({
            "id": "vnf-1",
            "vnfInstanceName": "edge",
            "vnfdId": "vnfd-1",
            "instantiationState": "INSTANTIATED",
            "vimConnectionInfo": [{"id": "vim"}]
        });
        let vnf: VnfInstance = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(vnf.vnf_instance_name, "edge");
        assert_eq!(vnf.state(), Some(InstantiationState::Instantiated));
        assert!(vnf.extra.contains_key("vimConnectionInfo"));
        assert_eq!(serde_json::to_value(&vnf).unwrap(), raw);
    }

    #[test]
    fn test_missing_state_is_none() {
        let vnf: VnfInstance =
            serde_json::from_value(json!({"id": "vnf-1"})).unwrap();
        assert_eq!(vnf.state(), None);
        assert!(!vnf.is_in_state(InstantiationState::NotInstantiated));
    }

    #[test]
    fn test_create_request_omits_absent_description() {
        let body =
            serde_json::to_value(CreateVnfRequest::new("d1", "n1")).unwrap();
        assert_eq!(body, json!({"vnfdId": "d1", "vnfInstanceName": "n1"}));

        let body = serde_json::to_value(
            CreateVnfRequest::new("d1", "n1").with_description("lab"),
        )
        .unwrap();
        assert_eq!(body["vnfInstanceDescription"], "lab");
    }

    #[test]
    fn test_terminate_request_defaults() {
        let body =
            serde_json::to_value(TerminateVnfRequest::default()).unwrap();
        assert_eq!(
            body,
            json!({"terminationType": "GRACEFUL", "additionalParams": {}})
        );

        let body = serde_json::to_value(
            TerminateVnfRequest::default()
                .with_timeout(60)
                .with_param("jobId", "j-1"),
        )
        .unwrap();
        assert_eq!(body["gracefulTerminationTimeout"], 60);
        assert_eq!(body["additionalParams"]["jobId"], "j-1");
    }

    #[test]
    fn test_state_tags() {
        assert_eq!(
            "NOT_INSTANTIATED".parse::<InstantiationState>().unwrap(),
            InstantiationState::NotInstantiated
        );
        assert!("instantiated".parse::<InstantiationState>().is_err());
        assert_eq!(
            InstantiationState::Instantiated.to_string(),
            "INSTANTIATED"
        );
    }
}
