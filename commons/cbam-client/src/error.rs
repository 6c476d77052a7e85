use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the CBAM client
#[derive(Error, Debug)]
pub enum CbamError {
    #[error("Token request failed: {status} - {body}")]
    Authentication { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{method} {url} failed: {status} - {body}")]
    Http {
        method: http::Method,
        url: String,
        status: u16,
        body: String,
    },

    #[error(
        "No such catalog version: '{tag}'. \
         Supported versions are: {supported:?}"
    )]
    UnknownCatalogVersion {
        tag: String,
        supported: Vec<&'static str>,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid JSON input: {0}")]
    InvalidJsonInput(String),

    #[error("Response is missing required field '{0}'")]
    MissingField(&'static str),

    #[error(
        "Uploading content of VNF package '{package_id}' failed: {source}"
    )]
    OnboardingUpload {
        package_id: String,
        #[source]
        source: Box<CbamError>,
    },

    #[error(
        "VNF '{vnf_id}' instantiation state did not change to {target} \
         in {} seconds",
        timeout.as_secs()
    )]
    PollTimeout {
        vnf_id: String,
        target: String,
        timeout: Duration,
    },

    #[error("Invalid poll settings: {0}")]
    InvalidPollSettings(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CbamError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn http_error(
        method: http::Method,
        url: impl Into<String>,
        status: u16,
        body: impl Into<String>,
    ) -> Self {
        Self::Http {
            method,
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. } | Self::Http { status, .. } => {
                Some(*status)
            }
            Self::OnboardingUpload { source, .. } => source.status(),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T, E = CbamError> = std::result::Result<T, E>;
