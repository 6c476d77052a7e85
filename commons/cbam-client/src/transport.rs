use crate::config::TransportOptions;
use crate::error::{CbamError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use serde::de::DeserializeOwned;

/// Request payload variants understood by every transport.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    /// Pre-serialized JSON document
    Json(String),
    /// `application/x-www-form-urlencoded` pairs
    Form(Vec<(String, String)>),
    /// Raw bytes with an explicit content type
    Bytes {
        content_type: &'static str,
        data: Bytes,
    },
    /// Single-file `multipart/form-data` upload
    Multipart {
        field: String,
        file_name: String,
        data: Bytes,
    },
}

impl RequestBody {
    /// Content type implied by the body, if the transport should not pick one
    /// itself. Multipart boundaries are left to the transport.
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            RequestBody::Empty | RequestBody::Multipart { .. } => None,
            RequestBody::Json(_) => Some("application/json"),
            RequestBody::Form(_) => Some("application/x-www-form-urlencoded"),
            RequestBody::Bytes { content_type, .. } => Some(*content_type),
        }
    }
}

/// Fully resolved request handed to a transport.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        if let Some(ct) = body.content_type() {
            if !self.headers.contains_key(CONTENT_TYPE) {
                self.headers
                    .insert(CONTENT_TYPE, HeaderValue::from_static(ct));
            }
        }
        self.body = body;
        self
    }
}

/// Response as returned by a transport.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status: StatusCode::from_u16(status)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    pub fn json_body(status: u16, body: &serde_json::Value) -> Self {
        let mut resp = Self::new(status, body.to_string());
        resp.headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        resp
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Body as JSON, with an empty body mapped to `null`.
    pub fn json_value(&self) -> Result<serde_json::Value> {
        if self.body.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(serde_json::Value::Null);
        }
        self.json()
    }
}

/// Raw HTTP dispatch. Implementations apply their own transport options to
/// every call and never interpret status codes.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// `reqwest` backed transport
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(options: &TransportOptions) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(options.user_agent.clone())
            .danger_accept_invalid_certs(options.accept_invalid_certs);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(CbamError::Transport)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;
        let mut builder = self.client.request(method, &url).headers(headers);
        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(json) => builder.body(json),
            RequestBody::Form(pairs) => builder.form(&pairs),
            RequestBody::Bytes { data, .. } => builder.body(data),
            RequestBody::Multipart {
                field,
                file_name,
                data,
            } => {
                let part = reqwest::multipart::Part::bytes(data.to_vec())
                    .file_name(file_name);
                builder.multipart(
                    reqwest::multipart::Form::new().part(field, part),
                )
            }
        };

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
