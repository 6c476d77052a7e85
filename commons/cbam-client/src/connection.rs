use crate::config::Credentials;
use crate::error::{CbamError, Result};
use crate::token::TokenStore;
use crate::transport::{
    HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, RequestBody,
};
use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

/// Authenticated HTTP session against one CBAM installation.
///
/// Every request carries a fresh `Authorization: Bearer` header. A 401 is
/// answered by refreshing the token pair and retrying the request once; any
/// other non-success status becomes [`CbamError::Http`].
///
/// Caller headers are applied as given except `Authorization`, which this
/// layer always overwrites with the current access token.
pub struct Connection<T = ReqwestTransport> {
    transport: T,
    base_url: String,
    tokens: TokenStore,
}

impl Connection<ReqwestTransport> {
    /// Build a `reqwest` transport from the credentials' options and
    /// acquire the initial token pair.
    pub async fn connect(credentials: Credentials) -> Result<Self> {
        let transport = ReqwestTransport::new(credentials.options())?;
        Self::with_transport(credentials, transport).await
    }
}

impl<T: HttpTransport> Connection<T> {
    pub async fn with_transport(
        credentials: Credentials,
        transport: T,
    ) -> Result<Self> {
        let base_url = credentials.base_url();
        let tokens = TokenStore::acquire_new(credentials, &transport).await?;
        Ok(Self {
            transport,
            base_url,
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Perform one logical request, refreshing the token pair at most once.
    #[instrument(level = "debug", skip(self, body, headers))]
    pub async fn send(
        &mut self,
        method: Method,
        path: &str,
        body: RequestBody,
        headers: HeaderMap,
    ) -> Result<HttpResponse> {
        self.tokens.reset_refresh();
        let url = format!("{}{}", self.base_url, path);
        loop {
            let request =
                self.authorized_request(&method, &url, &body, &headers)?;
            let response = self.transport.execute(request).await?;

            if response.status == StatusCode::UNAUTHORIZED
                && !self.tokens.refresh_used()
            {
                debug!("access token rejected, refreshing");
                self.tokens.refresh(&self.transport).await?;
                continue;
            }
            if !response.is_success() {
                return Err(CbamError::http_error(
                    method,
                    url,
                    response.status.as_u16(),
                    response.text(),
                ));
            }
            self.tokens.reset_refresh();
            return Ok(response);
        }
    }

    fn authorized_request(
        &self,
        method: &Method,
        url: &str,
        body: &RequestBody,
        headers: &HeaderMap,
    ) -> Result<HttpRequest> {
        let mut bearer = HeaderValue::try_from(format!(
            "Bearer {}",
            self.tokens.access_token()
        ))
        .map_err(|_| CbamError::Authentication {
            status: 200,
            body: "access token is not a valid header value".to_string(),
        })?;
        bearer.set_sensitive(true);

        let mut request = HttpRequest::new(method.clone(), url);
        request.headers = headers.clone();
        request.headers.insert(AUTHORIZATION, bearer);
        Ok(request.with_body(body.clone()))
    }

    pub async fn get(&mut self, path: &str) -> Result<HttpResponse> {
        self.send(Method::GET, path, RequestBody::Empty, HeaderMap::new())
            .await
    }

    pub async fn delete(&mut self, path: &str) -> Result<HttpResponse> {
        self.send(Method::DELETE, path, RequestBody::Empty, HeaderMap::new())
            .await
    }

    /// POST with an empty body.
    pub async fn post_empty(&mut self, path: &str) -> Result<HttpResponse> {
        self.send(Method::POST, path, RequestBody::Empty, HeaderMap::new())
            .await
    }

    pub async fn post_json<B: Serialize + ?Sized>(
        &mut self,
        path: &str,
        body: &B,
    ) -> Result<HttpResponse> {
        let json = serde_json::to_string(body)?;
        self.send(Method::POST, path, RequestBody::Json(json), HeaderMap::new())
            .await
    }

    /// PATCH with an already serialized JSON document.
    pub async fn patch_json(
        &mut self,
        path: &str,
        json: String,
    ) -> Result<HttpResponse> {
        self.send_raw_json(Method::PATCH, path, json).await
    }

    /// PUT raw bytes, stating their content type explicitly.
    pub async fn put_bytes(
        &mut self,
        path: &str,
        content_type: &'static str,
        data: Bytes,
    ) -> Result<HttpResponse> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        self.send(
            Method::PUT,
            path,
            RequestBody::Bytes { content_type, data },
            headers,
        )
        .await
    }

    /// Send an already serialized JSON document.
    pub async fn send_raw_json(
        &mut self,
        method: Method,
        path: &str,
        json: String,
    ) -> Result<HttpResponse> {
        self.send(method, path, RequestBody::Json(json), HeaderMap::new())
            .await
    }

    /// Send a request and decode the response body as JSON (`null` when the
    /// body is empty).
    pub async fn send_json(
        &mut self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<Value> {
        self.send(method, path, body, HeaderMap::new())
            .await?
            .json_value()
    }

    pub async fn get_json(&mut self, path: &str) -> Result<Value> {
        self.send_json(Method::GET, path, RequestBody::Empty).await
    }
}
