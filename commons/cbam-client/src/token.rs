use crate::config::Credentials;
use crate::error::{CbamError, Result};
use crate::transport::{HttpRequest, HttpTransport, RequestBody};
use http::Method;
use serde::Deserialize;
use std::fmt;
use tracing::{debug, instrument};

pub const TOKEN_PATH: &str = "/auth/realms/cbam/protocol/openid-connect/token";

/// Bearer token plus the refresh token that mints its successor.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
}

/// Holds the live token pair and the credentials needed to replace it.
#[derive(Debug)]
pub struct TokenStore {
    credentials: Credentials,
    tokens: TokenPair,
    refresh_used: bool,
}

impl TokenStore {
    /// Acquire the initial token pair with the client credentials grant.
    pub async fn acquire_new<T>(
        credentials: Credentials,
        transport: &T,
    ) -> Result<Self>
    where
        T: HttpTransport + ?Sized,
    {
        let tokens = request_tokens(
            &credentials,
            transport,
            "client_credentials",
            &[],
        )
        .await?;
        Ok(Self {
            credentials,
            tokens,
            refresh_used: false,
        })
    }

    /// Request a new token pair with `grant_type` and replace the held pair.
    pub async fn acquire<T>(
        &mut self,
        transport: &T,
        grant_type: &str,
        options: &[(&str, String)],
    ) -> Result<()>
    where
        T: HttpTransport + ?Sized,
    {
        self.tokens =
            request_tokens(&self.credentials, transport, grant_type, options)
                .await?;
        Ok(())
    }

    /// Trade the current refresh token for a new pair and mark the refresh
    /// as used for the current call chain.
    pub async fn refresh<T>(&mut self, transport: &T) -> Result<()>
    where
        T: HttpTransport + ?Sized,
    {
        let refresh_token = self.tokens.refresh_token.clone();
        self.acquire(
            transport,
            "refresh_token",
            &[("refresh_token", refresh_token)],
        )
        .await?;
        self.refresh_used = true;
        Ok(())
    }

    pub fn refresh_used(&self) -> bool {
        self.refresh_used
    }

    pub fn reset_refresh(&mut self) {
        self.refresh_used = false;
    }

    pub fn tokens(&self) -> &TokenPair {
        &self.tokens
    }

    pub fn access_token(&self) -> &str {
        &self.tokens.access_token
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

#[instrument(
    level = "debug",
    skip(credentials, transport, options),
    fields(host = credentials.host())
)]
async fn request_tokens<T>(
    credentials: &Credentials,
    transport: &T,
    grant_type: &str,
    options: &[(&str, String)],
) -> Result<TokenPair>
where
    T: HttpTransport + ?Sized,
{
    let mut form = vec![
        ("grant_type".to_string(), grant_type.to_string()),
        ("client_id".to_string(), credentials.client_id().to_string()),
        (
            "client_secret".to_string(),
            credentials.client_secret().to_string(),
        ),
    ];
    for (key, value) in options {
        // later keys override the defaults
        form.retain(|(k, _)| k.as_str() != *key);
        form.push((key.to_string(), value.clone()));
    }

    let url = format!("{}{}", credentials.base_url(), TOKEN_PATH);
    let request =
        HttpRequest::new(Method::POST, url).with_body(RequestBody::Form(form));
    let response = transport.execute(request).await?;
    if response.status.as_u16() != 200 {
        return Err(CbamError::Authentication {
            status: response.status.as_u16(),
            body: response.text(),
        });
    }

    let parsed: TokenResponse =
        response.json().map_err(|e| CbamError::Authentication {
            status: 200,
            body: format!("unreadable token response: {}", e),
        })?;
    let access_token =
        parsed.access_token.ok_or_else(|| missing("access_token"))?;
    let refresh_token =
        parsed.refresh_token.ok_or_else(|| missing("refresh_token"))?;
    debug!("acquired token pair");
    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

fn missing(field: &str) -> CbamError {
    CbamError::Authentication {
        status: 200,
        body: format!("token response is missing '{}'", field),
    }
}
