//! PostgREST gateway over HTTPS.
//!
//! # Security Note - Logging
//!
//! The API key travels in both the `apikey` and `Authorization` headers. Both
//! are built through [`RedactedHeader`] so they print as `[REDACTED]` if a
//! header map ends up in a log line, and the values are marked sensitive so
//! reqwest/hyper skip them in their own debug output.

use std::fmt;

use async_trait::async_trait;
use http::header::{self, HeaderMap, HeaderValue};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretBox};
use url::Url;

use crate::config::Config;
use crate::error::{PasteleriaError, Result};

use super::{Gateway, GatewayRequest, GatewayResponse, RetryPolicy};

const USER_AGENT: &str = concat!("pasteleria/", env!("CARGO_PKG_VERSION"));

const APIKEY: &str = "apikey";
const PREFER: &str = "prefer";
const ACCEPT_PROFILE: &str = "accept-profile";
const CONTENT_PROFILE: &str = "content-profile";

/// Wrapper for sensitive header values that redacts the value when formatted.
struct RedactedHeader {
    value: String,
}

impl RedactedHeader {
    fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    fn as_header_value(&self) -> Result<HeaderValue> {
        let mut value = HeaderValue::from_str(&self.value).map_err(|_| {
            PasteleriaError::Auth("credential contains characters not allowed in a header".into())
        })?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Display for RedactedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl fmt::Debug for RedactedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedactedHeader")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

pub struct PostgrestGateway {
    client: Client,
    base: Url,
    api_key: SecretBox<String>,
    bearer: SecretBox<String>,
    schema: Option<String>,
    retry: RetryPolicy,
}

impl fmt::Debug for PostgrestGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgrestGateway")
            .field("base", &self.base.as_str())
            .field("schema", &self.schema)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl PostgrestGateway {
    /// Build a gateway from configuration and environment.
    pub fn from_config(config: &Config) -> Result<Self> {
        let base = config.rest_url()?;
        let api_key = config.api_key().ok_or_else(|| {
            PasteleriaError::Auth(format!(
                "auth.api_key is not set. Run `pasteleria config set auth.api_key <key>` or export {}",
                crate::config::API_KEY_ENV
            ))
        })?;
        let bearer = config.bearer_token().unwrap_or_else(|| api_key.clone());

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| PasteleriaError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(PostgrestGateway {
            client,
            base,
            api_key: SecretBox::new(Box::new(api_key)),
            bearer: SecretBox::new(Box::new(bearer)),
            schema: config.backend.schema.clone(),
            retry: RetryPolicy::new(config.http.max_retries),
        })
    }

    /// Absolute URL for a relative resource path.
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn headers(&self, request: &GatewayRequest) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            APIKEY,
            RedactedHeader::new(self.api_key.expose_secret().as_str()).as_header_value()?,
        );
        headers.insert(
            header::AUTHORIZATION,
            RedactedHeader::new(format!("Bearer {}", self.bearer.expose_secret()))
                .as_header_value()?,
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        if request.body.is_some() {
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
        }
        if let Some(prefer) = request.prefer {
            headers.insert(PREFER, HeaderValue::from_static(prefer.header_value()));
        }
        if let Some(schema) = &self.schema {
            let value = HeaderValue::from_str(schema)
                .map_err(|_| PasteleriaError::Config(format!("invalid schema name '{schema}'")))?;
            let profile = if request.body.is_some() {
                CONTENT_PROFILE
            } else {
                ACCEPT_PROFILE
            };
            headers.insert(profile, value);
        }
        Ok(headers)
    }

    async fn send_once(&self, request: &GatewayRequest) -> Result<GatewayResponse> {
        let url = self.url_for(&request.path);
        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .headers(self.headers(request)?);
        if let Some(body) = &request.body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| PasteleriaError::Transport(e.to_string()))?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| PasteleriaError::Transport(e.to_string()))?;

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            status = status.as_u16(),
            "gateway response"
        );

        Ok(GatewayResponse {
            status,
            body,
            headers,
        })
    }
}

#[async_trait]
impl Gateway for PostgrestGateway {
    async fn send(&self, request: GatewayRequest) -> Result<GatewayResponse> {
        if request.is_idempotent() {
            self.retry.run(|| self.send_once(&request)).await
        } else {
            self.send_once(&request).await
        }
    }
}
