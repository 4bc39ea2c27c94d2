//! Remote data gateway.
//!
//! The gateway sends one request to a REST resource and hands back status,
//! body and headers untouched. Interpreting the status is left to callers
//! through [`GatewayResponse::require_success`], so transport failures and
//! HTTP failures stay distinguishable.

pub mod postgrest;
pub mod retry;

pub use postgrest::PostgrestGateway;
pub use retry::RetryPolicy;

use async_trait::async_trait;
use http::{HeaderMap, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{PasteleriaError, Result};

pub const CONTENT_RANGE: &str = "content-range";

/// Value of the `Prefer` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prefer {
    /// Ask for the total row count in `Content-Range`.
    CountExact,
    /// Ask for the written rows back in the response body.
    ReturnRepresentation,
}

impl Prefer {
    pub fn header_value(self) -> &'static str {
        match self {
            Prefer::CountExact => "count=exact",
            Prefer::ReturnRepresentation => "return=representation",
        }
    }
}

/// One request against the REST endpoint.
///
/// `path` is relative to the REST base URL and already carries its encoded
/// query string, e.g. `pedidos?select=id_pedido&limit=20`.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub prefer: Option<Prefer>,
}

impl GatewayRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        GatewayRequest {
            method,
            path: path.into(),
            body: None,
            prefer: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_prefer(mut self, prefer: Prefer) -> Self {
        self.prefer = Some(prefer);
        self
    }

    /// Reads are safe to send again, writes are not.
    pub fn is_idempotent(&self) -> bool {
        self.method == Method::GET || self.method == Method::HEAD
    }
}

#[derive(Debug, Clone)]
pub struct GatewayResponse {
    pub status: StatusCode,
    pub body: String,
    pub headers: HeaderMap,
}

impl GatewayResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        GatewayResponse {
            status,
            body: body.into(),
            headers: HeaderMap::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Turn a non-2xx response into [`PasteleriaError::HttpStatus`].
    pub fn require_success(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(PasteleriaError::HttpStatus {
                status: self.status.as_u16(),
                body: self.body,
            })
        }
    }

    /// Total row count from `Content-Range`, when the backend reported one.
    pub fn total_count(&self) -> Option<u64> {
        self.headers
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range)
    }

    /// Decode the JSON body, naming `resource` in the error on mismatch.
    pub fn decode<T: DeserializeOwned>(&self, resource: &str) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|e| PasteleriaError::decode(resource, e))
    }
}

/// Parse the total out of a `<start>-<end>/<total>` range.
///
/// Returns `None` for a missing or unknown (`*`) total.
pub fn parse_content_range(value: &str) -> Option<u64> {
    let (_, total) = value.trim().rsplit_once('/')?;
    total.trim().parse().ok()
}

#[async_trait]
pub trait Gateway: Send + Sync {
    /// Send one request and return whatever came back.
    ///
    /// Only failures to obtain a response are errors here; non-2xx statuses
    /// are returned as ordinary responses.
    async fn send(&self, request: GatewayRequest) -> Result<GatewayResponse>;

    async fn read(&self, path: &str) -> Result<GatewayResponse> {
        self.send(GatewayRequest::new(Method::GET, path)).await
    }

    async fn read_with_count(&self, path: &str) -> Result<GatewayResponse> {
        self.send(GatewayRequest::new(Method::GET, path).with_prefer(Prefer::CountExact))
            .await
    }

    async fn create(&self, path: &str, body: Value) -> Result<GatewayResponse> {
        self.send(
            GatewayRequest::new(Method::POST, path)
                .with_body(body)
                .with_prefer(Prefer::ReturnRepresentation),
        )
        .await
    }

    async fn update(&self, path: &str, body: Value) -> Result<GatewayResponse> {
        self.send(
            GatewayRequest::new(Method::PATCH, path)
                .with_body(body)
                .with_prefer(Prefer::ReturnRepresentation),
        )
        .await
    }

    async fn delete(&self, path: &str) -> Result<GatewayResponse> {
        self.send(GatewayRequest::new(Method::DELETE, path)).await
    }
}
