use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasteleriaError {
    /// No response was received (connect failure, timeout, reset).
    #[error("transport error: {0}")]
    Transport(String),

    /// A response arrived with a status outside 2xx.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The body could not be decoded into the expected record shape.
    #[error("could not decode {resource}: {message}")]
    Decode { resource: String, message: String },

    /// Client-side input rejected before anything was sent.
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("a mutation is still pending, wait for it to finish")]
    Busy,

    #[error("{0} not found")]
    NotFound(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl PasteleriaError {
    /// Shorthand for a decode failure on `resource`.
    pub fn decode(resource: impl Into<String>, message: impl std::fmt::Display) -> Self {
        PasteleriaError::Decode {
            resource: resource.into(),
            message: message.to_string(),
        }
    }

    /// HTTP status carried by the error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            PasteleriaError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether an idempotent request may be sent again after this error.
    pub fn is_retryable(&self) -> bool {
        match self {
            PasteleriaError::Transport(_) => true,
            PasteleriaError::HttpStatus { status, .. } => {
                matches!(status, 429 | 500 | 502 | 503 | 504)
            }
            _ => false,
        }
    }

    /// Whether the user can fix the situation by trying again.
    ///
    /// Decode failures point at a schema mismatch with the backend and are not
    /// expected to go away on retry.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PasteleriaError::Transport(_) | PasteleriaError::HttpStatus { .. } | PasteleriaError::Busy
        )
    }
}

impl From<reqwest::Error> for PasteleriaError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            PasteleriaError::decode("response", err)
        } else {
            PasteleriaError::Transport(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, PasteleriaError>;
