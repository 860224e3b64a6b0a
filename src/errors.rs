use reqwest::StatusCode;
use thiserror::Error;

/// The request for an endpoint couldn't be put together.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("endpoint {0:?} cannot be used as a base URL")]
    CannotBeABase(String),
    #[error(transparent)]
    UrlParse(#[from] url::ParseError),
    #[error(transparent)]
    Build(#[from] reqwest::Error),
}

/// The round trip to the API didn't complete.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request cancelled")]
    Cancelled,
    #[error("request deadline exceeded")]
    DeadlineExceeded,
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl TransportError {
    /// Whether the failure came from the client timeout or the context deadline.
    pub fn is_timeout(&self) -> bool {
        match self {
            TransportError::Cancelled => false,
            TransportError::DeadlineExceeded => true,
            TransportError::Http(e) => e.is_timeout(),
        }
    }
}

/// The API answered with an HTTP status other than 200.
#[derive(Error, Debug)]
#[error("Porkbun server error: {status} - {message}")]
pub struct ServerError {
    status: StatusCode,
    message: String,
}

impl ServerError {
    pub(crate) fn from_response(status: StatusCode, body: &[u8]) -> Self {
        // The API is known to return 503 with an HTML page during incidents.
        let message = if status == StatusCode::SERVICE_UNAVAILABLE {
            "Service Unavailable".to_string()
        } else {
            String::from_utf8_lossy(body).into_owned()
        };

        Self { status, message }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The API answered, but reported a status other than `SUCCESS`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Porkbun API error: {status} - {message}")]
pub struct StatusError {
    status: String,
    message: String,
}

impl StatusError {
    pub(crate) fn new(status: String, message: Option<String>) -> Self {
        Self {
            status,
            message: message.unwrap_or_default(),
        }
    }

    /// The status string as reported, usually `ERROR`.
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("failed to serialize request body: {0}")]
    Serialization(#[source] serde_json::Error),
    #[error("failed to create request: {0}")]
    Request(#[from] RequestError),
    #[error("failed to call API: {0}")]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Server(#[from] ServerError),
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),
    #[error(transparent)]
    Status(#[from] StatusError),
}

impl ClientError {
    /// Whether a caller could sensibly try the same call again.
    ///
    /// Nothing in this crate retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Transport(TransportError::Cancelled) => false,
            ClientError::Transport(_) | ClientError::Server(_) => true,
            _ => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum ClientBuilderError {
    #[error("missing field: {0}")]
    MissingField(String),
    #[error(transparent)]
    UrlParse(#[from] url::ParseError),
}
