//! Client Errors
//!
//! Failures surfaced by the API layer and the event stream.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("Network failure: {0}")]
    Network(String),
    #[error("Request rejected with status {status}")]
    Rejected { status: u16 },
    #[error("Unreadable response: {0}")]
    Decode(String),
    #[error("Malformed event: {0}")]
    MalformedEvent(String),
    #[error("Event stream unavailable: {0}")]
    Subscription(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            ClientError::Rejected {
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
