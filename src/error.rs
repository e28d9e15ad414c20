//! Errors that callers may want to inspect
//!
//! Most functions of this crate return a `Box<dyn Error>`. Controllers downcast it to these types to decide what to tell the user.

use std::error::Error;
use std::fmt::{Display, Formatter};

use serde::Deserialize;

/// The generic text shown when a request failed without a server-provided explanation
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred. Please try again.";


/// The error envelope sent by the backend along with non-2xx responses
#[derive(Clone, Debug, Deserialize)]
struct ErrorEnvelope {
    error: String,
}

/// A request that reached the server (or the mocked server), but did not succeed
#[derive(Clone, Debug, PartialEq)]
pub enum ApiError {
    /// The server replied with an unexpected HTTP status code
    Status {
        status: u16,
        /// The `error` field of the reply, if any
        message: Option<String>,
    },
    /// The server replied with something we were unable to understand
    InvalidPayload(String),
    /// A mocked failure (see [`crate::mock_behaviour`])
    Mocked(String),
}

impl ApiError {
    /// Build an error from a non-2xx reply and its body
    pub fn from_reply(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .ok()
            .map(|envelope| envelope.error);
        Self::Status { status, message }
    }

    pub fn not_found<S: ToString>(message: S) -> Self {
        Self::Status { status: 404, message: Some(message.to_string()) }
    }

    pub fn bad_request<S: ToString>(message: S) -> Self {
        Self::Status { status: 400, message: Some(message.to_string()) }
    }

    /// The text the server wants to be displayed, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message: Some(m), .. } => Some(m),
            _ => None,
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            ApiError::Status { status, message: Some(m) } => write!(f, "HTTP status {}: {}", status, m),
            ApiError::Status { status, message: None } => write!(f, "Unexpected HTTP status code {}", status),
            ApiError::InvalidPayload(details) => write!(f, "Invalid server reply: {}", details),
            ApiError::Mocked(details) => write!(f, "{}", details),
        }
    }
}

impl Error for ApiError {}


/// A form that has been rejected before anything was sent to the server
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationError {
    EmptyTitle,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            ValidationError::EmptyTitle => write!(f, "A title is required"),
        }
    }
}

impl Error for ValidationError {}


/// The text that should be shown to the user for this error
pub fn user_message(err: &(dyn Error + 'static)) -> String {
    if let Some(api_err) = err.downcast_ref::<ApiError>() {
        if let Some(m) = api_err.server_message() {
            return m.to_string();
        }
    }
    if let Some(validation_err) = err.downcast_ref::<ValidationError>() {
        return validation_err.to_string();
    }
    GENERIC_ERROR_MESSAGE.to_string()
}
