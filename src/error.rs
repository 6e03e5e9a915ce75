use std::fmt;

use failure::Fail;

/// The class of failure behind a `TransportFault`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportFaultKind {
    Timeout,
    Connection,
    /// HTTP error status, OGC exception report or an otherwise unusable reply.
    Protocol,
    Os,
}

impl fmt::Display for TransportFaultKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TransportFaultKind::Timeout => write!(f, "Timeout"),
            TransportFaultKind::Connection => write!(f, "Connection"),
            TransportFaultKind::Protocol => write!(f, "Protocol"),
            TransportFaultKind::Os => write!(f, "OS"),
        }
    }
}

/// This error occurs when a request to the feature or log service fails.
#[derive(Debug, Fail)]
#[fail(display = "{} error: {}", kind, message)]
pub struct TransportFault {
    pub kind: TransportFaultKind,
    pub message: String,
}

impl TransportFault {
    pub fn new(kind: TransportFaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportFault {
    fn from(error: reqwest::Error) -> Self {
        let kind = if error.is_timeout() {
            TransportFaultKind::Timeout
        } else if error.is_connect() {
            TransportFaultKind::Connection
        } else if error.is_body() {
            TransportFaultKind::Os
        } else {
            TransportFaultKind::Protocol
        };

        Self::new(kind, error.to_string())
    }
}

impl From<std::io::Error> for TransportFault {
    fn from(error: std::io::Error) -> Self {
        Self::new(TransportFaultKind::Os, error.to_string())
    }
}

/// This error occurs when a response body cannot be read as a structured document.
#[derive(Debug, Fail)]
pub enum ParseFault {
    #[fail(display = "response is not valid UTF-8 text: {}", _0)]
    NotText(#[cause] std::str::Utf8Error),
    #[fail(display = "malformed XML at position {}: {}", position, message)]
    Xml { position: usize, message: String },
    #[fail(display = "response contains no root element")]
    NoRootElement,
    #[fail(display = "malformed JSON: {}", _0)]
    Json(#[cause] serde_json::Error),
}

impl From<serde_json::Error> for ParseFault {
    fn from(error: serde_json::Error) -> Self {
        ParseFault::Json(error)
    }
}
