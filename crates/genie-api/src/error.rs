//! Error types for genie-api

use thiserror::Error;

/// Result type alias using genie-api Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to the DataGenie backend
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level failure (DNS, connect, reset, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the JSON we expected
    #[error("Malformed response: {0}")]
    Json(#[from] serde_json::Error),

    /// Backend answered with a non-2xx status
    #[error("Backend returned HTTP {status}{}", format_body(.message))]
    Status { status: u16, message: String },
}

fn format_body(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!(" ({})", message)
    }
}

impl Error {
    /// Create a status error from an HTTP status code and response body
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// HTTP status carried by this error, if the server answered at all
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the request never got an HTTP answer (connect refused, DNS, reset)
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Http(e) if e.status().is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_without_body() {
        let e = Error::status(500, "");
        assert_eq!(e.to_string(), "Backend returned HTTP 500");
    }

    #[test]
    fn test_status_display_with_body() {
        let e = Error::status(503, "upstream unavailable");
        assert_eq!(e.to_string(), "Backend returned HTTP 503 (upstream unavailable)");
    }

    #[test]
    fn test_http_status_accessor() {
        assert_eq!(Error::status(404, "nope").http_status(), Some(404));
        let parse = serde_json::from_str::<serde_json::Value>("").unwrap_err();
        assert_eq!(Error::from(parse).http_status(), None);
    }

    #[test]
    fn test_json_error_is_not_network() {
        let parse = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let e = Error::from(parse);
        assert!(!e.is_network());
        assert!(e.to_string().starts_with("Malformed response"));
    }
}
