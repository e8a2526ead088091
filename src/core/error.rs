//! Error types for https-dwnld
//!
//! Every failure of a download collapses to the `Error` token at the CLI
//! boundary; the variants here keep the detail for the log channel.

use std::fmt;

/// Coarse classification of a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Conflicting or missing arguments, detected before any network activity
    Usage,
    /// DNS, connection, TLS or mid-stream failures
    Transport,
    /// Server answered with something other than 200
    Status,
    /// Response lacks a usable content length
    MissingMetadata,
    /// Local file deletion, creation or write failure
    Filesystem,
}

/// Main error type for https-dwnld operations
#[derive(Debug)]
pub enum Error {
    /// Invalid configuration or parameters
    InvalidInput(String),

    /// Network connectivity issues
    NetworkError(String),

    /// HTTP client error other than connectivity
    HttpError(String),

    /// Non-200 response status
    Status(u16),

    /// Save mode needs a content length to compute the chunk count
    MissingContentLength,

    /// Stream ended before the declared length was received
    Truncated { expected: u64, received: u64 },

    /// File I/O error
    IoError(std::io::Error),
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidInput(_) => ErrorKind::Usage,
            Error::NetworkError(_) | Error::HttpError(_) | Error::Truncated { .. } => {
                ErrorKind::Transport
            }
            Error::Status(_) => ErrorKind::Status,
            Error::MissingContentLength => ErrorKind::MissingMetadata,
            Error::IoError(_) => ErrorKind::Filesystem,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidInput(msg) => {
                write!(f, "Invalid input: {}", msg)
            }
            Error::NetworkError(msg) => {
                write!(f, "Network error: {}", msg)
            }
            Error::HttpError(msg) => {
                write!(f, "HTTP error: {}", msg)
            }
            Error::Status(code) => {
                write!(f, "URL Status Code: {}", code)
            }
            Error::MissingContentLength => {
                write!(f, "Response has no usable content-length header")
            }
            Error::Truncated { expected, received } => {
                write!(
                    f,
                    "Connection closed after {} of {} bytes",
                    received, expected
                )
            }
            Error::IoError(err) => {
                write!(f, "I/O error: {}", err)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Error::NetworkError(err.to_string())
        } else {
            Error::HttpError(err.to_string())
        }
    }
}

/// Convenience result type for https-dwnld operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(Error::InvalidInput("x".into()).kind(), ErrorKind::Usage);
        assert_eq!(Error::NetworkError("x".into()).kind(), ErrorKind::Transport);
        assert_eq!(Error::HttpError("x".into()).kind(), ErrorKind::Transport);
        assert_eq!(
            Error::Truncated { expected: 10, received: 4 }.kind(),
            ErrorKind::Transport
        );
        assert_eq!(Error::Status(401).kind(), ErrorKind::Status);
        assert_eq!(Error::MissingContentLength.kind(), ErrorKind::MissingMetadata);

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(Error::from(io).kind(), ErrorKind::Filesystem);
    }

    #[test]
    fn test_status_display_matches_log_line() {
        assert_eq!(Error::Status(403).to_string(), "URL Status Code: 403");
    }

    #[test]
    fn test_io_error_source() {
        use std::error::Error as _;

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::from(io);
        assert!(err.source().is_some());
        assert!(Error::Status(500).source().is_none());
    }
}
