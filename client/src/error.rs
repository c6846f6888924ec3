use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised by backend adapters and configuration.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport level failure talking to the backend.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non success status. The message is the one the
    /// backend put into its error body, shown to the user verbatim.
    #[error("{message}")]
    Api { status: StatusCode, message: String },

    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid uri: {0}")]
    InvalidUri(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_shows_backend_message() {
        // Arrange
        let err = Error::Api {
            status: StatusCode::FORBIDDEN,
            message: "new row violates row-level security policy".to_owned(),
        };

        // Act
        let text = err.to_string();

        // Assert
        assert_eq!(text, "new row violates row-level security policy");
    }

    #[test]
    fn io_error_conversion() {
        // Arrange
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read only");

        // Act
        let err: Error = io.into();

        // Assert
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.to_string(), "I/O error: read only");
    }

    #[test]
    fn config_error_display() {
        let err = Error::Config("MYFILES_URL is not set".to_owned());
        assert_eq!(err.to_string(), "configuration error: MYFILES_URL is not set");
    }
}
