use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Errors raised while harvesting images from a results page
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Bad caller input, detected before any browser or network work
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to connect to WebDriver: {0}")]
    WebDriverConnect(String),

    #[error("browser command failed: {0}")]
    Browser(#[from] fantoccini::error::CmdError),

    /// Non-success response for a remote image; the candidate is skipped
    #[error("fetch of {url} returned status {status}")]
    Fetch { url: String, status: u16 },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("image processing failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("invalid service account credentials: {0}")]
    Credentials(String),

    #[error("object storage error: {0}")]
    Storage(String),
}

impl ScrapeError {
    /// Whether the pipeline may skip the current candidate and continue
    ///
    /// Only non-success statuses qualify; transport failures end the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ScrapeError::Fetch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ScrapeError::Fetch {
            url: "https://example.com/a.jpg".to_string(),
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "fetch of https://example.com/a.jpg returned status 404"
        );

        let err = ScrapeError::InvalidInput("bucket is required".to_string());
        assert!(err.to_string().contains("bucket is required"));
    }

    #[test]
    fn test_recoverable_errors() {
        let fetch = ScrapeError::Fetch {
            url: "https://example.com".to_string(),
            status: 500,
        };
        assert!(fetch.is_recoverable());

        assert!(!ScrapeError::Storage("upload rejected".to_string()).is_recoverable());
        assert!(!ScrapeError::InvalidInput("empty selector".to_string()).is_recoverable());
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(!ScrapeError::from(io).is_recoverable());
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_recoverable() {
        // Nothing listens on port 9 of the loopback interface
        let err = reqwest::Client::new()
            .get("http://127.0.0.1:9/a.jpg")
            .send()
            .await
            .unwrap_err();
        assert!(!ScrapeError::from(err).is_recoverable());
    }
}
