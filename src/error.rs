use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} API returned {status}: {message}")]
    Api {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("missing credential: {0} is not configured")]
    MissingCredential(&'static str),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("creator '{0}' is already in the roster")]
    DuplicateCreator(String),

    #[error("invalid creator record: {0}")]
    InvalidCreator(String),

    #[error("roster file error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// The external call could not be completed or its answer could not be decoded.
    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::Http(_) | AppError::Api { .. })
    }
}

impl From<toml::de::Error> for AppError {
    fn from(e: toml::de::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(e: url::ParseError) -> Self {
        AppError::Config(format!("invalid API base URL: {e}"))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_count_as_transport_failures() {
        let err = AppError::Api {
            service: "YouTube",
            status: 403,
            message: "quota".to_string(),
        };
        assert!(err.is_transport());
        assert_eq!(err.to_string(), "YouTube API returned 403: quota");
    }

    #[test]
    fn configuration_and_duplicate_errors_are_not_transport() {
        assert!(!AppError::MissingCredential("youtube_api_key").is_transport());
        assert!(!AppError::DuplicateCreator("Alice".into()).is_transport());
        assert!(!AppError::Config("bad".into()).is_transport());
    }
}
