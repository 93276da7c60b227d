use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Sanctions data not available")]
    DataNotReady,

    #[error("Update already in progress")]
    AlreadyInProgress,

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Feed unavailable: {0}")]
    FeedUnavailable(String),

    #[error("Snapshot storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Stored snapshot is inconsistent: {0}")]
    CorruptSnapshot(String),

    #[error("Snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ServiceError::FeedUnavailable(format!("download timed out: {}", err))
        } else {
            ServiceError::FeedUnavailable(err.to_string())
        }
    }
}

impl From<quick_xml::DeError> for ServiceError {
    fn from(err: quick_xml::DeError) -> Self {
        ServiceError::FeedUnavailable(format!("malformed SDN document: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
