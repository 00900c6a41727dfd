use mosaic_core::error::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// Registry miss or other domain error (carries the templated message).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The remote repository failed or returned an unusable response.
    /// Surfaced immediately; there is no retry logic.
    #[error("Upstream content repository error: {0}")]
    Upstream(String),

    /// A loaded value did not have the shape its converter expects.
    #[error("Invalid \"{value_type}\" value payload: {message}")]
    InvalidPayload {
        value_type: String,
        message: String,
    },
}

impl From<reqwest::Error> for ContentError {
    fn from(err: reqwest::Error) -> Self {
        ContentError::Upstream(err.to_string())
    }
}
