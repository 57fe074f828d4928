use thiserror::Error;

/// Errors surfaced by [`crate::WeatherQuoteService`].
///
/// Provider failures never show up here; they are recovered inside the
/// lookups.
#[derive(Debug, Error)]
pub enum Error {
    /// A required request field was missing or blank.
    #[error("{0}")]
    InvalidInput(String),

    /// Anything else that went wrong while assembling a result.
    #[error("{0}")]
    Unexpected(String),
}

pub type Result<T> = std::result::Result<T, Error>;
