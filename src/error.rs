use thiserror::Error;

/// Anything that goes wrong while fetching a page of search results.
///
/// The UI treats every variant the same way ("fetch failed"); the variants only
/// exist so the log says what actually happened.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("search endpoint returned HTTP {0}")]
    Status(u16),

    #[error("could not decode search response: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, FetchError>;
