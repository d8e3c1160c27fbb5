// product_search/src/error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    /// A request field failed validation. The message names the field.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// No document exists for the given identifier.
    #[error("Product not found: {0}")]
    NotFound(String),

    /// The search engine is unreachable, timed out, or answered with a non-success status.
    #[error("Search engine error: {0}")]
    Upstream(String),

    #[error("Failed to (de)serialize engine payload: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SearchError {
    pub fn not_found(id: &str) -> Self {
        SearchError::NotFound(format!("no product with id '{}'", id))
    }
}

pub type SearchResult<T, E = SearchError> = std::result::Result<T, E>;
