use thiserror::Error;

use crate::catalog::Family;

/// Failure of the catalog lookup collaborator.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
    #[error("predicate {predicate} cannot filter the {family} table")]
    UnsupportedPredicate { family: Family, predicate: String },
}

/// Failure of a single `resolve` call.
///
/// An empty result or an oversized result is not an error; callers decide what
/// to show based on the list length.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("malformed query '{query}': {reason}")]
    MalformedQuery { query: String, reason: String },
    #[error(transparent)]
    CatalogUnavailable(#[from] CatalogError),
}

impl ResolveError {
    pub(crate) fn malformed(query: &str, reason: impl Into<String>) -> Self {
        ResolveError::MalformedQuery {
            query: query.to_string(),
            reason: reason.into(),
        }
    }
}
