//! Error types for the asterism search pipeline.

use thiserror::Error;

use crate::models::GuideProbeGroup;

/// Result type for search operations
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors surfaced by a guide star search.
///
/// Callers are expected to match exhaustively: the distinction between a
/// canceled search, an empty catalog result and a catalog outage drives
/// different operator messaging.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Cooperative cancellation was observed at a poll point
    #[error("The guide star search was canceled")]
    Cancelled,

    /// A required guide probe group has no catalog candidates
    #[error("No {0} guide stars were found")]
    MissingGroupCandidates(GuideProbeGroup),

    /// Candidates existed for every group, but no geometrically valid
    /// combination survived at any orientation
    #[error("No guide stars were found")]
    NoStarsFound,

    /// Catalog query failed or exceeded its deadline
    #[error("Guide star catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// Any other failure, propagated without interpretation
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

/// Errors reported by a catalog backend.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The query could not be completed (network or service failure)
    #[error("Catalog query failed: {0}")]
    Query(String),

    /// The query did not finish within its deadline
    #[error("Catalog query exceeded its deadline")]
    DeadlineExceeded,
}

impl From<CatalogError> for SearchError {
    fn from(e: CatalogError) -> Self {
        SearchError::CatalogUnavailable(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_group_message_names_the_group() {
        let err = SearchError::MissingGroupCandidates(GuideProbeGroup::Flexure);
        assert_eq!(err.to_string(), "No flexure guide stars were found");
    }

    #[test]
    fn test_catalog_error_maps_to_unavailable() {
        let err: SearchError = CatalogError::DeadlineExceeded.into();
        assert!(matches!(err, SearchError::CatalogUnavailable(_)));
    }
}
