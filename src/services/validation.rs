//! Fail-fast completion check on catalog results.

use log::warn;

use crate::catalog::query::CatalogSearchResult;
use crate::error::{Result, SearchError};
use crate::models::ObservationSnapshot;

/// Confirm every required guide probe group produced at least one candidate.
///
/// Runs once per search, before any per-orientation analysis, so a hopeless
/// search fails cheaply. Fails with the first empty group in the snapshot's
/// declared group order, which keeps the reported group deterministic.
pub fn check_completion(
    snapshot: &ObservationSnapshot,
    results: &[CatalogSearchResult],
) -> Result<()> {
    for &group in &snapshot.required_groups {
        let found = results
            .iter()
            .any(|result| result.criterion.group == group && !result.candidates.is_empty());
        if !found {
            warn!("no {} candidates in any catalog result", group);
            return Err(SearchError::MissingGroupCandidates(group));
        }
    }
    Ok(())
}
