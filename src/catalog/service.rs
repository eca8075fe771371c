//! Per-group catalog sweep.
//!
//! Issues one cone query per search criterion, all in flight at once, each
//! under the configured deadline. Results come back in criterion order so the
//! completion check and the analyzer see a deterministic layout.

use log::debug;
use std::time::Duration;
use tokio::time::timeout;

use crate::catalog::query::{CatalogSearchResult, ConeQuery, GuideStarCatalog, SearchCriterion};
use crate::error::{CatalogError, Result};
use crate::models::ObservationSnapshot;
use crate::services::cancel::CancelToken;

/// Run every criterion's cone query against the backend.
///
/// Cancellation is observed before each query is issued. A failed or timed
/// out query fails the whole sweep; the pipeline performs no retries.
pub async fn search_guide_star_catalogs(
    backend: &dyn GuideStarCatalog,
    snapshot: &ObservationSnapshot,
    criteria: Vec<SearchCriterion>,
    deadline: Duration,
    cancel: &CancelToken,
) -> Result<Vec<CatalogSearchResult>> {
    let queries = criteria.into_iter().map(|criterion| {
        let query = ConeQuery::from_criterion(snapshot, criterion);
        run_query(backend, query, deadline, cancel.clone())
    });

    futures::future::try_join_all(queries).await
}

async fn run_query(
    backend: &dyn GuideStarCatalog,
    query: ConeQuery,
    deadline: Duration,
    cancel: CancelToken,
) -> Result<CatalogSearchResult> {
    cancel.check()?;

    let criterion = &query.criterion;
    debug!(
        "querying {} for {} stars at ({}, {}) r={} deg",
        criterion.catalog.catalog_name(),
        criterion.group,
        query.ra_deg,
        query.dec_deg,
        query.radius_deg()
    );

    let candidates = match timeout(deadline, backend.search(&query, deadline)).await {
        Ok(Ok(candidates)) => candidates,
        Ok(Err(e)) => return Err(e.into()),
        Err(_) => return Err(CatalogError::DeadlineExceeded.into()),
    };

    // Not every backend enforces the magnitude window server side, so the
    // criterion is re-applied here before analysis sees the list.
    let candidates: Vec<_> = candidates
        .into_iter()
        .filter(|candidate| criterion.magnitude.contains(candidate))
        .collect();

    debug!(
        "{} usable {} candidates from {}",
        candidates.len(),
        criterion.group,
        criterion.catalog.catalog_name()
    );

    Ok(CatalogSearchResult {
        criterion: query.criterion,
        candidates,
    })
}
