//! Search coordination facade.
//!
//! [`SearchCoordinator`] drives the full pipeline (orientation set, catalog
//! sweep, completion check, combinatorial analysis, orientation filter) on
//! behalf of a caller, tracks the per-invocation status machine, and commits
//! the chosen asterism through the observation model collaborator.

use log::info;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::catalog::query::{GuideStarCatalog, SearchOptions};
use crate::catalog::service::search_guide_star_catalogs;
use crate::config::EngineConfig;
use crate::error::{Result, SearchError};
use crate::models::{
    filter_by_orientation, position_angles, AnalysisResult, Asterism, GuideProbeGroup,
    GuideStarCandidate, ObservationSnapshot, OrientationDegrees,
};
use crate::services::analyzer::{AsterismAnalyzer, AsterismScorer, FeasibilityModel};
use crate::services::cancel::CancelToken;
use crate::services::progress::{LogLevel, ProgressSink, SearchTracker};
use crate::services::validation::check_completion;

/// Holds and persists the committed orientation and guide target
/// assignments.
///
/// `commit` must be atomic: either the orientation and every assignment are
/// applied together, or nothing is. The engine neither locks nor retries it.
pub trait ObservationModel: Send + Sync {
    fn commit(
        &self,
        orientation: OrientationDegrees,
        assignments: &BTreeMap<GuideProbeGroup, GuideStarCandidate>,
    ) -> anyhow::Result<()>;
}

/// Facade over the search pipeline.
#[derive(Clone)]
pub struct SearchCoordinator {
    catalog: Arc<dyn GuideStarCatalog>,
    feasibility: Arc<dyn FeasibilityModel>,
    scorer: Arc<dyn AsterismScorer>,
    config: EngineConfig,
    tracker: SearchTracker,
}

impl SearchCoordinator {
    pub fn new(
        catalog: Arc<dyn GuideStarCatalog>,
        feasibility: Arc<dyn FeasibilityModel>,
        scorer: Arc<dyn AsterismScorer>,
        config: EngineConfig,
    ) -> Self {
        Self {
            catalog,
            feasibility,
            scorer,
            config,
            tracker: SearchTracker::new(),
        }
    }

    /// Status and log store for the in-flight search.
    pub fn tracker(&self) -> SearchTracker {
        self.tracker.clone()
    }

    /// Run the full pipeline and return the single top-ranked asterism.
    ///
    /// Fails with [`SearchError::NoStarsFound`] when candidates existed for
    /// every group but no geometrically valid combination survived at any
    /// orientation.
    pub async fn find_best_asterism(
        &self,
        snapshot: &ObservationSnapshot,
        options: &SearchOptions,
        progress: &dyn ProgressSink,
        cancel: &CancelToken,
    ) -> Result<Asterism> {
        self.tracker.start_search();
        let result = match self.run_pipeline(snapshot, options, progress, cancel).await {
            Ok(ranked) => ranked
                .into_iter()
                .next()
                .ok_or(SearchError::NoStarsFound),
            Err(e) => Err(e),
        };
        self.record_outcome(result.as_ref().err());
        result
    }

    /// Run the full pipeline and return every asterism sharing the best
    /// orientation, for presenting alternatives to an operator.
    pub async fn find_all_asterisms(
        &self,
        snapshot: &ObservationSnapshot,
        options: &SearchOptions,
        progress: &dyn ProgressSink,
        cancel: &CancelToken,
    ) -> Result<AnalysisResult> {
        self.tracker.start_search();
        let result = self
            .run_pipeline(snapshot, options, progress, cancel)
            .await
            .map(filter_by_orientation);
        self.record_outcome(result.as_ref().err());
        result
    }

    async fn run_pipeline(
        &self,
        snapshot: &ObservationSnapshot,
        options: &SearchOptions,
        progress: &dyn ProgressSink,
        cancel: &CancelToken,
    ) -> Result<AnalysisResult> {
        progress.phase("Finding best asterisms...");

        let orientations = match &options.orientations {
            Some(overridden) => overridden.clone(),
            None => position_angles(snapshot.orientation),
        };
        let criteria = options.criteria(snapshot, self.config.default_catalog);

        let results = search_guide_star_catalogs(
            self.catalog.as_ref(),
            snapshot,
            criteria,
            self.config.catalog_deadline(),
            cancel,
        )
        .await?;

        check_completion(snapshot, &results)?;

        let analyzer = AsterismAnalyzer {
            snapshot,
            feasibility: self.feasibility.as_ref(),
            scorer: self.scorer.as_ref(),
            poll_interval: self.config.cancel_poll_interval,
        };
        analyzer.analyze(&orientations, &results, progress, cancel)
    }

    /// Commit the chosen asterism into the observation.
    ///
    /// Cancellation is honored before the commit; a search that was canceled
    /// never mutates the observation. The commit itself is delegated to the
    /// observation model and treated as one transactional step.
    pub fn apply_result(
        &self,
        asterism: &Asterism,
        model: &dyn ObservationModel,
        cancel: &CancelToken,
    ) -> Result<()> {
        cancel.check()?;
        info!(
            "committing asterism at {} with {} guide stars",
            asterism.orientation,
            asterism.assignments.len()
        );
        model
            .commit(asterism.orientation, &asterism.assignments)
            .map_err(SearchError::Unexpected)?;
        self.tracker.log(
            LogLevel::Success,
            format!("Applied asterism at {}", asterism.orientation),
        );
        Ok(())
    }

    /// Run `find_best_asterism` on a background task.
    ///
    /// The caller keeps the returned [`SearchTask`] to await completion or
    /// request cancellation; the calling task is never blocked.
    pub fn spawn_find_best(
        &self,
        snapshot: ObservationSnapshot,
        options: SearchOptions,
        progress: Arc<dyn ProgressSink>,
    ) -> SearchTask {
        let cancel = CancelToken::new();
        let coordinator = self.clone();
        let token = cancel.clone();
        let handle = tokio::spawn(async move {
            coordinator
                .find_best_asterism(&snapshot, &options, progress.as_ref(), &token)
                .await
        });
        SearchTask { cancel, handle }
    }

    fn record_outcome(&self, error: Option<&SearchError>) {
        match error {
            None => self.tracker.complete("Search completed"),
            Some(SearchError::Cancelled) => {
                self.tracker.cancelled(SearchError::Cancelled.to_string())
            }
            Some(e) => self.tracker.fail(e.to_string()),
        }
    }
}

/// Handle to a search running on a background task.
pub struct SearchTask {
    cancel: CancelToken,
    handle: tokio::task::JoinHandle<Result<Asterism>>,
}

impl SearchTask {
    /// Request cooperative cancellation; takes effect at the next poll point.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token observed by the running search.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Wait for the search to finish.
    pub async fn join(self) -> Result<Asterism> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) => Err(SearchError::Unexpected(anyhow::anyhow!(
                "search worker panicked: {e}"
            ))),
        }
    }
}
