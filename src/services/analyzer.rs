//! Combinatorial asterism analysis.
//!
//! For every candidate orientation, every selection of one candidate per
//! required guide probe group is formed, checked for geometric feasibility
//! and scored. The scorer and the feasibility predicate are injected by the
//! instrument/AO model; the analyzer knows nothing about optics.

use log::{debug, info};
use std::collections::BTreeMap;

use crate::catalog::query::CatalogSearchResult;
use crate::error::Result;
use crate::models::{
    AnalysisResult, Asterism, GuideProbeGroup, GuideStarCandidate, ObservationSnapshot,
    OrientationDegrees,
};
use crate::services::cancel::CancelToken;
use crate::services::progress::ProgressSink;

/// Geometric feasibility of one candidate for one probe group at one
/// orientation: patrol field reach and instrument vignetting.
pub trait FeasibilityModel: Send + Sync {
    fn validate(
        &self,
        snapshot: &ObservationSnapshot,
        group: GuideProbeGroup,
        candidate: &GuideStarCandidate,
        orientation: OrientationDegrees,
    ) -> bool;
}

/// Expected performance of a feasible asterism. Higher is better; scores are
/// non-negative by contract.
pub trait AsterismScorer: Send + Sync {
    fn score(
        &self,
        snapshot: &ObservationSnapshot,
        orientation: OrientationDegrees,
        assignments: &BTreeMap<GuideProbeGroup, GuideStarCandidate>,
    ) -> f64;
}

/// Analyzer over one search's catalog results.
pub struct AsterismAnalyzer<'a> {
    pub snapshot: &'a ObservationSnapshot,
    pub feasibility: &'a dyn FeasibilityModel,
    pub scorer: &'a dyn AsterismScorer,
    /// Combinations between cancellation polls
    pub poll_interval: usize,
}

impl<'a> AsterismAnalyzer<'a> {
    /// Enumerate, validate and score every combination, returning asterisms
    /// sorted by score descending.
    ///
    /// The sort is stable, so asterisms with equal scores keep encounter
    /// order (orientation-major, then candidate-list order). If every
    /// combination is geometrically invalid the result is empty; emptiness
    /// is the coordinator's concern, not an error here.
    pub fn analyze(
        &self,
        orientations: &[OrientationDegrees],
        results: &[CatalogSearchResult],
        progress: &dyn ProgressSink,
        cancel: &CancelToken,
    ) -> Result<AnalysisResult> {
        let groups = &self.snapshot.required_groups;
        let lists: Vec<Vec<&GuideStarCandidate>> = groups
            .iter()
            .map(|&group| {
                results
                    .iter()
                    .filter(|r| r.criterion.group == group)
                    .flat_map(|r| r.candidates.iter())
                    .collect()
            })
            .collect();

        if lists.iter().any(|list| list.is_empty()) {
            return Ok(vec![]);
        }

        let lens: Vec<usize> = lists.iter().map(|list| list.len()).collect();
        let per_orientation = lens
            .iter()
            .fold(1usize, |acc, &len| acc.saturating_mul(len));
        let total = per_orientation.saturating_mul(orientations.len());

        let keys: Vec<&str> = groups.iter().map(|g| g.key()).collect();
        progress.phase(&format!("Finding asterisms for {}", keys.join("/")));
        debug!(
            "analyzing {} combinations across {} orientations",
            total,
            orientations.len()
        );

        let mut found: Vec<Asterism> = Vec::new();
        let mut count = 0usize;

        for &orientation in orientations {
            // Each candidate is validated once per orientation; the product
            // loop then only consults the masks.
            let feasible: Vec<Vec<bool>> = groups
                .iter()
                .zip(&lists)
                .map(|(&group, list)| {
                    list.iter()
                        .map(|&candidate| {
                            self.feasibility
                                .validate(self.snapshot, group, candidate, orientation)
                        })
                        .collect()
                })
                .collect();

            let mut indices = vec![0usize; groups.len()];
            loop {
                count += 1;
                if self.poll_interval > 0 && count % self.poll_interval == 0 {
                    cancel.check()?;
                }

                if indices
                    .iter()
                    .enumerate()
                    .all(|(gi, &ci)| feasible[gi][ci])
                    && !reuses_candidate(&lists, &indices)
                {
                    let assignments: BTreeMap<GuideProbeGroup, GuideStarCandidate> = groups
                        .iter()
                        .enumerate()
                        .map(|(gi, &group)| (group, lists[gi][indices[gi]].clone()))
                        .collect();
                    let score = self.scorer.score(self.snapshot, orientation, &assignments);
                    progress.progress(count, total, score);
                    found.push(Asterism {
                        orientation,
                        assignments,
                        score,
                    });
                }

                if !advance(&mut indices, &lens) {
                    break;
                }
            }
        }

        found.sort_by(|a, b| b.score.total_cmp(&a.score));
        info!(
            "{} valid asterisms out of {} combinations",
            found.len(),
            count
        );
        Ok(found)
    }
}

// A candidate may appear in several groups' candidate lists, but one asterism
// must not assign the same star to two probes.
fn reuses_candidate(lists: &[Vec<&GuideStarCandidate>], indices: &[usize]) -> bool {
    for (gi, &ci) in indices.iter().enumerate() {
        for (gj, &cj) in indices.iter().enumerate().take(gi) {
            if lists[gi][ci] == lists[gj][cj] {
                return true;
            }
        }
    }
    false
}

// Odometer step over the Cartesian product; false when exhausted.
fn advance(indices: &mut [usize], lens: &[usize]) -> bool {
    for gi in (0..indices.len()).rev() {
        indices[gi] += 1;
        if indices[gi] < lens[gi] {
            return true;
        }
        indices[gi] = 0;
    }
    false
}
