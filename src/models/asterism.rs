//! Ranked asterisms: the output of the analysis phase.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::candidate::GuideStarCandidate;
use crate::models::observation::GuideProbeGroup;
use crate::models::orientation::OrientationDegrees;

/// One guide star per required probe group, evaluated together at a single
/// telescope orientation.
///
/// Invariants, maintained by the analyzer: every required group is present,
/// and no candidate is assigned to two groups within the same asterism.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asterism {
    /// Orientation the asterism was evaluated at
    pub orientation: OrientationDegrees,
    /// Exactly one candidate per required guide probe group
    pub assignments: BTreeMap<GuideProbeGroup, GuideStarCandidate>,
    /// Expected performance as estimated by the scorer, non-negative,
    /// higher is better
    pub score: f64,
}

/// Asterisms sorted non-increasing by score.
pub type AnalysisResult = Vec<Asterism>;

/// Keep only the asterisms sharing the top-ranked entry's orientation.
///
/// Once the best orientation is chosen, only alternatives reachable at that
/// same rotator angle are viable fallbacks, so the rest are dropped. Relative
/// order is preserved; an empty input stays empty.
pub fn filter_by_orientation(results: AnalysisResult) -> AnalysisResult {
    let Some(first) = results.first() else {
        return results;
    };
    let orientation = first.orientation;
    results
        .into_iter()
        .filter(|asterism| asterism.orientation == orientation)
        .collect()
}
