//! Shared fakes for pipeline integration tests: an in-memory catalog, a
//! recording observation model and deterministic feasibility/scoring.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use ags_rust::catalog::query::{ConeQuery, GuideStarCatalog};
use ags_rust::error::CatalogError;
use ags_rust::models::{
    GuideProbeGroup, GuideStarCandidate, Instrument, MagnitudeBand, ObservationSnapshot,
    OrientationDegrees,
};
use ags_rust::services::{AsterismScorer, FeasibilityModel, ObservationModel, ProgressSink};

pub fn star(name: &str, ra_deg: f64, dec_deg: f64, r_mag: f64) -> GuideStarCandidate {
    GuideStarCandidate::new(name, ra_deg, dec_deg).with_magnitude(MagnitudeBand::R, r_mag)
}

pub fn gsaoi_snapshot() -> ObservationSnapshot {
    ObservationSnapshot::new(83.633, -5.375, Instrument::Gsaoi, OrientationDegrees::new(0.0))
}

/// Catalog backend answering from fixed per-group candidate lists.
#[derive(Default)]
pub struct InMemoryCatalog {
    stars: HashMap<GuideProbeGroup, Vec<GuideStarCandidate>>,
    delay: Option<Duration>,
    fail: bool,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(mut self, group: GuideProbeGroup, stars: Vec<GuideStarCandidate>) -> Self {
        self.stars.insert(group, stars);
        self
    }

    /// Simulate a slow service that answers only after `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Simulate an unreachable service.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl GuideStarCatalog for InMemoryCatalog {
    async fn search(
        &self,
        query: &ConeQuery,
        _deadline: Duration,
    ) -> Result<Vec<GuideStarCandidate>, CatalogError> {
        if self.fail {
            return Err(CatalogError::Query("catalog service offline".into()));
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self
            .stars
            .get(&query.criterion.group)
            .cloned()
            .unwrap_or_default())
    }
}

/// Every candidate is reachable and unvignetted at every orientation.
pub struct OpenSky;

impl FeasibilityModel for OpenSky {
    fn validate(
        &self,
        _snapshot: &ObservationSnapshot,
        _group: GuideProbeGroup,
        _candidate: &GuideStarCandidate,
        _orientation: OrientationDegrees,
    ) -> bool {
        true
    }
}

/// No candidate is ever reachable.
pub struct ClosedSky;

impl FeasibilityModel for ClosedSky {
    fn validate(
        &self,
        _snapshot: &ObservationSnapshot,
        _group: GuideProbeGroup,
        _candidate: &GuideStarCandidate,
        _orientation: OrientationDegrees,
    ) -> bool {
        false
    }
}

/// Deterministic stand-in for the performance estimator: brighter stars give
/// higher scores, with a small orientation term to break ties between
/// orientations. Always non-negative. Counts its calls.
#[derive(Default)]
pub struct BrightnessScorer {
    calls: Mutex<usize>,
}

impl BrightnessScorer {
    pub fn calls(&self) -> usize {
        *self.calls.lock()
    }
}

impl AsterismScorer for BrightnessScorer {
    fn score(
        &self,
        _snapshot: &ObservationSnapshot,
        orientation: OrientationDegrees,
        assignments: &BTreeMap<GuideProbeGroup, GuideStarCandidate>,
    ) -> f64 {
        *self.calls.lock() += 1;
        let brightness: f64 = assignments
            .values()
            .map(|c| (20.0 - c.magnitude(MagnitudeBand::R).unwrap_or(20.0)).max(0.0))
            .sum();
        brightness + (360.0 - orientation.degrees()) / 10_000.0
    }
}

/// Observation model that records commits instead of persisting them.
#[derive(Default)]
pub struct RecordingModel {
    commits: Mutex<Vec<(OrientationDegrees, BTreeMap<GuideProbeGroup, GuideStarCandidate>)>>,
}

impl RecordingModel {
    pub fn commits(
        &self,
    ) -> Vec<(OrientationDegrees, BTreeMap<GuideProbeGroup, GuideStarCandidate>)> {
        self.commits.lock().clone()
    }
}

impl ObservationModel for RecordingModel {
    fn commit(
        &self,
        orientation: OrientationDegrees,
        assignments: &BTreeMap<GuideProbeGroup, GuideStarCandidate>,
    ) -> anyhow::Result<()> {
        self.commits.lock().push((orientation, assignments.clone()));
        Ok(())
    }
}

/// Progress sink that keeps every event for later inspection.
#[derive(Default)]
pub struct RecordingSink {
    pub phases: Mutex<Vec<String>>,
    pub updates: Mutex<Vec<(usize, usize, f64)>>,
}

impl ProgressSink for RecordingSink {
    fn phase(&self, title: &str) {
        self.phases.lock().push(title.to_string());
    }

    fn progress(&self, count: usize, total: usize, score: f64) {
        self.updates.lock().push((count, total, score));
    }
}
