//! Search criteria and the catalog backend contract.
//!
//! A search issues one cone query per required guide probe group. Criteria
//! are orientation-free: only the downstream combinatorics vary by
//! orientation, so the catalog is never queried twice for the same group.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::CatalogError;
use crate::models::{
    GuideProbeGroup, GuideStarCandidate, MagnitudeBand, ObservationSnapshot, OrientationDegrees,
};

/// Astrometric catalog to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogChoice {
    Ppmxl,
    #[default]
    Ucac3,
    Nomad1,
    /// A catalog loaded by the operator, outside the standard services
    UserCatalog,
}

impl CatalogChoice {
    /// Identifier understood by the catalog backend.
    pub fn catalog_name(&self) -> &'static str {
        match self {
            CatalogChoice::Ppmxl => "PPMXL",
            CatalogChoice::Ucac3 => "UCAC3",
            CatalogChoice::Nomad1 => "NOMAD1",
            CatalogChoice::UserCatalog => "user",
        }
    }

    /// Human-readable name for operator-facing displays.
    pub fn display_value(&self) -> &'static str {
        match self {
            CatalogChoice::Ppmxl => "PPMXL Catalog",
            CatalogChoice::Ucac3 => "UCAC3 Catalog",
            CatalogChoice::Nomad1 => "NOMAD1 Catalog",
            CatalogChoice::UserCatalog => "User Catalog",
        }
    }
}

/// Tip-tilt sensing mode: which wavefront sensor chain does the fast
/// sensing, and therefore which bandpass constrains the tip-tilt criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipTiltMode {
    /// Peripheral optical WFS; tip-tilt stars selected in R
    #[default]
    Optical,
    /// On-instrument NIR detector; tip-tilt stars selected in the NIR band
    Instrument,
}

/// Magnitude window a candidate must fall in to be usable by a probe group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MagnitudeConstraint {
    pub band: MagnitudeBand,
    /// Faintest usable magnitude
    pub faint_limit: f64,
    /// Brightest usable magnitude before the detector saturates
    pub saturation_limit: f64,
}

impl MagnitudeConstraint {
    /// Nominal constraint for a probe group in the given band.
    pub fn nominal(group: GuideProbeGroup, band: MagnitudeBand) -> Self {
        let (faint_limit, saturation_limit) = match group {
            GuideProbeGroup::TipTilt => (15.5, 8.0),
            GuideProbeGroup::Flexure => (17.0, 9.0),
            GuideProbeGroup::SlowFocus => (14.5, 7.0),
        };
        Self {
            band,
            faint_limit,
            saturation_limit,
        }
    }

    /// True when the candidate has a magnitude in this band inside the window.
    pub fn contains(&self, candidate: &GuideStarCandidate) -> bool {
        candidate
            .magnitude(self.band)
            .map(|mag| mag >= self.saturation_limit && mag <= self.faint_limit)
            .unwrap_or(false)
    }
}

/// Annular search region around the base position, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadiusConstraint {
    pub min_deg: f64,
    pub max_deg: f64,
}

impl RadiusConstraint {
    /// Nominal patrol-field radius for a probe group.
    pub fn nominal(group: GuideProbeGroup) -> Self {
        match group {
            GuideProbeGroup::TipTilt => Self {
                min_deg: 0.0,
                max_deg: 0.025,
            },
            GuideProbeGroup::Flexure => Self {
                min_deg: 0.0,
                max_deg: 0.035,
            },
            GuideProbeGroup::SlowFocus => Self {
                min_deg: 0.06,
                max_deg: 0.115,
            },
        }
    }
}

/// What to ask the catalog for one required guide probe group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCriterion {
    pub group: GuideProbeGroup,
    pub magnitude: MagnitudeConstraint,
    pub radius: RadiusConstraint,
    pub catalog: CatalogChoice,
}

/// A concrete cone query: the base position plus the criterion to satisfy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConeQuery {
    /// Cone center right ascension, in degrees
    pub ra_deg: f64,
    /// Cone center declination, in degrees
    pub dec_deg: f64,
    /// What the query is for: group, magnitude window, radius, catalog
    pub criterion: SearchCriterion,
}

impl ConeQuery {
    pub fn from_criterion(snapshot: &ObservationSnapshot, criterion: SearchCriterion) -> Self {
        Self {
            ra_deg: snapshot.base_ra_deg,
            dec_deg: snapshot.base_dec_deg,
            criterion,
        }
    }

    /// Outer search radius, in degrees.
    pub fn radius_deg(&self) -> f64 {
        self.criterion.radius.max_deg
    }
}

/// Result of one catalog query. Candidate order is not guaranteed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSearchResult {
    pub criterion: SearchCriterion,
    pub candidates: Vec<GuideStarCandidate>,
}

/// Options controlling one search invocation, supplied by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Catalog override; when absent the engine's configured default is used
    #[serde(default)]
    pub catalog: Option<CatalogChoice>,
    /// Tip-tilt sensing mode
    #[serde(default)]
    pub tip_tilt_mode: TipTiltMode,
    /// NIR band override for instrument tip-tilt sensing (default H)
    #[serde(default)]
    pub nir_band: Option<MagnitudeBand>,
    /// Orientation set override; when absent the current angle plus the
    /// four cardinal angles are used
    #[serde(default)]
    pub orientations: Option<Vec<OrientationDegrees>>,
}

impl SearchOptions {
    /// Build one criterion per required group, in the snapshot's group order.
    ///
    /// `default_catalog` applies when the options carry no catalog override.
    pub fn criteria(
        &self,
        snapshot: &ObservationSnapshot,
        default_catalog: CatalogChoice,
    ) -> Vec<SearchCriterion> {
        let catalog = self.catalog.unwrap_or(default_catalog);
        snapshot
            .required_groups
            .iter()
            .map(|&group| {
                let band = self.band_for(group);
                SearchCriterion {
                    group,
                    magnitude: MagnitudeConstraint::nominal(group, band),
                    radius: RadiusConstraint::nominal(group),
                    catalog,
                }
            })
            .collect()
    }

    fn band_for(&self, group: GuideProbeGroup) -> MagnitudeBand {
        match (group, self.tip_tilt_mode) {
            (GuideProbeGroup::TipTilt, TipTiltMode::Instrument) => {
                self.nir_band.unwrap_or(MagnitudeBand::H)
            }
            _ => MagnitudeBand::R,
        }
    }
}

/// Backend performing cone searches against an astrometric catalog.
///
/// Implementations must honor the deadline; the pipeline additionally
/// enforces it and reports an overrun as a catalog failure. Backends are
/// never asked to retry.
#[async_trait]
pub trait GuideStarCatalog: Send + Sync {
    async fn search(
        &self,
        query: &ConeQuery,
        deadline: Duration,
    ) -> Result<Vec<GuideStarCandidate>, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Instrument;

    #[test]
    fn test_criteria_follow_required_group_order() {
        let snapshot = ObservationSnapshot::new(
            10.0,
            -30.0,
            Instrument::GmosSouth,
            OrientationDegrees::new(0.0),
        );
        let criteria = SearchOptions::default().criteria(&snapshot, CatalogChoice::default());
        let groups: Vec<GuideProbeGroup> = criteria.iter().map(|c| c.group).collect();
        assert_eq!(groups, snapshot.required_groups);
        assert!(criteria.iter().all(|c| c.catalog == CatalogChoice::Ucac3));
    }

    #[test]
    fn test_instrument_mode_switches_tiptilt_band() {
        let snapshot =
            ObservationSnapshot::new(10.0, -30.0, Instrument::Gsaoi, OrientationDegrees::new(0.0));
        let options = SearchOptions {
            tip_tilt_mode: TipTiltMode::Instrument,
            nir_band: Some(MagnitudeBand::K),
            ..SearchOptions::default()
        };
        let criteria = options.criteria(&snapshot, CatalogChoice::default());
        assert_eq!(criteria[0].magnitude.band, MagnitudeBand::K);
        // Flexure sensing stays optical
        assert_eq!(criteria[1].magnitude.band, MagnitudeBand::R);
    }

    #[test]
    fn test_magnitude_constraint_rejects_saturated_and_unmeasured() {
        let constraint = MagnitudeConstraint::nominal(GuideProbeGroup::TipTilt, MagnitudeBand::R);
        let usable = GuideStarCandidate::new("a", 0.0, 0.0).with_magnitude(MagnitudeBand::R, 12.0);
        let saturated =
            GuideStarCandidate::new("b", 0.0, 0.0).with_magnitude(MagnitudeBand::R, 5.0);
        let unmeasured = GuideStarCandidate::new("c", 0.0, 0.0);
        assert!(constraint.contains(&usable));
        assert!(!constraint.contains(&saturated));
        assert!(!constraint.contains(&unmeasured));
    }
}
