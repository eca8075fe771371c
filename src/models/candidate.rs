//! Guide star candidates returned from catalog queries.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Photometric bandpass of a catalog magnitude.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum MagnitudeBand {
    R,
    J,
    H,
    K,
}

/// A star found by a catalog search.
///
/// Candidates are read-only facts from the catalog: position plus whatever
/// magnitudes the catalog reported. Anything beyond what the feasibility
/// model and scorer consume is intentionally not modeled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuideStarCandidate {
    /// Catalog designation
    pub name: String,
    /// Right ascension, in degrees
    pub ra_deg: f64,
    /// Declination, in degrees
    pub dec_deg: f64,
    /// Magnitude per band, as reported by the catalog
    #[serde(default)]
    pub magnitudes: BTreeMap<MagnitudeBand, f64>,
}

impl GuideStarCandidate {
    pub fn new(name: impl Into<String>, ra_deg: f64, dec_deg: f64) -> Self {
        Self {
            name: name.into(),
            ra_deg,
            dec_deg,
            magnitudes: BTreeMap::new(),
        }
    }

    /// Add a magnitude measurement, builder style.
    pub fn with_magnitude(mut self, band: MagnitudeBand, mag: f64) -> Self {
        self.magnitudes.insert(band, mag);
        self
    }

    /// Magnitude in the given band, if the catalog reported one.
    pub fn magnitude(&self, band: MagnitudeBand) -> Option<f64> {
        self.magnitudes.get(&band).copied()
    }
}

/// Sort candidates brightest first in the given band.
///
/// Stars with no magnitude in the band sort last. The sort is stable, so
/// catalog order is preserved among equally bright stars.
pub fn sort_by_brightness(candidates: &mut [GuideStarCandidate], band: MagnitudeBand) {
    candidates.sort_by(|a, b| {
        let ma = a.magnitude(band).unwrap_or(f64::INFINITY);
        let mb = b.magnitude(band).unwrap_or(f64::INFINITY);
        ma.total_cmp(&mb)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn star(name: &str, r_mag: Option<f64>) -> GuideStarCandidate {
        let candidate = GuideStarCandidate::new(name, 0.0, 0.0);
        match r_mag {
            Some(mag) => candidate.with_magnitude(MagnitudeBand::R, mag),
            None => candidate,
        }
    }

    #[test]
    fn test_sort_by_brightness_puts_brightest_first() {
        let mut candidates = vec![
            star("faint", Some(15.0)),
            star("bright", Some(9.0)),
            star("mid", Some(12.0)),
        ];
        sort_by_brightness(&mut candidates, MagnitudeBand::R);
        let names: Vec<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["bright", "mid", "faint"]);
    }

    #[test]
    fn test_sort_by_brightness_unmeasured_stars_sort_last() {
        let mut candidates = vec![star("unknown", None), star("known", Some(14.0))];
        sort_by_brightness(&mut candidates, MagnitudeBand::R);
        assert_eq!(candidates[0].name, "known");
        assert_eq!(candidates[1].name, "unknown");
    }
}
