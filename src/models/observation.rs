//! Observation context supplied by the caller.
//!
//! An [`ObservationSnapshot`] is an immutable view of the observation at the
//! moment a search starts: base pointing, instrument and current rotator
//! angle. The search never mutates it; committing results goes through the
//! observation model collaborator instead.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::orientation::OrientationDegrees;

/// A guiding role the instrument's AO system must fill.
///
/// Each required group receives exactly one guide star per asterism.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum GuideProbeGroup {
    /// Fast tip-tilt sensing
    TipTilt,
    /// Flexure / field sensing
    Flexure,
    /// Slow focus sensing
    SlowFocus,
}

impl GuideProbeGroup {
    /// Stable key used in criteria, logs and error messages.
    pub fn key(&self) -> &'static str {
        match self {
            GuideProbeGroup::TipTilt => "tiptilt",
            GuideProbeGroup::Flexure => "flexure",
            GuideProbeGroup::SlowFocus => "slow_focus",
        }
    }
}

impl fmt::Display for GuideProbeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Instrument behind the guide probes.
///
/// The instrument fixes which guide probe groups a search must fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Instrument {
    #[default]
    Gsaoi,
    Flamingos2,
    GmosSouth,
}

impl Instrument {
    /// Required guide probe groups for this instrument's AO mode.
    pub fn required_groups(&self) -> &'static [GuideProbeGroup] {
        match self {
            Instrument::Gsaoi => &[GuideProbeGroup::TipTilt, GuideProbeGroup::Flexure],
            Instrument::Flamingos2 => &[GuideProbeGroup::TipTilt, GuideProbeGroup::Flexure],
            Instrument::GmosSouth => &[
                GuideProbeGroup::TipTilt,
                GuideProbeGroup::Flexure,
                GuideProbeGroup::SlowFocus,
            ],
        }
    }
}

/// Immutable observation context for one search invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationSnapshot {
    /// Base position right ascension, in degrees
    pub base_ra_deg: f64,
    /// Base position declination, in degrees
    pub base_dec_deg: f64,
    /// Instrument in use
    pub instrument: Instrument,
    /// Current rotator position angle
    pub orientation: OrientationDegrees,
    /// Guide probe groups the search must fill, in declaration order
    pub required_groups: Vec<GuideProbeGroup>,
}

impl ObservationSnapshot {
    /// Create a snapshot with the instrument's default required groups.
    pub fn new(
        base_ra_deg: f64,
        base_dec_deg: f64,
        instrument: Instrument,
        orientation: OrientationDegrees,
    ) -> Self {
        Self {
            base_ra_deg,
            base_dec_deg,
            instrument,
            orientation,
            required_groups: instrument.required_groups().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_inherits_instrument_groups() {
        let snapshot = ObservationSnapshot::new(
            83.633,
            -5.375,
            Instrument::Gsaoi,
            OrientationDegrees::new(0.0),
        );
        assert_eq!(
            snapshot.required_groups,
            vec![GuideProbeGroup::TipTilt, GuideProbeGroup::Flexure]
        );
    }

    #[test]
    fn test_group_keys_are_stable() {
        assert_eq!(GuideProbeGroup::TipTilt.key(), "tiptilt");
        assert_eq!(GuideProbeGroup::SlowFocus.to_string(), "slow_focus");
    }
}
