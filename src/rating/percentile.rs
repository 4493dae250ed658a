//! Rating -> display percentile and 1..=7 level mapping.
//!
//! Six population cutoffs (p10 .. p93) act as anchors of a piecewise-linear
//! curve. Outside the outer anchors the nearest segment width is reused once
//! and the result is clamped to `[0, 1]`.

use serde::{Deserialize, Serialize};

/// Rating thresholds named after the population percentile they represent.
///
/// Expected to be strictly increasing; see [`PercentileCutoffs::is_ordered`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileCutoffs {
    pub p10: f64,
    pub p25: f64,
    pub p45: f64,
    pub p65: f64,
    pub p80: f64,
    pub p93: f64,
}

pub const DEFAULT_CUTOFFS: PercentileCutoffs = PercentileCutoffs {
    p10: 1200.0,
    p25: 1350.0,
    p45: 1500.0,
    p65: 1650.0,
    p80: 1800.0,
    p93: 1950.0,
};

impl Default for PercentileCutoffs {
    fn default() -> Self {
        DEFAULT_CUTOFFS
    }
}

impl PercentileCutoffs {
    pub fn is_ordered(&self) -> bool {
        let values = self.anchors().map(|(rating, _)| rating);
        values.windows(2).all(|pair| pair[0] < pair[1])
    }

    /// `(rating, percentile)` anchor points in ascending order.
    pub fn anchors(&self) -> [(f64, f64); 6] {
        [
            (self.p10, 0.10),
            (self.p25, 0.25),
            (self.p45, 0.45),
            (self.p65, 0.65),
            (self.p80, 0.80),
            (self.p93, 0.93),
        ]
    }
}

/// Cutoffs as supplied by an external source; any field may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialCutoffs {
    #[serde(default)]
    pub p10: Option<f64>,
    #[serde(default)]
    pub p25: Option<f64>,
    #[serde(default)]
    pub p45: Option<f64>,
    #[serde(default)]
    pub p65: Option<f64>,
    #[serde(default)]
    pub p80: Option<f64>,
    #[serde(default)]
    pub p93: Option<f64>,
}

impl From<PercentileCutoffs> for PartialCutoffs {
    fn from(value: PercentileCutoffs) -> Self {
        Self {
            p10: Some(value.p10),
            p25: Some(value.p25),
            p45: Some(value.p45),
            p65: Some(value.p65),
            p80: Some(value.p80),
            p93: Some(value.p93),
        }
    }
}

/// Fill every missing field with its default, independently of the others.
pub fn normalize_cutoffs(cutoffs: Option<&PartialCutoffs>) -> PercentileCutoffs {
    let Some(partial) = cutoffs else {
        return DEFAULT_CUTOFFS;
    };

    PercentileCutoffs {
        p10: partial.p10.unwrap_or(DEFAULT_CUTOFFS.p10),
        p25: partial.p25.unwrap_or(DEFAULT_CUTOFFS.p25),
        p45: partial.p45.unwrap_or(DEFAULT_CUTOFFS.p45),
        p65: partial.p65.unwrap_or(DEFAULT_CUTOFFS.p65),
        p80: partial.p80.unwrap_or(DEFAULT_CUTOFFS.p80),
        p93: partial.p93.unwrap_or(DEFAULT_CUTOFFS.p93),
    }
}

fn interpolate(rating: f64, low_rating: f64, high_rating: f64, low_pct: f64, high_pct: f64) -> f64 {
    if high_rating == low_rating {
        return low_pct;
    }
    let t = (rating - low_rating) / (high_rating - low_rating);
    low_pct + t * (high_pct - low_pct)
}

/// Approximate population percentile in `[0, 1]` for a rating.
pub fn rating_to_percentile(rating: f64, cutoffs: &PercentileCutoffs) -> f64 {
    let anchors = cutoffs.anchors();
    let (first_rating, first_pct) = anchors[0];

    if rating <= first_rating {
        let span = anchors[1].0 - first_rating;
        let floor = (first_rating - span).max(0.0);
        return interpolate(rating, floor, first_rating, 0.0, first_pct).max(0.0);
    }

    for pair in anchors.windows(2) {
        let (low_rating, low_pct) = pair[0];
        let (high_rating, high_pct) = pair[1];
        if rating == high_rating {
            return high_pct;
        }
        if rating < high_rating {
            return interpolate(rating, low_rating, high_rating, low_pct, high_pct);
        }
    }

    let (last_rating, last_pct) = anchors[5];
    let span = last_rating - anchors[4].0;
    let ceiling = last_rating + span;
    interpolate(rating, last_rating, ceiling, last_pct, 1.0).min(1.0)
}

/// Clamp to `[0, 1]` and express as a whole percent.
pub fn percentile_to_display(percentile: f64) -> u8 {
    (percentile.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Level from raw rating thresholds. Each cutoff is inclusive on its band.
pub fn level_from_rating(rating: f64, cutoffs: Option<&PercentileCutoffs>) -> u8 {
    let cutoffs = cutoffs.copied().unwrap_or(DEFAULT_CUTOFFS);

    cutoffs
        .anchors()
        .iter()
        .position(|(threshold, _)| rating <= *threshold)
        .map(|index| index as u8 + 1)
        .unwrap_or(7)
}

const LEVEL_UPPER_BOUNDS: [f64; 7] = [0.10, 0.25, 0.45, 0.65, 0.80, 0.93, 1.0];

/// Level from an exact population percentile.
pub fn level_from_percentile(percentile: f64) -> u8 {
    let clamped = percentile.clamp(0.0, 1.0);
    LEVEL_UPPER_BOUNDS
        .iter()
        .position(|max| clamped <= *max)
        .map(|index| index as u8 + 1)
        .unwrap_or(1)
}
