//! Where a user stands: level, display percentile and the cutoffs behind them.

use serde::Serialize;

use crate::rating::percentile::{
    level_from_percentile, level_from_rating, normalize_cutoffs, percentile_to_display,
    rating_to_percentile, PartialCutoffs, PercentileCutoffs,
};
use crate::rating::{UserRatingState, DEFAULT_RATING};
use crate::store::{Store, StoreError};

/// Percentile shown to users who have not practised yet.
const NEW_USER_PERCENTILE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PercentileSource {
    /// Exact percent rank among practising users.
    Population,
    /// Interpolated from the rating cutoffs.
    Approximate,
    /// No attempts yet.
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveCutoffs {
    pub cutoffs: PercentileCutoffs,
    /// 0 when no population snapshot has been published.
    pub version: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub level: u8,
    pub percentile: u8,
    pub percentile_source: PercentileSource,
}

pub fn active_cutoffs(store: &Store) -> Result<ActiveCutoffs, StoreError> {
    let Some(snapshot) = store.latest_cutoff_snapshot()? else {
        return Ok(ActiveCutoffs {
            cutoffs: normalize_cutoffs(None),
            version: 0,
        });
    };

    let cutoffs = normalize_cutoffs(Some(&PartialCutoffs::from(snapshot.cutoffs)));
    if !cutoffs.is_ordered() {
        tracing::warn!(version = snapshot.version, ?cutoffs, "Published cutoffs are not strictly increasing");
    }
    Ok(ActiveCutoffs {
        cutoffs,
        version: snapshot.version,
    })
}

/// Population percentile wins when available, otherwise the cutoffs are interpolated.
pub fn standing_for(
    store: &Store,
    state: Option<&UserRatingState>,
    cutoffs: &PercentileCutoffs,
) -> Result<Standing, StoreError> {
    let Some(state) = state.filter(|s| s.total_attempts > 0) else {
        return Ok(Standing {
            level: level_from_rating(DEFAULT_RATING, Some(cutoffs)),
            percentile: percentile_to_display(NEW_USER_PERCENTILE),
            percentile_source: PercentileSource::Default,
        });
    };

    // full scan of rating states, O(population) per call
    let population = store.rated_population()?;
    let standing = match population.percent_rank(state.rating) {
        Some(rank) => Standing {
            level: level_from_percentile(rank),
            percentile: percentile_to_display(rank),
            percentile_source: PercentileSource::Population,
        },
        None => Standing {
            level: level_from_rating(state.rating, Some(cutoffs)),
            percentile: percentile_to_display(rating_to_percentile(state.rating, cutoffs)),
            percentile_source: PercentileSource::Approximate,
        },
    };
    Ok(standing)
}
