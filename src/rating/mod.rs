//! Rating core: Elo exchange, percentile/level mapping and adaptive word selection.
//!
//! Everything in here is pure. Storage and HTTP code feed plain values in and
//! persist what comes back out.

pub mod category;
pub mod elo;
pub mod percentile;
pub mod population;
pub mod selector;
pub mod stats;
pub mod types;

pub use types::{UserRatingState, WordRatingState};

/// Rating assigned to a user on first use and after a history reset.
pub const DEFAULT_RATING: f64 = 1500.0;
