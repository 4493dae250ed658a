use crate::store::operations::cutoffs::CutoffSnapshot;
use crate::store::{Store, StoreError};

/// 保留的历史快照数量
const SNAPSHOTS_KEPT: usize = 10;

/// Recompute cutoffs from the rated population and publish a new snapshot.
///
/// Returns `None` when the population is below `min_population` or the
/// quantiles collapse onto repeated ratings; the previous snapshot (or the
/// defaults) stays in effect.
pub fn refresh(store: &Store, min_population: usize) -> Result<Option<CutoffSnapshot>, StoreError> {
    let population = store.rated_population()?;
    let Some(cutoffs) = population.cutoffs(min_population) else {
        tracing::debug!(
            population = population.len(),
            min_population,
            "cutoffs_refresh: population too small"
        );
        return Ok(None);
    };

    if !cutoffs.is_ordered() {
        tracing::warn!(
            ?cutoffs,
            population = population.len(),
            "cutoffs_refresh: population cutoffs are not strictly increasing, keeping previous"
        );
        return Ok(None);
    }

    let snapshot = store.publish_cutoffs(cutoffs, population.len())?;
    let pruned = store.prune_cutoff_snapshots(SNAPSHOTS_KEPT)?;
    tracing::debug!(pruned, "cutoffs_refresh: old snapshots pruned");
    Ok(Some(snapshot))
}

pub async fn run(store: &Store, min_population: usize) {
    tracing::debug!("cutoffs_refresh: start");
    match refresh(store, min_population) {
        Ok(Some(snapshot)) => tracing::info!(
            version = snapshot.version,
            population = snapshot.population,
            "cutoffs_refresh: published"
        ),
        Ok(None) => tracing::info!("cutoffs_refresh: skipped"),
        Err(e) => tracing::error!(error = %e, "cutoffs_refresh failed"),
    }
}

#[cfg(test)]
mod tests {
    use crate::rating::percentile::{level_from_rating, PercentileCutoffs};
    use crate::rating::UserRatingState;
    use crate::services::standing::active_cutoffs;
    use crate::store::Store;

    use super::*;

    fn seed_user(store: &Store, user_id: &str, rating: f64) {
        let state = UserRatingState {
            rating,
            total_attempts: 1,
            successful_attempts: 1,
            recent_words: Vec::new(),
        };
        store.set_user_rating(user_id, &state).unwrap();
    }

    fn seed_users(store: &Store, count: usize) {
        for i in 0..count {
            seed_user(store, &format!("user{i}"), 1300.0 + i as f64 * 10.0);
        }
    }

    #[test]
    fn small_population_publishes_nothing() {
        let store = Store::temporary().unwrap();
        seed_users(&store, 5);
        assert!(refresh(&store, 20).unwrap().is_none());
        assert!(store.latest_cutoff_snapshot().unwrap().is_none());
    }

    #[test]
    fn users_without_attempts_are_not_counted() {
        let store = Store::temporary().unwrap();
        seed_users(&store, 19);
        store
            .set_user_rating("idle", &UserRatingState::default())
            .unwrap();
        assert!(refresh(&store, 20).unwrap().is_none());
    }

    #[test]
    fn publishes_population_quantiles() {
        let store = Store::temporary().unwrap();
        seed_users(&store, 21);

        let snapshot = refresh(&store, 20).unwrap().unwrap();
        assert_eq!(snapshot.version, 1);
        assert_eq!(snapshot.population, 21);
        // ratings 1300..=1500 step 10, position 0.10 * 20 = 2
        assert_eq!(snapshot.cutoffs.p10, 1320.0);
        assert!(snapshot.cutoffs.is_ordered());
    }

    #[test]
    fn keeps_a_bounded_number_of_snapshots() {
        let store = Store::temporary().unwrap();
        seed_users(&store, 20);
        for _ in 0..(SNAPSHOTS_KEPT + 3) {
            refresh(&store, 20).unwrap();
        }
        assert_eq!(store.cutoff_snapshots.len(), SNAPSHOTS_KEPT);
        assert_eq!(
            store.latest_cutoff_snapshot().unwrap().unwrap().version,
            (SNAPSHOTS_KEPT + 3) as u64
        );
    }

    #[test]
    fn repeated_ratings_keep_default_cutoffs() {
        // one attempt each: winners at 1516, losers at 1484
        let store = Store::temporary().unwrap();
        for i in 0..12 {
            seed_user(&store, &format!("loser{i}"), 1484.0);
        }
        for i in 0..8 {
            seed_user(&store, &format!("winner{i}"), 1516.0);
        }

        assert!(refresh(&store, 20).unwrap().is_none());
        assert!(store.latest_cutoff_snapshot().unwrap().is_none());

        let active = active_cutoffs(&store).unwrap();
        assert_eq!(active.version, 0);
        assert_eq!(active.cutoffs, PercentileCutoffs::default());
        assert!(active.cutoffs.is_ordered());
    }

    #[test]
    fn repeated_ratings_keep_previous_snapshot() {
        let store = Store::temporary().unwrap();
        seed_users(&store, 20);
        let published = refresh(&store, 20).unwrap().unwrap();

        for i in 0..20 {
            seed_user(&store, &format!("user{i}"), 1484.0 + (i % 2) as f64 * 32.0);
        }
        assert!(refresh(&store, 20).unwrap().is_none());

        let active = active_cutoffs(&store).unwrap();
        assert_eq!(active.version, published.version);
        assert_eq!(active.cutoffs, published.cutoffs);
        // every level stays reachable
        let levels: std::collections::BTreeSet<u8> = (1000..2000)
            .step_by(5)
            .map(|r| level_from_rating(r as f64, Some(&active.cutoffs)))
            .collect();
        assert_eq!(levels.len(), 7);
    }
}
