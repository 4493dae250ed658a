use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rating::percentile::PercentileCutoffs;
use crate::store::keys;
use crate::store::{Store, StoreError};

/// Population cutoffs as published by the refresh worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CutoffSnapshot {
    pub version: u64,
    pub cutoffs: PercentileCutoffs,
    pub population: usize,
    pub computed_at: DateTime<Utc>,
}

impl Store {
    /// 最新的分位阈值快照；从未发布过时返回 None
    pub fn latest_cutoff_snapshot(&self) -> Result<Option<CutoffSnapshot>, StoreError> {
        match self
            .cutoff_snapshots
            .scan_prefix(keys::CUTOFF_SNAPSHOT_PREFIX.as_bytes())
            .next_back()
        {
            Some(item) => {
                let (_, value) = item?;
                Ok(Some(Self::deserialize(&value)?))
            }
            None => Ok(None),
        }
    }

    /// Append a new snapshot with the next version number.
    pub fn publish_cutoffs(
        &self,
        cutoffs: PercentileCutoffs,
        population: usize,
    ) -> Result<CutoffSnapshot, StoreError> {
        let version = self
            .latest_cutoff_snapshot()?
            .map(|latest| latest.version + 1)
            .unwrap_or(1);

        let snapshot = CutoffSnapshot {
            version,
            cutoffs,
            population,
            computed_at: Utc::now(),
        };
        let key = keys::cutoff_snapshot_key(version);

        let cas = self.cutoff_snapshots.compare_and_swap(
            key.as_bytes(),
            None::<&[u8]>,
            Some(Self::serialize(&snapshot)?),
        )?;
        if cas.is_err() {
            return Err(StoreError::Conflict {
                entity: "cutoff_snapshot".to_string(),
                key,
            });
        }

        Ok(snapshot)
    }

    /// Drop all but the newest `keep` snapshots.
    pub fn prune_cutoff_snapshots(&self, keep: usize) -> Result<usize, StoreError> {
        let keys: Vec<sled::IVec> = self
            .cutoff_snapshots
            .scan_prefix(keys::CUTOFF_SNAPSHOT_PREFIX.as_bytes())
            .keys()
            .collect::<Result<_, _>>()?;

        let excess = keys.len().saturating_sub(keep);
        let mut batch = sled::Batch::default();
        for key in keys.into_iter().take(excess) {
            batch.remove(key);
        }
        self.cutoff_snapshots.apply_batch(batch)?;
        Ok(excess)
    }
}
