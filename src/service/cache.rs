use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::{
    domain::{AnnouncementRecord, Partition},
    search::SearchIndex,
};

/// Records of one partition as fetched at one point in time, with their index.
#[derive(Debug)]
pub struct PartitionSnapshot {
    pub partition: Partition,
    pub records: Vec<AnnouncementRecord>,
    pub index: SearchIndex,
    pub fetched_at: Instant,
}

impl PartitionSnapshot {
    pub fn new(partition: Partition, records: Vec<AnnouncementRecord>) -> Self {
        let index = SearchIndex::build(&records);
        Self {
            partition,
            records,
            index,
            fetched_at: Instant::now(),
        }
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// Upper bound on cached partitions unless configured otherwise.
pub const DEFAULT_MAX_ENTRIES: usize = 512;

/// Time-boxed cache of partition snapshots.
///
/// Snapshots are never mutated; a refresh replaces the `Arc`, so callers
/// holding an older snapshot keep a consistent view.
///
/// Every invalidation advances an epoch. A fill that read the store under an
/// older epoch is handed back to its caller but never stored, so a write that
/// lands between a fetch and its insert cannot be masked for a whole TTL.
pub struct PartitionCache {
    ttl: Duration,
    max_entries: usize,
    state: RwLock<CacheState>,
}

#[derive(Default)]
struct CacheState {
    epoch: u64,
    inserted: u64,
    entries: HashMap<Partition, CachedEntry>,
}

struct CachedEntry {
    order: u64,
    snapshot: Arc<PartitionSnapshot>,
}

impl PartitionCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, DEFAULT_MAX_ENTRIES)
    }

    pub fn with_capacity(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries: max_entries.max(1),
            state: RwLock::new(CacheState::default()),
        }
    }

    /// Returns the cached snapshot if it is younger than the TTL.
    pub async fn get(&self, partition: &Partition) -> Option<Arc<PartitionSnapshot>> {
        let state = self.state.read().await;
        state
            .entries
            .get(partition)
            .filter(|entry| entry.snapshot.is_fresh(self.ttl))
            .map(|entry| entry.snapshot.clone())
    }

    /// Epoch to read before fetching from the store; pass it to [`insert`](Self::insert).
    pub async fn epoch(&self) -> u64 {
        self.state.read().await.epoch
    }

    /// Stores a snapshot fetched under `epoch`. The snapshot is always returned;
    /// it is only kept when no invalidation happened since `epoch` was read.
    pub async fn insert(&self, snapshot: PartitionSnapshot, epoch: u64) -> Arc<PartitionSnapshot> {
        let snapshot = Arc::new(snapshot);
        let mut state = self.state.write().await;

        if state.epoch != epoch {
            tracing::debug!("Discarding snapshot for {} fetched before a write", snapshot.partition);
            return snapshot;
        }

        let ttl = self.ttl;
        state.entries.retain(|_, entry| entry.snapshot.is_fresh(ttl));

        if !state.entries.contains_key(&snapshot.partition) && state.entries.len() >= self.max_entries {
            let oldest = state
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.order)
                .map(|(partition, _)| partition.clone());
            if let Some(oldest) = oldest {
                state.entries.remove(&oldest);
            }
        }

        state.inserted += 1;
        let order = state.inserted;
        state.entries.insert(
            snapshot.partition.clone(),
            CachedEntry { order, snapshot: snapshot.clone() },
        );
        snapshot
    }

    pub async fn invalidate(&self, partition: &Partition) {
        let mut state = self.state.write().await;
        state.epoch += 1;
        if state.entries.remove(partition).is_some() {
            tracing::debug!("Invalidated cached snapshot for {}", partition);
        }
    }

    pub async fn invalidate_all(&self) {
        let mut state = self.state.write().await;
        state.epoch += 1;
        let dropped = state.entries.len();
        state.entries.clear();
        tracing::debug!("Dropped {} cached snapshots", dropped);
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partition() -> Partition {
        Partition::new("1ο Δημοτικό", "Β1")
    }

    #[tokio::test]
    async fn test_fresh_snapshot_is_served() {
        let cache = PartitionCache::new(Duration::from_secs(60));
        let inserted = cache.insert(PartitionSnapshot::new(partition(), vec![]), 0).await;

        let cached = cache.get(&partition()).await.unwrap();
        assert!(Arc::ptr_eq(&inserted, &cached));
    }

    #[tokio::test]
    async fn test_zero_ttl_never_serves() {
        let cache = PartitionCache::new(Duration::ZERO);
        cache.insert(PartitionSnapshot::new(partition(), vec![]), 0).await;

        assert!(cache.get(&partition()).await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate() {
        let cache = PartitionCache::new(Duration::from_secs(60));
        let other = Partition::new("1ο Δημοτικό", "Γ1");
        cache.insert(PartitionSnapshot::new(partition(), vec![]), 0).await;
        cache.insert(PartitionSnapshot::new(other.clone(), vec![]), 0).await;

        cache.invalidate(&partition()).await;
        assert!(cache.get(&partition()).await.is_none());
        assert!(cache.get(&other).await.is_some());

        cache.invalidate_all().await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_old_snapshot_survives_invalidation() {
        let cache = PartitionCache::new(Duration::from_secs(60));
        let held = cache.insert(PartitionSnapshot::new(partition(), vec![]), 0).await;

        cache.invalidate(&partition()).await;
        assert_eq!(held.partition, partition());
        assert!(held.index.is_empty());
    }

    #[tokio::test]
    async fn test_fill_started_before_invalidation_is_not_stored() {
        let cache = PartitionCache::new(Duration::from_secs(60));

        let epoch = cache.epoch().await;
        // A write lands while the reader is still fetching.
        cache.invalidate(&partition()).await;
        let returned = cache.insert(PartitionSnapshot::new(partition(), vec![]), epoch).await;

        assert_eq!(returned.partition, partition());
        assert!(cache.get(&partition()).await.is_none());

        let epoch = cache.epoch().await;
        cache.insert(PartitionSnapshot::new(partition(), vec![]), epoch).await;
        assert!(cache.get(&partition()).await.is_some());
    }

    #[tokio::test]
    async fn test_invalidate_all_advances_epoch() {
        let cache = PartitionCache::new(Duration::from_secs(60));
        let epoch = cache.epoch().await;

        cache.invalidate_all().await;
        cache.insert(PartitionSnapshot::new(partition(), vec![]), epoch).await;

        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_capacity_evicts_oldest() {
        let cache = PartitionCache::with_capacity(Duration::from_secs(60), 3);

        for i in 0..10 {
            let p = Partition::new("1ο Δημοτικό", &format!("Β{}", i));
            cache.insert(PartitionSnapshot::new(p, vec![]), 0).await;
        }

        assert_eq!(cache.len().await, 3);
        assert!(cache.get(&Partition::new("1ο Δημοτικό", "Β9")).await.is_some());
        assert!(cache.get(&Partition::new("1ο Δημοτικό", "Β0")).await.is_none());
    }

    #[tokio::test]
    async fn test_insert_sweeps_expired_entries() {
        let cache = PartitionCache::new(Duration::ZERO);

        for i in 0..5 {
            let p = Partition::new("1ο Δημοτικό", &format!("Γ{}", i));
            cache.insert(PartitionSnapshot::new(p, vec![]), 0).await;
        }

        assert_eq!(cache.len().await, 1);
    }
}
