use dashmap::DashMap;
use std::sync::Arc;

use crate::models::SummaryStats;

/// Thread-safe cache for the summary statistics, keyed by the 600s bucket
/// the answer was computed in.
///
/// Backed by a DashMap so concurrent summary requests never block each
/// other. A cached answer is served until the current bucket rolls over, so
/// it can lag ingestion by at most one bucket; `peak_all_time` is carried
/// forward monotonically and never decreases across entries.
#[derive(Clone, Debug)]
pub struct SummaryCache {
    inner: Arc<DashMap<i64, SummaryStats>>,
}

impl SummaryCache {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
        }
    }

    /// Cached summary for the given bucket, if one was already computed.
    pub fn get(&self, bucket: i64) -> Option<SummaryStats> {
        self.inner.get(&bucket).map(|v| *v)
    }

    /// Store a freshly computed summary for `bucket`, dropping entries from
    /// older buckets. Returns the stored value with the monotonic peak
    /// applied.
    pub fn store(&self, bucket: i64, mut stats: SummaryStats) -> SummaryStats {
        let prior_peak = self
            .inner
            .iter()
            .map(|e| e.peak_all_time)
            .max()
            .unwrap_or(0);
        stats.peak_all_time = stats.peak_all_time.max(prior_peak);

        self.inner.retain(|k, _| *k == bucket);
        self.inner.insert(bucket, stats);
        stats
    }
}

impl Default for SummaryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(peak: i64, last: i64, total: i64) -> SummaryStats {
        SummaryStats {
            peak_all_time: peak,
            last_snapshot: last,
            total_unique: total,
        }
    }

    #[test]
    fn hit_and_miss_per_bucket() {
        let cache = SummaryCache::new();
        assert_eq!(cache.get(600), None);

        cache.store(600, stats(5, 3, 10));
        assert_eq!(cache.get(600), Some(stats(5, 3, 10)));
        assert_eq!(cache.get(1200), None);
    }

    #[test]
    fn peak_never_decreases_across_buckets() {
        let cache = SummaryCache::new();
        cache.store(600, stats(8, 8, 10));

        let stored = cache.store(1200, stats(3, 3, 12));
        assert_eq!(stored.peak_all_time, 8);
        assert_eq!(cache.get(1200), Some(stats(8, 3, 12)));
    }

    #[test]
    fn old_buckets_are_evicted() {
        let cache = SummaryCache::new();
        cache.store(600, stats(5, 5, 5));
        cache.store(1200, stats(6, 6, 6));
        assert_eq!(cache.get(600), None);
    }
}
