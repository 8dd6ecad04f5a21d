//! Pure aggregation over the sighting log: bucketed distinct-device time
//! series. Plain-window distinct counts stay in SQL (`db::distinct_in_range`);
//! only bucketing needs the rows themselves. Every function here is a pure
//! query; repeated calls over an unchanged input yield identical output.

use std::collections::HashSet;

use crate::models::{SightingKey, TimeseriesPoint};
use crate::timeframe::TimeWindow;

/// Build the gap-free time series for `window`.
///
/// Each sighting lands in the bucket `floor((timestamp - start_ts) / bucket)`;
/// a bucket counts *distinct* MACs, not raw sightings. Buckets with no
/// sightings still appear with `count = 0` so callers can render a continuous
/// axis. Sightings outside `[start_ts, end_ts)` are ignored.
pub fn build_timeseries(sightings: &[SightingKey], window: &TimeWindow) -> Vec<TimeseriesPoint> {
    if window.bucket_sec <= 0 || window.end_ts <= window.start_ts {
        return Vec::new();
    }

    let span = window.end_ts - window.start_ts;
    let buckets = ((span + window.bucket_sec - 1) / window.bucket_sec) as usize;

    let mut seen: Vec<HashSet<&str>> = vec![HashSet::new(); buckets];
    for s in sightings {
        if s.timestamp < window.start_ts || s.timestamp >= window.end_ts {
            continue;
        }
        let idx = ((s.timestamp - window.start_ts) / window.bucket_sec) as usize;
        seen[idx].insert(s.mac.as_str());
    }

    seen.iter()
        .enumerate()
        .map(|(idx, macs)| TimeseriesPoint {
            t: window.start_ts + idx as i64 * window.bucket_sec,
            count: macs.len() as i64,
        })
        .collect()
}
