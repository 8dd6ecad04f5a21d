use crate::{
    aggregate, db,
    error::ApiError,
    models::{SummaryStats, TimeseriesPoint},
    timeframe::{unix_now, Timeframe, FINE_BUCKET_SEC},
    AppState,
};
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, sync::Arc};

/// Devices sighted within this many seconds count as "realtime".
const REALTIME_WINDOW_SEC: i64 = 60;

// ── Query / response types ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct TimeframeQuery {
    timeframe: Option<String>,
}

impl TimeframeQuery {
    /// An absent parameter means the default window; an unrecognized token
    /// is an error, never a silent default.
    fn parse(&self) -> Result<Timeframe, ApiError> {
        Timeframe::parse(self.timeframe.as_deref().unwrap_or("1h"))
    }
}

#[derive(Serialize)]
pub struct TimeseriesResponse {
    timeframe: &'static str,
    start_ts: i64,
    end_ts: i64,
    bucket_sec: i64,
    points: Vec<TimeseriesPoint>,
}

#[derive(Serialize)]
pub struct CountResponse {
    timeframe: &'static str,
    count: i64,
    start_ts: i64,
    end_ts: i64,
}

#[derive(Serialize)]
pub struct RealtimeDevice {
    mac: String,
    rssi: i64,
    timestamp: String,
    is_random: bool,
}

#[derive(Serialize)]
pub struct RealtimeResponse {
    unique_devices: usize,
    devices: Vec<RealtimeDevice>,
}

// ── Handlers ───────────────────────────────────────────────────────────────

/// GET /stats/devices_timeseries?timeframe=1h|6h|12h|1d|30d
///
/// Gap-free per-bucket distinct-device counts over the resolved window.
pub async fn devices_timeseries(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TimeframeQuery>,
) -> Result<Json<TimeseriesResponse>, ApiError> {
    let timeframe = query.parse()?;
    let window = timeframe.resolve(unix_now());

    let keys = db::sighting_keys_in(&state.db, window.start_ts, window.end_ts).await?;
    let points = aggregate::build_timeseries(&keys, &window);

    tracing::debug!(
        "devices_timeseries timeframe={} points={}",
        timeframe.as_str(),
        points.len()
    );

    Ok(Json(TimeseriesResponse {
        timeframe: timeframe.as_str(),
        start_ts: window.start_ts,
        end_ts: window.end_ts,
        bucket_sec: window.bucket_sec,
        points,
    }))
}

/// GET /stats/count?timeframe=1h|6h|12h|1d|30d
///
/// Distinct devices with a sighting in the window (both ends inclusive),
/// counted inside SQLite so a 30-day window stays a single scalar query.
/// An empty window is a count of zero, not an error.
pub async fn device_count(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TimeframeQuery>,
) -> Result<Json<CountResponse>, ApiError> {
    let timeframe = query.parse()?;
    let window = timeframe.resolve(unix_now());

    let count = db::distinct_in_range(&state.db, window.start_ts, window.end_ts).await?;

    Ok(Json(CountResponse {
        timeframe: timeframe.as_str(),
        count,
        start_ts: window.start_ts,
        end_ts: window.end_ts,
    }))
}

/// GET /stats/summary
///
/// Headline numbers: all-time peak per-bucket distinct count, distinct count
/// in the most recently completed bucket, and total distinct devices ever.
/// Answers are cached per current bucket; the peak is monotonic.
pub async fn summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SummaryStats>, ApiError> {
    let now = unix_now();
    let current_bucket = now / FINE_BUCKET_SEC * FINE_BUCKET_SEC;

    if let Some(cached) = state.summary_cache.get(current_bucket) {
        return Ok(Json(cached));
    }

    let peak_all_time = db::peak_bucket_count(&state.db, FINE_BUCKET_SEC).await?;
    let last_snapshot =
        db::distinct_in_bucket(&state.db, current_bucket - FINE_BUCKET_SEC, FINE_BUCKET_SEC)
            .await?;
    let total_unique = db::total_unique(&state.db).await?;

    let stats = state.summary_cache.store(
        current_bucket,
        SummaryStats {
            peak_all_time,
            last_snapshot,
            total_unique,
        },
    );

    Ok(Json(stats))
}

/// GET /stats/realtime
///
/// Snapshot of the last 60 seconds: one entry per distinct device, carrying
/// its most recent RSSI and an ISO-8601 UTC timestamp.
pub async fn realtime(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RealtimeResponse>, ApiError> {
    let now = unix_now();
    let rows = db::recent_sightings(&state.db, now - REALTIME_WINDOW_SEC).await?;

    // Rows come newest first, so the first hit per MAC is its latest sighting.
    let mut seen = HashSet::new();
    let mut devices = Vec::new();
    for row in rows {
        if !seen.insert(row.mac.clone()) {
            continue;
        }
        devices.push(RealtimeDevice {
            mac: row.mac,
            rssi: row.rssi.unwrap_or(0),
            timestamp: iso_utc(row.timestamp, now),
            is_random: row.is_random,
        });
    }

    Ok(Json(RealtimeResponse {
        unique_devices: devices.len(),
        devices,
    }))
}

/// ISO-8601 UTC ("%Y-%m-%dT%H:%M:%SZ") for a Unix timestamp, falling back to
/// `now` if the stored value is outside the representable range.
fn iso_utc(ts: i64, now: i64) -> String {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .or_else(|| DateTime::<Utc>::from_timestamp(now, 0))
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_formatting() {
        assert_eq!(iso_utc(0, 0), "1970-01-01T00:00:00Z");
        assert_eq!(iso_utc(1_700_000_000, 0), "2023-11-14T22:13:20Z");
    }

    #[test]
    fn missing_timeframe_defaults_to_one_hour() {
        let q = TimeframeQuery { timeframe: None };
        assert_eq!(q.parse().unwrap(), Timeframe::OneHour);
    }

    #[test]
    fn bad_timeframe_is_rejected() {
        let q = TimeframeQuery {
            timeframe: Some("10m".to_owned()),
        };
        assert!(matches!(q.parse(), Err(ApiError::InvalidTimeframe(_))));
    }
}
