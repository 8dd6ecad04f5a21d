use serde::Serialize;

/// The (mac, timestamp) projection of a sighting row, the only fields the
/// aggregation functions need.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SightingKey {
    pub mac: String,
    pub timestamp: i64,
}

/// A parsed, classified sighting ready to be appended to the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSighting {
    pub mac: String,
    pub rssi: Option<i64>,
    pub vendor: Option<String>,
    pub device_type: Option<String>,
    pub device_brand: Option<String>,
    pub is_random: bool,
    pub timestamp: i64,
}

/// A raw sighting row from the `sightings` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Sighting {
    pub mac: String,
    pub rssi: Option<i64>,
    pub is_random: bool,
    pub timestamp: i64,
}

/// Per-device state derived by grouping the sighting log on `mac`.
/// Classification fields come from the device's most recent sighting.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DeviceRow {
    pub mac: String,
    pub first_seen: i64,
    pub last_seen: i64,
    pub sighting_count: i64,
    pub best_rssi: Option<i64>,
    pub latest_rssi: Option<i64>,
    pub vendor: Option<String>,
    pub device_type: Option<String>,
    pub device_brand: Option<String>,
    pub is_random: bool,
}

/// A device as served to the presentation layer: the derived row plus the
/// display-contract fields (liveness, signal band, relative last-seen).
#[derive(Debug, Clone, Serialize)]
pub struct DeviceRecord {
    pub mac: String,
    pub first_seen: i64,
    pub last_seen: i64,
    pub sighting_count: i64,
    pub best_rssi: Option<i64>,
    pub latest_rssi: Option<i64>,
    pub vendor: Option<String>,
    pub device_type: Option<String>,
    pub device_brand: Option<String>,
    pub is_random: bool,
    pub status: &'static str,
    pub signal: &'static str,
    pub type_label: String,
    pub last_seen_display: String,
}

/// One time-series bucket: distinct devices sighted in `[t, t + bucket_sec)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeseriesPoint {
    pub t: i64,
    pub count: i64,
}

/// Headline numbers for the dashboard's top cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SummaryStats {
    pub peak_all_time: i64,
    pub last_snapshot: i64,
    pub total_unique: i64,
}
