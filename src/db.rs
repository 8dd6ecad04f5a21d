use crate::models::{DeviceRow, NewSighting, Sighting, SightingKey};
use sqlx::SqlitePool;

// ── Ingestion ──────────────────────────────────────────────────────────────

/// Append a batch of sightings in a single transaction so a partial batch
/// never becomes visible to concurrent queries.
pub async fn insert_sightings(
    pool: &SqlitePool,
    sightings: &[NewSighting],
) -> Result<(), sqlx::Error> {
    if sightings.is_empty() {
        return Ok(());
    }

    let mut tx = pool.begin().await?;
    for s in sightings {
        sqlx::query(
            "INSERT INTO sightings (mac, rssi, vendor, device_type, device_brand, is_random, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&s.mac)
        .bind(s.rssi)
        .bind(&s.vendor)
        .bind(&s.device_type)
        .bind(&s.device_brand)
        .bind(s.is_random)
        .bind(s.timestamp)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    Ok(())
}

// ── Range queries ──────────────────────────────────────────────────────────

/// (mac, timestamp) pairs with `start_ts <= timestamp < end_ts`, for the
/// time-series builder.
pub async fn sighting_keys_in(
    pool: &SqlitePool,
    start_ts: i64,
    end_ts: i64,
) -> Result<Vec<SightingKey>, sqlx::Error> {
    sqlx::query_as(
        "SELECT mac, timestamp FROM sightings
         WHERE timestamp >= ?1 AND timestamp < ?2",
    )
    .bind(start_ts)
    .bind(end_ts)
    .fetch_all(pool)
    .await
}

/// Distinct MACs with `start_ts <= timestamp <= end_ts` (both ends
/// inclusive), for the unique-count query. Counting stays in SQLite so a
/// 30-day window never materializes a month of rows.
pub async fn distinct_in_range(
    pool: &SqlitePool,
    start_ts: i64,
    end_ts: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT COUNT(DISTINCT mac) FROM sightings
         WHERE timestamp >= ?1 AND timestamp <= ?2",
    )
    .bind(start_ts)
    .bind(end_ts)
    .fetch_one(pool)
    .await
}

/// Full sighting rows since `cutoff_ts`, newest first, for the realtime
/// snapshot.
pub async fn recent_sightings(
    pool: &SqlitePool,
    cutoff_ts: i64,
) -> Result<Vec<Sighting>, sqlx::Error> {
    sqlx::query_as(
        "SELECT mac, rssi, is_random, timestamp FROM sightings
         WHERE timestamp >= ?1
         ORDER BY timestamp DESC",
    )
    .bind(cutoff_ts)
    .fetch_all(pool)
    .await
}

// ── Summary ────────────────────────────────────────────────────────────────

/// Distinct MACs across the entire sighting history.
pub async fn total_unique(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(DISTINCT mac) FROM sightings")
        .fetch_one(pool)
        .await
}

/// Maximum distinct-MAC count over all historical buckets of `bucket_sec`
/// width. Zero when the log is empty.
pub async fn peak_bucket_count(pool: &SqlitePool, bucket_sec: i64) -> Result<i64, sqlx::Error> {
    let peak: Option<i64> = sqlx::query_scalar(
        "SELECT MAX(c) FROM (
             SELECT COUNT(DISTINCT mac) AS c
             FROM sightings
             GROUP BY timestamp / ?1
         )",
    )
    .bind(bucket_sec)
    .fetch_one(pool)
    .await?;

    Ok(peak.unwrap_or(0))
}

/// Distinct MACs sighted in `[bucket_start, bucket_start + bucket_sec)`.
pub async fn distinct_in_bucket(
    pool: &SqlitePool,
    bucket_start: i64,
    bucket_sec: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT COUNT(DISTINCT mac) FROM sightings
         WHERE timestamp >= ?1 AND timestamp < ?2",
    )
    .bind(bucket_start)
    .bind(bucket_start + bucket_sec)
    .fetch_one(pool)
    .await
}

// ── Devices ────────────────────────────────────────────────────────────────

/// Derive one row per unique MAC from the sighting log, most recently seen
/// first. Classification fields come from the device's latest sighting
/// (highest rowid, which matches ingestion order for an append-only log).
pub async fn get_devices(
    pool: &SqlitePool,
    limit: Option<i64>,
) -> Result<Vec<DeviceRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT g.mac,
                g.first_seen,
                g.last_seen,
                g.sighting_count,
                g.best_rssi,
                l.rssi AS latest_rssi,
                l.vendor,
                l.device_type,
                l.device_brand,
                l.is_random
         FROM (
             SELECT mac,
                    MIN(timestamp) AS first_seen,
                    MAX(timestamp) AS last_seen,
                    COUNT(*)       AS sighting_count,
                    MAX(rssi)      AS best_rssi,
                    MAX(id)        AS latest_id
             FROM sightings
             GROUP BY mac
         ) g
         JOIN sightings l ON l.id = g.latest_id
         ORDER BY g.last_seen DESC
         LIMIT ?1",
    )
    .bind(limit.unwrap_or(-1)) // SQLite: LIMIT -1 means no limit
    .fetch_all(pool)
    .await
}

/// Derived record for a single MAC, or `None` if it was never sighted.
pub async fn get_device(pool: &SqlitePool, mac: &str) -> Result<Option<DeviceRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT g.mac,
                g.first_seen,
                g.last_seen,
                g.sighting_count,
                g.best_rssi,
                l.rssi AS latest_rssi,
                l.vendor,
                l.device_type,
                l.device_brand,
                l.is_random
         FROM (
             SELECT mac,
                    MIN(timestamp) AS first_seen,
                    MAX(timestamp) AS last_seen,
                    COUNT(*)       AS sighting_count,
                    MAX(rssi)      AS best_rssi,
                    MAX(id)        AS latest_id
             FROM sightings
             WHERE mac = ?1
             GROUP BY mac
         ) g
         JOIN sightings l ON l.id = g.latest_id",
    )
    .bind(mac)
    .fetch_optional(pool)
    .await
}

/// Truncate the sighting log (development only).
pub async fn clear(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
    let affected = sqlx::query("DELETE FROM sightings")
        .execute(pool)
        .await?
        .rows_affected();

    Ok(affected)
}
