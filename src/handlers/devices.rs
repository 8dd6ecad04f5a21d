use crate::{
    classify, db,
    error::ApiError,
    format,
    models::{DeviceRecord, DeviceRow},
    timeframe::unix_now,
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct DevicesQuery {
    limit: Option<i64>,
}

/// The one documented envelope for device lists — never a bare array.
#[derive(Serialize)]
pub struct DevicesResponse {
    devices: Vec<DeviceRecord>,
    count: usize,
}

/// GET /devices?limit=N
///
/// Every known device, most recently seen first, with the derived display
/// fields (liveness, signal band, type label, relative last-seen) attached.
/// `limit=0` is honored as an empty page; a negative limit means no limit.
pub async fn list_devices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DevicesQuery>,
) -> Result<Json<DevicesResponse>, ApiError> {
    let now = unix_now();
    let rows = db::get_devices(&state.db, query.limit.filter(|l| *l >= 0)).await?;

    let devices: Vec<DeviceRecord> = rows.into_iter().map(|row| to_record(row, now)).collect();
    let count = devices.len();

    Ok(Json(DevicesResponse { devices, count }))
}

/// GET /devices/:mac
pub async fn get_device(
    State(state): State<Arc<AppState>>,
    Path(mac): Path<String>,
) -> Result<Json<DeviceRecord>, ApiError> {
    // Sightings are stored normalized, so normalize the path too. An
    // un-normalizable MAC simply can't match anything.
    let lookup = classify::normalize_mac(&mac).unwrap_or_else(|| mac.to_ascii_lowercase());

    let row = db::get_device(&state.db, &lookup)
        .await?
        .ok_or(ApiError::DeviceNotFound)?;

    Ok(Json(to_record(row, unix_now())))
}

fn to_record(row: DeviceRow, now: i64) -> DeviceRecord {
    DeviceRecord {
        status: format::liveness(row.last_seen, now).as_str(),
        signal: format::signal_quality(row.latest_rssi).as_str(),
        type_label: row
            .device_type
            .as_deref()
            .map(format::device_type_label)
            .unwrap_or("—")
            .to_owned(),
        last_seen_display: format::format_last_seen(row.last_seen, now),
        mac: row.mac,
        first_seen: row.first_seen,
        last_seen: row.last_seen,
        sighting_count: row.sighting_count,
        best_rssi: row.best_rssi,
        latest_rssi: row.latest_rssi,
        vendor: row.vendor,
        device_type: row.device_type,
        device_brand: row.device_brand,
        is_random: row.is_random,
    }
}
