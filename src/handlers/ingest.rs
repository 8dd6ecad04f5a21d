use crate::{classify, db, error::ApiError, models::NewSighting, timeframe::unix_now, AppState};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

// ── Wire types ─────────────────────────────────────────────────────────────

/// One sighting as sent by the scanner: `m` MAC, `r` (or legacy `s`) RSSI,
/// `t` Unix seconds, `x` randomization flag, optional vendor string.
#[derive(Debug, Deserialize)]
pub struct RawSighting {
    m: Option<String>,
    r: Option<i64>,
    s: Option<i64>,
    t: Option<i64>,
    x: Option<i64>,
    vendor: Option<String>,
}

/// Both payload shapes scanners emit: a bare array of sightings, or an
/// envelope whose root timestamp applies to items that carry none.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum IngestPayload {
    Batch(Vec<RawSighting>),
    Envelope {
        t: Option<i64>,
        d: Vec<RawSighting>,
        #[allow(dead_code)]
        c: Option<i64>,
    },
}

#[derive(Serialize)]
pub struct IngestResponse {
    accepted: usize,
    skipped: usize,
}

// ── Handlers ───────────────────────────────────────────────────────────────

/// POST /ingest
///
/// Parse, classify and append a batch of sightings. A malformed item is
/// skipped and logged; it never fails the batch.
pub async fn ingest(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<IngestPayload>,
) -> Result<Json<IngestResponse>, ApiError> {
    let now = unix_now();
    let (root_ts, items) = match payload {
        IngestPayload::Batch(items) => (None, items),
        IngestPayload::Envelope { t, d, .. } => (t, d),
    };

    let total = items.len();
    let mut accepted = Vec::with_capacity(total);
    for raw in items {
        match parse_item(raw, root_ts, now) {
            Some(sighting) => accepted.push(sighting),
            None => tracing::warn!("skipping malformed sighting (missing or invalid MAC)"),
        }
    }
    let skipped = total - accepted.len();

    db::insert_sightings(&state.db, &accepted).await?;
    tracing::info!("ingested {} sighting(s), skipped {}", accepted.len(), skipped);

    Ok(Json(IngestResponse {
        accepted: accepted.len(),
        skipped,
    }))
}

/// POST /clear — development only: truncate the sighting log.
pub async fn clear(State(state): State<Arc<AppState>>) -> Result<Json<serde_json::Value>, ApiError> {
    let removed = db::clear(&state.db).await?;
    tracing::warn!("sighting log cleared ({} row(s) removed)", removed);
    Ok(Json(json!({ "status": "cleared" })))
}

// ── Parsing ────────────────────────────────────────────────────────────────

/// Turn one wire item into a classified sighting. RSSI falls back from `r`
/// to legacy `s`; the timestamp falls back from the item to the envelope
/// root, then to `now`. Returns `None` when the MAC is missing or invalid.
fn parse_item(raw: RawSighting, root_ts: Option<i64>, now: i64) -> Option<NewSighting> {
    let mac_raw = raw.m.filter(|m| !m.is_empty())?;
    let mac = classify::normalize_mac(&mac_raw)?;

    let rssi = raw.r.or(raw.s);

    let mut timestamp = raw.t.or(root_ts).unwrap_or(0);
    if timestamp <= 0 {
        timestamp = now;
    }

    let scanner_flag = raw.x.map(|x| x != 0);
    let cls = classify::classify(&mac, raw.vendor.as_deref(), scanner_flag);

    Some(NewSighting {
        mac: cls.mac,
        rssi,
        vendor: cls.vendor,
        device_type: Some(cls.device_type),
        device_brand: cls.device_brand,
        is_random: cls.is_random,
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn raw(json: &str) -> RawSighting {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn accepts_bare_array_payload() {
        let payload: IngestPayload =
            serde_json::from_str(r#"[{"m":"aa:bb:cc:dd:ee:ff","r":-63,"t":1700000000,"x":0}]"#)
                .unwrap();
        assert!(matches!(payload, IngestPayload::Batch(items) if items.len() == 1));
    }

    #[test]
    fn accepts_envelope_payload() {
        let payload: IngestPayload = serde_json::from_str(
            r#"{"t":1700000000,"d":[{"m":"aa:bb:cc:dd:ee:ff","r":-63},{"m":"02:00:00:11:22:33","s":-71}],"c":2}"#,
        )
        .unwrap();
        match payload {
            IngestPayload::Envelope { t, d, .. } => {
                assert_eq!(t, Some(1_700_000_000));
                assert_eq!(d.len(), 2);
            }
            IngestPayload::Batch(_) => panic!("parsed envelope as batch"),
        }
    }

    #[test]
    fn rssi_falls_back_to_legacy_field() {
        let parsed = parse_item(raw(r#"{"m":"aa:bb:cc:dd:ee:ff","s":-71}"#), None, NOW).unwrap();
        assert_eq!(parsed.rssi, Some(-71));

        let parsed =
            parse_item(raw(r#"{"m":"aa:bb:cc:dd:ee:ff","r":-63,"s":-71}"#), None, NOW).unwrap();
        assert_eq!(parsed.rssi, Some(-63));
    }

    #[test]
    fn timestamp_falls_back_to_root_then_now() {
        let item = r#"{"m":"aa:bb:cc:dd:ee:ff","r":-63}"#;
        assert_eq!(parse_item(raw(item), Some(123), NOW).unwrap().timestamp, 123);
        assert_eq!(parse_item(raw(item), None, NOW).unwrap().timestamp, NOW);

        // Zero/negative timestamps are treated as absent
        let item = r#"{"m":"aa:bb:cc:dd:ee:ff","r":-63,"t":0}"#;
        assert_eq!(parse_item(raw(item), None, NOW).unwrap().timestamp, NOW);
    }

    #[test]
    fn malformed_items_are_skipped_not_fatal() {
        assert!(parse_item(raw(r#"{"r":-63}"#), None, NOW).is_none());
        assert!(parse_item(raw(r#"{"m":"","r":-63}"#), None, NOW).is_none());
        assert!(parse_item(raw(r#"{"m":"nonsense","r":-63}"#), None, NOW).is_none());
    }

    #[test]
    fn items_are_classified_on_ingest() {
        let parsed = parse_item(
            raw(r#"{"m":"02:00:00:11:22:33","r":-63}"#),
            None,
            NOW,
        )
        .unwrap();
        assert!(parsed.is_random);
        assert_eq!(parsed.device_type.as_deref(), Some("smartphone"));

        let parsed = parse_item(
            raw(r#"{"m":"00:1a:2b:3c:4d:5e","r":-63,"x":0,"vendor":"Apple, Inc."}"#),
            None,
            NOW,
        )
        .unwrap();
        assert_eq!(parsed.vendor.as_deref(), Some("Apple"));
        assert_eq!(parsed.device_type.as_deref(), Some("smartphone"));
        assert_eq!(parsed.device_brand.as_deref(), Some("apple"));
    }
}
