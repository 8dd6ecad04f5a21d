//! Display contract consumed by the presentation layer: liveness
//! classification, RSSI quality banding, relative last-seen formatting and
//! device-type labels.

use chrono::{DateTime, Utc};

/// A device is online if it was sighted less than this many seconds ago.
/// Fixed policy constant, not configurable.
pub const ONLINE_WINDOW_SEC: i64 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Online,
    Offline,
    Unknown,
}

impl Liveness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Unknown => "unknown",
        }
    }
}

/// Classify a device's liveness from its last-seen timestamp.
/// Zero or negative means the timestamp was never recorded.
pub fn liveness(last_seen: i64, now: i64) -> Liveness {
    if last_seen <= 0 {
        Liveness::Unknown
    } else if now - last_seen < ONLINE_WINDOW_SEC {
        Liveness::Online
    } else {
        Liveness::Offline
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalQuality {
    Excellent,
    Good,
    Fair,
    Poor,
    Unknown,
}

impl SignalQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
            Self::Unknown => "unknown",
        }
    }
}

/// Band an RSSI reading (dBm) into a display quality class.
pub fn signal_quality(rssi: Option<i64>) -> SignalQuality {
    match rssi {
        None => SignalQuality::Unknown,
        Some(r) if r >= -50 => SignalQuality::Excellent,
        Some(r) if r >= -60 => SignalQuality::Good,
        Some(r) if r >= -70 => SignalQuality::Fair,
        Some(_) => SignalQuality::Poor,
    }
}

/// Human-readable "how long ago" for a last-seen timestamp: seconds below a
/// minute, minutes below an hour, hours below a day, then an absolute UTC
/// date. Missing timestamps render as a placeholder, never an error.
pub fn format_last_seen(last_seen: i64, now: i64) -> String {
    if last_seen <= 0 {
        return "—".to_owned();
    }

    let diff = (now - last_seen).max(0);
    if diff < 60 {
        format!("{diff}s ago")
    } else if diff < 3_600 {
        format!("{}m ago", diff / 60)
    } else if diff < 86_400 {
        format!("{}h ago", diff / 3_600)
    } else {
        match DateTime::<Utc>::from_timestamp(last_seen, 0) {
            Some(dt) => dt.format("%d.%m.%Y %H:%M").to_string(),
            None => "—".to_owned(),
        }
    }
}

/// Display label for a device type. The vocabulary is closed; anything
/// outside it passes through as its raw string.
pub fn device_type_label(device_type: &str) -> &str {
    match device_type {
        "smartphone" => "Smartphone",
        "tablet" => "Tablet",
        "laptop" => "Laptop",
        "smartwatch" => "Watch",
        "iot" => "IoT",
        "other" => "Other",
        raw => raw,
    }
}
