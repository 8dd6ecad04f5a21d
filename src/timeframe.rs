use crate::error::ApiError;

/// Current Unix time in seconds.
pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Finest aggregation granularity. Summary statistics (peak, last snapshot)
/// are always computed at this bucket width.
pub const FINE_BUCKET_SEC: i64 = 600;

/// Bucket width used for the 30-day timeframe.
pub const DAY_BUCKET_SEC: i64 = 86_400;

/// A named lookback window. This is the single canonical token set for every
/// timeframe-taking endpoint; an unknown token is rejected, never defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    OneHour,
    SixHours,
    TwelveHours,
    OneDay,
    ThirtyDays,
}

/// Concrete window a timeframe resolves to at some instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start_ts: i64,
    pub end_ts: i64,
    pub bucket_sec: i64,
}

impl Timeframe {
    /// Parse a timeframe token (`1h|6h|12h|1d|30d`, case-insensitive).
    pub fn parse(token: &str) -> Result<Self, ApiError> {
        match token.trim().to_ascii_lowercase().as_str() {
            "1h" => Ok(Self::OneHour),
            "6h" => Ok(Self::SixHours),
            "12h" => Ok(Self::TwelveHours),
            "1d" => Ok(Self::OneDay),
            "30d" => Ok(Self::ThirtyDays),
            other => Err(ApiError::InvalidTimeframe(other.to_owned())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneHour => "1h",
            Self::SixHours => "6h",
            Self::TwelveHours => "12h",
            Self::OneDay => "1d",
            Self::ThirtyDays => "30d",
        }
    }

    /// Lookback duration in seconds.
    pub fn duration_sec(&self) -> i64 {
        match self {
            Self::OneHour => 3_600,
            Self::SixHours => 21_600,
            Self::TwelveHours => 43_200,
            Self::OneDay => 86_400,
            Self::ThirtyDays => 2_592_000,
        }
    }

    /// Bucket width for the time-series view of this timeframe.
    pub fn bucket_sec(&self) -> i64 {
        match self {
            Self::ThirtyDays => DAY_BUCKET_SEC,
            _ => FINE_BUCKET_SEC,
        }
    }

    /// Resolve to a concrete window ending at `now`.
    pub fn resolve(&self, now: i64) -> TimeWindow {
        TimeWindow {
            start_ts: now - self.duration_sec(),
            end_ts: now,
            bucket_sec: self.bucket_sec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_canonical_token() {
        for (token, duration, bucket) in [
            ("1h", 3_600, 600),
            ("6h", 21_600, 600),
            ("12h", 43_200, 600),
            ("1d", 86_400, 600),
            ("30d", 2_592_000, 86_400),
        ] {
            let tf = Timeframe::parse(token).unwrap();
            assert_eq!(tf.as_str(), token);
            assert_eq!(tf.duration_sec(), duration);
            assert_eq!(tf.bucket_sec(), bucket);
        }
    }

    #[test]
    fn parse_is_case_insensitive_and_trims() {
        assert_eq!(Timeframe::parse(" 1H ").unwrap(), Timeframe::OneHour);
        assert_eq!(Timeframe::parse("30D").unwrap(), Timeframe::ThirtyDays);
    }

    #[test]
    fn unknown_token_is_rejected() {
        for token in ["10m", "30m", "2h", "", "forever"] {
            assert!(matches!(
                Timeframe::parse(token),
                Err(ApiError::InvalidTimeframe(_))
            ));
        }
    }

    #[test]
    fn resolve_anchors_window_at_now() {
        let w = Timeframe::OneDay.resolve(1_700_000_000);
        assert_eq!(w.end_ts, 1_700_000_000);
        assert_eq!(w.start_ts, 1_700_000_000 - 86_400);
        assert_eq!(w.bucket_sec, 600);
    }
}
