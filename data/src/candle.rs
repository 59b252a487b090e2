use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: CandleTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

impl Candle {
    pub fn new(time: impl Into<CandleTime>, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            time: time.into(),
            open,
            high,
            low,
            close,
            volume: 0.0,
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }

    /// Doji candles count as bullish.
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }
}

/// Ca/// Candle time as stored in fixtures: unix milliseconds or a free-form label.
///
/// Labels that parse as RFC 3339 resolve to a timestamp, any other label is
/// shown on the axis as written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CandleTime {
    Timestamp(i64),
    Label(String),
}

impl CandleTime {
    pub fn timestamp_ms(&self) -> Option<i64> {
        match self {
            CandleTime::Timestamp(ms) => Some(*ms),
            CandleTime::Label(raw) => DateTime::parse_from_rfc3339(raw.trim())
                .ok()
                .map(|dt| dt.timestamp_millis()),
        }
    }

    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        self.timestamp_ms().and_then(DateTime::from_timestamp_millis)
    }

    /// `HH:MM` in UTC, or the raw label when it is not a timestamp.
    pub fn axis_label(&self) -> String {
        match (self.datetime(), self) {
            (Some(dt), _) => dt.format("%H:%M").to_string(),
            (None, CandleTime::Label(raw)) => raw.trim().to_string(),
            (None, CandleTime::Timestamp(_)) => String::new(),
        }
    }
}

impl From<i64> for CandleTime {
    fn from(ms: i64) -> Self {
        CandleTime::Timestamp(ms)
    }
}

impl From<DateTime<Utc>> for CandleTime {
    fn from(dt: DateTime<Utc>) -> Self {
        CandleTime::Timestamp(dt.timestamp_millis())
    }
}

impl From<&str> for CandleTime {
    fn from(label: &str) -> Self {
        CandleTime::Label(label.to_string())
    }
}

impl From<String> for CandleTime {
    fn from(label: String) -> Self {
        CandleTime::Label(label)
    }
}

impl std::fmt::Display for CandleTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.datetime(), self) {
            (Some(dt), _) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M")),
            (None, CandleTime::Label(raw)) if !raw.trim().is_empty() => write!(f, "{}", raw.trim()),
            (None, _) => write!(f, "-"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_and_rfc3339_times() {
        let candles: Vec<Candle> = serde_json::from_str(
            r#"[
                {"time": 1700000000000, "open": 1, "high": 2, "low": 0.5, "close": 1.5, "volume": 10},
                {"time": "2024-01-15T09:30:00Z", "open": 1, "high": 2, "low": 0.5, "close": 0.8}
            ]"#,
        )
        .unwrap();

        assert_eq!(candles[0].time, CandleTime::Timestamp(1_700_000_000_000));
        assert_eq!(candles[1].volume, 0.0);
        assert_eq!(candles[1].time.axis_label(), "09:30");
        assert!(candles[0].is_bullish());
        assert!(!candles[1].is_bullish());
    }

    #[test]
    fn free_form_labels_are_kept_as_written() {
        let candles: Vec<Candle> = serde_json::from_str(
            r#"[
                {"time": "Mon", "open": 1, "high": 1, "low": 1, "close": 1},
                {"time": "2024-01-15 09:30", "open": 1, "high": 2, "low": 1, "close": 2}
            ]"#,
        )
        .unwrap();

        assert_eq!(candles[0].time, CandleTime::Label("Mon".to_string()));
        assert_eq!(candles[0].time.axis_label(), "Mon");
        assert_eq!(candles[0].time.timestamp_ms(), None);
        assert_eq!(candles[1].time.axis_label(), "2024-01-15 09:30");
        assert_eq!(candles[1].time.to_string(), "2024-01-15 09:30");
        assert!(candles[0].is_bullish());

        let json = serde_json::to_string(&candles[0]).unwrap();
        assert!(json.contains(r#""time":"Mon""#));
    }

    #[test]
    fn rfc3339_labels_resolve_to_timestamps() {
        let time = CandleTime::from("2024-01-15T09:30:00+01:00");

        assert_eq!(time.axis_label(), "08:30");
        assert_eq!(time.timestamp_ms(), Some(1_705_307_400_000));
    }
}
