//! Usage time-series for the resource cards.
//!
//! Cards carry their series as a raw JSON string (`{"dates": [...],
//! "values": [...]}`). Parsing is tolerant: anything malformed or empty
//! falls back to a deterministic synthetic series so the card still renders
//! a chart.

use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TimeSeries {
    pub dates: Vec<String>,
    pub values: Vec<f64>,
}

/// Parse an embedded series. Returns `None` for missing, malformed, or empty
/// payloads; mismatched lengths are truncated to the shorter side.
pub fn parse_embedded_series(raw: Option<&str>) -> Option<TimeSeries> {
    let raw = raw?;
    let mut series: TimeSeries = serde_json::from_str(raw).ok()?;
    let len = series.dates.len().min(series.values.len());
    if len == 0 {
        return None;
    }
    series.dates.truncate(len);
    series.values.truncate(len);
    Some(series)
}

const SYNTHETIC_POINTS: usize = 30;

fn fnv1a(input: &str) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in input.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

/// Deterministic pseudo-random walk seeded from the card key, so a card with
/// broken embedded data always shows the same stand-in chart.
pub fn synthetic_series(key: &str) -> TimeSeries {
    let mut state = fnv1a(key) | 1;
    let mut value = 40.0 + (state % 30) as f64;
    let mut dates = Vec::with_capacity(SYNTHETIC_POINTS);
    let mut values = Vec::with_capacity(SYNTHETIC_POINTS);
    for day in 0..SYNTHETIC_POINTS {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let step = ((state >> 33) % 11) as f64 - 5.0;
        value = (value + step).clamp(5.0, 95.0);
        dates.push(format!("day-{:02}", day + 1));
        values.push((value * 10.0).round() / 10.0);
    }
    TimeSeries { dates, values }
}

pub const CHART_WIDTH: f64 = 280.0;
pub const CHART_HEIGHT: f64 = 80.0;

/// Everything the card chart needs, computed once per card and cached.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartModel {
    /// `points` attribute for the SVG polyline.
    pub polyline: String,
    pub min_label: String,
    pub max_label: String,
    pub first_date: String,
    pub last_date: String,
    pub synthetic: bool,
}

pub fn build_chart(card_key: &str, raw_series: Option<&str>) -> ChartModel {
    let (series, synthetic) = match parse_embedded_series(raw_series) {
        Some(series) => (series, false),
        None => (synthetic_series(card_key), true),
    };

    let min = series.values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = series
        .values
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let span = if (max - min).abs() < f64::EPSILON {
        1.0
    } else {
        max - min
    };

    let count = series.values.len();
    let x_step = if count > 1 {
        CHART_WIDTH / (count - 1) as f64
    } else {
        0.0
    };
    let mut polyline = String::new();
    for (i, value) in series.values.iter().enumerate() {
        let x = x_step * i as f64;
        let y = CHART_HEIGHT - ((value - min) / span) * CHART_HEIGHT;
        if i > 0 {
            polyline.push(' ');
        }
        polyline.push_str(&format!("{x:.1},{y:.1}"));
    }

    ChartModel {
        polyline,
        min_label: format!("{min:.1}"),
        max_label: format!("{max:.1}"),
        first_date: series.dates.first().cloned().unwrap_or_default(),
        last_date: series.dates.last().cloned().unwrap_or_default(),
        synthetic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_embedded_series() {
        let raw = r#"{"dates": ["2026-07-01", "2026-07-02"], "values": [1.5, 2.5]}"#;
        let series = parse_embedded_series(Some(raw)).expect("series");
        assert_eq!(series.dates.len(), 2);
        assert_eq!(series.values, vec![1.5, 2.5]);
    }

    #[test]
    fn mismatched_lengths_truncate() {
        let raw = r#"{"dates": ["a", "b", "c"], "values": [1.0, 2.0]}"#;
        let series = parse_embedded_series(Some(raw)).expect("series");
        assert_eq!(series.dates.len(), 2);
    }

    #[test]
    fn malformed_json_falls_back_to_synthetic() {
        let chart = build_chart("vm-1", Some("{not json"));
        assert!(chart.synthetic);
        assert!(!chart.polyline.is_empty());
    }

    #[test]
    fn synthetic_series_is_deterministic() {
        assert_eq!(synthetic_series("vm-1"), synthetic_series("vm-1"));
        assert_ne!(
            synthetic_series("vm-1").values,
            synthetic_series("vm-2").values
        );
    }

    #[test]
    fn flat_series_stays_in_bounds() {
        let raw = r#"{"dates": ["a", "b"], "values": [3.0, 3.0]}"#;
        let chart = build_chart("vm-1", Some(raw));
        for pair in chart.polyline.split(' ') {
            let (_, y) = pair.split_once(',').expect("pair");
            let y: f64 = y.parse().expect("y");
            assert!((0.0..=CHART_HEIGHT).contains(&y));
        }
    }
}
