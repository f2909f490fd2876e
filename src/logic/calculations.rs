use crate::models::{DailyWeather, FieldSnapshot, WeatherReading};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::BTreeMap;

/// Total forecast rainfall (mm) for points at or before `snapshot_timestamp + hours`.
/// Zero when the snapshot carries no forecast.
pub fn forecast_rainfall_within(snapshot: &FieldSnapshot, hours: i64) -> f64 {
    snapshot
        .weather
        .as_ref()
        .map(|w| {
            w.points_within(snapshot.snapshot_timestamp, hours)
                .iter()
                .map(|p| p.rainfall_mm)
                .filter(|mm| *mm >= 0.0)
                .sum()
        })
        .unwrap_or(0.0)
}

/// Aggregate observed readings into one record per whole UTC day, oldest
/// first. The window is the `days` calendar days before `end`'s date, so
/// the partial current day never counts. Days without readings are skipped.
pub fn daily_history(readings: &[WeatherReading], end: DateTime<Utc>, days: u32) -> Vec<DailyWeather> {
    let last = end.date_naive() - Duration::days(1);
    let first = end.date_naive() - Duration::days(days as i64);

    let mut by_date: BTreeMap<NaiveDate, Vec<&WeatherReading>> = BTreeMap::new();
    for reading in readings {
        let date = reading.timestamp.date_naive();
        if date >= first && date <= last {
            by_date.entry(date).or_default().push(reading);
        }
    }

    by_date
        .into_iter()
        .map(|(date, points)| aggregate_day(date, &points))
        .collect()
}

fn aggregate_day(date: NaiveDate, points: &[&WeatherReading]) -> DailyWeather {
    let temp_max = points
        .iter()
        .map(|p| p.temp_c)
        .fold(f64::NEG_INFINITY, f64::max);
    let temp_min = points
        .iter()
        .map(|p| p.temp_c)
        .fold(f64::INFINITY, f64::min);
    let rain = points
        .iter()
        .map(|p| p.rainfall_mm)
        .filter(|mm| *mm >= 0.0)
        .sum();
    let humidity =
        points.iter().map(|p| p.humidity_pct).sum::<f64>() / points.len().max(1) as f64;

    DailyWeather {
        date,
        temp_max,
        temp_min,
        rain,
        humidity,
    }
}

/// Observed rain for the last seven days, only when a full week is known
pub fn recent_rain(history: &[DailyWeather]) -> Option<Vec<f64>> {
    if history.len() < 7 {
        return None;
    }
    Some(history[history.len() - 7..].iter().map(|d| d.rain).collect())
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
