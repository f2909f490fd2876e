use crate::logic::calculations::round2;
use crate::models::FieldSnapshot;

const BASE: f64 = 0.6;
const SENSOR_BONUS: f64 = 0.1;
const SENSOR_PENALTY: f64 = 0.2;
const WEATHER_BONUS: f64 = 0.1;
const IMAGE_BONUS: f64 = 0.1;

/// Heuristic data-completeness score.
///
/// Reflects which inputs were present, nothing more. It is not a calibrated
/// probability and callers must not treat it as one.
#[derive(Debug, Clone, PartialEq)]
pub struct Completeness {
    pub score: f64,
    pub notes: Vec<String>,
}

pub fn assess(snapshot: &FieldSnapshot) -> Completeness {
    let mut score = BASE;
    let mut notes = Vec::new();

    if snapshot.sensor_reading.is_some() {
        score += SENSOR_BONUS;
    } else {
        score -= SENSOR_PENALTY;
        notes.push("Missing sensor readings reduced confidence.".to_string());
    }

    if snapshot.weather.is_some() {
        score += WEATHER_BONUS;
    } else {
        notes.push("Missing weather data (past 24h).".to_string());
    }

    if snapshot.has_images {
        score += IMAGE_BONUS;
    }

    Completeness {
        score: round2(score.clamp(0.0, 1.0)),
        notes,
    }
}
