use super::snapshot::FieldSnapshot;
use super::weather::{DailyWeather, WeatherReading};
use crate::logic::calculations::daily_history;
use serde::{Deserialize, Serialize};

/// Days of observed history handed to the rainfall model
pub const HISTORY_DAYS: u32 = 7;

/// Everything needed for one recommendation: the snapshot plus the observed
/// weather the learned forecaster reads.
///
/// History can be supplied pre-aggregated (`daily_history`) or as raw
/// readings (`weather_history`); daily records win when both are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub snapshot: FieldSnapshot,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub daily_history: Vec<DailyWeather>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weather_history: Vec<WeatherReading>,
}

impl RecommendationRequest {
    pub fn new(snapshot: FieldSnapshot) -> Self {
        Self {
            snapshot,
            daily_history: Vec::new(),
            weather_history: Vec::new(),
        }
    }

    /// Daily history for the whole days before the snapshot, oldest first
    pub fn history(&self) -> Vec<DailyWeather> {
        if !self.daily_history.is_empty() {
            let mut days = self.daily_history.clone();
            days.sort_by_key(|d| d.date);
            return days;
        }
        daily_history(
            &self.weather_history,
            self.snapshot.snapshot_timestamp,
            HISTORY_DAYS,
        )
    }
}
