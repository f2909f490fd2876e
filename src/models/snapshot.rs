use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Last known soil sample for a field.
///
/// Moisture is volumetric percent, N/P/K are available nutrients in kg/ha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub moisture: f64,
    pub ph: f64,
    pub n: f64,
    pub p: f64,
    pub k: f64,
}

impl SensorReading {
    pub fn new(moisture: f64, ph: f64, n: f64, p: f64, k: f64) -> Self {
        Self {
            moisture,
            ph,
            n,
            p,
            k,
        }
    }
}

/// Most recent observed conditions at the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub timestamp: DateTime<Utc>,
    pub temp_c: f64,
    pub humidity_pct: f64,
}

/// A single point of the live API forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub timestamp: DateTime<Utc>,
    pub rainfall_mm: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity_pct: Option<f64>,
}

impl ForecastPoint {
    pub fn new(timestamp: DateTime<Utc>, rainfall_mm: f64) -> Self {
        Self {
            timestamp,
            rainfall_mm,
            temp_c: None,
            humidity_pct: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherSummary {
    #[serde(default)]
    pub current: Option<CurrentWeather>,
    #[serde(default)]
    pub rainfall_last_24h: f64,
    /// Ordered by timestamp, as delivered by the weather API
    #[serde(default)]
    pub forecast_points: Vec<ForecastPoint>,
}

impl WeatherSummary {
    /// Points falling on or before `now + hours`
    pub fn points_within(&self, now: DateTime<Utc>, hours: i64) -> Vec<&ForecastPoint> {
        let cutoff = now + Duration::hours(hours);
        self.forecast_points
            .iter()
            .filter(|p| p.timestamp <= cutoff)
            .collect()
    }
}

/// Point-in-time bundle of everything known about one field.
///
/// `snapshot_timestamp` is the reference "now" for every forward-looking
/// window. Crop and growth stage are lower-cased on construction and on
/// deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSnapshot {
    pub field_id: String,
    #[serde(deserialize_with = "deserialize_lowercase")]
    pub crop: String,
    #[serde(deserialize_with = "deserialize_lowercase")]
    pub growth_stage: String,
    #[serde(default)]
    pub sensor_reading: Option<SensorReading>,
    #[serde(default)]
    pub weather: Option<WeatherSummary>,
    #[serde(default)]
    pub has_images: bool,
    pub snapshot_timestamp: DateTime<Utc>,
}

fn deserialize_lowercase<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(value.trim().to_lowercase())
}

impl FieldSnapshot {
    pub fn new(
        field_id: impl Into<String>,
        crop: &str,
        growth_stage: &str,
        snapshot_timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            field_id: field_id.into(),
            crop: crop.trim().to_lowercase(),
            growth_stage: growth_stage.trim().to_lowercase(),
            sensor_reading: None,
            weather: None,
            has_images: false,
            snapshot_timestamp,
        }
    }

    pub fn with_sensor(mut self, reading: SensorReading) -> Self {
        self.sensor_reading = Some(reading);
        self
    }

    pub fn with_weather(mut self, weather: WeatherSummary) -> Self {
        self.weather = Some(weather);
        self
    }

    pub fn with_images(mut self, has_images: bool) -> Self {
        self.has_images = has_images;
        self
    }

    pub fn has_forecast_points(&self) -> bool {
        self.weather
            .as_ref()
            .is_some_and(|w| !w.forecast_points.is_empty())
    }
}
