use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// An observed weather reading (typically hourly) stored for a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub timestamp: DateTime<Utc>,
    pub temp_c: f64,
    pub humidity_pct: f64,
    pub rainfall_mm: f64,
}

/// One day of weather history, the input unit of the rainfall model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyWeather {
    pub date: NaiveDate,
    pub temp_max: f64,
    pub temp_min: f64,
    pub rain: f64,
    pub humidity: f64,
}

impl DailyWeather {
    /// Feature vector in model column order: temp_max, temp_min, rain, humidity
    pub fn features(&self) -> [f64; 4] {
        [self.temp_max, self.temp_min, self.rain, self.humidity]
    }
}
