use serde::{Deserialize, Serialize};

/// Outcome of asking the learned forecaster for the next three days of rain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "rain_mm", rename_all = "snake_case")]
pub enum ModelForecast {
    /// Day+1, day+2, day+3 rainfall in mm, each >= 0
    Available([f64; 3]),
    /// No trained model for the field, or it answered all zeros
    Unavailable,
    /// The model exists but inference failed
    Failed,
}

impl ModelForecast {
    /// Normalise a raw three-day answer.
    ///
    /// Negative values are clamped to zero. An all-zero answer cannot be told
    /// apart from "no model" and is reported as unavailable.
    pub fn from_raw(raw: [f64; 3]) -> Self {
        let clamped = raw.map(|v| if v.is_finite() { v.max(0.0) } else { 0.0 });
        if clamped.iter().all(|v| *v == 0.0) {
            ModelForecast::Unavailable
        } else {
            ModelForecast::Available(clamped)
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ModelForecast::Available(_))
    }

    /// Rainfall values, zeros when nothing usable came back
    pub fn values(&self) -> [f64; 3] {
        match self {
            ModelForecast::Available(v) => *v,
            _ => [0.0; 3],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelForecast::Available(_) => "available",
            ModelForecast::Unavailable => "unavailable",
            ModelForecast::Failed => "failed",
        }
    }
}

/// The two rainfall sources the irrigation arbitration reconciles.
///
/// `api_rain_24h` is derived from the snapshot's forecast points. The model
/// figures are read from `model` only, so they can never contradict its
/// status: when the model did not answer they are zero and
/// `model_available` is false.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPair {
    pub api_rain_24h: f64,
    pub model: ModelForecast,
}

impl ForecastPair {
    /// Pair built from explicit numbers, with a cumulative 48h model figure.
    ///
    /// The model side goes through [`ModelForecast::from_raw`], so all-zero
    /// model figures count as unavailable. Day+3 is left at zero.
    pub fn new(api_rain_24h: f64, model_rain_24h: f64, model_rain_48h: f64) -> Self {
        let model = ModelForecast::from_raw([
            model_rain_24h,
            (model_rain_48h - model_rain_24h).max(0.0),
            0.0,
        ]);
        Self::from_sources(api_rain_24h, model)
    }

    /// Pair built from the adapters' outputs
    pub fn from_sources(api_rain_24h: f64, model: ModelForecast) -> Self {
        Self {
            api_rain_24h,
            model,
        }
    }

    pub fn model_available(&self) -> bool {
        self.model.is_available()
    }

    /// Day+1 model rainfall, zero when the model did not answer
    pub fn model_rain_24h(&self) -> f64 {
        self.model.values()[0]
    }

    /// Cumulative day+1 plus day+2 model rainfall
    pub fn model_rain_48h(&self) -> f64 {
        let [day1, day2, _] = self.model.values();
        day1 + day2
    }
}
