use crate::error::{Result, RootSphereError};
use crate::models::DailyWeather;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const WINDOW_DAYS: usize = 7;
pub const FEATURES: usize = 4;
pub const HORIZON_DAYS: usize = 3;

/// Column index of rain in the feature vector
const RAIN: usize = 2;

/// Per-feature min-max scaling fitted on the field's training history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub min: [f64; FEATURES],
    pub max: [f64; FEATURES],
}

impl MinMaxScaler {
    pub fn transform(&self, features: [f64; FEATURES]) -> [f64; FEATURES] {
        let mut scaled = [0.0; FEATURES];
        for (i, value) in features.iter().enumerate() {
            let range = self.max[i] - self.min[i];
            scaled[i] = if range > 0.0 {
                (value - self.min[i]) / range
            } else {
                0.0
            };
        }
        scaled
    }

    pub fn inverse(&self, column: usize, scaled: f64) -> f64 {
        scaled * (self.max[column] - self.min[column]) + self.min[column]
    }
}

/// Trained rainfall forecaster for a single field.
///
/// Direct multi-horizon linear head over a 7-day window of scaled
/// `(temp_max, temp_min, rain, humidity)` features. Stored as JSON at
/// `model_<field_id>.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainfallModel {
    pub field_id: String,
    pub scaler: MinMaxScaler,
    /// One row per horizon day, `WINDOW_DAYS * FEATURES` weights each,
    /// day-major
    pub weights: Vec<Vec<f64>>,
    pub bias: [f64; HORIZON_DAYS],
}

impl RainfallModel {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let model: RainfallModel = serde_json::from_str(&content)?;
        model.validate()?;
        tracing::info!("Loaded rainfall model for field {} from {:?}", model.field_id, path);
        Ok(model)
    }

    pub fn validate(&self) -> Result<()> {
        if self.weights.len() != HORIZON_DAYS {
            return Err(RootSphereError::InvalidData(format!(
                "rainfall model has {} weight rows, expected {}",
                self.weights.len(),
                HORIZON_DAYS
            )));
        }

        let expected = WINDOW_DAYS * FEATURES;
        if let Some(row) = self.weights.iter().find(|r| r.len() != expected) {
            return Err(RootSphereError::InvalidData(format!(
                "rainfall model weight row has {} entries, expected {}",
                row.len(),
                expected
            )));
        }

        let all_finite = self
            .weights
            .iter()
            .flatten()
            .chain(self.bias.iter())
            .chain(self.scaler.min.iter())
            .chain(self.scaler.max.iter())
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(RootSphereError::InvalidData(
                "rainfall model contains non-finite parameters".into(),
            ));
        }

        Ok(())
    }

    /// Predict rainfall (mm) for the next three days, each clamped to >= 0
    pub fn predict(&self, history: &[DailyWeather]) -> Result<[f64; HORIZON_DAYS]> {
        let window = input_window(history)?;

        let inputs: Vec<f64> = window
            .iter()
            .flat_map(|day| self.scaler.transform(day.features()))
            .collect();

        let mut out = [0.0; HORIZON_DAYS];
        for (h, row) in self.weights.iter().enumerate().take(HORIZON_DAYS) {
            let scaled: f64 = self.bias[h] + row.iter().zip(&inputs).map(|(w, x)| w * x).sum::<f64>();
            let mm = self.scaler.inverse(RAIN, scaled);
            if !mm.is_finite() {
                return Err(RootSphereError::ModelFailure(format!(
                    "non-finite prediction for day+{}",
                    h + 1
                )));
            }
            out[h] = mm.max(0.0);
        }

        Ok(out)
    }
}

/// The last `WINDOW_DAYS` days of history; shorter histories are
/// front-padded with their earliest day.
fn input_window(history: &[DailyWeather]) -> Result<Vec<DailyWeather>> {
    let first = history.first().ok_or_else(|| {
        RootSphereError::InvalidData("rainfall model needs at least one day of history".into())
    })?;

    if history.len() >= WINDOW_DAYS {
        return Ok(history[history.len() - WINDOW_DAYS..].to_vec());
    }

    let mut window = vec![*first; WINDOW_DAYS - history.len()];
    window.extend_from_slice(history);
    Ok(window)
}
