pub mod model_store;
pub mod rainfall_model;
pub mod soil_classifier;

pub use model_store::ModelStore;
pub use rainfall_model::RainfallModel;
pub use soil_classifier::SoilClassifierModel;

use crate::error::Result;
use crate::models::{DailyWeather, SensorReading, SoilHealthLabel};

/// Learned multi-day rainfall forecaster
pub trait RainfallForecaster: Send + Sync {
    /// Rainfall (mm) for day+1, day+2 and day+3 given the most recent daily
    /// history, oldest first.
    ///
    /// Returns `RootSphereError::ModelUnavailable` when no model has been
    /// trained for the field.
    fn forecast_3day(&self, field_id: &str, history: &[DailyWeather]) -> Result<[f64; 3]>;
}

/// Tabular soil-health classifier
pub trait SoilClassifier: Send + Sync {
    /// Returns `RootSphereError::ModelUnavailable` when no model is loaded.
    fn classify(&self, sample: &SensorReading, crop: &str) -> Result<SoilHealthLabel>;
}
