use super::calculations::forecast_rainfall_within;
use crate::datasources::RainfallForecaster;
use crate::error::RootSphereError;
use crate::models::{DailyWeather, FieldSnapshot, ForecastPair, ModelForecast};
use std::sync::Arc;

/// Both rainfall sources, normalised to mm over the same horizons
pub struct ForecastAdapter {
    forecaster: Arc<dyn RainfallForecaster>,
}

impl ForecastAdapter {
    pub fn new(forecaster: Arc<dyn RainfallForecaster>) -> Self {
        Self { forecaster }
    }

    /// Live-API rainfall expected within 24h of the snapshot instant.
    /// 0.0 when the snapshot has no forecast points.
    pub fn api_rainfall_next_24h(&self, snapshot: &FieldSnapshot) -> f64 {
        forecast_rainfall_within(snapshot, 24)
    }

    /// Learned three-day forecast. Never fails: a missing model is
    /// `Unavailable`, any other error is logged and reported as `Failed`.
    pub fn model_rainfall_forecast(&self, field_id: &str, history: &[DailyWeather]) -> ModelForecast {
        match self.forecaster.forecast_3day(field_id, history) {
            Ok(raw) => ModelForecast::from_raw(raw),
            Err(RootSphereError::ModelUnavailable(reason)) => {
                tracing::debug!("Rainfall model unavailable for {}: {}", field_id, reason);
                ModelForecast::Unavailable
            }
            Err(e) => {
                tracing::warn!("Rainfall forecast failed for {}: {}", field_id, e);
                ModelForecast::Failed
            }
        }
    }

    pub fn forecast_pair(&self, snapshot: &FieldSnapshot, history: &[DailyWeather]) -> ForecastPair {
        let api = self.api_rainfall_next_24h(snapshot);
        let model = self.model_rainfall_forecast(&snapshot.field_id, history);
        ForecastPair::from_sources(api, model)
    }
}
