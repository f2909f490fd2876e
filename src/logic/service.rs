use super::calculations::recent_rain;
use super::forecast::ForecastAdapter;
use super::fusion::FusionEngine;
use crate::config::Config;
use crate::datasources::ModelStore;
use crate::models::{DailyWeather, FieldSnapshot, ForecastPair, Recommendation, RecommendationRequest};
use std::sync::Arc;

/// Wires the forecast sources to the fusion engine.
///
/// Adapters are called once each before any fusion logic runs.
pub struct RecommendationService {
    forecasts: ForecastAdapter,
    engine: FusionEngine,
}

impl RecommendationService {
    pub fn new(forecasts: ForecastAdapter, engine: FusionEngine) -> Self {
        Self { forecasts, engine }
    }

    /// Service backed by on-disk model artifacts
    pub fn from_store(store: Arc<ModelStore>, config: &Config) -> Self {
        let forecasts = ForecastAdapter::new(store.clone());
        let engine = FusionEngine::new(store).with_arbitration(config.arbitration.clone());
        Self::new(forecasts, engine)
    }

    /// Fuse a snapshot with an already-built forecast pair. No side effects.
    pub fn generate_recommendation(
        &self,
        snapshot: &FieldSnapshot,
        forecast: &ForecastPair,
    ) -> Recommendation {
        self.engine.recommend(snapshot, forecast)
    }

    /// Fetch both forecasts for the snapshot, then fuse
    pub fn generate(&self, snapshot: &FieldSnapshot, history: &[DailyWeather]) -> Recommendation {
        let forecast = self.forecasts.forecast_pair(snapshot, history);
        tracing::debug!(
            "Field {}: API {:.1} mm / model {} ({:.1} mm 24h, {:.1} mm 48h)",
            snapshot.field_id,
            forecast.api_rain_24h,
            forecast.model.as_str(),
            forecast.model_rain_24h(),
            forecast.model_rain_48h()
        );

        self.generate_recommendation(snapshot, &forecast)
            .with_rain_history(recent_rain(history))
    }

    pub fn handle(&self, request: &RecommendationRequest) -> Recommendation {
        self.generate(&request.snapshot, &request.history())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasources::rainfall_model::tests::{day, persistence_model};
    use crate::datasources::soil_classifier::tests::sample_tree;
    use crate::models::{FertilizerAction, IrrigationAction, SensorReading};
    use chrono::{TimeZone, Utc};

    fn store_with_models() -> (tempfile::TempDir, Arc<ModelStore>) {
        let tmp = tempfile::tempdir().unwrap();
        let store = ModelStore::open(tmp.path());
        store
            .install_rainfall_model("east", persistence_model("east"))
            .unwrap();
        store.install_classifier(sample_tree());
        (tmp, Arc::new(store))
    }

    fn snapshot(field_id: &str) -> FieldSnapshot {
        FieldSnapshot::new(
            field_id,
            "rice",
            "vegetative",
            Utc.with_ymd_and_hms(2025, 6, 12, 0, 0, 0).unwrap(),
        )
        .with_sensor(SensorReading::new(20.0, 6.2, 150.0, 20.0, 150.0))
    }

    #[test]
    fn wet_week_delays_irrigation() {
        let (_tmp, store) = store_with_models();
        let service = RecommendationService::from_store(store, &Config::default());
        let history: Vec<_> = (0..10).map(|d| day(d, 5.0)).collect();

        let rec = service.generate(&snapshot("east"), &history);
        assert_eq!(rec.irrigation_action, IrrigationAction::Delay);
        let forecast = rec.model_forecast_mm.unwrap();
        assert!((forecast[0] - 5.0).abs() < 1e-9);
        assert!((forecast[1] - 10.0).abs() < 1e-9);
        assert_eq!(rec.rain_history_mm, Some(vec![5.0; 7]));
        assert_eq!(rec.fertilizer_action, FertilizerAction::Apply);
        assert_eq!(rec.classifier_label, "Low Nitrogen");
    }

    #[test]
    fn field_without_model_falls_back_to_api() {
        let (_tmp, store) = store_with_models();
        let service = RecommendationService::from_store(store, &Config::default());
        let history: Vec<_> = (0..3).map(|d| day(d, 5.0)).collect();

        let rec = service.generate(&snapshot("west"), &history);
        assert_eq!(rec.irrigation_action, IrrigationAction::IrrigateNow);
        assert_eq!(rec.irrigation_liters_per_acre, 1000.0);
        assert!(rec.model_forecast_mm.is_none());
        assert!(rec.rain_history_mm.is_none());
        assert!(rec
            .rationale
            .iter()
            .any(|n| n.starts_with("Learned rainfall forecast unavailable")));
    }

    #[test]
    fn repeated_calls_are_byte_identical() {
        let (_tmp, store) = store_with_models();
        let service = RecommendationService::from_store(store, &Config::default());
        let history: Vec<_> = (0..7).map(|d| day(d, 1.0)).collect();

        let a = serde_json::to_string(&service.generate(&snapshot("east"), &history)).unwrap();
        let b = serde_json::to_string(&service.generate(&snapshot("east"), &history)).unwrap();
        assert_eq!(a, b);
    }
}
