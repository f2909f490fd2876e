use super::completeness;
use super::fertilizer::FertilizerAdvisor;
use super::irrigation::IrrigationArbiter;
use crate::config::ArbitrationConfig;
use crate::datasources::SoilClassifier;
use crate::logic::agronomy::AgronomyTables;
use crate::logic::standards::NutrientStandards;
use crate::models::{FieldSnapshot, ForecastPair, ModelForecast, Recommendation};
use std::sync::Arc;

/// Turns one field snapshot plus both rainfall forecasts into a
/// recommendation with an ordered rationale.
///
/// Holds only read-only tables and a shared classifier handle, so one engine
/// can serve concurrent requests.
pub struct FusionEngine {
    standards: NutrientStandards,
    agronomy: AgronomyTables,
    arbitration: ArbitrationConfig,
    classifier: Arc<dyn SoilClassifier>,
}

impl FusionEngine {
    pub fn new(classifier: Arc<dyn SoilClassifier>) -> Self {
        Self {
            standards: NutrientStandards::builtin(),
            agronomy: AgronomyTables::builtin(),
            arbitration: ArbitrationConfig::default(),
            classifier,
        }
    }

    pub fn with_arbitration(mut self, arbitration: ArbitrationConfig) -> Self {
        self.arbitration = arbitration;
        self
    }

    pub fn with_standards(mut self, standards: NutrientStandards) -> Self {
        self.standards = standards;
        self
    }

    pub fn with_agronomy(mut self, agronomy: AgronomyTables) -> Self {
        self.agronomy = agronomy;
        self
    }

    /// Never fails. Missing inputs and adapter failures degrade to a
    /// fallback branch explained in the rationale.
    pub fn recommend(&self, snapshot: &FieldSnapshot, forecast: &ForecastPair) -> Recommendation {
        let completeness = completeness::assess(snapshot);

        let irrigation = IrrigationArbiter {
            agronomy: &self.agronomy,
            thresholds: &self.arbitration,
        }
        .decide(snapshot, forecast);

        let fertilizer = FertilizerAdvisor {
            standards: &self.standards,
            agronomy: &self.agronomy,
            classifier: self.classifier.as_ref(),
        }
        .decide(snapshot);

        tracing::debug!(
            "Field {}: irrigation {} / fertilizer {} (completeness {:.2})",
            snapshot.field_id,
            irrigation.action,
            fertilizer.action,
            completeness.score
        );

        let mut rationale = completeness.notes;
        rationale.extend(irrigation.notes);
        rationale.extend(fertilizer.notes);

        let model_forecast_mm = match forecast.model {
            ModelForecast::Available(values) => Some(values),
            _ => None,
        };

        Recommendation {
            field_id: snapshot.field_id.clone(),
            generated_at: snapshot.snapshot_timestamp,
            irrigation_action: irrigation.action,
            irrigation_liters_per_acre: irrigation.liters_per_acre,
            irrigation_timing: irrigation.timing,
            fertilizer_action: fertilizer.action,
            fertilizer_npk_kg_acre: fertilizer.dose,
            fertilizer_timing: fertilizer.timing,
            data_completeness: completeness.score,
            rationale,
            classifier_label: fertilizer.classification.as_str().to_string(),
            risk_alert: irrigation.risk_alert,
            model_forecast_mm,
            rain_history_mm: None,
        }
    }
}
