use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IrrigationAction {
    IrrigateNow,
    Delay,
    NoAction,
    Unknown,
}

impl IrrigationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            IrrigationAction::IrrigateNow => "IRRIGATE_NOW",
            IrrigationAction::Delay => "DELAY",
            IrrigationAction::NoAction => "NO_ACTION",
            IrrigationAction::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for IrrigationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FertilizerAction {
    Apply,
    NoAction,
}

impl FertilizerAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            FertilizerAction::Apply => "APPLY",
            FertilizerAction::NoAction => "NO_ACTION",
        }
    }
}

impl std::fmt::Display for FertilizerAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fertilizer dose in kg per acre
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NpkDose {
    pub n: f64,
    pub p: f64,
    pub k: f64,
}

impl NpkDose {
    pub const fn new(n: f64, p: f64, k: f64) -> Self {
        Self { n, p, k }
    }

    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

/// The engine's only output. Built once per request and never modified;
/// storing it is the caller's business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub field_id: String,
    /// The snapshot's reference instant, not wall-clock time
    pub generated_at: DateTime<Utc>,
    pub irrigation_action: IrrigationAction,
    pub irrigation_liters_per_acre: f64,
    pub irrigation_timing: String,
    pub fertilizer_action: FertilizerAction,
    pub fertilizer_npk_kg_acre: NpkDose,
    pub fertilizer_timing: String,
    /// Heuristic share of expected inputs that were present. Not a
    /// calibrated probability.
    pub data_completeness: f64,
    pub rationale: Vec<String>,
    pub classifier_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_alert: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_forecast_mm: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rain_history_mm: Option<Vec<f64>>,
}

impl Recommendation {
    /// Whether the farmer is asked to do anything now
    pub fn is_actionable(&self) -> bool {
        self.irrigation_action == IrrigationAction::IrrigateNow
            || self.fertilizer_action == FertilizerAction::Apply
    }

    pub fn with_rain_history(mut self, history: Option<Vec<f64>>) -> Self {
        self.rain_history_mm = history;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_serialize_as_wire_names() {
        assert_eq!(
            serde_json::to_string(&IrrigationAction::IrrigateNow).unwrap(),
            "\"IRRIGATE_NOW\""
        );
        assert_eq!(
            serde_json::to_string(&FertilizerAction::NoAction).unwrap(),
            "\"NO_ACTION\""
        );
        let parsed: IrrigationAction = serde_json::from_str("\"DELAY\"").unwrap();
        assert_eq!(parsed, IrrigationAction::Delay);
    }

    #[test]
    fn display_matches_wire_names() {
        assert_eq!(IrrigationAction::Unknown.to_string(), "UNKNOWN");
        assert_eq!(FertilizerAction::Apply.to_string(), "APPLY");
    }
}
