use serde::{Deserialize, Serialize};

/// Scientific soil thresholds for one crop and growth stage.
///
/// Values are available nutrient levels in the soil (kg/ha), not application
/// rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientThresholds {
    pub n_min: f64,
    pub p_min: f64,
    pub k_min: f64,
    pub ph_range: (f64, f64),
    pub moisture_min: f64,
    pub description: String,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Nutrient {
    Nitrogen,
    Phosphorus,
    Potassium,
    Ph,
    Moisture,
}

impl Nutrient {
    pub fn as_str(&self) -> &'static str {
        match self {
            Nutrient::Nitrogen => "Nitrogen",
            Nutrient::Phosphorus => "Phosphorus",
            Nutrient::Potassium => "Potassium",
            Nutrient::Ph => "pH",
            Nutrient::Moisture => "Moisture",
        }
    }

    /// Whether a shortfall is addressed by fertilizer or soil amendment
    /// rather than by irrigation
    pub fn is_fertility(&self) -> bool {
        !matches!(self, Nutrient::Moisture)
    }
}

impl std::fmt::Display for Nutrient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deficiency {
    pub nutrient: Nutrient,
    pub message: String,
}

impl Deficiency {
    pub fn new(nutrient: Nutrient, message: impl Into<String>) -> Self {
        Self {
            nutrient,
            message: message.into(),
        }
    }
}

/// Per-measurement verdicts of one adequacy evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdequacyResult {
    pub n_adequate: bool,
    pub p_adequate: bool,
    pub k_adequate: bool,
    pub ph_adequate: bool,
    pub moisture_adequate: bool,
    /// pH below the range; only meaningful when `ph_adequate` is false
    pub ph_acidic: bool,
    /// Failing checks in the order N, P, K, pH, moisture
    pub deficiencies: Vec<Deficiency>,
    pub thresholds: NutrientThresholds,
}

impl AdequacyResult {
    /// Any N/P/K/pH check failed
    pub fn needs_fertility_action(&self) -> bool {
        !(self.n_adequate && self.p_adequate && self.k_adequate && self.ph_adequate)
    }

    pub fn fertility_deficiencies(&self) -> impl Iterator<Item = &Deficiency> {
        self.deficiencies.iter().filter(|d| d.nutrient.is_fertility())
    }

    pub fn messages(&self) -> Vec<&str> {
        self.deficiencies.iter().map(|d| d.message.as_str()).collect()
    }
}
