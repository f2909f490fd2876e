use super::nutrient::Nutrient;
use serde::{Deserialize, Serialize};

/// Vocabulary of the soil-health classifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoilHealthLabel {
    Healthy,
    LowNitrogen,
    LowPhosphorus,
    LowPotassium,
    AcidicSoil,
    AlkalineSoil,
    Other(String),
}

impl SoilHealthLabel {
    pub fn as_str(&self) -> &str {
        match self {
            SoilHealthLabel::Healthy => "Healthy",
            SoilHealthLabel::LowNitrogen => "Low Nitrogen",
            SoilHealthLabel::LowPhosphorus => "Low Phosphorus",
            SoilHealthLabel::LowPotassium => "Low Potassium",
            SoilHealthLabel::AcidicSoil => "Acidic Soil",
            SoilHealthLabel::AlkalineSoil => "Alkaline Soil",
            SoilHealthLabel::Other(s) => s,
        }
    }

    /// Map a raw model label onto the vocabulary; unknown labels are kept verbatim
    pub fn parse(s: &str) -> Self {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "healthy" => SoilHealthLabel::Healthy,
            "lownitrogen" | "lown" => SoilHealthLabel::LowNitrogen,
            "lowphosphorus" | "lowp" => SoilHealthLabel::LowPhosphorus,
            "lowpotassium" | "lowk" => SoilHealthLabel::LowPotassium,
            "acidicsoil" | "acidic" => SoilHealthLabel::AcidicSoil,
            "alkalinesoil" | "alkaline" => SoilHealthLabel::AlkalineSoil,
            _ => SoilHealthLabel::Other(s.trim().to_string()),
        }
    }

    /// The scientific check this label corresponds to, if it names a problem
    pub fn nutrient(&self) -> Option<Nutrient> {
        match self {
            SoilHealthLabel::LowNitrogen => Some(Nutrient::Nitrogen),
            SoilHealthLabel::LowPhosphorus => Some(Nutrient::Phosphorus),
            SoilHealthLabel::LowPotassium => Some(Nutrient::Potassium),
            SoilHealthLabel::AcidicSoil | SoilHealthLabel::AlkalineSoil => Some(Nutrient::Ph),
            SoilHealthLabel::Healthy | SoilHealthLabel::Other(_) => None,
        }
    }

    pub fn is_deficiency(&self) -> bool {
        self.nutrient().is_some()
    }
}

impl std::fmt::Display for SoilHealthLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of one classifier call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoilClassification {
    Label(SoilHealthLabel),
    NotAvailable,
    Failed,
}

impl SoilClassification {
    pub fn as_str(&self) -> &str {
        match self {
            SoilClassification::Label(label) => label.as_str(),
            SoilClassification::NotAvailable => "Model Not Available",
            SoilClassification::Failed => "Analysis Failed",
        }
    }

    pub fn label(&self) -> Option<&SoilHealthLabel> {
        match self {
            SoilClassification::Label(label) => Some(label),
            _ => None,
        }
    }
}

impl std::fmt::Display for SoilClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_labels() {
        assert_eq!(SoilHealthLabel::parse("Low Nitrogen"), SoilHealthLabel::LowNitrogen);
        assert_eq!(SoilHealthLabel::parse("low_phosphorus"), SoilHealthLabel::LowPhosphorus);
        assert_eq!(SoilHealthLabel::parse("LOW POTASSIUM"), SoilHealthLabel::LowPotassium);
        assert_eq!(SoilHealthLabel::parse("Acidic Soil"), SoilHealthLabel::AcidicSoil);
        assert_eq!(SoilHealthLabel::parse("alkaline"), SoilHealthLabel::AlkalineSoil);
        assert_eq!(SoilHealthLabel::parse("Healthy"), SoilHealthLabel::Healthy);
    }

    #[test]
    fn parse_unknown_label_is_kept() {
        assert_eq!(
            SoilHealthLabel::parse(" Saline Soil "),
            SoilHealthLabel::Other("Saline Soil".into())
        );
    }

    #[test]
    fn label_round_trips_through_display() {
        for label in [
            SoilHealthLabel::Healthy,
            SoilHealthLabel::LowNitrogen,
            SoilHealthLabel::LowPhosphorus,
            SoilHealthLabel::LowPotassium,
            SoilHealthLabel::AcidicSoil,
            SoilHealthLabel::AlkalineSoil,
        ] {
            assert_eq!(SoilHealthLabel::parse(label.as_str()), label);
        }
    }

    #[test]
    fn sentinel_display_strings() {
        assert_eq!(SoilClassification::NotAvailable.as_str(), "Model Not Available");
        assert_eq!(SoilClassification::Failed.as_str(), "Analysis Failed");
        assert!(SoilClassification::Failed.label().is_none());
    }

    #[test]
    fn deficiency_labels_map_to_nutrients() {
        assert_eq!(SoilHealthLabel::LowNitrogen.nutrient(), Some(Nutrient::Nitrogen));
        assert_eq!(SoilHealthLabel::AlkalineSoil.nutrient(), Some(Nutrient::Ph));
        assert!(!SoilHealthLabel::Healthy.is_deficiency());
        assert!(!SoilHealthLabel::Other("x".into()).is_deficiency());
    }
}
