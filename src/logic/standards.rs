//! Crop nutrient standards.
//!
//! Soil availability thresholds from ICAR Soil Health Card interpretations
//! and TNAU crop production guides, keyed by crop and growth stage.

use crate::models::{AdequacyResult, Deficiency, Nutrient, NutrientThresholds};
use std::collections::HashMap;

const FALLBACK_STAGE: &str = "vegetative";

/// Immutable crop × growth-stage threshold table with a global default.
///
/// `lookup` is total: exact crop+stage, then the crop's vegetative stage,
/// then the default.
#[derive(Debug, Clone)]
pub struct NutrientStandards {
    crops: HashMap<String, HashMap<String, NutrientThresholds>>,
    default: NutrientThresholds,
}

fn thresholds(
    n_min: f64,
    p_min: f64,
    k_min: f64,
    ph_range: (f64, f64),
    moisture_min: f64,
    description: &str,
    sources: &[&str],
) -> NutrientThresholds {
    NutrientThresholds {
        n_min,
        p_min,
        k_min,
        ph_range,
        moisture_min,
        description: description.to_string(),
        sources: sources.iter().map(|s| s.to_string()).collect(),
    }
}

impl NutrientStandards {
    pub fn new(default: NutrientThresholds) -> Self {
        Self {
            crops: HashMap::new(),
            default,
        }
    }

    pub fn with_stage(mut self, crop: &str, stage: &str, t: NutrientThresholds) -> Self {
        self.crops
            .entry(crop.to_lowercase())
            .or_default()
            .insert(stage.to_lowercase(), t);
        self
    }

    /// Reference table for rice, wheat and maize
    pub fn builtin() -> Self {
        let default = thresholds(
            280.0,
            10.0,
            120.0,
            (6.0, 7.5),
            30.0,
            "General crop requirements (based on medium fertility needs)",
            &["ICAR General Guidelines"],
        );

        Self::new(default)
            .with_stage(
                "rice",
                "vegetative",
                thresholds(
                    280.0,
                    10.0,
                    120.0,
                    (5.5, 7.0),
                    40.0,
                    "Rice (Vegetative Stage) - High N, moderate P/K requirements",
                    &[
                        "TNAU Crop Production Guide: 150 kg N, 50 kg P2O5, 50 kg K2O/ha",
                        "ICAR Soil Health Card Manual - Nutrient Ranges",
                    ],
                ),
            )
            .with_stage(
                "rice",
                "flowering",
                thresholds(
                    200.0,
                    15.0,
                    140.0,
                    (5.5, 7.0),
                    50.0,
                    "Rice (Flowering/Grain Filling) - Moderate N, increased P/K",
                    &["TNAU Agritech Portal", "NFSM Guidelines"],
                ),
            )
            .with_stage(
                "wheat",
                "vegetative",
                thresholds(
                    280.0,
                    10.0,
                    110.0,
                    (6.0, 7.5),
                    25.0,
                    "Wheat (Vegetative Stage) - Moderate to high N requirement",
                    &[
                        "TNAU: 80 kg N, 40 kg P2O5, 40 kg K2O/ha (rainfed)",
                        "ICAR RDF: 150 kg N, 60 kg P2O5, 40 kg K2O/ha (irrigated)",
                        "HP Agriculture Dept: 120 kg N, 60 kg P2O5, 30 kg K/ha",
                    ],
                ),
            )
            .with_stage(
                "wheat",
                "flowering",
                thresholds(
                    200.0,
                    12.0,
                    120.0,
                    (6.0, 7.5),
                    30.0,
                    "Wheat (Flowering/Grain Development)",
                    &["IIWBR Late-Sown Guidelines"],
                ),
            )
            .with_stage(
                "maize",
                "vegetative",
                thresholds(
                    300.0,
                    12.0,
                    120.0,
                    (5.5, 7.5),
                    30.0,
                    "Maize (Vegetative Stage) - Very high N requirement",
                    &[
                        "TNAU: 135 kg N, 62.5 kg P2O5, 50 kg K2O/ha (varieties)",
                        "TNAU: 250 kg N, 75 kg P2O5, 75 kg K2O/ha (hybrids)",
                        "FAO: 90-150 kg N/ha for late-maturing varieties",
                    ],
                ),
            )
            .with_stage(
                "maize",
                "flowering",
                thresholds(
                    250.0,
                    15.0,
                    140.0,
                    (5.5, 7.5),
                    35.0,
                    "Maize (Flowering/Grain Filling) - High N/K for yield",
                    &["FAO Fertilizer Guidelines", "TNAU Agritech"],
                ),
            )
    }

    pub fn lookup(&self, crop: &str, stage: &str) -> &NutrientThresholds {
        let crop = crop.trim().to_lowercase();
        let stage = stage.trim().to_lowercase();

        let Some(stages) = self.crops.get(&crop) else {
            return &self.default;
        };

        stages
            .get(&stage)
            .or_else(|| stages.get(FALLBACK_STAGE))
            .unwrap_or(&self.default)
    }

    pub fn default_thresholds(&self) -> &NutrientThresholds {
        &self.default
    }

    /// Compare one soil sample against the crop's thresholds.
    ///
    /// N/P/K/moisture pass at `>=` the minimum, pH passes inside the
    /// inclusive range. Messages are produced for failing checks only, in
    /// the order N, P, K, pH, moisture.
    #[allow(clippy::too_many_arguments)]
    pub fn evaluate(
        &self,
        crop: &str,
        stage: &str,
        n: f64,
        p: f64,
        k: f64,
        ph: f64,
        moisture: f64,
    ) -> AdequacyResult {
        let t = self.lookup(crop, stage);
        let (ph_low, ph_high) = t.ph_range;

        let n_adequate = n >= t.n_min;
        let p_adequate = p >= t.p_min;
        let k_adequate = k >= t.k_min;
        let ph_adequate = ph >= ph_low && ph <= ph_high;
        let moisture_adequate = moisture >= t.moisture_min;
        let ph_acidic = ph < ph_low;

        let mut deficiencies = Vec::new();
        if !n_adequate {
            deficiencies.push(Deficiency::new(
                Nutrient::Nitrogen,
                format!("Nitrogen is low ({:.0} vs {:.0} kg/ha)", n, t.n_min),
            ));
        }
        if !p_adequate {
            deficiencies.push(Deficiency::new(
                Nutrient::Phosphorus,
                format!("Phosphorus is low ({:.0} vs {:.0} kg/ha)", p, t.p_min),
            ));
        }
        if !k_adequate {
            deficiencies.push(Deficiency::new(
                Nutrient::Potassium,
                format!("Potassium is low ({:.0} vs {:.0} kg/ha)", k, t.k_min),
            ));
        }
        if !ph_adequate {
            let condition = if ph_acidic { "acidic" } else { "alkaline" };
            deficiencies.push(Deficiency::new(
                Nutrient::Ph,
                format!(
                    "Soil is too {} (pH {:.1}, optimal {:.1}-{:.1})",
                    condition, ph, ph_low, ph_high
                ),
            ));
        }
        if !moisture_adequate {
            deficiencies.push(Deficiency::new(
                Nutrient::Moisture,
                format!(
                    "Soil moisture is low ({:.0}% vs {:.0}%)",
                    moisture, t.moisture_min
                ),
            ));
        }

        AdequacyResult {
            n_adequate,
            p_adequate,
            k_adequate,
            ph_adequate,
            moisture_adequate,
            ph_acidic,
            deficiencies,
            thresholds: t.clone(),
        }
    }
}

impl Default for NutrientStandards {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_wins() {
        let table = NutrientStandards::builtin();
        let t = table.lookup("rice", "flowering");
        assert_eq!(t.n_min, 200.0);
        assert_eq!(t.moisture_min, 50.0);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let table = NutrientStandards::builtin();
        assert_eq!(table.lookup("WHEAT", "Flowering"), table.lookup("wheat", "flowering"));
    }

    #[test]
    fn unknown_stage_falls_back_to_vegetative() {
        let table = NutrientStandards::builtin();
        let t = table.lookup("maize", "harvest");
        assert_eq!(t, table.lookup("maize", "vegetative"));
        assert_eq!(t.n_min, 300.0);
    }

    #[test]
    fn unknown_crop_falls_back_to_default() {
        let table = NutrientStandards::builtin();
        for (crop, stage) in [("cassava", "vegetative"), ("", ""), ("sorghum", "flowering")] {
            assert_eq!(table.lookup(crop, stage), table.default_thresholds());
        }
    }

    #[test]
    fn crop_without_vegetative_stage_falls_back_to_default() {
        let custom = thresholds(1.0, 1.0, 1.0, (5.0, 8.0), 10.0, "Millet late", &["x"]);
        let table = NutrientStandards::builtin().with_stage("millet", "flowering", custom);
        assert_eq!(
            table.lookup("millet", "vegetative"),
            table.default_thresholds()
        );
        assert_eq!(table.lookup("millet", "flowering").n_min, 1.0);
    }

    #[test]
    fn evaluate_all_adequate() {
        let table = NutrientStandards::builtin();
        let result = table.evaluate("wheat", "vegetative", 300.0, 20.0, 150.0, 6.8, 35.0);
        assert!(result.n_adequate && result.p_adequate && result.k_adequate);
        assert!(result.ph_adequate && result.moisture_adequate);
        assert!(result.deficiencies.is_empty());
        assert!(!result.needs_fertility_action());
    }

    #[test]
    fn evaluate_thresholds_are_inclusive() {
        let table = NutrientStandards::builtin();
        // Exactly at every minimum and at both pH bounds
        let low = table.evaluate("wheat", "vegetative", 280.0, 10.0, 110.0, 6.0, 25.0);
        assert!(low.deficiencies.is_empty());
        let high = table.evaluate("wheat", "vegetative", 280.0, 10.0, 110.0, 7.5, 25.0);
        assert!(high.ph_adequate);
    }

    #[test]
    fn evaluate_orders_deficiencies() {
        let table = NutrientStandards::builtin();
        let result = table.evaluate("rice", "vegetative", 100.0, 5.0, 50.0, 5.0, 20.0);
        let order: Vec<Nutrient> = result.deficiencies.iter().map(|d| d.nutrient).collect();
        assert_eq!(
            order,
            vec![
                Nutrient::Nitrogen,
                Nutrient::Phosphorus,
                Nutrient::Potassium,
                Nutrient::Ph,
                Nutrient::Moisture
            ]
        );
        assert_eq!(result.messages()[0], "Nitrogen is low (100 vs 280 kg/ha)");
        assert_eq!(
            result.messages()[3],
            "Soil is too acidic (pH 5.0, optimal 5.5-7.0)"
        );
        assert_eq!(result.messages()[4], "Soil moisture is low (20% vs 40%)");
        assert!(result.ph_acidic);
    }

    #[test]
    fn evaluate_alkaline_soil() {
        let table = NutrientStandards::builtin();
        let result = table.evaluate("wheat", "vegetative", 300.0, 20.0, 150.0, 8.2, 35.0);
        assert!(!result.ph_adequate);
        assert!(!result.ph_acidic);
        assert_eq!(result.deficiencies.len(), 1);
        assert!(result.deficiencies[0].message.contains("alkaline"));
        assert!(result.needs_fertility_action());
    }

    #[test]
    fn moisture_only_deficiency_is_not_fertility() {
        let table = NutrientStandards::builtin();
        let result = table.evaluate("rice", "vegetative", 300.0, 20.0, 150.0, 6.5, 10.0);
        assert!(!result.moisture_adequate);
        assert!(!result.needs_fertility_action());
        assert_eq!(result.fertility_deficiencies().count(), 0);
    }

    #[test]
    fn evaluate_reports_thresholds_used() {
        let table = NutrientStandards::builtin();
        let result = table.evaluate("unknowncrop", "any", 0.0, 0.0, 0.0, 7.0, 0.0);
        assert_eq!(&result.thresholds, table.default_thresholds());
        assert_eq!(result.thresholds.sources, vec!["ICAR General Guidelines"]);
    }
}
