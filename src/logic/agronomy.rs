use crate::models::NpkDose;
use std::collections::HashMap;

pub const DEFAULT_MOISTURE_THRESHOLD: f64 = 30.0;
pub const DEFAULT_IRRIGATION_LITERS: f64 = 400.0;
pub const DEFAULT_FERTILIZER_TARGET: NpkDose = NpkDose::new(40.0, 30.0, 20.0);

/// Irrigation and fertilizer reference values per crop.
///
/// Built once at start-up and shared read-only with the engine.
#[derive(Debug, Clone)]
pub struct AgronomyTables {
    moisture_thresholds: HashMap<String, f64>,
    irrigation_liters: HashMap<String, f64>,
    fertilizer_targets: HashMap<(String, String), NpkDose>,
}

impl AgronomyTables {
    pub fn builtin() -> Self {
        let moisture_thresholds = [("rice", 50.0), ("wheat", 30.0), ("maize", 25.0)]
            .into_iter()
            .map(|(c, v)| (c.to_string(), v))
            .collect();

        let irrigation_liters = [("rice", 1000.0), ("wheat", 500.0), ("maize", 400.0)]
            .into_iter()
            .map(|(c, v)| (c.to_string(), v))
            .collect();

        let fertilizer_targets = [
            ("wheat", "vegetative", NpkDose::new(50.0, 30.0, 20.0)),
            ("wheat", "flowering", NpkDose::new(30.0, 40.0, 30.0)),
            ("rice", "vegetative", NpkDose::new(60.0, 30.0, 30.0)),
            ("rice", "flowering", NpkDose::new(40.0, 40.0, 40.0)),
        ]
        .into_iter()
        .map(|(c, s, dose)| ((c.to_string(), s.to_string()), dose))
        .collect();

        Self {
            moisture_thresholds,
            irrigation_liters,
            fertilizer_targets,
        }
    }

    /// Soil moisture (%) below which the crop needs water
    pub fn moisture_threshold(&self, crop: &str) -> f64 {
        self.moisture_thresholds
            .get(&crop.to_lowercase())
            .copied()
            .unwrap_or(DEFAULT_MOISTURE_THRESHOLD)
    }

    /// Irrigation volume in liters per acre
    pub fn irrigation_liters(&self, crop: &str) -> f64 {
        self.irrigation_liters
            .get(&crop.to_lowercase())
            .copied()
            .unwrap_or(DEFAULT_IRRIGATION_LITERS)
    }

    /// Fertilizer target for crop+stage, default when either is unmatched
    pub fn fertilizer_target(&self, crop: &str, stage: &str) -> NpkDose {
        self.fertilizer_targets
            .get(&(crop.to_lowercase(), stage.to_lowercase()))
            .copied()
            .unwrap_or(DEFAULT_FERTILIZER_TARGET)
    }
}

impl Default for AgronomyTables {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_crop_values() {
        let tables = AgronomyTables::builtin();
        assert_eq!(tables.moisture_threshold("rice"), 50.0);
        assert_eq!(tables.moisture_threshold("Maize"), 25.0);
        assert_eq!(tables.irrigation_liters("wheat"), 500.0);
        assert_eq!(
            tables.fertilizer_target("rice", "flowering"),
            NpkDose::new(40.0, 40.0, 40.0)
        );
    }

    #[test]
    fn unknown_crop_uses_defaults() {
        let tables = AgronomyTables::builtin();
        assert_eq!(tables.moisture_threshold("barley"), 30.0);
        assert_eq!(tables.irrigation_liters("barley"), 400.0);
        assert_eq!(
            tables.fertilizer_target("barley", "vegetative"),
            DEFAULT_FERTILIZER_TARGET
        );
    }

    #[test]
    fn unknown_stage_uses_default_target() {
        let tables = AgronomyTables::builtin();
        // Maize has irrigation values but no fertilizer targets
        assert_eq!(
            tables.fertilizer_target("maize", "vegetative"),
            DEFAULT_FERTILIZER_TARGET
        );
        assert_eq!(
            tables.fertilizer_target("wheat", "harvest"),
            DEFAULT_FERTILIZER_TARGET
        );
    }
}
