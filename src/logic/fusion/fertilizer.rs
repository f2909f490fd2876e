use crate::datasources::SoilClassifier;
use crate::logic::agronomy::AgronomyTables;
use crate::logic::classifier::classify_soil;
use crate::logic::standards::NutrientStandards;
use crate::models::{
    AdequacyResult, FertilizerAction, FieldSnapshot, NpkDose, SoilClassification,
    SoilHealthLabel,
};

#[derive(Debug, Clone, PartialEq)]
pub struct FertilizerDecision {
    pub action: FertilizerAction,
    pub dose: NpkDose,
    pub timing: String,
    pub notes: Vec<String>,
    pub classification: SoilClassification,
}

/// Threshold check is the decision of record; the classifier only annotates.
pub struct FertilizerAdvisor<'a> {
    pub standards: &'a NutrientStandards,
    pub agronomy: &'a AgronomyTables,
    pub classifier: &'a dyn SoilClassifier,
}

impl FertilizerAdvisor<'_> {
    pub fn decide(&self, snapshot: &FieldSnapshot) -> FertilizerDecision {
        let Some(sample) = &snapshot.sensor_reading else {
            return FertilizerDecision {
                action: FertilizerAction::NoAction,
                dose: NpkDose::zero(),
                timing: "n/a".to_string(),
                notes: vec!["Cannot determine fertilizer needs without soil test.".to_string()],
                classification: SoilClassification::NotAvailable,
            };
        };

        let crop = snapshot.crop.as_str();
        let stage = snapshot.growth_stage.as_str();
        let adequacy = self.standards.evaluate(
            crop,
            stage,
            sample.n,
            sample.p,
            sample.k,
            sample.ph,
            sample.moisture,
        );
        let classification = classify_soil(self.classifier, sample, crop);

        let mut decision = self.from_adequacy(crop, stage, &adequacy);
        decision
            .notes
            .extend(cross_check(&adequacy, &classification));
        decision.classification = classification;
        decision
    }

    /// Action, dose and scientific notes. Depends on nothing but the adequacy
    /// result.
    fn from_adequacy(&self, crop: &str, stage: &str, adequacy: &AdequacyResult) -> FertilizerDecision {
        if !adequacy.needs_fertility_action() {
            return FertilizerDecision {
                action: FertilizerAction::NoAction,
                dose: NpkDose::zero(),
                timing: "n/a".to_string(),
                notes: vec![format!(
                    "Soil nutrients are adequate for {} ({} stage).",
                    crop, stage
                )],
                classification: SoilClassification::NotAvailable,
            };
        }

        let mut notes: Vec<String> = adequacy
            .fertility_deficiencies()
            .map(|d| d.message.clone())
            .collect();

        if !adequacy.ph_adequate {
            notes.push(if adequacy.ph_acidic {
                "Consider lime application to raise pH.".to_string()
            } else {
                "Consider sulfur/gypsum application to lower pH.".to_string()
            });
        }

        if let Some(source) = adequacy.thresholds.sources.first() {
            notes.push(format!("Source: {}", source));
        }

        let dose = self.agronomy.fertilizer_target(crop, stage);
        notes.push(format!(
            "Apply N {:.0} / P {:.0} / K {:.0} kg/acre.",
            dose.n, dose.p, dose.k
        ));

        FertilizerDecision {
            action: FertilizerAction::Apply,
            dose,
            timing: "next suitable day".to_string(),
            notes,
            classification: SoilClassification::NotAvailable,
        }
    }
}

/// Whether the classifier's label names a problem the threshold check also found
fn confirms(label: &SoilHealthLabel, adequacy: &AdequacyResult) -> bool {
    match label {
        SoilHealthLabel::LowNitrogen => !adequacy.n_adequate,
        SoilHealthLabel::LowPhosphorus => !adequacy.p_adequate,
        SoilHealthLabel::LowPotassium => !adequacy.k_adequate,
        SoilHealthLabel::AcidicSoil => !adequacy.ph_adequate && adequacy.ph_acidic,
        SoilHealthLabel::AlkalineSoil => !adequacy.ph_adequate && !adequacy.ph_acidic,
        SoilHealthLabel::Healthy | SoilHealthLabel::Other(_) => false,
    }
}

fn retest_note(label: &SoilHealthLabel) -> String {
    format!("Digital check suggests '{}' - consider retesting.", label)
}

fn cross_check(adequacy: &AdequacyResult, classification: &SoilClassification) -> Vec<String> {
    let Some(label) = classification.label() else {
        return vec![format!("Digital soil check: {}.", classification)];
    };

    if adequacy.needs_fertility_action() {
        if confirms(label, adequacy) {
            vec![format!("Digital soil check agrees: {}.", label)]
        } else {
            vec![retest_note(label)]
        }
    } else {
        let mut notes = vec![format!("Digital soil check: {}.", label)];
        if label.is_deficiency() {
            notes.push(retest_note(label));
        }
        notes
    }
}
