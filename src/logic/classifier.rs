use crate::datasources::SoilClassifier;
use crate::error::RootSphereError;
use crate::models::{SensorReading, SoilClassification};

/// Ask the classifier for a corroborating label. Never fails.
pub fn classify_soil(
    classifier: &dyn SoilClassifier,
    sample: &SensorReading,
    crop: &str,
) -> SoilClassification {
    match classifier.classify(sample, crop) {
        Ok(label) => SoilClassification::Label(label),
        Err(RootSphereError::ModelUnavailable(reason)) => {
            tracing::debug!("Soil classifier unavailable: {}", reason);
            SoilClassification::NotAvailable
        }
        Err(e) => {
            tracing::warn!("Soil classification failed for crop {}: {}", crop, e);
            SoilClassification::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::models::SoilHealthLabel;

    struct Unloaded;

    impl SoilClassifier for Unloaded {
        fn classify(&self, _: &SensorReading, _: &str) -> Result<SoilHealthLabel> {
            Err(RootSphereError::ModelUnavailable("not loaded".into()))
        }
    }

    struct Broken;

    impl SoilClassifier for Broken {
        fn classify(&self, _: &SensorReading, _: &str) -> Result<SoilHealthLabel> {
            Err(RootSphereError::ModelFailure("bad tree".into()))
        }
    }

    struct Says(SoilHealthLabel);

    impl SoilClassifier for Says {
        fn classify(&self, _: &SensorReading, _: &str) -> Result<SoilHealthLabel> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn errors_become_sentinels() {
        let sample = SensorReading::new(30.0, 6.5, 300.0, 20.0, 150.0);
        assert_eq!(
            classify_soil(&Unloaded, &sample, "rice").as_str(),
            "Model Not Available"
        );
        assert_eq!(
            classify_soil(&Broken, &sample, "rice").as_str(),
            "Analysis Failed"
        );
        assert_eq!(
            classify_soil(&Says(SoilHealthLabel::LowPotassium), &sample, "rice"),
            SoilClassification::Label(SoilHealthLabel::LowPotassium)
        );
    }
}
