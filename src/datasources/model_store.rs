use super::{RainfallForecaster, RainfallModel, SoilClassifier, SoilClassifierModel};
use crate::error::{Result, RootSphereError};
use crate::models::{DailyWeather, SensorReading, SoilHealthLabel};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

pub const CLASSIFIER_FILE: &str = "soil_classifier.json";

/// Read-mostly registry of trained model artifacts.
///
/// Recommendation requests clone an `Arc` under a short read lock and run
/// inference without holding it. Retrained models are swapped in with
/// `install_*`/`reload_*`; requests already holding the old `Arc` finish
/// against it.
pub struct ModelStore {
    dir: PathBuf,
    rainfall: RwLock<HashMap<String, Arc<RainfallModel>>>,
    classifier: RwLock<Option<Arc<SoilClassifierModel>>>,
}

impl ModelStore {
    /// Open the artifact directory. Missing artifacts are not an error; they
    /// surface later as "model unavailable".
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let store = Self {
            dir: dir.into(),
            rainfall: RwLock::new(HashMap::new()),
            classifier: RwLock::new(None),
        };

        match store.reload_classifier() {
            Ok(true) => {}
            Ok(false) => tracing::warn!(
                "Soil classifier not found at {:?} - digital soil checks will be unavailable",
                store.dir.join(CLASSIFIER_FILE)
            ),
            Err(e) => tracing::warn!("Failed to load soil classifier: {}", e),
        }

        store
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn rainfall_path(&self, field_id: &str) -> Result<PathBuf> {
        let valid = !field_id.is_empty()
            && field_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(RootSphereError::InvalidData(format!(
                "field id '{}' cannot name a model artifact",
                field_id
            )));
        }
        Ok(self.dir.join(format!("model_{}.json", field_id)))
    }

    /// Cached model for the field, loading it from disk on first use
    pub fn rainfall_model(&self, field_id: &str) -> Result<Option<Arc<RainfallModel>>> {
        if let Some(model) = self
            .rainfall
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(field_id)
        {
            return Ok(Some(Arc::clone(model)));
        }

        let path = self.rainfall_path(field_id)?;
        if !path.exists() {
            return Ok(None);
        }

        let model = Arc::new(RainfallModel::load(&path)?);
        self.rainfall
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(field_id.to_string(), Arc::clone(&model));
        Ok(Some(model))
    }

    /// Replace the in-memory model for a field
    pub fn install_rainfall_model(&self, field_id: &str, model: RainfallModel) -> Result<()> {
        model.validate()?;
        self.rainfall_path(field_id)?;
        self.rainfall
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(field_id.to_string(), Arc::new(model));
        tracing::info!("Installed rainfall model for field {}", field_id);
        Ok(())
    }

    /// Re-read a field's artifact from disk. Returns false (and drops any
    /// cached model) when the artifact is gone.
    pub fn reload_rainfall_model(&self, field_id: &str) -> Result<bool> {
        let path = self.rainfall_path(field_id)?;
        if !path.exists() {
            self.rainfall
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(field_id);
            return Ok(false);
        }

        // Load outside the lock so readers are never blocked on disk I/O
        let model = Arc::new(RainfallModel::load(&path)?);
        self.rainfall
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(field_id.to_string(), model);
        Ok(true)
    }

    pub fn classifier(&self) -> Option<Arc<SoilClassifierModel>> {
        self.classifier
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn install_classifier(&self, model: SoilClassifierModel) {
        *self
            .classifier
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(model));
        tracing::info!("Installed soil classifier");
    }

    /// Re-read the classifier artifact. Returns false when it does not exist.
    pub fn reload_classifier(&self) -> Result<bool> {
        let path = self.dir.join(CLASSIFIER_FILE);
        if !path.exists() {
            return Ok(false);
        }

        let model = Arc::new(SoilClassifierModel::load(&path)?);
        *self
            .classifier
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(model);
        Ok(true)
    }

    /// Field ids that have a rainfall artifact on disk, sorted
    pub fn field_models_on_disk(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut ids: Vec<String> = std::fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().into_owned();
                name.strip_prefix("model_")
                    .and_then(|rest| rest.strip_suffix(".json"))
                    .map(str::to_string)
            })
            .collect();
        ids.sort();
        Ok(ids)
    }
}

impl RainfallForecaster for ModelStore {
    fn forecast_3day(&self, field_id: &str, history: &[DailyWeather]) -> Result<[f64; 3]> {
        match self.rainfall_model(field_id)? {
            Some(model) => model.predict(history),
            None => Err(RootSphereError::ModelUnavailable(format!(
                "no rainfall model for field {}",
                field_id
            ))),
        }
    }
}

impl SoilClassifier for ModelStore {
    fn classify(&self, sample: &SensorReading, crop: &str) -> Result<SoilHealthLabel> {
        match self.classifier() {
            Some(model) => model.predict(sample, crop),
            None => Err(RootSphereError::ModelUnavailable(
                "soil classifier not loaded".into(),
            )),
        }
    }
}
