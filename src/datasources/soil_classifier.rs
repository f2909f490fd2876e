use crate::error::{Result, RootSphereError};
use crate::models::{SensorReading, SoilHealthLabel};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Column order the tree was trained with
pub const FEATURE_NAMES: [&str; 8] = [
    "N",
    "P",
    "K",
    "pH",
    "Moisture",
    "Crop_Maize",
    "Crop_Rice",
    "Crop_Wheat",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    /// Go `left` when `features[feature] <= threshold`, else `right`
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        label: String,
    },
}

/// Decision-tree soil-health classifier, root at index 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilClassifierModel {
    pub nodes: Vec<TreeNode>,
}

impl SoilClassifierModel {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let model: SoilClassifierModel = serde_json::from_str(&content)?;
        if model.nodes.is_empty() {
            return Err(RootSphereError::InvalidData(
                "soil classifier has no nodes".into(),
            ));
        }
        tracing::info!("Loaded soil classifier ({} nodes) from {:?}", model.nodes.len(), path);
        Ok(model)
    }

    pub fn features(sample: &SensorReading, crop: &str) -> [f64; 8] {
        let crop = crop.to_lowercase();
        let one_hot = |name: &str| if crop == name { 1.0 } else { 0.0 };
        [
            sample.n,
            sample.p,
            sample.k,
            sample.ph,
            sample.moisture,
            one_hot("maize"),
            one_hot("rice"),
            one_hot("wheat"),
        ]
    }

    pub fn predict(&self, sample: &SensorReading, crop: &str) -> Result<SoilHealthLabel> {
        let features = Self::features(sample, crop);
        let mut index = 0;

        // A valid tree reaches a leaf in fewer steps than it has nodes
        for _ in 0..self.nodes.len() {
            match self.nodes.get(index) {
                Some(TreeNode::Leaf { label }) => return Ok(SoilHealthLabel::parse(label)),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = features.get(*feature).ok_or_else(|| {
                        RootSphereError::ModelFailure(format!(
                            "split on unknown feature index {}",
                            feature
                        ))
                    })?;
                    index = if *value <= *threshold { *left } else { *right };
                }
                None => {
                    return Err(RootSphereError::ModelFailure(format!(
                        "dangling node index {}",
                        index
                    )))
                }
            }
        }

        Err(RootSphereError::ModelFailure(
            "soil classifier tree contains a cycle".into(),
        ))
    }
}
