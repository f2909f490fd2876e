use crate::error::{Result, RootSphereError};
use dialoguer::{Confirm, Input};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub arbitration: ArbitrationConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ModelsConfig {
    /// Directory holding `model_<field_id>.json` and `soil_classifier.json`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

/// Rainfall thresholds (mm) used to reconcile the live and learned forecasts.
///
/// These are field-tuned values, not physical constants.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ArbitrationConfig {
    /// Live forecast above this within 24h means rain today
    pub api_rain_today_mm: f64,
    /// Learned forecast above this within 24h means rain today
    pub model_rain_today_mm: f64,
    /// Storm check only applies while the live 24h figure stays below this
    pub storm_api_max_mm: f64,
    /// Learned 48h total above this means a storm is approaching
    pub storm_model_48h_mm: f64,
    /// Live vs learned 24h gap that counts as disagreement
    pub disagreement_mm: f64,
    pub heavy_rain_api_max_mm: f64,
    pub heavy_rain_model_48h_mm: f64,
}

impl Default for ArbitrationConfig {
    fn default() -> Self {
        Self {
            api_rain_today_mm: 2.0,
            model_rain_today_mm: 3.0,
            storm_api_max_mm: 2.0,
            storm_model_48h_mm: 8.0,
            disagreement_mm: 5.0,
            heavy_rain_api_max_mm: 1.0,
            heavy_rain_model_48h_mm: 10.0,
        }
    }
}

impl ArbitrationConfig {
    fn values(&self) -> [(&'static str, f64); 7] {
        [
            ("api_rain_today_mm", self.api_rain_today_mm),
            ("model_rain_today_mm", self.model_rain_today_mm),
            ("storm_api_max_mm", self.storm_api_max_mm),
            ("storm_model_48h_mm", self.storm_model_48h_mm),
            ("disagreement_mm", self.disagreement_mm),
            ("heavy_rain_api_max_mm", self.heavy_rain_api_max_mm),
            ("heavy_rain_model_48h_mm", self.heavy_rain_model_48h_mm),
        ]
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.values() {
            if !value.is_finite() || value < 0.0 {
                return Err(RootSphereError::Config(format!(
                    "arbitration.{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

impl Config {
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p,
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(RootSphereError::Config(format!(
                "Config file not found at {:?}. Run `rootsphere init` to set up.",
                config_path
            )));
        }

        Self::load_from(&config_path)
    }

    /// Load the config if one exists, otherwise fall back to the defaults.
    /// An explicit path that does not exist is still an error.
    pub fn load_or_default(config_override: Option<PathBuf>) -> Result<Self> {
        if config_override.is_none() && !Self::exists(None) {
            tracing::debug!("No config file found, using defaults");
            return Ok(Self::default());
        }
        Self::load(config_override)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .map_err(|e| RootSphereError::Config(format!("Failed to read config: {}", e)))?;

        let config_str = Self::substitute_env_vars(&config_str);

        // An empty file is a valid, all-defaults config
        let config: Config = if config_str.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&config_str)
                .map_err(|e| RootSphereError::Config(format!("Failed to parse config: {}", e)))?
        };

        config.validate()?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.arbitration.validate()
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let default_path = Self::default_config_path()?;
        Ok(default_path)
    }

    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    /// Default path for writing new config files (~/.config/rootsphere/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| RootSphereError::Config("Cannot determine config directory".into()))?
            .join("rootsphere");
        Ok(config_dir.join("config.yaml"))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(self)
            .map_err(|e| RootSphereError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# RootSphere Configuration\n# Generated by `rootsphere init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the config and the path it was written to.
    pub fn setup_interactive(config_override: Option<PathBuf>) -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up RootSphere!");
        println!();

        println!("Model artifacts (leave blank to use the data directory)");
        let models_dir: String = Input::new()
            .with_prompt("  Models directory")
            .default(String::new())
            .allow_empty(true)
            .interact_text()
            .map_err(|e| RootSphereError::Config(format!("Input error: {}", e)))?;

        println!();

        let mut arbitration = ArbitrationConfig::default();
        let customise = Confirm::new()
            .with_prompt("Adjust rainfall arbitration thresholds?")
            .default(false)
            .interact()
            .map_err(|e| RootSphereError::Config(format!("Input error: {}", e)))?;

        if customise {
            println!("Rainfall thresholds (mm)");
            arbitration.api_rain_today_mm = prompt_mm(
                "  Live forecast rain today above",
                arbitration.api_rain_today_mm,
            )?;
            arbitration.model_rain_today_mm = prompt_mm(
                "  Learned forecast rain today above",
                arbitration.model_rain_today_mm,
            )?;
            arbitration.storm_api_max_mm = prompt_mm(
                "  Storm check while live 24h below",
                arbitration.storm_api_max_mm,
            )?;
            arbitration.storm_model_48h_mm = prompt_mm(
                "  Storm when learned 48h above",
                arbitration.storm_model_48h_mm,
            )?;
            arbitration.disagreement_mm = prompt_mm(
                "  Forecasts disagree when 24h gap above",
                arbitration.disagreement_mm,
            )?;
            arbitration.heavy_rain_api_max_mm = prompt_mm(
                "  Heavy-rain warning while live 24h below",
                arbitration.heavy_rain_api_max_mm,
            )?;
            arbitration.heavy_rain_model_48h_mm = prompt_mm(
                "  Heavy-rain warning when learned 48h above",
                arbitration.heavy_rain_model_48h_mm,
            )?;
            println!();
        }

        let config = Config {
            models: ModelsConfig {
                dir: (!models_dir.trim().is_empty()).then(|| PathBuf::from(models_dir.trim())),
            },
            arbitration,
        };
        config.validate()?;

        let config_path = match config_override {
            Some(p) => p,
            None => Self::default_config_path()?,
        };
        config.save(&config_path)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> String {
        let mut result = content.to_string();

        let Ok(re) = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}") else {
            return result;
        };

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        result
    }

    /// Directory holding model artifacts.
    ///
    /// CLI override, then `ROOTSPHERE_MODELS_DIR`, then the config file, then
    /// the XDG data directory.
    pub fn models_dir(&self, dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        if let Some(dir) = dir_override {
            return Ok(dir.clone());
        }

        if let Ok(dir) = std::env::var("ROOTSPHERE_MODELS_DIR") {
            if !dir.is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }

        if let Some(dir) = &self.models.dir {
            return Ok(dir.clone());
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| RootSphereError::Config("Cannot determine data directory".into()))?
            .join("rootsphere")
            .join("models");
        Ok(data_dir)
    }
}

fn prompt_mm(prompt: &str, default: f64) -> Result<f64> {
    Input::new()
        .with_prompt(prompt)
        .default(default)
        .validate_with(|v: &f64| {
            if v.is_finite() && *v >= 0.0 {
                Ok(())
            } else {
                Err("must be a non-negative number")
            }
        })
        .interact_text()
        .map_err(|e| RootSphereError::Config(format!("Input error: {}", e)))
}
