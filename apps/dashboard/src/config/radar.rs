use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading a radar config document
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read radar config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed radar config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Storm parameters the dashboard is seeded with.
///
/// Numeric fields accept either JSON numbers or numeric strings, so hand
/// edited documents like `"rotationSpeed": "50"` load the same as `50`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarConfig {
    #[serde(deserialize_with = "number_or_numeric_text")]
    pub rotation_speed: f64,
    #[serde(deserialize_with = "number_or_numeric_text")]
    pub true_velocity: f64,
    #[serde(default)]
    pub radar_vehicle: String,
    #[serde(default)]
    pub storm_direction: String,
    #[serde(default, deserialize_with = "number_or_numeric_text")]
    pub storm_speed: f64,
    #[serde(default)]
    pub hook_echo: String,
    #[serde(default)]
    pub mesocyclone: String,
    #[serde(default)]
    pub degraded: String,
    #[serde(default)]
    pub alerts: String,
}

impl RadarConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Seconds for one full sweep.
    pub fn rotation_period(&self) -> f64 {
        60.0 / self.rotation_speed
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.rotation_speed.is_finite() || self.rotation_speed <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "rotationSpeed",
                reason: format!("must be a positive number, got {}", self.rotation_speed),
            });
        }

        if !self.true_velocity.is_finite() {
            return Err(ConfigError::Invalid {
                field: "trueVelocity",
                reason: format!("must be finite, got {}", self.true_velocity),
            });
        }

        if !self.storm_speed.is_finite() {
            return Err(ConfigError::Invalid {
                field: "stormSpeed",
                reason: format!("must be finite, got {}", self.storm_speed),
            });
        }

        Ok(())
    }
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            rotation_speed: 50.0,
            true_velocity: 25.0,
            radar_vehicle: String::new(),
            storm_direction: String::new(),
            storm_speed: 0.0,
            hook_echo: String::new(),
            mesocyclone: String::new(),
            degraded: String::new(),
            alerts: String::new(),
        }
    }
}

/// Reads and validates the radar config at `path`
pub fn load_config(path: impl AsRef<Path>) -> Result<RadarConfig, ConfigError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config = RadarConfig::from_json(&text)?;
    tracing::debug!(
        path = %path.display(),
        rotation_speed = config.rotation_speed,
        true_velocity = config.true_velocity,
        "radar config loaded"
    );
    Ok(config)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

fn number_or_numeric_text<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(value) => Ok(value),
        NumberOrText::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("expected a number, got {text:?}"))),
    }
}
