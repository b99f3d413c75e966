/// CLI configuration
use crate::error::{AppError, Result};
use outport_cpal::ClientConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "outport.toml";

/// Prefix for environment overrides, e.g. `OUTPORT_CLIENT__CHUNK_FRAMES=256`
pub const ENV_PREFIX: &str = "OUTPORT";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub tone: ToneSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ToneSettings {
    #[serde(default = "default_frequency")]
    pub frequency: f32,

    #[serde(default = "default_amplitude")]
    pub amplitude: f32,

    #[serde(default = "default_seconds")]
    pub seconds: f32,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `outport.toml` is used when
    /// present. Environment variables override both.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        tracing::debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.client.validate()?;

        if !(0.0..=1.0).contains(&self.tone.amplitude) {
            return Err(AppError::Config(format!(
                "tone amplitude must be between 0.0 and 1.0, got {}",
                self.tone.amplitude
            )));
        }

        if self.tone.frequency <= 0.0 {
            return Err(AppError::Config(format!(
                "tone frequency must be positive, got {}",
                self.tone.frequency
            )));
        }

        if self.tone.seconds < 0.0 {
            return Err(AppError::Config(format!(
                "tone duration must not be negative, got {}",
                self.tone.seconds
            )));
        }

        Ok(())
    }
}

// Default values
fn default_frequency() -> f32 {
    440.0
}

fn default_amplitude() -> f32 {
    0.2
}

fn default_seconds() -> f32 {
    2.0
}

impl Default for ToneSettings {
    fn default() -> Self {
        Self {
            frequency: default_frequency(),
            amplitude: default_amplitude(),
            seconds: default_seconds(),
        }
    }
}
