use crate::error::{Result, UploaderError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level configuration (loaded from uploader.toml)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploaderConfig {
    /// Log level used when RUST_LOG is unset (default: info)
    pub log_level: String,
    pub upload: UploadConfig,
    pub ingest: IngestConfig,
    pub ui: UiConfig,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            upload: UploadConfig::default(),
            ingest: IngestConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Delay between the starts of consecutive pending uploads
    pub stagger_interval_ms: u64,
    /// Period of one progress tick
    pub tick_interval_ms: u64,
    /// Exclusive upper bound of the per-tick random increment, in percent
    pub max_increment: f32,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            stagger_interval_ms: 500,
            tick_interval_ms: 200,
            max_increment: 30.0,
        }
    }
}

impl UploadConfig {
    pub fn stagger_interval(&self) -> Duration {
        Duration::from_millis(self.stagger_interval_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Glob patterns skipped while walking a folder
    pub exclude: Vec<String>,
    /// Honor .gitignore files found during a folder walk
    pub respect_gitignore: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            respect_gitignore: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub toast_duration_secs: u64,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            toast_duration_secs: 4,
            window_width: 520.0,
            window_height: 620.0,
        }
    }
}

impl UploaderConfig {
    /// Load the config at `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| UploaderError::File {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
            .map_err(|e| UploaderError::Config(format!("parsing {}: {e}", path.display())))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| UploaderError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.upload.tick_interval_ms == 0 {
            return Err(UploaderError::Config(
                "upload.tick_interval_ms must be greater than zero".to_string(),
            ));
        }
        let max = self.upload.max_increment;
        if !(max.is_finite() && max > 0.0) {
            return Err(UploaderError::Config(
                "upload.max_increment must be a finite number greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
