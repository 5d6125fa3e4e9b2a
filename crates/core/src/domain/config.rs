//! Preset persistence
//!
//! Presets are TOML files holding a complete `ChainSettings` snapshot
//! plus a name. Loading validates ranges before anything reaches the
//! parameter store, so a hand-edited file cannot push the chain outside
//! its operating envelope.

use crate::domain::params::{ranges, ChainSettings, EqParams};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Invalid preset: {0}")]
    Invalid(String),

    #[error("Preset not found: {0}")]
    PresetNotFound(String),
}

/// A named, persistable EQ configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EqPreset {
    pub name: String,
    pub settings: ChainSettings,
}

impl EqPreset {
    /// Neutral preset: cuts parked at the band edges, peaks at 0 dB
    pub fn factory_default() -> Self {
        Self {
            name: "default".to_string(),
            settings: ChainSettings::default(),
        }
    }

    /// Capture the live parameter store as a preset
    pub fn from_params(name: impl Into<String>, params: &EqParams) -> Self {
        Self {
            name: name.into(),
            settings: ChainSettings::read(params),
        }
    }

    /// Push this preset into the live parameter store
    pub fn apply_to(&self, params: &EqParams) {
        params.apply_settings(&self.settings);
    }

    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;
        let preset: Self = toml::from_str(&content)?;
        preset.validate()?;
        debug!(name = %preset.name, "loaded preset");
        Ok(preset)
    }

    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        self.validate()?;
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.as_ref().parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path.as_ref(), content).await?;
        info!(name = %self.name, "saved preset");
        Ok(())
    }

    /// Range-check every control
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("preset name is empty".to_string()));
        }
        let freq = |label: &str, hz: f32| -> Result<()> {
            if !(ranges::FREQ_MIN..=ranges::FREQ_MAX).contains(&hz) {
                return Err(ConfigError::Invalid(format!(
                    "{label} frequency {hz} Hz outside {}..={} Hz",
                    ranges::FREQ_MIN,
                    ranges::FREQ_MAX
                )));
            }
            Ok(())
        };
        freq("high-pass", self.settings.high_pass.cutoff_hz)?;
        freq("low-pass", self.settings.low_pass.cutoff_hz)?;

        for (label, band) in [
            ("low peak", &self.settings.low_peak),
            ("mid peak", &self.settings.mid_peak),
            ("high peak", &self.settings.high_peak),
        ] {
            freq(label, band.freq_hz)?;
            if !(ranges::GAIN_DB_MIN..=ranges::GAIN_DB_MAX).contains(&band.gain_db) {
                return Err(ConfigError::Invalid(format!(
                    "{label} gain {} dB outside {}..={} dB",
                    band.gain_db,
                    ranges::GAIN_DB_MIN,
                    ranges::GAIN_DB_MAX
                )));
            }
            if !(ranges::Q_MIN..=ranges::Q_MAX).contains(&band.q) {
                return Err(ConfigError::Invalid(format!(
                    "{label} Q {} outside {}..={}",
                    band.q,
                    ranges::Q_MIN,
                    ranges::Q_MAX
                )));
            }
        }
        Ok(())
    }
}

/// Directory of named preset files
#[derive(Debug, Clone)]
pub struct PresetManager {
    preset_dir: PathBuf,
}

impl PresetManager {
    pub fn new(preset_dir: impl Into<PathBuf>) -> Self {
        Self {
            preset_dir: preset_dir.into(),
        }
    }

    fn preset_path(&self, name: &str) -> PathBuf {
        self.preset_dir.join(format!("{name}.toml"))
    }

    pub async fn exists(&self, name: &str) -> bool {
        tokio::fs::try_exists(self.preset_path(name))
            .await
            .unwrap_or(false)
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut entries = match tokio::fs::read_dir(&self.preset_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(names),
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "toml") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    pub async fn load(&self, name: &str) -> Result<EqPreset> {
        let path = self.preset_path(name);
        match EqPreset::load_from_file(&path).await {
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(name, "preset file missing");
                Err(ConfigError::PresetNotFound(name.to_string()))
            }
            other => other,
        }
    }

    pub async fn save(&self, preset: &EqPreset) -> Result<()> {
        preset.save_to_file(self.preset_path(&preset.name)).await
    }

    pub async fn delete(&self, name: &str) -> Result<()> {
        let path = self.preset_path(name);
        match tokio::fs::remove_file(&path).await {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ConfigError::PresetNotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
            Ok(()) => {
                info!(name, "deleted preset");
                Ok(())
            }
        }
    }
}
