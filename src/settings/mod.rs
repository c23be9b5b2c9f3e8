use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::fx::chain::DEFAULT_NOISE_SEED;
use crate::fx::freeverb::ReverbParameters;

const SETTINGS_DIR: &str = "sauna-sizzler";
const SETTINGS_FILENAME: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    pub sample_rate: u32,
    pub block_size: u32,
    /// Seed for the steamer's noise generator.
    pub noise_seed: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            block_size: 128,
            noise_seed: DEFAULT_NOISE_SEED,
        }
    }
}

impl std::fmt::Display for EngineSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Sample Rate: {}", self.sample_rate)?;
        writeln!(f, "Block Size: {}", self.block_size)?;
        writeln!(f, "Noise Seed: {:#x}", self.noise_seed)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Settings {
    pub engine: EngineSettings,
    /// Reverb parameters applied at prepare time; room size is overridden
    /// by the per-block control.
    pub reverb: ReverbParameters,
}

impl std::fmt::Display for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "------------------------------")?;

        writeln!(f, "Engine Settings:")?;
        writeln!(f, "{}", self.engine)?;

        writeln!(f, "Reverb Settings:")?;
        writeln!(f, "Room Size: {}", self.reverb.room_size)?;
        writeln!(f, "Damping: {}", self.reverb.damping)?;
        writeln!(f, "Wet Level: {}", self.reverb.wet_level)?;
        writeln!(f, "Dry Level: {}", self.reverb.dry_level)?;
        writeln!(f, "Width: {}", self.reverb.width)?;
        writeln!(f, "Freeze: {}", self.reverb.freeze_mode)?;
        Ok(())
    }
}

impl Settings {
    /// Load from the user config directory, writing defaults if no file exists yet.
    pub fn load() -> Result<Self> {
        let settings_path = Self::settings_path();

        if settings_path.exists() {
            Self::load_from(&settings_path)
        } else {
            info!("No settings file found, using defaults");
            let settings = Self::default();
            // Try to save defaults, but don't fail if we can't
            let _ = settings.save();
            Ok(settings)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings: Self =
            serde_json::from_str(&contents).context("Failed to parse settings")?;
        debug!("Loaded settings from {path:?}");
        Ok(settings)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::settings_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(path, json).context("Failed to write settings file")?;

        debug!("Saved settings to {path:?}");
        Ok(())
    }

    pub fn settings_path() -> PathBuf {
        if let Ok(config_dir) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(config_dir)
                .join(SETTINGS_DIR)
                .join(SETTINGS_FILENAME)
        } else if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join(SETTINGS_DIR)
                .join(SETTINGS_FILENAME)
        } else {
            // Fallback to current directory
            PathBuf::from(".").join(SETTINGS_FILENAME)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_round_trips() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join(SETTINGS_FILENAME);

        let settings = Settings {
            engine: EngineSettings {
                sample_rate: 96000,
                block_size: 512,
                noise_seed: 77,
            },
            reverb: ReverbParameters {
                wet_level: 0.2,
                ..ReverbParameters::default()
            },
        };
        settings.save_to(&path)?;

        assert_eq!(Settings::load_from(&path)?, settings);
        Ok(())
    }

    #[test]
    fn load_rejects_malformed_json() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(SETTINGS_FILENAME);
        fs::write(&path, "{ not json")?;

        assert!(Settings::load_from(&path).is_err());
        Ok(())
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Settings::load_from(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read settings file"));
    }

    #[test]
    fn display_lists_engine_and_reverb() {
        let text = Settings::default().to_string();
        assert!(text.contains("Sample Rate: 48000"));
        assert!(text.contains("Dry Level: 0.4"));
    }
}
