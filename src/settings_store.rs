//! # Settings Store Module
//!
//! Persistenza delle impostazioni utente su file JSON.
//!
//! ## Responsabilità:
//! - Carica le impostazioni dalla posizione di configurazione della piattaforma
//! - Non fallisce mai in lettura: file mancante, corrotto o invalido → default
//! - Salvataggio atomico (file temporaneo + rename), directory create al primo salvataggio
//! - Aggiornamenti parziali e reset ai default
//!
//! ## Posizione del file:
//! - Linux: `~/.config/file-compressor/settings.json`
//! - macOS: `~/Library/Application Support/file-compressor/settings.json`
//! - Windows: `%APPDATA%\file-compressor\settings.json`

use crate::config::{Settings, SettingsPatch};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

const APP_DIR: &str = "file-compressor";
const SETTINGS_FILE: &str = "settings.json";

/// Loads and saves [`Settings`] at a fixed location
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform-specific configuration location
    pub fn default_location() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine the configuration directory"))?;
        Ok(Self::new(config_dir.join(APP_DIR).join(SETTINGS_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, falling back to defaults on any problem
    pub async fn load(&self) -> Settings {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings file at {}, using defaults", self.path.display());
                return Settings::default();
            }
            Err(e) => {
                warn!("Could not read settings from {}: {}", self.path.display(), e);
                return Settings::default();
            }
        };

        match serde_json::from_str::<serde_json::Value>(&content) {
            Ok(document) => {
                debug!("Loaded settings from {}", self.path.display());
                Settings::from_value(&document)
            }
            Err(e) => {
                warn!("Settings file {} is corrupt ({}), using defaults", self.path.display(), e);
                Settings::default()
            }
        }
    }

    /// Save settings, creating the parent directory if needed
    pub async fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await
                .with_context(|| format!("Failed to create settings directory {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(settings)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content).await
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path).await
            .with_context(|| format!("Failed to save settings to {}", self.path.display()))?;

        info!("Saved settings to {}", self.path.display());
        Ok(())
    }

    /// Apply a partial update to the stored settings and persist the result
    pub async fn update(&self, patch: SettingsPatch) -> Result<Settings> {
        let mut settings = self.load().await;
        settings.apply(patch);
        let settings = settings.normalized();
        settings.validate()?;
        self.save(&settings).await?;
        Ok(settings)
    }

    /// Reset to defaults and persist
    pub async fn reset(&self) -> Result<Settings> {
        let settings = Settings::default();
        self.save(&settings).await?;
        Ok(settings)
    }
}
