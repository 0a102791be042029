//! # Configuration Management Module
//!
//! Questo modulo definisce le impostazioni utente della compressione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Settings` con tutti i parametri modificabili dall'utente
//! - Definisce `SettingsPatch` per aggiornamenti parziali (dialog impostazioni, CLI)
//! - Fornisce validazione e normalizzazione dei valori
//! - Fornisce valori di default sensati per tutti i parametri
//!
//! ## Parametri di configurazione:
//! - `jpeg_quality`: Qualità JPEG (1-100, default: 60)
//! - `pdf_quality`: Preset Ghostscript (`/screen`, `/ebook`, `/printer`, `/prepress`)
//! - `auto_overwrite`: Sostituisce il file originale (default: true)
//! - `show_progress`: Mostra la barra di progresso (default: true)
//! - `play_sound`: Suono a fine batch (default: true)
//! - `output_directory`: Directory di output (default: None = accanto all'originale)
//! - `language`: Codice lingua UI (default: "en")
//! - `tool_timeout_secs`: Timeout per file (default: 600, None = nessun limite)
//!
//! ## Esempio:
//! ```rust,ignore
//! let mut settings = Settings::default();
//! settings.apply(SettingsPatch {
//!     jpeg_quality: Some(75),
//!     ..Default::default()
//! });
//! settings.validate()?;
//! ```

use crate::i18n;
use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_JPEG_QUALITY: u8 = 60;
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 600;

/// Ghostscript `-dPDFSETTINGS` presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PdfPreset {
    /// 72 dpi images, smallest output
    #[default]
    #[serde(rename = "/screen")]
    Screen,
    /// 150 dpi images
    #[serde(rename = "/ebook")]
    Ebook,
    /// 300 dpi images
    #[serde(rename = "/printer")]
    Printer,
    /// 300 dpi, color preserving
    #[serde(rename = "/prepress")]
    Prepress,
}

impl PdfPreset {
    pub const ALL: [PdfPreset; 4] = [
        PdfPreset::Screen,
        PdfPreset::Ebook,
        PdfPreset::Printer,
        PdfPreset::Prepress,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PdfPreset::Screen => "/screen",
            PdfPreset::Ebook => "/ebook",
            PdfPreset::Printer => "/printer",
            PdfPreset::Prepress => "/prepress",
        }
    }
}

impl FromStr for PdfPreset {
    type Err = anyhow::Error;

    /// Accepts both `/screen` and `screen`
    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().trim_start_matches('/').to_ascii_lowercase();
        PdfPreset::ALL
            .into_iter()
            .find(|preset| preset.as_str()[1..] == name)
            .ok_or_else(|| anyhow::anyhow!("Unknown PDF quality preset '{}' (expected one of /screen, /ebook, /printer, /prepress)", s))
    }
}

impl std::fmt::Display for PdfPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User settings consumed by the compressors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
    /// Ghostscript preset for PDF output
    pub pdf_quality: PdfPreset,
    /// Replace the input file instead of writing `<name>_compressed.<ext>`
    pub auto_overwrite: bool,
    /// Show the progress bar
    pub show_progress: bool,
    /// Play a sound when a batch finishes
    pub play_sound: bool,
    /// Output directory (None = alongside the input)
    pub output_directory: Option<PathBuf>,
    /// UI language code
    pub language: String,
    /// Upper bound for one file's compression (None = unbounded)
    pub tool_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            pdf_quality: PdfPreset::default(),
            auto_overwrite: true,
            show_progress: true,
            play_sound: true,
            output_directory: None,
            language: i18n::DEFAULT_LANGUAGE.to_string(),
            tool_timeout_secs: Some(DEFAULT_TOOL_TIMEOUT_SECS),
        }
    }
}

impl Settings {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(anyhow::anyhow!("JPEG quality must be between 1 and 100"));
        }

        if !i18n::is_supported_language(&self.language) {
            return Err(anyhow::anyhow!("Unsupported language: {}", self.language));
        }

        if self.tool_timeout_secs == Some(0) {
            return Err(anyhow::anyhow!("Tool timeout must be greater than 0 seconds"));
        }

        if let Some(ref output_dir) = self.output_directory {
            if output_dir.exists() && !output_dir.is_dir() {
                return Err(anyhow::anyhow!("Output path is not a directory: {}", output_dir.display()));
            }
        }

        Ok(())
    }

    /// Settings from a parsed settings document, one field at a time.
    ///
    /// A field of the wrong type or out of range falls back (or is clamped)
    /// on its own; the other fields are kept.
    pub fn from_value(document: &Value) -> Self {
        let defaults = Settings::default();
        let Some(fields) = document.as_object() else {
            warn!("Settings document is not a JSON object, using defaults");
            return defaults;
        };

        let jpeg_quality = match fields.get("jpeg_quality") {
            None => defaults.jpeg_quality,
            Some(raw) => match raw.as_i64() {
                Some(quality) => {
                    let clamped = quality.clamp(1, 100) as u8;
                    if i64::from(clamped) != quality {
                        warn!("JPEG quality {} out of range, using {}", quality, clamped);
                    }
                    clamped
                }
                None => {
                    warn!("Ignoring invalid jpeg_quality {}", raw);
                    defaults.jpeg_quality
                }
            },
        };

        let pdf_quality = match fields.get("pdf_quality") {
            None => defaults.pdf_quality,
            Some(raw) => match raw.as_str().map(PdfPreset::from_str) {
                Some(Ok(preset)) => preset,
                _ => {
                    warn!("Ignoring invalid pdf_quality {}", raw);
                    defaults.pdf_quality
                }
            },
        };

        Settings {
            jpeg_quality,
            pdf_quality,
            auto_overwrite: field(fields, "auto_overwrite", defaults.auto_overwrite),
            show_progress: field(fields, "show_progress", defaults.show_progress),
            play_sound: field(fields, "play_sound", defaults.play_sound),
            output_directory: field(fields, "output_directory", defaults.output_directory),
            language: field(fields, "language", defaults.language),
            tool_timeout_secs: field(fields, "tool_timeout_secs", defaults.tool_timeout_secs),
        }
        .normalized()
    }

    /// Bring out-of-range values back into their valid range
    pub fn normalized(mut self) -> Self {
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            let clamped = self.jpeg_quality.clamp(1, 100);
            warn!("JPEG quality {} out of range, using {}", self.jpeg_quality, clamped);
            self.jpeg_quality = clamped;
        }

        if !i18n::is_supported_language(&self.language) {
            warn!("Language '{}' not supported, falling back to {}", self.language, i18n::DEFAULT_LANGUAGE);
            self.language = i18n::DEFAULT_LANGUAGE.to_string();
        }

        if self.tool_timeout_secs == Some(0) {
            self.tool_timeout_secs = Some(DEFAULT_TOOL_TIMEOUT_SECS);
        }

        self
    }

    /// Apply a partial update
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(quality) = patch.jpeg_quality {
            self.jpeg_quality = quality;
        }
        if let Some(preset) = patch.pdf_quality {
            self.pdf_quality = preset;
        }
        if let Some(overwrite) = patch.auto_overwrite {
            self.auto_overwrite = overwrite;
        }
        if let Some(show) = patch.show_progress {
            self.show_progress = show;
        }
        if let Some(sound) = patch.play_sound {
            self.play_sound = sound;
        }
        if let Some(dir) = patch.output_directory {
            self.output_directory = dir;
        }
        if let Some(language) = patch.language {
            self.language = language;
        }
        if let Some(timeout) = patch.tool_timeout_secs {
            self.tool_timeout_secs = timeout;
        }
    }

    pub fn tool_timeout(&self) -> Option<Duration> {
        self.tool_timeout_secs.map(Duration::from_secs)
    }
}

/// `key` from `fields`, or `fallback` when missing or of the wrong type
fn field<T: DeserializeOwned>(fields: &Map<String, Value>, key: &str, fallback: T) -> T {
    match fields.get(key) {
        None => fallback,
        Some(raw) => serde_json::from_value(raw.clone()).unwrap_or_else(|e| {
            warn!("Ignoring invalid {} {}: {}", key, raw, e);
            fallback
        }),
    }
}

/// Partial settings update; `None` leaves the field unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsPatch {
    pub jpeg_quality: Option<u8>,
    pub pdf_quality: Option<PdfPreset>,
    pub auto_overwrite: Option<bool>,
    pub show_progress: Option<bool>,
    pub play_sound: Option<bool>,
    /// `Some(None)` clears the output directory
    pub output_directory: Option<Option<PathBuf>>,
    pub language: Option<String>,
    /// `Some(None)` disables the timeout
    pub tool_timeout_secs: Option<Option<u64>>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
