//! Configuration file and presets support.

use indexmap::IndexMap;
use rhi_numbase_core::{ConfigError, ConversionDirection, StepParams};
use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default CLI options.
    pub defaults: Defaults,
    /// User-defined presets.
    pub presets: IndexMap<String, Preset>,
}

/// Default CLI options.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Enable verbose output by default.
    pub verbose: bool,
    /// Enable quiet output by default.
    pub quiet: bool,
    /// Conversion mode used when none is given.
    pub mode: Option<String>,
    /// Worker threads for row processing.
    pub jobs: Option<usize>,
}

/// A preset is a saved processing step.
///
/// ```toml
/// [presets.codes]
/// input_column = "code"
/// output_column = "code_decimal"
/// mode = "HEXA_TO_DECIMAL"
/// ```
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Preset {
    pub input_column: Option<String>,
    pub output_column: Option<String>,
    pub mode: Option<String>,
}

impl Preset {
    /// Merge another preset into this one (other takes precedence).
    pub fn merge(&mut self, other: &Preset) {
        if other.input_column.is_some() {
            self.input_column = other.input_column.clone();
        }
        if other.output_column.is_some() {
            self.output_column = other.output_column.clone();
        }
        if other.mode.is_some() {
            self.mode = other.mode.clone();
        }
    }

    /// Overwrite the fields of `params` this preset sets.
    pub fn apply(&self, params: &mut StepParams) -> Result<(), ConfigError> {
        if let Some(ref column) = self.input_column {
            params.input_column = column.clone();
        }
        if let Some(ref column) = self.output_column {
            params.output_column = Some(column.clone());
        }
        if let Some(ref mode) = self.mode {
            params.processing_mode = Some(ConversionDirection::from_id(mode)?);
        }
        Ok(())
    }

    /// Short `key=value` listing of the fields this preset sets.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(ref c) = self.input_column {
            parts.push(format!("input_column={}", c));
        }
        if let Some(ref c) = self.output_column {
            parts.push(format!("output_column={}", c));
        }
        if let Some(ref m) = self.mode {
            parts.push(format!("mode={}", m));
        }
        if parts.is_empty() {
            "(empty)".into()
        } else {
            parts.join(", ")
        }
    }
}

impl Config {
    /// Load config from the default location (~/.config/numbase/config.toml).
    pub fn load() -> Self {
        Self::load_from_path(Self::default_path())
    }

    /// Load config from a specific path.
    ///
    /// Missing files give the default config; unreadable or malformed files
    /// are reported and ignored.
    pub fn load_from_path(path: Option<PathBuf>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(contents) => Self::parse(&contents).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), "failed to parse config file: {}", e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!(path = %path.display(), "failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Get the default config file path.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("numbase").join("config.toml"))
    }

    /// Get a preset by name.
    pub fn get_preset(&self, name: &str) -> Option<&Preset> {
        self.presets.get(name)
    }
}
