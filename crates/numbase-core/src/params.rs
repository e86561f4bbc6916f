//! Step parameters: how a host pipeline configures the processor.
//!
//! Parameters are serializable so they can live next to the rest of a
//! pipeline definition, in JSON, YAML or TOML:
//!
//! ```yaml
//! inputColumn: code
//! outputColumn: code_decimal
//! processingMode: HEXA_TO_DECIMAL
//! ```

use crate::direction::{ConversionDirection, UnknownDirection};
use serde::{Deserialize, Serialize};

/// Parameters of a numeric base conversion step.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepParams {
    /// Column holding the numerals to convert.
    #[serde(default)]
    pub input_column: String,

    /// Column receiving the converted numerals.
    ///
    /// When missing or blank, results are written back into the input column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_column: Option<String>,

    /// Conversion direction.
    #[serde(default)]
    pub processing_mode: Option<ConversionDirection>,
}

impl StepParams {
    /// Create parameters reading from `input_column`.
    pub fn new(input_column: impl Into<String>) -> Self {
        Self {
            input_column: input_column.into(),
            ..Self::default()
        }
    }

    /// Set the output column.
    pub fn output_column(mut self, column: impl Into<String>) -> Self {
        self.output_column = Some(column.into());
        self
    }

    /// Set the conversion direction.
    pub fn processing_mode(mut self, direction: ConversionDirection) -> Self {
        self.processing_mode = Some(direction);
        self
    }

    /// Validate the parameters before any row is processed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.direction()?;
        if self.input_column.trim().is_empty() {
            return Err(ConfigError::MissingInputColumn);
        }
        Ok(())
    }

    /// The configured direction.
    pub fn direction(&self) -> Result<ConversionDirection, ConfigError> {
        self.processing_mode.ok_or(ConfigError::MissingDirection)
    }

    /// The column results are written to, falling back to the input column.
    pub fn resolved_output_column(&self) -> &str {
        match self.output_column.as_deref() {
            Some(column) if !column.trim().is_empty() => column,
            _ => &self.input_column,
        }
    }

    /// Parse parameters from bytes, detecting the format from `path`.
    ///
    /// Defaults to YAML (a superset of JSON) when the path gives no hint.
    pub fn from_bytes(data: &[u8], path: Option<&str>) -> Result<Self, ConfigError> {
        let format = path.and_then(detect_format).unwrap_or("yaml");
        Self::from_bytes_format(data, format)
    }

    /// Parse parameters from bytes with an explicit format.
    ///
    /// An unrecognized `processingMode` is reported as
    /// [`ConfigError::UnknownDirection`], not as a parse error.
    pub fn from_bytes_format(data: &[u8], format: &str) -> Result<Self, ConfigError> {
        let raw: RawStepParams = match format {
            "json" => serde_json::from_slice(data).map_err(|e| ConfigError::Parse(e.to_string()))?,
            "yaml" | "yml" => {
                serde_yaml::from_slice(data).map_err(|e| ConfigError::Parse(e.to_string()))?
            }
            "toml" => {
                let s = std::str::from_utf8(data)
                    .map_err(|e| ConfigError::Parse(format!("Invalid UTF-8: {}", e)))?;
                toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?
            }
            _ => {
                return Err(ConfigError::Parse(format!(
                    "Unsupported params format: {}",
                    format
                )));
            }
        };
        raw.try_into()
    }

    /// Serialize parameters to bytes.
    pub fn to_bytes(&self, format: &str) -> Result<Vec<u8>, ConfigError> {
        match format {
            "json" => {
                serde_json::to_vec_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            "yaml" | "yml" => serde_yaml::to_string(self)
                .map(|s| s.into_bytes())
                .map_err(|e| ConfigError::Parse(e.to_string())),
            "toml" => toml::to_string_pretty(self)
                .map(|s| s.into_bytes())
                .map_err(|e| ConfigError::Parse(e.to_string())),
            _ => Err(ConfigError::Parse(format!(
                "Unsupported params format: {}",
                format
            ))),
        }
    }
}

/// Step parameters as written in a file, direction not yet resolved.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStepParams {
    #[serde(default)]
    input_column: String,
    #[serde(default)]
    output_column: Option<String>,
    #[serde(default)]
    processing_mode: Option<String>,
}

impl TryFrom<RawStepParams> for StepParams {
    type Error = ConfigError;

    fn try_from(raw: RawStepParams) -> Result<Self, Self::Error> {
        let processing_mode = raw
            .processing_mode
            .as_deref()
            .map(ConversionDirection::from_id)
            .transpose()?;
        Ok(StepParams {
            input_column: raw.input_column,
            output_column: raw.output_column,
            processing_mode,
        })
    }
}

/// Detect a params format from a file path extension.
fn detect_format(path: &str) -> Option<&'static str> {
    let ext = path.rsplit('.').next()?;
    match ext.to_lowercase().as_str() {
        "json" => Some("json"),
        "yaml" | "yml" => Some("yaml"),
        "toml" => Some("toml"),
        _ => None,
    }
}

/// Errors in how a conversion step is configured.
///
/// These are fatal at setup time: a pipeline must not start with them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown conversion direction: '{0}'")]
    UnknownDirection(String),

    #[error("no conversion direction configured")]
    MissingDirection,

    #[error("no input column configured")]
    MissingInputColumn,

    #[error("unknown processor: '{0}'")]
    UnknownProcessor(String),

    #[error("failed to parse params: {0}")]
    Parse(String),
}

impl From<UnknownDirection> for ConfigError {
    fn from(err: UnknownDirection) -> Self {
        ConfigError::UnknownDirection(err.0)
    }
}
