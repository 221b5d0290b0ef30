//! Configuration types for reading and embedding settings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::marker::{SETTING_VERSION, marker_prefix};

/// Errors that can occur when loading or validating a settings configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// JSON deserialization failed.
    #[error("invalid config JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A field value is out of its valid range.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// The name of the field that failed validation.
        field: String,
        /// A human-readable explanation of why the field value is invalid.
        reason: String,
    },
}

/// Complete configuration: reader + writer settings.
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsConfig {
    /// Settings for extracting profiles from g-code.
    pub reader: ReaderConfig,
    /// Settings for embedding profiles into g-code.
    pub writer: WriterConfig,
}

/// How the g-code profile reader recognises files and tags the result.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReaderConfig {
    /// Only marker lines of this version are read.
    pub setting_version: u32,
    /// Required file extension, without the dot. Compared case-sensitively.
    pub extension: String,
    /// Value stored under the `type` metadata key of every profile read.
    pub profile_type: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            setting_version: SETTING_VERSION,
            extension: "gcode".into(),
            profile_type: "quality".into(),
        }
    }
}

/// How serialized profiles are laid out as marker lines.
///
/// Defaults to 80-column lines, prefix included.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WriterConfig {
    /// Version tag written into each marker prefix.
    pub setting_version: u32,
    /// Maximum length of a marker line in characters, excluding the newline.
    pub line_width: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            setting_version: SETTING_VERSION,
            line_width: 80,
        }
    }
}

impl WriterConfig {
    /// Length of the marker prefix in characters, trailing space included.
    pub fn prefix_len(&self) -> usize {
        marker_prefix(self.setting_version).chars().count()
    }

    /// Payload characters per marker line.
    ///
    /// Never less than one. When `line_width` leaves no room after the
    /// prefix, each line carries a single payload character and is wider
    /// than `line_width`; [`load_config_from_str`] rejects such widths.
    pub fn chunk_len(&self) -> usize {
        self.line_width.saturating_sub(self.prefix_len()).max(1)
    }
}

/// Load and validate a [`SettingsConfig`] from a JSON string.
///
/// Missing fields fall back to their defaults. Validation:
/// - `reader.extension` must be non-empty and must not start with `.`
/// - `reader.profile_type` must be non-empty
/// - `writer.line_width` must leave room for at least one payload character
///   after the marker prefix
pub fn load_config_from_str(s: &str) -> Result<SettingsConfig, ConfigError> {
    let config: SettingsConfig = serde_json::from_str(s)?;

    if config.reader.extension.trim().is_empty() {
        return Err(ConfigError::InvalidField {
            field: "reader.extension".into(),
            reason: "must not be empty".into(),
        });
    }
    if config.reader.extension.starts_with('.') {
        return Err(ConfigError::InvalidField {
            field: "reader.extension".into(),
            reason: format!(
                "'{}' must not include the leading dot",
                config.reader.extension
            ),
        });
    }
    if config.reader.profile_type.trim().is_empty() {
        return Err(ConfigError::InvalidField {
            field: "reader.profile_type".into(),
            reason: "must not be empty".into(),
        });
    }
    if config.writer.line_width <= config.writer.prefix_len() {
        return Err(ConfigError::InvalidField {
            field: "writer.line_width".into(),
            reason: format!(
                "{} leaves no room after the marker prefix",
                config.writer.line_width
            ),
        });
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = SettingsConfig::default();
        assert_eq!(c.reader.setting_version, 2);
        assert_eq!(c.reader.extension, "gcode");
        assert_eq!(c.reader.profile_type, "quality");
        assert_eq!(c.writer.line_width, 80);
        assert_eq!(c.writer.chunk_len(), 69);
        assert_eq!(c.writer.prefix_len(), 11);
    }

    #[test]
    fn empty_object_uses_defaults() {
        assert_eq!(load_config_from_str("{}").unwrap(), SettingsConfig::default());
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let c = load_config_from_str(r#"{ "writer": { "line_width": 120 } }"#).unwrap();
        assert_eq!(c.writer.line_width, 120);
        assert_eq!(c.writer.setting_version, 2);
        assert_eq!(c.reader, ReaderConfig::default());
    }

    #[test]
    fn unknown_field_rejected() {
        let err = load_config_from_str(r#"{ "reader": { "extention": "gco" } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidJson(_)), "{err}");
    }

    #[test]
    fn leading_dot_extension_rejected() {
        let err = load_config_from_str(r#"{ "reader": { "extension": ".gcode" } }"#).unwrap_err();
        assert!(err.to_string().contains("reader.extension"), "{err}");
    }

    #[test]
    fn empty_profile_type_rejected() {
        let err = load_config_from_str(r#"{ "reader": { "profile_type": " " } }"#).unwrap_err();
        assert!(err.to_string().contains("reader.profile_type"), "{err}");
    }

    #[test]
    fn line_width_must_exceed_prefix() {
        let err = load_config_from_str(r#"{ "writer": { "line_width": 11 } }"#).unwrap_err();
        assert!(err.to_string().contains("writer.line_width"), "{err}");
        assert!(load_config_from_str(r#"{ "writer": { "line_width": 12 } }"#).is_ok());
    }

    #[test]
    fn malformed_json_rejected() {
        assert!(load_config_from_str("not json").is_err());
    }
}
