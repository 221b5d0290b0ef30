//! Print profiles embedded in g-code.
//!
//! Slicers append the profile a file was sliced with as escaped comment
//! lines (`;SETTING_2 ...`). This crate reads those lines back into an
//! [`InstanceContainer`](gcode_settings_container::InstanceContainer) and
//! writes them out again.
//!
//! - [`marker`]: marker prefixes and payload extraction
//! - [`escape`]: comment-safe escaping of the serialized profile
//! - [`reader`]: [`GCodeProfileReader`], the file-level reader
//! - [`writer`]: embedding a profile into g-code
//! - [`config`]: reader/writer configuration

pub mod config;
pub mod escape;
pub mod marker;
pub mod reader;
pub mod writer;

pub use config::{ConfigError, ReaderConfig, SettingsConfig, WriterConfig, load_config_from_str};
pub use escape::{escape, unescape};
pub use marker::{SETTING_VERSION, extract_payload, marker_prefix};
pub use reader::{GCodeProfileReader, ProfileReader, ReadError};
pub use writer::{embed_profile, serialize_settings, strip_settings};
