//! Reading print profiles back out of g-code files.

use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufReader};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use gcode_settings_container::{InstanceContainer, SettingsContainer};

use crate::config::ReaderConfig;
use crate::escape::unescape;
use crate::marker::{extract_payload, marker_prefix};

/// Metadata key the profile kind is stored under.
pub const TYPE_METADATA_KEY: &str = "type";

/// Reads a profile out of a file. Hosts register one reader per file kind.
pub trait ProfileReader {
    /// The profile type produced.
    type Profile;

    /// Read the profile stored in `path`.
    ///
    /// Returns `None` when the file is not handled by this reader or holds no
    /// loadable profile. Failures are logged, never propagated.
    fn read(&self, path: &Path) -> Option<Self::Profile>;
}

/// Errors from scanning a g-code file for marker lines.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// The file could not be opened.
    #[error("unable to open file {} for reading: {source}", path.display())]
    Open {
        /// File that was attempted.
        path: PathBuf,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// Reading failed part-way through the file.
    #[error("unable to read file {}: {source}", path.display())]
    Read {
        /// File being read.
        path: PathBuf,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },
}

/// Reads the profile a slicer embedded in a g-code file.
///
/// Only files with the configured extension (`gcode`) are considered. All
/// `;SETTING_2 ` lines are concatenated in file order, unescaped and
/// deserialized into a fresh `C`, which is then tagged `type = quality`.
/// The id and name of the result are left for the caller's registry to set.
///
/// ```no_run
/// use std::path::Path;
/// use gcode_settings_core::{GCodeProfileReader, ProfileReader};
///
/// let reader = GCodeProfileReader::new();
/// if let Some(profile) = reader.read(Path::new("benchy.gcode")) {
///     println!("layer height: {:?}", profile.value("layer_height"));
/// }
/// ```
#[derive(Debug, Clone)]
pub struct GCodeProfileReader<C = InstanceContainer> {
    config: ReaderConfig,
    prefix: String,
    _container: PhantomData<fn() -> C>,
}

impl GCodeProfileReader {
    /// Reader producing [`InstanceContainer`]s with the default configuration.
    pub fn new() -> Self {
        Self::from_config(ReaderConfig::default())
    }
}

impl Default for GCodeProfileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: SettingsContainer> GCodeProfileReader<C> {
    /// Reader producing `C` with the given configuration.
    pub fn from_config(config: ReaderConfig) -> Self {
        let prefix = marker_prefix(config.setting_version);
        Self {
            config,
            prefix,
            _container: PhantomData,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// The marker prefix this reader matches, e.g. `;SETTING_2 `.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether `path` has exactly the configured extension.
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension().and_then(OsStr::to_str) == Some(self.config.extension.as_str())
    }

    /// Scan `path` and return its unescaped serialized profile.
    ///
    /// Returns `Ok(None)` without touching the file when the extension is not
    /// accepted. A file without marker lines yields `Ok(Some(""))`.
    pub fn read_serialized(&self, path: &Path) -> Result<Option<String>, ReadError> {
        if !self.accepts(path) {
            return Ok(None);
        }

        let file = File::open(path).map_err(|source| ReadError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        // The scan walks forward through the whole file; marker lines are
        // usually at the end but may appear anywhere.
        let payload =
            extract_payload(BufReader::new(file), &self.prefix).map_err(|source| {
                ReadError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            })?;

        Ok(Some(unescape(&payload)))
    }

    /// Build a profile from an already unescaped serialized string.
    ///
    /// Deserializes into a fresh `C` and adds the `type` metadata entry.
    pub fn load_profile(&self, serialized: &str) -> Result<C, C::Error> {
        let mut profile = C::default();
        profile.deserialize(serialized)?;
        profile.add_metadata_entry(TYPE_METADATA_KEY, &self.config.profile_type);
        Ok(profile)
    }
}

impl<C: SettingsContainer> ProfileReader for GCodeProfileReader<C> {
    type Profile = C;

    fn read(&self, path: &Path) -> Option<C> {
        let serialized = match self.read_serialized(path) {
            Ok(Some(serialized)) => serialized,
            Ok(None) => {
                log::debug!("Skipping {}: not a .{} file", path.display(), self.config.extension);
                return None;
            }
            Err(e) => {
                log::error!("{e}");
                return None;
            }
        };
        log::info!("Serialized the following from {}: {:?}", path.display(), serialized);

        match self.load_profile(&serialized) {
            Ok(profile) => Some(profile),
            Err(e) => {
                log::error!("Unable to deserialize the profile from {}: {e}", path.display());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_only_exact_extension() {
        let reader = GCodeProfileReader::new();
        assert!(reader.accepts(Path::new("print.gcode")));
        assert!(reader.accepts(Path::new("dir.v2/print.gcode")));
        assert!(!reader.accepts(Path::new("profile.txt")));
        assert!(!reader.accepts(Path::new("print.GCODE")));
        assert!(!reader.accepts(Path::new("print.gcode.bak")));
        assert!(!reader.accepts(Path::new("gcode")));
    }

    #[test]
    fn rejected_extension_is_not_opened() {
        // The file does not exist; an open attempt would be an error.
        let reader = GCodeProfileReader::new();
        let result = reader.read_serialized(Path::new("/nonexistent/profile.txt"));
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let reader = GCodeProfileReader::new();
        let err = reader
            .read_serialized(Path::new("/nonexistent/print.gcode"))
            .unwrap_err();
        assert!(matches!(err, ReadError::Open { .. }));
        assert!(err.to_string().contains("unable to open file"), "{err}");
    }

    #[test]
    fn load_profile_tags_quality() {
        let reader = GCodeProfileReader::new();
        let profile = reader
            .load_profile("[general]\nversion = 2\nname = Fine\ndefinition = fdmprinter\n")
            .unwrap();
        assert_eq!(profile.name, "Fine");
        assert_eq!(profile.metadata.get("type").map(String::as_str), Some("quality"));
        assert!(profile.id.is_empty());
    }

    #[test]
    fn load_profile_keeps_embedded_type() {
        let reader = GCodeProfileReader::new();
        let profile = reader
            .load_profile("[general]\nversion = 2\ndefinition = fdmprinter\n[metadata]\ntype = material\n")
            .unwrap();
        assert_eq!(profile.metadata["type"], "material");
    }

    #[test]
    fn custom_version_changes_prefix() {
        let mut config = ReaderConfig::default();
        config.setting_version = 3;
        let reader = GCodeProfileReader::<InstanceContainer>::from_config(config);
        assert_eq!(reader.prefix(), ";SETTING_3 ");
    }
}
