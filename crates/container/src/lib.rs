//! Instance containers for slicer print profiles.
//!
//! An [`InstanceContainer`] holds one layer of setting overrides (a quality
//! profile, a material, a per-object override) together with a little
//! metadata. Containers round-trip through a version-tagged INI document:
//!
//! ```text
//! [general]
//! version = 2
//! name = Fine
//! definition = fdmprinter
//!
//! [metadata]
//! type = quality
//!
//! [values]
//! layer_height = 0.06
//! ```
//!
//! Readers that build profiles from foreign files are generic over the
//! [`SettingsContainer`] trait so that tests and hosts can substitute their
//! own container type.

mod error;
mod format;

pub use error::ContainerError;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Serialization format version written to and required from `general.version`.
pub const CONTAINER_VERSION: u32 = 2;

/// Capability required from anything a profile reader deserializes into.
pub trait SettingsContainer: Default {
    /// Error produced when the serialized text cannot be loaded.
    type Error: std::error::Error;

    /// Replace this container's contents with the deserialized `serialized`.
    ///
    /// On error the container must be left unchanged.
    fn deserialize(&mut self, serialized: &str) -> Result<(), Self::Error>;

    /// Add a metadata entry. Existing entries are not overwritten.
    fn add_metadata_entry(&mut self, key: &str, value: &str);

    /// Look up a metadata entry.
    fn metadata(&self, key: &str) -> Option<&str>;
}

/// A named set of setting values plus metadata.
///
/// A freshly constructed container has an empty id; the id and name of an
/// imported profile are assigned afterwards by whatever registry stores it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstanceContainer {
    /// Unique container id.
    pub id: String,
    /// Human-readable name. Defaults to the id when absent from the document.
    pub name: String,
    /// Id of the setting definition these values apply to (e.g. `fdmprinter`).
    pub definition: String,
    /// Free-form metadata such as `type = quality`.
    pub metadata: BTreeMap<String, String>,
    /// Setting values keyed by setting key. Values are kept verbatim,
    /// including formulas (`=layer_height * 2`).
    pub values: BTreeMap<String, String>,
}

impl InstanceContainer {
    /// Create an empty container with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Set the display name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Set or overwrite a metadata entry.
    pub fn set_metadata_entry(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Set a setting value.
    pub fn set_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Look up a setting value.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Serialize to the versioned INI document format.
    pub fn to_serialized(&self) -> String {
        let mut out = String::new();
        let version = CONTAINER_VERSION.to_string();
        format::write_section(
            &mut out,
            "general",
            [
                ("version", version.as_str()),
                ("name", self.name.as_str()),
                ("definition", self.definition.as_str()),
            ],
        );
        format::write_section(
            &mut out,
            "metadata",
            self.metadata.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        );
        format::write_section(
            &mut out,
            "values",
            self.values.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        );
        out
    }
}

impl SettingsContainer for InstanceContainer {
    type Error = ContainerError;

    /// Load from the versioned INI document format.
    ///
    /// `[general]` with `version` and `definition` is required; `[metadata]`
    /// and `[values]` replace the current maps when present and clear them
    /// otherwise. Unknown sections and keys are ignored.
    fn deserialize(&mut self, serialized: &str) -> Result<(), ContainerError> {
        let doc = format::parse(serialized)?;

        let general = doc
            .section("general")
            .ok_or_else(|| ContainerError::MissingSection("general".into()))?;
        let missing = |key: &str| ContainerError::MissingKey {
            section: "general".into(),
            key: key.into(),
        };

        let raw_version = general.get("version").ok_or_else(|| missing("version"))?;
        let version: u32 = raw_version
            .parse()
            .map_err(|_| ContainerError::InvalidVersion(raw_version.clone()))?;
        if version != CONTAINER_VERSION {
            return Err(ContainerError::IncorrectVersion {
                found: version,
                expected: CONTAINER_VERSION,
            });
        }
        let definition = general
            .get("definition")
            .ok_or_else(|| missing("definition"))?
            .clone();

        // -- Everything validated; commit --
        self.name = general.get("name").unwrap_or(&self.id).clone();
        self.definition = definition;
        self.metadata = doc.section("metadata").cloned().unwrap_or_default();
        self.values = doc.section("values").cloned().unwrap_or_default();
        Ok(())
    }

    fn add_metadata_entry(&mut self, key: &str, value: &str) {
        self.metadata
            .entry(key.to_string())
            .or_insert_with(|| value.to_string());
    }

    fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}
