//! Shared test helpers for `gcode_settings_core` integration tests.

#![allow(unreachable_pub, dead_code)]

use std::fs;
use std::path::PathBuf;

use gcode_settings_container::SettingsContainer;

/// A small quality profile in container format.
pub const FINE_PROFILE: &str = "[general]\nversion = 2\nname = Fine\ndefinition = fdmprinter\n\n\
                                [metadata]\nweight = -1\n\n\
                                [values]\nlayer_height = 0.06\n";

/// Write `content` to `name` inside a fresh temp dir.
///
/// Keep the returned `TempDir` alive for as long as the file is needed.
pub fn write_temp(name: &str, content: &[u8]) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write temp file");
    (dir, path)
}

/// Container that records what it was asked to deserialize and never fails.
#[derive(Debug, Default)]
pub struct RecordingContainer {
    pub serialized: Option<String>,
    pub metadata: Vec<(String, String)>,
}

impl SettingsContainer for RecordingContainer {
    type Error = std::io::Error;

    fn deserialize(&mut self, serialized: &str) -> Result<(), Self::Error> {
        self.serialized = Some(serialized.to_string());
        Ok(())
    }

    fn add_metadata_entry(&mut self, key: &str, value: &str) {
        if SettingsContainer::metadata(self, key).is_none() {
            self.metadata.push((key.to_string(), value.to_string()));
        }
    }

    fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Container whose deserialization always fails.
#[derive(Debug, Default)]
pub struct FailingContainer;

impl SettingsContainer for FailingContainer {
    type Error = std::io::Error;

    fn deserialize(&mut self, _serialized: &str) -> Result<(), Self::Error> {
        Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "not a profile",
        ))
    }

    fn add_metadata_entry(&mut self, _key: &str, _value: &str) {
        panic!("metadata must not be added after a failed deserialize");
    }

    fn metadata(&self, _key: &str) -> Option<&str> {
        None
    }
}
