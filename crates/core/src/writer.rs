//! Embedding print profiles into g-code as marker lines.

use gcode_settings_container::InstanceContainer;

use crate::config::WriterConfig;
use crate::escape::escape;
use crate::marker::{is_marker_line, marker_prefix};

/// Turn a serialized profile into marker lines.
///
/// The text is escaped onto a single logical line and then cut into chunks so
/// that no line (prefix included) exceeds `config.line_width` characters,
/// unless the width leaves no room after the prefix (see
/// [`WriterConfig::chunk_len`]). Each
/// chunk is emitted as `prefix + chunk + "\n"`. Cuts may fall inside an escape
/// sequence; readers concatenate before unescaping. An empty input produces
/// no lines.
pub fn serialize_settings(serialized: &str, config: &WriterConfig) -> String {
    let prefix = marker_prefix(config.setting_version);
    let chunk_len = config.chunk_len();
    let escaped: Vec<char> = escape(serialized).chars().collect();

    let line_count = escaped.len().div_ceil(chunk_len);
    let mut out = String::with_capacity(escaped.len() + line_count * (prefix.len() + 1));
    for chunk in escaped.chunks(chunk_len) {
        out.push_str(&prefix);
        out.extend(chunk);
        out.push('\n');
    }
    out
}

/// Remove every marker line of `version` from `gcode`.
pub fn strip_settings(gcode: &str, version: u32) -> String {
    let prefix = marker_prefix(version);
    gcode
        .split_inclusive('\n')
        .filter(|line| !is_marker_line(line, &prefix))
        .collect()
}

/// Append `profile` to `gcode` as marker lines.
///
/// Marker lines of the same version already present are replaced, so
/// re-embedding never produces a concatenation of two profiles.
pub fn embed_profile(gcode: &str, profile: &InstanceContainer, config: &WriterConfig) -> String {
    let mut out = strip_settings(gcode, config.setting_version);
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&serialize_settings(&profile.to_serialized(), config));
    log::debug!(
        "Embedded profile '{}' ({} values) as ;SETTING_{} lines",
        profile.name,
        profile.values.len(),
        config.setting_version
    );
    out
}
