//! `;SETTING_<version> ` marker lines.
//!
//! A slicer stores the profile a g-code file was made with as a run of
//! comment lines, each starting with a version-tagged prefix:
//!
//! ```text
//! ;SETTING_2 [general]\nversion = 2\nname = Fine\n...
//! ;SETTING_2 ...rest of the escaped profile
//! ```
//!
//! The version is part of the prefix, so a reader only ever sees payload
//! written in the format it understands.

use std::io::{self, BufRead};

/// Format version of the embedded settings this crate reads and writes.
///
/// Bump this when the embedding changes in a way older readers cannot handle.
pub const SETTING_VERSION: u32 = 2;

/// Marker prefix for the given format version, including the trailing space.
pub fn marker_prefix(version: u32) -> String {
    format!(";SETTING_{version} ")
}

/// Whether `line` carries a payload fragment for `prefix`.
pub fn is_marker_line(line: &str, prefix: &str) -> bool {
    line.starts_with(prefix)
}

/// Concatenate the payload fragments of all lines starting with `prefix`.
///
/// Lines are scanned in order and the prefix and line terminator (`\n` or
/// `\r\n`) are removed from each match. Other lines are skipped without being
/// decoded, so binary or non-UTF-8 content elsewhere in the file is harmless;
/// fragments themselves are decoded lossily. The result is still escaped.
pub fn extract_payload<R: BufRead>(mut reader: R, prefix: &str) -> io::Result<String> {
    let prefix = prefix.as_bytes();
    let mut payload = String::new();
    let mut line = Vec::new();

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        let Some(fragment) = line.strip_prefix(prefix) else {
            continue;
        };
        let fragment = fragment.strip_suffix(b"\n").unwrap_or(fragment);
        let fragment = fragment.strip_suffix(b"\r").unwrap_or(fragment);
        payload.push_str(&String::from_utf8_lossy(fragment));
    }

    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(input: &str) -> String {
        extract_payload(input.as_bytes(), &marker_prefix(SETTING_VERSION)).unwrap()
    }

    #[test]
    fn prefix_for_current_version() {
        assert_eq!(marker_prefix(SETTING_VERSION), ";SETTING_2 ");
    }

    #[test]
    fn fragments_concatenate_in_file_order() {
        assert_eq!(extract(";SETTING_2 line1\n;SETTING_2 line2\n"), "line1line2");
    }

    #[test]
    fn interspersed_markers_are_collected() {
        let input = ";SETTING_2 a\nG1 X10 Y10\n;comment\n;SETTING_2 b\nG1 X20\n;SETTING_2 c";
        assert_eq!(extract(input), "abc");
    }

    #[test]
    fn other_versions_and_near_misses_are_ignored() {
        let input = ";SETTING_1 old\n;SETTING_3 new\n;SETTING_2x\n ;SETTING_2 indented\n\
                     ;SETTING_20 wide\n;setting_2 lower\n";
        assert_eq!(extract(input), "");
    }

    #[test]
    fn crlf_terminators_are_stripped() {
        assert_eq!(extract(";SETTING_2 a\r\n;SETTING_2 b\r\n"), "ab");
    }

    #[test]
    fn fragment_whitespace_is_preserved() {
        assert_eq!(extract(";SETTING_2  lead and trail \n"), " lead and trail ");
    }

    #[test]
    fn escapes_are_left_in_place() {
        assert_eq!(extract(";SETTING_2 a\\nb\n"), "a\\nb");
    }

    #[test]
    fn non_utf8_lines_do_not_abort_the_scan() {
        let mut input = b";SETTING_2 a\n; object \xff\xfe\n".to_vec();
        input.extend_from_slice(b";SETTING_2 b\n");
        let payload = extract_payload(&input[..], ";SETTING_2 ").unwrap();
        assert_eq!(payload, "ab");
    }

    #[test]
    fn empty_input() {
        assert_eq!(extract(""), "");
    }

    #[test]
    fn marker_line_detection() {
        assert!(is_marker_line(";SETTING_2 x", ";SETTING_2 "));
        assert!(!is_marker_line(";SETTING_1 x", ";SETTING_2 "));
    }
}
