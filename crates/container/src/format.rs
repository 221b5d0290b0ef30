//! Line-oriented parser and writer for the container's INI document format.
//!
//! Sections are `[name]` headers, entries are `key = value` (or `key: value`),
//! and lines starting with whitespace continue the previous value. Comments
//! start with `#` or `;` at the start of an unindented line.
//!
//! Continuation lines written by [`write_section`] carry exactly one leading
//! tab, which the parser strips; everything after it is kept verbatim. A
//! value whose first line has surrounding whitespace, or which starts with an
//! empty line, is written in block form: `key =` followed by every line as a
//! continuation. When the inline part is empty, the first continuation line
//! becomes the start of the value instead of being joined with `\n`.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::error::ContainerError;

/// A parsed INI document: sections in file order, keys sorted.
#[derive(Debug, Default)]
pub(crate) struct Document {
    sections: Vec<(String, BTreeMap<String, String>)>,
}

impl Document {
    /// Look up a section by name.
    pub(crate) fn section(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        self.sections
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, entries)| entries)
    }
}

/// The entry a continuation line would extend.
struct OpenEntry {
    key: String,
    /// Whitespace-only lines seen since the last continuation.
    pending_blank: usize,
    /// The inline value was empty and no continuation has been added yet.
    empty_head: bool,
}

impl OpenEntry {
    fn new(key: String, value: &str) -> Self {
        Self {
            key,
            pending_blank: 0,
            empty_head: value.is_empty(),
        }
    }

    /// Append one continuation line to `value`.
    fn push_line(&mut self, value: &mut String, line: &str) {
        for _ in 0..self.pending_blank {
            value.push('\n');
        }
        if !self.empty_head {
            value.push('\n');
        }
        value.push_str(line);
        self.pending_blank = 0;
        self.empty_head = false;
    }
}

/// Parse `text` into a [`Document`].
pub(crate) fn parse(text: &str) -> Result<Document, ContainerError> {
    let mut doc = Document::default();
    let mut open: Option<OpenEntry> = None;
    let mut offset = 0usize;

    for (idx, raw) in text.split_inclusive('\n').enumerate() {
        let line_no = idx + 1;
        let start = offset;
        offset += raw.len();
        let line = raw.trim_end_matches(['\n', '\r']);
        let span = start..start + line.len();

        // Continuation of a multi-line value. Checked before comments so an
        // indented `;` line stays part of the value.
        if line.starts_with([' ', '\t'])
            && let Some(entry) = open.as_mut()
            && let Some((_, entries)) = doc.sections.last_mut()
            && let Some(value) = entries.get_mut(&entry.key)
        {
            match line.strip_prefix('\t') {
                Some(rest) => entry.push_line(value, rest),
                None => match line.trim_start() {
                    "" => entry.pending_blank += 1,
                    rest => entry.push_line(value, rest),
                },
            }
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            if let Some(entry) = open.as_mut() {
                entry.pending_blank += 1;
            }
            continue;
        }

        if trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            let name = trimmed[1..trimmed.len() - 1].trim().to_string();
            if name.is_empty() {
                return Err(ContainerError::Syntax {
                    line: line_no,
                    span,
                    message: "empty section name".into(),
                });
            }
            if doc.section(&name).is_some() {
                return Err(ContainerError::DuplicateSection {
                    name,
                    line: line_no,
                    span,
                });
            }
            doc.sections.push((name, BTreeMap::new()));
            open = None;
            continue;
        }

        let Some(sep) = trimmed.find(['=', ':']) else {
            return Err(ContainerError::Syntax {
                line: line_no,
                span,
                message: format!("expected `key = value`, found `{trimmed}`"),
            });
        };
        let key = trimmed[..sep].trim().to_lowercase();
        let value = trimmed[sep + 1..].trim().to_string();
        if key.is_empty() {
            return Err(ContainerError::Syntax {
                line: line_no,
                span,
                message: "empty key".into(),
            });
        }

        let Some((section, entries)) = doc.sections.last_mut() else {
            return Err(ContainerError::Syntax {
                line: line_no,
                span,
                message: format!("key '{key}' appears before any section header"),
            });
        };
        if entries.contains_key(&key) {
            return Err(ContainerError::DuplicateKey {
                section: section.clone(),
                key,
                line: line_no,
                span,
            });
        }
        open = Some(OpenEntry::new(key.clone(), &value));
        entries.insert(key, value);
    }

    Ok(doc)
}

/// Append one `[name]` section with its entries, followed by a blank line.
///
/// Embedded newlines in values become tab-indented continuation lines, so
/// every value reads back unchanged.
pub(crate) fn write_section<'a, I>(out: &mut String, name: &str, entries: I)
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    // Writing into a String cannot fail.
    let _ = writeln!(out, "[{name}]");
    for (key, value) in entries {
        let first = value.split_once('\n').map_or(value, |(first, _)| first);
        let block = first != first.trim() || (first.is_empty() && value.contains('\n'));
        if block {
            let _ = writeln!(out, "{key} =");
            for line in value.split('\n') {
                let _ = writeln!(out, "\t{line}");
            }
        } else {
            let _ = writeln!(out, "{key} = {}", value.replace('\n', "\n\t"));
        }
    }
    out.push('\n');
}
