//! Typed errors for container deserialization.

use std::ops::Range;

/// Errors that can occur when deserializing an instance container.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContainerError {
    // -- Structure --
    /// A required section (e.g. `[general]`) is absent.
    #[error("missing section [{0}]")]
    MissingSection(String),

    /// A required key is absent from its section.
    #[error("missing key '{key}' in section [{section}]")]
    MissingKey {
        /// Section that should contain the key.
        section: String,
        /// The key that was not found.
        key: String,
    },

    // -- Versioning --
    /// The document declares a format version this container cannot read.
    #[error("incorrect container version {found} (expected {expected})")]
    IncorrectVersion {
        /// Version declared by the document.
        found: u32,
        /// Version this implementation reads and writes.
        expected: u32,
    },

    /// `general.version` is not an unsigned integer.
    #[error("invalid container version '{0}'")]
    InvalidVersion(String),

    // -- Syntax --
    /// A line could not be parsed.
    #[error("line {line}: {message}")]
    Syntax {
        /// 1-based line number.
        line: usize,
        /// Byte range of the offending line within the input.
        span: Range<usize>,
        /// Human-readable description of the problem.
        message: String,
    },

    /// The same section header appears twice.
    #[error("line {line}: duplicate section [{name}]")]
    DuplicateSection {
        /// Section name.
        name: String,
        /// 1-based line number of the second header.
        line: usize,
        /// Byte range of the second header.
        span: Range<usize>,
    },

    /// The same key appears twice within one section.
    #[error("line {line}: duplicate key '{key}' in section [{section}]")]
    DuplicateKey {
        /// Section containing the key.
        section: String,
        /// The repeated key.
        key: String,
        /// 1-based line number of the repeated key.
        line: usize,
        /// Byte range of the repeated key line.
        span: Range<usize>,
    },
}

impl ContainerError {
    /// Byte range within the serialized input that caused this error, if the
    /// error points at a specific line.
    pub fn span(&self) -> Option<Range<usize>> {
        match self {
            ContainerError::Syntax { span, .. }
            | ContainerError::DuplicateSection { span, .. }
            | ContainerError::DuplicateKey { span, .. } => Some(span.clone()),
            _ => None,
        }
    }
}
