// elassets-parsers/src/traits.rs
//! Core traits defining the decoder interface for all asset formats.
//!
//! This module establishes a unified decoding interface that enables:
//! - Dynamic decoder registration and discovery
//! - Consistent error handling across all formats
//! - Shared resource limits through [`DecodeOptions`]

use std::str::Utf8Error;

use thiserror::Error;

/// Errors that can occur during decoding operations
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Invalid magic bytes: expected {expected:?}, found {found:?}")]
    InvalidMagic { expected: Vec<u8>, found: Vec<u8> },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: String },

    #[error("Size mismatch in {section}: declared {declared} bytes, expected {expected}")]
    SizeMismatch {
        section: &'static str,
        declared: u64,
        expected: u64,
    },

    #[error("Out of bounds: {requested} bytes requested at offset {offset}, {available} available")]
    OutOfBounds {
        offset: usize,
        requested: usize,
        available: usize,
    },

    #[error("Unsupported variant: {0}")]
    UnsupportedVariant(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value on line {line}: {message}")]
    InvalidValue { line: usize, message: String },

    #[error("Invalid text: {0}")]
    InvalidText(#[from] Utf8Error),

    #[error("Too many {what}: {count} exceeds limit of {limit}")]
    LimitExceeded {
        what: &'static str,
        count: u64,
        limit: u64,
    },

    #[error("Nested error in {context}: {source}")]
    Nested {
        context: String,
        #[source]
        source: Box<DecodeError>,
    },
}

/// Broad classification of a [`DecodeError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong magic, malformed text, missing fields
    Format,
    UnsupportedVersion,
    /// A declared size disagrees with the computed one
    SizeMismatch,
    /// A read ran past the end of the buffer
    Bounds,
    UnsupportedVariant,
    /// A declared count exceeded [`DecodeOptions::max_element_count`]
    Limit,
}

impl DecodeError {
    /// Wrap this error with additional context
    pub fn with_context(self, context: impl Into<String>) -> Self {
        DecodeError::Nested {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Classify the error, looking through context wrappers
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::InvalidMagic { .. }
            | DecodeError::MissingField(_)
            | DecodeError::InvalidValue { .. }
            | DecodeError::InvalidText(_) => ErrorKind::Format,
            DecodeError::UnsupportedVersion { .. } => ErrorKind::UnsupportedVersion,
            DecodeError::SizeMismatch { .. } => ErrorKind::SizeMismatch,
            DecodeError::OutOfBounds { .. } => ErrorKind::Bounds,
            DecodeError::UnsupportedVariant(_) => ErrorKind::UnsupportedVariant,
            DecodeError::LimitExceeded { .. } => ErrorKind::Limit,
            DecodeError::Nested { source, .. } => source.kind(),
        }
    }

    /// The innermost error behind any context wrappers
    pub fn root_cause(&self) -> &DecodeError {
        match self {
            DecodeError::Nested { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Result type alias for decoding operations
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Configuration options for decoding
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Reject flat objects whose `type` is not recognised instead of
    /// reporting them as invalid
    pub strict_object_types: bool,
    /// Upper bound for any element count declared by a file
    pub max_element_count: u32,
}

impl DecodeOptions {
    /// Fail with [`DecodeError::LimitExceeded`] when `count` is above the limit
    pub fn check_count(&self, what: &'static str, count: u64) -> DecodeResult<()> {
        if count > u64::from(self.max_element_count) {
            return Err(DecodeError::LimitExceeded {
                what,
                count,
                limit: u64::from(self.max_element_count),
            });
        }
        Ok(())
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            strict_object_types: false,
            max_element_count: 16 * 1024 * 1024,
        }
    }
}

/// Core trait for all asset decoders
///
/// Implementors decode one file format from an in-memory buffer into a plain
/// value. Decoders hold no state between calls and can be shared freely
/// across threads.
pub trait Decoder: Send + Sync {
    /// The decoded output type
    type Output: Send + Sync;

    /// Returns the file extensions this decoder handles (e.g., ["cmf"])
    fn extensions(&self) -> &[&str];

    /// Returns the magic bytes that identify this file type (if applicable)
    fn magic_bytes(&self) -> Option<&[u8]> {
        None
    }

    /// Returns a human-readable name for this decoder
    fn name(&self) -> &str;

    /// Returns the format version(s) supported by this decoder
    fn supported_versions(&self) -> &[u32] {
        &[]
    }

    /// Decode a buffer with default options
    fn decode(&self, data: &[u8]) -> DecodeResult<Self::Output> {
        self.decode_with_options(data, &DecodeOptions::default())
    }

    /// Decode a buffer with custom options
    fn decode_with_options(&self, data: &[u8], options: &DecodeOptions) -> DecodeResult<Self::Output>;

    /// Check if this decoder can handle the given file
    fn can_decode(&self, file_name: &str, data: &[u8]) -> bool {
        // Check extension
        if let Some(ext) = extension_of(file_name) {
            if self.extensions().iter().any(|e| e.eq_ignore_ascii_case(ext)) {
                return true;
            }
        }

        // Check magic bytes if available
        match self.magic_bytes() {
            Some(magic) => data.starts_with(magic),
            None => false,
        }
    }
}

/// Trait for decoders that produce hierarchical/tree structures
pub trait HierarchicalDecoder: Decoder {
    /// Node type in the hierarchy
    type Node: Send;

    /// Get the root node(s) of the decoded structure
    fn roots<'a>(&self, decoded: &'a Self::Output) -> Vec<&'a Self::Node>;

    /// Get children of a node
    fn children<'a>(&self, decoded: &'a Self::Output, node: &Self::Node) -> Vec<&'a Self::Node>;

    /// Check if a node is a leaf (no children)
    fn is_leaf(&self, decoded: &Self::Output, node: &Self::Node) -> bool {
        self.children(decoded, node).is_empty()
    }
}

/// Extension of a file name without the dot, if any
pub(crate) fn extension_of(file_name: &str) -> Option<&str> {
    let base = file_name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(file_name);
    match base.rfind('.') {
        Some(idx) if idx + 1 < base.len() => Some(&base[idx + 1..]),
        _ => None,
    }
}
