//! Error taxonomy for config construction, upload validation and field
//! encoding.
//!
//! Every error is returned to the immediate caller.  Nothing in this crate
//! logs an error or retries; encoding and validation are deterministic, so
//! retrying with the same input gives the same answer.

use std::fmt;

use thiserror::Error;

/// Raised by `FileUploadConfig` constructors.  No config exists when one of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("field name must not be empty")]
    EmptyFieldName,

    #[error("filename must not be empty")]
    EmptyFilename,

    /// The filename contains a path separator.
    #[error("invalid filename {0:?}: path separators are not allowed")]
    InvalidFilename(String),

    /// Zero or negative size limit.
    #[error("invalid max size {0}: must be greater than zero")]
    InvalidMaxSize(i64),

    #[error("max size {0} exceeds the {limit} byte limit", limit = crate::constants::MAX_UPLOAD_SIZE)]
    MaxSizeExceedsLimit(i64),

    /// No registered file type matches the filename's extension.
    #[error("no file type registered for extension {0:?}")]
    UnknownExtension(String),
}

/// Raised by a file type's signature check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    /// The leading bytes do not carry the expected signature.  `detected` is
    /// the content type sniffed from the bytes, when recognisable.
    #[error("content does not match {expected}{}", detected_suffix(.detected))]
    ContentMismatch {
        expected: String,
        detected: Option<String>,
    },

    /// The buffer is too short to hold the container header at all.
    #[error("{expected} needs at least {required} bytes, got {actual}")]
    InsufficientData {
        expected: String,
        required: usize,
        actual: usize,
    },
}

impl ContentError {
    /// Mismatch against `expected` with nothing recognisable in the bytes.
    pub fn mismatch(expected: impl Into<String>) -> Self {
        ContentError::ContentMismatch {
            expected: expected.into(),
            detected: None,
        }
    }
}

fn detected_suffix(detected: &Option<String>) -> String {
    match detected {
        Some(d) => format!(" (detected {d})"),
        None => String::new(),
    }
}

/// Raised by `FileUploadConfig::validate`, in check order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("file data is empty")]
    EmptyData,

    #[error("file is {size} bytes, limit is {max_size}")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error(transparent)]
    Content(#[from] ContentError),
}

/// Raised by the field encoder and by the `Serialize` derivation layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// A container shape that cannot be flattened, e.g. an array of arrays.
    #[error("field {field:?} holds a nested container that cannot be encoded")]
    UnsupportedNesting { field: String },

    /// The root value is not a record.
    #[error("cannot encode a bare {kind} as form fields; wrap it in a record")]
    UnsupportedRoot { kind: &'static str },

    /// A record entry has an empty name.
    #[error("record entry has an empty name")]
    EmptyFieldName,

    #[error("serialization failed: {0}")]
    SerializationFailure(String),
}

impl serde::ser::Error for EncodingError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        EncodingError::SerializationFailure(msg.to_string())
    }
}

impl From<serde_json::Error> for EncodingError {
    fn from(err: serde_json::Error) -> Self {
        EncodingError::SerializationFailure(err.to_string())
    }
}
