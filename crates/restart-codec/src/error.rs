//! Error types for restart file decoding and encoding.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while reading, slicing or writing a restart file.
#[derive(Error, Debug)]
pub enum RestartError {
    /// The restart file could not be opened or read.
    #[error("cannot access restart file {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The byte length of the file disagrees with the declared layout.
    #[error(
        "restart file {} has {actual_bytes} bytes, expected {expected_bytes} \
         (layout fields x nx*ny*nz x 4-byte floats)",
        .path.display()
    )]
    Format {
        path: PathBuf,
        expected_bytes: u64,
        actual_bytes: u64,
    },

    /// A byte buffer is not a whole number of 4-byte floats.
    #[error("buffer of {actual_bytes} bytes is not a whole number of 4-byte floats")]
    Misaligned { actual_bytes: u64 },

    /// A layout lookup named a field that is not declared.
    #[error("unknown field '{0}' in layout")]
    UnknownField(String),

    /// A field declared by the layout is absent from the field set.
    #[error("field '{0}' is declared by the layout but missing from the field set")]
    MissingField(String),

    /// A field's array shape disagrees with the declared grid shape.
    #[error("field '{field}' has shape {actual:?}, expected {expected:?}")]
    ShapeMismatch {
        field: String,
        expected: (usize, usize, usize),
        actual: (usize, usize, usize),
    },

    /// A flat buffer or index does not cover what the layout requires.
    #[error("index out of range: required {required} elements, {available} available")]
    Index { required: usize, available: usize },

    /// Grid dimensions are zero or their product overflows.
    #[error("invalid grid shape: {0}")]
    InvalidShape(String),

    /// The layout has no fields.
    #[error("invalid field layout: {0}")]
    InvalidLayout(String),

    /// The layout names the same field twice.
    #[error("field '{0}' appears more than once in layout")]
    DuplicateField(String),

    /// Writing the restart file failed.
    #[error("failed to write restart file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl RestartError {
    /// Create a FileAccess error.
    pub fn file_access(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a Write error.
    pub fn write(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create an UnknownField error.
    pub fn unknown_field(name: impl Into<String>) -> Self {
        Self::UnknownField(name.into())
    }

    /// Create a MissingField error.
    pub fn missing_field(name: impl Into<String>) -> Self {
        Self::MissingField(name.into())
    }

    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the error stems from the file contents rather than the caller's
    /// inputs or the filesystem.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::Format { .. } | Self::Misaligned { .. } | Self::Index { .. }
        )
    }
}

impl From<serde_yaml::Error> for RestartError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for restart codec operations.
pub type Result<T> = std::result::Result<T, RestartError>;
