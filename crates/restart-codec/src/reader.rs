//! Flat buffer reading.
//!
//! A restart file is nothing but `f32` values back to back. The reader checks
//! the byte length against what the layout expects before decoding anything;
//! a misaligned or truncated file would otherwise shift every field after it.

use std::path::Path;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RestartError, Result};

/// Width in bytes of one stored value.
pub const ELEMENT_WIDTH: usize = 4;

/// Byte order of the stored floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    #[default]
    Little,
    Big,
    /// Whatever the current machine uses.
    Native,
}

impl ByteOrder {
    /// Parse from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "little" | "le" | "little_endian" => Some(Self::Little),
            "big" | "be" | "big_endian" => Some(Self::Big),
            "native" | "ne" => Some(Self::Native),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Little => "little",
            Self::Big => "big",
            Self::Native => "native",
        }
    }
}

impl std::fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Decoded contents of a restart file, before it is split into fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlatBuffer {
    values: Vec<f32>,
}

impl FlatBuffer {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    /// Decode raw bytes.
    ///
    /// A length that is not a multiple of [`ELEMENT_WIDTH`] is a format error
    /// (`Misaligned`); no trailing bytes are dropped.
    pub fn from_bytes(raw: &[u8], order: ByteOrder) -> Result<Self> {
        if raw.len() % ELEMENT_WIDTH != 0 {
            return Err(RestartError::Misaligned {
                actual_bytes: raw.len() as u64,
            });
        }

        let mut buf = raw;
        let mut values = Vec::with_capacity(raw.len() / ELEMENT_WIDTH);
        while buf.has_remaining() {
            let v = match order {
                ByteOrder::Little => buf.get_f32_le(),
                ByteOrder::Big => buf.get_f32(),
                ByteOrder::Native => buf.get_f32_ne(),
            };
            values.push(v);
        }

        Ok(Self { values })
    }

    /// Encode to bytes in the given order.
    pub fn to_bytes(&self, order: ByteOrder) -> Bytes {
        let mut out = BytesMut::with_capacity(self.byte_len());
        for &v in &self.values {
            match order {
                ByteOrder::Little => out.put_f32_le(v),
                ByteOrder::Big => out.put_f32(v),
                ByteOrder::Native => out.put_f32_ne(v),
            }
        }
        out.freeze()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.values
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Size of the encoded buffer in bytes.
    pub fn byte_len(&self) -> usize {
        self.values.len() * ELEMENT_WIDTH
    }
}

impl From<Vec<f32>> for FlatBuffer {
    fn from(values: Vec<f32>) -> Self {
        Self::new(values)
    }
}

/// Read a whole restart file and decode exactly `expected_count` floats.
pub fn read_flat_buffer(
    path: impl AsRef<Path>,
    expected_count: usize,
    order: ByteOrder,
) -> Result<FlatBuffer> {
    let path = path.as_ref();

    let expected_bytes = expected_count
        .checked_mul(ELEMENT_WIDTH)
        .map(|n| n as u64)
        .ok_or_else(|| {
            RestartError::InvalidShape(format!(
                "{} elements overflow addressable size",
                expected_count
            ))
        })?;

    // Reject a mis-sized file before loading it.
    let on_disk = std::fs::metadata(path)
        .map_err(|e| RestartError::file_access(path, e))?
        .len();
    check_size(path, expected_bytes, on_disk)?;

    let raw = std::fs::read(path).map_err(|e| RestartError::file_access(path, e))?;
    let actual_bytes = raw.len() as u64;
    check_size(path, expected_bytes, actual_bytes)?;

    debug!(
        path = %path.display(),
        bytes = actual_bytes,
        elements = expected_count,
        order = %order,
        "Read restart file"
    );

    FlatBuffer::from_bytes(&raw, order)
}

fn check_size(path: &Path, expected_bytes: u64, actual_bytes: u64) -> Result<()> {
    if actual_bytes != expected_bytes {
        return Err(RestartError::Format {
            path: path.to_path_buf(),
            expected_bytes,
            actual_bytes,
        });
    }
    Ok(())
}
