//! Restart codec façade.
//!
//! Composes the reader, layout and extractor:
//!
//! ```text
//! restart file ──read_flat_buffer──► FlatBuffer ──extract_fields──► FieldSet
//!      ▲                                                              │
//!      └──────────── write ◄── FlatBuffer ◄── flatten_fields ─────────┘
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::config::RestartConfig;
use crate::error::{RestartError, Result};
use crate::extract::{extract_fields, flatten_fields};
use crate::fields::FieldSet;
use crate::grid::GridShape;
use crate::layout::FieldLayout;
use crate::reader::{read_flat_buffer, ByteOrder, FlatBuffer};

/// Reads and writes restart files of one layout and grid shape.
#[derive(Debug, Clone)]
pub struct RestartCodec {
    layout: FieldLayout,
    shape: GridShape,
    byte_order: ByteOrder,
}

impl RestartCodec {
    /// Create a little-endian codec.
    pub fn new(layout: FieldLayout, shape: GridShape) -> Self {
        Self {
            layout,
            shape,
            byte_order: ByteOrder::Little,
        }
    }

    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Build a codec from the layout, shape and byte order of a configuration.
    pub fn from_config(config: &RestartConfig) -> Self {
        Self {
            layout: config.field_layout.clone(),
            shape: config.grid_shape,
            byte_order: config.byte_order,
        }
    }

    pub fn layout(&self) -> &FieldLayout {
        &self.layout
    }

    pub fn shape(&self) -> &GridShape {
        &self.shape
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Expected size of a restart file in bytes.
    pub fn expected_bytes(&self) -> Result<u64> {
        self.layout.expected_bytes(&self.shape)
    }

    /// Read a restart file into a complete field set.
    pub fn decode(&self, path: impl AsRef<Path>) -> Result<FieldSet> {
        let path = path.as_ref();
        let buffer = read_flat_buffer(
            path,
            self.layout.total_elements(&self.shape)?,
            self.byte_order,
        )?;
        let fields = extract_fields(&buffer, &self.layout, &self.shape)?;

        info!(
            path = %path.display(),
            fields = %self.layout,
            shape = %self.shape,
            "Decoded restart file"
        );

        Ok(fields)
    }

    /// Flatten a field set into the on-disk value order.
    pub fn encode(&self, field_set: &FieldSet) -> Result<FlatBuffer> {
        flatten_fields(field_set, &self.layout, &self.shape)
    }

    /// Overwrite `path` with the encoded buffer.
    ///
    /// The bytes go to a temporary file next to `path` which is flushed,
    /// synced and renamed over the target. On failure the temporary file is
    /// removed and any existing file at `path` is left as it was.
    pub fn write(&self, path: impl AsRef<Path>, buffer: &FlatBuffer) -> Result<()> {
        let path = path.as_ref();
        let bytes = buffer.to_bytes(self.byte_order);
        write_bytes(path, &bytes)?;

        info!(
            path = %path.display(),
            bytes = bytes.len(),
            order = %self.byte_order,
            "Wrote restart file"
        );

        Ok(())
    }

    /// Encode and write a field set.
    pub fn write_fields(&self, path: impl AsRef<Path>, field_set: &FieldSet) -> Result<()> {
        let buffer = self.encode(field_set)?;
        self.write(path, &buffer)
    }

    /// Decode several files in parallel.
    ///
    /// Results come back in input order; a failure affects only its own entry.
    pub fn decode_many<P>(&self, paths: &[P]) -> Vec<(PathBuf, Result<FieldSet>)>
    where
        P: AsRef<Path> + Sync,
    {
        let results: Vec<(PathBuf, Result<FieldSet>)> = paths
            .par_iter()
            .map(|p| {
                let path = p.as_ref().to_path_buf();
                let result = self.decode(&path);
                (path, result)
            })
            .collect();

        let failed = results.iter().filter(|(_, r)| r.is_err()).count();
        if failed > 0 {
            let malformed = results
                .iter()
                .filter(|(_, r)| matches!(r, Err(e) if e.is_format_error()))
                .count();
            warn!(
                total = results.len(),
                failed,
                malformed,
                "Some restart files failed to decode"
            );
        }

        results
    }
}

/// Decode the file named by a configuration.
pub fn decode_configured(config: &RestartConfig) -> Result<FieldSet> {
    RestartCodec::from_config(config).decode(&config.path)
}

/// Decode a little-endian restart file.
pub fn decode(path: impl AsRef<Path>, layout: &FieldLayout, shape: &GridShape) -> Result<FieldSet> {
    RestartCodec::new(layout.clone(), *shape).decode(path)
}

/// Flatten a field set in layout order.
pub fn encode(field_set: &FieldSet, layout: &FieldLayout, shape: &GridShape) -> Result<FlatBuffer> {
    flatten_fields(field_set, layout, shape)
}

/// Overwrite `path` with a little-endian flat buffer.
pub fn write(path: impl AsRef<Path>, buffer: &FlatBuffer) -> Result<()> {
    let path = path.as_ref();
    let bytes = buffer.to_bytes(ByteOrder::Little);
    write_bytes(path, &bytes)
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| RestartError::write(path, e))?;

    // Temp files are created 0600; keep the mode of the file being replaced.
    if let Ok(existing) = std::fs::metadata(path) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .map_err(|e| RestartError::write(path, e))?;
    }

    tmp.write_all(bytes)
        .map_err(|e| RestartError::write(path, e))?;
    tmp.flush().map_err(|e| RestartError::write(path, e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| RestartError::write(path, e))?;

    // Dropping an unpersisted NamedTempFile removes it.
    tmp.persist(path)
        .map_err(|e| RestartError::write(path, e.error))?;
    Ok(())
}
