//! Configuration for decoding a restart file.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RestartError, Result};
use crate::grid::GridShape;
use crate::layout::FieldLayout;
use crate::reader::ByteOrder;

/// Where a restart file lives and how it is laid out.
///
/// ```yaml
/// path: /data/cm1out_rst_000013_s.dat
/// grid_shape: { nx: 1700, ny: 1700, nz: 121 }
/// field_layout: [u, v, w, th]
/// byte_order: little
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestartConfig {
    /// Restart file path.
    pub path: PathBuf,

    /// Grid dimensions shared by every field.
    pub grid_shape: GridShape,

    /// Field names in on-disk order.
    pub field_layout: FieldLayout,

    /// Byte order of the stored floats.
    #[serde(default)]
    pub byte_order: ByteOrder,
}

impl RestartConfig {
    pub fn new(path: impl Into<PathBuf>, grid_shape: GridShape, field_layout: FieldLayout) -> Self {
        Self {
            path: path.into(),
            grid_shape,
            field_layout,
            byte_order: ByteOrder::default(),
        }
    }

    /// Load configuration from a YAML file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| RestartError::file_access(path, e))?;
        Self::from_yaml_str(&contents)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    ///
    /// `RESTART_PATH`, `RESTART_GRID_SHAPE` (`nx,ny,nz`) and `RESTART_FIELDS`
    /// (`u,v,w,th`) are required; `RESTART_BYTE_ORDER` defaults to little.
    pub fn from_env() -> Result<Self> {
        let path = required_var("RESTART_PATH")?;
        let grid_shape = GridShape::parse(&required_var("RESTART_GRID_SHAPE")?)?;
        let field_layout = FieldLayout::parse(&required_var("RESTART_FIELDS")?)?;

        let byte_order = match env::var("RESTART_BYTE_ORDER") {
            Ok(val) => ByteOrder::parse(&val).ok_or_else(|| {
                RestartError::config(format!("unknown RESTART_BYTE_ORDER '{}'", val))
            })?,
            Err(_) => ByteOrder::default(),
        };

        let config = Self {
            path: PathBuf::from(path),
            grid_shape,
            field_layout,
            byte_order,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(RestartError::config("path must not be empty"));
        }

        // Shape and layout are checked on construction; re-run the checks so
        // hand-built values go through the same rules.
        GridShape::new(
            self.grid_shape.nx(),
            self.grid_shape.ny(),
            self.grid_shape.nz(),
        )?;
        FieldLayout::new(self.field_layout.names().iter().cloned())?;

        // The whole file must be addressable, not just one field.
        self.field_layout.total_elements(&self.grid_shape)?;

        Ok(())
    }

    /// Expected size of the restart file in bytes.
    pub fn expected_bytes(&self) -> Result<u64> {
        self.field_layout.expected_bytes(&self.grid_shape)
    }
}

fn required_var(name: &str) -> Result<String> {
    env::var(name).map_err(|_| RestartError::config(format!("{} is not set", name)))
}
