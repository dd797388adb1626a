//! Grid dimensions of a restart file.

use serde::{Deserialize, Serialize};

use crate::error::{RestartError, Result};

/// Number of grid points along x, y and z.
///
/// Arrays are laid out row-major with `nx` outermost and `nz` innermost, so
/// the value at `(i, j, k)` sits at flat index `(i * ny + j) * nz + k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawGridShape")]
pub struct GridShape {
    nx: usize,
    ny: usize,
    nz: usize,
}

#[derive(Deserialize)]
struct RawGridShape {
    nx: usize,
    ny: usize,
    nz: usize,
}

impl TryFrom<RawGridShape> for GridShape {
    type Error = RestartError;

    fn try_from(raw: RawGridShape) -> Result<Self> {
        GridShape::new(raw.nx, raw.ny, raw.nz)
    }
}

impl GridShape {
    /// Create a grid shape, rejecting zero dimensions and overflowing sizes.
    pub fn new(nx: usize, ny: usize, nz: usize) -> Result<Self> {
        if nx == 0 || ny == 0 || nz == 0 {
            return Err(RestartError::InvalidShape(format!(
                "all dimensions must be > 0, got ({}, {}, {})",
                nx, ny, nz
            )));
        }

        // Byte size must fit too, since readers compare against file lengths.
        nx.checked_mul(ny)
            .and_then(|n| n.checked_mul(nz))
            .and_then(|n| n.checked_mul(crate::reader::ELEMENT_WIDTH))
            .ok_or_else(|| {
                RestartError::InvalidShape(format!(
                    "({}, {}, {}) overflows addressable size",
                    nx, ny, nz
                ))
            })?;

        Ok(Self { nx, ny, nz })
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn nz(&self) -> usize {
        self.nz
    }

    /// Dimensions as an `(nx, ny, nz)` tuple, suitable for ndarray.
    pub fn dims(&self) -> (usize, usize, usize) {
        (self.nx, self.ny, self.nz)
    }

    /// Total number of grid points.
    pub fn len(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    /// Always false; a constructed shape has no zero dimension.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Parse `"nx,ny,nz"` (whitespace and `x` separators also accepted).
    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s
            .split(|c: char| c == ',' || c == 'x' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();

        if parts.len() != 3 {
            return Err(RestartError::config(format!(
                "grid shape '{}' must have three dimensions",
                s
            )));
        }

        let mut dims = [0usize; 3];
        for (dim, part) in dims.iter_mut().zip(&parts) {
            *dim = part.parse().map_err(|_| {
                RestartError::config(format!("invalid grid dimension '{}' in '{}'", part, s))
            })?;
        }

        Self::new(dims[0], dims[1], dims[2])
    }
}

impl std::fmt::Display for GridShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.nx, self.ny, self.nz)
    }
}
