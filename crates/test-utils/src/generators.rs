//! Generators for synthetic restart file contents.
//!
//! Values are predictable so tests can check exactly where each element
//! ended up after decoding.

use std::path::Path;

/// Creates a field block with predictable values.
///
/// The value at `(i, j, k)` is `field * 1_000_000 + i * 10_000 + j * 100 + k`,
/// written row-major with `nx` outermost and `nz` innermost.
///
/// ```
/// use test_utils::create_test_field;
///
/// let block = create_test_field(1, 2, 3, 4);
/// assert_eq!(block.len(), 24);
/// assert_eq!(block[0], 1_000_000.0);
/// assert_eq!(block[1], 1_000_001.0);   // k = 1
/// assert_eq!(block[4], 1_000_100.0);   // j = 1
/// assert_eq!(block[12], 1_010_000.0);  // i = 1
/// ```
pub fn create_test_field(field: usize, nx: usize, ny: usize, nz: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(nx * ny * nz);
    for i in 0..nx {
        for j in 0..ny {
            for k in 0..nz {
                data.push((field * 1_000_000 + i * 10_000 + j * 100 + k) as f32);
            }
        }
    }
    data
}

/// Concatenates `n_fields` test field blocks, as a restart file would.
pub fn create_test_restart(n_fields: usize, nx: usize, ny: usize, nz: usize) -> Vec<f32> {
    (0..n_fields)
        .flat_map(|f| create_test_field(f, nx, ny, nz))
        .collect()
}

/// Creates a potential temperature block in Kelvin.
///
/// Stably stratified: 300 K at the surface increasing 3 K per level.
pub fn create_theta_field(nx: usize, ny: usize, nz: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(nx * ny * nz);
    for _i in 0..nx {
        for _j in 0..ny {
            for k in 0..nz {
                data.push(300.0 + 3.0 * k as f32);
            }
        }
    }
    data
}

/// Creates a horizontal wind component block in m/s.
///
/// Linear shear with height from 0 to `top_speed` at the model top.
pub fn create_shear_wind_field(nx: usize, ny: usize, nz: usize, top_speed: f32) -> Vec<f32> {
    let mut data = Vec::with_capacity(nx * ny * nz);
    let denom = (nz.max(2) - 1) as f32;
    for _i in 0..nx {
        for _j in 0..ny {
            for k in 0..nz {
                data.push(top_speed * k as f32 / denom);
            }
        }
    }
    data
}

/// Encodes values as little-endian 4-byte floats.
pub fn to_le_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Encodes values as big-endian 4-byte floats.
pub fn to_be_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_be_bytes()).collect()
}

/// Writes values to `path` as a little-endian restart file.
pub fn write_restart_file(path: &Path, values: &[f32]) -> std::io::Result<()> {
    std::fs::write(path, to_le_bytes(values))
}
