//! Restart file codec for numerical weather model checkpoints.
//!
//! A restart file is a headerless run of 4-byte floats: one block of
//! `nx*ny*nz` values per variable, in an order the file does not record. This
//! crate turns such a file into named `(nx, ny, nz)` arrays and back.
//!
//! # Architecture
//!
//! ```text
//! RestartConfig (path, grid_shape, field_layout, byte_order)
//!      │
//!      ▼
//! RestartCodec::decode(path)
//!      │
//!      ├─► read_flat_buffer   (size check: fields * nx*ny*nz * 4 bytes)
//!      │
//!      ├─► FieldLayout        (offset_of(name) = index * nx*ny*nz)
//!      │
//!      └─► extract_fields     (row-major reshape, nx outermost)
//!               │
//!               ▼
//!          FieldSet ──edit──► RestartCodec::write_fields(path)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use restart_codec::{FieldLayout, GridShape, RestartCodec};
//!
//! let shape = GridShape::new(1700, 1700, 121)?;
//! let codec = RestartCodec::new(FieldLayout::cm1_uvwth(), shape);
//!
//! let mut fields = codec.decode("cm1out_rst_000013_s.dat")?;
//! if let Some(th) = fields.get_mut("th") {
//!     th[[850, 850, 10]] += 1.5;
//! }
//! codec.write_fields("cm1out_rst_000013_s.dat", &fields)?;
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod extract;
pub mod fields;
pub mod grid;
pub mod layout;
pub mod reader;

// Re-export commonly used types at crate root
pub use codec::{decode, decode_configured, encode, write, RestartCodec};
pub use config::RestartConfig;
pub use error::{RestartError, Result};
pub use extract::{extract_fields, flatten_fields};
pub use fields::{FieldSet, FieldStats};
pub use grid::GridShape;
pub use layout::FieldLayout;
pub use reader::{read_flat_buffer, ByteOrder, FlatBuffer, ELEMENT_WIDTH};
