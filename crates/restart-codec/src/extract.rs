//! Partitioning a flat buffer into fields and back.
//!
//! Each field is the block `[offset, offset + nx*ny*nz)` of the flat buffer,
//! reshaped row-major to `(nx, ny, nz)`. No axis is transposed.

use ndarray::Array3;
use tracing::{debug, warn};

use crate::error::{RestartError, Result};
use crate::fields::FieldSet;
use crate::grid::GridShape;
use crate::layout::FieldLayout;
use crate::reader::FlatBuffer;

/// Split a flat buffer into the fields declared by `layout`.
pub fn extract_fields(
    buffer: &FlatBuffer,
    layout: &FieldLayout,
    shape: &GridShape,
) -> Result<FieldSet> {
    let required = layout.total_elements(shape)?;
    let values = buffer.as_slice();

    // The reader already checked the file size; buffers built in memory
    // have not been.
    if values.len() != required {
        return Err(RestartError::Index {
            required,
            available: values.len(),
        });
    }

    let block = layout.block_len(shape);
    let mut fields = FieldSet::with_capacity(layout.len());

    for (name, offset) in layout.blocks(shape) {
        let slice = &values[offset..offset + block];
        let array = Array3::from_shape_vec(shape.dims(), slice.to_vec()).map_err(|_| {
            RestartError::Index {
                required: block,
                available: slice.len(),
            }
        })?;

        debug!(field = name, offset, len = block, "Extracted field");
        fields.insert(name, array);
    }

    Ok(fields)
}

/// Concatenate the fields of `field_set` in layout order.
///
/// Every declared field must be present with shape exactly `shape`. Fields
/// that the layout does not declare are skipped.
pub fn flatten_fields(
    field_set: &FieldSet,
    layout: &FieldLayout,
    shape: &GridShape,
) -> Result<FlatBuffer> {
    // Validate everything before allocating the output.
    let total = layout.total_elements(shape)?;
    for name in layout.names() {
        let array = field_set
            .get(name)
            .ok_or_else(|| RestartError::missing_field(name.as_str()))?;

        if array.dim() != shape.dims() {
            return Err(RestartError::ShapeMismatch {
                field: name.clone(),
                expected: shape.dims(),
                actual: array.dim(),
            });
        }
    }

    for extra in field_set.names().filter(|n| !layout.contains(n)) {
        warn!(field = extra, layout = %layout, "Field not in layout; not encoded");
    }

    let mut values = Vec::with_capacity(total);
    for name in layout.names() {
        if let Some(array) = field_set.get(name) {
            // Logical iteration order is row-major regardless of memory layout.
            values.extend(array.iter().copied());
        }
    }

    Ok(FlatBuffer::new(values))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(n: usize) -> FlatBuffer {
        FlatBuffer::new((0..n).map(|i| i as f32).collect())
    }

    #[test]
    fn test_extract_offsets() {
        let layout = FieldLayout::new(["u", "v", "w", "th"]).unwrap();
        let shape = GridShape::new(2, 2, 2).unwrap();
        let fields = extract_fields(&flat(32), &layout, &shape).unwrap();

        let w = fields.get("w").unwrap();
        assert_eq!(w.dim(), (2, 2, 2));
        let expected: Vec<f32> = (16..24).map(|i| i as f32).collect();
        assert_eq!(w.iter().copied().collect::<Vec<_>>(), expected);
        assert_eq!(w[[0, 0, 1]], 17.0);
        assert_eq!(w[[0, 1, 0]], 18.0);
        assert_eq!(w[[1, 0, 0]], 20.0);
    }

    #[test]
    fn test_short_buffer_rejected() {
        let layout = FieldLayout::new(["u", "v"]).unwrap();
        let shape = GridShape::new(1, 1, 2).unwrap();
        assert!(matches!(
            extract_fields(&flat(3), &layout, &shape),
            Err(RestartError::Index { required: 4, available: 3 })
        ));
    }

    #[test]
    fn test_long_buffer_rejected() {
        let layout = FieldLayout::new(["u"]).unwrap();
        let shape = GridShape::new(1, 1, 2).unwrap();
        assert!(matches!(
            extract_fields(&flat(3), &layout, &shape),
            Err(RestartError::Index { required: 2, available: 3 })
        ));
    }

    #[test]
    fn test_flatten_transposed_view_uses_logical_order() {
        let layout = FieldLayout::new(["u"]).unwrap();
        let shape = GridShape::new(2, 2, 1).unwrap();

        // Column-major memory layout with the same logical contents.
        let base = Array3::from_shape_vec((1, 2, 2), vec![0.0, 2.0, 1.0, 3.0]).unwrap();
        let u = base.permuted_axes([2, 1, 0]).to_owned();
        assert_eq!(u[[0, 1, 0]], 1.0);

        let mut set = FieldSet::new();
        set.insert("u", u);
        let buf = flatten_fields(&set, &layout, &shape).unwrap();
        assert_eq!(buf.as_slice(), &[0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_extra_fields_ignored() {
        let layout = FieldLayout::new(["u"]).unwrap();
        let shape = GridShape::new(1, 1, 1).unwrap();
        let mut set = FieldSet::new();
        set.insert("qv", Array3::from_elem((3, 3, 3), 9.0));
        set.insert("u", Array3::from_elem((1, 1, 1), 1.0));
        let buf = flatten_fields(&set, &layout, &shape).unwrap();
        assert_eq!(buf.as_slice(), &[1.0]);
    }
}
