//! Property tests for the decode/encode round-trip law.

use ndarray::Array3;
use proptest::prelude::*;
use restart_codec::{
    extract_fields, flatten_fields, ByteOrder, FieldLayout, FieldSet, FlatBuffer, GridShape,
    RestartCodec,
};
use test_utils::ScratchDir;

fn arb_case() -> impl Strategy<Value = (GridShape, FieldLayout, Vec<f32>)> {
    (1usize..5, 1usize..5, 1usize..5, 1usize..5).prop_flat_map(|(nx, ny, nz, n_fields)| {
        let len = nx * ny * nz * n_fields;
        prop::collection::vec(-1.0e6f32..1.0e6, len).prop_map(move |values| {
            let shape = GridShape::new(nx, ny, nz).unwrap();
            let layout = FieldLayout::new((0..n_fields).map(|i| format!("f{}", i))).unwrap();
            (shape, layout, values)
        })
    })
}

fn field_set_from(shape: &GridShape, layout: &FieldLayout, values: &[f32]) -> FieldSet {
    let block = shape.len();
    layout
        .names()
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let data = values[i * block..(i + 1) * block].to_vec();
            (name.clone(), Array3::from_shape_vec(shape.dims(), data).unwrap())
        })
        .collect()
}

proptest! {
    #[test]
    fn decode_of_encode_is_identity((shape, layout, values) in arb_case()) {
        let fields = field_set_from(&shape, &layout, &values);
        let flat = flatten_fields(&fields, &layout, &shape).unwrap();
        let back = extract_fields(&flat, &layout, &shape).unwrap();
        prop_assert_eq!(back, fields);
    }

    #[test]
    fn encode_of_decode_is_identity((shape, layout, values) in arb_case()) {
        let flat = FlatBuffer::new(values.clone());
        let fields = extract_fields(&flat, &layout, &shape).unwrap();
        let again = flatten_fields(&fields, &layout, &shape).unwrap();
        prop_assert_eq!(again.as_slice(), &values[..]);
    }

    #[test]
    fn bytes_round_trip_in_every_order(values in prop::collection::vec(any::<f32>(), 0..64)) {
        for order in [ByteOrder::Little, ByteOrder::Big, ByteOrder::Native] {
            let flat = FlatBuffer::new(values.clone());
            let back = FlatBuffer::from_bytes(&flat.to_bytes(order), order).unwrap();
            let bits: Vec<u32> = back.as_slice().iter().map(|v| v.to_bits()).collect();
            let expected: Vec<u32> = values.iter().map(|v| v.to_bits()).collect();
            prop_assert_eq!(bits, expected);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn file_round_trip((shape, layout, values) in arb_case()) {
        let scratch = ScratchDir::new();
        let path = scratch.file("rst.dat");
        let codec = RestartCodec::new(layout.clone(), shape);

        let fields = field_set_from(&shape, &layout, &values);
        codec.write_fields(&path, &fields).unwrap();
        prop_assert_eq!(codec.decode(&path).unwrap(), fields);
    }
}
