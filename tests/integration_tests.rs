use futhark_data::{
    from_reader, from_slice, from_str, load, load_slice, load_str, to_string, to_vec, to_writer,
    to_writer_with_options, Array, Error, Format, PrimitiveType, Scalar, Value, WriteOptions,
};
use ndarray::{arr1, arr2, arr3, ArrayD, IxDyn};
use std::io::Cursor;

#[test]
fn test_scalar_text_roundtrip() {
    for text in [
        "3i64", "255u8", "-128i8", "-7i16", "65535u16", "-1i32", "4000000000u32",
        "18446744073709551615u64", "true", "false", "1.500000f32", "-0.250000f64",
    ] {
        let value = from_str(text).unwrap();
        assert_eq!(to_string(&value), text, "canonical text should be reproduced");
    }
}

#[test]
fn test_defaults_for_unsuffixed_literals() {
    assert_eq!(from_str("7").unwrap().primitive_type(), PrimitiveType::I32);
    assert_eq!(from_str("7.0").unwrap().primitive_type(), PrimitiveType::F64);
    assert_eq!(from_str("7e2").unwrap().primitive_type(), PrimitiveType::F64);
    assert_eq!(from_str("0x1.0p0").unwrap().primitive_type(), PrimitiveType::F64);
}

#[test]
fn test_negative_numbers() {
    assert_eq!(from_str("-5i8").unwrap(), Value::Scalar(Scalar::I8(-5)));
    assert_eq!(from_str("-5").unwrap(), Value::Scalar(Scalar::I32(-5)));
}

#[test]
fn test_matrix_text_and_binary_agree() {
    let text = "[[1u16, 2u16, 3u16], [4u16, 5u16, 6u16]]";
    let from_text = from_str(text).unwrap();
    let bytes = to_vec(&from_text).unwrap();
    let from_binary = from_slice(&bytes).unwrap();

    assert_eq!(from_text, from_binary);
    assert_eq!(to_string(&from_binary), text);
    assert_eq!(
        from_text,
        Value::from(arr2(&[[1u16, 2, 3], [4, 5, 6]]).into_dyn())
    );
}

#[test]
fn test_binary_is_bit_exact() {
    let values = vec![
        Value::from(arr1(&[0.1f64, -0.0, f64::MIN_POSITIVE, f64::MAX]).into_dyn()),
        Value::from(arr1(&[1.0e-40f32, 3.4e38]).into_dyn()),
        Value::from(i64::MIN),
        Value::from(arr3(&[[[true], [false]], [[false], [true]]]).into_dyn()),
    ];
    for value in values {
        let bytes = to_vec(&value).unwrap();
        let decoded = from_slice(&bytes).unwrap();
        assert_eq!(decoded, value);
        assert_eq!(to_vec(&decoded).unwrap(), bytes);
    }
}

#[test]
fn test_empty_array_text() {
    let value = from_str("empty([3][0]f32)").unwrap();
    let array = value.as_array().unwrap();
    assert_eq!(array.primitive_type(), PrimitiveType::F32);
    assert_eq!(array.shape(), &[3, 0]);
    assert_eq!(array.len(), 0);
    assert_eq!(to_string(&value), "empty([3][0]f32)");
}

#[test]
fn test_empty_array_binary() {
    let value = Value::Array(Array::empty(PrimitiveType::U64, vec![0, 2, 5]).unwrap());
    let bytes = to_vec(&value).unwrap();
    assert_eq!(from_slice(&bytes).unwrap(), value);
}

#[test]
fn test_heterogeneous_array() {
    assert!(matches!(
        from_str("[1, true]"),
        Err(Error::HeterogeneousArray { .. })
    ));
    assert!(matches!(
        from_str("[1i32, 2i64]"),
        Err(Error::HeterogeneousArray { .. })
    ));
}

#[test]
fn test_irregular_array() {
    assert!(matches!(
        from_str("[[1,2],[3]]"),
        Err(Error::IrregularShape { .. })
    ));
}

#[test]
fn test_explicit_empty_brackets_are_invalid() {
    assert!(from_str("[]").is_err());
}

#[test]
fn test_comments_are_transparent() {
    assert_eq!(from_str("-- note\n3i64").unwrap(), from_str("3i64").unwrap());
    assert_eq!(
        from_str("-- header\n[1, -- inline\n 2]\n-- footer").unwrap(),
        from_str("[1, 2]").unwrap()
    );
}

#[test]
fn test_concatenated_values() {
    let values: Vec<Value> = load_str("3i64 4i64").collect::<Result<_, _>>().unwrap();
    assert_eq!(values, vec![Value::from(3i64), Value::from(4i64)]);
}

#[test]
fn test_mixed_stream_from_reader() {
    let mut input = Vec::new();
    to_writer(&mut input, &Value::from(arr1(&[1i32, 2]).into_dyn())).unwrap();
    input.extend_from_slice(b"\n-- text follows\n[true, false]\n");
    to_writer(&mut input, &Value::from(9u8)).unwrap();

    let values: Vec<Value> = load(Cursor::new(input))
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(values.len(), 3);
    assert_eq!(values[0].shape(), &[2]);
    assert_eq!(values[1].primitive_type(), PrimitiveType::Bool);
    assert_eq!(values[2], Value::from(9u8));
}

#[test]
fn test_unsupported_binary_version() {
    let mut bytes = to_vec(&Value::from(1i32)).unwrap();
    bytes[1] = 3;
    assert_eq!(
        from_slice(&bytes),
        Err(Error::UnsupportedFormatVersion {
            expected: 2,
            found: 3
        })
    );
}

#[test]
fn test_truncated_binary_payload() {
    let mut bytes = to_vec(&Value::from(arr1(&[1.0f64, 2.0, 3.0]).into_dyn())).unwrap();
    bytes.pop();
    assert!(matches!(
        from_slice(&bytes),
        Err(Error::MalformedBinaryFrame(_))
    ));
}

#[test]
fn test_unknown_binary_type() {
    let bytes = [b'b', 2, 0, b' ', b'c', b'6', b'4', 0, 0, 0, 0];
    assert!(matches!(from_slice(&bytes), Err(Error::UnknownTypeTag(_))));
}

#[test]
fn test_special_floats_roundtrip() {
    for (value, text) in [
        (f32::NAN, "f32.nan"),
        (f32::INFINITY, "f32.inf"),
        (f32::NEG_INFINITY, "-f32.inf"),
    ] {
        assert_eq!(to_string(&Value::from(value)), text);
        let back = from_str(text).unwrap();
        match back {
            Value::Scalar(Scalar::F32(v)) => {
                assert_eq!(v.is_nan(), value.is_nan());
                if !value.is_nan() {
                    assert_eq!(v, value);
                }
            }
            other => panic!("expected f32 scalar, got {:?}", other),
        }
    }
}

#[test]
fn test_text_writer_override() {
    let value = Value::from(arr1(&[1i8, 2]).into_dyn());
    let mut buffer = Vec::new();
    to_writer_with_options(&mut buffer, &value, WriteOptions::new().with_format(Format::Text))
        .unwrap();
    assert_eq!(String::from_utf8(buffer).unwrap(), "[1i8, 2i8]");
}

#[test]
fn test_from_reader_single_value() {
    let value = from_reader(Cursor::new(b"  [0x10u8, 0b11u8] ".to_vec())).unwrap();
    assert_eq!(value, Value::from(arr1(&[16u8, 3]).into_dyn()));
}

#[test]
fn test_shape_invariants() {
    let value = from_str("[[[1,2],[3,4],[5,6]],[[7,8],[9,10],[11,12]]]").unwrap();
    let array = value.as_array().unwrap();
    assert_eq!(array.rank(), 3);
    assert_eq!(array.shape(), &[2, 3, 2]);
    assert_eq!(array.len(), array.shape().iter().product::<usize>());
    let expected: ArrayD<i32> = ArrayD::from_shape_vec(IxDyn(&[2, 3, 2]), (1..=12).collect()).unwrap();
    assert_eq!(array.as_array::<i32>(), Some(&expected));
}

#[test]
fn test_stream_stops_after_failure() {
    let results: Vec<_> = load_slice(b"1 [1, true] 3").collect();
    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
}
