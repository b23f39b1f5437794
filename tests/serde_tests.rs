use futhark_data::{from_str, Array, PrimitiveType, Value};
use ndarray::arr2;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct TestCase {
    name: String,
    input: Value,
    expected: Value,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Signature {
    params: Vec<PrimitiveType>,
    result: PrimitiveType,
}

#[test]
fn test_value_embeds_as_text() {
    let case = TestCase {
        name: "transpose".to_string(),
        input: Value::from(arr2(&[[1i32, 2], [3, 4]]).into_dyn()),
        expected: Value::from(arr2(&[[1i32, 3], [2, 4]]).into_dyn()),
    };

    let json = serde_json::to_string(&case).unwrap();
    assert_eq!(
        json,
        r#"{"name":"transpose","input":"[[1i32, 2i32], [3i32, 4i32]]","expected":"[[1i32, 3i32], [2i32, 4i32]]"}"#
    );
    let back: TestCase = serde_json::from_str(&json).unwrap();
    assert_eq!(back, case);
}

#[test]
fn test_value_accepts_any_text_form() {
    let json = r#"{"name":"sum","input":"[0x1u8, 0b10u8] -- bytes","expected":"3u8"}"#;
    let case: TestCase = serde_json::from_str(json).unwrap();
    assert_eq!(case.input, from_str("[1u8, 2u8]").unwrap());
    assert_eq!(case.expected, Value::from(3u8));
}

#[test]
fn test_empty_value_in_json() {
    let value = Value::from(Array::empty(PrimitiveType::I16, vec![0, 3]).unwrap());
    let json = serde_json::to_string(&value).unwrap();
    assert_eq!(json, r#""empty([0][3]i16)""#);
    assert_eq!(serde_json::from_str::<Value>(&json).unwrap(), value);
}

#[test]
fn test_invalid_value_is_a_json_error() {
    let err = serde_json::from_str::<Value>(r#""[1, true]""#).unwrap_err();
    assert!(err.to_string().contains("i32"));
    assert!(serde_json::from_str::<Value>("42").is_err());
}

#[test]
fn test_primitive_type_names() {
    let signature = Signature {
        params: vec![PrimitiveType::F32, PrimitiveType::Bool],
        result: PrimitiveType::U64,
    };
    let json = serde_json::to_string(&signature).unwrap();
    assert_eq!(json, r#"{"params":["f32","bool"],"result":"u64"}"#);
    assert_eq!(serde_json::from_str::<Signature>(&json).unwrap(), signature);
    assert!(serde_json::from_str::<PrimitiveType>(r#""c64""#).is_err());
}
