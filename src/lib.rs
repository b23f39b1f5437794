//! # futhark_data
//!
//! Reading and writing values in the Futhark data format, the interchange
//! format used to pass typed scalars and rectangular arrays between test
//! harnesses and compiled numeric programs.
//!
//! ## What is the format?
//!
//! Every value is either a scalar of one of eleven primitive types (`i8`,
//! `i16`, `i32`, `i64`, `u8`, `u16`, `u32`, `u64`, `f32`, `f64`, `bool`) or a
//! regular multi-dimensional array of one of them. Each value can be written
//! in two interchangeable forms:
//!
//! - **Text**: `3i64`, `[[1.000000f32, 2.000000f32]]`, `empty([0][3]u8)`,
//!   with `--` line comments
//! - **Binary**: a small header (marker, version, rank, type name, dimensions)
//!   followed by the raw little-endian elements in row-major order
//!
//! A stream may hold any number of values, each in either form.
//!
//! ## Quick Start
//!
//! ```rust
//! use futhark_data::{from_str, to_string, to_vec, from_slice, Value};
//!
//! let value = from_str("[[1, 2], [3, 4]] -- a 2x2 matrix").unwrap();
//! assert_eq!(value.shape(), &[2, 2]);
//! assert_eq!(to_string(&value), "[[1i32, 2i32], [3i32, 4i32]]");
//!
//! // The binary form decodes to the same value
//! let bytes = to_vec(&value).unwrap();
//! assert_eq!(from_slice(&bytes).unwrap(), value);
//! ```
//!
//! ### Reading Several Values
//!
//! ```rust
//! use futhark_data::{load_str, Value};
//!
//! let values: Vec<Value> = load_str("3i64 4i64").collect::<Result<_, _>>().unwrap();
//! assert_eq!(values, vec![Value::from(3i64), Value::from(4i64)]);
//! ```
//!
//! ### Working with ndarray
//!
//! ```rust
//! use futhark_data::{to_string, Value};
//! use ndarray::arr1;
//!
//! let value = Value::from(arr1(&[true, false]).into_dyn());
//! assert_eq!(to_string(&value), "[true, false]");
//! ```
//!
//! ## Errors
//!
//! Decoding stops at the first problem in a value and reports it as an
//! [`Error`]; there is no partial recovery. See [`error`] for the kinds.

#[macro_use]
mod macros;

pub mod binary;
pub mod de;
pub mod error;
pub mod literal;
pub mod options;
pub mod reader;
pub mod ser;
pub mod types;
pub mod value;

pub use binary::BINARY_FORMAT_VERSION;
pub use de::{Deserializer, StreamDeserializer};
pub use error::{Error, Result};
pub use options::{Format, WriteOptions};
pub use ser::Serializer;
pub use types::{Element, PrimitiveType};
pub use value::{Array, Scalar, Value};

use std::io;

fn single_value<R: io::Read>(mut de: Deserializer<R>) -> Result<Value> {
    let value = de
        .next_value()?
        .ok_or_else(|| Error::unexpected_eof("a value"))?;
    de.end()?;
    Ok(value)
}

/// Decodes exactly one value from a string.
///
/// # Examples
///
/// ```rust
/// use futhark_data::{from_str, Value};
///
/// assert_eq!(from_str("-5i8").unwrap(), Value::from(-5i8));
/// assert_eq!(from_str("-5").unwrap(), Value::from(-5i32));
/// ```
///
/// # Errors
///
/// Returns an error if the input holds no value, more than one value, or an
/// invalid value.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str(s: &str) -> Result<Value> {
    single_value(Deserializer::from_str(s))
}

/// Decodes exactly one value, text or binary, from bytes.
///
/// # Examples
///
/// ```rust
/// use futhark_data::{from_slice, Value};
///
/// let frame = [b'b', 2, 0, b' ', b' ', b'u', b'8', 42];
/// assert_eq!(from_slice(&frame).unwrap(), Value::from(42u8));
/// assert_eq!(from_slice(b"42u8").unwrap(), Value::from(42u8));
/// ```
///
/// # Errors
///
/// Returns an error if the input holds no value, more than one value, or an
/// invalid value.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice(v: &[u8]) -> Result<Value> {
    single_value(Deserializer::from_slice(v))
}

/// Decodes exactly one value from an I/O stream.
///
/// # Examples
///
/// ```rust
/// use futhark_data::{from_reader, Value};
/// use std::io::Cursor;
///
/// let cursor = Cursor::new(b"[1u8, 2u8]".to_vec());
/// let value = from_reader(cursor).unwrap();
/// assert_eq!(value.shape(), &[2]);
/// ```
///
/// # Errors
///
/// Returns an error if reading fails, or the stream holds no value, more than
/// one value, or an invalid value.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R: io::Read>(reader: R) -> Result<Value> {
    single_value(Deserializer::from_reader(reader))
}

/// Lazily decodes every value of an I/O stream.
///
/// The iterator is forward-only and stops after the first error.
///
/// # Examples
///
/// ```rust
/// use futhark_data::load;
/// use std::io::Cursor;
///
/// let values = load(Cursor::new(b"1 2 3".to_vec()));
/// assert_eq!(values.count(), 3);
/// ```
pub fn load<R: io::Read>(reader: R) -> StreamDeserializer<R> {
    Deserializer::from_reader(reader).into_iter()
}

/// Lazily decodes every value of a string.
pub fn load_str(s: &str) -> StreamDeserializer<&[u8]> {
    Deserializer::from_str(s).into_iter()
}

/// Lazily decodes every value of a byte slice.
pub fn load_slice(v: &[u8]) -> StreamDeserializer<&[u8]> {
    Deserializer::from_slice(v).into_iter()
}

/// Encodes a value in text form.
///
/// # Examples
///
/// ```rust
/// use futhark_data::{to_string, Array, PrimitiveType, Value};
///
/// assert_eq!(to_string(&Value::from(3i64)), "3i64");
///
/// let empty = Array::empty(PrimitiveType::F32, vec![3, 0]).unwrap();
/// assert_eq!(to_string(&Value::from(empty)), "empty([3][0]f32)");
/// ```
#[must_use]
pub fn to_string(value: &Value) -> String {
    let mut out = String::new();
    ser::write_value_text(value, &mut out);
    out
}

/// Encodes a value as a binary frame.
///
/// # Errors
///
/// Returns an error if the value has more than 255 dimensions.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec(value: &Value) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    binary::write_value(value, &mut out)?;
    Ok(out)
}

/// Writes a value to a byte sink, in binary form.
///
/// # Examples
///
/// ```rust
/// use futhark_data::{to_writer, Value};
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &Value::from(1i8)).unwrap();
/// assert_eq!(buffer, vec![b'b', 2, 0, b' ', b' ', b'i', b'8', 1]);
/// ```
///
/// # Errors
///
/// Returns an error if writing fails or the value cannot be framed.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W: io::Write>(writer: W, value: &Value) -> Result<()> {
    to_writer_with_options(writer, value, WriteOptions::default())
}

/// Writes a value to a byte sink with an explicit choice of format.
///
/// Each call writes exactly one value and nothing around it. Text values
/// written by separate calls to the same sink run together (`1i322i32`), so
/// write a separator between them or use one [`Serializer`], which puts a
/// newline between consecutive text values.
///
/// # Examples
///
/// ```rust
/// use futhark_data::{load_slice, Serializer, Value, WriteOptions};
///
/// let mut serializer = Serializer::with_options(Vec::new(), WriteOptions::text());
/// serializer.serialize(&Value::from(1i32)).unwrap();
/// serializer.serialize(&Value::from(2i32)).unwrap();
/// let bytes = serializer.into_inner();
/// assert_eq!(bytes, b"1i32\n2i32");
/// assert_eq!(load_slice(&bytes).count(), 2);
/// ```
///
/// # Errors
///
/// Returns an error if writing fails or the value cannot be framed.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W: io::Write>(
    writer: W,
    value: &Value,
    options: WriteOptions,
) -> Result<()> {
    Serializer::with_options(writer, options).serialize(value)
}
