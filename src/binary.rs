//! The binary frame codec.
//!
//! A binary value is laid out as follows, with every integer little-endian:
//!
//! ```text
//! byte       'b'              mode marker
//! byte       version          must equal BINARY_FORMAT_VERSION
//! byte       rank r
//! 4 bytes    type name        e.g. " i32", "bool"
//! 8*r bytes  dimension sizes  one u64 per dimension
//! N bytes    elements         row-major, N = size(type) * product(dims)
//! ```
//!
//! There is no padding, alignment or checksum. A frame of rank 0 holds a
//! single element and decodes to a scalar.

use crate::reader::Reader;
use crate::types::{Element, PrimitiveType};
use crate::{Array, Error, Result, Value};
use std::io::Read;
use tracing::debug;

/// First byte of every binary frame.
pub const MAGIC: u8 = b'b';

/// The only binary layout this crate reads and writes.
pub const BINARY_FORMAT_VERSION: u8 = 2;

/// Consumes and checks the version byte that follows the mode marker.
pub(crate) fn read_version<R: Read>(reader: &mut Reader<R>) -> Result<()> {
    let version = reader
        .get()?
        .ok_or_else(|| Error::malformed_frame("missing format version"))?;
    if version != BINARY_FORMAT_VERSION {
        return Err(Error::UnsupportedFormatVersion {
            expected: BINARY_FORMAT_VERSION,
            found: version,
        });
    }
    Ok(())
}

fn read_exact<R: Read>(reader: &mut Reader<R>, n: usize, what: &str) -> Result<Vec<u8>> {
    let bytes = reader.get_n(n)?;
    if bytes.len() != n {
        return Err(Error::malformed_frame(&format!(
            "expected {} bytes of {}, got {}",
            n,
            what,
            bytes.len()
        )));
    }
    Ok(bytes)
}

/// Decodes the rest of a frame once the marker and version are consumed.
pub(crate) fn read_body<R: Read>(reader: &mut Reader<R>) -> Result<Value> {
    let rank = reader
        .get()?
        .ok_or_else(|| Error::malformed_frame("missing rank"))?;

    let name = read_exact(reader, 4, "type name")?;
    let name: [u8; 4] = [name[0], name[1], name[2], name[3]];
    let ty = PrimitiveType::from_binary_name(&name)
        .ok_or_else(|| Error::unknown_type(&String::from_utf8_lossy(&name)))?;

    let mut shape = Vec::with_capacity(usize::from(rank));
    for _ in 0..rank {
        let word = read_exact(reader, 8, "dimension size")?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&word);
        let dim = usize::try_from(u64::from_le_bytes(buf))
            .map_err(|_| Error::malformed_frame("dimension size does not fit in memory"))?;
        shape.push(dim);
    }
    debug!(rank, ty = %ty, ?shape, "binary frame header");

    let payload_len = shape
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .and_then(|count| count.checked_mul(ty.size()))
        .ok_or_else(|| Error::malformed_frame("element data does not fit in memory"))?;
    let payload = read_exact(reader, payload_len, "element data")?;

    with_element_type!(ty, T => decode_elements::<T>(shape, &payload))
}

fn decode_elements<T: Element>(shape: Vec<usize>, payload: &[u8]) -> Result<Value> {
    let elements: Vec<T> = payload
        .chunks_exact(T::TYPE.size())
        .map(T::read_le)
        .collect();
    if shape.is_empty() {
        return elements
            .first()
            .map(|&e| Value::Scalar(e.into_scalar()))
            .ok_or_else(|| Error::malformed_frame("scalar frame without element"));
    }
    // The payload length already matches, so only an oversized shape fails here.
    let dims = format!("{:?}", shape);
    Array::from_shape_vec(shape, elements)
        .map(Value::Array)
        .map_err(|_| Error::malformed_frame(&format!("dimensions {} are too large", dims)))
}

/// Appends the complete binary frame for `value`, marker and version included.
///
/// # Errors
///
/// Returns [`Error::Custom`] if the value has more than 255 dimensions.
pub fn write_value(value: &Value, out: &mut Vec<u8>) -> Result<()> {
    let rank = u8::try_from(value.rank())
        .map_err(|_| Error::custom(format!("rank {} exceeds 255", value.rank())))?;

    out.push(MAGIC);
    out.push(BINARY_FORMAT_VERSION);
    out.push(rank);
    out.extend_from_slice(value.primitive_type().binary_name());
    for &dim in value.shape() {
        out.extend_from_slice(&(dim as u64).to_le_bytes());
    }

    match value {
        Value::Scalar(s) => s.write_le(out),
        Value::Array(a) => write_elements(a, out),
    }
    Ok(())
}

/// Element bytes in row-major order, whatever the memory layout of the array.
fn write_elements(array: &Array, out: &mut Vec<u8>) {
    out.reserve(array.len() * array.primitive_type().size());
    match_variants!(Array, array, a => {
        for &x in a.iter() {
            x.write_le(out);
        }
    })
}
