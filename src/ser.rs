//! Encoding values as text or binary.
//!
//! ## Text Form
//!
//! The text form follows fixed rules:
//!
//! - integers: decimal digits followed by the type suffix (`3i64`, `255u8`)
//! - booleans: `true` / `false`
//! - floats: six fractional digits and the suffix (`1.500000f32`), with
//!   `f32.nan`, `f32.inf` and `-f32.inf` (and the `f64` forms) for special values
//! - arrays with no elements: `empty([3][0]f32)`
//! - other arrays: `[` elements separated by `, ` `]`, nested per dimension
//!
//! ## Binary Form
//!
//! See [`crate::binary`] for the frame layout.
//!
//! ## Usage
//!
//! ```rust
//! use futhark_data::{Serializer, Value, WriteOptions};
//!
//! let mut serializer = Serializer::with_options(Vec::new(), WriteOptions::text());
//! serializer.serialize(&Value::from(1u8)).unwrap();
//! serializer.serialize(&Value::from(2u8)).unwrap();
//! assert_eq!(serializer.into_inner(), b"1u8\n2u8");
//! ```

use crate::options::{Format, WriteOptions};
use crate::types::Element;
use crate::{binary, Array, Result, Value};
use ndarray::ArrayViewD;
use std::io;
use tracing::debug;

/// The value writer.
///
/// Writes values to a byte sink. Byte sinks take the binary form unless the
/// options ask for text; consecutive text values are separated by newlines.
pub struct Serializer<W> {
    writer: W,
    options: WriteOptions,
    written: usize,
}

impl<W: io::Write> Serializer<W> {
    pub fn new(writer: W) -> Self {
        Self::with_options(writer, WriteOptions::default())
    }

    pub fn with_options(writer: W, options: WriteOptions) -> Self {
        Serializer {
            writer,
            options,
            written: 0,
        }
    }

    /// Writes one value.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails or the value cannot be framed.
    pub fn serialize(&mut self, value: &Value) -> Result<()> {
        let format = self.options.format_for(Format::Binary);
        debug!(
            format = format.as_str(),
            ty = %value.primitive_type(),
            shape = ?value.shape(),
            "encoding value"
        );

        let bytes = match format {
            Format::Text => {
                let mut text = String::new();
                if self.written > 0 {
                    text.push('\n');
                }
                write_value_text(value, &mut text);
                text.into_bytes()
            }
            Format::Binary => {
                let mut frame = Vec::new();
                binary::write_value(value, &mut frame)?;
                frame
            }
        };
        self.writer.write_all(&bytes)?;
        self.written += 1;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Appends the canonical text of `value`.
pub(crate) fn write_value_text(value: &Value, out: &mut String) {
    match value {
        Value::Scalar(s) => s.write_text(out),
        Value::Array(a) => write_array_text(a, out),
    }
}

pub(crate) fn write_array_text(array: &Array, out: &mut String) {
    if array.is_empty() {
        out.push_str("empty(");
        for dim in array.shape() {
            out.push('[');
            out.push_str(&dim.to_string());
            out.push(']');
        }
        out.push_str(array.primitive_type().suffix());
        out.push(')');
        return;
    }
    match_variants!(Array, array, a => write_nested(a.view(), out))
}

fn write_nested<T: Element>(view: ArrayViewD<'_, T>, out: &mut String) {
    if view.ndim() == 0 {
        if let Some(&x) = view.iter().next() {
            x.write_text(out);
        }
        return;
    }

    out.push('[');
    if view.ndim() == 1 {
        for (i, &x) in view.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            x.write_text(out);
        }
    } else {
        for (i, row) in view.outer_iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            write_nested(row, out);
        }
    }
    out.push(']');
}
