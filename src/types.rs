//! The primitive type registry.
//!
//! Every value in the format is built from one of eleven primitive types. Each
//! primitive has a byte size, a four byte name used by the binary frame, and a
//! suffix used by textual literals:
//!
//! | Type   | Size | Binary name | Suffix |
//! |--------|------|-------------|--------|
//! | `i8`   | 1    | `"  i8"`    | `i8`   |
//! | `i16`  | 2    | `" i16"`    | `i16`  |
//! | `i32`  | 4    | `" i32"`    | `i32`  |
//! | `i64`  | 8    | `" i64"`    | `i64`  |
//! | `u8`   | 1    | `"  u8"`    | `u8`   |
//! | `u16`  | 2    | `" u16"`    | `u16`  |
//! | `u32`  | 4    | `" u32"`    | `u32`  |
//! | `u64`  | 8    | `" u64"`    | `u64`  |
//! | `f32`  | 4    | `" f32"`    | `f32`  |
//! | `f64`  | 8    | `" f64"`    | `f64`  |
//! | `bool` | 1    | `"bool"`    | `bool` |
//!
//! The table is immutable and is looked up by tag ([`PrimitiveType::info`]),
//! by binary name ([`PrimitiveType::from_binary_name`]) or by suffix
//! ([`PrimitiveType::from_suffix`]).
//!
//! ```rust
//! use futhark_data::PrimitiveType;
//!
//! assert_eq!(PrimitiveType::from_suffix("u16"), Some(PrimitiveType::U16));
//! assert_eq!(PrimitiveType::from_binary_name(b" f64"), Some(PrimitiveType::F64));
//! assert_eq!(PrimitiveType::Bool.size(), 1);
//! ```

use crate::value::{Array, Scalar};
use ndarray::ArrayD;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the eleven primitive element types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Bool,
}

/// A row of the primitive type registry.
#[derive(Debug)]
pub struct PrimitiveInfo {
    pub ty: PrimitiveType,
    pub size: usize,
    pub binary_name: [u8; 4],
    pub suffix: &'static str,
}

// Rows are ordered like the enum variants; `info` indexes by discriminant.
static PRIMITIVES: [PrimitiveInfo; 11] = [
    PrimitiveInfo { ty: PrimitiveType::I8, size: 1, binary_name: *b"  i8", suffix: "i8" },
    PrimitiveInfo { ty: PrimitiveType::I16, size: 2, binary_name: *b" i16", suffix: "i16" },
    PrimitiveInfo { ty: PrimitiveType::I32, size: 4, binary_name: *b" i32", suffix: "i32" },
    PrimitiveInfo { ty: PrimitiveType::I64, size: 8, binary_name: *b" i64", suffix: "i64" },
    PrimitiveInfo { ty: PrimitiveType::U8, size: 1, binary_name: *b"  u8", suffix: "u8" },
    PrimitiveInfo { ty: PrimitiveType::U16, size: 2, binary_name: *b" u16", suffix: "u16" },
    PrimitiveInfo { ty: PrimitiveType::U32, size: 4, binary_name: *b" u32", suffix: "u32" },
    PrimitiveInfo { ty: PrimitiveType::U64, size: 8, binary_name: *b" u64", suffix: "u64" },
    PrimitiveInfo { ty: PrimitiveType::F32, size: 4, binary_name: *b" f32", suffix: "f32" },
    PrimitiveInfo { ty: PrimitiveType::F64, size: 8, binary_name: *b" f64", suffix: "f64" },
    PrimitiveInfo { ty: PrimitiveType::Bool, size: 1, binary_name: *b"bool", suffix: "bool" },
];

impl PrimitiveType {
    /// All primitive types, in registry order.
    pub const ALL: [PrimitiveType; 11] = [
        PrimitiveType::I8,
        PrimitiveType::I16,
        PrimitiveType::I32,
        PrimitiveType::I64,
        PrimitiveType::U8,
        PrimitiveType::U16,
        PrimitiveType::U32,
        PrimitiveType::U64,
        PrimitiveType::F32,
        PrimitiveType::F64,
        PrimitiveType::Bool,
    ];

    /// Type of integer literals written without a suffix.
    pub const DEFAULT_INTEGER: PrimitiveType = PrimitiveType::I32;

    /// Type of float literals written without a suffix.
    pub const DEFAULT_FLOAT: PrimitiveType = PrimitiveType::F64;

    /// Looks up the registry row for this type.
    #[inline]
    #[must_use]
    pub fn info(self) -> &'static PrimitiveInfo {
        &PRIMITIVES[self as usize]
    }

    /// Size in bytes of a single element.
    #[inline]
    #[must_use]
    pub fn size(self) -> usize {
        self.info().size
    }

    /// The four byte, space padded name used in binary frames.
    #[inline]
    #[must_use]
    pub fn binary_name(self) -> &'static [u8; 4] {
        &self.info().binary_name
    }

    /// The suffix used by textual literals, e.g. `i64` in `3i64`.
    #[inline]
    #[must_use]
    pub fn suffix(self) -> &'static str {
        self.info().suffix
    }

    /// Finds the type with the given binary name.
    #[must_use]
    pub fn from_binary_name(name: &[u8; 4]) -> Option<Self> {
        PRIMITIVES
            .iter()
            .find(|row| &row.binary_name == name)
            .map(|row| row.ty)
    }

    /// Finds the type with the given textual suffix.
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        PRIMITIVES
            .iter()
            .find(|row| row.suffix == suffix)
            .map(|row| row.ty)
    }

    #[must_use]
    pub const fn is_integer(self) -> bool {
        self.is_signed_integer() || self.is_unsigned_integer()
    }

    #[must_use]
    pub const fn is_signed_integer(self) -> bool {
        matches!(
            self,
            PrimitiveType::I8 | PrimitiveType::I16 | PrimitiveType::I32 | PrimitiveType::I64
        )
    }

    #[must_use]
    pub const fn is_unsigned_integer(self) -> bool {
        matches!(
            self,
            PrimitiveType::U8 | PrimitiveType::U16 | PrimitiveType::U32 | PrimitiveType::U64
        )
    }

    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, PrimitiveType::F32 | PrimitiveType::F64)
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// A Rust type that can be stored as an element of a value.
///
/// Implemented for `i8`, `i16`, `i32`, `i64`, `u8`, `u16`, `u32`, `u64`,
/// `f32`, `f64` and `bool`. The trait ties the Rust type to its
/// [`PrimitiveType`] and provides the byte and text conversions used by the
/// codecs.
pub trait Element: Copy + PartialEq + fmt::Debug + Send + Sync + 'static {
    const TYPE: PrimitiveType;

    /// Appends the little-endian encoding of `self`.
    fn write_le(self, out: &mut Vec<u8>);

    /// Decodes one element; `bytes` holds exactly `TYPE.size()` bytes.
    fn read_le(bytes: &[u8]) -> Self;

    /// Appends the canonical textual literal for `self`.
    fn write_text(self, out: &mut String);

    fn into_scalar(self) -> Scalar;

    fn from_scalar(scalar: Scalar) -> Option<Self>;

    fn into_array(array: ArrayD<Self>) -> Array;

    fn array_ref(array: &Array) -> Option<&ArrayD<Self>>;
}

macro_rules! impl_element_common {
    ($prim:ident) => {
        const TYPE: PrimitiveType = PrimitiveType::$prim;

        fn into_scalar(self) -> Scalar {
            Scalar::$prim(self)
        }

        fn from_scalar(scalar: Scalar) -> Option<Self> {
            match scalar {
                Scalar::$prim(v) => Some(v),
                _ => None,
            }
        }

        fn into_array(array: ArrayD<Self>) -> Array {
            Array::$prim(array)
        }

        fn array_ref(array: &Array) -> Option<&ArrayD<Self>> {
            match array {
                Array::$prim(a) => Some(a),
                _ => None,
            }
        }
    };
}

macro_rules! impl_numeric_element {
    ($($ty:ty => $prim:ident),* $(,)?) => {$(
        impl Element for $ty {
            impl_element_common!($prim);

            fn write_le(self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_le_bytes());
            }

            fn read_le(bytes: &[u8]) -> Self {
                let mut buf = [0u8; std::mem::size_of::<$ty>()];
                buf.copy_from_slice(bytes);
                <$ty>::from_le_bytes(buf)
            }

            fn write_text(self, out: &mut String) {
                write_number_text(self, out);
            }
        }
    )*};
}

impl_numeric_element! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
}

impl Element for bool {
    impl_element_common!(Bool);

    fn write_le(self, out: &mut Vec<u8>) {
        out.push(u8::from(self));
    }

    fn read_le(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }

    fn write_text(self, out: &mut String) {
        out.push_str(if self { "true" } else { "false" });
    }
}

/// Numbers print in decimal followed by their suffix. Floats always carry six
/// fractional digits and use `<suffix>.nan` / `<suffix>.inf` for special values.
trait NumberText: Copy + fmt::Display + Element {
    fn special(self) -> Option<&'static str> {
        None
    }
    fn fixed(self) -> bool {
        false
    }
}

macro_rules! integer_text {
    ($($ty:ty),*) => {$(impl NumberText for $ty {})*};
}

integer_text!(i8, i16, i32, i64, u8, u16, u32, u64);

macro_rules! float_text {
    ($ty:ty, $nan:literal, $inf:literal, $neg_inf:literal) => {
        impl NumberText for $ty {
            fn special(self) -> Option<&'static str> {
                if self.is_nan() {
                    Some($nan)
                } else if self.is_infinite() {
                    Some(if self > 0.0 { $inf } else { $neg_inf })
                } else {
                    None
                }
            }

            fn fixed(self) -> bool {
                true
            }
        }
    };
}

float_text!(f32, "f32.nan", "f32.inf", "-f32.inf");
float_text!(f64, "f64.nan", "f64.inf", "-f64.inf");

fn write_number_text<T: NumberText>(value: T, out: &mut String) {
    if let Some(special) = value.special() {
        out.push_str(special);
        return;
    }
    if value.fixed() {
        out.push_str(&format!("{:.6}", value));
    } else {
        out.push_str(&value.to_string());
    }
    out.push_str(T::TYPE.suffix());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_rows_follow_variant_order() {
        for (index, ty) in PrimitiveType::ALL.iter().enumerate() {
            assert_eq!(*ty as usize, index);
            assert_eq!(ty.info().ty, *ty);
        }
    }

    #[test]
    fn test_lookup_by_binary_name_and_suffix() {
        for ty in PrimitiveType::ALL {
            assert_eq!(PrimitiveType::from_binary_name(ty.binary_name()), Some(ty));
            assert_eq!(PrimitiveType::from_suffix(ty.suffix()), Some(ty));
        }
        assert_eq!(PrimitiveType::from_binary_name(b" i32"), Some(PrimitiveType::I32));
        assert_eq!(PrimitiveType::from_binary_name(b"i32 "), None);
        assert_eq!(PrimitiveType::from_suffix("f16"), None);
    }

    #[test]
    fn test_sizes() {
        assert_eq!(PrimitiveType::I8.size(), 1);
        assert_eq!(PrimitiveType::U16.size(), 2);
        assert_eq!(PrimitiveType::F32.size(), 4);
        assert_eq!(PrimitiveType::I64.size(), 8);
        assert_eq!(PrimitiveType::Bool.size(), 1);
    }

    #[test]
    fn test_classification() {
        assert!(PrimitiveType::I16.is_signed_integer());
        assert!(PrimitiveType::U64.is_unsigned_integer());
        assert!(PrimitiveType::F32.is_float());
        assert!(!PrimitiveType::Bool.is_integer());
        assert!(!PrimitiveType::Bool.is_float());
    }

    #[test]
    fn test_element_text() {
        let mut out = String::new();
        255u8.write_text(&mut out);
        out.push(' ');
        (-3i64).write_text(&mut out);
        out.push(' ');
        1.5f32.write_text(&mut out);
        out.push(' ');
        f64::NEG_INFINITY.write_text(&mut out);
        out.push(' ');
        f32::NAN.write_text(&mut out);
        out.push(' ');
        true.write_text(&mut out);
        assert_eq!(out, "255u8 -3i64 1.500000f32 -f64.inf f32.nan true");
    }

    #[test]
    fn test_element_bytes() {
        let mut out = Vec::new();
        (-2i16).write_le(&mut out);
        assert_eq!(out, vec![0xFE, 0xFF]);
        assert_eq!(i16::read_le(&out), -2);
        assert!(bool::read_le(&[1]));
        assert!(!bool::read_le(&[0]));
    }

    #[test]
    fn test_serde_uses_suffix() {
        let json = serde_json::to_string(&PrimitiveType::Bool).unwrap();
        assert_eq!(json, "\"bool\"");
        let ty: PrimitiveType = serde_json::from_str("\"u32\"").unwrap();
        assert_eq!(ty, PrimitiveType::U32);
    }
}
