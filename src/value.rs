//! The value model.
//!
//! A [`Value`] is either a [`Scalar`] (one primitive element) or an [`Array`]
//! (a rectangular, row-major, multi-dimensional array whose elements all share
//! one primitive type). Arrays are backed by [`ndarray::ArrayD`].
//!
//! ## Creating Values
//!
//! ```rust
//! use futhark_data::{Value, Scalar, PrimitiveType};
//! use ndarray::{arr2, ArrayD};
//!
//! let scalar = Value::from(3i64);
//! assert_eq!(scalar.primitive_type(), PrimitiveType::I64);
//! assert_eq!(scalar.rank(), 0);
//!
//! let matrix = Value::from(arr2(&[[1.0f32, 2.0], [3.0, 4.0]]).into_dyn());
//! assert_eq!(matrix.shape(), &[2, 2]);
//! assert_eq!(matrix.to_string(), "[[1.000000f32, 2.000000f32], [3.000000f32, 4.000000f32]]");
//! ```
//!
//! ## Extracting Values
//!
//! ```rust
//! use futhark_data::{from_str, Value};
//!
//! let value = from_str("[1u8, 2u8, 3u8]").unwrap();
//! let array = value.as_array().and_then(|a| a.as_array::<u8>()).unwrap();
//! assert_eq!(array.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
//! ```

use crate::types::{Element, PrimitiveType};
use crate::{Error, Result};
use ndarray::{ArrayD, IxDyn};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single primitive element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scalar {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Bool(bool),
}

impl Scalar {
    /// The primitive type of this scalar.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use futhark_data::{Scalar, PrimitiveType};
    ///
    /// assert_eq!(Scalar::U16(7).primitive_type(), PrimitiveType::U16);
    /// assert_eq!(Scalar::Bool(true).primitive_type(), PrimitiveType::Bool);
    /// ```
    #[must_use]
    pub fn primitive_type(&self) -> PrimitiveType {
        match_variants!(Scalar, self, v => element_type_of(v))
    }

    /// Extracts the element if this scalar has type `T`.
    #[must_use]
    pub fn get<T: Element>(self) -> Option<T> {
        T::from_scalar(self)
    }

    pub(crate) fn write_text(self, out: &mut String) {
        match_variants!(Scalar, self, v => v.write_text(out))
    }

    pub(crate) fn write_le(self, out: &mut Vec<u8>) {
        match_variants!(Scalar, self, v => v.write_le(out))
    }
}

fn element_type_of<T: Element>(_: &T) -> PrimitiveType {
    T::TYPE
}

/// A rectangular multi-dimensional array of one primitive type.
///
/// The shape may contain zeros, in which case the array is *empty*: it keeps
/// its type and shape but holds no elements.
#[derive(Clone, Debug, PartialEq)]
pub enum Array {
    I8(ArrayD<i8>),
    I16(ArrayD<i16>),
    I32(ArrayD<i32>),
    I64(ArrayD<i64>),
    U8(ArrayD<u8>),
    U16(ArrayD<u16>),
    U32(ArrayD<u32>),
    U64(ArrayD<u64>),
    F32(ArrayD<f32>),
    F64(ArrayD<f64>),
    Bool(ArrayD<bool>),
}

impl Array {
    /// Builds an array from a shape and its row-major elements.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IrregularShape`] when `shape` has no dimensions (a
    /// rank-0 value is a [`Scalar`]) or `elements.len()` differs from the
    /// product of `shape`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use futhark_data::Array;
    ///
    /// let array = Array::from_shape_vec(vec![2, 2], vec![1i32, 2, 3, 4]).unwrap();
    /// assert_eq!(array.shape(), &[2, 2]);
    /// assert!(Array::from_shape_vec(vec![3], vec![1i32]).is_err());
    /// assert!(Array::from_shape_vec(vec![], vec![1i32]).is_err());
    /// ```
    pub fn from_shape_vec<T: Element>(shape: Vec<usize>, elements: Vec<T>) -> Result<Self> {
        if shape.is_empty() {
            return Err(Error::irregular_shape(0, "at least one dimension", "none"));
        }
        let expected: usize = shape.iter().product();
        let found = elements.len();
        ArrayD::from_shape_vec(IxDyn(&shape), elements)
            .map(T::into_array)
            .map_err(|_| Error::irregular_shape(0, &expected.to_string(), &found.to_string()))
    }

    /// Builds an array of the given type whose shape has a zero product.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEmptyArray`] when `shape` is empty or its product is nonzero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use futhark_data::{Array, PrimitiveType};
    ///
    /// let array = Array::empty(PrimitiveType::F32, vec![3, 0]).unwrap();
    /// assert!(array.is_empty());
    /// assert!(Array::empty(PrimitiveType::F32, vec![3, 1]).is_err());
    /// ```
    pub fn empty(ty: PrimitiveType, shape: Vec<usize>) -> Result<Self> {
        if shape.is_empty() {
            return Err(Error::invalid_empty_array("no dimensions given"));
        }
        if shape.iter().product::<usize>() != 0 {
            return Err(Error::invalid_empty_array(&format!(
                "shape {:?} has nonzero size",
                shape
            )));
        }
        with_element_type!(ty, T => Self::from_shape_vec::<T>(shape, Vec::new()))
    }

    #[must_use]
    pub fn primitive_type(&self) -> PrimitiveType {
        match_variants!(Array, self, a => array_element_type(a))
    }

    /// The dimension sizes, outermost first.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        match_variants!(Array, self, a => a.shape())
    }

    #[must_use]
    pub fn rank(&self) -> usize {
        self.shape().len()
    }

    /// Total number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        match_variants!(Array, self, a => a.len())
    }

    /// Returns `true` if the shape has a zero product.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrows the underlying `ndarray` if the element type is `T`.
    #[must_use]
    pub fn as_array<T: Element>(&self) -> Option<&ArrayD<T>> {
        T::array_ref(self)
    }

    /// The single element of a rank-0 array.
    fn zero_dimensional_scalar(&self) -> Option<Scalar> {
        if self.rank() != 0 {
            return None;
        }
        match_variants!(Array, self, a => a.iter().next().map(|&x| x.into_scalar()))
    }
}

fn array_element_type<T: Element>(_: &ArrayD<T>) -> PrimitiveType {
    T::TYPE
}

/// A decoded value: a scalar or an array.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    Array(Array),
}

impl Value {
    #[must_use]
    pub fn primitive_type(&self) -> PrimitiveType {
        match self {
            Value::Scalar(s) => s.primitive_type(),
            Value::Array(a) => a.primitive_type(),
        }
    }

    /// The shape of the value; scalars have an empty shape.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        match self {
            Value::Scalar(_) => &[],
            Value::Array(a) => a.shape(),
        }
    }

    #[must_use]
    pub fn rank(&self) -> usize {
        self.shape().len()
    }

    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self, Value::Scalar(_))
    }

    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    #[must_use]
    pub fn as_scalar(&self) -> Option<Scalar> {
        match self {
            Value::Scalar(s) => Some(*s),
            Value::Array(_) => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Scalar(_) => None,
            Value::Array(a) => Some(a),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_text(&mut out);
        f.write_str(&out)
    }
}

impl fmt::Display for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        crate::ser::write_array_text(self, &mut out);
        f.write_str(&out)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(s) => fmt::Display::fmt(s, f),
            Value::Array(a) => fmt::Display::fmt(a, f),
        }
    }
}

// Values travel through other serde formats as their canonical text.
impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a value in the textual data format")
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                crate::from_str(value).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(ValueVisitor)
    }
}

macro_rules! impl_from_element {
    ($($ty:ty),*) => {$(
        impl From<$ty> for Scalar {
            fn from(value: $ty) -> Self {
                value.into_scalar()
            }
        }

        impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::Scalar(value.into_scalar())
            }
        }

        impl From<ArrayD<$ty>> for Array {
            fn from(value: ArrayD<$ty>) -> Self {
                <$ty as Element>::into_array(value)
            }
        }

        impl From<ArrayD<$ty>> for Value {
            fn from(value: ArrayD<$ty>) -> Self {
                Value::from(<$ty as Element>::into_array(value))
            }
        }
    )*};
}

impl_from_element!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, bool);

impl From<Scalar> for Value {
    fn from(value: Scalar) -> Self {
        Value::Scalar(value)
    }
}

/// Rank-0 arrays become [`Value::Scalar`], so a value has one rank-0 form.
impl From<Array> for Value {
    fn from(value: Array) -> Self {
        match value.zero_dimensional_scalar() {
            Some(scalar) => Value::Scalar(scalar),
            None => Value::Array(value),
        }
    }
}
