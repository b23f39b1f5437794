//! Error types for reading and writing Futhark data values.
//!
//! Every failure aborts the value that was being decoded. Nothing is
//! retried and nothing is coerced: the caller gets the error synchronously
//! and decides whether to abandon the stream.
//!
//! ## Error Categories
//!
//! - **Text errors**: invalid literals, unknown type suffixes, misplaced tokens
//! - **Array errors**: heterogeneous element types, irregular nesting, bad `empty(...)`
//! - **Binary errors**: unsupported format version, truncated frames, unknown type names
//! - **I/O errors**: failures of the underlying reader or writer
//!
//! ## Examples
//!
//! ```rust
//! use futhark_data::{from_str, Error};
//!
//! let err = from_str("[1, true]").unwrap_err();
//! assert!(matches!(err, Error::HeterogeneousArray { .. }));
//! ```

use crate::types::PrimitiveType;
use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while decoding or encoding a value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// The input ended in the middle of a token, frame or array
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEndOfInput { expected: String },

    /// A token that matches none of the scalar literal forms
    #[error("Invalid literal `{token}`{reason}")]
    InvalidLiteral { token: String, reason: String },

    /// A type suffix or binary type name that is not one of the known primitives
    #[error("Unknown type: {0:?}")]
    UnknownTypeTag(String),

    /// An array literal mixing element types
    #[error("Array elements must share one type: expected {expected}, found {found}")]
    HeterogeneousArray {
        expected: PrimitiveType,
        found: PrimitiveType,
    },

    /// Sub-arrays at the same depth with differing lengths
    #[error("Irregular array at depth {depth}: expected {expected} elements, found {found}")]
    IrregularShape {
        depth: usize,
        expected: String,
        found: String,
    },

    /// `empty(...)` with no dimensions, or with dimensions whose product is nonzero
    #[error("Invalid empty array: {0}")]
    InvalidEmptyArray(String),

    /// Binary version byte differs from the supported version
    #[error("Expected binary format version {expected}, got format version {found}")]
    UnsupportedFormatVersion { expected: u8, found: u8 },

    /// Binary frame truncated or inconsistent with its declared shape and type
    #[error("Malformed binary frame: {0}")]
    MalformedBinaryFrame(String),

    /// A structural token out of place
    #[error("Unexpected token: expected {expected}, found `{found}`")]
    UnexpectedToken { expected: String, found: String },

    /// More input follows a value that was expected to be the only one
    #[error("Trailing data after value")]
    TrailingData,

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates an unexpected end-of-input error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use futhark_data::Error;
    ///
    /// let err = Error::unexpected_eof("`]`");
    /// assert!(err.to_string().contains("expected `]`"));
    /// ```
    pub fn unexpected_eof(expected: &str) -> Self {
        Error::UnexpectedEndOfInput {
            expected: expected.to_string(),
        }
    }

    /// Creates an invalid literal error with no further explanation.
    pub fn invalid_literal(token: &str) -> Self {
        Error::InvalidLiteral {
            token: token.to_string(),
            reason: String::new(),
        }
    }

    /// Creates an invalid literal error explaining why the token was rejected.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use futhark_data::Error;
    ///
    /// let err = Error::invalid_literal_because("300u8", "out of range for u8");
    /// assert_eq!(err.to_string(), "Invalid literal `300u8`: out of range for u8");
    /// ```
    pub fn invalid_literal_because(token: &str, reason: &str) -> Self {
        Error::InvalidLiteral {
            token: token.to_string(),
            reason: format!(": {}", reason),
        }
    }

    /// Creates an unknown type error from a suffix or a raw binary type name.
    pub fn unknown_type(name: &str) -> Self {
        Error::UnknownTypeTag(name.to_string())
    }

    /// Creates an irregular shape error for sub-arrays at `depth`.
    pub fn irregular_shape(depth: usize, expected: &str, found: &str) -> Self {
        Error::IrregularShape {
            depth,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    pub fn invalid_empty_array(msg: &str) -> Self {
        Error::InvalidEmptyArray(msg.to_string())
    }

    pub fn malformed_frame(msg: &str) -> Self {
        Error::MalformedBinaryFrame(msg.to_string())
    }

    /// Creates an error for a structural token that appeared where something else was expected.
    pub fn unexpected_token(expected: &str, found: &str) -> Self {
        Error::UnexpectedToken {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reader or writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::io(&err.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
