//! Configuration options for writing values.
//!
//! A value can be written in either of two interchangeable forms:
//!
//! - [`Format::Text`]: human-readable literals such as `[1i64, 2i64]`
//! - [`Format::Binary`]: the compact binary frame
//!
//! By default the destination decides: string output is text, byte sinks
//! ([`std::io::Write`]) receive binary. [`WriteOptions`] overrides that choice.
//!
//! ## Examples
//!
//! ```rust
//! use futhark_data::{to_writer_with_options, Format, Value, WriteOptions};
//!
//! let mut buffer = Vec::new();
//! let options = WriteOptions::new().with_format(Format::Text);
//! to_writer_with_options(&mut buffer, &Value::from(3i64), options).unwrap();
//! assert_eq!(buffer, b"3i64");
//! ```

/// The encoding used for written values.
///
/// # Examples
///
/// ```rust
/// use futhark_data::Format;
///
/// assert_eq!(Format::Text.as_str(), "text");
/// assert_eq!(Format::Binary.as_str(), "binary");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Text,
    Binary,
}

impl Format {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Format::Text => "text",
            Format::Binary => "binary",
        }
    }
}

/// Configuration options for writing values.
///
/// # Examples
///
/// ```rust
/// use futhark_data::{Format, WriteOptions};
///
/// // Let the destination decide
/// let options = WriteOptions::new();
/// assert_eq!(options.format, None);
///
/// // Always write text
/// let options = WriteOptions::text();
/// assert_eq!(options.format, Some(Format::Text));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Explicit encoding, or `None` to use the destination's natural form.
    pub format: Option<Format>,
}

impl WriteOptions {
    /// Creates default options (the destination picks the format).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options that always write text.
    #[must_use]
    pub fn text() -> Self {
        WriteOptions {
            format: Some(Format::Text),
        }
    }

    /// Creates options that always write binary frames.
    #[must_use]
    pub fn binary() -> Self {
        WriteOptions {
            format: Some(Format::Binary),
        }
    }

    /// Sets the encoding explicitly.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use futhark_data::{Format, WriteOptions};
    ///
    /// let options = WriteOptions::new().with_format(Format::Binary);
    /// assert_eq!(options.format_for(Format::Text), Format::Binary);
    /// ```
    #[must_use]
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    /// The format to use for a destination whose natural form is `natural`.
    #[must_use]
    pub fn format_for(&self, natural: Format) -> Format {
        self.format.unwrap_or(natural)
    }
}
