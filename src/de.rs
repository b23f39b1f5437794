//! Decoding values from text or binary input.
//!
//! This module provides the [`Deserializer`], which reads a sequence of values
//! from any [`std::io::Read`] source, and the [`StreamDeserializer`] iterator
//! that yields them lazily.
//!
//! ## Mode Detection
//!
//! Before each value the deserializer skips whitespace and comments and looks
//! at the next byte. A `b` starts a binary frame; anything else is parsed as
//! text. Text and binary values may be freely mixed in one stream.
//!
//! ## Text Grammar
//!
//! ```text
//! value    ::= 'empty' '(' dims type ')' | scalar | array
//! array    ::= '[' element (',' element)* ']'
//! element  ::= array | scalar
//! dims     ::= ('[' digits ']')+
//! comment  ::= '--' any-char* ('\n' | EOF)
//! ```
//!
//! Array literals must be homogeneous and regular. `[]` is not an array
//! literal; empty arrays are written `empty([0]i32)`.
//!
//! ## Usage
//!
//! ```rust
//! use futhark_data::{Deserializer, Value};
//!
//! let de = Deserializer::from_str("3i64 [1, 2] empty([0]bool)");
//! let values: Vec<Value> = de.into_iter().collect::<Result<_, _>>().unwrap();
//! assert_eq!(values.len(), 3);
//! assert_eq!(values[0], Value::from(3i64));
//! assert_eq!(values[1].shape(), &[2]);
//! assert!(values[2].as_array().unwrap().is_empty());
//! ```

use crate::binary::{self, MAGIC};
use crate::literal::{parse_dimension, parse_scalar};
use crate::reader::{Reader, Token};
use crate::types::{Element, PrimitiveType};
use crate::{Array, Error, Result, Scalar, Value};
use std::io::Read;
use std::iter::FusedIterator;
use tracing::debug;

/// Arrays nest at most this deep; binary frames cannot describe more dimensions.
const MAX_RANK: usize = u8::MAX as usize;

/// The value reader.
///
/// Wraps a byte source and decodes one value at a time. Created via
/// [`Deserializer::from_reader`], [`Deserializer::from_slice`] or
/// [`Deserializer::from_str`].
pub struct Deserializer<R> {
    reader: Reader<R>,
}

impl<'a> Deserializer<&'a [u8]> {
    pub fn from_slice(input: &'a [u8]) -> Self {
        Deserializer::from_reader(input)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &'a str) -> Self {
        Deserializer::from_reader(input.as_bytes())
    }
}

/// A parsed array literal before its shape and type are checked.
enum Node {
    Leaf(Scalar),
    List(Vec<Node>),
}

impl<R: Read> Deserializer<R> {
    /// Creates a deserializer over an unbuffered source; wrap files and
    /// sockets in a [`std::io::BufReader`].
    pub fn from_reader(reader: R) -> Self {
        Deserializer {
            reader: Reader::new(reader),
        }
    }

    /// Decodes the next value, or returns `None` once only whitespace and
    /// comments remain.
    ///
    /// # Errors
    ///
    /// Any decoding error. The stream position after an error is unspecified.
    pub fn next_value(&mut self) -> Result<Option<Value>> {
        if self.reader.at_end()? {
            return Ok(None);
        }
        let value = if self.next_is_binary()? {
            binary::read_body(&mut self.reader)?
        } else {
            self.text_value()?
        };
        debug!(ty = %value.primitive_type(), shape = ?value.shape(), "decoded value");
        Ok(Some(value))
    }

    /// Checks that only whitespace and comments remain.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TrailingData`] if another value follows.
    pub fn end(&mut self) -> Result<()> {
        if self.reader.at_end()? {
            Ok(())
        } else {
            Err(Error::TrailingData)
        }
    }

    /// Consumes the binary marker and version if the next value is binary.
    fn next_is_binary(&mut self) -> Result<bool> {
        self.reader.skip_spaces()?;
        match self.reader.get()? {
            Some(MAGIC) => {
                binary::read_version(&mut self.reader)?;
                debug!("binary mode");
                Ok(true)
            }
            Some(byte) => {
                self.reader.unget(byte);
                Ok(false)
            }
            None => Ok(false),
        }
    }

    fn expect_token(&mut self, expected: &str) -> Result<Token> {
        self.reader
            .next_token()?
            .ok_or_else(|| Error::unexpected_eof(expected))
    }

    fn expect_exact(&mut self, wanted: Token) -> Result<()> {
        let expected = format!("`{}`", wanted);
        let token = self.expect_token(&expected)?;
        if token == wanted {
            Ok(())
        } else {
            Err(Error::unexpected_token(&expected, token.as_str()))
        }
    }

    /// Parses one textual value.
    pub fn text_value(&mut self) -> Result<Value> {
        let token = self.expect_token("a value")?;
        if token.as_str() == "empty" {
            return self.read_empty_array().map(Value::Array);
        }
        self.reader.unget_token(&token);

        match self.text_scalars()? {
            Node::Leaf(scalar) => Ok(Value::Scalar(scalar)),
            Node::List(items) => build_array(items).map(Value::Array),
        }
    }

    /// Parses the remainder of `empty(...)` once the keyword is consumed.
    pub fn read_empty_array(&mut self) -> Result<Array> {
        self.expect_exact(Token::OpenParen)?;

        let mut shape = Vec::new();
        let ty = loop {
            match self.expect_token("a dimension or element type")? {
                Token::OpenBracket => {
                    let size = self.expect_token("a dimension size")?;
                    shape.push(parse_dimension(size.as_str())?);
                    self.expect_exact(Token::CloseBracket)?;
                }
                Token::Atom(name) => {
                    break PrimitiveType::from_suffix(&name)
                        .ok_or_else(|| Error::unknown_type(&name))?;
                }
                other => {
                    return Err(Error::unexpected_token(
                        "a dimension or element type",
                        other.as_str(),
                    ))
                }
            }
        };
        self.expect_exact(Token::CloseParen)?;

        Array::empty(ty, shape)
    }

    fn text_scalars(&mut self) -> Result<Node> {
        let token = self.expect_token("a value")?;
        self.text_element(token, 0)
    }

    fn text_element(&mut self, token: Token, depth: usize) -> Result<Node> {
        match token {
            Token::OpenBracket => self.text_elements(depth + 1).map(Node::List),
            Token::Atom(atom) => parse_scalar(&atom).map(Node::Leaf),
            other => Err(Error::unexpected_token("a scalar or `[`", other.as_str())),
        }
    }

    /// Parses array elements up to the closing `]`; the `[` is already consumed.
    fn text_elements(&mut self, depth: usize) -> Result<Vec<Node>> {
        if depth > MAX_RANK {
            return Err(Error::custom(format!(
                "arrays may have at most {} dimensions",
                MAX_RANK
            )));
        }

        let first = self.expect_token("an array element")?;
        if first == Token::CloseBracket {
            return Err(Error::unexpected_token(
                "an array element (empty arrays are written empty(...))",
                "]",
            ));
        }
        let mut items = vec![self.text_element(first, depth)?];

        loop {
            match self.expect_token("`,` or `]`")? {
                Token::CloseBracket => return Ok(items),
                Token::Comma => {
                    let token = self.expect_token("an array element")?;
                    items.push(self.text_element(token, depth)?);
                }
                other => return Err(Error::unexpected_token("`,` or `]`", other.as_str())),
            }
        }
    }
}

/// Checks that a nested literal is regular and homogeneous, and flattens it
/// into a row-major array.
fn build_array(items: Vec<Node>) -> Result<Array> {
    let mut shape = vec![items.len()];
    let mut first = items.first();
    let ty = loop {
        match first {
            Some(Node::List(sub)) => {
                shape.push(sub.len());
                first = sub.first();
            }
            Some(Node::Leaf(scalar)) => break scalar.primitive_type(),
            None => return Err(Error::unexpected_token("an array element", "]")),
        }
    };

    let mut flattener = Flattener {
        shape,
        ty,
        leaves: Vec::new(),
    };
    flattener.visit(items, 0)?;

    let Flattener { shape, leaves, .. } = flattener;
    debug!(ty = %ty, ?shape, "text array");
    with_element_type!(ty, T => collect_elements::<T>(shape, leaves))
}

struct Flattener {
    shape: Vec<usize>,
    ty: PrimitiveType,
    leaves: Vec<Scalar>,
}

impl Flattener {
    fn visit(&mut self, nodes: Vec<Node>, depth: usize) -> Result<()> {
        if nodes.len() != self.shape[depth] {
            return Err(Error::irregular_shape(
                depth,
                &self.shape[depth].to_string(),
                &nodes.len().to_string(),
            ));
        }

        let innermost = depth + 1 == self.shape.len();
        for node in nodes {
            match node {
                Node::Leaf(scalar) if innermost => {
                    let found = scalar.primitive_type();
                    if found != self.ty {
                        return Err(Error::HeterogeneousArray {
                            expected: self.ty,
                            found,
                        });
                    }
                    self.leaves.push(scalar);
                }
                Node::List(sub) if !innermost => self.visit(sub, depth + 1)?,
                Node::Leaf(_) => {
                    return Err(Error::irregular_shape(depth + 1, "an array", "a scalar"))
                }
                Node::List(_) => {
                    return Err(Error::irregular_shape(depth + 1, "a scalar", "an array"))
                }
            }
        }
        Ok(())
    }
}

fn collect_elements<T: Element>(shape: Vec<usize>, leaves: Vec<Scalar>) -> Result<Array> {
    let elements: Vec<T> = leaves.into_iter().filter_map(T::from_scalar).collect();
    Array::from_shape_vec(shape, elements)
}

/// An iterator over the values of a stream.
///
/// Created by [`Deserializer::into_iter`]. Yields values until the input is
/// exhausted and stops for good after the first error.
pub struct StreamDeserializer<R> {
    de: Deserializer<R>,
    failed: bool,
}

impl<R: Read> IntoIterator for Deserializer<R> {
    type Item = Result<Value>;
    type IntoIter = StreamDeserializer<R>;

    fn into_iter(self) -> Self::IntoIter {
        StreamDeserializer {
            de: self,
            failed: false,
        }
    }
}

impl<R: Read> Iterator for StreamDeserializer<R> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.de.next_value() {
            Ok(Some(value)) => Some(Ok(value)),
            Ok(None) => None,
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

impl<R: Read> FusedIterator for StreamDeserializer<R> {}
