//! Character-level reading and tokenization.
//!
//! The [`Reader`] treats its input as a stream of bytes that may be either
//! text or binary, so every character is one byte. Bytes that were read
//! ahead can be pushed back and are replayed, in order, before the
//! underlying source is read again.
//!
//! Line comments start with `--` and run to the end of the line. A single
//! `-` is left in the stream so it can begin a negative number.
//!
//! ```rust
//! use futhark_data::reader::{Reader, Token};
//!
//! let mut reader = Reader::new("-- a comment\n[1,-2]".as_bytes());
//! assert_eq!(reader.next_token().unwrap(), Some(Token::OpenBracket));
//! assert_eq!(reader.next_token().unwrap(), Some(Token::Atom("1".into())));
//! assert_eq!(reader.next_token().unwrap(), Some(Token::Comma));
//! assert_eq!(reader.next_token().unwrap(), Some(Token::Atom("-2".into())));
//! assert_eq!(reader.next_token().unwrap(), Some(Token::CloseBracket));
//! assert_eq!(reader.next_token().unwrap(), None);
//! ```

use crate::Result;
use std::collections::VecDeque;
use std::fmt;
use std::io::{self, Read};
use tracing::trace;

/// A lexical atom: one of the structural delimiters, or a maximal run of
/// other non-space characters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Comma,
    Atom(String),
}

impl Token {
    fn delimiter(byte: u8) -> Option<Token> {
        match byte {
            b'(' => Some(Token::OpenParen),
            b')' => Some(Token::CloseParen),
            b'[' => Some(Token::OpenBracket),
            b']' => Some(Token::CloseBracket),
            b',' => Some(Token::Comma),
            _ => None,
        }
    }

    /// The source text of the token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Token::OpenParen => "(",
            Token::CloseParen => ")",
            Token::OpenBracket => "[",
            Token::CloseBracket => "]",
            Token::Comma => ",",
            Token::Atom(s) => s,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whitespace as understood by the text format.
#[inline]
fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

/// A byte reader with unbounded pushback.
///
/// The reader does not buffer its source; wrap files and sockets in a
/// [`std::io::BufReader`].
pub struct Reader<R> {
    source: R,
    pushback: VecDeque<u8>,
}

impl<R: Read> Reader<R> {
    pub fn new(source: R) -> Self {
        Reader {
            source,
            pushback: VecDeque::new(),
        }
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.source.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Reads one byte, replaying pushed back bytes first.
    pub fn get(&mut self) -> Result<Option<u8>> {
        match self.pushback.pop_front() {
            Some(byte) => Ok(Some(byte)),
            None => self.read_byte(),
        }
    }

    /// Pushes a byte back so that the next [`get`](Self::get) returns it.
    pub fn unget(&mut self, byte: u8) {
        self.pushback.push_front(byte);
    }

    pub fn peek(&mut self) -> Result<Option<u8>> {
        let byte = self.get()?;
        if let Some(b) = byte {
            self.unget(b);
        }
        Ok(byte)
    }

    /// Reads up to `n` bytes. The result is shorter than `n` only when the
    /// input ends first.
    pub fn get_n(&mut self, n: usize) -> Result<Vec<u8>> {
        let buffered = n.min(self.pushback.len());
        let mut bytes: Vec<u8> = self.pushback.drain(..buffered).collect();
        let rest = (n - buffered) as u64;
        if rest > 0 {
            self.source.by_ref().take(rest).read_to_end(&mut bytes)?;
        }
        Ok(bytes)
    }

    /// Skips whitespace and `--` line comments.
    pub fn skip_spaces(&mut self) -> Result<()> {
        loop {
            match self.get()? {
                None => return Ok(()),
                Some(b) if is_space(b) => {}
                Some(b'-') => {
                    if self.peek()? == Some(b'-') {
                        self.skip_line()?;
                    } else {
                        self.unget(b'-');
                        return Ok(());
                    }
                }
                Some(b) => {
                    self.unget(b);
                    return Ok(());
                }
            }
        }
    }

    fn skip_line(&mut self) -> Result<()> {
        while let Some(b) = self.get()? {
            if b == b'\n' {
                break;
            }
        }
        Ok(())
    }

    /// Reads the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        self.skip_spaces()?;
        let mut atom = String::new();
        while let Some(b) = self.get()? {
            if is_space(b) {
                break;
            }
            if let Some(delimiter) = Token::delimiter(b) {
                if atom.is_empty() {
                    trace!(token = %delimiter, "next token");
                    return Ok(Some(delimiter));
                }
                self.unget(b);
                break;
            }
            atom.push(char::from(b));
        }

        if atom.is_empty() {
            Ok(None)
        } else {
            trace!(token = %atom, "next token");
            Ok(Some(Token::Atom(atom)))
        }
    }

    /// Pushes a token back, followed by a separating space, so that the next
    /// [`next_token`](Self::next_token) reproduces it.
    pub fn unget_token(&mut self, token: &Token) {
        trace!(token = %token, "unget token");
        self.unget(b' ');
        for c in token.as_str().chars().rev() {
            // Atoms are built one byte per char, so every char fits in a byte.
            self.unget(c as u8);
        }
    }

    /// Returns `true` if only whitespace and comments remain.
    pub fn at_end(&mut self) -> Result<bool> {
        self.skip_spaces()?;
        Ok(self.peek()?.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<String> {
        let mut reader = Reader::new(input.as_bytes());
        let mut out = Vec::new();
        while let Some(tok) = reader.next_token().unwrap() {
            out.push(tok.to_string());
        }
        out
    }

    #[test]
    fn test_delimiters_split_atoms() {
        assert_eq!(
            tokens("empty([2][0]i32)"),
            vec!["empty", "(", "[", "2", "]", "[", "0", "]", "i32", ")"]
        );
        assert_eq!(tokens("[1,2]"), vec!["[", "1", ",", "2", "]"]);
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(tokens("-- one\n  -- two\n3i64 -- three"), vec!["3i64"]);
        assert_eq!(tokens("--"), Vec::<String>::new());
    }

    #[test]
    fn test_lone_minus_starts_number() {
        assert_eq!(tokens("-5i8 - 3"), vec!["-5i8", "-", "3"]);
    }

    #[test]
    fn test_unget_token_replays() {
        let mut reader = Reader::new("abc def".as_bytes());
        let tok = reader.next_token().unwrap().unwrap();
        reader.unget_token(&tok);
        assert_eq!(reader.next_token().unwrap(), Some(Token::Atom("abc".into())));
        assert_eq!(reader.next_token().unwrap(), Some(Token::Atom("def".into())));
        assert_eq!(reader.next_token().unwrap(), None);
    }

    #[test]
    fn test_get_n_mixes_pushback_and_source() {
        let mut reader = Reader::new(&b"cdef"[..]);
        reader.unget(b'b');
        reader.unget(b'a');
        assert_eq!(reader.get_n(4).unwrap(), b"abcd".to_vec());
        assert_eq!(reader.get_n(10).unwrap(), b"ef".to_vec());
        assert_eq!(reader.get_n(1).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut reader = Reader::new(&b"x"[..]);
        assert_eq!(reader.peek().unwrap(), Some(b'x'));
        assert_eq!(reader.get().unwrap(), Some(b'x'));
        assert_eq!(reader.peek().unwrap(), None);
    }

    #[test]
    fn test_at_end() {
        let mut reader = Reader::new(" \n-- trailing comment".as_bytes());
        assert!(reader.at_end().unwrap());
        let mut reader = Reader::new(" 1 ".as_bytes());
        assert!(!reader.at_end().unwrap());
    }
}
