//! Incremental Line Parser
//!
//! This module frames the byte stream coming from a client into request lines.
//! A request is everything up to a `\n`; an optional `\r` before it is dropped
//! so both `nc` and `telnet` style clients work.
//!
//! ## How the Parser Works
//!
//! The parser reads from a buffer and returns either:
//! - `Ok(Some((line, consumed)))` - Found a complete line, `consumed` bytes were used
//! - `Ok(None)` - Need more data, no line terminator yet
//! - `Err(ParseError)` - The pending line is longer than allowed
//!
//! This lets the connection handler append network reads to one buffer, pull
//! out every complete line, and keep any trailing partial line for later.

use crate::protocol::types::LF;
use thiserror::Error;

/// Errors that can occur while framing lines.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A line grew past the maximum length without a terminator
    #[error("line too long: {size} bytes (max: {max})")]
    LineTooLong { size: usize, max: usize },
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Maximum length of a single request line (64 KB)
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

/// An incremental line parser.
///
/// # Example
///
/// ```
/// use layerkv::protocol::LineParser;
///
/// let parser = LineParser::new();
/// let (line, consumed) = parser.parse(b"SET name Ariz\r\nGET").unwrap().unwrap();
/// assert_eq!(line, "SET name Ariz");
/// assert_eq!(consumed, 15);
/// ```
#[derive(Debug, Clone)]
pub struct LineParser {
    max_line_length: usize,
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LineParser {
    /// Creates a parser with the default line length limit.
    pub fn new() -> Self {
        Self {
            max_line_length: MAX_LINE_LENGTH,
        }
    }

    /// Creates a parser with a custom line length limit.
    pub fn with_max_line_length(max_line_length: usize) -> Self {
        Self { max_line_length }
    }

    /// Attempts to extract one line from the front of `buf`.
    ///
    /// Invalid UTF-8 is replaced rather than rejected; the command layer
    /// treats arguments as opaque text.
    pub fn parse(&self, buf: &[u8]) -> ParseResult<Option<(String, usize)>> {
        let Some(pos) = buf.iter().position(|&b| b == LF) else {
            if buf.len() > self.max_line_length {
                return Err(ParseError::LineTooLong {
                    size: buf.len(),
                    max: self.max_line_length,
                });
            }
            return Ok(None);
        };

        if pos > self.max_line_length {
            return Err(ParseError::LineTooLong {
                size: pos,
                max: self.max_line_length,
            });
        }

        let mut line = &buf[..pos];
        if let Some(stripped) = line.strip_suffix(b"\r") {
            line = stripped;
        }

        Ok(Some((String::from_utf8_lossy(line).into_owned(), pos + 1)))
    }
}

/// Convenience function to frame one line with the default parser.
pub fn parse_line(buf: &[u8]) -> ParseResult<Option<(String, usize)>> {
    LineParser::new().parse(buf)
}
