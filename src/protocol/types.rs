//! Reply Types for the Line Protocol
//!
//! Every request produces exactly one reply line. A reply is one of:
//! - `OK` for writes with nothing else to report
//! - a text value (the result of `GET`, `LRANGE`, ...)
//! - an integer (`STRLEN`)
//! - an error message (`ERR ...` / `WRONGTYPE ...`)
//!
//! All replies are terminated with a single `\n`.
//!
//! ## Examples
//!
//! OK: `OK\n`
//! Text: `Ariz\n`
//! Integer: `5\n`
//! Error: `ERR key not found\n`

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

/// The line terminator used by the protocol
pub const LF: u8 = b'\n';

/// A reply to a single request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Acknowledges a write
    Ok,

    /// A text result
    Text(String),

    /// An integer result
    Integer(i64),

    /// An error message
    Error(String),
}

impl Reply {
    /// Creates a text reply.
    ///
    /// # Example
    /// ```
    /// use layerkv::protocol::types::Reply;
    /// let reply = Reply::text("hello");
    /// assert_eq!(reply.serialize().as_ref(), b"hello\n");
    /// ```
    pub fn text(s: impl Into<String>) -> Self {
        Reply::Text(s.into())
    }

    /// Creates an error reply.
    pub fn error(msg: impl Into<String>) -> Self {
        Reply::Error(msg.into())
    }

    /// Returns true if this is an error reply.
    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }

    /// Serializes the reply into a single newline-terminated line.
    ///
    /// Embedded line breaks in text are escaped so the reply can never span
    /// more than one line.
    pub fn serialize(&self) -> Bytes {
        let body = self.to_string();
        let mut buf = BytesMut::with_capacity(body.len() + 1);
        for ch in body.chars() {
            match ch {
                '\n' => buf.put_slice(b"\\n"),
                '\r' => buf.put_slice(b"\\r"),
                _ => {
                    let mut utf8 = [0u8; 4];
                    buf.put_slice(ch.encode_utf8(&mut utf8).as_bytes());
                }
            }
        }
        buf.put_u8(LF);
        buf.freeze()
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ok => f.write_str("OK"),
            Reply::Text(s) => f.write_str(s),
            Reply::Integer(n) => write!(f, "{}", n),
            Reply::Error(msg) => f.write_str(msg),
        }
    }
}
