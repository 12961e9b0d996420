//! Line Protocol Implementation
//!
//! LayerKV speaks a plain-text protocol: one request per `\n`-terminated line,
//! space-separated tokens, and exactly one reply line per request.
//!
//! ## Modules
//!
//! - `types`: Defines the `Reply` enum and serialization
//! - `parser`: Incremental line framing for incoming data
//!
//! ## Example
//!
//! ```
//! use layerkv::protocol::{parse_line, Reply};
//!
//! // Framing incoming data
//! let (line, consumed) = parse_line(b"GET name\n").unwrap().unwrap();
//! assert_eq!((line.as_str(), consumed), ("GET name", 9));
//!
//! // Creating replies
//! let bytes = Reply::text("Ariz").serialize();
//! assert_eq!(bytes.as_ref(), b"Ariz\n");
//! ```

pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use parser::{parse_line, LineParser, ParseError, ParseResult, MAX_LINE_LENGTH};
pub use types::Reply;
