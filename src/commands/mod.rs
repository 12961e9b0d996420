//! Command Handler Module
//!
//! This module implements the command processing layer for LayerKV.
//! It receives request lines, executes them against the session's current
//! transaction layer, and returns a single reply line.
//!
//! ## Architecture
//!
//! ```text
//! Client Request
//!       │
//!       ▼
//! ┌─────────────────┐
//! │  Line Parser    │  (protocol module)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ CommandHandler  │  (this module)
//! │                 │
//! │  - Tokenize     │
//! │  - Validate     │
//! │  - Execute      │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │TransactionStack │  (storage module)
//! └─────────────────┘
//! ```
//!
//! ## Supported Commands
//!
//! ### String Commands
//! - `SET`, `SETEX`, `GET`, `GETSET`, `DEL`, `STRLEN`
//! - `INCR`, `INCRBY`, `DECR`, `DECRBY`
//!
//! ### List Commands
//! - `LPUSH`, `LRANGE`, `LPOP`
//!
//! ### Transaction Commands
//! - `BEGIN`/`MULTI`, `COMMIT`/`EXEC`, `DISCARD`

pub mod handler;

// Re-export the main command handler
pub use handler::{CommandError, CommandHandler, CommandResult};
