//! # LayerKV - An In-Memory Key-Value Server with Nested Transactions
//!
//! LayerKV is a small in-memory key-value server that speaks a plain-text line
//! protocol over TCP. Values are either strings or lists, keys may carry a
//! time-to-live, and every client session can open arbitrarily nested
//! transactions that are committed into their parent layer or discarded.
//!
//! ## Features
//!
//! - **Typed Values**: String and List values with type enforcement
//! - **Lazy TTL**: Expired keys are removed when they are next looked up
//! - **Nested Transactions**: Per-session stack of snapshot layers
//! - **Async I/O**: Built on Tokio, one task per client connection
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                              LayerKV                               │
//! │                                                                    │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐             │
//! │  │ TCP Server  │───>│ Connection  │───>│  Command    │             │
//! │  │ (Listener)  │    │  Handler    │    │  Handler    │             │
//! │  └─────────────┘    └──────┬──────┘    └──────┬──────┘             │
//! │                            │                  │                    │
//! │                            ▼                  ▼                    │
//! │                     ┌─────────────┐    ┌──────────────────────┐    │
//! │                     │    Line     │    │   TransactionStack   │    │
//! │                     │   Parser    │    │  ┌────────────────┐  │    │
//! │                     └─────────────┘    │  │ layer N (top)  │  │    │
//! │                                        │  ├────────────────┤  │    │
//! │                                        │  │ ...            │  │    │
//! │                                        │  ├────────────────┤  │    │
//! │                                        │  │ root Keyspace  │◄─┼────┼── shared
//! │                                        │  └────────────────┘  │    │
//! │                                        └──────────────────────┘    │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use layerkv::commands::CommandHandler;
//! use layerkv::connection::{handle_connection, ConnectionStats};
//! use layerkv::storage::Keyspace;
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() {
//!     // The root keyspace is shared by every session
//!     let root = Arc::new(Keyspace::new());
//!     let stats = Arc::new(ConnectionStats::new());
//!
//!     let listener = TcpListener::bind("127.0.0.1:6789").await.unwrap();
//!
//!     loop {
//!         let (stream, addr) = listener.accept().await.unwrap();
//!         let handler = CommandHandler::new(Arc::clone(&root));
//!         let stats = Arc::clone(&stats);
//!
//!         tokio::spawn(handle_connection(stream, addr, handler, stats));
//!     }
//! }
//! ```
//!
//! ## Supported Commands
//!
//! ### String Commands
//! - `SET key value [EX seconds]`
//! - `SETEX key value seconds`
//! - `GET key` / `GETSET key value`
//! - `DEL key`
//! - `STRLEN key`
//! - `INCR key` / `INCRBY key delta`
//! - `DECR key` / `DECRBY key delta`
//!
//! ### List Commands
//! - `LPUSH key value [value ...]`
//! - `LRANGE key start stop`
//! - `LPOP key`
//!
//! ### Transaction Commands
//! - `BEGIN` / `MULTI`
//! - `COMMIT` / `EXEC`
//! - `DISCARD`
//!
//! ## Module Overview
//!
//! - [`protocol`]: Line framing and reply serialization
//! - [`storage`]: Keyspace and per-session transaction stack
//! - [`commands`]: Command parsing, validation and dispatch
//! - [`connection`]: Client connection management
//! - [`config`]: Command-line configuration
//!
//! ## Design Highlights
//!
//! ### Snapshot Layers
//!
//! `BEGIN` copies the current layer into a new one pushed on top of the
//! session's stack. Every command works against the top layer only, so
//! uncommitted writes stay invisible to other sessions. `COMMIT` folds the
//! top layer into its parent: keys present are written through, keys missing
//! are deleted.
//!
//! ### Lazy Expiry
//!
//! There is no background sweeper. A key whose deadline has passed is removed
//! the next time any operation looks it up, and is reported as absent.

pub mod commands;
pub mod config;
pub mod connection;
pub mod protocol;
pub mod storage;

// Re-export commonly used types for convenience
pub use commands::CommandHandler;
pub use config::ServerConfig;
pub use connection::{handle_connection, ConnectionStats};
pub use protocol::{LineParser, ParseError, Reply};
pub use storage::{Keyspace, TransactionStack};

/// The default port LayerKV listens on
pub const DEFAULT_PORT: u16 = 6789;

/// The default host LayerKV binds to
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Version of LayerKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
