//! Storage Module
//!
//! This module provides the keyspace engine for LayerKV: typed, lock-guarded
//! keyspaces with lazy expiry, and the per-session transaction stack that
//! layers private snapshots on top of the shared root keyspace.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Session A               Session B                          │
//! │  TransactionStack        TransactionStack                   │
//! │  ┌──────────┐            ┌──────────┐                       │
//! │  │ layer #1 │            │ (none)   │                       │
//! │  └────┬─────┘            └────┬─────┘                       │
//! │       └──────────┬────────────┘                             │
//! │                  ▼                                          │
//! │        ┌───────────────────┐                                │
//! │        │   root Keyspace   │  Arc<Keyspace>, one Mutex      │
//! │        └───────────────────┘                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use layerkv::storage::{Keyspace, TransactionStack};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let root = Arc::new(Keyspace::new());
//! root.set("a", "1", Duration::ZERO).unwrap();
//!
//! let mut stack = TransactionStack::new(Arc::clone(&root));
//! stack.begin();
//! stack.current().set("a", "2", Duration::ZERO).unwrap();
//! assert_eq!(root.get("a").unwrap(), "1");
//!
//! stack.commit().unwrap();
//! assert_eq!(root.get("a").unwrap(), "2");
//! ```

pub mod engine;
pub mod transaction;

// Re-export commonly used types
pub use engine::{Entry, Keyspace, StorageError, StorageResult, Value, ValueKind};
pub use transaction::TransactionStack;
