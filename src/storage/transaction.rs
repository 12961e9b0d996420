//! Nested Transactions over Layered Snapshots
//!
//! Every session owns a `TransactionStack`. The bottom of the stack is the
//! server's shared root keyspace; each `begin` pushes a full copy of the
//! current top, and every other command runs against whatever layer is on top.
//!
//! ```text
//!   depth 3   ┌─────────────┐  <- current(): private to this session
//!             │  layer #2   │
//!   depth 2   ├─────────────┤
//!             │  layer #1   │
//!   depth 1   ├─────────────┤
//!             │    root     │  <- Arc<Keyspace>, shared by all sessions
//!             └─────────────┘
//! ```
//!
//! `commit` merges the top layer into the one beneath it so that the parent
//! ends up exactly equal to the committed layer; `discard` drops it.
//!
//! Each `begin` copies the whole keyspace, so opening and closing a
//! transaction costs O(keyspace size).

use crate::storage::engine::{Keyspace, StorageError, StorageResult};
use std::sync::Arc;
use tracing::debug;

/// A stack of keyspace layers. The root is never popped.
#[derive(Debug)]
pub struct TransactionStack {
    /// The server-wide keyspace
    root: Arc<Keyspace>,
    /// Private transaction layers, innermost last
    layers: Vec<Keyspace>,
}

impl TransactionStack {
    /// Creates a stack with `root` as its only layer.
    pub fn new(root: Arc<Keyspace>) -> Self {
        Self {
            root,
            layers: Vec::new(),
        }
    }

    /// Returns the layer all non-transaction commands operate on.
    pub fn current(&self) -> &Keyspace {
        self.layers.last().unwrap_or(self.root.as_ref())
    }

    /// Returns the shared root keyspace.
    pub fn root(&self) -> &Arc<Keyspace> {
        &self.root
    }

    /// Number of layers, including the root.
    pub fn depth(&self) -> usize {
        self.layers.len() + 1
    }

    /// Returns true while at least one transaction is open.
    pub fn in_transaction(&self) -> bool {
        !self.layers.is_empty()
    }

    /// Opens a transaction by pushing a copy of the current layer.
    pub fn begin(&mut self) {
        let layer = self.current().snapshot();
        self.layers.push(layer);
        debug!(depth = self.depth(), "Transaction started");
    }

    /// Merges the top layer into its parent and pops it.
    pub fn commit(&mut self) -> StorageResult<()> {
        let top = self
            .layers
            .pop()
            .ok_or(StorageError::NoActiveTransaction("commit"))?;
        self.current().merge_layer(top);
        debug!(depth = self.depth(), "Transaction committed");
        Ok(())
    }

    /// Pops the top layer without merging it.
    pub fn discard(&mut self) -> StorageResult<()> {
        self.layers
            .pop()
            .ok_or(StorageError::NoActiveTransaction("discard"))?;
        debug!(depth = self.depth(), "Transaction discarded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const NO_TTL: Duration = Duration::ZERO;

    fn stack_with(pairs: &[(&str, &str)]) -> (Arc<Keyspace>, TransactionStack) {
        let root = Arc::new(Keyspace::new());
        for (k, v) in pairs {
            root.set(k, v, NO_TTL).unwrap();
        }
        let stack = TransactionStack::new(Arc::clone(&root));
        (root, stack)
    }

    #[test]
    fn test_new_stack_has_root_only() {
        let (root, stack) = stack_with(&[]);

        assert_eq!(stack.depth(), 1);
        assert!(!stack.in_transaction());
        assert!(std::ptr::eq(stack.current(), root.as_ref()));
    }

    #[test]
    fn test_root_stays_shared_while_nested() {
        let (root, mut stack) = stack_with(&[("a", "1")]);

        stack.begin();
        stack.begin();
        stack.current().set("a", "2", NO_TTL).unwrap();

        assert!(Arc::ptr_eq(stack.root(), &root));
        assert!(!std::ptr::eq(stack.current(), stack.root().as_ref()));
        assert_eq!(stack.root().get("a"), Ok("1".to_string()));
    }

    #[test]
    fn test_isolation_until_commit() {
        let (root, mut stack) = stack_with(&[("a", "1")]);

        stack.begin();
        stack.current().set("a", "2", NO_TTL).unwrap();

        assert_eq!(root.get("a"), Ok("1".to_string()));
        assert_eq!(stack.current().get("a"), Ok("2".to_string()));

        stack.commit().unwrap();
        assert_eq!(root.get("a"), Ok("2".to_string()));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_discard() {
        let (root, mut stack) = stack_with(&[("a", "1")]);

        stack.begin();
        stack.current().set("a", "2", NO_TTL).unwrap();
        stack.discard().unwrap();

        assert_eq!(root.get("a"), Ok("1".to_string()));
        assert_eq!(stack.current().get("a"), Ok("1".to_string()));
    }

    #[test]
    fn test_commit_propagates_deletes() {
        let (root, mut stack) = stack_with(&[("a", "1"), ("b", "2")]);

        stack.begin();
        stack.current().del("a");
        stack.commit().unwrap();

        assert!(!root.contains("a"));
        assert_eq!(root.get("b"), Ok("2".to_string()));
        assert_eq!(root.len(), 1);
    }

    #[test]
    fn test_nested_commit_then_outer_discard() {
        let (root, mut stack) = stack_with(&[("a", "1")]);

        stack.begin();
        stack.current().set("a", "2", NO_TTL).unwrap();
        stack.begin();
        stack.current().set("a", "3", NO_TTL).unwrap();
        assert_eq!(stack.depth(), 3);

        // Inner commit lands in the outer transaction only
        stack.commit().unwrap();
        assert_eq!(stack.current().get("a"), Ok("3".to_string()));
        assert_eq!(root.get("a"), Ok("1".to_string()));

        stack.discard().unwrap();
        assert_eq!(root.get("a"), Ok("1".to_string()));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_nested_discard_then_outer_commit() {
        let (root, mut stack) = stack_with(&[]);

        stack.begin();
        stack.current().lpush("list", "outer").unwrap();
        stack.begin();
        stack.current().lpush("list", "inner").unwrap();
        stack.discard().unwrap();
        stack.commit().unwrap();

        assert_eq!(root.lrange("list", 0, -1), Ok("[outer]".to_string()));
    }

    #[test]
    fn test_commit_without_transaction() {
        let (_, mut stack) = stack_with(&[]);

        assert_eq!(
            stack.commit(),
            Err(StorageError::NoActiveTransaction("commit"))
        );
        assert_eq!(
            stack.discard(),
            Err(StorageError::NoActiveTransaction("discard"))
        );
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_sessions_do_not_see_each_others_layers() {
        let (root, mut first) = stack_with(&[("a", "1")]);
        let mut second = TransactionStack::new(Arc::clone(&root));

        first.begin();
        first.current().set("a", "first", NO_TTL).unwrap();

        second.begin();
        assert_eq!(second.current().get("a"), Ok("1".to_string()));
        second.current().set("b", "second", NO_TTL).unwrap();

        first.commit().unwrap();
        assert_eq!(root.get("a"), Ok("first".to_string()));
        assert!(!root.contains("b"));

        // The second snapshot predates the first commit, so its merge wins
        second.commit().unwrap();
        assert_eq!(root.get("a"), Ok("1".to_string()));
        assert_eq!(root.get("b"), Ok("second".to_string()));
    }
}
