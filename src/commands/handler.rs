//! Command Handler Module
//!
//! This module implements every LayerKV command. It splits an incoming line
//! into tokens, validates arity and arguments, checks the target key's type,
//! and runs the command against the session's current transaction layer.
//!
//! ## Supported Commands
//!
//! ### String Commands
//! - `SET key value [EX seconds]` - Set a key, optionally with expiry
//! - `SETEX key value seconds` - Set a key that expires
//! - `GET key` - Get a key's value
//! - `GETSET key value` - Set a key and return the value now stored
//! - `DEL key` - Delete a key
//! - `STRLEN key` - Get string length
//! - `INCR key` / `INCRBY key delta` - Increment an integer
//! - `DECR key` / `DECRBY key delta` - Decrement an integer
//!
//! ### List Commands
//! - `LPUSH key value [value ...]` - Append values to the tail of a list
//! - `LRANGE key start stop` - Render the elements in `[start, stop)`
//! - `LPOP key` - Remove and return the last element
//!
//! ### Transaction Commands
//! - `BEGIN` / `MULTI` - Open a (possibly nested) transaction
//! - `COMMIT` / `EXEC` - Merge the innermost transaction into its parent
//! - `DISCARD` - Drop the innermost transaction
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     CommandHandler                          │
//! │                                                             │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐     │
//! │  │  tokenize   │───>│  dispatch() │───>│  cmd_xxx()  │     │
//! │  └─────────────┘    └─────────────┘    └─────────────┘     │
//! │                                               │             │
//! │                                               ▼             │
//! │                                 TransactionStack::current() │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use crate::protocol::Reply;
use crate::storage::{Keyspace, StorageError, TransactionStack, ValueKind};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, trace};

/// Errors raised while validating or executing a command.
///
/// Storage failures pass through unchanged so the client sees the same text
/// regardless of which layer rejected the request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Wrong number of arguments for the verb
    #[error("ERR wrong number of arguments for '{0}' command")]
    Arity(String),

    /// Malformed optional clause
    #[error("ERR syntax error")]
    Syntax,

    /// Non-positive expiry
    #[error("ERR invalid expire time in '{0}' command")]
    InvalidExpireTime(String),

    /// Unrecognized verb
    #[error("ERR unknown command '{0}'")]
    UnknownCommand(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type for command execution.
pub type CommandResult<T> = Result<T, CommandError>;

/// Executes command lines for one client session.
///
/// Each session owns its own handler, and with it its own transaction stack
/// seeded with the shared root keyspace.
#[derive(Debug)]
pub struct CommandHandler {
    transactions: TransactionStack,
}

impl CommandHandler {
    /// Creates a handler whose transaction stack starts at `root`.
    pub fn new(root: Arc<Keyspace>) -> Self {
        Self {
            transactions: TransactionStack::new(root),
        }
    }

    /// Executes a command line and returns the reply.
    ///
    /// Errors never escape: they are rendered as an error reply and the
    /// session carries on with the next line.
    pub fn execute(&mut self, line: &str) -> Reply {
        let mut tokens = line.split_whitespace();
        let cmd = tokens.next().unwrap_or_default().to_lowercase();
        let args: Vec<&str> = tokens.collect();

        trace!(command = %cmd, args = args.len(), "Executing command");

        match self.dispatch(&cmd, &args) {
            Ok(reply) => reply,
            Err(e) => {
                debug!(command = %cmd, error = %e, "Command failed");
                Reply::error(e.to_string())
            }
        }
    }

    /// Number of layers in this session's transaction stack, including the root.
    pub fn transaction_depth(&self) -> usize {
        self.transactions.depth()
    }

    /// Dispatches a command to its handler.
    fn dispatch(&mut self, cmd: &str, args: &[&str]) -> CommandResult<Reply> {
        match cmd {
            // String commands
            "get" => self.cmd_get(args),
            "set" => self.cmd_set(args),
            "setex" => self.cmd_setex(args),
            "getset" => self.cmd_getset(args),
            "del" => self.cmd_del(args),
            "strlen" => self.cmd_strlen(args),
            "incr" => self.cmd_incr(args),
            "incrby" => self.cmd_incrby(args),
            "decr" => self.cmd_decr(args),
            "decrby" => self.cmd_decrby(args),

            // List commands
            "lpush" => self.cmd_lpush(args),
            "lrange" => self.cmd_lrange(args),
            "lpop" => self.cmd_lpop(args),

            // Transaction commands
            "begin" | "multi" => self.cmd_begin(cmd, args),
            "commit" | "exec" => self.cmd_commit(cmd, args),
            "discard" => self.cmd_discard(args),

            // Unknown command
            _ => Err(CommandError::UnknownCommand(cmd.to_string())),
        }
    }

    // ========================================================================
    // Helper functions
    // ========================================================================

    fn keyspace(&self) -> &Keyspace {
        self.transactions.current()
    }

    fn expect_args(cmd: &str, args: &[&str], count: usize) -> CommandResult<()> {
        if args.len() != count {
            return Err(CommandError::Arity(cmd.to_string()));
        }
        Ok(())
    }

    fn expect_min_args(cmd: &str, args: &[&str], min: usize) -> CommandResult<()> {
        if args.len() < min {
            return Err(CommandError::Arity(cmd.to_string()));
        }
        Ok(())
    }

    fn parse_integer(value: &str) -> CommandResult<i64> {
        value
            .parse::<i64>()
            .map_err(|_| StorageError::NotAnInteger.into())
    }

    /// Seconds must be positive and the resulting deadline must fit the clock.
    fn parse_expiry(cmd: &str, value: &str) -> CommandResult<Duration> {
        match Self::parse_integer(value)? {
            secs if secs >= 1 => {
                let ttl = Duration::from_secs(secs as u64);
                match Instant::now().checked_add(ttl) {
                    Some(_) => Ok(ttl),
                    None => Err(CommandError::InvalidExpireTime(cmd.to_string())),
                }
            }
            _ => Err(CommandError::InvalidExpireTime(cmd.to_string())),
        }
    }

    /// Rejects the command before any side effect if `key` holds another kind.
    fn ensure_kind(&self, key: &str, expected: ValueKind) -> CommandResult<()> {
        match self.keyspace().kind_of(key) {
            Some(kind) if kind != expected => {
                debug!(key, %kind, %expected, "Type mismatch");
                Err(StorageError::WrongType.into())
            }
            _ => Ok(()),
        }
    }

    // ========================================================================
    // String Commands
    // ========================================================================

    /// GET key
    fn cmd_get(&self, args: &[&str]) -> CommandResult<Reply> {
        Self::expect_args("get", args, 1)?;
        self.ensure_kind(args[0], ValueKind::String)?;

        let value = self.keyspace().get(args[0])?;
        Ok(Reply::Text(value))
    }

    /// SET key value [EX seconds]
    fn cmd_set(&self, args: &[&str]) -> CommandResult<Reply> {
        Self::expect_min_args("set", args, 2)?;

        let ttl = match args {
            [_, _] => Duration::ZERO,
            [_, _, opt, secs] if opt.eq_ignore_ascii_case("ex") => {
                Self::parse_expiry("set", secs)?
            }
            _ => return Err(CommandError::Syntax),
        };

        self.ensure_kind(args[0], ValueKind::String)?;
        self.keyspace().set(args[0], args[1], ttl)?;
        Ok(Reply::Ok)
    }

    /// SETEX key value seconds
    fn cmd_setex(&self, args: &[&str]) -> CommandResult<Reply> {
        Self::expect_args("setex", args, 3)?;
        let ttl = Self::parse_expiry("setex", args[2])?;

        self.ensure_kind(args[0], ValueKind::String)?;
        self.keyspace().set_ex(args[0], args[1], ttl)?;
        Ok(Reply::Ok)
    }

    /// GETSET key value
    ///
    /// Replies with the value stored by this command, not the previous one.
    fn cmd_getset(&self, args: &[&str]) -> CommandResult<Reply> {
        Self::expect_args("getset", args, 2)?;
        self.ensure_kind(args[0], ValueKind::String)?;

        let keyspace = self.keyspace();
        keyspace.set(args[0], args[1], Duration::ZERO)?;
        let value = keyspace.get(args[0])?;
        Ok(Reply::Text(value))
    }

    /// DEL key
    fn cmd_del(&self, args: &[&str]) -> CommandResult<Reply> {
        Self::expect_args("del", args, 1)?;

        self.keyspace().del(args[0]);
        Ok(Reply::Ok)
    }

    /// STRLEN key
    fn cmd_strlen(&self, args: &[&str]) -> CommandResult<Reply> {
        Self::expect_args("strlen", args, 1)?;
        self.ensure_kind(args[0], ValueKind::String)?;

        let len = self.keyspace().strlen(args[0])?;
        Ok(Reply::Integer(len as i64))
    }

    /// INCR key
    fn cmd_incr(&self, args: &[&str]) -> CommandResult<Reply> {
        Self::expect_args("incr", args, 1)?;
        self.ensure_kind(args[0], ValueKind::String)?;

        Ok(Reply::Text(self.keyspace().incr(args[0])?))
    }

    /// INCRBY key delta
    fn cmd_incrby(&self, args: &[&str]) -> CommandResult<Reply> {
        Self::expect_args("incrby", args, 2)?;
        Self::parse_integer(args[1])?;
        self.ensure_kind(args[0], ValueKind::String)?;

        Ok(Reply::Text(self.keyspace().incr_by(args[0], args[1])?))
    }

    /// DECR key
    fn cmd_decr(&self, args: &[&str]) -> CommandResult<Reply> {
        Self::expect_args("decr", args, 1)?;
        self.ensure_kind(args[0], ValueKind::String)?;

        Ok(Reply::Text(self.keyspace().decr(args[0])?))
    }

    /// DECRBY key delta
    fn cmd_decrby(&self, args: &[&str]) -> CommandResult<Reply> {
        Self::expect_args("decrby", args, 2)?;
        Self::parse_integer(args[1])?;
        self.ensure_kind(args[0], ValueKind::String)?;

        Ok(Reply::Text(self.keyspace().decr_by(args[0], args[1])?))
    }

    // ========================================================================
    // List Commands
    // ========================================================================

    /// LPUSH key value [value ...]
    fn cmd_lpush(&self, args: &[&str]) -> CommandResult<Reply> {
        Self::expect_min_args("lpush", args, 2)?;
        self.ensure_kind(args[0], ValueKind::List)?;

        self.keyspace().lpush_all(args[0], &args[1..])?;
        Ok(Reply::Ok)
    }

    /// LRANGE key start stop
    fn cmd_lrange(&self, args: &[&str]) -> CommandResult<Reply> {
        Self::expect_args("lrange", args, 3)?;
        let start = Self::parse_integer(args[1])?;
        let stop = Self::parse_integer(args[2])?;
        self.ensure_kind(args[0], ValueKind::List)?;

        Ok(Reply::Text(self.keyspace().lrange(args[0], start, stop)?))
    }

    /// LPOP key
    fn cmd_lpop(&self, args: &[&str]) -> CommandResult<Reply> {
        Self::expect_args("lpop", args, 1)?;
        self.ensure_kind(args[0], ValueKind::List)?;

        Ok(Reply::Text(self.keyspace().lpop(args[0])?))
    }

    // ========================================================================
    // Transaction Commands
    // ========================================================================

    /// BEGIN | MULTI
    fn cmd_begin(&mut self, cmd: &str, args: &[&str]) -> CommandResult<Reply> {
        Self::expect_args(cmd, args, 0)?;

        self.transactions.begin();
        Ok(Reply::text("transaction started"))
    }

    /// COMMIT | EXEC
    fn cmd_commit(&mut self, cmd: &str, args: &[&str]) -> CommandResult<Reply> {
        Self::expect_args(cmd, args, 0)?;

        self.transactions.commit()?;
        Ok(Reply::text("transaction committed"))
    }

    /// DISCARD
    fn cmd_discard(&mut self, args: &[&str]) -> CommandResult<Reply> {
        Self::expect_args("discard", args, 0)?;

        self.transactions.discard()?;
        Ok(Reply::text("transaction discarded"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_handler() -> (Arc<Keyspace>, CommandHandler) {
        let root = Arc::new(Keyspace::new());
        let handler = CommandHandler::new(Arc::clone(&root));
        (root, handler)
    }

    fn error_text(err: impl Into<CommandError>) -> Reply {
        Reply::error(err.into().to_string())
    }

    #[test]
    fn test_set_get() {
        let (_, mut handler) = create_handler();

        assert_eq!(handler.execute("SET key value"), Reply::Ok);
        assert_eq!(handler.execute("GET key"), Reply::text("value"));
    }

    #[test]
    fn test_verb_is_case_insensitive() {
        let (_, mut handler) = create_handler();

        assert_eq!(handler.execute("sEt key Value"), Reply::Ok);
        assert_eq!(handler.execute("get key"), Reply::text("Value"));
        // Arguments are passed through literally
        assert_eq!(
            handler.execute("GET KEY"),
            error_text(StorageError::KeyNotFound)
        );
    }

    #[test]
    fn test_extra_whitespace_is_ignored() {
        let (_, mut handler) = create_handler();

        assert_eq!(handler.execute("  SET   key   value  "), Reply::Ok);
        assert_eq!(handler.execute("GET\tkey"), Reply::text("value"));
    }

    #[test]
    fn test_get_nonexistent() {
        let (_, mut handler) = create_handler();

        assert_eq!(
            handler.execute("GET nonexistent"),
            Reply::error("ERR key not found")
        );
    }

    #[test]
    fn test_arity() {
        let (_, mut handler) = create_handler();

        assert_eq!(
            handler.execute("get"),
            Reply::error("ERR wrong number of arguments for 'get' command")
        );
        assert_eq!(
            handler.execute("set k"),
            Reply::error("ERR wrong number of arguments for 'set' command")
        );
        assert_eq!(
            handler.execute("GET a b"),
            error_text(CommandError::Arity("get".into()))
        );
        assert_eq!(
            handler.execute("setex k v"),
            error_text(CommandError::Arity("setex".into()))
        );
        assert_eq!(
            handler.execute("lrange k 0"),
            error_text(CommandError::Arity("lrange".into()))
        );
        assert_eq!(
            handler.execute("lpush k"),
            error_text(CommandError::Arity("lpush".into()))
        );
        assert_eq!(
            handler.execute("multi now"),
            error_text(CommandError::Arity("multi".into()))
        );
        assert_eq!(handler.transaction_depth(), 1);
    }

    #[test]
    fn test_set_with_expiry_clause() {
        let (root, mut handler) = create_handler();

        assert_eq!(handler.execute("SET key value ex 100"), Reply::Ok);
        assert_eq!(handler.execute("GET key"), Reply::text("value"));
        assert!(root.contains("key"));

        assert_eq!(
            handler.execute("SET key value PX 100"),
            error_text(CommandError::Syntax)
        );
        assert_eq!(
            handler.execute("SET key value EX"),
            error_text(CommandError::Syntax)
        );
        assert_eq!(
            handler.execute("SET key value EX 10 extra"),
            error_text(CommandError::Syntax)
        );
        assert_eq!(
            handler.execute("SET key value EX soon"),
            error_text(StorageError::NotAnInteger)
        );
        assert_eq!(
            handler.execute("SET key value EX 0"),
            error_text(CommandError::InvalidExpireTime("set".into()))
        );
    }

    #[test]
    fn test_set_ex_expires() {
        let (_, mut handler) = create_handler();

        assert_eq!(handler.execute("SET key value EX 1"), Reply::Ok);
        std::thread::sleep(Duration::from_millis(1100));
        assert_eq!(
            handler.execute("GET key"),
            error_text(StorageError::KeyNotFound)
        );
        // The expired key is gone, so it can become a list
        assert_eq!(handler.execute("LPUSH key x"), Reply::Ok);
    }

    #[test]
    fn test_expiry_past_clock_range_is_rejected() {
        let (root, mut handler) = create_handler();

        assert_eq!(
            handler.execute("SET k v EX 9223372036854775807"),
            Reply::error("ERR invalid expire time in 'set' command")
        );
        assert_eq!(
            handler.execute("SETEX k v 9223372036854775807"),
            Reply::error("ERR invalid expire time in 'setex' command")
        );
        assert!(!root.contains("k"));

        // The session keeps serving requests
        assert_eq!(handler.execute("SET k v EX 100"), Reply::Ok);
        assert_eq!(handler.execute("GET k"), Reply::text("v"));
    }

    #[test]
    fn test_setex() {
        let (_, mut handler) = create_handler();

        assert_eq!(handler.execute("SETEX key value 100"), Reply::Ok);
        assert_eq!(handler.execute("GET key"), Reply::text("value"));

        assert_eq!(
            handler.execute("SETEX key value 0"),
            Reply::error("ERR invalid expire time in 'setex' command")
        );
        assert_eq!(
            handler.execute("SETEX key value -3"),
            error_text(CommandError::InvalidExpireTime("setex".into()))
        );
        // The failed calls left the value untouched
        assert_eq!(handler.execute("GET key"), Reply::text("value"));
    }

    #[test]
    fn test_getset_returns_new_value() {
        let (_, mut handler) = create_handler();

        handler.execute("SET key old");
        assert_eq!(handler.execute("GETSET key new"), Reply::text("new"));
        assert_eq!(handler.execute("GET key"), Reply::text("new"));
        assert_eq!(handler.execute("GETSET fresh v"), Reply::text("v"));
    }

    #[test]
    fn test_del() {
        let (root, mut handler) = create_handler();

        handler.execute("SET key value");
        assert_eq!(handler.execute("DEL key"), Reply::Ok);
        assert!(!root.contains("key"));
        // Deleting a missing key is not an error
        assert_eq!(handler.execute("DEL key"), Reply::Ok);
    }

    #[test]
    fn test_strlen() {
        let (_, mut handler) = create_handler();

        handler.execute("SET key hello");
        assert_eq!(handler.execute("STRLEN key"), Reply::Integer(5));
        assert_eq!(handler.execute("STRLEN missing"), Reply::Integer(0));
    }

    #[test]
    fn test_incr_decr() {
        let (_, mut handler) = create_handler();

        assert_eq!(handler.execute("INCR counter"), Reply::text("1"));
        assert_eq!(handler.execute("INCR counter"), Reply::text("2"));
        assert_eq!(handler.execute("DECR counter"), Reply::text("1"));
        assert_eq!(handler.execute("INCRBY counter 10"), Reply::text("11"));
        assert_eq!(handler.execute("DECRBY counter 4"), Reply::text("7"));

        assert_eq!(handler.execute("DECR other"), Reply::text("-1"));
        assert_eq!(handler.execute("GET other"), Reply::text("-1"));

        handler.execute("SET text hello");
        assert_eq!(
            handler.execute("INCR text"),
            Reply::error("ERR value is not an integer or out of range")
        );
    }

    #[test]
    fn test_delta_must_be_integer() {
        let (root, mut handler) = create_handler();

        assert_eq!(
            handler.execute("INCRBY counter ten"),
            error_text(StorageError::NotAnInteger)
        );
        assert_eq!(
            handler.execute("DECRBY counter 1.5"),
            error_text(StorageError::NotAnInteger)
        );
        assert!(root.is_empty());
    }

    #[test]
    fn test_missing_key_deltas_keep_literal_text() {
        let (_, mut handler) = create_handler();

        assert_eq!(handler.execute("INCRBY a 007"), Reply::text("007"));
        assert_eq!(handler.execute("DECRBY b 10"), Reply::text("-10"));
        assert_eq!(handler.execute("DECRBY c -5"), Reply::text("--5"));
        assert_eq!(handler.execute("GET c"), Reply::text("--5"));
    }

    #[test]
    fn test_type_guard() {
        let (_, mut handler) = create_handler();
        let wrongtype = Reply::error("WRONGTYPE Operation against a key holding the wrong kind of value");

        handler.execute("LPUSH list x");
        assert_eq!(handler.execute("GET list"), wrongtype);
        assert_eq!(handler.execute("SET list y"), wrongtype);
        assert_eq!(handler.execute("SETEX list y 10"), wrongtype);
        assert_eq!(handler.execute("GETSET list y"), wrongtype);
        assert_eq!(handler.execute("INCR list"), wrongtype);
        assert_eq!(handler.execute("DECRBY list 2"), wrongtype);
        assert_eq!(handler.execute("STRLEN list"), wrongtype);

        handler.execute("SET string x");
        assert_eq!(handler.execute("LPUSH string y"), wrongtype);
        assert_eq!(handler.execute("LRANGE string 0 -1"), wrongtype);
        assert_eq!(handler.execute("LPOP string"), wrongtype);

        // DEL works on either kind
        assert_eq!(handler.execute("DEL list"), Reply::Ok);
        assert_eq!(handler.execute("SET list now-a-string"), Reply::Ok);
    }

    #[test]
    fn test_list_commands() {
        let (_, mut handler) = create_handler();

        assert_eq!(handler.execute("LPUSH list a"), Reply::Ok);
        assert_eq!(handler.execute("LPUSH list b c"), Reply::Ok);
        assert_eq!(handler.execute("LRANGE list 0 -1"), Reply::text("[a b c]"));
        assert_eq!(handler.execute("LRANGE list 1 2"), Reply::text("[b]"));

        assert_eq!(handler.execute("LPOP list"), Reply::text("c"));
        assert_eq!(handler.execute("LRANGE list 0 -1"), Reply::text("[a b]"));

        assert_eq!(
            handler.execute("LRANGE list 0 9"),
            Reply::error("ERR stop index out of range")
        );
        assert_eq!(
            handler.execute("LRANGE list x 1"),
            error_text(StorageError::NotAnInteger)
        );
        assert_eq!(
            handler.execute("LPOP missing"),
            error_text(StorageError::KeyNotFound)
        );
    }

    #[test]
    fn test_transaction_isolation_and_commit() {
        let (root, mut handler) = create_handler();

        handler.execute("SET a 1");
        assert_eq!(handler.execute("BEGIN"), Reply::text("transaction started"));
        handler.execute("SET a 2");

        assert_eq!(root.get("a"), Ok("1".to_string()));
        assert_eq!(handler.execute("GET a"), Reply::text("2"));

        assert_eq!(
            handler.execute("COMMIT"),
            Reply::text("transaction committed")
        );
        assert_eq!(root.get("a"), Ok("2".to_string()));
    }

    #[test]
    fn test_transaction_discard() {
        let (root, mut handler) = create_handler();

        handler.execute("SET a 1");
        handler.execute("MULTI");
        handler.execute("SET a 2");
        assert_eq!(
            handler.execute("DISCARD"),
            Reply::text("transaction discarded")
        );

        assert_eq!(root.get("a"), Ok("1".to_string()));
        assert_eq!(handler.execute("GET a"), Reply::text("1"));
    }

    #[test]
    fn test_commit_propagates_delete() {
        let (root, mut handler) = create_handler();

        handler.execute("SET a 1");
        handler.execute("SET b 2");
        handler.execute("BEGIN");
        handler.execute("DEL a");
        handler.execute("EXEC");

        assert!(!root.contains("a"));
        assert_eq!(root.get("b"), Ok("2".to_string()));
    }

    #[test]
    fn test_nested_transactions() {
        let (root, mut handler) = create_handler();

        handler.execute("BEGIN");
        handler.execute("SET a outer");
        handler.execute("BEGIN");
        handler.execute("SET a inner");
        assert_eq!(handler.transaction_depth(), 3);

        handler.execute("DISCARD");
        assert_eq!(handler.execute("GET a"), Reply::text("outer"));
        handler.execute("COMMIT");

        assert_eq!(handler.transaction_depth(), 1);
        assert_eq!(root.get("a"), Ok("outer".to_string()));
    }

    #[test]
    fn test_commit_without_begin() {
        let (_, mut handler) = create_handler();

        assert_eq!(
            handler.execute("COMMIT"),
            Reply::error("ERR commit without begin")
        );
        assert_eq!(
            handler.execute("DISCARD"),
            Reply::error("ERR discard without begin")
        );
        assert_eq!(handler.transaction_depth(), 1);
    }

    #[test]
    fn test_sessions_share_root() {
        let root = Arc::new(Keyspace::new());
        let mut first = CommandHandler::new(Arc::clone(&root));
        let mut second = CommandHandler::new(Arc::clone(&root));

        first.execute("SET shared 1");
        assert_eq!(second.execute("GET shared"), Reply::text("1"));

        first.execute("BEGIN");
        first.execute("SET shared 2");
        assert_eq!(second.execute("GET shared"), Reply::text("1"));
        first.execute("COMMIT");
        assert_eq!(second.execute("GET shared"), Reply::text("2"));
    }

    #[test]
    fn test_unknown_command() {
        let (_, mut handler) = create_handler();

        assert_eq!(
            handler.execute("FLY away"),
            Reply::error("ERR unknown command 'fly'")
        );
        assert!(handler.execute("").is_error());
    }
}
