//! Typed Keyspace with Lazy Expiry
//!
//! This module implements the keyspace that backs every LayerKV session.
//! A keyspace maps text keys to typed entries (a string or a list of strings),
//! each with an optional absolute expiry instant.
//!
//! ## Design Decisions
//!
//! 1. **One Lock per Keyspace**: Every operation holds the keyspace's mutex for
//!    its full duration, so each call is atomic with respect to other sessions.
//! 2. **Lazy Expiry Only**: An expired entry is logically absent. Any read or
//!    write that meets one removes it before doing anything else. There is no
//!    background sweeper.
//! 3. **Typed Values**: Strings and lists share one slot, modelled as an enum.
//!    A command that targets a key holding the other kind fails with
//!    `WrongType` instead of converting it.
//! 4. **Owned Layers**: Transaction layers are plain `Keyspace` values created
//!    by [`Keyspace::snapshot`]. No entry is ever shared between two layers.
//!
//! ## Locking
//!
//! ```text
//! ┌──────────────────────────────┐
//! │          Keyspace            │
//! │  Mutex<HashMap<String,Entry>>│
//! └──────────────────────────────┘
//! ```
//!
//! Merge helpers never hold two keyspace locks at once: the source layer is
//! either copied out under its own lock first, or consumed by value.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors raised by keyspace and transaction operations.
///
/// The `Display` text of each variant is the exact line sent to the client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The key is absent or has expired
    #[error("ERR key not found")]
    KeyNotFound,

    /// The stored value is not of the kind the operation expects
    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType,

    /// A numeric operation met a value or delta that is not a base-10 integer
    #[error("ERR value is not an integer or out of range")]
    NotAnInteger,

    /// A list range bound falls outside the list
    #[error("ERR {0} index out of range")]
    IndexOutOfRange(&'static str),

    /// The list exists but holds no elements
    #[error("ERR list is empty")]
    EmptyList,

    /// `commit` or `discard` issued with no open transaction
    #[error("ERR {0} without begin")]
    NoActiveTransaction(&'static str),
}

/// Result type for keyspace operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// The kind of value a key holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    List,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::String => f.write_str("string"),
            ValueKind::List => f.write_str("list"),
        }
    }
}

/// A stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    List(Vec<String>),
}

impl Value {
    /// Returns the kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::String(_) => ValueKind::String,
            Value::List(_) => ValueKind::List,
        }
    }
}

/// A stored value with optional expiry time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// The actual value stored
    pub value: Value,
    /// When this entry expires (None = never expires)
    pub expires_at: Option<Instant>,
}

impl Entry {
    /// Creates a string entry. A zero `ttl` means the entry never expires.
    pub fn string(value: impl Into<String>, ttl: Duration) -> Self {
        Self {
            value: Value::String(value.into()),
            expires_at: deadline(ttl),
        }
    }

    /// Creates a list entry without expiry.
    pub fn list(items: Vec<String>) -> Self {
        Self {
            value: Value::List(items),
            expires_at: None,
        }
    }

    /// Returns the kind of the stored value.
    pub fn kind(&self) -> ValueKind {
        self.value.kind()
    }

    /// Checks if this entry has expired.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .map(|exp| Instant::now() >= exp)
            .unwrap_or(false)
    }
}

/// A zero `ttl`, or one too large to represent as an instant, never expires.
fn deadline(ttl: Duration) -> Option<Instant> {
    if ttl.is_zero() {
        None
    } else {
        Instant::now().checked_add(ttl)
    }
}

/// Renders a list slice the way `LRANGE` replies: `[a b c]`.
fn render_list(items: &[String]) -> String {
    format!("[{}]", items.join(" "))
}

fn parse_integer(text: &str) -> StorageResult<i64> {
    text.parse::<i64>().map_err(|_| StorageError::NotAnInteger)
}

/// A lock-guarded mapping from key to typed entry.
///
/// The server creates one root keyspace and shares it between sessions
/// through an `Arc`. Each open transaction owns a private keyspace produced
/// by [`Keyspace::snapshot`].
///
/// # Example
///
/// ```
/// use layerkv::storage::Keyspace;
/// use std::time::Duration;
///
/// let keyspace = Keyspace::new();
/// keyspace.set("name", "Ariz", Duration::ZERO).unwrap();
/// assert_eq!(keyspace.get("name").unwrap(), "Ariz");
///
/// keyspace.lpush("queue", "a").unwrap();
/// keyspace.lpush("queue", "b").unwrap();
/// assert_eq!(keyspace.lrange("queue", 0, -1).unwrap(), "[a b]");
/// ```
#[derive(Debug, Default)]
pub struct Keyspace {
    entries: Mutex<HashMap<String, Entry>>,
}

impl Keyspace {
    /// Creates an empty keyspace.
    pub fn new() -> Self {
        Self::default()
    }

    fn from_entries(entries: HashMap<String, Entry>) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }

    /// Every mutation is a single map operation, so the map is consistent
    /// even if a holder panicked.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn into_entries(self) -> HashMap<String, Entry> {
        self.entries
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the live entry for `key`, removing it first if it has expired.
    fn live<'a>(entries: &'a mut HashMap<String, Entry>, key: &str) -> Option<&'a mut Entry> {
        if entries.get(key).is_some_and(Entry::is_expired) {
            entries.remove(key);
            return None;
        }
        entries.get_mut(key)
    }

    /// Creates a value-wise copy of this keyspace. Expired entries are left behind.
    pub fn snapshot(&self) -> Keyspace {
        let entries = self.lock();
        let copy = entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired())
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect();
        Keyspace::from_entries(copy)
    }

    /// Returns the kind of value held at `key`, or `None` if it is absent or expired.
    pub fn kind_of(&self, key: &str) -> Option<ValueKind> {
        let mut entries = self.lock();
        Self::live(&mut entries, key).map(|entry| entry.kind())
    }

    /// Returns true if `key` holds a live entry.
    pub fn contains(&self, key: &str) -> bool {
        self.kind_of(key).is_some()
    }

    /// Returns the number of stored entries, including expired ones not yet reclaimed.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if the keyspace holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ========================================================================
    // STRING OPERATIONS
    // ========================================================================

    /// Gets the string value of a key.
    pub fn get(&self, key: &str) -> StorageResult<String> {
        let mut entries = self.lock();
        match Self::live(&mut entries, key) {
            Some(Entry {
                value: Value::String(s),
                ..
            }) => Ok(s.clone()),
            Some(_) => Err(StorageError::WrongType),
            None => Err(StorageError::KeyNotFound),
        }
    }

    /// Sets a string value. A zero `ttl` stores the key without expiry.
    ///
    /// Fails with `WrongType` if the key currently holds a list.
    pub fn set(&self, key: &str, value: &str, ttl: Duration) -> StorageResult<()> {
        let mut entries = self.lock();
        if let Some(entry) = Self::live(&mut entries, key) {
            if entry.kind() != ValueKind::String {
                return Err(StorageError::WrongType);
            }
        }
        entries.insert(key.to_string(), Entry::string(value, ttl));
        Ok(())
    }

    /// Sets a string value that expires after `ttl`.
    ///
    /// The caller guarantees `ttl` is at least one second. A `ttl` past the
    /// clock's range stores the key without expiry.
    pub fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> StorageResult<()> {
        let mut entries = self.lock();
        if let Some(entry) = Self::live(&mut entries, key) {
            if entry.kind() != ValueKind::String {
                return Err(StorageError::WrongType);
            }
        }
        entries.insert(
            key.to_string(),
            Entry {
                value: Value::String(value.to_string()),
                expires_at: Instant::now().checked_add(ttl),
            },
        );
        Ok(())
    }

    /// Deletes a key. Returns whether a live entry was removed.
    pub fn del(&self, key: &str) -> bool {
        let mut entries = self.lock();
        match entries.remove(key) {
            Some(entry) => !entry.is_expired(),
            None => false,
        }
    }

    /// Gets the length of a string value. A missing key has length 0.
    pub fn strlen(&self, key: &str) -> StorageResult<usize> {
        let mut entries = self.lock();
        match Self::live(&mut entries, key) {
            Some(Entry {
                value: Value::String(s),
                ..
            }) => Ok(s.len()),
            Some(_) => Err(StorageError::WrongType),
            None => Ok(0),
        }
    }

    /// Increments an integer value by 1. A missing key becomes `"1"`.
    pub fn incr(&self, key: &str) -> StorageResult<String> {
        self.apply_delta(key, 1, || "1".to_string())
    }

    /// Increments an integer value by `delta`.
    ///
    /// A missing key stores `delta` exactly as given, without normalising it.
    pub fn incr_by(&self, key: &str, delta: &str) -> StorageResult<String> {
        self.apply_text_delta(key, delta, false, || delta.to_string())
    }

    /// Decrements an integer value by 1. A missing key becomes `"-1"`.
    pub fn decr(&self, key: &str) -> StorageResult<String> {
        self.apply_delta(key, -1, || "-1".to_string())
    }

    /// Decrements an integer value by `delta`.
    ///
    /// A missing key stores `"-"` followed by `delta` as given, so a negative
    /// delta such as `-5` is stored as `--5`.
    pub fn decr_by(&self, key: &str, delta: &str) -> StorageResult<String> {
        self.apply_text_delta(key, delta, true, || format!("-{}", delta))
    }

    fn apply_text_delta(
        &self,
        key: &str,
        delta: &str,
        negate: bool,
        missing: impl FnOnce() -> String,
    ) -> StorageResult<String> {
        let mut entries = self.lock();
        if Self::live(&mut entries, key).is_none() {
            let stored = missing();
            entries.insert(key.to_string(), Entry::string(stored.clone(), Duration::ZERO));
            return Ok(stored);
        }
        let amount = parse_integer(delta)?;
        let amount = if negate {
            amount.checked_neg().ok_or(StorageError::NotAnInteger)?
        } else {
            amount
        };
        Self::add_in_place(&mut entries, key, amount)
    }

    fn apply_delta(
        &self,
        key: &str,
        amount: i64,
        missing: impl FnOnce() -> String,
    ) -> StorageResult<String> {
        let mut entries = self.lock();
        if Self::live(&mut entries, key).is_none() {
            let stored = missing();
            entries.insert(key.to_string(), Entry::string(stored.clone(), Duration::ZERO));
            return Ok(stored);
        }
        Self::add_in_place(&mut entries, key, amount)
    }

    /// Adds `amount` to the live string entry at `key`, keeping its expiry.
    fn add_in_place(
        entries: &mut HashMap<String, Entry>,
        key: &str,
        amount: i64,
    ) -> StorageResult<String> {
        let entry = entries.get_mut(key).ok_or(StorageError::KeyNotFound)?;
        let Value::String(current) = &mut entry.value else {
            return Err(StorageError::WrongType);
        };
        let next = parse_integer(current)?
            .checked_add(amount)
            .ok_or(StorageError::NotAnInteger)?;
        *current = next.to_string();
        Ok(current.clone())
    }

    // ========================================================================
    // LIST OPERATIONS
    // ========================================================================

    /// Appends `value` to the tail of the list at `key`, creating the list if needed.
    ///
    /// # Returns
    /// The length of the list after the push.
    pub fn lpush(&self, key: &str, value: &str) -> StorageResult<usize> {
        self.lpush_all(key, &[value])
    }

    /// Appends every value, in order, under a single lock acquisition.
    ///
    /// A key holding a string is left untouched.
    pub fn lpush_all(&self, key: &str, values: &[&str]) -> StorageResult<usize> {
        let mut entries = self.lock();
        match Self::live(&mut entries, key) {
            Some(Entry {
                value: Value::List(items),
                ..
            }) => {
                items.extend(values.iter().map(|v| v.to_string()));
                Ok(items.len())
            }
            Some(_) => Err(StorageError::WrongType),
            None => {
                let items: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                let len = items.len();
                entries.insert(key.to_string(), Entry::list(items));
                Ok(len)
            }
        }
    }

    /// Renders the elements in `[start, stop)` as `[a b c]`.
    ///
    /// `start` must lie within `[0, len]` and `stop` must not exceed `len`.
    /// A negative `stop` counts from the end, so `-1` means "through the last
    /// element". A `stop` that is still negative after that adjustment is out
    /// of range; a `start` past the resolved `stop` yields an empty list.
    pub fn lrange(&self, key: &str, start: i64, stop: i64) -> StorageResult<String> {
        let mut entries = self.lock();
        let items = match Self::live(&mut entries, key) {
            Some(Entry {
                value: Value::List(items),
                ..
            }) => items,
            Some(_) => return Err(StorageError::WrongType),
            None => return Err(StorageError::KeyNotFound),
        };

        let len = items.len() as i64;
        if start < 0 || start > len {
            return Err(StorageError::IndexOutOfRange("start"));
        }
        if stop > len {
            return Err(StorageError::IndexOutOfRange("stop"));
        }
        let stop = if stop < 0 { len + stop + 1 } else { stop };
        if stop < 0 {
            return Err(StorageError::IndexOutOfRange("stop"));
        }
        if start >= stop {
            return Ok(render_list(&[]));
        }
        Ok(render_list(&items[start as usize..stop as usize]))
    }

    /// Removes and returns the last element of the list at `key`.
    ///
    /// Popping the final element leaves an empty list in place.
    pub fn lpop(&self, key: &str) -> StorageResult<String> {
        let mut entries = self.lock();
        match Self::live(&mut entries, key) {
            Some(Entry {
                value: Value::List(items),
                ..
            }) => items.pop().ok_or(StorageError::EmptyList),
            Some(_) => Err(StorageError::WrongType),
            None => Err(StorageError::KeyNotFound),
        }
    }

    // ========================================================================
    // LAYER MERGING
    // ========================================================================

    /// Copies every entry of `other` into this keyspace, overwriting on collision.
    pub fn update_data(&self, other: &Keyspace) {
        if std::ptr::eq(self, other) {
            return;
        }
        let incoming = other.lock().clone();
        self.lock().extend(incoming);
    }

    /// Removes every key of this keyspace that `other` does not contain.
    pub fn delete_data(&self, other: &Keyspace) {
        if std::ptr::eq(self, other) {
            return;
        }
        let retained: HashSet<String> = other.lock().keys().cloned().collect();
        self.lock().retain(|key, _| retained.contains(key));
    }

    /// Merges a finished transaction layer into this keyspace.
    ///
    /// Applies [`update_data`](Self::update_data) then
    /// [`delete_data`](Self::delete_data) within one critical section, so the
    /// receiver ends up equal to `layer` and no session sees a partial merge.
    pub fn merge_layer(&self, layer: Keyspace) {
        let incoming = layer.into_entries();
        let mut entries = self.lock();
        entries.retain(|key, _| incoming.contains_key(key));
        entries.extend(incoming);
    }
}
