//! Append-only, copy-on-write context for [`ContextPipeline`](crate::ContextPipeline).
//!
//! A [`Context`] maps names to values of any `'static` type. Writing never
//! mutates: [`Context::set`] returns a new context and every earlier
//! `Context` value stays exactly as it was. Entries are shared through
//! `Arc`, so the copy only clones the small index, not the values.
//!
//! # Example
//! ```
//! use statecraft_core::{Context, ContextKey};
//!
//! const TOTAL: ContextKey<u64> = ContextKey::new("total");
//!
//! let empty = Context::new();
//! let with_total = empty.set(TOTAL, 125);
//!
//! assert_eq!(with_total.get(TOTAL), Some(&125));
//! assert_eq!(empty.get(TOTAL), None);
//! ```

use std::any::{Any, type_name};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use thiserror::Error;

/// A typed name for a context entry.
///
/// The value type is part of the key, so `get` hands back a `&V` without the
/// caller naming the type again.
pub struct ContextKey<V> {
    name: &'static str,
    _value: PhantomData<fn() -> V>,
}

impl<V> ContextKey<V> {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _value: PhantomData,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<V> Clone for ContextKey<V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for ContextKey<V> {}

impl<V> fmt::Debug for ContextKey<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ContextKey").field(&self.name).finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("required context key not found: {key}")]
    Missing { key: &'static str },
    #[error("context key '{key}' does not hold a {expected}")]
    TypeMismatch {
        key: &'static str,
        expected: &'static str,
    },
}

type Entry = Arc<dyn Any + Send + Sync>;

/// Immutable key/value side channel.
#[derive(Clone, Default)]
pub struct Context {
    entries: Arc<HashMap<&'static str, Entry>>,
}

impl Context {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a new context with `key` set to `value`. `self` is unchanged.
    #[must_use]
    pub fn set<V>(&self, key: ContextKey<V>, value: V) -> Self
    where
        V: Any + Send + Sync,
    {
        let mut entries = HashMap::clone(&self.entries);
        entries.insert(key.name, Arc::new(value));
        tracing::trace!(key = key.name, entries = entries.len(), "context entry set");
        Self {
            entries: Arc::new(entries),
        }
    }

    /// Look up `key`. Returns `None` when absent or stored under another type.
    #[must_use]
    pub fn get<V: Any>(&self, key: ContextKey<V>) -> Option<&V> {
        self.entries
            .get(key.name)
            .and_then(|entry| (**entry).downcast_ref::<V>())
    }

    /// Like [`get`](Self::get), but says why the value is unavailable.
    pub fn require<V: Any>(&self, key: ContextKey<V>) -> Result<&V, ContextError> {
        let entry = self
            .entries
            .get(key.name)
            .ok_or(ContextError::Missing { key: key.name })?;
        (**entry)
            .downcast_ref::<V>()
            .ok_or(ContextError::TypeMismatch {
                key: key.name,
                expected: type_name::<V>(),
            })
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of all entries, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys: Vec<&'static str> = self.entries.keys().copied().collect();
        keys.sort_unstable();
        keys
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("keys", &self.keys())
            .finish()
    }
}
