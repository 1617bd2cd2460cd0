//! A prefix tree multimap that can be shared between threads.

use std::sync::Arc;
use parking_lot::RwLock;
use crate::bag::ValueBag;
use crate::map::PrefixTreeMultiMap;


/// A [`PrefixTreeMultiMap`] behind a single reader-writer lock.
///
/// Insertions take the write lock and exclude every reader, so a reader
/// never observes a half-linked node. Writers are serialized. Cloning the
/// handle shares the same tree.
#[derive(Debug)]
pub struct SharedPrefixTreeMultiMap<V> {
    inner: Arc<RwLock<PrefixTreeMultiMap<V>>>,
}

impl<V> Clone for SharedPrefixTreeMultiMap<V> {
    fn clone(&self) -> Self {
        SharedPrefixTreeMultiMap { inner: Arc::clone(&self.inner) }
    }
}

impl<V> Default for SharedPrefixTreeMultiMap<V> {
    fn default() -> Self {
        SharedPrefixTreeMultiMap::new()
    }
}

impl<V> From<PrefixTreeMultiMap<V>> for SharedPrefixTreeMultiMap<V> {
    fn from(map: PrefixTreeMultiMap<V>) -> Self {
        SharedPrefixTreeMultiMap { inner: Arc::new(RwLock::new(map)) }
    }
}

impl<V> SharedPrefixTreeMultiMap<V> {
    /// Creates an empty shared map.
    pub fn new() -> Self {
        PrefixTreeMultiMap::new().into()
    }

    /// Appends `value` to the values stored under `key`.
    pub fn insert<Q>(&self, key: &Q, value: V)
    where
        Q: ?Sized + AsRef<str>,
    {
        self.inner.write().insert(key, value);
    }

    /// Returns the total number of values ever inserted.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns `true` if and only if nothing was inserted yet.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Returns the number of values stored under keys starting with `prefix`.
    pub fn prefix_len<Q>(&self, prefix: &Q) -> usize
    where
        Q: ?Sized + AsRef<str>,
    {
        self.inner.read().prefix_len(prefix)
    }

    /// Runs `f` with shared access to the whole map, holding the read lock
    /// for the duration of the call.
    pub fn with_read<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&PrefixTreeMultiMap<V>) -> T,
    {
        f(&*self.inner.read())
    }
}

impl<V: Clone> SharedPrefixTreeMultiMap<V> {
    /// Returns a copy of the values stored under exactly this key.
    pub fn search<Q>(&self, key: &Q) -> Vec<V>
    where
        Q: ?Sized + AsRef<str>,
    {
        self.inner.read().get(key).map_or_else(Vec::new, ValueBag::to_vec)
    }

    /// Returns a copy of every value stored under a key starting with `prefix`.
    pub fn prefix_search<Q>(&self, prefix: &Q) -> Vec<V>
    where
        Q: ?Sized + AsRef<str>,
    {
        self.inner.read().prefix_search(prefix)
    }
}
