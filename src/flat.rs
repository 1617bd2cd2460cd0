//! A flat list of entries searched by linear scan.
//!
//! Every query looks at every entry, so prefix search costs time in
//! proportion to the whole store no matter how few values match. It is
//! kept as a reference to check and measure [`PrefixTreeMultiMap`] against.
//!
//! [`PrefixTreeMultiMap`]: crate::map::PrefixTreeMultiMap

use crate::kvs::KeyValueStore;


/// Key-value pairs in insertion order, with no index.
#[derive(Clone, Debug)]
pub struct FlatKvs<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for FlatKvs<V> {
    fn default() -> Self {
        FlatKvs::new()
    }
}

impl<V> FlatKvs<V> {
    /// Creates an empty store.
    pub const fn new() -> Self {
        FlatKvs { entries: Vec::new() }
    }

    /// Returns the number of values in the store.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store holds no values.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> KeyValueStore<V> for FlatKvs<V> {
    fn insert(&mut self, key: &str, value: V) {
        self.entries.push((key.to_owned(), value));
    }

    fn count(&self) -> usize {
        self.entries.len()
    }

    fn search(&self, key: &str) -> Vec<V> {
        self.entries
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .collect()
    }

    fn prefix_search(&self, prefix: &str) -> Vec<V> {
        self.entries
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(_, v)| v.clone())
            .collect()
    }
}
