//! A multimap from strings to values, based on a byte-wise prefix tree.

use core::{mem, str};
use core::fmt::{self, Debug, Formatter};
use core::iter::FusedIterator;
use tracing::{debug, trace};
use crate::bag::ValueBag;
use crate::error::Result;
use crate::kvs::KeyValueStore;

#[cfg(test)]
mod proptests;


/// A multimap from string keys to any number of values, based on a prefix tree.
///
/// Each edge of the tree is one byte of the UTF-8 encoding of a key. Keys
/// are always passed in as whole strings, so a prefix can never end in the
/// middle of a multi-byte character.
///
/// Nothing is ever removed: inserting under an existing key adds another
/// value to that key instead of replacing the previous one.
#[derive(Clone)]
pub struct PrefixTreeMultiMap<V> {
    root: Node<V>,
    len: usize,
    key_count: usize,
}

/// The store with integer values.
pub type Kvs = PrefixTreeMultiMap<i64>;

impl<V> Default for PrefixTreeMultiMap<V> {
    fn default() -> Self {
        PrefixTreeMultiMap::new()
    }
}

impl<V> PrefixTreeMultiMap<V> {
    /// Creates an empty map. The same as `Default`.
    pub const fn new() -> Self {
        PrefixTreeMultiMap { root: Node::root(), len: 0, key_count: 0 }
    }

    /// Returns the total number of values ever inserted, counting every
    /// value under a repeated key separately.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if and only if nothing was inserted yet.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of distinct keys.
    pub const fn key_count(&self) -> usize {
        self.key_count
    }

    /// Appends `value` to the values stored under `key`.
    ///
    /// Nodes missing along the path of the key are created on the way down.
    pub fn insert<Q>(&mut self, key: &Q, value: V)
    where
        Q: ?Sized + AsRef<str>,
    {
        let key = key.as_ref();
        let mut created = 0;
        let node = self.root.search_or_insert(key.bytes(), &mut created);

        if let Some(bag) = node.bag.as_mut() {
            bag.push(value);
        } else {
            node.bag = Some(ValueBag::with_value(value));
            self.key_count += 1;
        }

        self.len += 1;
        trace!(key_len = key.len(), created, "inserted value");
    }

    /// Like [`insert`](Self::insert), but for keys arriving as raw bytes.
    ///
    /// Fails without modifying the map if `key` is not valid UTF-8.
    pub fn try_insert_utf8(&mut self, key: &[u8], value: V) -> Result<()> {
        let key = str::from_utf8(key).map_err(|error| {
            debug!(%error, key_len = key.len(), "rejected malformed key");
            error
        })?;

        self.insert(key, value);
        Ok(())
    }

    /// Return a reference to the values stored under exactly this key, if any.
    pub fn get<Q>(&self, key: &Q) -> Option<&ValueBag<V>>
    where
        Q: ?Sized + AsRef<str>,
    {
        self.root
            .search(key.as_ref().bytes())
            .and_then(Node::bag)
    }

    /// Returns `true` if and only if at least one value was inserted under this key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + AsRef<str>,
    {
        self.get(key).is_some()
    }

    /// Returns the number of values stored under keys starting with `prefix`.
    ///
    /// The cost depends only on the length of the prefix.
    pub fn prefix_len<Q>(&self, prefix: &Q) -> usize
    where
        Q: ?Sized + AsRef<str>,
    {
        self.root
            .search(prefix.as_ref().bytes())
            .map_or(0, |node| node.subtree_len)
    }

    /// An iterator over the values stored under keys starting with `prefix`.
    ///
    /// The values of the key equal to `prefix` come first, followed by
    /// longer keys in lexicographic byte order. Callers should not rely
    /// on this order.
    pub fn prefix_iter<Q>(&self, prefix: &Q) -> PrefixValues<'_, V>
    where
        Q: ?Sized + AsRef<str>,
    {
        self.root
            .search(prefix.as_ref().bytes())
            .map_or_else(PrefixValues::default, Node::iter)
    }

    /// An iterator over every value in the map. The same as `prefix_iter("")`.
    pub fn values(&self) -> PrefixValues<'_, V> {
        self.root.iter()
    }

    /// Calls `f` with every key and the values stored under it,
    /// in lexicographic byte order of the keys.
    pub fn for_each_entry<'a, F>(&'a self, mut f: F)
    where
        F: FnMut(&str, &'a ValueBag<V>),
    {
        if let Some(bag) = self.root.bag() {
            f("", bag);
        }

        let mut key = Vec::new();
        let mut stack = vec![self.root.children.iter()];

        while let Some(children) = stack.last_mut() {
            match children.next() {
                Some(node) => {
                    key.push(node.key_fragment);
                    if let Some(bag) = node.bag() {
                        // only whole strings are ever inserted, so this never replaces anything
                        let key = String::from_utf8_lossy(&key);
                        f(key.as_ref(), bag);
                    }
                    stack.push(node.children.iter());
                }
                None => {
                    stack.pop();
                    key.pop();
                }
            }
        }
    }
}

impl<V: Clone> PrefixTreeMultiMap<V> {
    /// Returns a copy of the values stored under exactly this key,
    /// or an empty vector if the key was never inserted.
    pub fn search<Q>(&self, key: &Q) -> Vec<V>
    where
        Q: ?Sized + AsRef<str>,
    {
        let key = key.as_ref();
        let values = self.get(key).map_or_else(Vec::new, ValueBag::to_vec);

        trace!(key_len = key.len(), found = values.len(), "search");
        values
    }

    /// Returns a copy of every value stored under a key starting with `prefix`.
    ///
    /// The empty prefix returns every value in the map.
    pub fn prefix_search<Q>(&self, prefix: &Q) -> Vec<V>
    where
        Q: ?Sized + AsRef<str>,
    {
        let prefix = prefix.as_ref();
        let iter = self.prefix_iter(prefix);
        let mut values = Vec::with_capacity(iter.len());
        values.extend(iter.cloned());

        trace!(prefix_len = prefix.len(), found = values.len(), "prefix search");
        values
    }
}

impl<V: Clone> KeyValueStore<V> for PrefixTreeMultiMap<V> {
    fn insert(&mut self, key: &str, value: V) {
        PrefixTreeMultiMap::insert(self, key, value);
    }

    fn count(&self) -> usize {
        self.len()
    }

    fn search(&self, key: &str) -> Vec<V> {
        PrefixTreeMultiMap::search(self, key)
    }

    fn prefix_search(&self, prefix: &str) -> Vec<V> {
        PrefixTreeMultiMap::prefix_search(self, prefix)
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for PrefixTreeMultiMap<V>
where
    K: AsRef<str>
{
    fn from(items: [(K, V); N]) -> Self {
        items.into_iter().collect()
    }
}

impl<K, V> FromIterator<(K, V)> for PrefixTreeMultiMap<V>
where
    K: AsRef<str>
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>
    {
        let mut map = PrefixTreeMultiMap::default();
        map.extend(iter);
        map
    }
}

impl<K, V> Extend<(K, V)> for PrefixTreeMultiMap<V>
where
    K: AsRef<str>
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, V)>
    {
        for (key, value) in iter {
            self.insert(&key, value);
        }
    }
}

/// Formats as a map from each key to its values.
impl<V: Debug> Debug for PrefixTreeMultiMap<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut entries = Vec::with_capacity(self.key_count);
        self.for_each_entry(|key, bag| entries.push((key.to_owned(), bag)));
        f.debug_map().entries(entries).finish()
    }
}

impl<'a, V> IntoIterator for &'a PrefixTreeMultiMap<V> {
    type IntoIter = PrefixValues<'a, V>;
    type Item = &'a V;

    fn into_iter(self) -> Self::IntoIter {
        self.values()
    }
}

struct Node<V> {
    bag: Option<ValueBag<V>>,
    key_fragment: u8,
    /// number of values in this node and all of its descendants
    subtree_len: usize,
    children: Vec<Node<V>>,
}

impl<V> Node<V> {
    const fn root() -> Self {
        // key of root doesn't matter so we are free to use any value
        Node::with_key_fragment(0)
    }

    const fn with_key_fragment(key_fragment: u8) -> Self {
        Node {
            bag: None,
            key_fragment,
            subtree_len: 0,
            children: Vec::new(),
        }
    }

    /// Copies everything but the children.
    fn clone_shallow(&self) -> Self
    where
        V: Clone
    {
        Node {
            bag: self.bag.clone(),
            key_fragment: self.key_fragment,
            subtree_len: self.subtree_len,
            children: Vec::with_capacity(self.children.len()),
        }
    }

    fn bag(&self) -> Option<&ValueBag<V>> {
        self.bag.as_ref()
    }

    fn bag_iter(&self) -> core::slice::Iter<'_, V> {
        match self.bag.as_ref() {
            Some(bag) => bag.as_slice().iter(),
            None => [].iter(),
        }
    }

    fn search<B>(&self, bytes: B) -> Option<&Self>
    where
        B: Iterator<Item = u8>,
    {
        let mut node = self;

        for byte in bytes {
            let index = node.children.binary_search_by_key(&byte, |child| child.key_fragment).ok()?;
            node = &node.children[index];
        }

        Some(node)
    }

    /// Walks down to the node spelled by `bytes`, creating missing nodes
    /// and counting them in `created`. Every node on the path, including
    /// the last one, gets its `subtree_len` bumped for the value that is
    /// about to be stored.
    fn search_or_insert<B>(&mut self, bytes: B, created: &mut usize) -> &mut Self
    where
        B: Iterator<Item = u8>,
    {
        let mut node = self;

        for byte in bytes {
            node.subtree_len += 1;

            let index = match node.children.binary_search_by_key(&byte, |child| child.key_fragment) {
                Ok(index) => index,
                Err(index) => {
                    // most nodes along a long key only ever get one child
                    if node.children.is_empty() {
                        node.children.reserve_exact(1);
                    }
                    node.children.insert(index, Node::with_key_fragment(byte));
                    *created += 1;
                    index
                }
            };

            node = &mut node.children[index];
        }

        node.subtree_len += 1;
        node
    }

    fn iter(&self) -> PrefixValues<'_, V> {
        PrefixValues {
            bag: self.bag_iter(),
            stack: vec![self.children.iter()],
            len: self.subtree_len,
        }
    }
}

/// Cloning and dropping work through an explicit stack, so the depth of
/// the tree (the length of the longest key) is not limited by the call stack.
impl<V: Clone> Clone for Node<V> {
    fn clone(&self) -> Self {
        let mut root = self.clone_shallow();
        // each frame: the unvisited siblings of a node, and that node's copy
        let mut stack: Vec<(core::slice::Iter<'_, Node<V>>, Node<V>)> = Vec::new();
        let mut children = self.children.iter();

        loop {
            if let Some(child) = children.next() {
                let siblings = mem::replace(&mut children, child.children.iter());
                stack.push((siblings, child.clone_shallow()));
                continue;
            }

            let Some((siblings, copy)) = stack.pop() else {
                return root;
            };
            children = siblings;

            match stack.last_mut() {
                Some((_, parent)) => parent.children.push(copy),
                None => root.children.push(copy),
            }
        }
    }
}

impl<V> Drop for Node<V> {
    fn drop(&mut self) {
        let mut stack = mem::take(&mut self.children);

        // each popped node has no children left by the time it is dropped
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

/// Iterator over the values of a borrowed subtree.
///
/// The number of remaining values is always known exactly.
#[derive(Clone)]
pub struct PrefixValues<'a, V> {
    bag: core::slice::Iter<'a, V>,
    /// unvisited siblings on each level below the subtree's root
    stack: Vec<core::slice::Iter<'a, Node<V>>>,
    len: usize,
}

impl<V> Default for PrefixValues<'_, V> {
    fn default() -> Self {
        PrefixValues {
            bag: [].iter(),
            stack: Vec::new(),
            len: 0,
        }
    }
}

impl<V> Debug for PrefixValues<'_, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrefixValues")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

impl<'a, V> Iterator for PrefixValues<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            // The values stored at the current node come first.
            if let Some(value) = self.bag.next() {
                self.len -= 1;
                return Some(value);
            }

            // Then descend into the next unvisited child, or go back up a
            // level once all children of the current one are exhausted.
            let children = self.stack.last_mut()?;

            match children.next() {
                Some(node) => {
                    self.bag = node.bag_iter();
                    if !node.children.is_empty() {
                        self.stack.push(node.children.iter());
                    }
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<V> FusedIterator for PrefixValues<'_, V> {}

impl<V> ExactSizeIterator for PrefixValues<'_, V> {
    fn len(&self) -> usize {
        self.len
    }
}

#[cfg(feature = "serde")]
mod serde {
    use core::marker::PhantomData;
    use serde::{
        ser::{Serialize, Serializer},
        de::{Deserialize, Deserializer, Visitor, MapAccess},
    };
    use crate::bag::ValueBag;
    use crate::map::PrefixTreeMultiMap;


    /// Serialized as a map from each key to the array of its values.
    impl<V: Serialize> Serialize for PrefixTreeMultiMap<V> {
        fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
            let mut entries: Vec<(String, &ValueBag<V>)> = Vec::with_capacity(self.key_count());

            self.for_each_entry(|key, bag| entries.push((key.to_owned(), bag)));

            ser.collect_map(entries)
        }
    }

    impl<'de, V> Deserialize<'de> for PrefixTreeMultiMap<V>
    where
        V: Deserialize<'de>,
    {
        fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
            de.deserialize_map(PrefixTreeMultiMapVisitor(PhantomData))
        }
    }


    struct PrefixTreeMultiMapVisitor<V>(PhantomData<V>);

    impl<'de, V> Visitor<'de> for PrefixTreeMultiMapVisitor<V>
    where
        V: Deserialize<'de>,
    {
        type Value = PrefixTreeMultiMap<V>;

        fn expecting(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            f.write_str("map of keys to arrays of values")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut acc: A) -> Result<Self::Value, A::Error> {
            let mut map = PrefixTreeMultiMap::new();

            while let Some((key, values)) = acc.next_entry::<String, Vec<V>>()? {
                for value in values {
                    map.insert(&key, value);
                }
            }

            Ok(map)
        }
    }
}
