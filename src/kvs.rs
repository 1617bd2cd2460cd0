//! The four-operation contract shared by every store in this crate.

/// A store mapping string keys to any number of values.
///
/// Multiple insertions under the same key accumulate. The order of the
/// values returned by [`search`](KeyValueStore::search) and
/// [`prefix_search`](KeyValueStore::prefix_search) is not part of the
/// contract, so callers that compare results should sort them first.
pub trait KeyValueStore<V> {
    /// Associates `value` with `key`, keeping any values already stored there.
    fn insert(&mut self, key: &str, value: V);

    /// Returns the total number of values ever inserted.
    fn count(&self) -> usize;

    /// Returns every value inserted under exactly `key`,
    /// or an empty vector if the key was never inserted.
    fn search(&self, key: &str) -> Vec<V>;

    /// Returns every value inserted under any key starting with `prefix`.
    ///
    /// The empty prefix matches every key in the store.
    fn prefix_search(&self, prefix: &str) -> Vec<V>;
}
