//! The multiset of values stored under one exact key.

use core::iter::FusedIterator;


/// An unordered multiset of the values inserted under one key.
///
/// Values are kept in insertion order internally, but that order is not
/// part of the contract. A bag attached to the tree is never empty, since
/// it is only created by an insertion.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct ValueBag<V> {
    values: Vec<V>,
}

impl<V> ValueBag<V> {
    /// A bag holding exactly one value.
    pub(crate) fn with_value(value: V) -> Self {
        ValueBag { values: vec![value] }
    }

    pub(crate) fn push(&mut self, value: V) {
        self.values.push(value);
    }

    /// Returns the number of values in this bag, counting duplicates.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if and only if this bag holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The values as a slice, in unspecified order.
    pub fn as_slice(&self) -> &[V] {
        &self.values
    }

    /// Returns an iterator over the borrowed values.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter { values: self.values.iter() }
    }

    /// Copies the values out into a fresh vector.
    pub fn to_vec(&self) -> Vec<V>
    where
        V: Clone
    {
        self.values.clone()
    }
}

impl<V> AsRef<[V]> for ValueBag<V> {
    fn as_ref(&self) -> &[V] {
        self.as_slice()
    }
}

impl<V> From<ValueBag<V>> for Vec<V> {
    fn from(bag: ValueBag<V>) -> Self {
        bag.values
    }
}

impl<V> IntoIterator for ValueBag<V> {
    type IntoIter = IntoIter<V>;
    type Item = V;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { values: self.values.into_iter() }
    }
}

impl<'a, V> IntoIterator for &'a ValueBag<V> {
    type IntoIter = Iter<'a, V>;
    type Item = &'a V;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the owned values of a bag.
#[derive(Clone, Debug)]
pub struct IntoIter<V> {
    values: std::vec::IntoIter<V>,
}

impl<V> Iterator for IntoIter<V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.values.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

impl<V> FusedIterator for IntoIter<V> {}

impl<V> ExactSizeIterator for IntoIter<V> {
    fn len(&self) -> usize {
        self.values.len()
    }
}

/// An iterator over the borrowed values of a bag.
#[derive(Clone, Debug)]
pub struct Iter<'a, V> {
    values: core::slice::Iter<'a, V>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.values.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

impl<V> FusedIterator for Iter<'_, V> {}

impl<V> ExactSizeIterator for Iter<'_, V> {
    fn len(&self) -> usize {
        self.values.len()
    }
}

#[cfg(feature = "serde")]
mod serde {
    use serde::ser::{Serialize, Serializer};
    use crate::bag::ValueBag;


    impl<V: Serialize> Serialize for ValueBag<V> {
        fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
            ser.collect_seq(self)
        }
    }
}
