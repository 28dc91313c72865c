use super::index_trait::{IndexRange, IndexRef};
use std::{marker::PhantomData, ops};

/// An append-only arena addressed by a typed index.
///
/// Elements are never removed or relocated, so a key handed out by
/// [`push`](IndexedMap::push) stays valid for the life of the map. This is
/// the storage discipline the kernel relies on: the event queue and the
/// sensitivity sets hold keys into these maps across arbitrarily many
/// scheduling cycles.
#[derive(Debug, Clone)]
pub struct IndexedMap<K, D>
where
    K: IndexRef,
{
    data: Vec<D>,
    phantom: PhantomData<K>,
}

impl<K, D> IndexedMap<K, D>
where
    K: IndexRef,
{
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            phantom: PhantomData,
        }
    }

    pub fn with_capacity(size: usize) -> Self {
        Self {
            data: Vec::with_capacity(size),
            phantom: PhantomData,
        }
    }

    pub fn get(&self, index: K) -> Option<&D> {
        self.data.get(index.index())
    }

    pub fn get_mut(&mut self, index: K) -> Option<&mut D> {
        self.data.get_mut(index.index())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn push(&mut self, item: D) -> K {
        self.data.push(item);
        K::new(self.data.len() - 1)
    }

    /// The key the next call to [`push`](IndexedMap::push) will return.
    pub fn peek_next_idx(&self) -> K {
        K::new(self.data.len())
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, &D)> {
        self.data.iter().enumerate().map(|(i, v)| (K::new(i), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (K, &mut D)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (K::new(i), v))
    }

    pub fn values(&self) -> impl Iterator<Item = &D> {
        self.data.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = K> {
        (0..self.data.len()).map(K::new)
    }
}

impl<K, D> IndexedMap<K, D>
where
    K: IndexRef + PartialOrd,
{
    /// Produces a range covering every key in the map. Unlike
    /// [`keys`](IndexedMap::keys) the result has no lifetime tied to the
    /// map, so it can be iterated while the map is mutably borrowed.
    pub fn range(&self) -> IndexRange<K> {
        IndexRange::new(K::new(0), K::new(self.len()))
    }
}

impl<K, D> ops::Index<K> for IndexedMap<K, D>
where
    K: IndexRef,
{
    type Output = D;

    fn index(&self, index: K) -> &Self::Output {
        &self.data[index.index()]
    }
}

impl<K, D> ops::IndexMut<K> for IndexedMap<K, D>
where
    K: IndexRef,
{
    fn index_mut(&mut self, index: K) -> &mut Self::Output {
        &mut self.data[index.index()]
    }
}

impl<K, D> Default for IndexedMap<K, D>
where
    K: IndexRef,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::{IndexRef, impl_index, IndexedMap};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    struct MyIdx(u32);
    impl_index!(MyIdx);

    #[test]
    fn push_hands_out_sequential_keys() {
        let mut map: IndexedMap<MyIdx, usize> = IndexedMap::new();
        for i in 0..64 {
            let key = map.push(i * 3);
            assert_eq!(key.index(), i);
            assert_eq!(map[key], i * 3);
        }
        assert_eq!(map.len(), 64);
        assert_eq!(map.peek_next_idx().index(), 64);
    }

    #[test]
    fn range_iterates_all_keys_in_order() {
        let mut map: IndexedMap<MyIdx, ()> = IndexedMap::new();
        for _ in 0..10 {
            map.push(());
        }
        let collected: Vec<usize> =
            map.range().into_iter().map(|k| k.index()).collect();
        assert_eq!(collected, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn get_out_of_bounds_is_none() {
        let mut map: IndexedMap<MyIdx, u8> = IndexedMap::new();
        map.push(1);
        assert!(map.get(MyIdx::from(1_usize)).is_none());
        assert_eq!(map.get(MyIdx::from(0_usize)), Some(&1));
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn keys_round_trip(values in prop::collection::vec(any::<u64>(), 1..500)) {
            let mut map: IndexedMap<MyIdx, u64> = IndexedMap::new();
            let keys: Vec<MyIdx> =
                values.iter().map(|v| map.push(*v)).collect();
            for (key, value) in keys.iter().zip(values.iter()) {
                prop_assert_eq!(&map[*key], value);
            }
            prop_assert_eq!(map.len(), values.len());
        }
    }
}
