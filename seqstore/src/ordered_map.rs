//! [`OrderedMap`], a map ordered by a runtime [`Comparator`].

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use crate::Comparator;

/// A key carrying the comparator that orders it, so it can live in a [`BTreeMap`].
struct OrdKey<K> {
    key: K,
    order: Comparator<K>,
}

impl<K> PartialEq for OrdKey<K> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}
impl<K> Eq for OrdKey<K> {}
impl<K> PartialOrd for OrdKey<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<K> Ord for OrdKey<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.order)(&self.key, &other.key)
    }
}
impl<K: Clone> Clone for OrdKey<K> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            order: self.order.clone(),
        }
    }
}

/// A map from `K` to `V` kept in ascending key order under a caller-supplied [`Comparator`].
///
/// Keys that compare equal under the comparator are the same key. Lookups by reference clone the probe key.
#[derive(Clone)]
pub struct OrderedMap<K, V> {
    map: BTreeMap<OrdKey<K>, V>,
    order: Comparator<K>,
}

impl<K, V> OrderedMap<K, V> {
    /// Creates an empty map ordered by `order`.
    pub fn new(order: Comparator<K>) -> Self {
        Self {
            map: BTreeMap::new(),
            order,
        }
    }

    /// The comparator ordering the keys.
    pub fn order(&self) -> &Comparator<K> {
        &self.order
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn wrap(&self, key: K) -> OrdKey<K> {
        OrdKey {
            key,
            order: self.order.clone(),
        }
    }

    /// Returns the value for `key`, inserting `default()` first if absent.
    pub fn get_or_insert_with(&mut self, key: K, default: impl FnOnce() -> V) -> &mut V {
        let key = self.wrap(key);
        self.map.entry(key).or_insert_with(default)
    }

    /// Sets the value for `key`, returning the previous value. An existing equal-ranked key is kept.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let key = self.wrap(key);
        self.map.insert(key, value)
    }

    /// The entry with the smallest key.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.map.first_key_value().map(|(k, v)| (&k.key, v))
    }

    /// The entry with the largest key.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.map.last_key_value().map(|(k, v)| (&k.key, v))
    }

    /// The entry with the smallest key, with its value mutable.
    pub fn first_mut(&mut self) -> Option<(&K, &mut V)> {
        self.map.iter_mut().next().map(|(k, v)| (&k.key, v))
    }

    /// The entry with the largest key, with its value mutable.
    pub fn last_mut(&mut self) -> Option<(&K, &mut V)> {
        self.map.iter_mut().next_back().map(|(k, v)| (&k.key, v))
    }

    /// Removes and returns the entry with the smallest key.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.map.pop_first().map(|(k, v)| (k.key, v))
    }

    /// Removes and returns the entry with the largest key.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.map.pop_last().map(|(k, v)| (k.key, v))
    }

    /// Replaces the smallest entry's key with `new_key`, which must rank equal to it.
    ///
    /// Returns `false` if the map is empty.
    pub fn rekey_first(&mut self, new_key: K) -> bool {
        let Some((old, value)) = self.map.pop_first() else {
            return false;
        };
        debug_assert!((self.order)(&old.key, &new_key).is_eq());
        let new_key = self.wrap(new_key);
        self.map.insert(new_key, value);
        true
    }

    /// Replaces the largest entry's key with `new_key`, which must rank equal to it.
    ///
    /// Returns `false` if the map is empty.
    pub fn rekey_last(&mut self, new_key: K) -> bool {
        let Some((old, value)) = self.map.pop_last() else {
            return false;
        };
        debug_assert!((self.order)(&old.key, &new_key).is_eq());
        let new_key = self.wrap(new_key);
        self.map.insert(new_key, value);
        true
    }

    /// Iterates entries in ascending key order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&K, &V)> + ExactSizeIterator {
        self.map.iter().map(|(k, v)| (&k.key, v))
    }

    /// Iterates values in ascending key order.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator {
        self.map.values()
    }

    /// Consumes the map, yielding values in ascending key order.
    pub fn into_values(self) -> impl DoubleEndedIterator<Item = V> + ExactSizeIterator {
        self.map.into_values()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.map.clear();
    }
}

impl<K: Clone, V> OrderedMap<K, V> {
    /// Returns the value for `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.map.get(&self.wrap(key.clone()))
    }

    /// Returns the value for `key` mutably.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let key = self.wrap(key.clone());
        self.map.get_mut(&key)
    }

    /// Returns `true` if an equal-ranked key is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Removes the entry for `key`, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let key = self.wrap(key.clone());
        self.map.remove(&key)
    }

    /// Replaces the key of the entry ranked equal to `key` with `new_key`, keeping its value in place.
    ///
    /// `new_key` must rank equal to `key`. Returns `false` if there is no such entry.
    pub fn rekey(&mut self, key: &K, new_key: K) -> bool {
        debug_assert!((self.order)(key, &new_key).is_eq());
        let Some(value) = self.remove(key) else {
            return false;
        };
        let new_key = self.wrap(new_key);
        self.map.insert(new_key, value);
        true
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::order;

    #[test]
    fn test_comparator_order() {
        let mut map = OrderedMap::new(order::natural_descending::<i32>());
        map.insert(1, 'a');
        map.insert(3, 'c');
        map.insert(2, 'b');
        assert_eq!(vec![(&3, &'c'), (&2, &'b'), (&1, &'a')], map.iter().collect::<Vec<_>>());
        assert_eq!(Some((&3, &'c')), map.first());
        assert_eq!(Some((&1, &'a')), map.last());
        assert_eq!(Some(&'b'), map.get(&2));
        assert!(!map.contains_key(&4));
    }

    #[test]
    fn test_get_or_insert_with() {
        let mut map = OrderedMap::new(order::by_key(|n: &i32| n % 3));
        map.get_or_insert_with(1, Vec::new).push(1);
        map.get_or_insert_with(4, Vec::new).push(4);
        map.get_or_insert_with(3, Vec::new).push(3);
        assert_eq!(2, map.len());
        // The first key inserted for a class is the one that is kept.
        assert_eq!(Some((&1, &vec![1, 4])), map.last());
        assert_eq!(Some((&3, &vec![3])), map.first());
    }

    #[test]
    fn test_pop_and_rekey() {
        let mut map = OrderedMap::new(order::by_key(|n: &i32| n / 10));
        map.insert(11, "teens");
        map.insert(21, "twenties");
        map.insert(5, "ones");

        assert!(map.rekey(&11, 19));
        assert_eq!(vec![&5, &19, &21], map.iter().map(|(k, _)| k).collect::<Vec<_>>());
        assert!(map.rekey_first(7));
        assert!(map.rekey_last(29));
        assert_eq!(Some((7, "ones")), map.pop_first());
        assert_eq!(Some((29, "twenties")), map.pop_last());
        assert_eq!(Some("teens"), map.remove(&15));
        assert!(map.is_empty());
        assert!(!map.rekey_first(0));
        assert!(!map.rekey(&1, 2));
    }

    #[test]
    fn test_mut_access() {
        let mut map = OrderedMap::new(order::natural::<i32>());
        map.insert(1, 10);
        map.insert(2, 20);
        *map.first_mut().unwrap().1 += 1;
        *map.last_mut().unwrap().1 += 2;
        *map.get_mut(&1).unwrap() += 100;
        assert_eq!(vec![111, 22], map.values().copied().collect::<Vec<_>>());
        assert_eq!("{1: 111, 2: 22}", format!("{:?}", map));
    }
}
