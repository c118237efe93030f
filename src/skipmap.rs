use std::{
    borrow::Borrow,
    fmt::{self, Debug},
    mem::replace,
};

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, trace};

use crate::{
    error::Result,
    iterator::{Iter, Keys, Values},
    options::Options,
    utils::arena::{Arena, NodeId},
};

pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    // one successor per level this node takes part in
    pub(crate) forward: Vec<Option<NodeId>>,
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V, level: usize) -> Node<K, V> {
        Node {
            key,
            value,
            forward: vec![None; level],
        }
    }
}

/// An ordered map backed by a skiplist.
///
/// Nodes live in an arena owned by the map. Every forward link, including the
/// upper-level shortcuts, is a plain index into that arena, so removing a key
/// frees exactly one slot.
///
/// ```
/// use rskiplist::{Options, SkipMap};
///
/// let mut map = SkipMap::with_seed(Options::default(), 7).unwrap();
/// map.insert(3, "hello");
/// map.insert(1, "world");
/// assert_eq!(map.search(&3), Some(&"hello"));
/// assert_eq!(map.values().copied().collect::<Vec<_>>(), ["world", "hello"]);
/// ```
pub struct SkipMap<K, V, R = StdRng> {
    // forward slots of the header sentinel, `max_level` of them
    header: Vec<Option<NodeId>>,
    arena: Arena<Node<K, V>>,
    current_level: usize,
    max_level: usize,
    probability: f64,
    len: usize,
    rand: R,
}

impl<K: Ord, V> SkipMap<K, V, StdRng> {
    pub fn new(options: Options) -> Result<Self> {
        Self::with_rng(options, StdRng::from_entropy())
    }

    pub fn with_seed(options: Options, seed: u64) -> Result<Self> {
        Self::with_rng(options, StdRng::seed_from_u64(seed))
    }
}

impl<K: Ord, V, R: Rng> SkipMap<K, V, R> {
    /// Builds an empty map drawing node levels from `rand`.
    ///
    /// Fails with [`Error::InvalidConfiguration`](crate::Error::InvalidConfiguration)
    /// if `options` does not validate.
    pub fn with_rng(options: Options, rand: R) -> Result<Self> {
        options.validate()?;
        debug!(
            max_level = options.max_level,
            probability = options.probability,
            "create skipmap"
        );
        Ok(Self::build(options, rand))
    }

    fn build(options: Options, rand: R) -> Self {
        SkipMap {
            header: vec![None; options.max_level],
            arena: Arena::new(),
            current_level: 0,
            max_level: options.max_level,
            probability: options.probability,
            len: 0,
            rand,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn current_level(&self) -> usize {
        self.current_level
    }

    pub fn max_level(&self) -> usize {
        self.max_level
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn search<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|id| &self.arena[id].value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.find(key)?;
        Some(&mut self.arena[id].value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.upsert(key, value);
    }

    /// Inserts `key`, returning the value it replaced if the key was present.
    ///
    /// A present key keeps its node and its level; only the value changes.
    pub fn upsert(&mut self, key: K, value: V) -> Option<V> {
        let mut update = vec![None; self.max_level];
        if let Some(id) = self.descend(&key, Some(&mut update)) {
            let node = &mut self.arena[id];
            if node.key == key {
                return Some(replace(&mut node.value, value));
            }
        }

        let level = self.random_level();
        if level > self.current_level {
            // update[current_level..level] is still None, i.e. the header
            debug!(from = self.current_level, to = level, "raise current level");
            self.current_level = level;
        }

        let id = self.arena.allocate(Node::new(key, value, level));
        trace!(level, id, "allocate node");
        for (i, &prev) in update.iter().enumerate().take(level) {
            let next = self.next(prev, i);
            self.arena[id].forward[i] = next;
            self.set_next(prev, i, Some(id));
        }
        self.len += 1;
        None
    }

    pub fn delete<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove(key);
    }

    /// Removes `key` and returns its value. An absent key leaves the map
    /// untouched, `current_level` included.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut update = vec![None; self.max_level];
        let target = self
            .descend(key, Some(&mut update))
            .filter(|&id| self.key_eq(id, key))?;

        for (level, &prev) in update.iter().enumerate().take(self.current_level) {
            // levels are nested, so the first level not pointing at the
            // target means no higher level does either
            if self.next(prev, level) != Some(target) {
                break;
            }
            let after = self.arena[target].forward[level];
            self.set_next(prev, level, after);
        }

        let from = self.current_level;
        while self.current_level > 0 && self.header[self.current_level - 1].is_none() {
            self.current_level -= 1;
        }
        if from != self.current_level {
            debug!(from, to = self.current_level, "shrink current level");
        }

        trace!(id = target, "release node");
        self.len -= 1;
        let node = self.arena.release(target)?;
        debug_assert_eq!(self.arena.memory_usage(), self.len);
        Some(node.value)
    }

    /// Drops every entry. The generator keeps its state.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.header.iter_mut().for_each(|slot| *slot = None);
        self.current_level = 0;
        self.len = 0;
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.arena, self.header[0], self.len)
    }

    fn random_level(&mut self) -> usize {
        let mut level = 1;
        while level < self.max_level && self.rand.gen::<f64>() < self.probability {
            level += 1;
        }
        level
    }

    fn find<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.descend(key, None).filter(|&id| self.key_eq(id, key))
    }

    // Walks down from the top level, stopping at each level on the last node
    // whose key is less than `key`. Those predecessors are recorded in
    // `update` when given (None stands for the header). Returns the level-0
    // successor of the final predecessor.
    fn descend<Q>(&self, key: &Q, mut update: Option<&mut Vec<Option<NodeId>>>) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = None;
        for level in (0..self.current_level).rev() {
            while let Some(next) = self.next(current, level) {
                if self.key_less(next, key) {
                    current = Some(next);
                } else {
                    break;
                }
            }
            if let Some(update) = update.as_mut() {
                update[level] = current;
            }
        }
        self.next(current, 0)
    }

    fn key_less<Q>(&self, id: NodeId, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node_key: &Q = self.arena[id].key.borrow();
        node_key < key
    }

    fn key_eq<Q>(&self, id: NodeId, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node_key: &Q = self.arena[id].key.borrow();
        node_key == key
    }

    fn next(&self, at: Option<NodeId>, level: usize) -> Option<NodeId> {
        match at {
            None => self.header[level],
            Some(id) => self.arena[id].forward[level],
        }
    }

    fn set_next(&mut self, at: Option<NodeId>, level: usize, to: Option<NodeId>) {
        match at {
            None => self.header[level] = to,
            Some(id) => self.arena[id].forward[level] = to,
        }
    }
}

impl<K: Ord, V> Default for SkipMap<K, V, StdRng> {
    fn default() -> Self {
        Self::build(Options::default(), StdRng::from_entropy())
    }
}

impl<K: Ord, V, R: Rng> Extend<(K, V)> for SkipMap<K, V, R> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for SkipMap<K, V, StdRng> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = SkipMap::default();
        map.extend(iter);
        map
    }
}

impl<'a, K: Ord, V, R: Rng> IntoIterator for &'a SkipMap<K, V, R> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Ord + Debug, V: Debug, R: Rng> Debug for SkipMap<K, V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
