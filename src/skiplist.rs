// Copyright (c) 2024-present, Andrew Werner
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! The skip-list engine: an ordered map with randomized leveling.
//!
//! Every operation descends the same way: from the highest populated
//! level down to level 0, advancing while the next key is strictly less
//! than the target and recording the last node visited per level. Those
//! per-level predecessors are exactly the splice points insert and
//! delete need.

use std::borrow::Borrow;

use crate::arena::{Arena, NodeId};
use crate::error::{Error, Result};

/// Default level ceiling, comfortable for memtables that flush in the
/// tens of thousands of entries.
pub const DEFAULT_MAX_LEVEL: usize = 16;

/// Default level-promotion probability.
pub const DEFAULT_PROBABILITY: f64 = 0.5;

#[derive(Clone, Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    // One forward link per level this node participates in. The length
    // is the node's drawn level; it never changes after insertion.
    tower: Box<[NodeId]>,
}

/// Geometric tower-height generator with per-list xorshift state.
///
/// Promotion thresholds are precomputed at construction, so a single
/// draw decides the whole tower height: `thresholds[i]` holds
/// `u32::MAX * p^(i+1)`, and the height is one more than the count of
/// leading thresholds at or above the draw. The distribution is the
/// same as repeated independent p-trials, clamped to the ceiling by the
/// table length.
#[derive(Clone, Debug)]
struct LevelGenerator {
    thresholds: Box<[u32]>,
    seed: u32,
}

impl LevelGenerator {
    fn new(max_level: usize, probability: f64, seed: u32) -> Self {
        let mut thresholds = Vec::with_capacity(max_level - 1);
        let mut p = probability;
        for _ in 1..max_level {
            thresholds.push(((u32::MAX as f64) * p) as u32);
            p *= probability;
        }
        Self {
            thresholds: thresholds.into_boxed_slice(),
            // Zero is the xorshift fixed point; nudge it off.
            seed: if seed == 0 { 0x9E37_79B9 } else { seed },
        }
    }

    fn next_level(&mut self) -> usize {
        // Pseudorandom number generation from "Xorshift RNGs" by George
        // Marsaglia. This particular set of operations generates 32-bit
        // integers. See:
        // https://en.wikipedia.org/wiki/Xorshift#Example_implementation
        let mut num = self.seed;
        num ^= num << 13;
        num ^= num >> 17;
        num ^= num << 5;
        self.seed = num;

        let mut level = 1;
        for &threshold in &*self.thresholds {
            if num > threshold {
                break;
            }
            level += 1;
        }
        level
    }
}

/// A probabilistic ordered map: the in-memory write buffer of an
/// LSM-style storage engine.
///
/// Expected O(log n) insert, lookup, and delete, with entries kept in
/// strictly ascending key order and at most one live entry per key.
/// The list owns every node it creates; `set` takes ownership of both
/// key and value, and lookups hand back borrowed views.
///
/// The structure is single-writer and not internally synchronized:
/// mutation requires `&mut self`, and any concurrent access must be
/// coordinated by the caller.
#[derive(Clone, Debug)]
pub struct SkipList<K, V> {
    arena: Arena<Node<K, V>>,
    // The sentinel head: one forward link per level up to the ceiling,
    // null where the level is empty.
    head: Box<[NodeId]>,
    // Highest populated level; zero when the list is empty.
    level: usize,
    levels: LevelGenerator,
}

impl<K, V> Default for SkipList<K, V> {
    fn default() -> Self {
        Self::new(1)
    }
}

impl<K, V> SkipList<K, V> {
    /// Creates a list with the default ceiling and promotion
    /// probability. `seed` drives the per-instance level generator, so
    /// two lists built with the same seed and workload have identical
    /// shape.
    pub fn new(seed: u32) -> Self {
        Self::build(DEFAULT_MAX_LEVEL, DEFAULT_PROBABILITY, seed)
    }

    /// Creates a list with an explicit level ceiling and promotion
    /// probability.
    ///
    /// # Errors
    ///
    /// `max_level` must be greater than zero and `probability` must lie
    /// strictly between zero and one; anything else (including NaN) is
    /// rejected here rather than at first use.
    pub fn with_config(max_level: usize, probability: f64, seed: u32) -> Result<Self> {
        if max_level == 0 {
            return Err(Error::InvalidMaxLevel(max_level));
        }
        if !(probability > 0.0 && probability < 1.0) {
            return Err(Error::InvalidProbability(probability));
        }
        Ok(Self::build(max_level, probability, seed))
    }

    fn build(max_level: usize, probability: f64, seed: u32) -> Self {
        Self {
            arena: Arena::new(),
            head: vec![NodeId::NONE; max_level].into_boxed_slice(),
            level: 0,
            levels: LevelGenerator::new(max_level, probability, seed),
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// `true` when no entries are live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Highest populated level. Shrinks as deletions empty the top
    /// levels and returns to zero when the list is empty.
    pub fn level(&self) -> usize {
        self.level
    }

    /// The configured level ceiling.
    pub fn max_level(&self) -> usize {
        self.head.len()
    }

    /// Smallest entry, or `None` when the list is empty. O(1).
    pub fn first(&self) -> Option<(&K, &V)> {
        let node = self.arena.get(self.head[0])?;
        Some((&node.key, &node.value))
    }

    /// Largest entry, or `None` when the list is empty. Walks the top
    /// levels to the end of the list, so it costs O(log n).
    pub fn last(&self) -> Option<(&K, &V)> {
        let mut cur = NodeId::NONE;
        for lvl in (0..self.level).rev() {
            loop {
                let next = self.next_of(cur, lvl);
                if next.is_none() {
                    break;
                }
                cur = next;
            }
        }
        let node = self.arena.get(cur)?;
        Some((&node.key, &node.value))
    }

    /// Removes every entry and resets the level to zero. Node storage
    /// capacity is retained for reuse.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.head.fill(NodeId::NONE);
        self.level = 0;
    }

    /// Iterator over entries in strictly ascending key order. Each call
    /// starts a fresh traversal from the smallest key.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            next: self.head[0],
        }
    }

    /// Calls `visit` for every live entry in strictly ascending key
    /// order, stopping early the first time it returns `false`.
    pub fn scan<F>(&self, mut visit: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        for entry in self.iter() {
            if !visit(entry.key(), entry.value()) {
                break;
            }
        }
    }

    fn next_of(&self, id: NodeId, level: usize) -> NodeId {
        if id.is_none() {
            self.head[level]
        } else {
            match self.arena.get(id) {
                Some(node) => node.tower[level],
                None => NodeId::NONE,
            }
        }
    }

    fn set_next(&mut self, id: NodeId, level: usize, target: NodeId) {
        if id.is_none() {
            self.head[level] = target;
        } else if let Some(node) = self.arena.get_mut(id) {
            node.tower[level] = target;
        }
    }
}

impl<K, V> SkipList<K, V>
where
    K: Ord,
{
    /// Inserts `value` under `key`, or overwrites the existing value in
    /// place if the key is already present. An overwrite changes
    /// neither the entry's position nor its tower, and draws no new
    /// level.
    pub fn set(&mut self, key: K, value: V) {
        let mut update = vec![NodeId::NONE; self.max_level()];
        let candidate = self.search(&key, &mut update);
        if let Some(node) = self.arena.get_mut(candidate) {
            if node.key == key {
                node.value = value;
                return;
            }
        }

        let height = self.levels.next_level();
        if height > self.level {
            // The levels between the old top and the new one hold no
            // nodes yet; `update` already names the sentinel there.
            self.level = height;
        }

        let mut tower = Vec::with_capacity(height);
        for lvl in 0..height {
            tower.push(self.next_of(update[lvl], lvl));
        }
        let id = self.arena.insert(Node {
            key,
            value,
            tower: tower.into_boxed_slice(),
        });
        for lvl in 0..height {
            self.set_next(update[lvl], lvl, id);
        }
    }

    /// Point lookup; `None` when the key is not present.
    ///
    /// The key may be any borrowed form of `K`, so a
    /// `SkipList<ByteKey, _>` can be probed with a plain `&[u8]`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let candidate = self.find(key);
        match self.arena.get(candidate) {
            Some(node) if node.key.borrow() == key => Some(&node.value),
            _ => None,
        }
    }

    /// `true` if an entry for `key` is live.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Removes the entry for `key`, reporting whether it was present.
    /// Deleting an absent key changes nothing.
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut update = vec![NodeId::NONE; self.max_level()];
        let candidate = self.search(key, &mut update);
        match self.arena.get(candidate) {
            Some(node) if node.key.borrow() == key => {}
            _ => return false,
        }
        let Some(node) = self.arena.remove(candidate) else {
            return false;
        };

        // Unlink bottom-up. The first level where the predecessor does
        // not point at the node is the first level above its tower.
        for (lvl, &next) in node.tower.iter().enumerate() {
            if self.next_of(update[lvl], lvl) != candidate {
                break;
            }
            self.set_next(update[lvl], lvl, next);
        }

        // Trim empty top levels so descent starts at the true height.
        while self.level > 0 && self.head[self.level - 1].is_none() {
            self.level -= 1;
        }
        true
    }

    /// Descends to level 0 and returns the candidate match: the first
    /// node whose key is not less than `key`, or the null handle.
    fn find<Q>(&self, key: &Q) -> NodeId
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cur = NodeId::NONE;
        for lvl in (0..self.level).rev() {
            cur = self.walk_level(cur, lvl, key);
        }
        self.next_of(cur, 0)
    }

    /// Like [`Self::find`], additionally recording the predecessor at
    /// every level for later splicing. Levels at or above the current
    /// top are left as the sentinel.
    fn search<Q>(&self, key: &Q, update: &mut [NodeId]) -> NodeId
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cur = NodeId::NONE;
        for lvl in (0..self.level).rev() {
            cur = self.walk_level(cur, lvl, key);
            update[lvl] = cur;
        }
        self.next_of(cur, 0)
    }

    /// Advances along one level while the next key is strictly less
    /// than the target, returning the last node before overshoot.
    fn walk_level<Q>(&self, mut cur: NodeId, lvl: usize, key: &Q) -> NodeId
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut next = self.next_of(cur, lvl);
        while let Some(node) = self.arena.get(next) {
            if node.key.borrow() < key {
                cur = next;
                next = node.tower[lvl];
            } else {
                break;
            }
        }
        cur
    }
}

/// Lazy forward iterator over the entries of a [`SkipList`].
pub struct Iter<'m, K, V> {
    list: &'m SkipList<K, V>,
    next: NodeId,
}

impl<'m, K, V> Iterator for Iter<'m, K, V> {
    type Item = Entry<'m, K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.arena.get(self.next)?;
        self.next = node.tower[0];
        Some(Entry(node))
    }
}

/// Borrowed view of a single entry.
pub struct Entry<'m, K, V>(&'m Node<K, V>);

impl<'m, K, V> Entry<'m, K, V> {
    /// The entry's key.
    pub fn key(&self) -> &'m K {
        &self.0.key
    }

    /// The entry's value.
    pub fn value(&self) -> &'m V {
        &self.0.value
    }
}

#[cfg(test)]
impl<K, V> SkipList<K, V>
where
    K: Ord,
{
    pub(crate) fn check_integrity(&self) {
        // Keys strictly ascend at every level, no node is linked at or
        // above its tower height or the current level, and the level-0
        // chain accounts for every live entry.
        for lvl in 0..self.max_level() {
            let mut count = 0usize;
            let mut prev_key: Option<&K> = None;
            let mut cur = self.head[lvl];
            while let Some(node) = self.arena.get(cur) {
                assert!(node.tower.len() > lvl, "node linked above its tower");
                if let Some(prev) = prev_key {
                    assert!(prev < &node.key, "keys out of order at level {lvl}");
                }
                prev_key = Some(&node.key);
                count += 1;
                cur = node.tower[lvl];
            }
            if lvl == 0 {
                assert_eq!(count, self.len(), "level-0 chain disagrees with len");
            }
            if lvl >= self.level {
                assert_eq!(count, 0, "nodes linked above the current level");
            }
        }
        assert!(self.level <= self.max_level(), "level exceeds ceiling");
    }
}
