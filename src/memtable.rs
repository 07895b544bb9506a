// Copyright (c) 2024-present, Andrew Werner
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! The operation set an ordered in-memory write buffer exposes to the
//! surrounding storage engine.
//!
//! Flush, compaction, and WAL-replay collaborators drive the buffer
//! exclusively through this trait; nothing beyond it may be assumed.

use crate::skiplist::SkipList;

/// Contract between an ordered in-memory write buffer and the engine
/// around it.
///
/// Absence of a key is a normal outcome, never an error. `set` takes
/// ownership of both key and value, so the caller holds no alias into
/// the buffer afterwards; lookups hand back views whose lifetime is
/// bound to the entry.
///
/// Implementations are single-writer by construction: mutation requires
/// `&mut self`, and any cross-thread coordination is the caller's
/// responsibility.
pub trait MemTable<K, V> {
    /// Upsert. Re-setting an existing key replaces its value in place.
    fn set(&mut self, key: K, value: V);

    /// Point lookup; `None` when the key is not present.
    fn get(&self, key: &K) -> Option<&V>;

    /// Removes the entry for `key`, reporting whether it was present.
    /// Deleting an absent key changes nothing.
    fn delete(&mut self, key: &K) -> bool;

    /// Calls `visit` for every live entry in strictly ascending key
    /// order, stopping early the first time it returns `false`. Each
    /// call starts a fresh traversal from the smallest key.
    fn scan<F>(&self, visit: F)
    where
        F: FnMut(&K, &V) -> bool;

    /// Number of live entries.
    fn len(&self) -> usize;

    /// `true` when no entries are live.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> MemTable<K, V> for SkipList<K, V>
where
    K: Ord,
{
    fn set(&mut self, key: K, value: V) {
        SkipList::set(self, key, value);
    }

    fn get(&self, key: &K) -> Option<&V> {
        SkipList::get(self, key)
    }

    fn delete(&mut self, key: &K) -> bool {
        SkipList::delete(self, key)
    }

    fn scan<F>(&self, visit: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        SkipList::scan(self, visit);
    }

    fn len(&self) -> usize {
        SkipList::len(self)
    }
}
