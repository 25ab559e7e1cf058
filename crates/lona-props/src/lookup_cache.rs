// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! The process-wide property lookup cache (§4.4).
//!
//! A direct-mapped table of rows, each row holding up to
//! `lookup_cache_row_len` entries in most-recently-used order. The
//! specification's entries are keyed by a packed `id` built from two
//! compact pointers (object and name), which needs a `name_type` guard
//! against a narrowed int accidentally matching the wrong handle kind.
//! This implementation stores the full [`StringHandle`] in each entry
//! instead of a narrowed integer, which removes that whole confusion
//! class structurally rather than guarding against it after the fact —
//! see `DESIGN.md` for why that is a safe simplification here.
//!
//! One consequence of not packing a back-pointer into the record is
//! that evicting a row's oldest entry cannot *always* clear the evicted
//! record's `LCACHED` bit in place — only when the eviction happens to
//! be for the object currently being operated on can the caller reach
//! that record. [`insert`](LookupCache::insert) reports the eviction so
//! [`crate::list::PropertyList`] can clear it when it owns that record,
//! and leaves it as a harmless stale bit otherwise (the cache is a
//! best-effort accelerator per §4.4; no operation's correctness depends
//! on `LCACHED` reflecting cache membership exactly).

#[cfg(test)]
mod lookup_cache_test;

#[cfg(any(test, feature = "std"))]
use std::vec;
#[cfg(any(test, feature = "std"))]
use std::vec::Vec;

#[cfg(not(any(test, feature = "std")))]
use alloc::vec;
#[cfg(not(any(test, feature = "std")))]
use alloc::vec::Vec;

use crate::config::Config;
use crate::ids::{ObjectId, SlotIndex};
use crate::string_handle::{StringHandle, StringTable, handles_equal};

/// One live cache entry.
#[derive(Clone, Copy, Debug)]
struct Entry {
    object: ObjectId,
    name: StringHandle,
    slot: SlotIndex,
}

/// An entry evicted to make room for a new one.
#[derive(Clone, Copy, Debug)]
pub struct Evicted {
    /// Owning object of the evicted entry.
    pub object: ObjectId,
    /// Name of the evicted entry.
    pub name: StringHandle,
    /// Slot the evicted entry pointed at.
    pub slot: SlotIndex,
}

/// Direct-mapped, LRU-within-row property lookup cache.
#[derive(Debug)]
pub struct LookupCache {
    rows: Vec<Vec<Entry>>,
    row_len: usize,
}

impl LookupCache {
    /// Build an empty cache sized per `config`.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            rows: vec![Vec::new(); config.lookup_cache_rows as usize],
            row_len: config.lookup_cache_row_len as usize,
        }
    }

    fn row_for<S: StringTable>(&self, table: &S, object: ObjectId, name: StringHandle) -> usize {
        let object_hash = fold_u64(object.as_u64());
        let name_hash = table.hash(name);
        ((object_hash ^ name_hash) as usize) % self.rows.len()
    }

    /// Look up `(object, name)`, promoting a hit to the front of its row.
    #[must_use]
    pub fn lookup<S: StringTable>(&mut self, table: &S, object: ObjectId, name: StringHandle) -> Option<SlotIndex> {
        let row_index = self.row_for(table, object, name);
        let row = &mut self.rows[row_index];
        let position = row
            .iter()
            .position(|e| e.object == object && handles_equal(table, e.name, name))?;
        let entry = row.remove(position);
        let slot = entry.slot;
        row.insert(0, entry);
        Some(slot)
    }

    /// Insert (or refresh) an entry for `(object, name) -> slot`.
    ///
    /// If the row is at capacity and no existing entry matches, the
    /// row's least-recently-used entry is evicted and returned so the
    /// caller can clear `LCACHED` on it if it owns that record.
    #[must_use]
    pub fn insert<S: StringTable>(
        &mut self,
        table: &S,
        object: ObjectId,
        name: StringHandle,
        slot: SlotIndex,
    ) -> Option<Evicted> {
        let row_index = self.row_for(table, object, name);
        let row_len = self.row_len;
        let row = &mut self.rows[row_index];

        if let Some(position) = row.iter().position(|e| e.object == object && handles_equal(table, e.name, name)) {
            let mut entry = row.remove(position);
            entry.slot = slot;
            row.insert(0, entry);
            return None;
        }

        let evicted = if row.len() >= row_len {
            row.pop().map(|e| Evicted {
                object: e.object,
                name: e.name,
                slot: e.slot,
            })
        } else {
            None
        };

        row.insert(0, Entry { object, name, slot });
        evicted
    }

    /// Remove the entry for `(object, name)`, if present.
    pub fn invalidate<S: StringTable>(&mut self, table: &S, object: ObjectId, name: StringHandle) -> bool {
        let row_index = self.row_for(table, object, name);
        let row = &mut self.rows[row_index];
        match row.iter().position(|e| e.object == object && handles_equal(table, e.name, name)) {
            Some(position) => {
                row.remove(position);
                true
            }
            None => false,
        }
    }

    /// Remove every entry belonging to `object`, used when an object is
    /// reclaimed and its whole property list goes away with it.
    pub fn invalidate_object(&mut self, object: ObjectId) {
        for row in &mut self.rows {
            row.retain(|e| e.object != object);
        }
    }
}

/// Fold a 64-bit id down to 32 bits for mixing with a name hash.
#[inline]
fn fold_u64(value: u64) -> u32 {
    ((value ^ (value >> 32)) as u32).wrapping_mul(0x9e37_79b9)
}
