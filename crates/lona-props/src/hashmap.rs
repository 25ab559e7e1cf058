// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! The property hashmap: an open-addressed accelerator over a
//! [`PropertyList`](crate::list::PropertyList)'s slab (§4.3).
//!
//! Unlike the distilled specification's source engine, slots here are
//! identified by a stable 1-based [`SlotIndex`] into a `Vec`-backed slab
//! rather than a raw pointer into a slab that moves on every
//! reallocation — `Vec::push` never invalidates existing indices, so
//! this hashmap never needs the "rewrite lookup-cache entries pointing
//! into the old slab" dance the specification describes for the slab
//! itself (that dance *is* still needed for the lookup cache's own
//! entries, and is implemented in [`crate::list`]). This is a deliberate
//! simplification recorded in `DESIGN.md`, not a behavior change: the
//! hashmap's probe sequence, load-factor thresholds, and tombstone
//! handling are all unchanged from the specification.

#[cfg(test)]
mod hashmap_test;

#[cfg(any(test, feature = "std"))]
use std::vec;
#[cfg(any(test, feature = "std"))]
use std::vec::Vec;

#[cfg(not(any(test, feature = "std")))]
use alloc::vec;
#[cfg(not(any(test, feature = "std")))]
use alloc::vec::Vec;

use crate::config::{Config, PROBE_STEPS};
use crate::error::DeleteOutcome;
use crate::ids::SlotIndex;
use crate::record::PropertyRecord;
use crate::string_handle::{StringHandle, StringTable, handles_equal};

/// One bucket cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cell {
    /// Never written since the table was last rebuilt. Probing stops here.
    Clean,
    /// Previously occupied, now vacated by a delete. Probing continues.
    Dirty,
    /// Holds a candidate slot; the name must still be verified against
    /// the list (a hash collision does not imply a name match).
    Occupied(SlotIndex),
}

/// Open-addressed accelerator for one property list.
#[derive(Debug)]
pub struct PropertyHashmap {
    cells: Vec<Cell>,
    /// `bucket_count - 1`, since `bucket_count` is always a power of two.
    mask: u64,
    /// Number of `Occupied` cells.
    property_count: u32,
    /// Number of cells that have never been written (`Clean`).
    null_count: u32,
    /// Number of `Dirty` tombstones.
    unused_count: u32,
}

impl PropertyHashmap {
    /// `bucket_count`, the total number of cells.
    #[inline]
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of live (occupied) entries.
    #[inline]
    #[must_use]
    pub const fn property_count(&self) -> u32 {
        self.property_count
    }

    /// Number of tombstoned entries, exposed for the debug counter in
    /// scenario 3 of §8.
    #[inline]
    #[must_use]
    pub const fn unused_count(&self) -> u32 {
        self.unused_count
    }

    /// Build a hashmap over every non-deleted record in `records`, or
    /// return `None` if the process is not currently allowing hashmap
    /// allocation, the list is too small, or the allocation itself would
    /// fail (this reference implementation never fails the allocation;
    /// `None` here models only the policy gate, matching §4.3's "no-op
    /// unless the switch is ON and `count >= MINIMUM_SIZE/2`").
    #[must_use]
    pub fn create<V: Copy + Default, S: StringTable>(
        records: &[PropertyRecord<V>],
        table: &S,
        config: &Config,
    ) -> Option<Self> {
        if !config.hashmap_enabled {
            return None;
        }
        if !matches!(config.hashmap_alloc_state, crate::config::HashmapAllocState::On) {
            return None;
        }
        let live = records.iter().filter(|r| !r.is_deleted()).count();
        if (live as u32) < config.minimum_hashmap_size / 2 {
            return None;
        }

        // Smallest power of two so that at least a third of cells stay free.
        let mut bucket_count: usize = 8;
        while live * 3 >= bucket_count * 2 {
            bucket_count *= 2;
        }

        let mut map = Self {
            cells: vec![Cell::Clean; bucket_count],
            mask: (bucket_count - 1) as u64,
            property_count: 0,
            null_count: bucket_count as u32,
            unused_count: 0,
        };

        for (zero_based, record) in records.iter().enumerate() {
            if record.is_deleted() {
                continue;
            }
            let slot = SlotIndex::from_zero_based(zero_based);
            map.probe_insert(table, record.name(), slot);
        }

        Some(map)
    }

    /// Insert the freshly-created `new_slot` into the table.
    ///
    /// If the table's free-cell ratio has dropped below the rebuild
    /// threshold (`null_count < max/8`), this rebuilds the whole table
    /// from `records` instead (which already contains `new_slot`) and
    /// reports `true`; otherwise it does a single probe-insert and
    /// reports `false`.
    #[must_use]
    pub fn insert<V: Copy + Default, S: StringTable>(
        &mut self,
        records: &[PropertyRecord<V>],
        table: &S,
        new_slot: SlotIndex,
        config: &Config,
    ) -> bool {
        let max = self.bucket_count() as u32;
        if self.null_count < max / 8 {
            if let Some(rebuilt) = Self::create(records, table, config) {
                *self = rebuilt;
                return true;
            }
            // Rebuild was vetoed (e.g. `hashmap_alloc_state` flipped to
            // `Off` under memory pressure, §6): the table does not grow,
            // but `new_slot` must not be silently dropped from the
            // accelerator. Fall back to a single probe-insert into
            // whatever non-`Occupied` cells remain.
        }

        let name = records[new_slot.zero_based()].name();
        self.probe_insert(table, name, new_slot);
        false
    }

    /// Probe to the first non-`Occupied` cell and write `slot` there.
    fn probe_insert<S: StringTable>(&mut self, table: &S, name: StringHandle, slot: SlotIndex) {
        let hash = u64::from(table.hash(name));
        let step = PROBE_STEPS[(hash & (crate::config::N_STEPS - 1)) as usize];
        let mut entry = hash & self.mask;
        loop {
            match self.cells[entry as usize] {
                Cell::Clean => {
                    self.null_count -= 1;
                    self.cells[entry as usize] = Cell::Occupied(slot);
                    self.property_count += 1;
                    return;
                }
                Cell::Dirty => {
                    self.unused_count -= 1;
                    self.cells[entry as usize] = Cell::Occupied(slot);
                    self.property_count += 1;
                    return;
                }
                Cell::Occupied(_) => {
                    entry = (entry + step) & self.mask;
                }
            }
        }
    }

    /// Find the record named `name`, verifying the candidate at each
    /// occupied cell against `records` before accepting it (a hash
    /// collision is not a name match).
    #[must_use]
    pub fn find<V: Copy + Default, S: StringTable>(
        &self,
        records: &[PropertyRecord<V>],
        table: &S,
        name: StringHandle,
    ) -> Option<SlotIndex> {
        let hash = u64::from(table.hash(name));
        let step = PROBE_STEPS[(hash & (crate::config::N_STEPS - 1)) as usize];
        let mut entry = hash & self.mask;
        loop {
            match self.cells[entry as usize] {
                Cell::Clean => return None,
                Cell::Dirty => {
                    entry = (entry + step) & self.mask;
                }
                Cell::Occupied(slot) => {
                    let candidate = &records[slot.zero_based()];
                    if !candidate.is_deleted() && handles_equal(table, candidate.name(), name) {
                        return Some(slot);
                    }
                    entry = (entry + step) & self.mask;
                }
            }
        }
    }

    /// Tombstone the cell holding `name`, if present.
    #[must_use]
    pub fn delete<V: Copy + Default, S: StringTable>(
        &mut self,
        records: &[PropertyRecord<V>],
        table: &S,
        name: StringHandle,
    ) -> DeleteOutcome {
        let hash = u64::from(table.hash(name));
        let step = PROBE_STEPS[(hash & (crate::config::N_STEPS - 1)) as usize];
        let mut entry = hash & self.mask;
        loop {
            match self.cells[entry as usize] {
                Cell::Clean => return DeleteOutcome::NotFound,
                Cell::Dirty => {
                    entry = (entry + step) & self.mask;
                }
                Cell::Occupied(slot) => {
                    let candidate = &records[slot.zero_based()];
                    if !candidate.is_deleted() && handles_equal(table, candidate.name(), name) {
                        self.cells[entry as usize] = Cell::Dirty;
                        self.unused_count += 1;
                        self.property_count -= 1;
                        let max = self.bucket_count() as u32;
                        let rebuild = self.unused_count > (3 * max) / 4;
                        return DeleteOutcome::Deleted { rebuild };
                    }
                    entry = (entry + step) & self.mask;
                }
            }
        }
    }

    /// Debug-only consistency sweep (§4.3): every non-deleted record in
    /// `records` must be findable through this hashmap, and vice versa.
    /// Compiled out entirely in release builds.
    #[cfg(debug_assertions)]
    pub fn debug_check_consistency<V: Copy + Default, S: StringTable>(
        &self,
        records: &[PropertyRecord<V>],
        table: &S,
    ) {
        for record in records.iter().filter(|r| !r.is_deleted()) {
            debug_assert!(
                self.find(records, table, record.name()).is_some(),
                "property present in list but not reachable through hashmap"
            );
        }
    }
}
