// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! The property list: the authoritative per-object store (§4.2).
//!
//! A [`PropertyList`] owns a `Vec`-backed slab of [`PropertyRecord`]s plus
//! one of two accelerators, modeled as the discriminated
//! [`Accelerator`] enum the Design Notes ask for instead of the source
//! engine's `cache[0] == 0` sentinel overload: either a small
//! most-recently-used hint array, or an attached [`PropertyHashmap`]
//! once the list has grown past `minimum_hashmap_size`.
//!
//! Because slots are identified by a stable 1-based [`SlotIndex`] into a
//! `Vec` rather than a raw pointer into a slab that moves on every
//! reallocation, growing the list never invalidates an index already
//! held by the hashmap, the MRU hints, or the lookup cache — see the
//! same note in [`crate::hashmap`]. What *does* need care on every
//! structural change is keeping the lookup cache, the MRU hints and the
//! hashmap in agreement about which slots are live; that bookkeeping is
//! this module's job.

#[cfg(test)]
mod list_test;

#[cfg(any(test, feature = "std"))]
use std::vec::Vec;

#[cfg(not(any(test, feature = "std")))]
use alloc::vec::Vec;

use crate::config::{Config, HashmapAllocState};
use crate::context::Context;
use crate::error::DeleteOutcome;
use crate::error_ref::BytecodeRef;
use crate::hashmap::PropertyHashmap;
use crate::ids::{ObjectId, SlotIndex};
use crate::record::{PropertyKind, PropertyPayload, PropertyRecord, attr};
use crate::string_handle::{StringHandle, StringTable, handles_equal};

/// Widest MRU hint arity this crate supports (`K` is 2 or 3, per
/// [`crate::config::PointerWidth::mru_len`]); the array is always
/// allocated at this width and only the first `len` slots are live.
const MRU_MAX: usize = 3;

/// Whether a payload value is a heap object reference, needed only by
/// [`PropertyList::clone_declarative_environment`]'s copy-vs-share
/// decision (§4.2). Scalar value types (e.g. a test harness's `u64`)
/// can implement this as always returning `false`.
pub trait ValueClass: Copy {
    /// Whether this value transitively references a heap object, as
    /// opposed to an inline scalar.
    fn is_object(&self) -> bool;
}

/// The small per-list most-recently-used slot hint array.
#[derive(Debug, Clone, Copy)]
struct Mru {
    hints: [Option<SlotIndex>; MRU_MAX],
    len: usize,
}

impl Mru {
    const fn new(len: usize) -> Self {
        Self {
            hints: [None; MRU_MAX],
            len,
        }
    }

    /// Probe the live hints for a name match, verifying each candidate
    /// against `records` (a hint can go stale after a delete).
    fn probe<V: Copy + Default, S: StringTable>(
        &self,
        records: &[PropertyRecord<V>],
        table: &S,
        name: StringHandle,
    ) -> Option<SlotIndex> {
        self.hints[..self.len].iter().flatten().copied().find(|slot| {
            records
                .get(slot.zero_based())
                .is_some_and(|record| !record.is_deleted() && handles_equal(table, record.name(), name))
        })
    }

    /// Move `slot` to the front, dropping the least-recently-used entry
    /// if the array was already full (§4.2, step 5).
    fn touch(&mut self, slot: SlotIndex) {
        let mut next = [None; MRU_MAX];
        next[0] = Some(slot);
        let mut write = 1;
        for hint in self.hints[..self.len].iter().copied().flatten() {
            if hint != slot && write < self.len {
                next[write] = Some(hint);
                write += 1;
            }
        }
        self.hints = next;
    }

    /// Drop `slot` from the hints, if present (it was just deleted).
    fn forget(&mut self, slot: SlotIndex) {
        for hint in &mut self.hints[..self.len] {
            if *hint == Some(slot) {
                *hint = None;
            }
        }
    }
}

/// The list's structural accelerator: either the small MRU hint array,
/// or an attached hashmap. Mutually exclusive, per §3/§9.
#[derive(Debug)]
enum Accelerator {
    Mru(Mru),
    Hashmap(PropertyHashmap),
}

/// The authoritative per-object property store (§4.2).
///
/// Generic over `V`, the embedder's value representation (e.g. a
/// `lona-vm::value::Value`). This crate only requires `V: Copy +
/// Default`; `Default` stands in for the specification's `NULL`/
/// `Undefined` sentinel used for an uninitialized data value or an
/// absent getter/setter half.
#[derive(Debug)]
pub struct PropertyList<V> {
    records: Vec<PropertyRecord<V>>,
    accelerator: Accelerator,
}

impl<V: Copy + Default> PropertyList<V> {
    /// An empty list. The hashmap is never attached until the list
    /// actually grows past `config.minimum_hashmap_size` (§3's "created
    /// lazily on first property insertion" applies to the slab itself;
    /// the accelerator starts as plain MRU hints either way).
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            records: Vec::new(),
            accelerator: Accelerator::Mru(Mru::new(config.mru_len())),
        }
    }

    /// Total slab length, including tombstoned slots (the
    /// specification's list-header `count`, §3).
    #[inline]
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.records.len()
    }

    /// Number of live (non-deleted) properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.iter().filter(|r| !r.is_deleted()).count()
    }

    /// Whether the list has no live properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a hashmap accelerator is currently attached. Exposed for
    /// the debug counter in §8 scenario 3; meaningful in release builds
    /// too since the accelerator choice is a real structural property.
    #[inline]
    #[must_use]
    pub const fn has_hashmap(&self) -> bool {
        matches!(self.accelerator, Accelerator::Hashmap(_))
    }

    /// The live record at `slot`, or `None` if the slot is out of range
    /// or has been deleted.
    #[must_use]
    pub fn get(&self, slot: SlotIndex) -> Option<&PropertyRecord<V>> {
        self.records.get(slot.zero_based()).filter(|r| !r.is_deleted())
    }

    /// Mutable access to the live record at `slot`.
    #[must_use]
    pub fn get_mut(&mut self, slot: SlotIndex) -> Option<&mut PropertyRecord<V>> {
        self.records.get_mut(slot.zero_based()).filter(|r| !r.is_deleted())
    }

    /// Iterate live slots in slab (insertion) order. Own-property
    /// enumeration (§8 scenario 1) is this iterator further filtered by
    /// `is_enumerable()`.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = (SlotIndex, &PropertyRecord<V>)> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.is_deleted())
            .map(|(i, r)| (SlotIndex::from_zero_based(i), r))
    }

    /// Resolve `name` to a slot, per the §4.2 resolution protocol:
    /// lookup cache, then the attached hashmap or MRU hints, then a
    /// full linear scan; a hit anywhere re-primes the MRU hints and the
    /// lookup cache.
    pub fn find<S: StringTable>(
        &mut self,
        ctx: &mut Context,
        table: &S,
        object: ObjectId,
        name: StringHandle,
    ) -> Option<SlotIndex> {
        if ctx.config().lookup_cache_enabled {
            if let Some(slot) = ctx.lookup_cache().lookup(table, object, name) {
                if self.is_live_match(table, slot, name) {
                    return Some(slot);
                }
                // Stale entry (the owning record was deleted or
                // rewritten without going through this list, e.g. a
                // different list reused the same object id). The cache
                // is best-effort; fall through to the slow path rather
                // than trust it.
            }
        }

        let found = match &self.accelerator {
            Accelerator::Hashmap(map) => {
                let hit = map.find(&self.records, table, name);
                #[cfg(debug_assertions)]
                map.debug_check_consistency(&self.records, table);
                hit
            }
            Accelerator::Mru(mru) => mru.probe(&self.records, table, name).or_else(|| self.linear_scan(table, name)),
        };

        let Some(slot) = found else {
            return None;
        };

        if let Accelerator::Mru(mru) = &mut self.accelerator {
            mru.touch(slot);
        }
        if ctx.config().lookup_cache_enabled {
            self.insert_into_lookup_cache(ctx, table, object, name, slot);
        }
        Some(slot)
    }

    fn is_live_match<S: StringTable>(&self, table: &S, slot: SlotIndex, name: StringHandle) -> bool {
        self.records
            .get(slot.zero_based())
            .is_some_and(|record| !record.is_deleted() && record.get_name_type() == name.direct_type() && handles_equal(table, record.name(), name))
    }

    fn linear_scan<S: StringTable>(&self, table: &S, name: StringHandle) -> Option<SlotIndex> {
        self.records.iter().enumerate().find_map(|(i, record)| {
            (!record.is_deleted() && handles_equal(table, record.name(), name)).then(|| SlotIndex::from_zero_based(i))
        })
    }

    fn insert_into_lookup_cache<S: StringTable>(
        &mut self,
        ctx: &mut Context,
        table: &S,
        object: ObjectId,
        name: StringHandle,
        slot: SlotIndex,
    ) {
        let evicted = ctx.lookup_cache().insert(table, object, name, slot);
        if let Some(evicted) = evicted {
            if evicted.object == object {
                if let Some(record) = self.records.get_mut(evicted.slot.zero_based()) {
                    record.clear_lcached();
                }
                if let Accelerator::Mru(mru) = &mut self.accelerator {
                    mru.touch(evicted.slot);
                }
            }
        }
        if let Some(record) = self.records.get_mut(slot.zero_based()) {
            // This cache keys entries by `(object, name)` directly
            // rather than a packed `(object_cp << bits) | name_cp` id
            // matched back to a record pointer, so `lcache_id` carries
            // no information here; it is retained on the record purely
            // to mirror the specification's field (§3).
            record.set_lcached(0);
        }
    }

    /// Create a new slot with `name`/`kind`/`attrs`/`payload`, growing
    /// the slab by one. Never fails: the underlying allocation failure
    /// this crate's own `Vec` could hit is the same "fatal, abort the
    /// process" outcome §4.2 specifies for a mandatory allocation,
    /// delegated to the global allocator rather than modeled explicitly.
    pub fn create<S: StringTable>(
        &mut self,
        ctx: &mut Context,
        table: &S,
        name: StringHandle,
        kind: PropertyKind,
        attrs: u8,
        payload: PropertyPayload<V>,
    ) -> SlotIndex {
        self.records.push(PropertyRecord::new(kind, attrs, name, payload));
        let slot = SlotIndex::from_zero_based(self.records.len() - 1);

        match &mut self.accelerator {
            Accelerator::Hashmap(map) => {
                let _ = map.insert(&self.records, table, slot, ctx.config());
            }
            Accelerator::Mru(mru) => {
                mru.touch(slot);
                if self.should_attach_hashmap(ctx.config()) {
                    if let Some(map) = PropertyHashmap::create(&self.records, table, ctx.config()) {
                        self.accelerator = Accelerator::Hashmap(map);
                    }
                }
            }
        }

        slot
    }

    fn should_attach_hashmap(&self, config: &Config) -> bool {
        config.hashmap_enabled
            && matches!(config.hashmap_alloc_state, HashmapAllocState::On)
            && self.len() as u32 >= config.minimum_hashmap_size
    }

    /// Create a data property named `name`, or return `None` if one
    /// already exists (§4.2: "check absence"). Starts `writable` per
    /// `attrs`, with a `V::default()` ("Undefined") value.
    pub fn create_named_data<S: StringTable>(
        &mut self,
        ctx: &mut Context,
        table: &S,
        object: ObjectId,
        name: StringHandle,
        attrs: u8,
    ) -> Option<SlotIndex> {
        if self.find(ctx, table, object, name).is_some() {
            return None;
        }
        Some(self.create(ctx, table, name, PropertyKind::NamedData, attrs, PropertyPayload::Data(V::default())))
    }

    /// Create an accessor property named `name`, or return `None` if one
    /// already exists. `WRITABLE` is meaningless for an accessor and is
    /// masked off by [`PropertyRecord::new_accessor`]'s caller contract.
    pub fn create_named_accessor<S: StringTable>(
        &mut self,
        ctx: &mut Context,
        table: &S,
        object: ObjectId,
        name: StringHandle,
        getter: V,
        setter: V,
        attrs: u8,
    ) -> Option<SlotIndex> {
        if self.find(ctx, table, object, name).is_some() {
            return None;
        }
        Some(self.create(
            ctx,
            table,
            name,
            PropertyKind::NamedAccessor,
            attrs & !attr::WRITABLE,
            PropertyPayload::Accessor { getter, setter },
        ))
    }

    /// Release whatever side-resources `slot`'s payload holds and clear
    /// its lookup-cache presence, without removing it from the slab
    /// (§4.2). `bytecode` is consulted only when the payload is an
    /// `Internal` property carrying a compiled-function reference;
    /// pass `None` when the payload never holds one.
    pub fn free_property<S: StringTable>(
        &mut self,
        ctx: &mut Context,
        table: &S,
        object: ObjectId,
        slot: SlotIndex,
        bytecode: Option<&dyn BytecodeRef>,
    ) {
        let Some(record) = self.records.get_mut(slot.zero_based()) else {
            return;
        };

        if let (PropertyPayload::Internal(chunk), Some(bytecode)) = (record.payload(), bytecode) {
            bytecode.dec_ref(*chunk);
        }

        if record.is_lcached() {
            let name = record.name();
            record.clear_lcached();
            if ctx.config().lookup_cache_enabled {
                ctx.lookup_cache().invalidate(table, object, name);
            }
        }
    }

    /// Delete `slot`: free its payload, mark it a tombstone, remove it
    /// from the hashmap (rebuilding if the tombstone ratio crossed the
    /// threshold), and drop it from the MRU hints.
    pub fn delete<S: StringTable>(
        &mut self,
        ctx: &mut Context,
        table: &S,
        object: ObjectId,
        slot: SlotIndex,
        bytecode: Option<&dyn BytecodeRef>,
    ) {
        let Some(name) = self.get(slot).map(PropertyRecord::name) else {
            return;
        };

        self.free_property(ctx, table, object, slot, bytecode);

        // The hashmap's `delete` must probe for the cell while the
        // record is still live: it only tombstones a cell whose
        // candidate record is not already deleted (`hashmap.rs`), so
        // marking the slot deleted first would make every probe miss
        // and leave a stale `Occupied` cell behind.
        let rebuild = match &mut self.accelerator {
            Accelerator::Hashmap(map) => {
                matches!(map.delete(&self.records, table, name), DeleteOutcome::Deleted { rebuild: true })
            }
            Accelerator::Mru(mru) => {
                mru.forget(slot);
                false
            }
        };

        if let Some(record) = self.records.get_mut(slot.zero_based()) {
            record.mark_deleted();
        }

        if rebuild {
            self.rebuild_hashmap(table, ctx.config());
        }
    }

    fn rebuild_hashmap<S: StringTable>(&mut self, table: &S, config: &Config) {
        self.accelerator = PropertyHashmap::create(&self.records, table, config)
            .map_or_else(|| Accelerator::Mru(Mru::new(config.mru_len())), Accelerator::Hashmap);
    }
}

impl<V: Copy + Default + ValueClass> PropertyList<V> {
    /// Snapshot this list into a fresh one with the same names and
    /// attributes (§4.2), used to clone a declarative scope.
    ///
    /// Non-object values are always copied; object-valued properties
    /// are shared (their handle is copied, same as any other `Copy`
    /// value — sharing vs. duplication is a GC-level distinction this
    /// crate has no visibility into) only when `copy_values` is `true`,
    /// and left at `V::default()` otherwise. Tombstones are dropped
    /// rather than carried into the new list.
    #[must_use]
    pub fn clone_declarative_environment<S: StringTable>(&self, table: &S, config: &Config, copy_values: bool) -> Self {
        let records: Vec<PropertyRecord<V>> = self
            .records
            .iter()
            .filter(|r| !r.is_deleted())
            .map(|record| {
                let mut attrs = 0u8;
                if record.is_writable() {
                    attrs |= attr::WRITABLE;
                }
                if record.is_enumerable() {
                    attrs |= attr::ENUMERABLE;
                }
                if record.is_configurable() {
                    attrs |= attr::CONFIGURABLE;
                }
                let payload = clone_payload(record.payload(), copy_values);
                PropertyRecord::new(record.get_type(), attrs, record.name(), payload)
            })
            .collect();

        let accelerator = if config.hashmap_enabled
            && matches!(config.hashmap_alloc_state, HashmapAllocState::On)
            && records.iter().filter(|r| !r.is_deleted()).count() as u32 >= config.minimum_hashmap_size
        {
            PropertyHashmap::create(&records, table, config)
                .map_or_else(|| Accelerator::Mru(Mru::new(config.mru_len())), Accelerator::Hashmap)
        } else {
            Accelerator::Mru(Mru::new(config.mru_len()))
        };

        Self { records, accelerator }
    }
}

fn clone_payload<V: Copy + Default + ValueClass>(payload: &PropertyPayload<V>, copy_values: bool) -> PropertyPayload<V> {
    let keep_or_default = |v: V| if !copy_values && v.is_object() { V::default() } else { v };
    match *payload {
        PropertyPayload::Data(v) => PropertyPayload::Data(keep_or_default(v)),
        PropertyPayload::Accessor { getter, setter } => PropertyPayload::Accessor {
            getter: keep_or_default(getter),
            setter: keep_or_default(setter),
        },
        PropertyPayload::Internal(v) => PropertyPayload::Internal(v),
        PropertyPayload::Virtual(v) => PropertyPayload::Virtual(v),
        PropertyPayload::Special(v) => PropertyPayload::Special(v),
        PropertyPayload::Deleted => PropertyPayload::Deleted,
    }
}
