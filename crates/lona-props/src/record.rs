// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! The property record: one slot in a [`PropertyList`](crate::list::PropertyList).
//!
//! The specification packs kind, attributes, and the name's type tag
//! into a single `type_flags` byte to save space under compressed
//! pointers. Per the Design Notes' guidance on the list header's own
//! dual-use `cache[0]` field ("prefer an explicit discriminated variant
//! ... rather than bit-budget overloading"), this implementation applies
//! the same preference one level down: `kind` and `attrs` are separate
//! fields, and the name-type tag is read straight off the
//! [`StringHandle`] rather than mirrored into a second location. The
//! record is still small and `Copy`; nothing here costs more than the
//! packed original, it is just harder to desynchronize.

#[cfg(test)]
mod record_test;

use crate::string_handle::StringHandle;

/// Attribute bits, shared by [`PropertyRecord::attrs`].
pub mod attr {
    /// Property may have its kind/attributes changed or be deleted.
    pub const CONFIGURABLE: u8 = 0x01;
    /// Property is visited by `for`-style enumeration.
    pub const ENUMERABLE: u8 = 0x02;
    /// Property's value may be reassigned (data properties only).
    pub const WRITABLE: u8 = 0x04;
    /// An entry for this record currently exists in the lookup cache.
    pub const LCACHED: u8 = 0x08;
}

/// The kind of a property, mirroring the `type_flags` kind bits (§3).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum PropertyKind {
    /// A plain data property: a stored value.
    NamedData = 0,
    /// An accessor property: a (getter, setter) pair.
    NamedAccessor = 1,
    /// An engine-private property carrying an opaque payload.
    Internal = 2,
    /// A read-only, computed view; cannot be assigned.
    Virtual = 3,
    /// Reserved for engine-special slots (distinct from `Internal` so
    /// callers can tell the two apart without inspecting the payload).
    Special = 4,
    /// A tombstone: the slot's storage is retained but logically gone.
    Deleted = 5,
}

/// The record's payload, shaped by its [`PropertyKind`].
///
/// Generic over `V`, the embedder's value type (e.g. `lona-vm::Value`).
/// This crate only needs `V` to be `Copy` and to have a "null" sentinel
/// ([`Default`]) representing an absent getter/setter or an
/// uninitialized data value — it never inspects `V` otherwise.
#[derive(Clone, Copy, Debug)]
pub enum PropertyPayload<V> {
    /// Stored value of a data property.
    Data(V),
    /// Getter/setter pair of an accessor property. Either half may be
    /// `V::default()` ("NULL") if that half is absent.
    Accessor {
        /// Getter callable, or `V::default()` if absent.
        getter: V,
        /// Setter callable, or `V::default()` if absent.
        setter: V,
    },
    /// Engine-private payload (e.g. a native-pointer bag).
    Internal(u64),
    /// Computed-view identifier; the interpreter resolves this to an
    /// actual value. Storage-only, never written through.
    Virtual(u32),
    /// Engine-special payload, distinct from `Internal`.
    Special(u64),
    /// Tombstone: no payload.
    Deleted,
}

/// One slot in a property list.
///
/// Small and `Copy` by design — lists are Vec-backed slabs of these, and
/// the MRU cache, hashmap, and lookup cache all refer to a slot by
/// index rather than holding a reference into the slab, because the
/// slab is reallocated on every `create` (§4.2).
#[derive(Clone, Copy, Debug)]
pub struct PropertyRecord<V> {
    kind: PropertyKind,
    attrs: u8,
    name: StringHandle,
    /// Opaque id the lookup cache uses to find its own entry for this
    /// record without scanning every row. Meaningless unless
    /// `attr::LCACHED` is set.
    pub(crate) lcache_id: u16,
    payload: PropertyPayload<V>,
}

impl<V: Copy + Default> PropertyRecord<V> {
    /// Construct a new, non-deleted record. `lcache_id` starts at 0
    /// (unused) since a freshly created record cannot yet be cached.
    #[must_use]
    pub const fn new(kind: PropertyKind, attrs: u8, name: StringHandle, payload: PropertyPayload<V>) -> Self {
        Self {
            kind,
            attrs,
            name,
            lcache_id: 0,
            payload,
        }
    }

    /// A data property with value `V::default()` and the given attributes.
    #[must_use]
    pub fn new_data(name: StringHandle, value: V, attrs: u8) -> Self {
        Self::new(PropertyKind::NamedData, attrs, name, PropertyPayload::Data(value))
    }

    /// An accessor property. `configurable`/`enumerable` apply;
    /// `attr::WRITABLE` is meaningless here and is masked off.
    #[must_use]
    pub fn new_accessor(name: StringHandle, getter: V, setter: V, attrs: u8) -> Self {
        Self::new(
            PropertyKind::NamedAccessor,
            attrs & !attr::WRITABLE,
            name,
            PropertyPayload::Accessor { getter, setter },
        )
    }

    /// The property's kind.
    #[inline]
    #[must_use]
    pub const fn get_type(&self) -> PropertyKind {
        self.kind
    }

    /// The name-type tag mirrored from this record's [`StringHandle`].
    #[inline]
    #[must_use]
    pub const fn get_name_type(&self) -> u8 {
        self.name.direct_type()
    }

    /// The property's name handle.
    #[inline]
    #[must_use]
    pub const fn name(&self) -> StringHandle {
        self.name
    }

    /// The raw attribute byte (for the hashmap/list's own bookkeeping).
    #[inline]
    #[must_use]
    pub(crate) const fn attrs(&self) -> u8 {
        self.attrs
    }

    /// The property's payload.
    #[inline]
    #[must_use]
    pub const fn payload(&self) -> &PropertyPayload<V> {
        &self.payload
    }

    /// Whether the value may be reassigned. Always `false` for anything
    /// other than `NamedData` — the bit is meaningless elsewhere, per §4.1.
    #[inline]
    #[must_use]
    pub const fn is_writable(&self) -> bool {
        matches!(self.kind, PropertyKind::NamedData) && self.attrs & attr::WRITABLE != 0
    }

    /// Whether the property is visited during enumeration.
    #[inline]
    #[must_use]
    pub const fn is_enumerable(&self) -> bool {
        self.attrs & attr::ENUMERABLE != 0
    }

    /// Whether the property's kind/attributes may change or it may be deleted.
    #[inline]
    #[must_use]
    pub const fn is_configurable(&self) -> bool {
        self.attrs & attr::CONFIGURABLE != 0
    }

    /// Whether a lookup-cache entry currently references this slot.
    #[inline]
    #[must_use]
    pub const fn is_lcached(&self) -> bool {
        self.attrs & attr::LCACHED != 0
    }

    /// Set the writable attribute. A no-op call (same value twice) is
    /// idempotent, per §8. Calling this on a non-`NamedData` property is
    /// a caller bug: debug builds assert, release builds silently do
    /// nothing (the bit has no effect on anything since `is_writable`
    /// always checks the kind too).
    pub fn set_writable(&mut self, value: bool) {
        debug_assert!(
            matches!(self.kind, PropertyKind::NamedData),
            "writable only applies to NamedData properties"
        );
        set_bit(&mut self.attrs, attr::WRITABLE, value);
    }

    /// Set the enumerable attribute.
    pub fn set_enumerable(&mut self, value: bool) {
        set_bit(&mut self.attrs, attr::ENUMERABLE, value);
    }

    /// Set the configurable attribute.
    pub fn set_configurable(&mut self, value: bool) {
        set_bit(&mut self.attrs, attr::CONFIGURABLE, value);
    }

    /// Set the lookup-cache presence bit and remember the cache's own id
    /// for this slot. Crate-internal: only [`crate::lookup_cache::LookupCache`]
    /// and [`crate::list::PropertyList`] may call this.
    pub(crate) fn set_lcached(&mut self, lcache_id: u16) {
        self.lcache_id = lcache_id;
        set_bit(&mut self.attrs, attr::LCACHED, true);
    }

    /// Clear the lookup-cache presence bit.
    pub(crate) fn clear_lcached(&mut self) {
        set_bit(&mut self.attrs, attr::LCACHED, false);
    }

    /// Overwrite a data property's stored value. A logic error to call
    /// on anything but `NamedData`.
    pub fn set_value(&mut self, value: V) {
        debug_assert!(
            matches!(self.kind, PropertyKind::NamedData),
            "set_value only applies to NamedData properties"
        );
        if let PropertyPayload::Data(slot) = &mut self.payload {
            *slot = value;
        }
    }

    /// Replace the getter half of an accessor pair. A logic error to
    /// call on anything but `NamedAccessor`.
    pub fn set_getter(&mut self, getter: V) {
        debug_assert!(
            matches!(self.kind, PropertyKind::NamedAccessor),
            "set_getter only applies to NamedAccessor properties"
        );
        if let PropertyPayload::Accessor { getter: slot, .. } = &mut self.payload {
            *slot = getter;
        }
    }

    /// Replace the setter half of an accessor pair. A logic error to
    /// call on anything but `NamedAccessor`.
    pub fn set_setter(&mut self, setter: V) {
        debug_assert!(
            matches!(self.kind, PropertyKind::NamedAccessor),
            "set_setter only applies to NamedAccessor properties"
        );
        if let PropertyPayload::Accessor { setter: slot, .. } = &mut self.payload {
            *slot = setter;
        }
    }

    /// Mark this record as deleted: `kind = Deleted`, payload dropped.
    /// Storage is retained (per §3's lifecycle note) — the slot stays in
    /// the slab at the same index.
    pub(crate) fn mark_deleted(&mut self) {
        self.kind = PropertyKind::Deleted;
        self.payload = PropertyPayload::Deleted;
        self.attrs = 0;
    }

    /// Whether this slot has been deleted (a tombstone).
    #[inline]
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        matches!(self.kind, PropertyKind::Deleted)
    }
}

fn set_bit(byte: &mut u8, mask: u8, value: bool) {
    if value {
        *byte |= mask;
    } else {
        *byte &= !mask;
    }
}
