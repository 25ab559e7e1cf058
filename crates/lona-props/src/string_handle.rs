// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! String handles: opaque references to interned property names.
//!
//! This core never looks inside a string; it only ever hashes, compares,
//! or asks whether a handle is "direct" (small enough to skip the heap
//! entirely) via the [`StringTable`] trait. Production callers plug in
//! their own intern table; [`MemStringTable`] is a reference
//! implementation used by this crate's own tests, grounded in the
//! `len + UTF-8 bytes` heap string layout `lona-vm::heap` already uses.

#[cfg(test)]
mod string_handle_test;

use lona_abi::types::Vaddr;

#[cfg(any(test, feature = "std"))]
use std::{string::String, vec::Vec};

#[cfg(not(any(test, feature = "std")))]
use alloc::{string::String, vec::Vec};

/// Number of distinct direct-string tags, matching the 3 name-type bits
/// reserved in `type_flags` (§3).
pub const DIRECT_TAG_BITS: u32 = 3;

/// An opaque reference to a property name.
///
/// Either a *direct string* — a small tag plus an inline integer payload,
/// avoiding a heap string record entirely — or an *indirect string*,
/// referencing a heap string via a [`Vaddr`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StringHandle {
    /// Tag is nonzero (1..=7); payload is an inline integer (e.g. a
    /// small interned keyword id or single-character symbol code).
    Direct { tag: u8, value: u32 },
    /// Heap string record address. Tag is implicitly 0 ("indirect").
    Indirect(Vaddr),
}

impl StringHandle {
    /// Whether this handle is a direct string (name-type tag nonzero).
    #[inline]
    #[must_use]
    pub const fn is_direct(self) -> bool {
        matches!(self, Self::Direct { .. })
    }

    /// The name-type tag: 0 for indirect, 1..=7 for direct.
    #[inline]
    #[must_use]
    pub const fn direct_type(self) -> u8 {
        match self {
            Self::Direct { tag, .. } => tag,
            Self::Indirect(_) => 0,
        }
    }

    /// The direct payload, or 0 for an indirect handle.
    #[inline]
    #[must_use]
    pub const fn direct_value(self) -> u32 {
        match self {
            Self::Direct { value, .. } => value,
            Self::Indirect(_) => 0,
        }
    }
}

/// Hashing, equality, and tagging operations over [`StringHandle`]s.
///
/// Implementors own the actual intern table; this crate only asks for
/// the four operations the specification requires (§3).
pub trait StringTable {
    /// `hash(name) -> u32`, used by the property hashmap's probe sequence.
    fn hash(&self, name: StringHandle) -> u32;

    /// Deep comparison for two indirect handles. Direct handles are
    /// compared by `(tag, value)` without consulting the table at all;
    /// this is only invoked by the "general path" (§4.2) when both
    /// handles are indirect.
    fn equal_nondirect(&self, a: StringHandle, b: StringHandle) -> bool;

    /// Whether `name` is a direct string. Provided for symmetry with the
    /// specification's operation list; defers to [`StringHandle::is_direct`].
    fn is_direct(&self, name: StringHandle) -> bool {
        name.is_direct()
    }

    /// The name-type tag of `name`. Defers to [`StringHandle::direct_type`].
    fn direct_type(&self, name: StringHandle) -> u8 {
        name.direct_type()
    }

    /// The direct payload of `name`. Defers to [`StringHandle::direct_value`].
    fn direct_value(&self, name: StringHandle) -> u32 {
        name.direct_value()
    }
}

/// Full equality between two handles, consulting the table only when
/// both are indirect (the "general path" comparison described in §4.2).
#[must_use]
pub fn handles_equal<T: StringTable>(table: &T, a: StringHandle, b: StringHandle) -> bool {
    match (a, b) {
        (StringHandle::Direct { tag: ta, value: va }, StringHandle::Direct { tag: tb, value: vb }) => {
            ta == tb && va == vb
        }
        (StringHandle::Indirect(_), StringHandle::Indirect(_)) => table.equal_nondirect(a, b),
        _ => false,
    }
}

/// A simple in-memory intern table, used by this crate's own tests and
/// suitable as a starting point for a host embedding without its own
/// interner.
///
/// Strings are stored contiguously in a `Vec<String>`; the indirect
/// handle's `Vaddr` encodes the index (not a real heap address — callers
/// needing the real layout described in `lona-vm::heap` should intern
/// through their own table instead).
#[derive(Debug, Default)]
pub struct MemStringTable {
    strings: Vec<String>,
}

impl MemStringTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self { strings: Vec::new() }
    }

    /// Intern `s`, returning an indirect handle. Interning the same
    /// contents twice returns distinct handles (this reference table
    /// does not deduplicate); callers that need physical-address
    /// equality to imply content equality should dedupe themselves.
    pub fn intern(&mut self, s: &str) -> StringHandle {
        let index = self.strings.len();
        self.strings.push(String::from(s));
        StringHandle::Indirect(Vaddr::new(index as u64))
    }

    /// Build a direct handle for a small integer payload under `tag`
    /// (1..=7). Returns `None` for `tag == 0`, which is reserved for
    /// indirect strings.
    #[must_use]
    pub const fn direct(tag: u8, value: u32) -> Option<StringHandle> {
        if tag == 0 || tag > 7 {
            return None;
        }
        Some(StringHandle::Direct { tag, value })
    }

    /// Read back the contents of an indirect handle.
    #[must_use]
    pub fn resolve(&self, handle: StringHandle) -> Option<&str> {
        match handle {
            StringHandle::Indirect(addr) => {
                self.strings.get(addr.as_u64() as usize).map(String::as_str)
            }
            StringHandle::Direct { .. } => None,
        }
    }
}

impl StringTable for MemStringTable {
    fn hash(&self, name: StringHandle) -> u32 {
        match name {
            StringHandle::Direct { tag, value } => {
                // Mix the tag into the hash so two direct tags with the
                // same payload don't collide identically with an
                // indirect string's FNV hash.
                fnv1a(&[tag]) ^ value.rotate_left(7)
            }
            StringHandle::Indirect(addr) => {
                let index = addr.as_u64() as usize;
                self.strings
                    .get(index)
                    .map_or(0, |s| fnv1a(s.as_bytes()))
            }
        }
    }

    fn equal_nondirect(&self, a: StringHandle, b: StringHandle) -> bool {
        match (a, b) {
            (StringHandle::Indirect(ia), StringHandle::Indirect(ib)) => {
                if ia == ib {
                    return true;
                }
                match (self.resolve(a), self.resolve(b)) {
                    (Some(sa), Some(sb)) => sa == sb,
                    _ => false,
                }
            }
            _ => false,
        }
    }
}

/// FNV-1a, chosen for the same reason `lona-vm` avoids pulling in a hash
/// crate for small fixed-size keys: it is a handful of lines, has no
/// dependency, and is adequate for a probe-sequence hash (the probe step
/// table in [`crate::config::PROBE_STEPS`] is what actually prevents
/// clustering, not the hash function's own distribution).
#[must_use]
pub fn fnv1a(bytes: &[u8]) -> u32 {
    const OFFSET_BASIS: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;
    let mut hash = OFFSET_BASIS;
    for &b in bytes {
        hash ^= u32::from(b);
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}
