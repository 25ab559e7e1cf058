// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Compact pointers: small-integer encodings of heap addresses.
//!
//! A compact pointer trades addressable range for a smaller per-slot
//! footprint, the same trade `lona-abi`'s `Vaddr`/`Paddr` newtypes make
//! for full 64-bit addresses, just one step further. Encoding and
//! decoding are pure functions of a base address held by the caller
//! (typically a [`Context`](crate::context::Context)); this module does
//! not allocate or own memory itself.

#[cfg(test)]
mod ptr_test;

use lona_abi::types::Vaddr;

/// Shared behavior of the narrow and wide compact pointer encodings.
///
/// Both encodings guarantee: `decode(encode(base, addr), base) == addr`
/// for any `addr` the encoding can represent, and a dedicated `NULL`
/// value that never aliases a valid encoded address.
pub trait CompactPointer: Copy + Eq + Default {
    /// The designated null value. `Self::default()` must equal this.
    const NULL: Self;

    /// Encode `addr` relative to `base`. Returns `None` if `addr` is not
    /// representable (out of range, or misaligned for `Narrow16`).
    fn encode(base: Vaddr, addr: Vaddr) -> Option<Self>;

    /// Decode back to a full virtual address relative to `base`.
    ///
    /// Calling this on [`Self::NULL`] is a logic error in the caller;
    /// implementations return `Vaddr::null()` rather than panicking,
    /// matching the "NULL tolerant" allocation contract in §5.
    fn decode(self, base: Vaddr) -> Vaddr;

    /// Whether this value is the null compact pointer.
    fn is_null(self) -> bool {
        self == Self::NULL
    }
}

/// 16-bit compact pointer, allocation-granularity shifted.
///
/// `addr` must be aligned to [`GRANULARITY`] bytes; the low bits are
/// dropped on encode and restored as zero on decode. This halves the
/// per-slot footprint at the cost of requiring every heap allocation
/// this pointer can reference to be `GRANULARITY`-aligned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct CompactPtr16(u16);

/// Allocation granularity assumed by [`CompactPtr16`], in bytes.
pub const GRANULARITY: u64 = 8;

impl CompactPtr16 {
    /// Raw stored value (shifted), for diagnostics and the lookup-cache id.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl Default for CompactPtr16 {
    fn default() -> Self {
        Self::NULL
    }
}

impl CompactPointer for CompactPtr16 {
    const NULL: Self = Self(0);

    fn encode(base: Vaddr, addr: Vaddr) -> Option<Self> {
        if addr.is_null() {
            return Some(Self::NULL);
        }
        if addr < base {
            return None;
        }
        let offset = addr.diff(base);
        if offset % GRANULARITY != 0 {
            return None;
        }
        let shifted = offset / GRANULARITY;
        // Reserve 0 for NULL: a real offset of 0 is encoded as 0, which
        // collides with NULL. Shift the whole range by one unit so the
        // base address itself is representable without aliasing NULL.
        let biased = shifted.checked_add(1)?;
        u16::try_from(biased).ok().map(Self)
    }

    fn decode(self, base: Vaddr) -> Vaddr {
        if self.is_null() {
            return Vaddr::null();
        }
        let shifted = u64::from(self.0) - 1;
        base.add(shifted * GRANULARITY)
    }
}

/// 32-bit compact pointer, a direct (unshifted) truncation of the offset
/// from `base`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct CompactPtr32(u32);

impl CompactPtr32 {
    /// Raw stored value, for diagnostics and the lookup-cache id.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl Default for CompactPtr32 {
    fn default() -> Self {
        Self::NULL
    }
}

impl CompactPointer for CompactPtr32 {
    const NULL: Self = Self(0);

    fn encode(base: Vaddr, addr: Vaddr) -> Option<Self> {
        if addr.is_null() {
            return Some(Self::NULL);
        }
        if addr < base {
            return None;
        }
        let offset = addr.diff(base);
        let biased = offset.checked_add(1)?;
        u32::try_from(biased).ok().map(Self)
    }

    fn decode(self, base: Vaddr) -> Vaddr {
        if self.is_null() {
            return Vaddr::null();
        }
        let offset = u64::from(self.0) - 1;
        base.add(offset)
    }
}
