// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Runtime configuration for the property storage core.
//!
//! Every entry point in this crate takes a [`Config`] (or a [`Context`]
//! wrapping one) instead of consulting `cfg!` switches or hidden globals.
//! This matches the Design Notes' guidance: the wide/narrow compact
//! pointer choice, the hashmap/lookup-cache on/off switches, and the
//! sizing constants are all values threaded through the call, not
//! compile-time configuration.
//!
//! [`Context`]: crate::context::Context

/// Width of the compact pointer encoding used by a [`Context`](crate::context::Context).
///
/// `Narrow16` trades addressable range for a smaller [`PropertyRecord`]
/// and a smaller MRU cache (`K = 2`); `Wide32` gives `K = 3` and stores
/// accessor pairs inline instead of behind an indirect allocation.
///
/// [`PropertyRecord`]: crate::record::PropertyRecord
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerWidth {
    /// 16-bit compact pointers, allocation-granularity shifted.
    Narrow16,
    /// 32-bit compact pointers, unshifted.
    Wide32,
}

impl PointerWidth {
    /// Size of the per-list MRU cache (`K` in the specification).
    #[inline]
    #[must_use]
    pub const fn mru_len(self) -> usize {
        match self {
            Self::Narrow16 => 2,
            Self::Wide32 => 3,
        }
    }

    /// Whether accessor (getter, setter) pairs are stored inline in the
    /// record or indirected behind a small pooled allocation.
    #[inline]
    #[must_use]
    pub const fn accessors_inline(self) -> bool {
        matches!(self, Self::Wide32)
    }
}

/// Host-controlled switch for whether the hashmap accelerator (§4.3) may
/// grow. The host can flip this to `Off` under memory pressure; existing
/// hashmaps are left in place but no new ones are created and none are
/// rebuilt until it is `On` again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HashmapAllocState {
    /// Hashmap creation and rebuild are permitted.
    On,
    /// Hashmap creation and rebuild are suppressed; lists fall back to
    /// MRU cache + linear scan even past `minimum_hashmap_size`.
    Off,
}

/// Process-wide configuration for the property storage core.
///
/// A `Config` is cheap to copy and is expected to be created once per
/// [`Context`](crate::context::Context) and left unchanged for the
/// context's lifetime; none of the operations in this crate mutate it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Whether the property hashmap (§4.3) may be attached to a list at all.
    pub hashmap_enabled: bool,
    /// Whether the process-wide lookup cache (§4.4) is active.
    pub lookup_cache_enabled: bool,
    /// Compact pointer width, see [`PointerWidth`].
    pub pointer_width: PointerWidth,
    /// List size at which a hashmap is created (nominally 32).
    pub minimum_hashmap_size: u32,
    /// Number of rows in the lookup cache.
    pub lookup_cache_rows: u32,
    /// Number of entries per lookup cache row.
    pub lookup_cache_row_len: u32,
    /// Whether hashmap growth is currently permitted.
    pub hashmap_alloc_state: HashmapAllocState,
}

impl Config {
    /// Default configuration: every accelerator enabled, 32-bit compact
    /// pointers, `minimum_hashmap_size = 32`, and a modest lookup cache.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            hashmap_enabled: true,
            lookup_cache_enabled: true,
            pointer_width: PointerWidth::Wide32,
            minimum_hashmap_size: MINIMUM_HASHMAP_SIZE_DEFAULT,
            lookup_cache_rows: 64,
            lookup_cache_row_len: 8,
            hashmap_alloc_state: HashmapAllocState::On,
        }
    }

    /// `K`, the MRU cache arity implied by this configuration's pointer width.
    #[inline]
    #[must_use]
    pub const fn mru_len(&self) -> usize {
        self.pointer_width.mru_len()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Default `minimum_hashmap_size`, per §3/§6.
pub const MINIMUM_HASHMAP_SIZE_DEFAULT: u32 = 32;

/// Probe-step table for the property hashmap (§4.3).
///
/// Each entry is coprime with every power-of-two bucket count, so a
/// probe sequence visits every cell exactly once before repeating
/// (§8, *Probe termination*).
pub const PROBE_STEPS: [u64; 8] = [3, 5, 7, 11, 13, 17, 19, 23];

/// Sentinel bucket-count divisor. With `PROBE_STEPS` pinned at 8 entries,
/// the step index is `hash & (N_STEPS - 1)`.
pub const N_STEPS: u64 = PROBE_STEPS.len() as u64;
