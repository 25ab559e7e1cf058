// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Error taxonomy for the property storage core (§7).
//!
//! Recoverable conditions (hashmap/lookup-cache OOM, not-found) are
//! plain `Option`s throughout this crate and never reach this module.
//! What lands here is only the handful of conditions the specification
//! calls fatal: a mandatory allocation failing, or a reference count
//! saturating. `lona-vm` has no error-handling crate anywhere in its
//! dependency graph (no `thiserror`, no `anyhow`) and instead threads
//! `Option` and, for truly unrecoverable conditions, panics from its
//! `std`-only mock platform; this module follows the same shape for the
//! `no_std` case, via an overridable abort hook instead of a panic.

/// A fatal, unrecoverable condition (§7).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fatal {
    /// A mandatory allocation (the property-list slab itself) failed.
    OutOfMemory,
    /// A 16-bit saturating reference count reached its maximum.
    RefCountLimit,
}

impl Fatal {
    /// A short, static description, suitable for a single UART line in
    /// a `no_std` build with no formatting machinery available.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::OutOfMemory => "lona-props: fatal out of memory",
            Self::RefCountLimit => "lona-props: fatal reference count limit reached",
        }
    }
}

/// Abort the current operation for a fatal reason.
///
/// Under `std` (including tests) this panics, which is the conventional
/// "crash loudly" behavior for a host-side embedding. Under `no_std`
/// without `std`, there is no unwinding machinery (the workspace builds
/// with `panic = "abort"`), so this spins forever after the caller has
/// had a chance to observe `Fatal::message` — a host integrating this
/// crate into `lona-vm` is expected to instead report the message via
/// `lona-vm::uart` before reaching this point, matching how other fatal
/// paths in that crate behave.
#[cold]
pub fn abort(reason: Fatal) -> ! {
    #[cfg(any(test, feature = "std"))]
    {
        panic!("{}", reason.message());
    }
    #[cfg(not(any(test, feature = "std")))]
    {
        let _ = reason;
        loop {
            core::hint::spin_loop();
        }
    }
}

/// Outcome of [`PropertyHashmap::delete`](crate::hashmap::PropertyHashmap::delete).
///
/// The specification notes a suspected bug in the source engine: one
/// code path returns a generic "has hashmap" status even when the
/// probed bucket was never found, making "not in hashmap" and "found
/// and removed" indistinguishable to the caller. Rather than reproduce
/// that ambiguity, `Deleted`/`NotFound` are both reported here — but
/// per the specification's own resolution, *callers must not branch on
/// the difference*; the only action either variant implies is "check
/// `rebuild`".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The entry was found and tombstoned.
    Deleted {
        /// Whether the caller should rebuild the hashmap now
        /// (`unused_count > 3 * max / 4`).
        rebuild: bool,
    },
    /// No matching entry was probed before a `CLEAN` cell was reached.
    NotFound,
    /// No hashmap is attached to the list at all.
    NoHashmap,
}
