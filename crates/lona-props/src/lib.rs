// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! # Lona Properties
//!
//! Property storage and lookup core for Lonala heap objects.
//!
//! This crate provides:
//! - Compact pointer encodings for compressed heap references
//! - String handle hashing/equality over an opaque, embedder-supplied
//!   intern table
//! - The property record and its attribute bits (configurable,
//!   enumerable, writable, lookup-cache presence)
//! - The property list: the authoritative per-object store of named
//!   data, accessor, and internal properties
//! - The property hashmap: an open-addressed accelerator attached to a
//!   list once it grows past a configurable threshold
//! - The process-wide lookup cache: a direct-mapped `(object, name) ->
//!   slot` shortcut shared by every object in one [`Context`]
//!
//! Every entry point takes an explicit [`Config`] (via [`Context`])
//! rather than consulting compile-time switches or a hidden singleton;
//! two engine instances in the same process each get their own
//! `Context` and never share state.
//!
//! Out of scope: the bytecode interpreter, the garbage collector, the
//! string interning subsystem itself (only the [`StringTable`] seam is
//! consumed), and the memory allocator. Getter/setter invocation,
//! namespace-chain walking, and full Lonala value semantics belong to
//! the interpreter layer above this crate.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[cfg(any(test, feature = "std"))]
extern crate std;

#[cfg(not(any(test, feature = "std")))]
extern crate alloc;

pub mod config;
pub mod context;
pub mod error;
pub mod error_ref;
pub mod hashmap;
pub mod ids;
pub mod list;
pub mod lookup_cache;
pub mod ptr;
pub mod record;
pub mod string_handle;

// Re-export commonly used types at crate root
pub use config::{Config, HashmapAllocState, PointerWidth};
pub use context::Context;
pub use error::{DeleteOutcome, Fatal};
pub use error_ref::{BytecodeRef, ErrorRef};
pub use hashmap::PropertyHashmap;
pub use ids::{ObjectId, SlotIndex};
pub use list::{PropertyList, ValueClass};
pub use lookup_cache::LookupCache;
pub use ptr::{CompactPointer, CompactPtr16, CompactPtr32};
pub use record::{PropertyKind, PropertyPayload, PropertyRecord, attr};
pub use string_handle::{MemStringTable, StringHandle, StringTable};

/// Crate version.
pub const VERSION: &str = match option_env!("LONA_VERSION") {
    Some(v) => v,
    None => "unknown",
};
