// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! The per-engine-instance context threaded through every entry point.
//!
//! Two instances of this core running in the same process (two engine
//! instances embedded side by side) must not share a [`Context`]: the
//! lookup cache is process-wide *within one context*, not globally, so
//! each engine instance gets its own (§5). There is no internal
//! concurrency anywhere in this crate, so a `Context` is made `!Sync`
//! via a `PhantomData<*const ()>` marker — the same technique
//! `lona-memory-manager` uses on its non-`Send` kernel-object wrappers —
//! rather than relying on callers to simply not share one across
//! threads.

#[cfg(test)]
mod context_test;

use core::marker::PhantomData;

use crate::config::Config;
use crate::lookup_cache::LookupCache;

/// Everything one engine instance needs to operate this crate's
/// property storage: its [`Config`] and its [`LookupCache`].
///
/// Deliberately holds no reference to a [`StringTable`](crate::string_handle::StringTable) —
/// the string table is supplied per call (§1), keeping this core
/// decoupled from whatever interning scheme the embedder uses.
pub struct Context {
    config: Config,
    lookup_cache: LookupCache,
    _not_sync: PhantomData<*const ()>,
}

impl Context {
    /// Build a new context from `config`, allocating its lookup cache
    /// up front per `config.lookup_cache_rows`/`lookup_cache_row_len`.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            lookup_cache: LookupCache::new(&config),
            config,
            _not_sync: PhantomData,
        }
    }

    /// The context's configuration.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The process-wide lookup cache.
    #[inline]
    #[must_use]
    pub fn lookup_cache(&mut self) -> &mut LookupCache {
        &mut self.lookup_cache
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
