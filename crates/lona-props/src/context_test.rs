// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

use super::Context;
use crate::config::Config;

#[test]
fn default_context_uses_default_config() {
    let ctx = Context::default();
    assert_eq!(ctx.config(), &Config::default());
}

#[test]
fn lookup_cache_is_reachable_and_starts_empty() {
    let mut ctx = Context::default();
    let table = crate::string_handle::MemStringTable::new();
    let obj = crate::ids::ObjectId::new(1);
    let name = crate::string_handle::MemStringTable::direct(1, 1).unwrap();
    assert!(ctx.lookup_cache().lookup(&table, obj, name).is_none());
}
