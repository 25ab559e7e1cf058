// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

use super::{ErrorRef, raise_from_ref};

#[test]
fn create_starts_at_refcount_one() {
    let r = ErrorRef::create(7u64, false);
    assert_eq!(r.refcount(), 1);
    assert_eq!(r.value(), 7);
    assert!(!r.is_abort());
}

#[test]
fn inc_then_dec_returns_to_zero() {
    let mut r = raise_from_ref(3u64);
    r.inc_ref();
    assert_eq!(r.refcount(), 2);
    assert!(!r.dec_ref());
    assert!(r.dec_ref());
    assert_eq!(r.refcount(), 0);
}

#[test]
fn abort_flag_is_carried() {
    let r = ErrorRef::create((), true);
    assert!(r.is_abort());
}
