// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn system_clock_is_sane() {
    let clock = SystemClock;
    // After 2020, before 2100.
    let ms = clock.epoch_ms();
    assert!(ms > 1_577_836_800_000);
    assert!(ms < 4_102_444_800_000);
}

#[test]
fn fake_clock_advances() {
    let clock = FakeClock::new();
    let start = clock.epoch_ms();
    clock.advance(Duration::from_secs(5));
    assert_eq!(clock.epoch_ms(), start + 5_000);
}

#[test]
fn fake_clock_set() {
    let clock = FakeClock::new();
    clock.set_epoch_ms(42);
    assert_eq!(clock.epoch_ms(), 42);
}

#[test]
fn fake_clock_clones_share_time() {
    let clock = FakeClock::new();
    let other = clock.clone();
    clock.advance(Duration::from_millis(250));
    assert_eq!(clock.epoch_ms(), other.epoch_ms());
}
