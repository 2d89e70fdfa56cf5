//! Tests for the cooldown gate.

use chrono::TimeDelta;
use masal_quota::{CooldownGate, ManualClock};
use std::sync::Arc;
use std::time::Duration;

#[test]
fn unarmed_gate_is_open() {
    let gate = CooldownGate::with_clock(Arc::new(ManualClock::default()));
    assert!(!gate.is_locked());
    assert_eq!(gate.seconds_left(), 0);
    assert!(gate.target().is_none());
}

#[test]
fn gate_rounds_seconds_up_and_self_clears() {
    let clock = Arc::new(ManualClock::default());
    let gate = CooldownGate::with_clock(clock.clone());
    gate.arm(Duration::from_secs(60));

    clock.advance(TimeDelta::milliseconds(100));
    assert_eq!(gate.seconds_left(), 60);

    clock.advance(TimeDelta::seconds(30));
    assert_eq!(gate.seconds_left(), 30);

    clock.advance(TimeDelta::seconds(30));
    assert!(!gate.is_locked());
    assert!(gate.target().is_none());
}

#[test]
fn clear_unlocks_immediately() {
    let gate = CooldownGate::new();
    gate.arm(Duration::from_secs(60));
    assert!(gate.is_locked());

    gate.clear();
    assert!(!gate.is_locked());
}

#[test]
fn rearming_replaces_the_target() {
    let clock = Arc::new(ManualClock::default());
    let gate = CooldownGate::with_clock(clock.clone());

    gate.arm(Duration::from_secs(60));
    clock.advance(TimeDelta::seconds(50));
    gate.arm(Duration::from_secs(60));
    assert_eq!(gate.seconds_left(), 60);
}

#[tokio::test]
async fn countdown_reports_each_second_until_unlocked() {
    let clock = Arc::new(ManualClock::default());
    let gate = CooldownGate::with_clock(clock.clone());
    gate.arm(Duration::from_secs(3));

    let mut reports = Vec::new();
    gate.countdown(Duration::from_millis(1), |left| {
        reports.push(left);
        clock.advance(TimeDelta::seconds(1));
    })
    .await;

    assert_eq!(reports, vec![3, 2, 1]);
    assert!(!gate.is_locked());
}

#[tokio::test]
async fn countdown_on_open_gate_returns_at_once() {
    let gate = CooldownGate::new();
    let mut calls = 0;
    gate.countdown(Duration::from_millis(1), |_| calls += 1).await;
    assert_eq!(calls, 0);
}

#[tokio::test]
async fn countdown_on_wall_clock() {
    let gate = CooldownGate::new();
    gate.arm(Duration::from_millis(150));

    let started = std::time::Instant::now();
    gate.countdown(Duration::from_millis(20), |left| assert_eq!(left, 1))
        .await;
    assert!(started.elapsed() >= Duration::from_millis(100));
}
