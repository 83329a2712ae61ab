// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::time::Duration;

use dmtp_server::cfg::config::Config;
use dmtp_server::cfg::enums::ConnectionMode;
use dmtp_server::session::policy::PolicyError;
use dmtp_server::session::{Session, SessionError};
use dmtp_server::store::memory::MemoryStore;

/// Repeated connections within the same minute slot collapse to a single
/// set bit in the rolling profile, so the 1-minute window's popcount never
/// exceeds 1 — the per-minute ceiling only ever rejects a connection that
/// lands in a minute where one has already been recorded (spec §4.F, §4.G,
/// §8 "Per-minute ceiling" testable property).
#[test]
fn repeated_connections_in_one_minute_do_not_trip_the_per_minute_ceiling() {
    let store = MemoryStore::default();
    let mut policy = Config::default().default_policy;
    policy.max_per_minute_simplex = 3;
    policy.max_total_connections = 100;

    Session::open("rover-4", ConnectionMode::Simplex, &store, &store, policy.clone(), 0)
        .expect("first connection in minute 0 is admitted");
    Session::open("rover-4", ConnectionMode::Simplex, &store, &store, policy.clone(), 10)
        .expect("same-minute reconnect is admitted, popcount stays 1");
    Session::open("rover-4", ConnectionMode::Simplex, &store, &store, policy, 59)
        .expect("still minute 0, popcount stays 1");
}

/// A device whose per-minute rate never trips can still be rejected once
/// its distinct-minute connection count reaches the absolute ceiling over
/// `LimitTimeInterval` (spec §4.G "Absolute ceiling").
#[test]
fn absolute_connection_ceiling_trips_once_distinct_minutes_reach_the_total() {
    let store = MemoryStore::default();
    let mut policy = Config::default().default_policy;
    policy.max_total_connections = 2;
    policy.max_per_minute_simplex = 100;
    policy.limit_time_interval = Duration::from_secs(3600);

    Session::open("rover-5", ConnectionMode::Simplex, &store, &store, policy.clone(), 0)
        .expect("first distinct minute is admitted");
    Session::open("rover-5", ConnectionMode::Simplex, &store, &store, policy.clone(), 60)
        .expect("second distinct minute is admitted, reaching the ceiling");

    let result = Session::open("rover-5", ConnectionMode::Simplex, &store, &store, policy, 120);
    assert!(matches!(
        result,
        Err(SessionError::Policy(PolicyError::QuotaExceeded))
    ));
}
