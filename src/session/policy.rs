// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Connection and event admission checks run against a device's policy and
//! its rolling [`ConnectionProfile`]s (spec §4.F, §5).

use thiserror::Error;

use crate::cfg::config::DefaultPolicy;
use crate::cfg::enums::ConnectionMode;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("device is not active")]
    DeviceInactive,
    #[error("per-minute connection rate exceeded for this mode")]
    RateLimitExceeded,
    #[error("connection quota exceeded for the limit window")]
    QuotaExceeded,
    #[error("event insert quota exceeded for the limit window")]
    EventQuotaExceeded,
}

/// Window (in whole minutes) over which the absolute connection/event
/// ceilings are evaluated.
pub fn window_minutes(policy: &DefaultPolicy) -> u32 {
    ((policy.limit_time_interval.as_secs() / 60).max(1)) as u32
}

/// Admits or rejects a new connection of `mode` given the caller's already
/// computed per-minute and absolute counts (read from the device's
/// [`ConnectionProfile`](crate::session::profile::ConnectionProfile)s over
/// [`window_minutes`]). This is a pure decision: on success, the caller is
/// responsible for recording the connection in the store.
pub fn admit_connection(
    mode: ConnectionMode,
    per_minute_count: u32,
    total_connections_in_window: u32,
    duplex_connections_in_window: u32,
    policy: &DefaultPolicy,
) -> Result<(), PolicyError> {
    if total_connections_in_window >= policy.max_total_connections {
        return Err(PolicyError::QuotaExceeded);
    }
    if mode == ConnectionMode::Duplex
        && duplex_connections_in_window >= policy.max_duplex_connections
    {
        return Err(PolicyError::QuotaExceeded);
    }

    let per_minute_limit = match mode {
        ConnectionMode::Simplex => policy.max_per_minute_simplex,
        ConnectionMode::Duplex => policy.max_per_minute_duplex,
    };
    if per_minute_count >= per_minute_limit {
        return Err(PolicyError::RateLimitExceeded);
    }

    Ok(())
}

/// Admits or rejects an event insert against the device's event quota.
/// `events_in_window` is an exact count (spec §4.G `eventCount(now −
/// interval, now)`), not a minute-granular approximation, so it is a `u64`
/// from [`EventCounter`](crate::session::profile::EventCounter) rather than
/// the `u32` popcount `ConnectionProfile` produces.
pub fn admit_event(events_in_window: u64, policy: &DefaultPolicy) -> Result<(), PolicyError> {
    if events_in_window >= policy.max_allowed_events as u64 {
        return Err(PolicyError::EventQuotaExceeded);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::config::Config;

    #[test]
    fn admits_connections_under_every_ceiling() {
        let cfg = Config::default();
        let result = admit_connection(ConnectionMode::Simplex, 0, 0, 0, &cfg.default_policy);
        assert!(result.is_ok());
    }

    #[test]
    fn rejects_once_per_minute_ceiling_is_hit() {
        let mut cfg = Config::default();
        cfg.default_policy.max_per_minute_simplex = 1;
        let result = admit_connection(ConnectionMode::Simplex, 1, 0, 0, &cfg.default_policy);
        assert_eq!(result, Err(PolicyError::RateLimitExceeded));
    }

    #[test]
    fn rejects_duplex_over_its_absolute_ceiling_even_under_total() {
        let cfg = Config::default();
        let result = admit_connection(
            ConnectionMode::Duplex,
            0,
            1,
            cfg.default_policy.max_duplex_connections,
            &cfg.default_policy,
        );
        assert_eq!(result, Err(PolicyError::QuotaExceeded));
    }

    #[test]
    fn event_quota_is_independent_of_connection_quota() {
        let cfg = Config::default();
        let result =
            admit_event(cfg.default_policy.max_allowed_events as u64, &cfg.default_policy);
        assert_eq!(result, Err(PolicyError::EventQuotaExceeded));
    }
}
