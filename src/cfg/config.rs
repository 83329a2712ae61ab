// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    /// Wire-level codec limits.
    pub codec: CodecConfig,
    /// Default device policy parameters used to seed newly provisioned
    /// devices (actual enforcement reads the device's own record).
    pub default_policy: DefaultPolicy,
    /// Implementation/runtime parameters that live outside the protocol.
    pub runtime: RuntimeConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
/// Wire-level codec limits.
pub struct CodecConfig {
    #[serde(rename = "MaxPayloadLength")]
    /// Hard cap on a single packet's payload size, in bytes (spec: ≤255).
    pub max_payload_length: u8,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
/// Default connection/event quotas applied to a device record on creation.
pub struct DefaultPolicy {
    #[serde(rename = "MaxTotalConnections")]
    /// Absolute ceiling over `LimitTimeInterval`, simplex + duplex combined.
    pub max_total_connections: u32,
    #[serde(rename = "MaxDuplexConnections")]
    /// Absolute ceiling over `LimitTimeInterval`, duplex only.
    pub max_duplex_connections: u32,
    #[serde(rename = "MaxPerMinuteSimplex")]
    /// Per-minute ceiling for simplex sessions.
    pub max_per_minute_simplex: u32,
    #[serde(rename = "MaxPerMinuteDuplex")]
    /// Per-minute ceiling for duplex sessions.
    pub max_per_minute_duplex: u32,
    #[serde(rename = "LimitTimeInterval", with = "serde_secs")]
    /// Window over which the absolute ceilings are evaluated.
    pub limit_time_interval: Duration,
    #[serde(rename = "MaxAllowedEvents")]
    /// Event insert quota over `LimitTimeInterval`.
    pub max_allowed_events: u32,
    #[serde(rename = "ProfileLengthBytes")]
    /// Byte length of each connection profile bitmap (minute capacity ÷8).
    pub profile_length_bytes: u16,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
/// Runtime-only settings that do not describe the protocol itself.
pub struct RuntimeConfig {
    #[serde(rename = "MaxSessions")]
    /// External limit on the number of simultaneously tracked sessions.
    pub max_sessions: u32,
    #[serde(rename = "TimeoutConnection", with = "serde_secs")]
    /// Timeout applied by the (external) transport when waiting on I/O.
    pub timeout_connection: Duration,
}

impl Config {
    /// Loads the configuration from YAML, validates it, and returns the
    /// ready-to-use value.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        let mut cfg: Config =
            serde_yaml::from_str(&s).context("failed to parse config YAML")?;
        cfg.validate_and_normalize()?;
        Ok(cfg)
    }

    /// Validates invariants implied by the spec's resource bounds.
    pub fn validate_and_normalize(&mut self) -> Result<()> {
        ensure!(
            self.codec.max_payload_length > 0,
            "MaxPayloadLength must be > 0"
        );
        ensure!(
            self.default_policy.max_duplex_connections
                <= self.default_policy.max_total_connections,
            "MaxDuplexConnections must not exceed MaxTotalConnections"
        );
        ensure!(
            self.default_policy.profile_length_bytes > 0,
            "ProfileLengthBytes must be > 0"
        );
        ensure!(self.runtime.max_sessions >= 1, "MaxSessions must be >= 1");
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            codec: CodecConfig {
                max_payload_length: 255,
            },
            default_policy: DefaultPolicy {
                max_total_connections: 1440,
                max_duplex_connections: 720,
                max_per_minute_simplex: 6,
                max_per_minute_duplex: 3,
                limit_time_interval: Duration::from_secs(3600),
                max_allowed_events: 600,
                profile_length_bytes: 180,
            },
            runtime: RuntimeConfig {
                max_sessions: 4096,
                timeout_connection: Duration::from_secs(30),
            },
        }
    }
}

/// Serde helpers for representing `Duration` as a number of seconds.
mod serde_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(d)?;
        Ok(Duration::from_secs(secs))
    }
}
