// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use core::fmt;

use serde::{Deserialize, Serialize};

/// Which of a device's two independent connection modes a session counts
/// against.
///
/// Simplex sessions are single-packet, device-to-server only (typically
/// UDP); duplex sessions are bidirectional (typically TCP). Each mode owns
/// its own rolling connection profile and rate limits — a physical session
/// counts against exactly one.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionMode {
    #[serde(rename = "Simplex", alias = "simplex", alias = "SIMPLEX")]
    Simplex,
    #[serde(rename = "Duplex", alias = "duplex", alias = "DUPLEX")]
    Duplex,
}
impl fmt::Display for ConnectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConnectionMode::Simplex => "Simplex",
            ConnectionMode::Duplex => "Duplex",
        })
    }
}
