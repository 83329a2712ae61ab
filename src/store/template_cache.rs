// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Process-wide template cache for flat-file-style deployments (spec §5,
//! §9): "the template cache (custom type → template) is keyed by (account,
//! device) in the relational store; in the flat-file store it is a single
//! process-wide map reset on restart." [`MemoryStore`](crate::store::memory::MemoryStore)
//! models the relational shape, where each store instance owns its own
//! map; this module models the flat-file shape, where there is no
//! per-connection database handle to own the map, so it lives as a single
//! global registry behind a lock instead.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;

use crate::protocol::PayloadTemplate;

type Key = (String, u8);

static REGISTRY: Lazy<RwLock<HashMap<Key, PayloadTemplate>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Looks up a previously negotiated template by (device, custom type).
pub fn get(device_id: &str, custom_type: u8) -> Option<PayloadTemplate> {
    REGISTRY
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .get(&(device_id.to_string(), custom_type))
        .cloned()
}

/// Registers or replaces a device's template for its own custom type.
pub fn set(device_id: &str, template: PayloadTemplate) {
    REGISTRY
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .insert((device_id.to_string(), template.custom_type), template);
}

/// Drops a single cached template, e.g. on renegotiation.
pub fn remove(device_id: &str, custom_type: u8) {
    REGISTRY
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .remove(&(device_id.to_string(), custom_type));
}

/// Drops every cached template. Flat-file mode calls this once at process
/// startup (spec §9: "reset on startup is explicit") since the map has no
/// other way to learn the previous process's state is gone.
pub fn reset() {
    REGISTRY
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clear();
}
