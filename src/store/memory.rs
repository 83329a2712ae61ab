// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! In-memory [`AccountStore`]/[`DeviceStore`] implementation, used by the
//! demo binary and by tests that exercise a full session without a real
//! backing database.

use std::collections::HashSet;

use dashmap::DashMap;

use crate::cfg::config::Config;
use crate::cfg::enums::ConnectionMode;
use crate::protocol::{EventRecord, PayloadTemplate};
use crate::store::{Account, AccountStore, DeviceStore, InsertOutcome, StoreError};

pub struct MemoryStore {
    accounts: DashMap<String, Account>,
    templates: DashMap<(String, u8), PayloadTemplate>,
    events: DashMap<String, Vec<EventRecord>>,
    seen_sequences: DashMap<String, HashSet<i64>>,
    profile_length_bytes: u16,
}

impl MemoryStore {
    pub fn new(profile_length_bytes: u16) -> Self {
        MemoryStore {
            accounts: DashMap::new(),
            templates: DashMap::new(),
            events: DashMap::new(),
            seen_sequences: DashMap::new(),
            profile_length_bytes,
        }
    }

    /// Registers a device ahead of time (otherwise the first connection
    /// lazily creates an active account).
    pub fn provision(&self, device_id: &str) {
        self.accounts
            .entry(device_id.to_string())
            .or_insert_with(|| Account::new(device_id, self.profile_length_bytes));
    }

    pub fn set_active(&self, device_id: &str, active: bool) {
        if let Some(mut acct) = self.accounts.get_mut(device_id) {
            acct.active = active;
        }
    }

    /// Events accumulated so far for a device, in insertion order.
    pub fn events_for(&self, device_id: &str) -> Vec<EventRecord> {
        self.events.get(device_id).map(|v| v.clone()).unwrap_or_default()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore::new(Config::default().default_policy.profile_length_bytes)
    }
}

impl AccountStore for MemoryStore {
    fn get(&self, device_id: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.get(device_id).map(|r| r.clone()))
    }

    fn record_connection(
        &self,
        device_id: &str,
        mode: ConnectionMode,
        at: i64,
    ) -> Result<(), StoreError> {
        let mut entry = self
            .accounts
            .entry(device_id.to_string())
            .or_insert_with(|| Account::new(device_id, self.profile_length_bytes));
        match mode {
            ConnectionMode::Simplex => entry.simplex_profile.record(at),
            ConnectionMode::Duplex => entry.duplex_profile.record(at),
        }
        Ok(())
    }

    fn record_event(
        &self,
        device_id: &str,
        at: i64,
        window_secs: i64,
    ) -> Result<(), StoreError> {
        let mut entry = self
            .accounts
            .entry(device_id.to_string())
            .or_insert_with(|| Account::new(device_id, self.profile_length_bytes));
        entry.event_times.record(at, window_secs);
        Ok(())
    }
}

impl DeviceStore for MemoryStore {
    fn template(
        &self,
        device_id: &str,
        custom_type: u8,
    ) -> Result<Option<PayloadTemplate>, StoreError> {
        Ok(self
            .templates
            .get(&(device_id.to_string(), custom_type))
            .map(|r| r.clone()))
    }

    fn set_template(
        &self,
        device_id: &str,
        template: PayloadTemplate,
    ) -> Result<(), StoreError> {
        self.templates
            .insert((device_id.to_string(), template.custom_type), template);
        Ok(())
    }

    fn remove_template(&self, device_id: &str, custom_type: u8) -> Result<(), StoreError> {
        self.templates.remove(&(device_id.to_string(), custom_type));
        Ok(())
    }

    fn insert_event(
        &self,
        device_id: &str,
        event: EventRecord,
    ) -> Result<InsertOutcome, StoreError> {
        if event.contains("sequence", None) {
            let seq = event.get_int("sequence", None, 0);
            let mut seen = self
                .seen_sequences
                .entry(device_id.to_string())
                .or_insert_with(HashSet::new);
            if !seen.insert(seq) {
                return Ok(InsertOutcome::Duplicate);
            }
        }
        self.events
            .entry(device_id.to_string())
            .or_insert_with(Vec::new)
            .push(event);
        Ok(InsertOutcome::Inserted)
    }
}
