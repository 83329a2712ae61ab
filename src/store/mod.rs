// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Storage seams: how devices and their accumulated events are looked up
//! and persisted (spec §4.G, §4.H, §7).

pub mod memory;
pub mod template_cache;

use thiserror::Error;

use crate::cfg::enums::ConnectionMode;
use crate::protocol::{EventRecord, PayloadTemplate};
use crate::session::profile::{ConnectionProfile, EventCounter};

/// Failures a store implementation can report back to a session. The
/// distinction matters to the caller: a transient failure is worth a retry
/// or a reconnect, a permanent one is not.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("transient store failure: {0}")]
    Transient(String),
    #[error("permanent store failure: {0}")]
    Permanent(String),
}

/// Result of inserting an event: whether the store accepted it or folded
/// it into an existing record (e.g. a duplicate sequence number).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    Duplicate,
}

/// A device's account-level record: identity, policy, and connection
/// history used by the policy gate. Spec §3 models `Account` and `Device`
/// as two separate records (account id/description/active, device
/// id/description/policy); this crate collapses them into one, since every
/// policy decision and every field this engine reads is keyed by the device
/// anyway (see DESIGN.md's storage simplifications).
#[derive(Debug, Clone)]
pub struct Account {
    pub device_id: String,
    pub description: String,
    pub active: bool,
    pub simplex_profile: ConnectionProfile,
    pub duplex_profile: ConnectionProfile,
    /// Exact per-event timestamps for the spec §4.G event quota
    /// (`eventCount(now − interval, now)`) — deliberately not a
    /// `ConnectionProfile`, since that bitmap's minute granularity would
    /// saturate at one count per minute and make the quota unenforceable.
    pub event_times: EventCounter,
}

impl Account {
    pub fn new(device_id: impl Into<String>, profile_length_bytes: u16) -> Self {
        let device_id = device_id.into();
        Account {
            description: device_id.clone(),
            device_id,
            active: true,
            simplex_profile: ConnectionProfile::new(profile_length_bytes),
            duplex_profile: ConnectionProfile::new(profile_length_bytes),
            event_times: EventCounter::new(),
        }
    }

    /// Spec §4.H: `getAccountName()`.
    pub fn account_name(&self) -> &str {
        &self.device_id
    }

    /// Spec §4.H: `getDescription()`.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Spec §4.H: `isActive()`.
    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Looks up and mutates device accounts: identity, activation state, and
/// the rolling connection/event profiles the policy gate consults.
pub trait AccountStore: Send + Sync {
    fn get(&self, device_id: &str) -> Result<Option<Account>, StoreError>;

    fn record_connection(
        &self,
        device_id: &str,
        mode: ConnectionMode,
        at: i64,
    ) -> Result<(), StoreError>;

    /// Records an event insertion at time `at`. `window_secs` is the
    /// device's event-quota window (spec §4.G `LimitTimeInterval`), passed
    /// through so an implementation can prune timestamps older than it no
    /// longer needs to retain.
    fn record_event(&self, device_id: &str, at: i64, window_secs: i64)
    -> Result<(), StoreError>;
}

/// Looks up a device's negotiated payload template and persists decoded
/// events.
pub trait DeviceStore: Send + Sync {
    fn template(
        &self,
        device_id: &str,
        custom_type: u8,
    ) -> Result<Option<PayloadTemplate>, StoreError>;

    fn set_template(
        &self,
        device_id: &str,
        template: PayloadTemplate,
    ) -> Result<(), StoreError>;

    /// Whether a template has been negotiated for `custom_type` (spec §4.H:
    /// "encoding-support predicate").
    fn supports_encoding(&self, device_id: &str, custom_type: u8) -> Result<bool, StoreError> {
        Ok(self.template(device_id, custom_type)?.is_some())
    }

    /// Drops a previously negotiated template, e.g. on renegotiation (spec
    /// §4.H: "... & removal").
    fn remove_template(&self, device_id: &str, custom_type: u8) -> Result<(), StoreError>;

    fn insert_event(
        &self,
        device_id: &str,
        event: EventRecord,
    ) -> Result<InsertOutcome, StoreError>;
}
