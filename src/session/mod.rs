// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Session wiring: ties the codec/decoder to a device's policy and store,
//! the way a connection handler drives them in practice.

pub mod policy;
pub mod profile;

use thiserror::Error;

use crate::cfg::config::DefaultPolicy;
use crate::cfg::enums::ConnectionMode;
use crate::protocol::{decode_event, DecodeError, Packet};
use crate::store::{Account, AccountStore, DeviceStore, InsertOutcome, StoreError};
use policy::PolicyError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Boundary interface to whatever actually accepts sockets and frames
/// packets off the wire — deliberately left abstract (spec §1 keeps socket
/// acceptance and packet framing out of scope). `recv_packet` yields
/// `None` once the peer is done; `send_ack` is a no-op by default since
/// simplex connections never reply.
pub trait SessionTransport {
    fn recv_packet(&mut self) -> std::io::Result<Option<(u8, bool, Vec<u8>)>>;

    fn send_ack(&mut self, _ack: &[u8]) -> std::io::Result<()> {
        Ok(())
    }
}

/// A single device connection, admitted against policy and bound to a
/// device id. Holds no transport of its own — a caller drives it with
/// whatever packets it reads off a socket, a test fixture, or a file.
pub struct Session<'s, A: AccountStore, D: DeviceStore> {
    device_id: String,
    mode: ConnectionMode,
    accounts: &'s A,
    devices: &'s D,
    policy: DefaultPolicy,
}

impl<'s, A: AccountStore, D: DeviceStore> Session<'s, A, D> {
    /// Admits a new connection for `device_id`, checking device activation,
    /// the per-minute rate for `mode`, and the absolute connection
    /// ceilings, then records the connection on success.
    pub fn open(
        device_id: &str,
        mode: ConnectionMode,
        accounts: &'s A,
        devices: &'s D,
        policy: DefaultPolicy,
        now: i64,
    ) -> Result<Self, SessionError> {
        let account = match accounts.get(device_id)? {
            Some(a) if !a.active => return Err(PolicyError::DeviceInactive.into()),
            Some(a) => a,
            None => Account::new(device_id, policy.profile_length_bytes),
        };

        // Spec §4.G: the per-minute ceiling is always evaluated over exactly
        // one minute, independent of the absolute ceiling's window.
        let per_minute = match mode {
            ConnectionMode::Simplex => account.simplex_profile.count(1),
            ConnectionMode::Duplex => account.duplex_profile.count(1),
        };
        let window = policy::window_minutes(&policy);
        let total = account.simplex_profile.count(window) + account.duplex_profile.count(window);
        let duplex_in_window = account.duplex_profile.count(window);

        policy::admit_connection(mode, per_minute, total, duplex_in_window, &policy)?;
        accounts.record_connection(device_id, mode, now)?;

        Ok(Session {
            device_id: device_id.to_string(),
            mode,
            accounts,
            devices,
            policy,
        })
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn mode(&self) -> ConnectionMode {
        self.mode
    }

    /// Decodes `packet` against the device's registered template for its
    /// custom type, admits it against the event quota, and persists it.
    pub fn handle_packet(
        &self,
        packet: &Packet<'_>,
        now: i64,
    ) -> Result<InsertOutcome, SessionError> {
        let template = self
            .devices
            .template(&self.device_id, packet.custom_type)?
            .ok_or(DecodeError::FormatNotRecognized)?;
        let event = decode_event(packet, &template, now)?;

        let account = self
            .accounts
            .get(&self.device_id)?
            .unwrap_or_else(|| Account::new(&self.device_id, self.policy.profile_length_bytes));
        let window_secs = self.policy.limit_time_interval.as_secs() as i64;
        policy::admit_event(account.event_times.count(now, window_secs), &self.policy)?;

        let outcome = self.devices.insert_event(&self.device_id, event)?;
        self.accounts.record_event(&self.device_id, now, window_secs)?;
        Ok(outcome)
    }

    /// Pumps `transport` until it reports the peer is done, handling each
    /// framed packet in turn. A single packet failing to decode or admit
    /// doesn't end the session — it's logged and the loop continues, the
    /// way a real connection keeps serving later packets after a malformed
    /// one.
    pub fn drive<T: SessionTransport>(
        &self,
        transport: &mut T,
        mut now: impl FnMut() -> i64,
    ) -> std::io::Result<Vec<Result<InsertOutcome, SessionError>>> {
        let mut results = Vec::new();
        while let Some((custom_type, is_event, payload)) = transport.recv_packet()? {
            let packet = Packet::new(custom_type, is_event, &payload);
            let at = now();
            let outcome = self.handle_packet(&packet, at);
            if outcome.is_err() {
                tracing::warn!(device_id = %self.device_id, custom_type, "packet rejected");
            }
            results.push(outcome);
        }
        Ok(results)
    }
}
