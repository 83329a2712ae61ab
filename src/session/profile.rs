// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Rolling per-minute connection bitmap used to enforce rate limits (spec
//! §4.F, §5).
//!
//! Each bit records whether *a* connection occurred during that minute
//! slot; bit 0 is always the most recent slot. `record` ages the bitmap by
//! however many whole minutes elapsed since the last call, dropping slots
//! that fall off the far end, then sets bit 0 for the current slot.

#[derive(Debug, Clone)]
pub struct ConnectionProfile {
    bits: Vec<u8>,
    last_slot: Option<i64>,
}

impl ConnectionProfile {
    /// `profile_length_bytes` bounds how many minutes of history are kept
    /// (`len * 8` minutes).
    pub fn new(profile_length_bytes: u16) -> Self {
        let len = (profile_length_bytes as usize).max(1);
        ConnectionProfile {
            bits: vec![0u8; len],
            last_slot: None,
        }
    }

    fn capacity_bits(&self) -> usize {
        self.bits.len() * 8
    }

    fn get_bit(bits: &[u8], i: usize) -> bool {
        (bits[i / 8] >> (7 - i % 8)) & 1 == 1
    }

    fn set_bit(bits: &mut [u8], i: usize) {
        bits[i / 8] |= 1 << (7 - i % 8);
    }

    fn age(&mut self, delta: usize) {
        let total = self.capacity_bits();
        if delta == 0 {
            return;
        }
        if delta >= total {
            self.bits.iter_mut().for_each(|b| *b = 0);
            return;
        }
        let old = self.bits.clone();
        self.bits.iter_mut().for_each(|b| *b = 0);
        for i in (delta..total).rev() {
            if Self::get_bit(&old, i - delta) {
                Self::set_bit(&mut self.bits, i);
            }
        }
    }

    /// Records a connection at time `t` (seconds since the epoch).
    pub fn record(&mut self, t: i64) {
        let slot = t.div_euclid(60);
        match self.last_slot {
            None => {
                self.last_slot = Some(slot);
            },
            Some(prev) if slot > prev => {
                self.age((slot - prev) as usize);
                self.last_slot = Some(slot);
            },
            _ => {},
        }
        Self::set_bit(&mut self.bits, 0);
    }

    /// Number of distinct minute slots with a recorded connection within
    /// the trailing `window_minutes`.
    pub fn count(&self, window_minutes: u32) -> u32 {
        let window = (window_minutes as usize).min(self.capacity_bits());
        (0..window).filter(|&i| Self::get_bit(&self.bits, i)).count() as u32
    }
}

/// Exact event-insertion counter for the spec §4.G event quota
/// (`eventCount(now − interval, now)`). Unlike [`ConnectionProfile`], which
/// is deliberately minute-granular for rate limiting, the event quota must
/// count insertions precisely — a device pushing hundreds of events inside
/// one minute slot must still trip the ceiling.
#[derive(Debug, Clone, Default)]
pub struct EventCounter {
    timestamps: std::collections::VecDeque<i64>,
}

impl EventCounter {
    pub fn new() -> Self {
        EventCounter::default()
    }

    /// Records an event at time `t`, then drops entries older than
    /// `window_secs` relative to `t` so the counter doesn't grow without
    /// bound over a long process lifetime.
    pub fn record(&mut self, t: i64, window_secs: i64) {
        self.timestamps.push_back(t);
        let cutoff = t - window_secs;
        self.timestamps.retain(|&ts| ts >= cutoff);
    }

    /// Exact count of recorded events within the trailing `window_secs`
    /// ending at `now`.
    pub fn count(&self, now: i64, window_secs: i64) -> u64 {
        let cutoff = now - window_secs;
        self.timestamps.iter().filter(|&&t| t >= cutoff).count() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_connections_within_window() {
        let mut p = ConnectionProfile::new(8); // 64 minutes of history
        p.record(0);
        p.record(60); // minute 1
        p.record(180); // minute 3
        assert_eq!(p.count(5), 3);
        assert_eq!(p.count(2), 2);
    }

    #[test]
    fn old_slots_age_out_of_the_window() {
        let mut p = ConnectionProfile::new(1); // 8 minutes of history
        p.record(0);
        p.record(7 * 60);
        assert_eq!(p.count(8), 2);
        p.record(20 * 60);
        assert_eq!(p.count(8), 1);
    }

    #[test]
    fn repeated_records_within_the_same_minute_count_once() {
        let mut p = ConnectionProfile::new(4);
        p.record(0);
        p.record(10);
        p.record(59);
        assert_eq!(p.count(1), 1);
    }

    #[test]
    fn event_counter_counts_every_event_in_the_same_minute_exactly() {
        let mut c = EventCounter::new();
        for t in 0..50 {
            c.record(t, 3600);
        }
        // Unlike `ConnectionProfile`, 50 events landing in the same minute
        // slot are counted as 50, not collapsed to 1.
        assert_eq!(c.count(49, 3600), 50);
    }

    #[test]
    fn event_counter_excludes_entries_outside_the_requested_window() {
        let mut c = EventCounter::new();
        c.record(0, 1000);
        c.record(30, 1000);
        c.record(200, 1000);
        assert_eq!(c.count(200, 60), 1);
        assert_eq!(c.count(200, 1000), 3);
    }

    #[test]
    fn event_counter_prunes_stale_entries_as_new_ones_are_recorded() {
        let mut c = EventCounter::new();
        c.record(0, 60);
        c.record(30, 60);
        c.record(200, 60); // drops the entries from t=0 and t=30
        assert_eq!(c.count(200, 60), 1);
    }
}
