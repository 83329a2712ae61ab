// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use dmtp_server::cfg::config::Config;
use dmtp_server::cfg::enums::ConnectionMode;
use dmtp_server::protocol::field::Resolution;
use dmtp_server::protocol::template::{FieldDescriptor, PayloadTemplate};
use dmtp_server::protocol::Packet;
use dmtp_server::session::Session;
use dmtp_server::store::memory::MemoryStore;

/// A string field whose declared length exceeds its content stops reading
/// at the first zero byte and consumes the terminator, leaving the rest of
/// the declared length unread by that field (spec §4.A, §8 scenario 5).
#[test]
fn string_field_stops_at_the_terminator_and_consumes_it() {
    let store = MemoryStore::default();
    store.provision("rover-6");
    store
        .set_template(
            "rover-6",
            PayloadTemplate::new(
                0x04,
                vec![FieldDescriptor::new(0x11, Resolution::Low, 0, 10)],
                false,
            ),
        )
        .unwrap();

    let policy = Config::default().default_policy;
    let session =
        Session::open("rover-6", ConnectionMode::Simplex, &store, &store, policy, 0).unwrap();

    let payload = [
        0x41, 0x42, 0x00, 0x43, 0x44, 0x00, 0x00, 0x00, 0x00, 0x00,
    ];
    let packet = Packet::new(0x04, true, &payload);
    session.handle_packet(&packet, 1).unwrap();

    let events = store.events_for("rover-6");
    let ev = &events[0];
    assert_eq!(ev.get("string", Some(0)).unwrap().as_text(), Some("AB"));
}
