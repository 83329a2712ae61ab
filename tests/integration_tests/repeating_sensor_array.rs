// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use dmtp_server::cfg::config::Config;
use dmtp_server::cfg::enums::ConnectionMode;
use dmtp_server::codec::PayloadBuffer;
use dmtp_server::protocol::field::Resolution;
use dmtp_server::protocol::template::{FieldDescriptor, PayloadTemplate};
use dmtp_server::protocol::Packet;
use dmtp_server::session::Session;
use dmtp_server::store::memory::MemoryStore;

/// A single-field template with `repeatLast` set decodes a uniform sensor
/// bank into indexed entries without one descriptor per sensor.
#[test]
fn repeating_sensor_array_yields_three_indexed_entries() {
    let store = MemoryStore::default();
    store.provision("rover-3");
    store
        .set_template(
            "rover-3",
            PayloadTemplate::new(
                0x03,
                vec![FieldDescriptor::new(0x33, Resolution::Low, 0, 4)],
                true,
            ),
        )
        .unwrap();

    let mut buf = PayloadBuffer::sink_default();
    buf.write_ulong(111, 4);
    buf.write_ulong(222, 4);
    buf.write_ulong(333, 4);
    let payload = buf.as_slice().to_vec();

    let policy = Config::default().default_policy;
    let session =
        Session::open("rover-3", ConnectionMode::Simplex, &store, &store, policy, 0).unwrap();
    let packet = Packet::new(0x03, true, &payload);
    session.handle_packet(&packet, 1).unwrap();

    let events = store.events_for("rover-3");
    let ev = &events[0];
    assert_eq!(ev.get_int("sens32AV", Some(0), -1), 111);
    assert_eq!(ev.get_int("sens32AV", Some(1), -1), 222);
    assert_eq!(ev.get_int("sens32AV", Some(2), -1), 333);
}
