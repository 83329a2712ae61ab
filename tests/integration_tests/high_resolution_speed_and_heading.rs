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

/// High-resolution speed and heading fields scale down by their declared
/// factor (speed /10, heading /100) instead of passing through raw.
#[test]
fn high_resolution_speed_and_heading_scale_down() {
    let store = MemoryStore::default();
    store.provision("rover-2");
    store
        .set_template(
            "rover-2",
            PayloadTemplate::new(
                0x02,
                vec![
                    FieldDescriptor::new(0x08, Resolution::High, 0, 2),
                    FieldDescriptor::new(0x09, Resolution::High, 0, 2),
                ],
                false,
            ),
        )
        .unwrap();

    let mut buf = PayloadBuffer::sink_default();
    buf.write_ulong(1234, 2); // 123.4 km/h
    buf.write_ulong(27015, 2); // 270.15 deg
    let payload = buf.as_slice().to_vec();

    let policy = Config::default().default_policy;
    let session =
        Session::open("rover-2", ConnectionMode::Simplex, &store, &store, policy, 0).unwrap();
    let packet = Packet::new(0x02, true, &payload);
    session.handle_packet(&packet, 1).unwrap();

    let events = store.events_for("rover-2");
    let ev = &events[0];
    assert_eq!(ev.get_real("speed", None, 0.0), 123.4);
    assert_eq!(ev.get_real("heading", None, 0.0), 270.15);
}
