// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use dmtp_server::cfg::config::Config;
use dmtp_server::cfg::enums::ConnectionMode;
use dmtp_server::protocol::field::Resolution;
use dmtp_server::protocol::template::{FieldDescriptor, PayloadTemplate};
use dmtp_server::protocol::{decode_event, Packet, STATUS_LOCATION};
use dmtp_server::session::Session;
use dmtp_server::store::memory::MemoryStore;

/// A packet carrying only a GPS point decodes with its status code
/// defaulted to `STATUS_LOCATION` since nothing in the template supplies
/// one explicitly.
#[test]
fn minimal_position_report_defaults_status_to_location() {
    let store = MemoryStore::default();
    store.provision("rover-1");
    store
        .set_template(
            "rover-1",
            PayloadTemplate::new(
                0x01,
                vec![FieldDescriptor::new(0x06, Resolution::Low, 0, 6)],
                false,
            ),
        )
        .unwrap();

    let policy = Config::default().default_policy;
    let session =
        Session::open("rover-1", ConnectionMode::Simplex, &store, &store, policy, 0).unwrap();

    let payload = [0u8; 6]; // all-zero -> (-90, -180)
    let packet = Packet::new(0x01, true, &payload);
    session.handle_packet(&packet, 1).unwrap();

    let events = store.events_for("rover-1");
    assert_eq!(events.len(), 1);
    let ev = &events[0];
    assert_eq!(ev.get_int("statusCode", None, -1), STATUS_LOCATION);
    assert_eq!(ev.get_real("latitude", None, 0.0), -90.0);
    assert_eq!(ev.get_real("longitude", None, 0.0), -180.0);

    // Sanity: decoding in isolation (outside a session) agrees.
    let template = store.template("rover-1", 0x01).unwrap().unwrap();
    let direct = decode_event(&packet, &template, 1).unwrap();
    assert_eq!(direct.get_int("statusCode", None, -1), STATUS_LOCATION);
}
