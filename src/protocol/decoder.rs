// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Decodes a received packet's payload into an [`EventRecord`], driven by
//! the device's negotiated [`PayloadTemplate`] (spec §4.D, §4.E).

use thiserror::Error;

use crate::codec::PayloadBuffer;
use crate::protocol::event::{EventRecord, Value};
use crate::protocol::field::{FieldType, PrimitiveKind, Resolution};
use crate::protocol::template::{FieldDescriptor, PayloadTemplate};

/// Status code set when a packet carries no explicit `statusCode` field.
pub const STATUS_NONE: i64 = 0x0000;
/// Status code implied by a decoded GPS point when the template doesn't
/// carry its own `statusCode` field (spec §4.E finalization rule).
pub const STATUS_LOCATION: i64 = 0xF020;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("packet is not marked as an event packet")]
    PacketType,
    #[error("packet payload is empty")]
    PacketPayload,
    #[error("no payload template is registered for this custom type")]
    FormatNotRecognized,
    #[error("field descriptor names an unrecognized type byte 0x{type_byte:02x}")]
    FormatDefinitionInvalid { type_byte: u8 },
}

/// A received packet, ready for decoding against a template.
#[derive(Debug, Clone, Copy)]
pub struct Packet<'a> {
    pub custom_type: u8,
    pub is_event: bool,
    pub payload: &'a [u8],
}

impl<'a> Packet<'a> {
    pub fn new(custom_type: u8, is_event: bool, payload: &'a [u8]) -> Self {
        Packet {
            custom_type,
            is_event,
            payload,
        }
    }
}

/// Decodes `packet` using `template`, which the caller must already have
/// resolved for `packet.custom_type` (a missing template is reported by the
/// caller as [`DecodeError::FormatNotRecognized`] before this is invoked).
///
/// `now` is the decoder's notion of the current time (seconds since the
/// epoch), used as the default `timestamp` when the template doesn't supply
/// one.
pub fn decode_event(
    packet: &Packet<'_>,
    template: &PayloadTemplate,
    now: i64,
) -> Result<EventRecord, DecodeError> {
    if !packet.is_event {
        return Err(DecodeError::PacketType);
    }
    if packet.payload.is_empty() {
        return Err(DecodeError::PacketPayload);
    }

    let mut buf = PayloadBuffer::source(packet.payload);
    let mut event = EventRecord::new();
    event.set_text("rawData", None, buf.hex_dump());
    event.set_int("statusCode", None, STATUS_NONE);
    event.set_int("timestamp", None, now);

    let mut saw_status = false;
    let mut saw_gps = false;
    let mut n = 0usize;

    while buf.remaining() > 0 {
        let Some(desc) = template.field(n) else {
            break;
        };
        let Some(field_type) = FieldType::from_u8(desc.type_code) else {
            return Err(DecodeError::FormatDefinitionInvalid {
                type_byte: desc.type_code,
            });
        };

        let before = buf.cursor();
        decode_field(&mut buf, &mut event, field_type, desc);
        if buf.cursor() == before {
            // A descriptor that consumes no bytes (byteLength 0, rejected at
            // the wire boundary in `template::FieldDescriptor::from_str`,
            // but still reachable via a directly constructed template) would
            // otherwise spin forever here under `repeat_last`.
            break;
        }
        if field_type == FieldType::StatusCode {
            saw_status = true;
        }
        if field_type == FieldType::GpsPoint {
            saw_gps = true;
        }
        if field_type == FieldType::Sequence {
            event.set_int("sequenceLength", None, desc.byte_length as i64);
        }

        n += 1;
    }

    if !saw_status && saw_gps {
        event.set_int("statusCode", None, STATUS_LOCATION);
    }

    Ok(event)
}

fn decode_field(
    buf: &mut PayloadBuffer,
    event: &mut EventRecord,
    field_type: FieldType,
    desc: FieldDescriptor,
) {
    let name = field_type.canonical_name();
    let index = if field_type.is_array() {
        Some(desc.array_index)
    } else {
        None
    };
    let len = desc.byte_length as usize;

    match field_type.primitive_kind() {
        PrimitiveKind::Gps => {
            let point = buf.read_gps(len);
            event.set_geo(point);
        },
        PrimitiveKind::StringKind => {
            let s = buf.read_string(len);
            event.set_text(name, index, s);
        },
        PrimitiveKind::Binary => {
            let bytes = buf.read_bytes(len);
            event.set_bytes(name, index, bytes);
        },
        PrimitiveKind::Long => {
            let value = if field_type.is_signed() {
                let raw = buf.read_long(len, 0);
                scale_signed(field_type, desc.resolution, raw)
            } else {
                let raw = buf.read_ulong(len, 0);
                scale_unsigned(field_type, desc.resolution, raw)
            };
            event.set(name, index, value);
        },
    }
}

/// Numeric scaling for unsigned LONG fields (spec §4.E). Types absent from
/// the match pass through as raw integers.
fn scale_unsigned(field_type: FieldType, resolution: Resolution, raw: u64) -> Value {
    use FieldType::*;
    match field_type {
        Speed | TopSpeed | Distance => Value::Real(match resolution {
            Resolution::High => raw as f64 / 10.0,
            Resolution::Low => raw as f64,
        }),
        Heading => Value::Real(match resolution {
            Resolution::High => raw as f64 / 100.0,
            Resolution::Low => raw as f64 * 360.0 / 255.0,
        }),
        // Open question (spec §9): the source leaves the high-res value in
        // its raw units while low-res multiplies by 1000; we take the
        // low-res value as milliseconds-from-seconds (`* 1000`) and treat
        // the high-res raw value as already milliseconds (passthrough).
        ElapsedTime => Value::Real(match resolution {
            Resolution::High => raw as f64,
            Resolution::Low => raw as f64 * 1000.0,
        }),
        GpsHorzAccuracy | GpsVertAccuracy => Value::Real(match resolution {
            Resolution::High => raw as f64 / 10.0,
            Resolution::Low => raw as f64,
        }),
        GpsPdop | GpsHdop | GpsVdop => Value::Real(raw as f64 / 10.0),
        _ => Value::Int(raw as i64),
    }
}

/// Numeric scaling for signed LONG fields.
fn scale_signed(field_type: FieldType, resolution: Resolution, raw: i64) -> Value {
    use FieldType::*;
    match field_type {
        Altitude => Value::Real(match resolution {
            Resolution::High => raw as f64 / 10.0,
            Resolution::Low => raw as f64,
        }),
        TempLow | TempHigh | TempAvg => Value::Real(match resolution {
            Resolution::High => raw as f64 / 10.0,
            Resolution::Low => raw as f64,
        }),
        GpsGeoidHeight => Value::Real(match resolution {
            Resolution::High => raw as f64 / 10.0,
            Resolution::Low => raw as f64,
        }),
        GpsMagVariation => Value::Real(raw as f64 / 100.0),
        _ => Value::Int(raw),
    }
}
