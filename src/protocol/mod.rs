// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Payload templates and the event decoder built on top of the binary
//! codec (spec §4.C, §4.D, §4.E).

pub mod decoder;
pub mod event;
pub mod field;
pub mod template;

pub use decoder::{decode_event, DecodeError, Packet, STATUS_LOCATION, STATUS_NONE};
pub use event::{EventRecord, FieldKey, Value};
pub use field::{FieldType, PrimitiveKind, Resolution};
pub use template::{FieldDescriptor, PayloadTemplate, TemplateParseError};
