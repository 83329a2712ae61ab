// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Payload templates: the per-custom-type field layout a device negotiates
//! before it can send events of that type (spec §4.D).

use core::fmt;

use thiserror::Error;

use crate::protocol::field::Resolution;

/// A single positional slot in a [`PayloadTemplate`].
///
/// The type byte is kept raw rather than pre-resolved to a [`FieldType`]
/// (`crate::protocol::field::FieldType`) because a template can legally
/// carry a byte the decoder doesn't recognize — that's only an error once
/// decoding actually reaches it (`FORMAT_DEFINITION_INVALID`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub type_code: u8,
    pub resolution: Resolution,
    pub array_index: u32,
    pub byte_length: u8,
}

impl FieldDescriptor {
    pub fn new(
        type_code: u8,
        resolution: Resolution,
        array_index: u32,
        byte_length: u8,
    ) -> Self {
        FieldDescriptor {
            type_code,
            resolution,
            array_index,
            byte_length,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateParseError {
    #[error("malformed field descriptor: {0:?}")]
    Malformed(String),
}

impl fmt::Display for FieldDescriptor {
    /// `"<resChar>|<typeHex>|<index>|<length>"` wire form (spec §4.D, §8
    /// scenario 6): the type byte is hex, not decimal.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{:x}|{}|{}",
            self.resolution.as_char(),
            self.type_code,
            self.array_index,
            self.byte_length
        )
    }
}

impl core::str::FromStr for FieldDescriptor {
    type Err = TemplateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('|');
        let malformed = || TemplateParseError::Malformed(s.to_string());

        let res_part = parts.next().ok_or_else(malformed)?;
        let res_char = res_part.chars().next().ok_or_else(malformed)?;
        let resolution = Resolution::from_char(res_char).ok_or_else(malformed)?;

        let type_code: u8 = u8::from_str_radix(parts.next().ok_or_else(malformed)?, 16)
            .map_err(|_| malformed())?;
        let array_index: u32 = parts
            .next()
            .ok_or_else(malformed)?
            .parse()
            .map_err(|_| malformed())?;
        let byte_length: u8 = parts
            .next()
            .ok_or_else(malformed)?
            .parse()
            .map_err(|_| malformed())?;

        if parts.next().is_some() {
            return Err(malformed());
        }

        // Spec §3: byteLength ranges 1..=8. A device-negotiated 0 would let
        // the decode loop read zero bytes per field forever under
        // `repeat_last` (see `decoder::decode_event`'s forward-progress
        // guard), so the wire boundary rejects it outright.
        if !(1..=8).contains(&byte_length) {
            return Err(malformed());
        }

        Ok(FieldDescriptor::new(type_code, resolution, array_index, byte_length))
    }
}

/// The negotiated field layout for one custom packet type.
///
/// `repeat_last` lets a device describe a long, uniform array (e.g. a bank
/// of sensors) without one descriptor per element: once positional lookup
/// runs past the end of `fields`, it keeps reusing the last descriptor,
/// incrementing its `array_index` by the overrun amount.
#[derive(Debug, Clone, PartialEq)]
pub struct PayloadTemplate {
    pub custom_type: u8,
    pub fields: Vec<FieldDescriptor>,
    pub repeat_last: bool,
}

impl PayloadTemplate {
    pub fn new(custom_type: u8, fields: Vec<FieldDescriptor>, repeat_last: bool) -> Self {
        PayloadTemplate {
            custom_type,
            fields,
            repeat_last,
        }
    }

    /// Field descriptor for 0-based decode position `n`, honoring
    /// `repeat_last`.
    pub fn field(&self, n: usize) -> Option<FieldDescriptor> {
        if n < self.fields.len() {
            return self.fields.get(n).copied();
        }
        if !self.repeat_last {
            return None;
        }
        let last = *self.fields.last()?;
        let overrun = (n - self.fields.len() + 1) as u32;
        Some(FieldDescriptor {
            array_index: last.array_index + overrun,
            ..last
        })
    }

    /// `"<repeat>|<field>|<field>|..."` textual round trip, one descriptor
    /// per `;`-joined segment.
    pub fn to_wire(&self) -> String {
        let repeat = if self.repeat_last { "1" } else { "0" };
        let fields = self
            .fields
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .join(";");
        format!("{repeat}|{fields}")
    }

    pub fn from_wire(custom_type: u8, s: &str) -> Result<Self, TemplateParseError> {
        let malformed = || TemplateParseError::Malformed(s.to_string());
        let mut parts = s.splitn(2, '|');
        let repeat_flag = parts.next().ok_or_else(malformed)?;
        let repeat_last = match repeat_flag {
            "1" => true,
            "0" => false,
            _ => return Err(malformed()),
        };
        let rest = parts.next().unwrap_or("");
        let fields = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split(';')
                .map(str::parse::<FieldDescriptor>)
                .collect::<Result<Vec<_>, _>>()?
        };
        Ok(PayloadTemplate::new(custom_type, fields, repeat_last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_descriptor_wire_round_trip() {
        let d = FieldDescriptor::new(0x08, Resolution::High, 0, 2);
        assert_eq!(d.to_string(), "H|8|0|2");
        assert_eq!("H|8|0|2".parse::<FieldDescriptor>().unwrap(), d);
    }

    #[test]
    fn type_byte_is_serialized_as_hex_not_decimal() {
        let d = FieldDescriptor::new(0x0A, Resolution::Low, 2, 4);
        assert_eq!(d.to_string(), "L|a|2|4");
        assert_eq!("L|a|2|4".parse::<FieldDescriptor>().unwrap(), d);
    }

    #[test]
    fn malformed_descriptor_is_rejected() {
        assert!("H|8|0".parse::<FieldDescriptor>().is_err());
        assert!("X|8|0|2".parse::<FieldDescriptor>().is_err());
    }

    #[test]
    fn zero_byte_length_is_rejected() {
        assert!("L|31|0|0".parse::<FieldDescriptor>().is_err());
    }

    #[test]
    fn byte_length_above_eight_is_rejected() {
        assert!("L|31|0|9".parse::<FieldDescriptor>().is_err());
    }

    #[test]
    fn repeat_last_template_with_zero_byte_length_is_rejected_from_wire() {
        assert!(PayloadTemplate::from_wire(0x01, "1|L|31|0|0").is_err());
    }

    #[test]
    fn repeat_last_extends_beyond_explicit_fields() {
        let tpl = PayloadTemplate::new(
            0x01,
            vec![FieldDescriptor::new(0x31, Resolution::Low, 0, 4)],
            true,
        );
        assert_eq!(tpl.field(0), Some(FieldDescriptor::new(0x31, Resolution::Low, 0, 4)));
        assert_eq!(tpl.field(1), Some(FieldDescriptor::new(0x31, Resolution::Low, 1, 4)));
        assert_eq!(tpl.field(2), Some(FieldDescriptor::new(0x31, Resolution::Low, 2, 4)));
    }

    #[test]
    fn no_repeat_stops_at_end_of_fields() {
        let tpl = PayloadTemplate::new(
            0x01,
            vec![FieldDescriptor::new(0x02, Resolution::Low, 0, 4)],
            false,
        );
        assert_eq!(tpl.field(1), None);
    }

    #[test]
    fn template_wire_round_trip() {
        let tpl = PayloadTemplate::new(
            0x05,
            vec![
                FieldDescriptor::new(0x02, Resolution::Low, 0, 4),
                FieldDescriptor::new(0x08, Resolution::High, 0, 2),
            ],
            false,
        );
        let wire = tpl.to_wire();
        let back = PayloadTemplate::from_wire(0x05, &wire).unwrap();
        assert_eq!(back.fields, tpl.fields);
        assert_eq!(back.repeat_last, tpl.repeat_last);
    }
}
