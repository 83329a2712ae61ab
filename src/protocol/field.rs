// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The field type catalog (spec §6): the 8-bit codes a template's field
//! descriptors carry, their primitive decode kind, signedness, and whether
//! they're array-valued.

use core::fmt;
use core::fmt::Write as _;

/// Which typed read the decoder issues for a field, independent of its
/// logical meaning or scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Long,
    Gps,
    StringKind,
    Binary,
}

/// All field kinds the protocol's template system can name.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    StatusCode = 0x01,
    Timestamp = 0x02,
    Index = 0x03,
    Sequence = 0x04,
    GpsPoint = 0x06,
    GpsAge = 0x07,
    Speed = 0x08,
    Heading = 0x09,
    Altitude = 0x0A,
    Distance = 0x0B,
    GeofenceId = 0x0E,
    TopSpeed = 0x0F,
    StringField = 0x11,
    Binary = 0x1A,
    InputId = 0x21,
    InputState = 0x22,
    OutputId = 0x23,
    OutputState = 0x24,
    IoExtra = 0x25,
    ElapsedTime = 0x27,
    Counter = 0x28,
    Sensor32Low = 0x31,
    Sensor32High = 0x32,
    Sensor32Avg = 0x33,
    TempLow = 0x3A,
    TempHigh = 0x3B,
    TempAvg = 0x3C,
    DgpsUpdate = 0x41,
    GpsHorzAccuracy = 0x42,
    GpsVertAccuracy = 0x43,
    GpsSatellites = 0x44,
    GpsMagVariation = 0x45,
    GpsQuality = 0x46,
    GpsType = 0x47,
    GpsGeoidHeight = 0x48,
    GpsPdop = 0x49,
    GpsHdop = 0x4A,
    GpsVdop = 0x4B,
}

impl FieldType {
    /// Recognizes a raw template type byte. Unknown bytes are the caller's
    /// problem to report (`FORMAT_DEFINITION_INVALID`) — this just answers
    /// "do we know this one".
    pub fn from_u8(byte: u8) -> Option<Self> {
        Some(match byte {
            0x01 => FieldType::StatusCode,
            0x02 => FieldType::Timestamp,
            0x03 => FieldType::Index,
            0x04 => FieldType::Sequence,
            0x06 => FieldType::GpsPoint,
            0x07 => FieldType::GpsAge,
            0x08 => FieldType::Speed,
            0x09 => FieldType::Heading,
            0x0A => FieldType::Altitude,
            0x0B => FieldType::Distance,
            0x0E => FieldType::GeofenceId,
            0x0F => FieldType::TopSpeed,
            0x11 => FieldType::StringField,
            0x1A => FieldType::Binary,
            0x21 => FieldType::InputId,
            0x22 => FieldType::InputState,
            0x23 => FieldType::OutputId,
            0x24 => FieldType::OutputState,
            0x25 => FieldType::IoExtra,
            0x27 => FieldType::ElapsedTime,
            0x28 => FieldType::Counter,
            0x31 => FieldType::Sensor32Low,
            0x32 => FieldType::Sensor32High,
            0x33 => FieldType::Sensor32Avg,
            0x3A => FieldType::TempLow,
            0x3B => FieldType::TempHigh,
            0x3C => FieldType::TempAvg,
            0x41 => FieldType::DgpsUpdate,
            0x42 => FieldType::GpsHorzAccuracy,
            0x43 => FieldType::GpsVertAccuracy,
            0x44 => FieldType::GpsSatellites,
            0x45 => FieldType::GpsMagVariation,
            0x46 => FieldType::GpsQuality,
            0x47 => FieldType::GpsType,
            0x48 => FieldType::GpsGeoidHeight,
            0x49 => FieldType::GpsPdop,
            0x4A => FieldType::GpsHdop,
            0x4B => FieldType::GpsVdop,
            _ => return None,
        })
    }

    #[inline]
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    /// Non-GPS/STRING/BINARY types are LONG (spec §4.C).
    pub fn primitive_kind(&self) -> PrimitiveKind {
        match self {
            FieldType::GpsPoint => PrimitiveKind::Gps,
            FieldType::StringField => PrimitiveKind::StringKind,
            FieldType::Binary => PrimitiveKind::Binary,
            _ => PrimitiveKind::Long,
        }
    }

    /// Signedness is per-type, not per-encoding (spec §4.C).
    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            FieldType::Altitude
                | FieldType::GpsGeoidHeight
                | FieldType::GpsMagVariation
                | FieldType::TempLow
                | FieldType::TempHigh
                | FieldType::TempAvg
        )
    }

    /// Kinds that allow multiple values via `arrayIndex` (spec §3, §6).
    pub fn is_array(&self) -> bool {
        matches!(
            self,
            FieldType::GeofenceId
                | FieldType::StringField
                | FieldType::ElapsedTime
                | FieldType::Counter
                | FieldType::Sensor32Low
                | FieldType::Sensor32High
                | FieldType::Sensor32Avg
                | FieldType::TempLow
                | FieldType::TempHigh
                | FieldType::TempAvg
        )
    }

    /// Canonical event-record field name used as the map key (and as the
    /// `"name.index"` prefix for array-valued kinds).
    pub fn canonical_name(&self) -> &'static str {
        match self {
            FieldType::StatusCode => "statusCode",
            FieldType::Timestamp => "timestamp",
            FieldType::Index => "index",
            FieldType::Sequence => "sequence",
            FieldType::GpsPoint => "gpsPoint",
            FieldType::GpsAge => "gpsAge",
            FieldType::Speed => "speed",
            FieldType::Heading => "heading",
            FieldType::Altitude => "altitude",
            FieldType::Distance => "distance",
            FieldType::GeofenceId => "geofenceId",
            FieldType::TopSpeed => "topSpeed",
            FieldType::StringField => "string",
            FieldType::Binary => "binary",
            FieldType::InputId => "inputId",
            FieldType::InputState => "inputState",
            FieldType::OutputId => "outputId",
            FieldType::OutputState => "outputState",
            FieldType::IoExtra => "ioExtra",
            FieldType::ElapsedTime => "elapsedTime",
            FieldType::Counter => "counter",
            FieldType::Sensor32Low => "sens32Low",
            FieldType::Sensor32High => "sens32High",
            FieldType::Sensor32Avg => "sens32AV",
            FieldType::TempLow => "tempLow",
            FieldType::TempHigh => "tempHigh",
            FieldType::TempAvg => "tempAvg",
            FieldType::DgpsUpdate => "dgpsUpdate",
            FieldType::GpsHorzAccuracy => "gpsHorzAccuracy",
            FieldType::GpsVertAccuracy => "gpsVertAccuracy",
            FieldType::GpsSatellites => "gpsSatellites",
            FieldType::GpsMagVariation => "gpsMagVariation",
            FieldType::GpsQuality => "gpsQuality",
            FieldType::GpsType => "gpsType",
            FieldType::GpsGeoidHeight => "gpsGeoidHeight",
            FieldType::GpsPdop => "gpsPdop",
            FieldType::GpsHdop => "gpsHdop",
            FieldType::GpsVdop => "gpsVdop",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical_name())
    }
}

/// Per-field precision flag selecting one of two numeric scaling rules for
/// the same logical quantity (spec §4.E).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Low,
    High,
}

impl Resolution {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'H' | 'h' => Some(Resolution::High),
            'L' | 'l' => Some(Resolution::Low),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Resolution::High => 'H',
            Resolution::Low => 'L',
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(self.as_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_catalog_byte() {
        let codes: &[u8] = &[
            0x01, 0x02, 0x03, 0x04, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0E, 0x0F,
            0x11, 0x1A, 0x21, 0x22, 0x23, 0x24, 0x25, 0x27, 0x28, 0x31, 0x32, 0x33,
            0x3A, 0x3B, 0x3C, 0x41, 0x42, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49,
            0x4A, 0x4B,
        ];
        for &code in codes {
            let ft = FieldType::from_u8(code).expect("known code");
            assert_eq!(ft.as_u8(), code);
        }
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert!(FieldType::from_u8(0x99).is_none());
    }

    #[test]
    fn signedness_matches_table() {
        assert!(FieldType::Altitude.is_signed());
        assert!(FieldType::GpsGeoidHeight.is_signed());
        assert!(FieldType::GpsMagVariation.is_signed());
        assert!(FieldType::TempAvg.is_signed());
        assert!(!FieldType::Speed.is_signed());
        assert!(!FieldType::GpsSatellites.is_signed());
    }

    #[test]
    fn resolution_char_round_trip() {
        assert_eq!(Resolution::from_char('H'), Some(Resolution::High));
        assert_eq!(Resolution::from_char('L'), Some(Resolution::Low));
        assert_eq!(Resolution::High.as_char(), 'H');
    }
}
