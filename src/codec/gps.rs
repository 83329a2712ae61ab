// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Compact fixed-point GPS coordinate codec.
//!
//! Two wire forms exist, selected by the field's declared byte length:
//!
//! * **6-byte form** — each coordinate packed into 24 bits.
//! * **8-byte form** — each coordinate packed into 32 bits.
//!
//! Both are big-endian unsigned fixed-point encodings of the coordinate
//! remapped into `[0, 2^bits - 1]`. Round-trip precision is ≈2m for the
//! 6-byte form and ≈1cm for the 8-byte form.

const LAT_RANGE: f64 = 180.0;
const LON_RANGE: f64 = 360.0;
const LAT_OFFSET: f64 = 90.0;
const LON_OFFSET: f64 = 180.0;

const SCALE_24: f64 = 16_777_215.0; // 2^24 - 1
const SCALE_32: f64 = 4_294_967_295.0; // 2^32 - 1

/// A (latitude, longitude) pair in decimal degrees. The default `(0.0, 0.0)`
/// denotes "unknown" by protocol convention.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        GeoPoint {
            latitude,
            longitude,
        }
    }

    fn clamped(self) -> Self {
        GeoPoint {
            latitude: self.latitude.clamp(-LAT_OFFSET, LAT_OFFSET),
            longitude: self.longitude.clamp(-LON_OFFSET, LON_OFFSET),
        }
    }
}

#[inline]
fn pack(value: f64, offset: f64, range: f64, scale: f64) -> u64 {
    (((value + offset) * scale / range).round()) as u64
}

#[inline]
fn unpack(raw: u64, offset: f64, range: f64, scale: f64) -> f64 {
    (raw as f64) * range / scale - offset
}

/// Encodes a point into the 6-byte (24 bits/coordinate) form.
pub fn encode_6(point: GeoPoint) -> [u8; 6] {
    let p = point.clamped();
    let lat = pack(p.latitude, LAT_OFFSET, LAT_RANGE, SCALE_24) & 0x00FF_FFFF;
    let lon = pack(p.longitude, LON_OFFSET, LON_RANGE, SCALE_24) & 0x00FF_FFFF;

    let mut out = [0u8; 6];
    out[0..3].copy_from_slice(&lat.to_be_bytes()[5..8]);
    out[3..6].copy_from_slice(&lon.to_be_bytes()[5..8]);
    out
}

/// Decodes the 6-byte (24 bits/coordinate) form.
pub fn decode_6(bytes: &[u8; 6]) -> GeoPoint {
    let lat = u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]) as u64;
    let lon = u32::from_be_bytes([0, bytes[3], bytes[4], bytes[5]]) as u64;
    GeoPoint {
        latitude: unpack(lat, LAT_OFFSET, LAT_RANGE, SCALE_24),
        longitude: unpack(lon, LON_OFFSET, LON_RANGE, SCALE_24),
    }
}

/// Encodes a point into the 8-byte (32 bits/coordinate) form.
pub fn encode_8(point: GeoPoint) -> [u8; 8] {
    let p = point.clamped();
    let lat = pack(p.latitude, LAT_OFFSET, LAT_RANGE, SCALE_32) as u32;
    let lon = pack(p.longitude, LON_OFFSET, LON_RANGE, SCALE_32) as u32;

    let mut out = [0u8; 8];
    out[0..4].copy_from_slice(&lat.to_be_bytes());
    out[4..8].copy_from_slice(&lon.to_be_bytes());
    out
}

/// Decodes the 8-byte (32 bits/coordinate) form.
pub fn decode_8(bytes: &[u8; 8]) -> GeoPoint {
    let lat = u32::from_be_bytes(bytes[0..4].try_into().unwrap_or([0; 4]));
    let lon = u32::from_be_bytes(bytes[4..8].try_into().unwrap_or([0; 4]));
    GeoPoint {
        latitude: unpack(lat as u64, LAT_OFFSET, LAT_RANGE, SCALE_32),
        longitude: unpack(lon as u64, LON_OFFSET, LON_RANGE, SCALE_32),
    }
}

/// Encodes a point in the form selected by the declared field byte length
/// (6 bytes when `len < 8`, otherwise 8 bytes).
pub fn encode(point: GeoPoint, len: usize) -> Vec<u8> {
    if len < 8 {
        encode_6(point).to_vec()
    } else {
        encode_8(point).to_vec()
    }
}

/// Decodes a point previously produced by [`encode`]. `bytes` must hold
/// exactly 6 or 8 bytes.
pub fn decode(bytes: &[u8]) -> GeoPoint {
    if bytes.len() < 8 {
        let mut arr = [0u8; 6];
        let take = bytes.len().min(6);
        arr[..take].copy_from_slice(&bytes[..take]);
        decode_6(&arr)
    } else {
        let mut arr = [0u8; 8];
        arr.copy_from_slice(&bytes[..8]);
        decode_8(&arr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_6_byte_within_2m() {
        let p = GeoPoint::new(37.422, -122.084);
        let bytes = encode_6(p);
        let back = decode_6(&bytes);
        // ~2m precision at the equator is roughly 2e-5 degrees.
        assert!((back.latitude - p.latitude).abs() <= 2e-5);
        assert!((back.longitude - p.longitude).abs() <= 2e-5);
    }

    #[test]
    fn round_trip_8_byte_within_1cm() {
        let p = GeoPoint::new(-33.8688, 151.2093);
        let bytes = encode_8(p);
        let back = decode_8(&bytes);
        assert!((back.latitude - p.latitude).abs() <= 1e-7);
        assert!((back.longitude - p.longitude).abs() <= 1e-7);
    }

    #[test]
    fn clamps_out_of_range_before_encoding() {
        let p = GeoPoint::new(120.0, -400.0);
        let bytes = encode_6(p);
        let back = decode_6(&bytes);
        assert!((back.latitude - 90.0).abs() <= 2e-5);
        assert!((back.longitude - (-180.0)).abs() <= 2e-5);
    }

    #[test]
    fn all_zero_payload_decodes_to_minus_90_minus_180() {
        let back = decode_6(&[0u8; 6]);
        assert_eq!(back, GeoPoint::new(-90.0, -180.0));
    }
}
