//! Binary payload codec: bounded byte cursor plus the compact GPS encoding.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// Bounded byte container with a read/write cursor, typed accessors.
pub mod buffer;
/// 6- and 8-byte compact GPS coordinate encodings.
pub mod gps;

pub use buffer::PayloadBuffer;
pub use gps::GeoPoint;
