// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The decoded event record: a name+index-keyed bag of typed values (spec
//! §4.D, §4.E).

use std::collections::HashMap;

use crate::codec::GeoPoint;

/// One decoded field value. Numeric fields that carry a scaling formula
/// decode to `Real`; raw passthrough fields decode to `Int`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Real(f64),
    Bytes(Vec<u8>),
    Text(String),
}

impl Value {
    /// Coerces to an `i64`, truncating `Real` and parsing `Bytes` as a hex
    /// dump stand-in (round-tripping the default raw-data convention).
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Real(v) => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b.as_slice()),
            _ => None,
        }
    }
}

/// Composite key: a canonical field name plus an optional array index.
pub type FieldKey = (String, Option<u32>);

/// A decoded event: the set of field values produced from one packet
/// against one template, keyed by canonical name (+ array index for
/// array-valued kinds).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventRecord {
    values: HashMap<FieldKey, Value>,
}

impl EventRecord {
    pub fn new() -> Self {
        EventRecord::default()
    }

    fn key(name: &str, index: Option<u32>) -> FieldKey {
        (name.to_string(), index)
    }

    pub fn set(&mut self, name: &str, index: Option<u32>, value: Value) {
        self.values.insert(Self::key(name, index), value);
    }

    pub fn set_int(&mut self, name: &str, index: Option<u32>, v: i64) {
        self.set(name, index, Value::Int(v));
    }

    pub fn set_real(&mut self, name: &str, index: Option<u32>, v: f64) {
        self.set(name, index, Value::Real(v));
    }

    pub fn set_bytes(&mut self, name: &str, index: Option<u32>, v: Vec<u8>) {
        self.set(name, index, Value::Bytes(v));
    }

    pub fn set_text(&mut self, name: &str, index: Option<u32>, v: String) {
        self.set(name, index, Value::Text(v));
    }

    /// Stores a GPS point as two real-valued entries, `latitude`/`longitude`
    /// (spec §4.D: "GeoPoint stored as two double entries").
    pub fn set_geo(&mut self, point: GeoPoint) {
        self.set_real("latitude", None, point.latitude);
        self.set_real("longitude", None, point.longitude);
    }

    pub fn get(&self, name: &str, index: Option<u32>) -> Option<&Value> {
        self.values.get(&Self::key(name, index))
    }

    pub fn get_int(&self, name: &str, index: Option<u32>, default: i64) -> i64 {
        self.get(name, index).and_then(Value::as_int).unwrap_or(default)
    }

    pub fn get_real(&self, name: &str, index: Option<u32>, default: f64) -> f64 {
        self.get(name, index).and_then(Value::as_real).unwrap_or(default)
    }

    /// Textual view of a stored value: `Text` as-is, numeric storage
    /// formatted decimal, byte-array storage as `"0x" + hex` (spec §4.D:
    /// "byte-array storage stringifies as `0x` + hex").
    pub fn get_text(&self, name: &str, index: Option<u32>, default: &str) -> String {
        match self.get(name, index) {
            Some(Value::Text(s)) => s.clone(),
            Some(Value::Bytes(b)) => format!("0x{}", hex::encode(b)),
            Some(Value::Int(v)) => v.to_string(),
            Some(Value::Real(v)) => v.to_string(),
            None => default.to_string(),
        }
    }

    pub fn get_geo(&self) -> GeoPoint {
        GeoPoint::new(
            self.get_real("latitude", None, 0.0),
            self.get_real("longitude", None, 0.0),
        )
    }

    pub fn contains(&self, name: &str, index: Option<u32>) -> bool {
        self.values.contains_key(&Self::key(name, index))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &Value)> {
        self.values.iter()
    }
}
