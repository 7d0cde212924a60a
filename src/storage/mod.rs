// Storage module - read-only access to the external SQLite table
// The table is owned by another application; we never define or mutate it

pub mod source;

use rusqlite::types::ValueRef;
use serde::Serialize;
use std::fmt;

/// The identifier cell of a row, exactly as SQLite stored it
/// The identifier column has no declared type we can rely on, so every
/// SQLite storage class is accepted
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum RowId {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Null => write!(f, "NULL"),
            RowId::Integer(i) => write!(f, "{}", i),
            RowId::Real(r) => write!(f, "{}", r),
            RowId::Text(s) => write!(f, "{}", s),
            RowId::Blob(b) => write!(f, "{}", String::from_utf8_lossy(b)),
        }
    }
}

impl From<ValueRef<'_>> for RowId {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => RowId::Null,
            ValueRef::Integer(i) => RowId::Integer(i),
            ValueRef::Real(r) => RowId::Real(r),
            ValueRef::Text(t) => RowId::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => RowId::Blob(b.to_vec()),
        }
    }
}

/// The payload cell of a row
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Blob(Vec<u8>),
    /// NULL, INTEGER or REAL: never decodable as a JSON document
    Other,
}

impl Payload {
    /// Best-effort JSON decode
    ///
    /// Returns `None` for anything that is not valid JSON. Callers treat
    /// that as "skip this row", never as an error.
    pub fn decode(&self) -> Option<serde_json::Value> {
        match self {
            Payload::Text(text) => serde_json::from_str(text).ok(),
            Payload::Blob(bytes) => serde_json::from_slice(bytes).ok(),
            Payload::Other => None,
        }
    }
}

impl From<ValueRef<'_>> for Payload {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            // Invalid UTF-8 text can never be valid JSON, so keep the raw bytes
            // and let the decoder reject them
            ValueRef::Text(t) => match std::str::from_utf8(t) {
                Ok(s) => Payload::Text(s.to_string()),
                Err(_) => Payload::Blob(t.to_vec()),
            },
            ValueRef::Blob(b) => Payload::Blob(b.to_vec()),
            ValueRef::Null | ValueRef::Integer(_) | ValueRef::Real(_) => Payload::Other,
        }
    }
}

/// A single row of the scanned table: identifier plus payload
#[derive(Debug, Clone, PartialEq)]
pub struct PayloadRow {
    pub id: RowId,
    pub payload: Payload,
}

impl PayloadRow {
    pub fn new(id: RowId, payload: Payload) -> Self {
        Self { id, payload }
    }
}
