//! Dynamically typed bus values
//!
//! D-Bus properties and signal bodies arrive as variants. [`BusValue`] is the
//! in-process rendition: one enum covering the shapes the BlueZ object tree
//! actually uses, with `as_*` accessors that return `None` on a type mismatch
//! instead of panicking.

use std::collections::HashMap;

use crate::path::ObjectPath;

/// A dynamically typed value as delivered by the bus
#[derive(Debug, Clone, PartialEq)]
pub enum BusValue {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I16(i16),
    I32(i32),
    I64(i64),
    F64(f64),
    Str(String),
    Path(ObjectPath),
    Bytes(Vec<u8>),
    Array(Vec<BusValue>),
    Dict(HashMap<String, BusValue>),
}

impl BusValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            BusValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u8(&self) -> Option<u8> {
        match self {
            BusValue::U8(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u16(&self) -> Option<u16> {
        match self {
            BusValue::U16(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            BusValue::U32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            BusValue::U64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i16(&self) -> Option<i16> {
        match self {
            BusValue::I16(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            BusValue::I32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            BusValue::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            BusValue::F64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            BusValue::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&ObjectPath> {
        match self {
            BusValue::Path(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            BusValue::Bytes(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[BusValue]> {
        match self {
            BusValue::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&HashMap<String, BusValue>> {
        match self {
            BusValue::Dict(v) => Some(v),
            _ => None,
        }
    }

    /// Short name of the contained type, for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            BusValue::Bool(_) => "bool",
            BusValue::U8(_) => "u8",
            BusValue::U16(_) => "u16",
            BusValue::U32(_) => "u32",
            BusValue::U64(_) => "u64",
            BusValue::I16(_) => "i16",
            BusValue::I32(_) => "i32",
            BusValue::I64(_) => "i64",
            BusValue::F64(_) => "f64",
            BusValue::Str(_) => "string",
            BusValue::Path(_) => "object path",
            BusValue::Bytes(_) => "byte array",
            BusValue::Array(_) => "array",
            BusValue::Dict(_) => "dict",
        }
    }
}

impl From<&str> for BusValue {
    fn from(v: &str) -> Self {
        BusValue::Str(v.to_string())
    }
}

impl From<String> for BusValue {
    fn from(v: String) -> Self {
        BusValue::Str(v)
    }
}

impl From<bool> for BusValue {
    fn from(v: bool) -> Self {
        BusValue::Bool(v)
    }
}

impl From<ObjectPath> for BusValue {
    fn from(v: ObjectPath) -> Self {
        BusValue::Path(v)
    }
}
