//! Test-side reader: walks a finished buffer by the documented layout
//! contract and reconstructs a `serde_json::Value` for comparisons.

use alloc::{string::String, vec::Vec};

use serde_json::{Map, Value as Json};

use crate::layout::{
    CONTAINER_LEN, FORMAT_TAG, FORMAT_VERSION, HEADER_LEN, Value, ValueType, read_u16, read_u32,
};

/// Raw fields of a container record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawContainer {
    pub size: u32,
    pub is_object: bool,
    pub count: u32,
    pub table_offset: u32,
}

pub fn container_at(data: &[u8], base: usize) -> RawContainer {
    let packed = read_u32(data, base + 4);
    RawContainer {
        size: read_u32(data, base),
        is_object: packed & 1 == 1,
        count: packed >> 1,
        table_offset: read_u32(data, base + 8),
    }
}

pub fn root_container(data: &[u8]) -> RawContainer {
    assert_eq!(read_u32(data, 0), FORMAT_TAG, "bad header tag");
    assert_eq!(read_u32(data, 4), FORMAT_VERSION, "bad header version");
    container_at(data, HEADER_LEN as usize)
}

/// Value words of the root array, in table order.
pub fn root_array_values(data: &[u8]) -> Vec<Value> {
    let base = HEADER_LEN as usize;
    let container = container_at(data, base);
    assert!(!container.is_object, "root is not an array");
    let table = base + container.table_offset as usize;
    (0..container.count as usize)
        .map(|i| Value::from_bits(read_u32(data, table + 4 * i)))
        .collect()
}

/// Keys of the root object in entry-table order (the format's sort order).
pub fn root_object_keys(data: &[u8]) -> Vec<String> {
    let base = HEADER_LEN as usize;
    let container = container_at(data, base);
    assert!(container.is_object, "root is not an object");
    let table = base + container.table_offset as usize;
    (0..container.count as usize)
        .map(|i| {
            let entry = base + read_u32(data, table + 4 * i) as usize;
            let value = Value::from_bits(read_u32(data, entry));
            string_at(data, entry + 4, value.latin_key())
        })
        .collect()
}

pub fn string_at(data: &[u8], at: usize, latin: bool) -> String {
    if latin {
        let len = read_u16(data, at) as usize;
        data[at + 2..at + 2 + len].iter().map(|&b| char::from(b)).collect()
    } else {
        let len = read_u32(data, at) as usize;
        let units: Vec<u16> = (0..len).map(|i| read_u16(data, at + 4 + 2 * i)).collect();
        String::from_utf16_lossy(&units)
    }
}

fn read_f64(data: &[u8], at: usize) -> f64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&data[at..at + 8]);
    f64::from_le_bytes(bytes)
}

/// Reconstructs the whole document.
pub fn decode_document(data: &[u8]) -> Json {
    assert_eq!(read_u32(data, 0), FORMAT_TAG, "bad header tag");
    assert_eq!(read_u32(data, 4), FORMAT_VERSION, "bad header version");
    assert!(data.len() >= (HEADER_LEN + CONTAINER_LEN) as usize);
    decode_container(data, HEADER_LEN as usize)
}

fn decode_container(data: &[u8], base: usize) -> Json {
    let container = container_at(data, base);
    assert!(
        base + container.size as usize <= data.len(),
        "container overruns the buffer"
    );
    let table = base + container.table_offset as usize;

    if container.is_object {
        let mut map = Map::new();
        for i in 0..container.count as usize {
            let entry = base + read_u32(data, table + 4 * i) as usize;
            let value = Value::from_bits(read_u32(data, entry));
            let key = string_at(data, entry + 4, value.latin_key());
            map.insert(key, decode_value(data, base, value));
        }
        Json::Object(map)
    } else {
        let values = (0..container.count as usize)
            .map(|i| {
                let value = Value::from_bits(read_u32(data, table + 4 * i));
                decode_value(data, base, value)
            })
            .collect();
        Json::Array(values)
    }
}

fn decode_value(data: &[u8], base: usize, value: Value) -> Json {
    match value.value_type().expect("unknown type tag") {
        ValueType::Null => Json::Null,
        ValueType::Bool => Json::Bool(value.payload() != 0),
        ValueType::Double => {
            if value.latin_or_int() {
                Json::from(i64::from(value.inline_int()))
            } else {
                let double = read_f64(data, base + value.payload() as usize);
                serde_json::Number::from_f64(double)
                    .map(Json::Number)
                    .expect("stored double is not finite")
            }
        }
        ValueType::String => Json::String(string_at(
            data,
            base + value.payload() as usize,
            value.latin_or_int(),
        )),
        ValueType::Array | ValueType::Object => {
            decode_container(data, base + value.payload() as usize)
        }
    }
}

/// The document re-serialized as text with serde_json's deterministic
/// (sorted-key) ordering.
pub fn canonical_text(data: &[u8]) -> String {
    serde_json::to_string(&decode_document(data)).expect("reserialization failed")
}

/// Structural equality that compares numbers by their f64 bit patterns, so
/// an inline integer and the integer it was parsed from agree.
pub fn json_eq(a: &Json, b: &Json) -> bool {
    match (a, b) {
        (Json::Null, Json::Null) => true,
        (Json::Bool(x), Json::Bool(y)) => x == y,
        (Json::String(x), Json::String(y)) => x == y,
        (Json::Number(x), Json::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x.to_bits() == y.to_bits(),
            _ => false,
        },
        (Json::Array(x), Json::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| json_eq(a, b))
        }
        (Json::Object(x), Json::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .zip(y)
                    .all(|((ka, va), (kb, vb))| ka == kb && json_eq(va, vb))
        }
        _ => false,
    }
}
