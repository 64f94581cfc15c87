#![no_main]
use arbitrary::Arbitrary;
use jsonpack::{ParserOptions, parse, parse_with_options};
use libfuzzer_sys::fuzz_target;
use serde_json::{Map, Value};

/// An arbitrary JSON document with a container root, mirroring what the
/// parser accepts.
#[derive(Debug)]
struct ArbitraryDoc(Value);

#[derive(Debug)]
struct ArbitraryValue(Value);

impl<'a> Arbitrary<'a> for ArbitraryValue {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let node_type = u.choose_index(21)?;
        let value = match node_type {
            0 => Value::Null,
            1 => Value::Bool(u.arbitrary()?),
            2 => {
                let n: f64 = u.arbitrary()?;
                Value::Number(
                    serde_json::Number::from_f64(n).ok_or(arbitrary::Error::IncorrectFormat)?,
                )
            }
            3 => Value::from(u.arbitrary::<i32>()?),
            4..=10 => Value::String(u.arbitrary()?),
            11..=15 => {
                let elems: Vec<ArbitraryValue> = u.arbitrary()?;
                Value::Array(elems.into_iter().map(|v| v.0).collect())
            }
            16..=20 => {
                let m: Vec<(String, ArbitraryValue)> = u.arbitrary()?;
                Value::Object(Map::from_iter(m.into_iter().map(|(k, v)| (k, v.0))))
            }
            _ => Err(arbitrary::Error::IncorrectFormat)?,
        };
        Ok(ArbitraryValue(value))
    }
}

impl<'a> Arbitrary<'a> for ArbitraryDoc {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let root = if u.arbitrary()? {
            let elems: Vec<ArbitraryValue> = u.arbitrary()?;
            Value::Array(elems.into_iter().map(|v| v.0).collect())
        } else {
            let m: Vec<(String, ArbitraryValue)> = u.arbitrary()?;
            Value::Object(Map::from_iter(m.into_iter().map(|(k, v)| (k, v.0))))
        };
        Ok(ArbitraryDoc(root))
    }
}

/// Non-characters are valid Rust chars but not interchangeable JSON; the
/// encoder rejects them by design, so keep them out of must-parse input.
fn contains_non_character(value: &Value) -> bool {
    let is_non_char =
        |s: &str| s.chars().any(|c| (c as u32 & 0xfffe) == 0xfffe || (0xfdd0..=0xfdef).contains(&(c as u32)));
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) => false,
        Value::String(s) => is_non_char(s),
        Value::Array(values) => values.iter().any(contains_non_character),
        Value::Object(map) => {
            map.keys().any(|k| is_non_char(k)) || map.values().any(contains_non_character)
        }
    }
}

fuzz_target!(|data: &[u8]| {
    // Raw bytes: must never panic, whatever the input.
    let _ = parse(data);
    let _ = parse_with_options(data, ParserOptions { strict_escapes: true });

    // Structured mode: a serialized well-formed document must parse and
    // uphold the output invariants.
    let mut u = arbitrary::Unstructured::new(data);
    if let Ok(doc) = ArbitraryDoc::arbitrary(&mut u) {
        if contains_non_character(&doc.0) {
            return;
        }
        let text = serde_json::to_vec(&doc.0).expect("serialization failed");
        let parsed = parse(&text).expect("well-formed document must parse");
        assert_eq!(parsed.len() % 4, 0);
        assert!(parsed.len() >= 20);
    }
});
