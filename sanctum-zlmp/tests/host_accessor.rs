//! Encoding and decoding through a host runtime's own value type.

use sanctum_zlmp::{
    encode, size_of, AllocStrategy, Decoder, Encoder, Kind, Value, ValueSink, ValueSource,
    ZlmpError,
};

/// A small script-runtime value model with kinds the wire cannot carry.
#[derive(Debug, Clone, PartialEq)]
enum HostValue {
    Nil,
    Boolean(bool),
    Integer(i64),
    Number(f64),
    Str(String),
    Table(Vec<(HostValue, HostValue)>),
    Function(&'static str),
    Coroutine,
}

fn mismatch(expected: Kind, found: &HostValue) -> ZlmpError {
    ZlmpError::TypeMismatch {
        expected,
        found: found.kind(),
    }
}

impl ValueSource for HostValue {
    type Entries<'a> = Box<dyn Iterator<Item = (&'a HostValue, &'a HostValue)> + 'a>;

    fn kind(&self) -> Kind {
        match self {
            HostValue::Nil => Kind::Nil,
            HostValue::Boolean(_) => Kind::Bool,
            HostValue::Integer(_) => Kind::Int,
            HostValue::Number(_) => Kind::Float,
            HostValue::Str(_) => Kind::Bytes,
            HostValue::Table(_) => Kind::Map,
            HostValue::Function(_) | HostValue::Coroutine => Kind::Unsupported,
        }
    }

    fn as_bool(&self) -> Result<bool, ZlmpError> {
        match self {
            HostValue::Boolean(b) => Ok(*b),
            other => Err(mismatch(Kind::Bool, other)),
        }
    }

    fn as_int(&self) -> Result<i64, ZlmpError> {
        match self {
            HostValue::Integer(i) => Ok(*i),
            other => Err(mismatch(Kind::Int, other)),
        }
    }

    fn as_float(&self) -> Result<f64, ZlmpError> {
        match self {
            HostValue::Number(f) => Ok(*f),
            other => Err(mismatch(Kind::Float, other)),
        }
    }

    fn as_bytes(&self) -> Result<&[u8], ZlmpError> {
        match self {
            HostValue::Str(s) => Ok(s.as_bytes()),
            other => Err(mismatch(Kind::Bytes, other)),
        }
    }

    fn entries(&self) -> Result<Self::Entries<'_>, ZlmpError> {
        match self {
            // Hash-table iteration order: deliberately not insertion order.
            HostValue::Table(entries) => Ok(Box::new(entries.iter().rev().map(|(k, v)| (k, v)))),
            other => Err(mismatch(Kind::Map, other)),
        }
    }
}

struct HostSink {
    maps_built: usize,
}

impl ValueSink for HostSink {
    type Output = HostValue;
    type Map = Vec<(HostValue, HostValue)>;

    fn make_nil(&mut self) -> HostValue {
        HostValue::Nil
    }

    fn make_bool(&mut self, b: bool) -> HostValue {
        HostValue::Boolean(b)
    }

    fn make_int(&mut self, i: i64) -> HostValue {
        HostValue::Integer(i)
    }

    fn make_float(&mut self, f: f64) -> HostValue {
        HostValue::Number(f)
    }

    fn make_bytes(&mut self, bytes: &[u8]) -> Result<HostValue, ZlmpError> {
        Ok(HostValue::Str(String::from_utf8_lossy(bytes).into_owned()))
    }

    fn make_map(&mut self, capacity: usize) -> Result<Self::Map, ZlmpError> {
        self.maps_built += 1;
        Ok(Vec::with_capacity(capacity))
    }

    fn map_insert(
        &mut self,
        map: &mut Self::Map,
        key: HostValue,
        value: HostValue,
    ) -> Result<(), ZlmpError> {
        map.push((key, value));
        Ok(())
    }

    fn finish_map(&mut self, map: Self::Map) -> HostValue {
        HostValue::Table(map)
    }
}

fn s(text: &str) -> HostValue {
    HostValue::Str(text.to_string())
}

#[test]
fn test_unsupported_entries_are_dropped() {
    let table = HostValue::Table(vec![
        (s("on_event"), HostValue::Function("handler")),
        (s("count"), HostValue::Integer(3)),
    ]);

    let wire = Encoder::new().encode(&table).unwrap();
    let decoded = Decoder::new().decode(wire.as_bytes()).unwrap();
    assert_eq!(decoded.len(), Some(1));
    assert_eq!(decoded.get("count"), Some(&Value::Int(3)));

    // No placeholder bytes for the dropped entry.
    let only_supported = Value::map([("count", 3)]);
    assert_eq!(wire, encode(&only_supported).unwrap());
}

#[test]
fn test_unsupported_key_drops_entry() {
    let table = HostValue::Table(vec![
        (HostValue::Coroutine, s("value")),
        (s("kept"), HostValue::Boolean(true)),
        (HostValue::Function("f"), HostValue::Function("g")),
    ]);
    assert_eq!(size_of(&table).unwrap(), 5 + 5 + 1);

    let wire = Encoder::new().encode(&table).unwrap();
    assert_eq!(&wire.as_bytes()[..5], &[0xdf, 0, 0, 0, 1]);
}

#[test]
fn test_unsupported_top_level_is_empty() {
    let f = HostValue::Function("main");
    assert_eq!(size_of(&f).unwrap(), 0);
    assert!(Encoder::new().encode(&f).unwrap().is_empty());
    assert!(Encoder::new()
        .with_strategy(AllocStrategy::growable())
        .encode(&f)
        .unwrap()
        .is_empty());
}

#[test]
fn test_all_unsupported_map_patches_zero_count() {
    let table = HostValue::Table(vec![
        (s("a"), HostValue::Coroutine),
        (s("b"), HostValue::Function("b")),
    ]);
    let wire = Encoder::new().encode(&table).unwrap();
    assert_eq!(wire.as_bytes(), &[0xdf, 0, 0, 0, 0]);
}

#[test]
fn test_nested_drop_under_growable_strategy() {
    let inner = HostValue::Table(vec![
        (s("cb"), HostValue::Function("cb")),
        (s("x"), HostValue::Number(0.1)),
    ]);
    let table = HostValue::Table(vec![
        (s("inner"), inner),
        (s("big"), HostValue::Str("z".repeat(600))),
    ]);

    let exact = Encoder::new().encode(&table).unwrap();
    let growable = Encoder::new()
        .with_strategy(AllocStrategy::Growable {
            initial_capacity: 2,
        })
        .encode(&table)
        .unwrap();
    assert_eq!(exact, growable);
    assert_eq!(exact.len(), size_of(&table).unwrap());
}

#[test]
fn test_decode_into_host_values() {
    let table = HostValue::Table(vec![
        (s("name"), s("spark")),
        (s("power"), HostValue::Integer(-40000)),
        (s("ratio"), HostValue::Number(0.25)),
        (s("sub"), HostValue::Table(vec![(HostValue::Integer(1), HostValue::Nil)])),
    ]);
    let wire = Encoder::new().encode(&table).unwrap();

    let mut sink = HostSink { maps_built: 0 };
    let decoded = Decoder::new()
        .decode_into(wire.as_bytes(), &mut sink)
        .unwrap();
    assert_eq!(sink.maps_built, 2);

    // Entries were written in reverse iteration order.
    let HostValue::Table(mut entries) = decoded else {
        panic!("expected table");
    };
    entries.reverse();
    assert_eq!(HostValue::Table(entries), table);
}

#[test]
fn test_host_type_mismatch() {
    let err = HostValue::Integer(1).entries().err().unwrap();
    assert_eq!(
        err,
        ZlmpError::TypeMismatch {
            expected: Kind::Map,
            found: Kind::Int
        }
    );
}
