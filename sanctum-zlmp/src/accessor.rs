//! Boundary between the codec and a host runtime's values.
//!
//! The encoder reads through [`ValueSource`] and the decoder builds through
//! [`ValueSink`], so the codec never names the host value type. [`Value`]
//! implements both sides and serves as the default host.

use crate::error::ZlmpError;
use crate::value::{Kind, Value};

/// Read access to a host value tree.
///
/// The scalar accessors are only valid for the matching [`Kind`]; they
/// return [`ZlmpError::TypeMismatch`] otherwise.
pub trait ValueSource {
    /// Iterator over map entries.
    ///
    /// One-shot and finite. Order is unspecified and may differ between calls.
    type Entries<'a>: Iterator<Item = (&'a Self, &'a Self)>
    where
        Self: 'a;

    fn kind(&self) -> Kind;

    fn as_bool(&self) -> Result<bool, ZlmpError>;

    fn as_int(&self) -> Result<i64, ZlmpError>;

    fn as_float(&self) -> Result<f64, ZlmpError>;

    fn as_bytes(&self) -> Result<&[u8], ZlmpError>;

    fn entries(&self) -> Result<Self::Entries<'_>, ZlmpError>;
}

/// Construction of host values during decoding.
pub trait ValueSink {
    type Output;
    /// A map under construction.
    type Map;

    fn make_nil(&mut self) -> Self::Output;

    fn make_bool(&mut self, b: bool) -> Self::Output;

    fn make_int(&mut self, i: i64) -> Self::Output;

    fn make_float(&mut self, f: f64) -> Self::Output;

    fn make_bytes(&mut self, bytes: &[u8]) -> Result<Self::Output, ZlmpError>;

    /// Starts a map expected to hold about `capacity` entries.
    fn make_map(&mut self, capacity: usize) -> Result<Self::Map, ZlmpError>;

    fn map_insert(
        &mut self,
        map: &mut Self::Map,
        key: Self::Output,
        value: Self::Output,
    ) -> Result<(), ZlmpError>;

    fn finish_map(&mut self, map: Self::Map) -> Self::Output;
}

pub(crate) fn mismatch(expected: Kind, found: Kind) -> ZlmpError {
    ZlmpError::TypeMismatch { expected, found }
}

/// Entry iterator for [`Value`] maps.
pub struct MapEntries<'a>(std::slice::Iter<'a, (Value, Value)>);

impl<'a> Iterator for MapEntries<'a> {
    type Item = (&'a Value, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl ValueSource for Value {
    type Entries<'a> = MapEntries<'a>;

    fn kind(&self) -> Kind {
        Value::kind(self)
    }

    fn as_bool(&self) -> Result<bool, ZlmpError> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(mismatch(Kind::Bool, other.kind())),
        }
    }

    fn as_int(&self) -> Result<i64, ZlmpError> {
        match self {
            Value::Int(i) => Ok(*i),
            other => Err(mismatch(Kind::Int, other.kind())),
        }
    }

    fn as_float(&self) -> Result<f64, ZlmpError> {
        match self {
            Value::Float(f) => Ok(*f),
            other => Err(mismatch(Kind::Float, other.kind())),
        }
    }

    fn as_bytes(&self) -> Result<&[u8], ZlmpError> {
        match self {
            Value::Bytes(b) => Ok(b),
            other => Err(mismatch(Kind::Bytes, other.kind())),
        }
    }

    fn entries(&self) -> Result<MapEntries<'_>, ZlmpError> {
        match self {
            Value::Map(entries) => Ok(MapEntries(entries.iter())),
            other => Err(mismatch(Kind::Map, other.kind())),
        }
    }
}

/// Builds owned [`Value`] trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueBuilder;

impl ValueSink for ValueBuilder {
    type Output = Value;
    type Map = Vec<(Value, Value)>;

    fn make_nil(&mut self) -> Value {
        Value::Nil
    }

    fn make_bool(&mut self, b: bool) -> Value {
        Value::Bool(b)
    }

    fn make_int(&mut self, i: i64) -> Value {
        Value::Int(i)
    }

    fn make_float(&mut self, f: f64) -> Value {
        Value::Float(f)
    }

    fn make_bytes(&mut self, bytes: &[u8]) -> Result<Value, ZlmpError> {
        let mut owned = Vec::new();
        owned
            .try_reserve_exact(bytes.len())
            .map_err(|_| ZlmpError::AllocationFailure {
                requested: bytes.len(),
            })?;
        owned.extend_from_slice(bytes);
        Ok(Value::Bytes(owned))
    }

    fn make_map(&mut self, capacity: usize) -> Result<Self::Map, ZlmpError> {
        let mut entries = Vec::new();
        entries
            .try_reserve_exact(capacity)
            .map_err(|_| ZlmpError::AllocationFailure {
                requested: capacity.saturating_mul(std::mem::size_of::<(Value, Value)>()),
            })?;
        Ok(entries)
    }

    fn map_insert(
        &mut self,
        map: &mut Self::Map,
        key: Value,
        value: Value,
    ) -> Result<(), ZlmpError> {
        map.try_reserve(1)
            .map_err(|_| ZlmpError::AllocationFailure {
                requested: std::mem::size_of::<(Value, Value)>(),
            })?;
        map.push((key, value));
        Ok(())
    }

    fn finish_map(&mut self, map: Self::Map) -> Value {
        Value::Map(map)
    }
}
