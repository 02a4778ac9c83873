//! Energy: one event record flowing through a cast.
//!
//! Seeds are written as JSON. Objects become maps keyed by byte strings and
//! arrays become sequence maps keyed `1..=n`, the way script tables index
//! sequences.

use crate::error::CoreError;
use sanctum_zlmp::Value;
use serde_json::{Map, Number, Value as Json};

/// An event record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Energy(Value);

impl Energy {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Parses a JSON seed document.
    pub fn from_json_str(s: &str) -> Result<Self, CoreError> {
        let json: Json = serde_json::from_str(s)?;
        Ok(Self::from_json(&json))
    }

    pub fn from_json(json: &Json) -> Self {
        Self(json_to_value(json))
    }

    pub fn to_json(&self) -> Json {
        value_to_json(&self.0)
    }
}

impl From<Value> for Energy {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

fn json_to_value(json: &Json) -> Value {
    match json {
        Json::Null => Value::Nil,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Json::String(s) => Value::from(s.as_str()),
        Json::Array(items) => Value::Map(
            items
                .iter()
                .enumerate()
                .map(|(i, item)| (Value::Int(i as i64 + 1), json_to_value(item)))
                .collect(),
        ),
        Json::Object(fields) => Value::Map(
            fields
                .iter()
                .map(|(k, v)| (Value::from(k.as_str()), json_to_value(v)))
                .collect(),
        ),
    }
}

fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Nil => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(i) => Json::Number((*i).into()),
        Value::Float(f) => Number::from_f64(*f).map_or(Json::Null, Json::Number),
        Value::Bytes(b) => Json::String(String::from_utf8_lossy(b).into_owned()),
        Value::Map(entries) => {
            if let Some(items) = as_sequence(entries) {
                return Json::Array(items.into_iter().map(value_to_json).collect());
            }
            let mut object = Map::with_capacity(entries.len());
            for (k, v) in entries {
                object.insert(key_to_string(k), value_to_json(v));
            }
            Json::Object(object)
        }
    }
}

/// Returns the values in key order if the keys are exactly `1..=n`.
fn as_sequence(entries: &[(Value, Value)]) -> Option<Vec<&Value>> {
    if entries.is_empty() {
        return None;
    }
    let mut slots: Vec<Option<&Value>> = vec![None; entries.len()];
    for (k, v) in entries {
        let index = k.as_int()?;
        if index < 1 || index as usize > entries.len() {
            return None;
        }
        let slot = &mut slots[index as usize - 1];
        if slot.is_some() {
            return None;
        }
        *slot = Some(v);
    }
    slots.into_iter().collect()
}

fn key_to_string(key: &Value) -> String {
    match key {
        Value::Nil => "nil".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Bytes(b) => String::from_utf8_lossy(b).into_owned(),
        Value::Map(_) => value_to_json(key).to_string(),
    }
}
