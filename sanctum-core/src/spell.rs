//! Spell lifecycle and built-in spells.
//!
//! A spell is invoked once per step with the current energy and returns the
//! energy for the next step, or `None` to end the cast.

use crate::error::CoreError;
use sanctum_zlmp::Value;

/// A user-defined processing step.
pub trait Spell {
    fn name(&self) -> &str;

    /// Called once before the first step.
    fn begin(&mut self) -> Result<(), CoreError> {
        Ok(())
    }

    fn cast(&mut self, energy: Value) -> Result<Option<Value>, CoreError>;

    /// Called once after the last step, including when a step failed.
    fn end(&mut self) {}
}

/// Increments the integer field `counter`, creating it at 1 if absent.
#[derive(Debug, Default)]
pub struct Counter;

impl Counter {
    const FIELD: &'static str = "counter";

    fn fail(&self, reason: impl Into<String>) -> CoreError {
        CoreError::SpellFailed {
            spell: self.name().to_string(),
            reason: reason.into(),
        }
    }
}

impl Spell for Counter {
    fn name(&self) -> &str {
        "counter"
    }

    fn cast(&mut self, mut energy: Value) -> Result<Option<Value>, CoreError> {
        if energy.is_nil() {
            energy = Value::Map(Vec::new());
        }
        let found = energy.kind();
        let Value::Map(entries) = &mut energy else {
            return Err(self.fail(format!("map expected, found {}", found)));
        };

        match entries
            .iter_mut()
            .find(|(k, _)| k.as_bytes() == Some(Self::FIELD.as_bytes()))
        {
            Some((_, Value::Int(n))) => {
                *n = n
                    .checked_add(1)
                    .ok_or_else(|| self.fail("counter overflow"))?;
            }
            Some((_, other)) => {
                let kind = other.kind();
                return Err(self.fail(format!("'{}' is {}, not int", Self::FIELD, kind)));
            }
            None => entries.push((Value::from(Self::FIELD), Value::Int(1))),
        }
        Ok(Some(energy))
    }
}

/// Returns its energy unchanged.
#[derive(Debug, Default)]
pub struct Echo;

impl Spell for Echo {
    fn name(&self) -> &str {
        "echo"
    }

    fn cast(&mut self, energy: Value) -> Result<Option<Value>, CoreError> {
        Ok(Some(energy))
    }
}

/// Names of the built-in spells.
pub fn names() -> &'static [&'static str] {
    &["counter", "echo"]
}

/// Looks up a built-in spell by name.
pub fn by_name(name: &str) -> Result<Box<dyn Spell>, CoreError> {
    match name {
        "counter" => Ok(Box::new(Counter)),
        "echo" => Ok(Box::new(Echo)),
        _ => Err(CoreError::UnknownSpell {
            name: name.to_string(),
        }),
    }
}
