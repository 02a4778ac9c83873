//! Cast loop.
//!
//! Each step packs the current energy into a wire buffer, unpacks it into a
//! fresh value and hands that value to the spell. The round trip normalizes
//! the energy: anything the wire cannot carry is gone before the spell sees
//! it.

use crate::config::{CastConfig, CodecConfig};
use crate::energy::Energy;
use crate::error::CoreError;
use crate::spell::Spell;
use sanctum_zlmp::{Decoder, Encoder, Value, WireBuffer};
use uuid::Uuid;

/// Outcome of a completed cast.
#[derive(Debug, Clone)]
pub struct CastReport {
    /// Identifier used in log lines for this cast.
    pub cast_id: Uuid,
    /// Number of spell invocations performed.
    pub steps: u64,
    /// Total bytes packed across all steps.
    pub bytes_packed: u64,
    /// Energy after the last step.
    pub energy: Energy,
    /// Wire buffer handed to the last step.
    pub last_packet: WireBuffer,
}

/// Runs spells over energy.
pub struct Caster {
    encoder: Encoder,
    decoder: Decoder,
    max_steps: u64,
}

impl Caster {
    pub fn new(codec: &CodecConfig, cast: &CastConfig) -> Self {
        Self {
            encoder: codec.encoder(),
            decoder: codec.decoder(),
            max_steps: cast.max_steps,
        }
    }

    /// Packs and unpacks one energy value.
    pub fn normalize(&self, energy: &Energy) -> Result<(WireBuffer, Energy), CoreError> {
        let packet = self.encoder.encode(energy.value())?;
        let value = self.decoder.decode(packet.as_bytes())?;
        Ok((packet, Energy::new(value)))
    }

    /// Casts `spell` starting from `seed`.
    pub fn cast(&self, spell: &mut dyn Spell, seed: Energy) -> Result<CastReport, CoreError> {
        let cast_id = Uuid::new_v4();
        tracing::info!(
            "Casting '{}' (cast {}, up to {} steps)",
            spell.name(),
            cast_id,
            self.max_steps
        );

        match seed.value() {
            Value::Nil | Value::Map(_) => {}
            other => {
                return Err(CoreError::InvalidEnergy {
                    reason: format!("seed must be a map or nil, found {}", other.kind()),
                })
            }
        }

        spell.begin()?;
        let result = self.run_steps(spell, seed, cast_id);
        spell.end();

        match &result {
            Ok(report) => tracing::info!(
                "Cast {} finished after {} step(s), {} bytes packed",
                cast_id,
                report.steps,
                report.bytes_packed
            ),
            Err(e) => tracing::warn!("Cast {} failed: {}", cast_id, e),
        }
        result
    }

    fn run_steps(
        &self,
        spell: &mut dyn Spell,
        seed: Energy,
        cast_id: Uuid,
    ) -> Result<CastReport, CoreError> {
        let mut energy = seed;
        let mut last_packet = WireBuffer::default();
        let mut bytes_packed = 0u64;
        let mut steps = 0u64;
        let mut ended_by_spell = false;

        while steps < self.max_steps {
            let (packet, normalized) = self.normalize(&energy)?;
            tracing::debug!(
                "Cast {} step {}: energy packed into {} bytes",
                cast_id,
                steps + 1,
                packet.len()
            );
            bytes_packed += packet.len() as u64;
            last_packet = packet;
            steps += 1;

            match spell.cast(normalized.into_value())? {
                Some(next) => energy = Energy::new(next),
                None => {
                    tracing::debug!("Cast {} ended by spell at step {}", cast_id, steps);
                    energy = Energy::default();
                    ended_by_spell = true;
                    break;
                }
            }
        }

        if !ended_by_spell {
            tracing::debug!("Cast {} reached step limit {}", cast_id, self.max_steps);
        }

        Ok(CastReport {
            cast_id,
            steps,
            bytes_packed,
            energy,
            last_packet,
        })
    }
}
