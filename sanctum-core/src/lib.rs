//! # sanctum-core
//!
//! Spell engine for sanctum.
//!
//! This crate provides:
//! - Energy (event record) model and JSON seed conversion
//! - The spell lifecycle trait and built-in spells
//! - The cast loop, one wire round trip per step
//! - Configuration loading

pub mod config;
pub mod energy;
pub mod engine;
pub mod error;
pub mod spell;

pub use config::{CastConfig, CodecConfig, Config, ConfigError, StrategyKind};
pub use energy::Energy;
pub use engine::{CastReport, Caster};
pub use error::CoreError;
pub use spell::{Counter, Echo, Spell};
