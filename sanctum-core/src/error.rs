//! Core error types.

use sanctum_zlmp::ZlmpError;
use thiserror::Error;

/// Errors from the spell engine.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown spell: {name}")]
    UnknownSpell { name: String },

    #[error("spell '{spell}' failed: {reason}")]
    SpellFailed { spell: String, reason: String },

    #[error("invalid energy: {reason}")]
    InvalidEnergy { reason: String },

    #[error("codec error: {0}")]
    Codec(#[from] ZlmpError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Returns a stable error code for reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            CoreError::UnknownSpell { .. } => "UNKNOWN_SPELL",
            CoreError::SpellFailed { .. } => "SPELL_FAILED",
            CoreError::InvalidEnergy { .. } => "INVALID_ENERGY",
            CoreError::Codec(e) if e.is_corruption() => "CORRUPT_BUFFER",
            CoreError::Codec(_) => "CODEC_ERROR",
            CoreError::Json(_) => "BAD_SEED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = CoreError::UnknownSpell {
            name: "x".to_string(),
        };
        assert_eq!(err.error_code(), "UNKNOWN_SPELL");
        assert!(err.to_string().contains('x'));

        let err = CoreError::from(ZlmpError::UnrecognizedTag {
            tag: 0xc1,
            offset: 0,
        });
        assert_eq!(err.error_code(), "CORRUPT_BUFFER");

        let err = CoreError::from(ZlmpError::DepthExceeded { max: 2 });
        assert_eq!(err.error_code(), "CODEC_ERROR");

        let err = CoreError::SpellFailed {
            spell: "counter".to_string(),
            reason: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "spell 'counter' failed: boom");
    }
}
