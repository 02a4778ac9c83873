//! Codec error types.

use crate::value::Kind;
use thiserror::Error;

/// Errors that abort an encode or decode call.
///
/// There is no partial-result mode: any error discards whatever had been
/// written or read so far.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ZlmpError {
    #[error("type mismatch: {expected} expected, found {found}")]
    TypeMismatch { expected: Kind, found: Kind },

    #[error("unrecognized tag {tag:#04x} at offset {offset}")]
    UnrecognizedTag { tag: u8, offset: usize },

    #[error("allocation of {requested} bytes failed")]
    AllocationFailure { requested: usize },

    #[error("size mismatch: estimated {estimated} bytes, encoded {actual}")]
    SizeMismatch { estimated: usize, actual: usize },

    #[error("truncated input at offset {offset}: need {needed} more bytes")]
    Truncated { offset: usize, needed: usize },

    #[error("trailing bytes: decoded {consumed} of {len} bytes")]
    TrailingBytes { consumed: usize, len: usize },

    #[error("nesting depth exceeds {max}")]
    DepthExceeded { max: usize },

    #[error("payload too large: {len} (max {})", u32::MAX)]
    PayloadTooLarge { len: usize },
}

impl ZlmpError {
    /// Returns whether this error means the input buffer is malformed.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            ZlmpError::UnrecognizedTag { .. }
                | ZlmpError::Truncated { .. }
                | ZlmpError::TrailingBytes { .. }
        )
    }
}
