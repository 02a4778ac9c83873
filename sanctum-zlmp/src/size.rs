//! Exact encoded-size computation.
//!
//! Mirrors the encoder's tag selection through the shared forms in
//! [`crate::tag`]; the result is the exact length `encode` produces, not
//! an upper bound.

use crate::accessor::ValueSource;
use crate::error::ZlmpError;
use crate::tag::{BytesForm, FloatForm, IntForm, MAP_HEADER_LEN};
use crate::value::Kind;
use crate::DEFAULT_MAX_DEPTH;

/// Returns the number of bytes `value` encodes to.
pub fn size_of<V: ValueSource + ?Sized>(value: &V) -> Result<usize, ZlmpError> {
    size_of_bounded(value, DEFAULT_MAX_DEPTH)
}

/// Like [`size_of`], failing with `DepthExceeded` past `max_depth` nested maps.
pub fn size_of_bounded<V: ValueSource + ?Sized>(
    value: &V,
    max_depth: usize,
) -> Result<usize, ZlmpError> {
    estimate(value, 0, max_depth)
}

fn estimate<V: ValueSource + ?Sized>(
    value: &V,
    depth: usize,
    max_depth: usize,
) -> Result<usize, ZlmpError> {
    let size = match value.kind() {
        Kind::Nil | Kind::Bool => 1,
        Kind::Int => IntForm::select(value.as_int()?).encoded_len(),
        Kind::Float => FloatForm::select(value.as_float()?).encoded_len(),
        Kind::Bytes => {
            let len = value.as_bytes()?.len();
            BytesForm::select(len)?.header_len() + len
        }
        Kind::Map => {
            if depth >= max_depth {
                return Err(ZlmpError::DepthExceeded { max: max_depth });
            }
            let mut total = MAP_HEADER_LEN;
            let mut written = 0usize;
            for (k, v) in value.entries()? {
                if !k.kind().is_serializable() || !v.kind().is_serializable() {
                    continue;
                }
                total += estimate(k, depth + 1, max_depth)?;
                total += estimate(v, depth + 1, max_depth)?;
                written += 1;
            }
            if written as u64 > u32::MAX as u64 {
                return Err(ZlmpError::PayloadTooLarge { len: written });
            }
            total
        }
        Kind::Unsupported => 0,
    };
    Ok(size)
}
