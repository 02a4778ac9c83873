//! Value packing.
//!
//! Maps are written as a map32 tag, a 4-byte count placeholder, then the
//! entries. The placeholder is patched once the number of written entries
//! is known. Entries whose key or value has no wire representation are
//! skipped without leaving any bytes behind.

use crate::accessor::ValueSource;
use crate::buffer::{AllocStrategy, WireBuffer};
use crate::error::ZlmpError;
use crate::size::size_of_bounded;
use crate::tag::{self, BytesForm, FloatForm, IntForm};
use crate::value::{Kind, Value};
use crate::DEFAULT_MAX_DEPTH;
use bytes::BufMut;

/// Encodes `value` with the default configuration (exact allocation).
pub fn encode(value: &Value) -> Result<WireBuffer, ZlmpError> {
    Encoder::new().encode(value)
}

/// Configurable value encoder.
#[derive(Debug, Clone, Copy)]
pub struct Encoder {
    strategy: AllocStrategy,
    max_depth: usize,
}

impl Encoder {
    pub fn new() -> Self {
        Self {
            strategy: AllocStrategy::Exact,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_strategy(mut self, strategy: AllocStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Maximum number of nested maps accepted.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn strategy(&self) -> AllocStrategy {
        self.strategy
    }

    pub fn encode<V: ValueSource + ?Sized>(&self, value: &V) -> Result<WireBuffer, ZlmpError> {
        match self.strategy {
            AllocStrategy::Exact => {
                let estimated = size_of_bounded(value, self.max_depth)?;
                let mut packer = Packer::exact(estimated)?;
                packer.pack(value, 0, self.max_depth)?;
                let actual = packer.position();
                debug_assert_eq!(actual, estimated, "size estimator diverged from encoder");
                if actual != estimated {
                    return Err(ZlmpError::SizeMismatch { estimated, actual });
                }
                Ok(packer.finish())
            }
            AllocStrategy::Growable { initial_capacity } => {
                let mut packer = Packer::growable(initial_capacity)?;
                packer.pack(value, 0, self.max_depth)?;
                Ok(packer.finish())
            }
        }
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Output cursor over a byte vector.
///
/// With a limit set (exact strategy) the buffer never grows; a write past
/// the limit is a size mismatch.
struct Packer {
    buf: Vec<u8>,
    limit: Option<usize>,
}

impl Packer {
    fn exact(size: usize) -> Result<Self, ZlmpError> {
        Ok(Self {
            buf: allocate(size)?,
            limit: Some(size),
        })
    }

    fn growable(initial_capacity: usize) -> Result<Self, ZlmpError> {
        Ok(Self {
            buf: allocate(initial_capacity)?,
            limit: None,
        })
    }

    fn position(&self) -> usize {
        self.buf.len()
    }

    fn reserve(&mut self, additional: usize) -> Result<(), ZlmpError> {
        let needed = self
            .buf
            .len()
            .checked_add(additional)
            .ok_or(ZlmpError::AllocationFailure {
                requested: usize::MAX,
            })?;

        match self.limit {
            Some(limit) if needed > limit => Err(ZlmpError::SizeMismatch {
                estimated: limit,
                actual: needed,
            }),
            Some(_) => Ok(()),
            None if needed > self.buf.capacity() => {
                let target = needed.max(self.buf.capacity().saturating_mul(2));
                self.buf
                    .try_reserve_exact(target - self.buf.len())
                    .map_err(|_| ZlmpError::AllocationFailure { requested: target })
            }
            None => Ok(()),
        }
    }

    fn pack<V: ValueSource + ?Sized>(
        &mut self,
        value: &V,
        depth: usize,
        max_depth: usize,
    ) -> Result<(), ZlmpError> {
        match value.kind() {
            Kind::Nil => {
                self.reserve(1)?;
                self.buf.put_u8(tag::NIL);
            }
            Kind::Bool => {
                let b = value.as_bool()?;
                self.reserve(1)?;
                self.buf.put_u8(if b { tag::TRUE } else { tag::FALSE });
            }
            Kind::Int => self.pack_int(value.as_int()?)?,
            Kind::Float => self.pack_float(value.as_float()?)?,
            Kind::Bytes => self.pack_bytes(value.as_bytes()?)?,
            Kind::Map => {
                if depth >= max_depth {
                    return Err(ZlmpError::DepthExceeded { max: max_depth });
                }
                self.reserve(tag::MAP_HEADER_LEN)?;
                self.buf.put_u8(tag::MAP32);
                // An index, not a pointer: nested writes may reallocate.
                let count_offset = self.position();
                self.buf.put_u32(0);

                let mut written: u64 = 0;
                for (k, v) in value.entries()? {
                    if !k.kind().is_serializable() || !v.kind().is_serializable() {
                        continue;
                    }
                    self.pack(k, depth + 1, max_depth)?;
                    self.pack(v, depth + 1, max_depth)?;
                    written += 1;
                }

                let count = u32::try_from(written).map_err(|_| ZlmpError::PayloadTooLarge {
                    len: written as usize,
                })?;
                self.buf[count_offset..count_offset + 4].copy_from_slice(&count.to_be_bytes());
            }
            Kind::Unsupported => {}
        }
        Ok(())
    }

    fn pack_int(&mut self, i: i64) -> Result<(), ZlmpError> {
        let form = IntForm::select(i);
        self.reserve(form.encoded_len())?;
        match form {
            // Both fixint ranges are the low byte of the two's complement value.
            IntForm::PositiveFixint | IntForm::NegativeFixint => self.buf.put_i8(i as i8),
            IntForm::Int8 => {
                self.buf.put_u8(tag::INT8);
                self.buf.put_i8(i as i8);
            }
            IntForm::Int16 => {
                self.buf.put_u8(tag::INT16);
                self.buf.put_i16(i as i16);
            }
            IntForm::Int32 => {
                self.buf.put_u8(tag::INT32);
                self.buf.put_i32(i as i32);
            }
            IntForm::Int64 => {
                self.buf.put_u8(tag::INT64);
                self.buf.put_i64(i);
            }
        }
        Ok(())
    }

    fn pack_float(&mut self, f: f64) -> Result<(), ZlmpError> {
        let form = FloatForm::select(f);
        self.reserve(form.encoded_len())?;
        self.buf.put_u8(form.tag());
        match form {
            FloatForm::Float32 => self.buf.put_f32(f as f32),
            FloatForm::Float64 => self.buf.put_f64(f),
        }
        Ok(())
    }

    fn pack_bytes(&mut self, bytes: &[u8]) -> Result<(), ZlmpError> {
        let len = bytes.len();
        let form = BytesForm::select(len)?;
        self.reserve(form.header_len() + len)?;
        match form {
            BytesForm::Fix => self.buf.put_u8(tag::FIXBYTES_MIN | len as u8),
            BytesForm::Bytes8 => {
                self.buf.put_u8(tag::BYTES8);
                self.buf.put_u8(len as u8);
            }
            BytesForm::Bytes16 => {
                self.buf.put_u8(tag::BYTES16);
                self.buf.put_u16(len as u16);
            }
            BytesForm::Bytes32 => {
                self.buf.put_u8(tag::BYTES32);
                self.buf.put_u32(len as u32);
            }
        }
        self.buf.put_slice(bytes);
        Ok(())
    }

    fn finish(self) -> WireBuffer {
        WireBuffer::from(self.buf)
    }
}

fn allocate(capacity: usize) -> Result<Vec<u8>, ZlmpError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(capacity)
        .map_err(|_| ZlmpError::AllocationFailure {
            requested: capacity,
        })?;
    Ok(buf)
}
