//! Tag-dispatch value reader.

use crate::accessor::{ValueBuilder, ValueSink};
use crate::buffer::WireBuffer;
use crate::error::ZlmpError;
use crate::tag::TagClass;
use crate::value::Value;
use crate::DEFAULT_MAX_DEPTH;
use bytes::Buf;

/// Decodes a wire buffer produced by [`crate::encode`].
pub fn decode(buf: &WireBuffer) -> Result<Value, ZlmpError> {
    Decoder::new().decode(buf.as_bytes())
}

/// Configurable value decoder.
#[derive(Debug, Clone, Copy)]
pub struct Decoder {
    max_depth: usize,
}

impl Decoder {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Maximum number of nested maps accepted.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Decodes `input` into an owned [`Value`].
    pub fn decode(&self, input: &[u8]) -> Result<Value, ZlmpError> {
        self.decode_into(input, &mut ValueBuilder)
    }

    /// Decodes `input` through a host sink.
    ///
    /// The whole buffer must be consumed by exactly one value.
    pub fn decode_into<S: ValueSink>(
        &self,
        input: &[u8],
        sink: &mut S,
    ) -> Result<S::Output, ZlmpError> {
        let mut reader = Reader { input, pos: 0 };
        let value = reader.read_value(sink, 0, self.max_depth)?;
        if reader.pos != input.len() {
            return Err(ZlmpError::TrailingBytes {
                consumed: reader.pos,
                len: input.len(),
            });
        }
        Ok(value)
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

struct Reader<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], ZlmpError> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(ZlmpError::Truncated {
                offset: self.pos,
                needed: n - remaining,
            });
        }
        let slice = &self.input[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_value<S: ValueSink>(
        &mut self,
        sink: &mut S,
        depth: usize,
        max_depth: usize,
    ) -> Result<S::Output, ZlmpError> {
        let offset = self.pos;
        let tag = self.take(1)?.get_u8();

        match TagClass::classify(tag) {
            TagClass::Nil => Ok(sink.make_nil()),
            TagClass::False => Ok(sink.make_bool(false)),
            TagClass::True => Ok(sink.make_bool(true)),
            TagClass::PositiveFixint(v) => Ok(sink.make_int(v as i64)),
            TagClass::NegativeFixint(v) => Ok(sink.make_int(v as i64)),
            TagClass::Int8 => Ok(sink.make_int(self.take(1)?.get_i8() as i64)),
            TagClass::Int16 => Ok(sink.make_int(self.take(2)?.get_i16() as i64)),
            TagClass::Int32 => Ok(sink.make_int(self.take(4)?.get_i32() as i64)),
            TagClass::Int64 => Ok(sink.make_int(self.take(8)?.get_i64())),
            TagClass::Float32 => Ok(sink.make_float(self.take(4)?.get_f32() as f64)),
            TagClass::Float64 => Ok(sink.make_float(self.take(8)?.get_f64())),
            TagClass::FixBytes(len) => self.read_bytes(sink, len as usize),
            TagClass::Bytes8 => {
                let len = self.take(1)?.get_u8() as usize;
                self.read_bytes(sink, len)
            }
            TagClass::Bytes16 => {
                let len = self.take(2)?.get_u16() as usize;
                self.read_bytes(sink, len)
            }
            TagClass::Bytes32 => {
                let len = self.take(4)?.get_u32() as usize;
                self.read_bytes(sink, len)
            }
            TagClass::Map16 => {
                let count = self.take(2)?.get_u16() as usize;
                self.read_map(sink, count, depth, max_depth)
            }
            TagClass::Map32 => {
                let count = self.take(4)?.get_u32() as usize;
                self.read_map(sink, count, depth, max_depth)
            }
            TagClass::Unsupported(tag) => Err(ZlmpError::UnrecognizedTag { tag, offset }),
        }
    }

    fn read_bytes<S: ValueSink>(&mut self, sink: &mut S, len: usize) -> Result<S::Output, ZlmpError> {
        let bytes = self.take(len)?;
        sink.make_bytes(bytes)
    }

    fn read_map<S: ValueSink>(
        &mut self,
        sink: &mut S,
        count: usize,
        depth: usize,
        max_depth: usize,
    ) -> Result<S::Output, ZlmpError> {
        if depth >= max_depth {
            return Err(ZlmpError::DepthExceeded { max: max_depth });
        }
        // Every entry takes at least two bytes, so a forged count cannot
        // reserve more than the input could actually describe.
        let hint = count.min(self.remaining() / 2);
        let mut map = sink.make_map(hint)?;
        for _ in 0..count {
            let key = self.read_value(sink, depth + 1, max_depth)?;
            let value = self.read_value(sink, depth + 1, max_depth)?;
            sink.map_insert(&mut map, key, value)?;
        }
        Ok(sink.finish_map(map))
    }
}
