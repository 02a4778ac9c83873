//! zlmp protocol table.
//!
//! Tag byte layout (a MessagePack-compatible subset):
//!
//! ```text
//! 0x00-0x7f  positive fixint          0xca / 0xcb  float32 / float64
//! 0x80-0x8f  fixmap (reserved)        0xcc-0xcf    uint8..uint64 (reserved)
//! 0x90-0x9f  fixarray (reserved)      0xd0-0xd3    int8..int64
//! 0xa0-0xbf  fixbytes, len = low 5    0xd9-0xdb    bytes8 / bytes16 / bytes32
//! 0xc0       nil                      0xdc / 0xdd  array16 / array32 (reserved)
//! 0xc2/0xc3  false / true             0xde / 0xdf  map16 / map32
//! 0xc4-0xc9  bin / ext (reserved)     0xe0-0xff    negative fixint
//! ```
//!
//! All multi-byte payloads (integers, floats, lengths, counts) are
//! big-endian.

use crate::error::ZlmpError;

pub const POSITIVE_FIXINT_MAX: u8 = 0x7f;
pub const FIXMAP_MIN: u8 = 0x80;
pub const FIXMAP_MAX: u8 = 0x8f;
pub const FIXARRAY_MIN: u8 = 0x90;
pub const FIXARRAY_MAX: u8 = 0x9f;
pub const FIXBYTES_MIN: u8 = 0xa0;
pub const FIXBYTES_MAX: u8 = 0xbf;
pub const NIL: u8 = 0xc0;
pub const FALSE: u8 = 0xc2;
pub const TRUE: u8 = 0xc3;
pub const FLOAT32: u8 = 0xca;
pub const FLOAT64: u8 = 0xcb;
pub const INT8: u8 = 0xd0;
pub const INT16: u8 = 0xd1;
pub const INT32: u8 = 0xd2;
pub const INT64: u8 = 0xd3;
pub const BYTES8: u8 = 0xd9;
pub const BYTES16: u8 = 0xda;
pub const BYTES32: u8 = 0xdb;
pub const MAP16: u8 = 0xde;
pub const MAP32: u8 = 0xdf;
pub const NEGATIVE_FIXINT_MIN: u8 = 0xe0;

/// Low bits carrying the payload of fixbytes / negative fixint tags.
pub const FIX5_MASK: u8 = 0x1f;

/// Maximum length representable in a fixbytes tag.
pub const FIXBYTES_MAX_LEN: usize = 31;

/// Encoded size of a map header: tag + 32-bit entry count.
///
/// Maps are always written with the map32 tag, whatever their size.
pub const MAP_HEADER_LEN: usize = 5;

/// Classification of a single tag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagClass {
    PositiveFixint(u8),
    NegativeFixint(i8),
    FixBytes(u8),
    Nil,
    False,
    True,
    Float32,
    Float64,
    Int8,
    Int16,
    Int32,
    Int64,
    Bytes8,
    Bytes16,
    Bytes32,
    Map16,
    Map32,
    /// Reserved or unused by this protocol.
    Unsupported(u8),
}

impl TagClass {
    pub fn classify(tag: u8) -> Self {
        match tag {
            0x00..=POSITIVE_FIXINT_MAX => TagClass::PositiveFixint(tag),
            FIXBYTES_MIN..=FIXBYTES_MAX => TagClass::FixBytes(tag & FIX5_MASK),
            NEGATIVE_FIXINT_MIN..=0xff => TagClass::NegativeFixint(tag as i8),
            NIL => TagClass::Nil,
            FALSE => TagClass::False,
            TRUE => TagClass::True,
            FLOAT32 => TagClass::Float32,
            FLOAT64 => TagClass::Float64,
            INT8 => TagClass::Int8,
            INT16 => TagClass::Int16,
            INT32 => TagClass::Int32,
            INT64 => TagClass::Int64,
            BYTES8 => TagClass::Bytes8,
            BYTES16 => TagClass::Bytes16,
            BYTES32 => TagClass::Bytes32,
            MAP16 => TagClass::Map16,
            MAP32 => TagClass::Map32,
            other => TagClass::Unsupported(other),
        }
    }
}

const I8_MIN: i64 = i8::MIN as i64;
const I16_MIN: i64 = i16::MIN as i64;
const I16_MAX: i64 = i16::MAX as i64;
const I32_MIN: i64 = i32::MIN as i64;
const I32_MAX: i64 = i32::MAX as i64;

/// Narrowest integer encoding for a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntForm {
    PositiveFixint,
    NegativeFixint,
    Int8,
    Int16,
    Int32,
    Int64,
}

impl IntForm {
    /// Picks the narrowest form whose range contains `value`.
    ///
    /// Unsigned tags are never used, so 128..=255 needs an int16.
    pub fn select(value: i64) -> Self {
        match value {
            0..=127 => IntForm::PositiveFixint,
            -32..=-1 => IntForm::NegativeFixint,
            I8_MIN..=-33 => IntForm::Int8,
            I16_MIN..=I16_MAX => IntForm::Int16,
            I32_MIN..=I32_MAX => IntForm::Int32,
            _ => IntForm::Int64,
        }
    }

    /// Total encoded size including the tag byte.
    pub fn encoded_len(self) -> usize {
        match self {
            IntForm::PositiveFixint | IntForm::NegativeFixint => 1,
            IntForm::Int8 => 2,
            IntForm::Int16 => 3,
            IntForm::Int32 => 5,
            IntForm::Int64 => 9,
        }
    }
}

/// Float encoding width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatForm {
    Float32,
    Float64,
}

impl FloatForm {
    /// Float32 iff the value survives a round trip through `f32`.
    ///
    /// NaN, the infinities and both signed zeros always qualify.
    pub fn select(value: f64) -> Self {
        if value.is_nan() || value.is_infinite() || value == 0.0 || (value as f32) as f64 == value
        {
            FloatForm::Float32
        } else {
            FloatForm::Float64
        }
    }

    pub fn tag(self) -> u8 {
        match self {
            FloatForm::Float32 => FLOAT32,
            FloatForm::Float64 => FLOAT64,
        }
    }

    pub fn encoded_len(self) -> usize {
        match self {
            FloatForm::Float32 => 5,
            FloatForm::Float64 => 9,
        }
    }
}

/// Length-prefix form for a byte string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BytesForm {
    Fix,
    Bytes8,
    Bytes16,
    Bytes32,
}

impl BytesForm {
    /// Picks the narrowest length prefix for `len` bytes.
    pub fn select(len: usize) -> Result<Self, ZlmpError> {
        match len {
            0..=FIXBYTES_MAX_LEN => Ok(BytesForm::Fix),
            _ if len <= u8::MAX as usize => Ok(BytesForm::Bytes8),
            _ if len <= u16::MAX as usize => Ok(BytesForm::Bytes16),
            _ if len as u64 <= u32::MAX as u64 => Ok(BytesForm::Bytes32),
            _ => Err(ZlmpError::PayloadTooLarge { len }),
        }
    }

    /// Size of the tag plus length field, excluding the payload.
    pub fn header_len(self) -> usize {
        match self {
            BytesForm::Fix => 1,
            BytesForm::Bytes8 => 2,
            BytesForm::Bytes16 => 3,
            BytesForm::Bytes32 => 5,
        }
    }
}
