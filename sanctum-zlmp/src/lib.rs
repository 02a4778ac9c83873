//! # sanctum-zlmp
//!
//! zlmp, the dynamic-value wire codec used by sanctum.
//!
//! This crate provides:
//! - A MessagePack-compatible binary format for nil, booleans, 64-bit
//!   integers, doubles, byte strings and maps
//! - Minimal-width integer and precision-preserving float encoding
//! - An exact size estimator backing the exact allocation strategy
//! - Accessor traits so any host runtime's values can be encoded and decoded
//!
//! ```
//! use sanctum_zlmp::{decode, encode, Value};
//!
//! let energy = Value::map([("counter", 9)]);
//! let wire = encode(&energy).unwrap();
//! let back = decode(&wire).unwrap();
//! assert_eq!(back.get("counter"), Some(&Value::Int(9)));
//! ```

pub mod accessor;
pub mod buffer;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod size;
pub mod tag;
pub mod value;

pub use accessor::{ValueBuilder, ValueSink, ValueSource};
pub use buffer::{AllocStrategy, WireBuffer};
pub use decoder::{decode, Decoder};
pub use encoder::{encode, Encoder};
pub use error::ZlmpError;
pub use size::{size_of, size_of_bounded};
pub use tag::TagClass;
pub use value::{Kind, Value};

/// Initial buffer capacity for the growable allocation strategy.
pub const DEFAULT_INITIAL_CAPACITY: usize = 256;

/// Default bound on map nesting for encoding and decoding.
pub const DEFAULT_MAX_DEPTH: usize = 128;
