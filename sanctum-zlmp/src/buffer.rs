//! Wire buffers and allocation strategies.

use bytes::Bytes;

/// How the encoder sizes its output buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AllocStrategy {
    /// Run the size estimator first and allocate exactly that many bytes.
    #[default]
    Exact,
    /// Start at `initial_capacity` and double as needed. Skips the
    /// estimation pass over very large values.
    Growable { initial_capacity: usize },
}

impl AllocStrategy {
    pub fn growable() -> Self {
        AllocStrategy::Growable {
            initial_capacity: crate::DEFAULT_INITIAL_CAPACITY,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, AllocStrategy::Exact)
    }
}

/// An encoded value.
///
/// Opaque to callers: hand it whole to the decoder.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WireBuffer(Bytes);

impl WireBuffer {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl AsRef<[u8]> for WireBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Bytes> for WireBuffer {
    fn from(bytes: Bytes) -> Self {
        Self(bytes)
    }
}

impl From<Vec<u8>> for WireBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Bytes::from(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_default() {
        assert!(AllocStrategy::default().is_exact());
        assert_eq!(
            AllocStrategy::growable(),
            AllocStrategy::Growable {
                initial_capacity: crate::DEFAULT_INITIAL_CAPACITY
            }
        );
        assert!(!AllocStrategy::growable().is_exact());
    }

    #[test]
    fn test_wire_buffer() {
        let buf = WireBuffer::from(vec![0xc0]);
        assert_eq!(buf.len(), 1);
        assert!(!buf.is_empty());
        assert_eq!(buf.as_bytes(), &[0xc0]);
        assert_eq!(buf.clone().into_bytes(), Bytes::from_static(&[0xc0]));
        assert!(WireBuffer::default().is_empty());
    }
}
