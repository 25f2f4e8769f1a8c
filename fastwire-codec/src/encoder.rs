//! Encode session state.
//!
//! An [`Encoder`] owns the destination buffer and the scoped dictionaries
//! for one encode stream. The per-message presence map is built separately
//! (see [`crate::pmap::PresenceMapBuilder`]) because it must precede the
//! field bytes on the wire, so the caller frames the message: pmap bytes
//! first, then the buffer contents.

use crate::dictionary::{Dictionary, DictionaryScope, DictionarySet};
use bytes::{BufMut, Bytes, BytesMut};

/// FAST encode session.
#[derive(Debug, Default)]
pub struct Encoder {
    buffer: BytesMut,
    dictionaries: DictionarySet,
    current_template: u32,
}

impl Encoder {
    /// Creates a new encoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an encoder with a pre-allocated destination buffer.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Returns the template id in effect for template-scoped dictionaries.
    #[must_use]
    pub const fn current_template(&self) -> u32 {
        self.current_template
    }

    /// Sets the template id for subsequent template-scoped lookups.
    pub fn set_current_template(&mut self, id: u32) {
        self.current_template = id;
    }

    /// Resolves a dictionary scope for the field being encoded.
    pub fn dictionary_mut(&mut self, scope: DictionaryScope, type_ref: &str) -> &mut Dictionary {
        self.dictionaries
            .resolve(scope, self.current_template, type_ref)
    }

    /// Appends a single raw byte to the destination.
    pub fn put_byte(&mut self, byte: u8) {
        self.buffer.put_u8(byte);
    }

    /// Returns the destination buffer for stop-bit writes.
    pub fn buffer_mut(&mut self) -> &mut BytesMut {
        &mut self.buffer
    }

    /// Returns the bytes written so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Returns the destination length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Takes the encoded bytes, leaving the buffer empty but keeping
    /// dictionary state for the next message.
    pub fn take_bytes(&mut self) -> Bytes {
        self.buffer.split().freeze()
    }

    /// Consumes the encoder and returns the encoded bytes.
    #[must_use]
    pub fn finish(self) -> Bytes {
        self.buffer.freeze()
    }

    /// Discards buffered bytes without touching dictionary state.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Clears the buffer and all dictionary state.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.dictionaries.reset();
        self.current_template = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stopbit;
    use fastwire_core::FieldValue;

    #[test]
    fn test_buffer_accumulates() {
        let mut encoder = Encoder::new();
        stopbit::encode_uint(encoder.buffer_mut(), 942);
        encoder.put_byte(stopbit::NULL_BYTE);
        assert_eq!(encoder.as_bytes(), &[0x07, 0xAE, 0x80]);
    }

    #[test]
    fn test_take_bytes_keeps_dictionaries() {
        let mut encoder = Encoder::new();
        encoder
            .dictionary_mut(DictionaryScope::Global, "")
            .add("Qty", FieldValue::UInt32(5));
        encoder.put_byte(0x81);

        let first = encoder.take_bytes();
        assert_eq!(&first[..], &[0x81]);
        assert!(encoder.is_empty());
        assert_eq!(
            encoder.dictionary_mut(DictionaryScope::Global, "").find("Qty"),
            Some(FieldValue::UInt32(5))
        );
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut encoder = Encoder::new();
        encoder.put_byte(0x80);
        encoder
            .dictionary_mut(DictionaryScope::Global, "")
            .add("Qty", FieldValue::UInt32(5));
        encoder.reset();
        assert!(encoder.is_empty());
        assert_eq!(
            encoder.dictionary_mut(DictionaryScope::Global, "").find("Qty"),
            None
        );
    }
}
