//! Presence map handling.
//!
//! The presence map is an ordered bit sequence, one bit per operator
//! occurrence that needs one, indicating whether that field's value appears
//! on the wire for the current message. On the wire it shares the stop-bit
//! framing of integers: 7 bits per byte, high bit of the last byte set.
//!
//! Decode and encode sides are split: [`PresenceMap`] is a consuming cursor
//! over bits read from the wire, [`PresenceMapBuilder`] appends bits in
//! field declaration order while encoding.

use crate::error::FastError;

/// Decode-side presence map cursor.
///
/// Bits are consumed in strict schema declaration order; reading past the
/// end yields `false`, per the FAST rule that absent trailing bits are zero.
#[derive(Debug, Clone)]
pub struct PresenceMap {
    bits: Vec<bool>,
    position: usize,
}

impl PresenceMap {
    /// Creates an empty presence map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bits: Vec::new(),
            position: 0,
        }
    }

    /// Creates a presence map from explicit bits.
    #[must_use]
    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits, position: 0 }
    }

    /// Decodes a presence map from the wire, advancing `pos`.
    ///
    /// # Errors
    /// Returns `FastError::UnexpectedEof` if the input ends before a stop
    /// bit is seen.
    pub fn decode(data: &[u8], pos: &mut usize) -> Result<Self, FastError> {
        let mut bits = Vec::new();

        loop {
            if *pos >= data.len() {
                return Err(FastError::UnexpectedEof);
            }

            let byte = data[*pos];
            *pos += 1;

            for i in (0..7).rev() {
                bits.push((byte >> i) & 1 == 1);
            }

            if byte & 0x80 != 0 {
                break;
            }
        }

        Ok(Self { bits, position: 0 })
    }

    /// Consumes and returns the next bit.
    #[inline]
    pub fn check_next_field(&mut self) -> bool {
        if self.position < self.bits.len() {
            let bit = self.bits[self.position];
            self.position += 1;
            bit
        } else {
            false
        }
    }

    /// Returns the bit at `index` without consuming anything.
    #[must_use]
    pub fn bit(&self, index: usize) -> bool {
        self.bits.get(index).copied().unwrap_or(false)
    }

    /// Returns the number of bits carried by the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Returns true if the map carries no bits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Returns the cursor position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Rewinds the cursor to the first bit.
    pub fn rewind(&mut self) {
        self.position = 0;
    }
}

impl Default for PresenceMap {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode-side presence map accumulator.
#[derive(Debug, Clone, Default)]
pub struct PresenceMapBuilder {
    bits: Vec<bool>,
}

impl PresenceMapBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the next bit in field declaration order.
    #[inline]
    pub fn set_next_field(&mut self, present: bool) {
        self.bits.push(present);
    }

    /// Returns the number of bits appended so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Returns true if no bits have been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Returns the bit at `index`, `false` past the end.
    #[must_use]
    pub fn bit(&self, index: usize) -> bool {
        self.bits.get(index).copied().unwrap_or(false)
    }

    /// Encodes the accumulated bits with stop-bit framing.
    ///
    /// An empty map still occupies one byte on the wire.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        if self.bits.is_empty() {
            return vec![0x80];
        }

        let mut result = Vec::new();
        let mut bit_index = 0;

        while bit_index < self.bits.len() {
            let mut byte: u8 = 0;

            for i in (0..7).rev() {
                if bit_index < self.bits.len() && self.bits[bit_index] {
                    byte |= 1 << i;
                }
                bit_index += 1;
            }

            if bit_index >= self.bits.len() {
                byte |= 0x80;
            }

            result.push(byte);
        }

        result
    }

    /// Finishes the builder into a decode-side map, for loopback use.
    #[must_use]
    pub fn build(self) -> PresenceMap {
        PresenceMap::from_bits(self.bits)
    }
}
