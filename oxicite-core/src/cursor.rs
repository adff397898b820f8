//! Byte-level cursor for ID-byte decoding.
//!
//! This module provides [`ByteCursor`], the single source of position for
//! every decoder in OxiCite. Recipes take it by `&mut`, so two recipes can
//! never observe different read positions.
//!
//! # Storage
//!
//! The bytes are stored reversed so that `pop` is a `Vec::pop` (O(1)),
//! while callers still see them in their original forward order.
//!
//! # Exhaustion
//!
//! Running out of input is not an error at this layer. Every read returns
//! an `Option`, and callers turn `None` into an explicit placeholder.
//!
//! # Example
//!
//! ```
//! use oxicite_core::cursor::ByteCursor;
//!
//! let mut cursor = ByteCursor::new(&[0x8b, 0x81, 0x82]);
//! assert_eq!(cursor.pop(), Some(0x8b));
//! assert_eq!(cursor.pop_u14(), Some((1 << 7) | 2));
//! assert!(cursor.is_empty());
//! assert_eq!(cursor.pop(), None);
//! ```

/// Mask recovering the 7-bit payload of a recipe byte.
pub const PAYLOAD_MASK: u8 = 0x7f;

/// Terminator of variable-length text fields.
pub const TERMINATOR: u8 = 0xff;

/// A forward-reading cursor over an owned, reversed byte buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteCursor {
    /// Unconsumed bytes, last element is the next byte.
    reversed: Vec<u8>,
    /// Number of bytes consumed so far (for diagnostics).
    consumed: usize,
}

impl ByteCursor {
    /// Create a cursor positioned at the first byte of `data`.
    pub fn new(data: &[u8]) -> Self {
        let mut reversed = data.to_vec();
        reversed.reverse();
        Self {
            reversed,
            consumed: 0,
        }
    }

    /// Remove and return the next byte.
    #[inline]
    pub fn pop(&mut self) -> Option<u8> {
        let byte = self.reversed.pop()?;
        self.consumed += 1;
        Some(byte)
    }

    /// Return the next byte without consuming it.
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.reversed.last().copied()
    }

    /// Return the byte `ahead` positions after the next one, without consuming.
    ///
    /// `peek_at(0)` is equivalent to [`peek`](Self::peek).
    pub fn peek_at(&self, ahead: usize) -> Option<u8> {
        let len = self.reversed.len();
        if ahead >= len {
            return None;
        }
        Some(self.reversed[len - 1 - ahead])
    }

    /// Check whether all bytes have been consumed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.reversed.is_empty()
    }

    /// Number of bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.reversed.len()
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.consumed
    }

    /// Discard up to `count` bytes, returning how many were actually skipped.
    pub fn skip(&mut self, count: usize) -> usize {
        let count = count.min(self.reversed.len());
        let new_len = self.reversed.len() - count;
        self.reversed.truncate(new_len);
        self.consumed += count;
        count
    }

    /// Pop one byte and strip its high bit.
    #[inline]
    pub fn pop_masked(&mut self) -> Option<u8> {
        self.pop().map(|b| b & PAYLOAD_MASK)
    }

    /// Pop one byte as a 7-bit character.
    pub fn pop_char(&mut self) -> Option<char> {
        self.pop_masked().map(char::from)
    }

    /// Pop two masked bytes as a 14-bit number, `first << 7 | second`.
    pub fn pop_u14(&mut self) -> Option<u16> {
        let high = self.pop_masked()? as u16;
        let low = self.pop_masked()? as u16;
        Some((high << 7) | low)
    }

    /// Pop two raw bytes as a big-endian `u16`.
    pub fn pop_u16_be(&mut self) -> Option<u16> {
        let high = self.pop()?;
        let low = self.pop()?;
        Some(u16::from_be_bytes([high, low]))
    }

    /// Collect masked characters until `terminator` is seen.
    ///
    /// The terminator is consumed and not included. Returns `None` if the
    /// input ends before a terminator; the bytes read so far are consumed.
    pub fn pop_terminated(&mut self, terminator: u8) -> Option<String> {
        let mut text = String::new();
        loop {
            let byte = self.pop()?;
            if byte == terminator {
                return Some(text);
            }
            text.push(char::from(byte & PAYLOAD_MASK));
        }
    }

    /// Pop a length-prefixed ("Pascal") string of raw 7-bit characters.
    ///
    /// Returns `None` if fewer bytes remain than the length byte announces;
    /// whatever was available is consumed.
    pub fn pop_pascal(&mut self) -> Option<String> {
        let len = self.pop()? as usize;
        if self.remaining() < len {
            self.skip(len);
            return None;
        }
        let mut text = String::with_capacity(len);
        for _ in 0..len {
            text.push(char::from(self.pop()? & PAYLOAD_MASK));
        }
        Some(text)
    }
}

impl From<&[u8]> for ByteCursor {
    fn from(data: &[u8]) -> Self {
        Self::new(data)
    }
}

impl From<Vec<u8>> for ByteCursor {
    fn from(mut data: Vec<u8>) -> Self {
        data.reverse();
        Self {
            reversed: data,
            consumed: 0,
        }
    }
}
