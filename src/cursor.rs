//! Bounds-checked cursor over a borrowed byte slice.
//!
//! # Invariants
//! - `pos <= buf.len()` at all times.
//! - Every read validates the remaining length *before* touching memory and
//!   reports `None` instead of advancing on a short read.
//!
//! # Design Notes
//! - All parser field advances funnel through this one type, so every read
//!   is validated identically instead of repeating offset arithmetic at each
//!   call site.
//! - Returned spans borrow the underlying buffer, so they stay valid after
//!   the cursor moves on or is dropped.

use memchr::memchr;

/// Forward-only reader over externally owned bytes.
#[derive(Clone, Copy, Debug)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current offset from the start of the buffer.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Bytes left to read.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Takes the next `n` bytes as a span, or `None` if fewer remain.
    pub fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        if n > self.remaining() {
            return None;
        }
        let span = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Some(span)
    }

    pub fn read_u8(&mut self) -> Option<u8> {
        let span = self.take(1)?;
        Some(span[0])
    }

    pub fn read_u16_le(&mut self) -> Option<u16> {
        let span = self.take(2)?;
        Some(u16::from_le_bytes([span[0], span[1]]))
    }

    pub fn read_u32_le(&mut self) -> Option<u32> {
        let span = self.take(4)?;
        Some(u32::from_le_bytes([span[0], span[1], span[2], span[3]]))
    }

    /// Takes the span up to the next NUL byte (excluded) and steps past the
    /// terminator. `None` if the buffer ends before a NUL is found; the
    /// cursor does not move in that case.
    pub fn take_until_nul(&mut self) -> Option<&'a [u8]> {
        let rest = &self.buf[self.pos..];
        let nul = memchr(0, rest)?;
        self.pos += nul + 1;
        Some(&rest[..nul])
    }

    /// Remaining bytes as a span. The cursor is consumed.
    pub fn rest(self) -> &'a [u8] {
        &self.buf[self.pos..]
    }
}
