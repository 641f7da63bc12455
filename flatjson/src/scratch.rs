// SPDX-License-Identifier: Apache-2.0

use crate::parse_error::DecodeErrorKind;

/// Append-only byte buffer that unescaped names and strings are written to.
///
/// The buffer is owned and sized by the caller. Decoded values are appended
/// one after another, and a failed decode is truncated away.
pub trait Scratch {
    /// Number of bytes written so far.
    fn position(&self) -> usize;

    /// Appends `bytes`, failing if they do not fit.
    fn write(&mut self, bytes: &[u8]) -> Result<(), DecodeErrorKind>;

    /// Discards everything written after `position`.
    fn truncate(&mut self, position: usize);

    /// Bytes written since `start`.
    fn written_since(&self, start: usize) -> &[u8];
}

/// A [`Scratch`] over a fixed, caller-provided byte slice.
///
/// Never allocates; writes beyond the end of the slice fail with
/// [`DecodeErrorKind::ScratchBufferFull`].
#[derive(Debug)]
pub struct SliceScratch<'b> {
    buffer: &'b mut [u8],
    /// Global position in the buffer; only `reset` and rollbacks move it back
    pos: usize,
}

impl<'b> SliceScratch<'b> {
    pub fn new(buffer: &'b mut [u8]) -> Self {
        Self { buffer, pos: 0 }
    }

    /// Forgets everything written so far.
    pub fn reset(&mut self) {
        self.pos = 0;
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.pos)
    }
}

impl Scratch for SliceScratch<'_> {
    fn position(&self) -> usize {
        self.pos
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), DecodeErrorKind> {
        let end = self
            .pos
            .checked_add(bytes.len())
            .ok_or(DecodeErrorKind::ScratchBufferFull)?;
        let dst = self
            .buffer
            .get_mut(self.pos..end)
            .ok_or(DecodeErrorKind::ScratchBufferFull)?;
        // Use zip to avoid copy_from_slice panic checks
        for (d, &s) in dst.iter_mut().zip(bytes.iter()) {
            *d = s;
        }
        self.pos = end;
        Ok(())
    }

    fn truncate(&mut self, position: usize) {
        self.pos = self.pos.min(position);
    }

    fn written_since(&self, start: usize) -> &[u8] {
        self.buffer.get(start..self.pos).unwrap_or(&[])
    }
}

#[cfg(feature = "alloc")]
impl Scratch for alloc::vec::Vec<u8> {
    fn position(&self) -> usize {
        self.len()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), DecodeErrorKind> {
        self.try_reserve(bytes.len())
            .map_err(|_| DecodeErrorKind::ScratchBufferFull)?;
        self.extend_from_slice(bytes);
        Ok(())
    }

    fn truncate(&mut self, position: usize) {
        alloc::vec::Vec::truncate(self, position);
    }

    fn written_since(&self, start: usize) -> &[u8] {
        self.get(start..).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_scratch_appends() {
        let mut buf = [0u8; 8];
        let mut scratch = SliceScratch::new(&mut buf);
        scratch.write(b"abc").unwrap();
        let mark = scratch.position();
        scratch.write(b"de").unwrap();
        assert_eq!(scratch.written_since(0), b"abcde");
        assert_eq!(scratch.written_since(mark), b"de");
        assert_eq!(scratch.remaining(), 3);
    }

    #[test]
    fn test_slice_scratch_full() {
        let mut buf = [0u8; 4];
        let mut scratch = SliceScratch::new(&mut buf);
        scratch.write(b"abc").unwrap();
        assert_eq!(
            scratch.write(b"de"),
            Err(DecodeErrorKind::ScratchBufferFull)
        );
        // A failed write leaves the buffer untouched
        assert_eq!(scratch.position(), 3);
        assert_eq!(scratch.capacity(), 4);
    }

    #[test]
    fn test_slice_scratch_truncate_and_reset() {
        let mut buf = [0u8; 8];
        let mut scratch = SliceScratch::new(&mut buf);
        scratch.write(b"abcdef").unwrap();
        scratch.truncate(2);
        assert_eq!(scratch.written_since(0), b"ab");
        // Truncating forward is a no-op
        scratch.truncate(7);
        assert_eq!(scratch.position(), 2);
        scratch.reset();
        assert_eq!(scratch.position(), 0);
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn test_vec_scratch() {
        let mut scratch: alloc::vec::Vec<u8> = alloc::vec::Vec::new();
        scratch.write(b"hello").unwrap();
        Scratch::truncate(&mut scratch, 4);
        scratch.write(b"!").unwrap();
        assert_eq!(scratch.written_since(2), b"ll!");
    }
}
