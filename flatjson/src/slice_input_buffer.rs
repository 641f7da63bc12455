// SPDX-License-Identifier: Apache-2.0

/// A cursor over the input bytes.
///
/// Encapsulates the data slice and the current parsing position, which are
/// always used together. Every `consume_*` operation only moves forward, so
/// after a failure the position marks how far the input was read.
#[derive(Debug, Clone)]
pub struct SliceInputBuffer<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceInputBuffer<'a> {
    /// Creates a new SliceInputBuffer positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn current_pos(&self) -> usize {
        self.pos
    }

    /// Returns the next byte without consuming it.
    pub fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    /// Consumes one byte. Does nothing at the end of input.
    pub fn advance(&mut self) {
        if self.pos < self.data.len() {
            self.pos = self.pos.saturating_add(1);
        }
    }

    /// Consumes the next byte if it satisfies `pred`, returning it.
    pub fn consume_if(&mut self, pred: impl FnOnce(u8) -> bool) -> Option<u8> {
        let byte = self.peek().filter(|&b| pred(b))?;
        self.advance();
        Some(byte)
    }

    /// Consumes bytes while they satisfy `pred`. Returns how many were consumed.
    pub fn consume_while(&mut self, pred: impl Fn(u8) -> bool) -> usize {
        let start = self.pos;
        while self.consume_if(&pred).is_some() {}
        self.pos - start
    }

    /// Consumes `literal` if the input continues with it. Consumes nothing
    /// otherwise.
    pub fn consume_literal(&mut self, literal: &[u8]) -> bool {
        if self.remaining().starts_with(literal) {
            self.pos = self.pos.saturating_add(literal.len());
            true
        } else {
            false
        }
    }

    /// The unconsumed rest of the input.
    pub fn remaining(&self) -> &'a [u8] {
        self.data.get(self.pos..).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }
}
