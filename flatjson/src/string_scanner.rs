// SPDX-License-Identifier: Apache-2.0

use crate::parse_error::ErrKind;
use crate::slice_input_buffer::SliceInputBuffer;
use crate::token::Span;

/// Consumes a quoted JSON string from the front of `buffer`.
///
/// The returned span covers the content between the quotes, escapes
/// included, and records whether any escape was seen. Escapes are checked
/// for syntax only; decoding happens later, on demand. Raw bytes >= 0x20
/// are accepted without UTF-8 validation.
pub fn scan_string(buffer: &mut SliceInputBuffer<'_>) -> Result<Span, ErrKind> {
    if buffer.consume_if(|c| c == b'"').is_none() {
        return Err(ErrKind::InvalidToken);
    }
    let start = buffer.current_pos();
    let mut escaped = false;

    loop {
        match buffer.peek() {
            None => return Err(ErrKind::UnterminatedString),
            Some(b'"') => {
                let span = Span {
                    offset: start,
                    len: buffer.current_pos() - start,
                    escaped,
                };
                buffer.advance();
                return Ok(span);
            }
            Some(c) if c < 0x20 => return Err(ErrKind::UnescapedControlCharacter),
            Some(b'\\') => {
                buffer.advance();
                scan_escape(buffer)?;
                escaped = true;
            }
            Some(_) => buffer.advance(),
        }
    }
}

/// Consumes the part of an escape sequence that follows the backslash.
fn scan_escape(buffer: &mut SliceInputBuffer<'_>) -> Result<(), ErrKind> {
    match buffer.peek() {
        None => Err(ErrKind::UnterminatedString),
        Some(b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't') => {
            buffer.advance();
            Ok(())
        }
        Some(b'u') => {
            buffer.advance();
            for _ in 0..4 {
                buffer
                    .consume_if(|c| c.is_ascii_hexdigit())
                    .ok_or(ErrKind::InvalidUnicodeEscape)?;
            }
            Ok(())
        }
        Some(_) => Err(ErrKind::InvalidStringEscape),
    }
}
