// SPDX-License-Identifier: Apache-2.0

use crate::parse_error::ErrKind;
use crate::slice_input_buffer::SliceInputBuffer;
use crate::token::Span;

/// Consumes a JSON number from the front of `buffer`.
///
/// Grammar: optional `-`, then `0` or a non-zero digit followed by digits,
/// an optional fraction (`.` and one or more digits) and an optional
/// exponent (`e`/`E`, optional sign, one or more digits).
///
/// Returns the span of the literal text; no numeric conversion is done. On
/// error the buffer is left at the byte where the grammar was violated.
pub fn scan_number(buffer: &mut SliceInputBuffer<'_>) -> Result<Span, ErrKind> {
    let start = buffer.current_pos();
    let is_digit = |c: u8| c.is_ascii_digit();

    buffer.consume_if(|c| c == b'-');
    let first = buffer.consume_if(is_digit).ok_or(ErrKind::InvalidNumber)?;

    // No leading zeros: a lone `0` ends the integer part
    if first != b'0' {
        buffer.consume_while(is_digit);
    }

    if buffer.consume_if(|c| c == b'.').is_some() {
        buffer.consume_if(is_digit).ok_or(ErrKind::InvalidNumber)?;
        buffer.consume_while(is_digit);
    }

    if buffer.consume_if(|c| c == b'e' || c == b'E').is_some() {
        buffer.consume_if(|c| c == b'+' || c == b'-');
        buffer.consume_if(is_digit).ok_or(ErrKind::InvalidNumber)?;
        buffer.consume_while(is_digit);
    }

    Ok(Span {
        offset: start,
        len: buffer.current_pos() - start,
        escaped: false,
    })
}
