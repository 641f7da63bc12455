// SPDX-License-Identifier: Apache-2.0

use crate::parse_error::DecodeErrorKind;
use crate::scratch::Scratch;

/// Decoding of JSON escape sequences.
///
/// The scanner only checks escape syntax while parsing. Names and strings
/// are decoded here, on demand, when their text is requested.
pub struct EscapeProcessor;

impl EscapeProcessor {
    /// The byte a single-character escape stands for, given the character
    /// after the backslash.
    pub fn process_simple_escape(escape_char: u8) -> Result<u8, DecodeErrorKind> {
        match escape_char {
            b'n' => Ok(b'\n'),
            b't' => Ok(b'\t'),
            b'r' => Ok(b'\r'),
            b'\\' => Ok(b'\\'),
            b'"' => Ok(b'"'),
            b'/' => Ok(b'/'),
            b'b' => Ok(0x08), // Backspace
            b'f' => Ok(0x0C), // Form feed
            _ => Err(DecodeErrorKind::InvalidEscapeSequence),
        }
    }

    /// Value of one hex digit of a `\u` escape.
    pub fn validate_hex_digit(byte: u8) -> Result<u32, DecodeErrorKind> {
        match byte {
            b'0'..=b'9' => Ok((byte - b'0') as u32),
            b'a'..=b'f' => Ok(byte.wrapping_sub(b'a').wrapping_add(10) as u32),
            b'A'..=b'F' => Ok(byte.wrapping_sub(b'A').wrapping_add(10) as u32),
            _ => Err(DecodeErrorKind::InvalidUnicodeHex),
        }
    }

    /// Check if a Unicode codepoint is a high surrogate (0xD800-0xDBFF)
    pub fn is_high_surrogate(codepoint: u32) -> bool {
        (0xD800..=0xDBFF).contains(&codepoint)
    }

    /// Check if a Unicode codepoint is a low surrogate (0xDC00-0xDFFF)
    pub fn is_low_surrogate(codepoint: u32) -> bool {
        (0xDC00..=0xDFFF).contains(&codepoint)
    }

    /// Combine a high and low surrogate pair into a single Unicode codepoint
    pub fn combine_surrogate_pair(high: u32, low: u32) -> Result<u32, DecodeErrorKind> {
        if !Self::is_high_surrogate(high) || !Self::is_low_surrogate(low) {
            return Err(DecodeErrorKind::InvalidUnicodeCodepoint);
        }
        Ok(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00))
    }

    /// Appends the decoded form of `raw` to `scratch`.
    ///
    /// `raw` is the text between the quotes of a name or string. Literal runs
    /// are copied through unchanged. A `\u` high surrogate must be followed
    /// directly by a `\u` low surrogate; lone surrogates of either kind are
    /// rejected.
    ///
    /// On error, whatever was already appended stays in `scratch`; callers
    /// roll back with [`Scratch::truncate`].
    pub fn unescape<S: Scratch + ?Sized>(
        raw: &[u8],
        scratch: &mut S,
    ) -> Result<(), DecodeErrorKind> {
        let mut rest = raw;
        while let Some(backslash) = rest.iter().position(|&b| b == b'\\') {
            let (literal, escape) = rest.split_at(backslash);
            scratch.write(literal)?;
            let after_backslash = escape.get(1..).unwrap_or(&[]);
            rest = Self::unescape_one(after_backslash, scratch)?;
        }
        scratch.write(rest)
    }

    /// Decodes one escape sequence, returning the input that follows it.
    fn unescape_one<'r, S: Scratch + ?Sized>(
        after_backslash: &'r [u8],
        scratch: &mut S,
    ) -> Result<&'r [u8], DecodeErrorKind> {
        let (&escape_char, rest) = after_backslash
            .split_first()
            .ok_or(DecodeErrorKind::InvalidEscapeSequence)?;

        if escape_char != b'u' {
            scratch.write(&[Self::process_simple_escape(escape_char)?])?;
            return Ok(rest);
        }

        let (code, mut rest) = Self::read_hex4(rest)?;
        let codepoint = if Self::is_high_surrogate(code) {
            let low_escape = rest
                .strip_prefix(b"\\u")
                .ok_or(DecodeErrorKind::InvalidUnicodeCodepoint)?;
            let (low, after_low) = Self::read_hex4(low_escape)?;
            rest = after_low;
            Self::combine_surrogate_pair(code, low)?
        } else {
            code
        };

        // Rejects lone low surrogates
        let ch = char::from_u32(codepoint).ok_or(DecodeErrorKind::InvalidUnicodeCodepoint)?;
        let mut utf8_buf = [0u8; 4];
        scratch.write(ch.encode_utf8(&mut utf8_buf).as_bytes())?;
        Ok(rest)
    }

    /// Reads the four hex digits of a `\u` escape.
    fn read_hex4(bytes: &[u8]) -> Result<(u32, &[u8]), DecodeErrorKind> {
        let (hex, rest) = bytes
            .split_at_checked(4)
            .ok_or(DecodeErrorKind::InvalidUnicodeHex)?;
        let mut codepoint = 0u32;
        for &byte in hex {
            codepoint = (codepoint << 4) | Self::validate_hex_digit(byte)?;
        }
        Ok((codepoint, rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scratch::SliceScratch;

    fn decode(raw: &[u8]) -> Result<std::vec::Vec<u8>, DecodeErrorKind> {
        let mut out = std::vec::Vec::new();
        let mut buf = [0u8; 64];
        let mut scratch = SliceScratch::new(&mut buf);
        EscapeProcessor::unescape(raw, &mut scratch)?;
        out.extend_from_slice(scratch.written_since(0));
        Ok(out)
    }

    #[test]
    fn test_simple_escapes() {
        assert_eq!(EscapeProcessor::process_simple_escape(b'n').unwrap(), b'\n');
        assert_eq!(EscapeProcessor::process_simple_escape(b't').unwrap(), b'\t');
        assert_eq!(EscapeProcessor::process_simple_escape(b'r').unwrap(), b'\r');
        assert_eq!(
            EscapeProcessor::process_simple_escape(b'\\').unwrap(),
            b'\\'
        );
        assert_eq!(EscapeProcessor::process_simple_escape(b'"').unwrap(), b'"');
        assert_eq!(EscapeProcessor::process_simple_escape(b'/').unwrap(), b'/');
        assert_eq!(EscapeProcessor::process_simple_escape(b'b').unwrap(), 0x08);
        assert_eq!(EscapeProcessor::process_simple_escape(b'f').unwrap(), 0x0C);
        assert!(EscapeProcessor::process_simple_escape(b'x').is_err());
    }

    #[test]
    fn test_hex_digit_validation() {
        assert_eq!(EscapeProcessor::validate_hex_digit(b'0').unwrap(), 0);
        assert_eq!(EscapeProcessor::validate_hex_digit(b'9').unwrap(), 9);
        assert_eq!(EscapeProcessor::validate_hex_digit(b'a').unwrap(), 10);
        assert_eq!(EscapeProcessor::validate_hex_digit(b'F').unwrap(), 15);
        assert!(EscapeProcessor::validate_hex_digit(b'g').is_err());
        assert!(EscapeProcessor::validate_hex_digit(b' ').is_err());
    }

    #[test]
    fn test_surrogate_pair_combination() {
        // \uD801\uDC37 -> U+10437
        assert_eq!(
            EscapeProcessor::combine_surrogate_pair(0xD801, 0xDC37),
            Ok(0x10437)
        );
        // \uD834\uDD1E -> U+1D11E
        assert_eq!(
            EscapeProcessor::combine_surrogate_pair(0xD834, 0xDD1E),
            Ok(0x1D11E)
        );
        assert!(EscapeProcessor::combine_surrogate_pair(0x0041, 0xDC37).is_err());
        assert!(EscapeProcessor::combine_surrogate_pair(0xD801, 0x0041).is_err());
    }

    #[test]
    fn test_unescape_mixed_text() {
        assert_eq!(decode(br#"plain"#).unwrap(), b"plain");
        assert_eq!(decode(br#"a\nb\t\"c\"\\\/"#).unwrap(), b"a\nb\t\"c\"\\/");
        assert_eq!(decode(br#"\u0041\u03B1"#).unwrap(), "A\u{3b1}".as_bytes());
        assert_eq!(decode(br#"\u0000"#).unwrap(), b"\0");
        assert_eq!(
            decode(br#"x\uD834\uDD1Ey"#).unwrap(),
            [b'x', 0xF0, 0x9D, 0x84, 0x9E, b'y']
        );
    }

    #[test]
    fn test_unescape_rejects_bad_surrogates() {
        let lone_cases: [&[u8]; 5] = [
            br#"\uD800"#,
            br#"\uD800x"#,
            br#"\uDC00"#,
            br#"\uD800A"#,
            br#"\uD800\n"#,
        ];
        for raw in lone_cases {
            assert_eq!(
                decode(raw),
                Err(DecodeErrorKind::InvalidUnicodeCodepoint),
                "{raw:?}"
            );
        }
        assert_eq!(
            decode(br#"\uD800\uD800"#),
            Err(DecodeErrorKind::InvalidUnicodeCodepoint)
        );
    }

    #[test]
    fn test_unescape_rejects_malformed_escapes() {
        assert_eq!(decode(br#"\u12"#), Err(DecodeErrorKind::InvalidUnicodeHex));
        assert_eq!(decode(br#"\uzzzz"#), Err(DecodeErrorKind::InvalidUnicodeHex));
        assert_eq!(decode(br#"\x"#), Err(DecodeErrorKind::InvalidEscapeSequence));
        assert_eq!(decode(b"abc\\"), Err(DecodeErrorKind::InvalidEscapeSequence));
    }

    #[test]
    fn test_unescape_scratch_full() {
        let mut buf = [0u8; 2];
        let mut scratch = SliceScratch::new(&mut buf);
        assert_eq!(
            EscapeProcessor::unescape(br#"\u00e9\n"#, &mut scratch),
            Err(DecodeErrorKind::ScratchBufferFull)
        );
    }
}
