// SPDX-License-Identifier: Apache-2.0

use crate::token::TokenIndex;

/// Why the input was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrKind {
    /// No value present (empty or whitespace-only input).
    EmptyInput,
    /// Input ended inside a value or an open container.
    UnfinishedInput,
    /// A byte that cannot start a JSON value.
    InvalidToken,
    /// `t`, `f` or `n` not followed by the rest of `true`, `false` or `null`.
    InvalidLiteral,
    InvalidNumber,
    /// Input ended before the closing quote of a string.
    UnterminatedString,
    /// A raw byte below 0x20 inside a string.
    UnescapedControlCharacter,
    /// A backslash followed by something other than a JSON escape.
    InvalidStringEscape,
    /// `\u` not followed by four hex digits.
    InvalidUnicodeEscape,
    /// Neither `,` nor the closing bracket after a member or element.
    ExpectedComma,
    /// An object member that does not start with a string.
    ExpectedObjectKey,
    ExpectedColon,
    /// Non-whitespace after the root value.
    TrailingContent,
}

/// Errors that can occur during JSON parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// The input deviates from the JSON grammar at `position`.
    Syntax { kind: ErrKind, position: usize },
    /// The token array is full and could not grow.
    OutOfTokens { capacity: TokenIndex },
}

impl ParseError {
    pub(crate) fn syntax(kind: ErrKind, position: usize) -> Self {
        ParseError::Syntax { kind, position }
    }

    /// What kind of syntax error this is.
    pub fn kind(&self) -> Option<ErrKind> {
        match self {
            ParseError::Syntax { kind, .. } => Some(*kind),
            ParseError::OutOfTokens { .. } => None,
        }
    }

    /// Byte offset of a syntax error.
    pub fn position(&self) -> Option<usize> {
        match self {
            ParseError::Syntax { position, .. } => Some(*position),
            ParseError::OutOfTokens { .. } => None,
        }
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParseError::Syntax { kind, position } => write!(f, "{kind:?} at byte {position}"),
            ParseError::OutOfTokens { capacity } => {
                write!(f, "token array full ({capacity} tokens)")
            }
        }
    }
}

/// Why an escaped name or string could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// Invalid escape sequence character.
    InvalidEscapeSequence,
    /// Invalid hex digits in Unicode escape sequence.
    InvalidUnicodeHex,
    /// Valid hex but not a Unicode scalar value: a lone or unpaired surrogate.
    InvalidUnicodeCodepoint,
    /// The provided scratch buffer was not large enough.
    ScratchBufferFull,
}

/// A name or string whose escapes could not be decoded.
///
/// Carries the raw, still-escaped text from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeError<'a> {
    pub kind: DecodeErrorKind,
    pub raw: &'a [u8],
}

impl core::fmt::Display for DecodeError<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?} in {} escaped bytes", self.kind, self.raw.len())
    }
}
