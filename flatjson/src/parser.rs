// SPDX-License-Identifier: Apache-2.0

use crate::escape_processor::EscapeProcessor;
use crate::json_string::JsonStr;
use crate::number_parser::scan_number;
use crate::parse_error::{DecodeError, ErrKind, ParseError};
use crate::scratch::Scratch;
use crate::slice_input_buffer::SliceInputBuffer;
use crate::string_scanner::scan_string;
use crate::token::{Container, Span, Token, TokenIndex, Value, NO_TOKEN};
use crate::token_arena::{Grow, NoGrowth, TokenArena};

#[cfg(feature = "alloc")]
use crate::token_arena::VecGrowth;

/// Accepted, and skipped, at the very start of the input.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Token capacity requested up front by [`Parser::new`].
#[cfg(feature = "alloc")]
pub const DEFAULT_CAPACITY: TokenIndex = 1024;

/// Parses JSON text into a flat array of [`Token`]s.
///
/// Tokens are produced in document order, one per value, and refer to each
/// other by index. Parsing is iterative: nesting depth costs tokens, never
/// stack.
///
/// A parser can be reused for any number of documents; each call to
/// [`parse`](Self::parse) starts from scratch but keeps the token store.
///
/// Lifetime 'a is the input buffer lifetime.
/// Lifetime 't is the lifetime of caller-supplied token storage.
///
/// # Example
/// ```
/// use flatjson::{Parser, Token, ValueType};
///
/// let mut storage = [Token::EMPTY; 8];
/// let mut parser = Parser::with_storage(&mut storage);
/// assert!(parser.parse("[1, 2, 3]"));
/// assert_eq!(parser.last(), 4);
/// assert_eq!(parser.token(1).value_type(), ValueType::Array);
/// assert_eq!(parser.token(1).children(), 3);
/// ```
#[derive(Debug)]
pub struct Parser<'a, 't, G: Grow = NoGrowth> {
    input: &'a [u8],
    /// Offset where parsing stopped
    unparsed: usize,
    arena: TokenArena<'t, G>,
    /// Token being populated
    current: TokenIndex,
    /// Container being parsed into
    current_parent: TokenIndex,
    error: Option<ParseError>,
}

impl<'a, 't, G: Grow> Parser<'a, 't, G> {
    /// Creates a parser.
    ///
    /// # Arguments
    /// * `capacity_hint` - Number of tokens to ask `grow` for when
    ///   `initial_storage` is too small to start with.
    /// * `initial_storage` - Token storage owned by the caller, used first.
    ///   Never freed or resized by the parser; may be empty.
    /// * `grow` - Strategy used when more tokens are needed. Use
    ///   [`NoGrowth`] for a fixed capacity.
    pub fn init(capacity_hint: TokenIndex, initial_storage: &'t mut [Token], grow: G) -> Self {
        Self {
            input: &[],
            unparsed: 0,
            arena: TokenArena::new(capacity_hint, initial_storage, grow),
            current: NO_TOKEN,
            current_parent: NO_TOKEN,
            error: None,
        }
    }

    /// Parses `input`, returning true if it is a single valid JSON value with
    /// nothing but whitespace around it.
    ///
    /// On failure, [`error`](Self::error) and [`unparsed`](Self::unparsed)
    /// tell what went wrong and where.
    pub fn parse<I: AsRef<[u8]> + ?Sized>(&mut self, input: &'a I) -> bool {
        self.try_parse(input).is_ok()
    }

    /// Like [`parse`](Self::parse), returning the failure.
    pub fn try_parse<I: AsRef<[u8]> + ?Sized>(&mut self, input: &'a I) -> Result<(), ParseError> {
        self.input = input.as_ref();
        self.unparsed = 0;
        self.arena.reset();
        self.current = NO_TOKEN;
        self.current_parent = NO_TOKEN;
        self.error = None;

        let mut buffer = SliceInputBuffer::new(self.input);
        buffer.consume_literal(UTF8_BOM);

        let result = self
            .allocate()
            .and_then(|()| self.parse_document(&mut buffer));
        self.unparsed = buffer.current_pos();

        match result {
            Ok(()) => log::debug!(
                "Parsed {} bytes into {} tokens",
                self.input.len(),
                self.arena.last()
            ),
            Err(err) => {
                log::debug!("Parse failed after {} bytes: {err}", self.unparsed);
                self.error = Some(err);
            }
        }
        result
    }

    fn parse_document(&mut self, buffer: &mut SliceInputBuffer<'a>) -> Result<(), ParseError> {
        loop {
            skip_whitespace(buffer);
            self.parse_value(buffer)?;

            let parent = self.ascend(buffer);
            self.current_parent = parent;
            if parent == NO_TOKEN {
                break;
            }

            // The next member or element; a container that was just opened
            // takes its first one without a comma.
            skip_whitespace(buffer);
            if parent != self.current {
                expect(buffer, b',', ErrKind::ExpectedComma)?;
            }
            self.allocate()?;

            if matches!(self.arena.token(parent).map(|t| t.value), Some(Value::Object(_))) {
                skip_whitespace(buffer);
                self.parse_name(buffer)?;
            }
        }

        skip_whitespace(buffer);
        if buffer.is_empty() {
            Ok(())
        } else {
            Err(error_at(buffer, ErrKind::TrailingContent))
        }
    }

    fn allocate(&mut self) -> Result<(), ParseError> {
        self.current = self.arena.allocate(self.current_parent)?;
        Ok(())
    }

    fn set_value(&mut self, value: Value) {
        if let Some(token) = self.arena.token_mut(self.current) {
            token.value = value;
        }
    }

    /// Parses the value of the current token. An opening bracket makes the
    /// current token the parent of the tokens that follow.
    fn parse_value(&mut self, buffer: &mut SliceInputBuffer<'a>) -> Result<(), ParseError> {
        let position = buffer.current_pos();
        let Some(first) = buffer.peek() else {
            let kind = if self.current == 1 {
                ErrKind::EmptyInput
            } else {
                ErrKind::UnfinishedInput
            };
            return Err(ParseError::syntax(kind, position));
        };
        let value = match first {
            b'"' => Value::String(scan_string(buffer).map_err(|kind| error_at(buffer, kind))?),
            b'{' | b'[' => {
                buffer.advance();
                log::trace!("Opened {} at token {}", first as char, self.current);
                self.current_parent = self.current;
                if first == b'{' {
                    Value::Object(Container::default())
                } else {
                    Value::Array(Container::default())
                }
            }
            b't' => {
                literal(buffer, b"true")?;
                Value::Bool(true)
            }
            b'f' => {
                literal(buffer, b"false")?;
                Value::Bool(false)
            }
            b'n' => {
                literal(buffer, b"null")?;
                Value::Null
            }
            b'-' | b'0'..=b'9' => {
                Value::Number(scan_number(buffer).map_err(|kind| error_at(buffer, kind))?)
            }
            _ => return Err(ParseError::syntax(ErrKind::InvalidToken, position)),
        };
        self.set_value(value);
        Ok(())
    }

    /// Consumes the closing brackets that follow a value and returns the
    /// container that parsing continues in, or [`NO_TOKEN`] once the root
    /// value is complete.
    ///
    /// Walks up through parent links, so closing any number of nested
    /// containers takes constant stack.
    fn ascend(&mut self, buffer: &mut SliceInputBuffer<'a>) -> TokenIndex {
        let next = self.arena.last().saturating_add(1);
        let mut parent = self.current_parent;

        while parent != NO_TOKEN {
            skip_whitespace(buffer);
            let Some(token) = self.arena.token_mut(parent) else {
                break;
            };
            let close = match token.value {
                Value::Array(_) => b']',
                Value::Object(_) => b'}',
                _ => break,
            };
            if buffer.consume_if(|c| c == close).is_none() {
                break;
            }
            if let Some(container) = token.value.container_mut() {
                container.next = next;
            }
            log::trace!("Closed {} at token {parent}", close as char);
            parent = token.parent;
        }
        parent
    }

    /// Parses an object member name and its colon into the current token.
    fn parse_name(&mut self, buffer: &mut SliceInputBuffer<'a>) -> Result<(), ParseError> {
        match buffer.peek() {
            Some(b'"') => {}
            Some(_) => return Err(error_at(buffer, ErrKind::ExpectedObjectKey)),
            None => return Err(error_at(buffer, ErrKind::UnfinishedInput)),
        }
        let name = scan_string(buffer).map_err(|kind| error_at(buffer, kind))?;
        skip_whitespace(buffer);
        expect(buffer, b':', ErrKind::ExpectedColon)?;

        if let Some(token) = self.arena.token_mut(self.current) {
            token.name = Some(name);
        }
        Ok(())
    }

    /// The input of the last parse.
    pub fn input(&self) -> &'a [u8] {
        self.input
    }

    /// The input from where the last parse stopped. Empty after a successful
    /// parse; after a failure it starts at the offending byte.
    pub fn unparsed(&self) -> &'a [u8] {
        self.input.get(self.unparsed..).unwrap_or(&[])
    }

    /// Number of input bytes consumed by the last parse.
    pub fn parsed_len(&self) -> usize {
        self.unparsed
    }

    /// Index of the last populated token.
    pub fn last(&self) -> TokenIndex {
        self.arena.last()
    }

    /// Current number of token slots, the sentinel included.
    pub fn capacity(&self) -> TokenIndex {
        self.arena.capacity()
    }

    /// Whether the last parse failed for lack of tokens rather than bad input.
    pub fn is_out_of_tokens(&self) -> bool {
        matches!(self.error, Some(ParseError::OutOfTokens { .. }))
    }

    /// Why the last parse failed.
    pub fn error(&self) -> Option<ParseError> {
        self.error
    }

    /// All tokens of the last parse. Slot 0 is the sentinel.
    pub fn tokens(&self) -> &[Token] {
        self.arena.tokens()
    }

    /// The token at `idx`.
    ///
    /// # Panics
    /// If `idx` is past the last populated token.
    pub fn token(&self, idx: TokenIndex) -> &Token {
        &self.tokens()[idx as usize]
    }

    pub fn get(&self, idx: TokenIndex) -> Option<&Token> {
        self.arena.token(idx)
    }

    /// Releases all memory obtained from the growth strategy.
    ///
    /// Caller-supplied storage is left alone. The parser stays usable; the
    /// next parse starts over with the initial storage. Also runs on drop.
    pub fn free(&mut self) {
        self.arena.release();
    }

    /// The member name of the token at `idx`.
    ///
    /// Names without escapes are returned straight from the input. Escaped
    /// names are decoded into `scratch`, after whatever it already holds.
    /// Array elements and the root have no name and yield an empty string.
    ///
    /// # Panics
    /// If `idx` is past the last populated token.
    pub fn token_name<'s, S: Scratch + ?Sized>(
        &self,
        idx: TokenIndex,
        scratch: &'s mut S,
    ) -> Result<JsonStr<'a, 's>, DecodeError<'a>> {
        match self.token(idx).name {
            Some(span) => self.decode(span, scratch),
            None => Ok(JsonStr::Borrowed(&[])),
        }
    }

    /// The text of the token at `idx`.
    ///
    /// Strings are decoded as for [`token_name`](Self::token_name) and
    /// numbers are returned as written. Other types yield `null`, `true`,
    /// `false`, `object` or `array`; an undetermined token yields an empty
    /// string.
    ///
    /// # Panics
    /// If `idx` is past the last populated token.
    pub fn token_string<'s, S: Scratch + ?Sized>(
        &self,
        idx: TokenIndex,
        scratch: &'s mut S,
    ) -> Result<JsonStr<'a, 's>, DecodeError<'a>> {
        let text: &'static [u8] = match self.token(idx).value {
            Value::Number(span) | Value::String(span) => return self.decode(span, scratch),
            Value::None => b"",
            Value::Null => b"null",
            Value::Bool(true) => b"true",
            Value::Bool(false) => b"false",
            Value::Object(_) => b"object",
            Value::Array(_) => b"array",
        };
        Ok(JsonStr::Borrowed(text))
    }

    fn decode<'s, S: Scratch + ?Sized>(
        &self,
        span: Span,
        scratch: &'s mut S,
    ) -> Result<JsonStr<'a, 's>, DecodeError<'a>> {
        let raw: &'a [u8] = self.input.get(span.range()).unwrap_or(&[]);
        if !span.escaped {
            return Ok(JsonStr::Borrowed(raw));
        }

        let start = scratch.position();
        match EscapeProcessor::unescape(raw, scratch) {
            Ok(()) => {
                let scratch: &'s S = scratch;
                Ok(JsonStr::Unescaped(scratch.written_since(start)))
            }
            Err(kind) => {
                scratch.truncate(start);
                Err(DecodeError { kind, raw })
            }
        }
    }
}

impl<'a, 't> Parser<'a, 't, NoGrowth> {
    /// A parser limited to `storage`, which must hold the sentinel plus one
    /// slot per JSON value.
    pub fn with_storage(storage: &'t mut [Token]) -> Self {
        Self::init(0, storage, NoGrowth)
    }
}

#[cfg(feature = "alloc")]
impl Parser<'_, 'static, VecGrowth> {
    /// A heap-backed parser that grows as needed.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A heap-backed parser that starts with room for `capacity` tokens.
    pub fn with_capacity(capacity: TokenIndex) -> Self {
        Self::init(capacity, &mut [], VecGrowth::new())
    }
}

#[cfg(feature = "alloc")]
impl Default for Parser<'_, 'static, VecGrowth> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Grow> Drop for Parser<'_, '_, G> {
    fn drop(&mut self) {
        self.free();
    }
}

fn error_at(buffer: &SliceInputBuffer<'_>, kind: ErrKind) -> ParseError {
    ParseError::syntax(kind, buffer.current_pos())
}

/// JSON whitespace only: space, tab, line feed and carriage return.
fn skip_whitespace(buffer: &mut SliceInputBuffer<'_>) {
    buffer.consume_while(|c| matches!(c, b' ' | b'\t' | b'\n' | b'\r'));
}

/// Consumes `byte`, or fails with `kind` (or [`ErrKind::UnfinishedInput`]
/// at the end of input).
fn expect(buffer: &mut SliceInputBuffer<'_>, byte: u8, kind: ErrKind) -> Result<(), ParseError> {
    if buffer.consume_if(|c| c == byte).is_some() {
        return Ok(());
    }
    let kind = if buffer.is_empty() {
        ErrKind::UnfinishedInput
    } else {
        kind
    };
    Err(error_at(buffer, kind))
}

fn literal(buffer: &mut SliceInputBuffer<'_>, text: &[u8]) -> Result<(), ParseError> {
    if buffer.consume_literal(text) {
        Ok(())
    } else {
        Err(error_at(buffer, ErrKind::InvalidLiteral))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scratch::SliceScratch;
    use crate::token::ValueType;

    fn syntax_error(input: &str) -> (ErrKind, usize) {
        let mut storage = [Token::EMPTY; 16];
        let mut parser = Parser::with_storage(&mut storage);
        match parser.try_parse(input) {
            Err(ParseError::Syntax { kind, position }) => {
                assert_eq!(parser.parsed_len(), position, "{input}");
                (kind, position)
            }
            other => panic!("{input}: expected syntax error, got {other:?}"),
        }
    }

    #[test_log::test]
    fn test_flat_array() {
        let mut storage = [Token::EMPTY; 8];
        let mut parser = Parser::with_storage(&mut storage);
        assert!(parser.parse("[1,2,3]"));
        assert_eq!(parser.last(), 4);
        assert!(parser.unparsed().is_empty());
        assert_eq!(
            parser.token(1).value,
            Value::Array(Container {
                children: 3,
                next: 5
            })
        );
        for idx in 2..=4 {
            assert_eq!(parser.token(idx).value_type(), ValueType::Number);
            assert_eq!(parser.token(idx).parent, 1);
            assert_eq!(parser.token(idx).name, None);
        }
    }

    #[test]
    fn test_object_member() {
        let mut storage = [Token::EMPTY; 8];
        let mut parser = Parser::with_storage(&mut storage);
        let input = r#"{ "a" : 1 }"#;
        assert!(parser.parse(input));
        assert_eq!(parser.last(), 2);
        assert_eq!(parser.token(1).children(), 1);
        let member = parser.token(2);
        assert_eq!(
            member.name,
            Some(Span {
                offset: 3,
                len: 1,
                escaped: false
            })
        );
        assert_eq!(member.value.span().map(|s| s.range()), Some(8..9));
    }

    #[test]
    fn test_nested_next_indices() {
        let mut storage = [Token::EMPTY; 16];
        let mut parser = Parser::with_storage(&mut storage);
        assert!(parser.parse(r#"{"a":[1,[2]],"b":{},"c":null}"#));
        // 1 {  2 a:[  3 1  4 [  5 2  6 b:{}  7 c:null
        assert_eq!(parser.last(), 7);
        let next = |idx| parser.token(idx).value.container().map(|c| c.next);
        assert_eq!(next(1), Some(8));
        assert_eq!(next(2), Some(6));
        assert_eq!(next(4), Some(6));
        assert_eq!(next(6), Some(7));
        assert_eq!(parser.token(1).children(), 3);
        assert_eq!(parser.token(2).children(), 2);
        assert_eq!(parser.token(6).children(), 0);
        assert_eq!(parser.token(5).parent, 4);
    }

    #[test]
    fn test_scalars_at_root() {
        let mut storage = [Token::EMPTY; 2];
        let mut parser = Parser::with_storage(&mut storage);
        for (input, expected) in [
            (" true ", Value::Bool(true)),
            ("false", Value::Bool(false)),
            ("null", Value::Null),
        ] {
            assert!(parser.parse(input), "{input}");
            assert_eq!(parser.token(1).value, expected);
        }
        assert!(parser.parse("-0.5e3"));
        assert_eq!(parser.token(1).value_type(), ValueType::Number);
    }

    #[test]
    fn test_byte_order_mark_is_skipped() {
        let mut storage = [Token::EMPTY; 2];
        let mut parser = Parser::with_storage(&mut storage);
        assert!(parser.parse(b"\xEF\xBB\xBF{}"));
        assert!(!parser.parse(b"\xEF\xBB{}"));
    }

    #[test]
    fn test_syntax_errors() {
        assert_eq!(syntax_error(""), (ErrKind::EmptyInput, 0));
        assert_eq!(syntax_error(" "), (ErrKind::EmptyInput, 1));
        assert_eq!(syntax_error("{"), (ErrKind::UnfinishedInput, 1));
        assert_eq!(syntax_error("[1,"), (ErrKind::UnfinishedInput, 3));
        assert_eq!(syntax_error("[1,]"), (ErrKind::InvalidToken, 3));
        assert_eq!(syntax_error("[1 2]"), (ErrKind::ExpectedComma, 3));
        assert_eq!(syntax_error("[1}"), (ErrKind::ExpectedComma, 2));
        assert_eq!(syntax_error("{1:2}"), (ErrKind::ExpectedObjectKey, 1));
        assert_eq!(syntax_error(r#"{"a" 2}"#), (ErrKind::ExpectedColon, 5));
        assert_eq!(syntax_error("[tru]"), (ErrKind::InvalidLiteral, 1));
        assert_eq!(syntax_error("[01]"), (ErrKind::ExpectedComma, 2));
        assert_eq!(syntax_error("[1.]"), (ErrKind::InvalidNumber, 3));
        assert_eq!(syntax_error("[] x"), (ErrKind::TrailingContent, 3));
        assert_eq!(syntax_error("\u{0C}[]"), (ErrKind::InvalidToken, 0));
        assert_eq!(syntax_error(r#"["a"#), (ErrKind::UnterminatedString, 3));
    }

    #[test]
    fn test_out_of_tokens() {
        let mut storage = [Token::EMPTY; 3];
        let mut parser = Parser::with_storage(&mut storage);
        assert!(!parser.parse("[1,2]"));
        assert!(parser.is_out_of_tokens());
        assert_eq!(parser.error(), Some(ParseError::OutOfTokens { capacity: 3 }));
        assert_eq!(parser.last(), parser.capacity());
        // Succeeds once the input fits
        assert!(parser.parse("[1]"));
        assert_eq!(parser.error(), None);
    }

    #[test]
    fn test_decode_name_and_string() {
        let mut storage = [Token::EMPTY; 4];
        let mut parser = Parser::with_storage(&mut storage);
        let input = r#"{"k\"ey":"v\/al","n":-12}"#;
        assert!(parser.parse(input));

        let mut buf = [0u8; 16];
        let mut scratch = SliceScratch::new(&mut buf);
        let name = parser.token_name(2, &mut scratch).unwrap();
        assert_eq!(name, JsonStr::Unescaped(b"k\"ey"));
        let value = parser.token_string(2, &mut scratch).unwrap();
        assert_eq!(value.as_bytes(), b"v/al");

        let mut buf = [0u8; 16];
        let mut scratch = SliceScratch::new(&mut buf);
        let number = parser.token_string(3, &mut scratch).unwrap();
        assert_eq!(number, JsonStr::Borrowed(b"-12"));
        assert_eq!(
            parser.token_string(1, &mut scratch).unwrap().as_bytes(),
            b"object"
        );
        assert_eq!(parser.token_name(1, &mut scratch).unwrap().as_bytes(), b"");
    }

    #[cfg(feature = "alloc")]
    #[test_log::test]
    fn test_heap_parser_grows() {
        let input = "[".repeat(40) + &"]".repeat(40);
        let mut parser = Parser::with_capacity(2);
        assert!(parser.parse(&input));
        assert_eq!(parser.last(), 40);
        assert_eq!(parser.capacity(), 64);
        parser.free();
        assert_eq!(parser.capacity(), 0);
        assert!(parser.tokens().is_empty());
    }
}
