// SPDX-License-Identifier: Apache-2.0

//! Token records stored in the token arena.
//!
//! One [`Token`] is produced for every JSON value, in document (preorder)
//! order. Tokens refer to each other by [`TokenIndex`] rather than by
//! reference, because the array holding them may be reallocated while
//! parsing is in progress.

/// Index into the token array.
pub type TokenIndex = u32;

/// Reserved index meaning "no token".
///
/// Slot 0 of every token array is a sentinel: it is the parent of the root
/// value and never holds a real value itself.
pub const NO_TOKEN: TokenIndex = 0;

/// The kind of JSON value a token holds, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueType {
    /// Type not determined yet. Only seen on tokens left by a failed parse.
    None,
    Null,
    Bool,
    Number,
    String,
    Object,
    Array,
}

impl ValueType {
    /// All value types, in declaration order.
    pub const ALL: [ValueType; 7] = [
        ValueType::None,
        ValueType::Null,
        ValueType::Bool,
        ValueType::Number,
        ValueType::String,
        ValueType::Object,
        ValueType::Array,
    ];

    /// Lowercase name of the type, as used in diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            ValueType::None => "none",
            ValueType::Null => "null",
            ValueType::Bool => "bool",
            ValueType::Number => "number",
            ValueType::String => "string",
            ValueType::Object => "object",
            ValueType::Array => "array",
        }
    }
}

impl core::fmt::Display for ValueType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Location of a substring within the parsed input.
///
/// For strings and member names the span excludes the surrounding quotes and
/// still contains any escape sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Byte offset of the first byte.
    pub offset: usize,
    /// Length in bytes.
    pub len: usize,
    /// Whether the substring contains backslash escapes.
    pub escaped: bool,
}

impl Span {
    /// Byte range of the span within the input.
    pub fn range(&self) -> core::ops::Range<usize> {
        self.offset..self.offset.saturating_add(self.len)
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Bookkeeping for an object or array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Container {
    /// Number of direct members or elements.
    pub children: u32,
    /// Index of the first token after this container's subtree.
    pub next: TokenIndex,
}

/// A token's payload, keyed by its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Value {
    #[default]
    None,
    Null,
    Bool(bool),
    /// The numeric literal text, unconverted.
    Number(Span),
    String(Span),
    Object(Container),
    Array(Container),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::None => ValueType::None,
            Value::Null => ValueType::Null,
            Value::Bool(_) => ValueType::Bool,
            Value::Number(_) => ValueType::Number,
            Value::String(_) => ValueType::String,
            Value::Object(_) => ValueType::Object,
            Value::Array(_) => ValueType::Array,
        }
    }

    /// Container bookkeeping for objects and arrays.
    pub fn container(&self) -> Option<&Container> {
        match self {
            Value::Object(c) | Value::Array(c) => Some(c),
            _ => None,
        }
    }

    pub(crate) fn container_mut(&mut self) -> Option<&mut Container> {
        match self {
            Value::Object(c) | Value::Array(c) => Some(c),
            _ => None,
        }
    }

    /// Input span for numbers and strings.
    pub fn span(&self) -> Option<Span> {
        match self {
            Value::Number(s) | Value::String(s) => Some(*s),
            _ => None,
        }
    }
}

/// Metadata for one parsed JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Token {
    /// Index of the enclosing container, or [`NO_TOKEN`] for the root.
    pub parent: TokenIndex,
    /// Member name; present only for object members.
    pub name: Option<Span>,
    pub value: Value,
}

impl Token {
    /// A zeroed token, as written into every freshly allocated slot.
    pub const EMPTY: Token = Token {
        parent: NO_TOKEN,
        name: None,
        value: Value::None,
    };

    pub fn value_type(&self) -> ValueType {
        self.value.value_type()
    }

    pub fn is_container(&self) -> bool {
        self.value.container().is_some()
    }

    /// Number of direct children; zero for anything but objects and arrays.
    pub fn children(&self) -> u32 {
        self.value.container().map_or(0, |c| c.children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_is_default() {
        assert_eq!(Token::EMPTY, Token::default());
        assert_eq!(Token::EMPTY.value_type(), ValueType::None);
        assert_eq!(Token::EMPTY.parent, NO_TOKEN);
    }

    #[test]
    fn container_accessors() {
        let token = Token {
            parent: 1,
            name: None,
            value: Value::Array(Container {
                children: 3,
                next: 5,
            }),
        };
        assert!(token.is_container());
        assert_eq!(token.children(), 3);
        assert_eq!(token.value.span(), None);

        let leaf = Token {
            value: Value::Number(Span {
                offset: 1,
                len: 2,
                escaped: false,
            }),
            ..Token::EMPTY
        };
        assert!(!leaf.is_container());
        assert_eq!(leaf.children(), 0);
        assert_eq!(leaf.value.span().map(|s| s.range()), Some(1..3));
    }

    #[test]
    fn value_type_names() {
        let names: [&str; 7] = ValueType::ALL.map(ValueType::as_str);
        assert_eq!(
            names,
            ["none", "null", "bool", "number", "string", "object", "array"]
        );
    }
}
