// SPDX-License-Identifier: Apache-2.0

//! A JSON parser that produces a flat, indexed array of tokens.
//!
//! Every JSON value becomes one [`Token`], stored in document order. Tokens
//! link to their parent by index and containers record where their subtree
//! ends, so the array can be walked as a tree without pointers and without
//! recursion. Strings and numbers stay in the input; escaped text is only
//! decoded when asked for, into a scratch buffer the caller provides.
//!
//! Token storage can be a fixed, caller-owned slice ([`Parser::with_storage`])
//! or grow on the heap ([`Parser::new`], feature `alloc`), or be managed by
//! any [`Grow`] strategy.
//!
//! ```
//! use flatjson::{Parser, Token, Value};
//!
//! let mut storage = [Token::EMPTY; 16];
//! let mut parser = Parser::with_storage(&mut storage);
//! assert!(parser.parse(r#"{"greeting": "hi\tthere", "n": [1, 2]}"#));
//!
//! let mut scratch = [0u8; 32];
//! let mut scratch = flatjson::SliceScratch::new(&mut scratch);
//! let text = parser.token_string(2, &mut scratch).unwrap();
//! assert_eq!(text.as_bytes(), b"hi\tthere");
//! assert!(matches!(parser.token(3).value, Value::Array(_)));
//! ```

#![cfg_attr(not(test), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

mod token;
pub use token::{Container, Span, Token, TokenIndex, Value, ValueType, NO_TOKEN};

mod slice_input_buffer;

mod number_parser;

mod string_scanner;

mod parse_error;
pub use parse_error::{DecodeError, DecodeErrorKind, ErrKind, ParseError};

mod token_arena;
pub use token_arena::{Grow, NoGrowth};
#[cfg(feature = "alloc")]
pub use token_arena::VecGrowth;

mod escape_processor;

mod scratch;
pub use scratch::{Scratch, SliceScratch};

mod json_string;
pub use json_string::JsonStr;

mod parser;
#[cfg(feature = "alloc")]
pub use parser::DEFAULT_CAPACITY;
pub use parser::Parser;

mod traversal;
pub use traversal::{Children, ROOT};
