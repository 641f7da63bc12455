// SPDX-License-Identifier: Apache-2.0

//! Shared pieces of the `flatjson-check` and `flatjson-tree` tools.

use core::fmt;

use flatjson::ParseError;

pub mod stats;
pub mod tree;

/// Outcome of a parse, as reported on the summary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Valid,
    Invalid,
    OutOfTokens,
}

impl Status {
    pub fn of(result: &Result<(), ParseError>) -> Self {
        match result {
            Ok(()) => Status::Valid,
            Err(ParseError::OutOfTokens { .. }) => Status::OutOfTokens,
            Err(ParseError::Syntax { .. }) => Status::Invalid,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Valid => "Valid JSON",
            Status::Invalid => "Invalid JSON",
            Status::OutOfTokens => "Insufficient token memory",
        })
    }
}

/// The `Parsed: X / Y bytes (status)` line.
pub fn summary(parsed_len: usize, input_len: usize, status: Status) -> String {
    format!("Parsed: {parsed_len} / {input_len} bytes ({status})")
}
