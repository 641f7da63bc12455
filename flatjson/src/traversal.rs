// SPDX-License-Identifier: Apache-2.0

//! Walking the token array as a tree.
//!
//! Everything here is index arithmetic over the flat array: a container's
//! first child directly follows it, and its recorded `next` index skips its
//! whole subtree.

use crate::parser::Parser;
use crate::token::{Token, TokenIndex, NO_TOKEN};
use crate::token_arena::Grow;

/// Index of the root value of a successfully parsed document.
pub const ROOT: TokenIndex = 1;

/// Index of the first token after the subtree rooted at `idx`.
///
/// A container that was never closed (by a failed parse) extends to the end
/// of the populated tokens.
fn next_index(tokens: &[Token], idx: TokenIndex) -> TokenIndex {
    let after_leaf = idx.saturating_add(1);
    match tokens.get(idx as usize).and_then(|t| t.value.container()) {
        Some(container) if container.next != NO_TOKEN => container.next,
        Some(_) => TokenIndex::try_from(tokens.len()).unwrap_or(TokenIndex::MAX),
        None => after_leaf,
    }
}

impl<'a, 't, G: Grow> Parser<'a, 't, G> {
    /// The root token, if the last parse got as far as creating it.
    pub fn root(&self) -> Option<&Token> {
        self.get(ROOT)
    }

    /// Index of the first child of the container at `idx`.
    ///
    /// Always `idx + 1`. For a leaf, or an empty container, that is the next
    /// token after it instead, so check [`Token::children`] first.
    pub fn first_child(&self, idx: TokenIndex) -> TokenIndex {
        idx.saturating_add(1)
    }

    /// Index of the token following `idx` and its whole subtree: the next
    /// sibling, or the next token of some enclosing container.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&self, idx: TokenIndex) -> TokenIndex {
        next_index(self.tokens(), idx)
    }

    /// The direct children of the container at `parent`.
    ///
    /// # Example
    /// ```
    /// use flatjson::{Parser, Token};
    ///
    /// let mut storage = [Token::EMPTY; 8];
    /// let mut parser = Parser::with_storage(&mut storage);
    /// assert!(parser.parse(r#"{"a": [1, 2], "b": true}"#));
    /// let names: Vec<_> = parser
    ///     .children(1)
    ///     .map(|(idx, _)| {
    ///         let mut scratch: Vec<u8> = Vec::new();
    ///         parser.token_name(idx, &mut scratch).unwrap().to_string()
    ///     })
    ///     .collect();
    /// assert_eq!(names, ["a", "b"]);
    /// ```
    pub fn children(&self, parent: TokenIndex) -> Children<'_> {
        let tokens = self.tokens();
        let is_container = tokens
            .get(parent as usize)
            .is_some_and(Token::is_container);
        let (idx, end) = if is_container {
            (self.first_child(parent), next_index(tokens, parent))
        } else {
            (NO_TOKEN, NO_TOKEN)
        };
        Children { tokens, idx, end }
    }

    /// Every populated token in document order, with its index.
    pub fn iter(&self) -> impl Iterator<Item = (TokenIndex, &Token)> + '_ {
        (ROOT..).zip(self.tokens().iter().skip(ROOT as usize))
    }

    /// Number of containers enclosing the token at `idx`; 0 for the root.
    ///
    /// # Panics
    /// If `idx` is past the last populated token.
    pub fn depth(&self, idx: TokenIndex) -> usize {
        let mut depth = 0;
        let mut parent = self.token(idx).parent;
        while parent != NO_TOKEN {
            depth += 1;
            parent = self.token(parent).parent;
        }
        depth
    }
}

/// Iterator over the direct children of a container.
///
/// Created by [`Parser::children`].
#[derive(Debug, Clone)]
pub struct Children<'p> {
    tokens: &'p [Token],
    idx: TokenIndex,
    end: TokenIndex,
}

impl<'p> Iterator for Children<'p> {
    type Item = (TokenIndex, &'p Token);

    fn next(&mut self) -> Option<Self::Item> {
        if self.idx >= self.end {
            return None;
        }
        let idx = self.idx;
        let token = self.tokens.get(idx as usize)?;
        self.idx = next_index(self.tokens, idx);
        Some((idx, token))
    }
}
