// SPDX-License-Identifier: Apache-2.0

use crate::parse_error::ParseError;
use crate::token::{Token, TokenIndex};

/// Strategy for growing (and releasing) the token array.
///
/// The arena calls [`Grow::resize`] when it runs out of slots, and with a
/// `size_hint` of 0 when the parser is freed.
///
/// For a non-zero hint the strategy must provide a store holding at least
/// one token more than the current capacity, and at least 2 tokens, with
/// the current entries copied to its front:
/// * `carry` is `Some(entries)` when the current entries are not in the
///   strategy's own store (they live in caller-supplied storage, or there are
///   none yet). The strategy copies them but must never free them.
/// * `carry` is `None` when the strategy's store already holds the entries.
///
/// Returning `false` declines the growth; the arena is left unchanged and
/// parsing fails. A hint of 0 must release everything and always succeed.
///
/// Strategies are called synchronously from within parsing and must not
/// parse themselves.
pub trait Grow {
    fn resize(&mut self, carry: Option<&[Token]>, size_hint: TokenIndex) -> bool;

    /// The strategy-owned store.
    fn tokens(&self) -> &[Token];

    fn tokens_mut(&mut self) -> &mut [Token];
}

/// A strategy that never allocates.
///
/// Parsing is limited to the caller-supplied storage, if any.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGrowth;

impl Grow for NoGrowth {
    fn resize(&mut self, _carry: Option<&[Token]>, size_hint: TokenIndex) -> bool {
        size_hint == 0
    }

    fn tokens(&self) -> &[Token] {
        &[]
    }

    fn tokens_mut(&mut self) -> &mut [Token] {
        &mut []
    }
}

/// A heap-backed strategy.
///
/// Reservations are fallible: if the allocator refuses, the growth is
/// declined instead of aborting the process.
#[cfg(feature = "alloc")]
#[derive(Debug, Default)]
pub struct VecGrowth {
    tokens: alloc::vec::Vec<Token>,
    limit: Option<TokenIndex>,
}

#[cfg(feature = "alloc")]
impl VecGrowth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Never grows beyond `limit` tokens, the sentinel included.
    ///
    /// Bounds the memory a hostile document can claim.
    pub fn with_limit(limit: TokenIndex) -> Self {
        Self {
            tokens: alloc::vec::Vec::new(),
            limit: Some(limit),
        }
    }

    pub fn limit(&self) -> Option<TokenIndex> {
        self.limit
    }
}

#[cfg(feature = "alloc")]
impl Grow for VecGrowth {
    fn resize(&mut self, carry: Option<&[Token]>, size_hint: TokenIndex) -> bool {
        if size_hint == 0 {
            self.tokens = alloc::vec::Vec::new();
            return true;
        }

        let current = carry.map_or(self.tokens.len(), <[Token]>::len);
        let size = match self.limit {
            Some(limit) => size_hint.min(limit) as usize,
            None => size_hint as usize,
        };
        if size <= current {
            return false;
        }

        if let Some(entries) = carry {
            self.tokens.clear();
            if self.tokens.try_reserve_exact(size).is_err() {
                return false;
            }
            self.tokens.extend_from_slice(entries);
        } else if self
            .tokens
            .try_reserve_exact(size - self.tokens.len())
            .is_err()
        {
            return false;
        }
        self.tokens.resize(size, Token::EMPTY);
        true
    }

    fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    fn tokens_mut(&mut self) -> &mut [Token] {
        &mut self.tokens
    }
}

/// Where the arena's tokens currently live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backing {
    /// Nothing acquired yet, or released.
    Empty,
    /// The caller-supplied storage.
    Initial,
    /// The growth strategy's store.
    Grown,
}

/// The flat token array.
///
/// Owns the bookkeeping for which store is active, its capacity and the
/// last used index. Slot 0 is the sentinel; real tokens start at 1.
#[derive(Debug)]
pub struct TokenArena<'t, G: Grow> {
    initial: &'t mut [Token],
    grow: G,
    backing: Backing,
    last: TokenIndex,
    capacity_hint: TokenIndex,
}

impl<'t, G: Grow> TokenArena<'t, G> {
    pub fn new(capacity_hint: TokenIndex, initial: &'t mut [Token], grow: G) -> Self {
        Self {
            initial,
            grow,
            backing: Backing::Empty,
            last: 0,
            capacity_hint,
        }
    }

    fn store(&self) -> &[Token] {
        match self.backing {
            Backing::Empty => &[],
            Backing::Initial => &*self.initial,
            Backing::Grown => self.grow.tokens(),
        }
    }

    fn store_mut(&mut self) -> &mut [Token] {
        match self.backing {
            Backing::Empty => &mut [],
            Backing::Initial => &mut *self.initial,
            Backing::Grown => self.grow.tokens_mut(),
        }
    }

    /// Number of slots in the active store, the sentinel included.
    pub fn capacity(&self) -> TokenIndex {
        TokenIndex::try_from(self.store().len()).unwrap_or(TokenIndex::MAX)
    }

    /// Index of the last allocated token.
    ///
    /// Not less than [`capacity`](Self::capacity) after an allocation failed.
    pub fn last(&self) -> TokenIndex {
        self.last
    }

    /// The sentinel and every populated token.
    pub fn tokens(&self) -> &[Token] {
        let store = self.store();
        let end = (self.last as usize).saturating_add(1).min(store.len());
        store.get(..end).unwrap_or(&[])
    }

    pub fn token(&self, idx: TokenIndex) -> Option<&Token> {
        self.tokens().get(idx as usize)
    }

    pub(crate) fn token_mut(&mut self, idx: TokenIndex) -> Option<&mut Token> {
        if idx > self.last {
            return None;
        }
        self.store_mut().get_mut(idx as usize)
    }

    /// Forgets all tokens, keeping the store for reuse.
    pub fn reset(&mut self) {
        self.last = 0;
    }

    /// Returns strategy-owned memory. Caller-supplied storage is kept.
    pub fn release(&mut self) {
        let released = self.grow.resize(None, 0);
        debug_assert!(released, "releasing tokens must succeed");
        self.backing = Backing::Empty;
        self.last = 0;
    }

    /// Allocates the next token as a child of `parent`.
    ///
    /// The new token is zeroed, and the parent's child count is incremented
    /// if it is a container. When the store is full the growth strategy is
    /// asked for more room; if it declines, `last` is left at or past the
    /// capacity and [`ParseError::OutOfTokens`] is returned.
    pub fn allocate(&mut self, parent: TokenIndex) -> Result<TokenIndex, ParseError> {
        self.last = self.last.saturating_add(1);

        if self.last >= self.capacity() {
            let acquired = match self.backing {
                Backing::Empty => self.acquire(),
                Backing::Initial | Backing::Grown => self.enlarge(),
            };
            if !acquired {
                let capacity = self.capacity();
                log::debug!("Out of tokens at capacity {capacity}");
                return Err(ParseError::OutOfTokens { capacity });
            }
        }

        let idx = self.last;
        let store = self.store_mut();
        if idx == 1 {
            if let Some(sentinel) = store.first_mut() {
                *sentinel = Token::EMPTY;
            }
        }
        if let Some(slot) = store.get_mut(idx as usize) {
            *slot = Token {
                parent,
                ..Token::EMPTY
            };
        }
        if let Some(container) = store
            .get_mut(parent as usize)
            .and_then(|p| p.value.container_mut())
        {
            container.children = container.children.saturating_add(1);
        }
        Ok(idx)
    }

    /// First store for a parse: the caller's storage if it is big enough,
    /// otherwise whatever the strategy provides.
    fn acquire(&mut self) -> bool {
        if self.initial.len() > self.last as usize {
            self.backing = Backing::Initial;
            return true;
        }
        let hint = self.last.saturating_add(1).max(self.capacity_hint);
        log::trace!("Acquiring token store, hint {hint}");
        self.resize(Some(&[][..]), hint)
    }

    /// Grows the active store to the next power of two.
    fn enlarge(&mut self) -> bool {
        let hint = match self.capacity().checked_add(1) {
            Some(n) => n.checked_next_power_of_two(),
            None => None,
        };
        let Some(hint) = hint else {
            return false;
        };
        log::trace!("Growing token store from {} to {hint}", self.capacity());
        match self.backing {
            Backing::Initial => {
                let carry: &[Token] = &*self.initial;
                self.grow.resize(Some(carry), hint) && self.adopt()
            }
            _ => self.resize(None, hint),
        }
    }

    fn resize(&mut self, carry: Option<&[Token]>, hint: TokenIndex) -> bool {
        self.grow.resize(carry, hint) && self.adopt()
    }

    /// Switches to the strategy's store after a successful resize, if it is
    /// usable.
    fn adopt(&mut self) -> bool {
        let len = self.grow.tokens().len();
        if len <= self.last as usize || len < 2 {
            log::warn!(
                "Growth strategy returned {len} tokens, need more than {}",
                self.last
            );
            return false;
        }
        self.backing = Backing::Grown;
        true
    }
}
