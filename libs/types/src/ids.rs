//! Identifier types for venue entities
//!
//! All ids are dense non-negative integers. The front-end assigns account
//! ids; the engine assigns order and fill ids. Density matters: every id
//! doubles as a slot index into the store that owns the entity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an order, assigned at admission.
///
/// Ids are handed out in strictly increasing sequence by [`IdGen`], so an
/// order id is also the order's slot in the order store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u32);

impl OrderId {
    /// Slot index into the order store.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an account.
///
/// Externally supplied by the front-end; acts as the ledger slot, so the
/// front-end is expected to keep these low and dense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub u32);

impl AccountId {
    /// Slot index into the account ledger.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a fill in the append-only fill log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FillId(pub u32);

impl FillId {
    /// Slot index into the fill log.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bounded, peekable order-id source.
///
/// Yields 0, 1, 2, … up to (not including) the configured ceiling.
/// [`IdGen::peek`] reports the next id without consuming it, so admission
/// checks can run before anything is allocated; once the ceiling is
/// reached both operations return `None` forever.
#[derive(Debug)]
pub struct IdGen {
    next: u32,
    ceiling: u32,
}

impl IdGen {
    pub fn new(ceiling: u32) -> Self {
        Self { next: 0, ceiling }
    }

    /// Next id that `take` would return, or `None` if exhausted.
    pub fn peek(&self) -> Option<OrderId> {
        (self.next < self.ceiling).then_some(OrderId(self.next))
    }

    /// Consume and return the next id, or `None` if exhausted.
    pub fn take(&mut self) -> Option<OrderId> {
        let id = self.peek()?;
        self.next += 1;
        Some(id)
    }
}
