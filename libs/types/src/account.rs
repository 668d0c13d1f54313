//! Account records and saturating position accounting
//!
//! Balances are signed 32-bit and clamp at ±(2³¹ − 1): a trade that would
//! push shares or cents past the bound loses the excess instead of
//! wrapping. The clamp floor is −(2³¹ − 1), not −2³¹.

use crate::ids::OrderId;
use crate::order::Side;
use serde::{Deserialize, Serialize};

const BALANCE_BOUND: i64 = i32::MAX as i64;

fn clamped(value: i64) -> i32 {
    value.clamp(-BALANCE_BOUND, BALANCE_BOUND) as i32
}

/// One trading account on the venue.
///
/// The name is fixed at creation (the first name offered for a slot wins).
/// `posmin`/`posmax` are low/high water marks of the share balance since
/// creation. The order list is append-only and holds every order the
/// account has ever placed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub shares: i32,
    pub cents: i32,
    pub posmin: i32,
    pub posmax: i32,
    pub orders: Vec<OrderId>,
}

impl Account {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shares: 0,
            cents: 0,
            posmin: 0,
            posmax: 0,
            orders: Vec::new(),
        }
    }

    /// Apply one side of a trade: buys add shares and spend cents, sells
    /// the reverse. Arithmetic runs in 64 bits and clamps on the way back.
    pub fn apply_trade(&mut self, qty: i32, price: i32, side: Side) {
        let qty = qty as i64;
        let value = price as i64 * qty;
        match side {
            Side::Buy => {
                self.shares = clamped(self.shares as i64 + qty);
                self.cents = clamped(self.cents as i64 - value);
            }
            Side::Sell => {
                self.shares = clamped(self.shares as i64 - qty);
                self.cents = clamped(self.cents as i64 + value);
            }
        }
        self.posmin = self.posmin.min(self.shares);
        self.posmax = self.posmax.max(self.shares);
    }

    /// Net asset value in cents at the given last-trade price. Shares,
    /// cents and the price are all 32-bit, so this cannot overflow.
    pub fn nav(&self, last: i32) -> i64 {
        self.shares as i64 * last as i64 + self.cents as i64
    }
}
