//! Two-sided order book
//!
//! Levels and order nodes live in per-side index arenas; see `side` for
//! the list structures and `arena` for the slot allocator.

mod arena;
mod side;

pub use arena::ArenaStats;
pub use side::{BookSide, MatchWalk};

use crate::store::OrderStore;
use types::order::{Order, Side};

/// The order book for one (venue, symbol) pair.
#[derive(Debug)]
pub struct OrderBook {
    bids: BookSide,
    asks: BookSide,
}

impl OrderBook {
    pub fn new() -> Self {
        Self {
            bids: BookSide::new(Side::Buy),
            asks: BookSide::new(Side::Sell),
        }
    }

    pub fn side(&self, side: Side) -> &BookSide {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut BookSide {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    /// Book an open limit order on its own side.
    pub fn insert_limit(&mut self, order: &Order) {
        self.side_mut(order.direction).insert(order);
    }

    /// Remove a resting limit order. Returns false if it was not booked.
    pub fn cancel(&mut self, order: &Order) -> bool {
        self.side_mut(order.direction).cancel(order)
    }

    /// Strip filled orders from the head of one side after matching.
    pub fn cleanup_head(&mut self, side: Side, store: &OrderStore) {
        self.side_mut(side).cleanup_head(store);
    }
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}
