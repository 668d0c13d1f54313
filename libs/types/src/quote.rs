//! The derived market quote
//!
//! Recomputed whenever the book changes. Best-price fields use −1 as the
//! absent sentinel internally; the wire message drops absent fields
//! entirely, and the three last-trade fields appear only once something
//! has actually traded.

use serde::{Deserialize, Serialize};

/// Raw quote state owned by the engine.
///
/// Sizes and depths are 64-bit: a best level can hold arbitrarily many
/// 32-bit orders.
#[derive(Debug, Clone)]
pub struct Quote {
    pub bid_size: i64,
    pub ask_size: i64,
    pub bid_depth: i64,
    pub ask_depth: i64,
    pub bid: i32,
    pub ask: i32,
    pub last: i32,
    pub last_size: i32,
    pub last_trade: String,
    pub quote_time: String,
}

impl Quote {
    /// A quote for a book that has seen no orders and no trades.
    pub fn new(start_time: String) -> Self {
        Self {
            bid_size: 0,
            ask_size: 0,
            bid_depth: 0,
            ask_depth: 0,
            bid: -1,
            ask: -1,
            last: -1,
            last_size: -1,
            last_trade: String::new(),
            quote_time: start_time,
        }
    }

    /// Record last-trade fields. The book-derived fields are refreshed
    /// separately, once the whole command has finished mutating the book.
    pub fn set_last(&mut self, price: i32, size: i32, ts: String) {
        self.last = price;
        self.last_size = size;
        self.last_trade = ts;
    }

    /// Refresh the book-derived fields. Last-trade fields are untouched:
    /// this runs on every book change, traded or not.
    #[allow(clippy::too_many_arguments)]
    pub fn refresh_book_fields(
        &mut self,
        bid: Option<i32>,
        ask: Option<i32>,
        bid_size: i64,
        ask_size: i64,
        bid_depth: i64,
        ask_depth: i64,
        quote_time: String,
    ) {
        self.bid = bid.unwrap_or(-1);
        self.ask = ask.unwrap_or(-1);
        self.bid_size = bid_size;
        self.ask_size = ask_size;
        self.bid_depth = bid_depth;
        self.ask_depth = ask_depth;
        self.quote_time = quote_time;
    }

    pub fn has_traded(&self) -> bool {
        !self.last_trade.is_empty()
    }

    /// Wire snapshot of this quote.
    pub fn message(&self, venue: &str, symbol: &str) -> QuoteMessage {
        QuoteMessage {
            ok: true,
            symbol: symbol.to_string(),
            venue: venue.to_string(),
            bid_size: self.bid_size,
            ask_size: self.ask_size,
            bid_depth: self.bid_depth,
            ask_depth: self.ask_depth,
            quote_time: self.quote_time.clone(),
            bid: (self.bid >= 0).then_some(self.bid),
            ask: (self.ask >= 0).then_some(self.ask),
            last_trade: self.has_traded().then(|| self.last_trade.clone()),
            last_size: self.has_traded().then_some(self.last_size),
            last: self.has_traded().then_some(self.last),
        }
    }
}

/// Wire form of the quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteMessage {
    pub ok: bool,
    pub symbol: String,
    pub venue: String,
    pub bid_size: i64,
    pub ask_size: i64,
    pub bid_depth: i64,
    pub ask_depth: i64,
    pub quote_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bid: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ask: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_trade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<i32>,
}
