//! Order lifecycle types
//!
//! An order is immutable after creation except for its residual fields:
//! remaining quantity, total filled, the open flag, its fill list, and the
//! stored price of market orders (zeroed after execution for reporting).

use crate::fill::{Fill, FillLog};
use crate::ids::{AccountId, FillId, OrderId};
use serde::{Deserialize, Serialize};

/// Order direction. Wire code 1 = buy, 2 = sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Decode the protocol's direction code.
    pub fn from_wire(code: i64) -> Option<Self> {
        match code {
            1 => Some(Side::Buy),
            2 => Some(Side::Sell),
            _ => None,
        }
    }

    pub fn wire_code(self) -> i64 {
        match self {
            Side::Buy => 1,
            Side::Sell => 2,
        }
    }
}

/// Order type. Wire codes: 1 = limit, 2 = market, 3 = fill-or-kill,
/// 4 = immediate-or-cancel. JSON uses the long spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    #[serde(rename = "limit")]
    Limit,
    #[serde(rename = "market")]
    Market,
    #[serde(rename = "fill-or-kill")]
    FillOrKill,
    #[serde(rename = "immediate-or-cancel")]
    ImmediateOrCancel,
}

impl OrderType {
    /// Decode the protocol's order-type code.
    pub fn from_wire(code: i64) -> Option<Self> {
        match code {
            1 => Some(OrderType::Limit),
            2 => Some(OrderType::Market),
            3 => Some(OrderType::FillOrKill),
            4 => Some(OrderType::ImmediateOrCancel),
            _ => None,
        }
    }

    pub fn wire_code(self) -> i64 {
        match self {
            OrderType::Limit => 1,
            OrderType::Market => 2,
            OrderType::FillOrKill => 3,
            OrderType::ImmediateOrCancel => 4,
        }
    }

    /// Only limit orders ever rest on the book.
    pub fn is_limit(self) -> bool {
        matches!(self, OrderType::Limit)
    }
}

/// A single order.
///
/// `qty` is the remaining quantity; `original_qty` never changes. The
/// invariant `qty + total_filled == original_qty` holds at all times, and
/// `open` tracks `qty > 0` except that non-limit residuals are closed (and
/// zeroed) when their placement finishes.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub account: AccountId,
    pub direction: Side,
    pub order_type: OrderType,
    pub original_qty: i32,
    pub qty: i32,
    pub price: i32,
    pub ts: String,
    pub fills: Vec<FillId>,
    pub total_filled: i32,
    pub open: bool,
}

impl Order {
    pub fn new(
        id: OrderId,
        account: AccountId,
        direction: Side,
        order_type: OrderType,
        qty: i32,
        price: i32,
        ts: String,
    ) -> Self {
        Self {
            id,
            account,
            direction,
            order_type,
            original_qty: qty,
            qty,
            price,
            ts,
            fills: Vec::new(),
            total_filled: 0,
            open: true,
        }
    }

    /// Quantity conservation: remaining + filled = original.
    pub fn check_invariant(&self) -> bool {
        self.qty + self.total_filled == self.original_qty
    }

    /// Record one fill's quantity against this order, closing it when the
    /// remainder hits zero.
    pub fn apply_fill(&mut self, fill_id: FillId, qty: i32) {
        self.qty -= qty;
        self.total_filled += qty;
        self.fills.push(fill_id);
        if self.qty == 0 {
            self.open = false;
        }
    }

    /// Close the order and discard any remainder (cancel, or the auto-close
    /// of a non-limit residual).
    pub fn close_discarding_remainder(&mut self) {
        self.open = false;
        self.qty = 0;
    }
}

/// Wire form of an order, as sent in command replies and execution events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderMessage {
    pub ok: bool,
    pub venue: String,
    pub symbol: String,
    pub direction: Side,
    pub original_qty: i32,
    pub qty: i32,
    pub price: i32,
    pub order_type: OrderType,
    pub id: OrderId,
    pub account: String,
    pub ts: String,
    pub total_filled: i32,
    pub open: bool,
    pub fills: Vec<Fill>,
}

impl OrderMessage {
    /// Snapshot an order for the wire, resolving its fill ids.
    pub fn snapshot(
        order: &Order,
        account_name: &str,
        fills: &FillLog,
        venue: &str,
        symbol: &str,
    ) -> Self {
        Self {
            ok: true,
            venue: venue.to_string(),
            symbol: symbol.to_string(),
            direction: order.direction,
            original_qty: order.original_qty,
            qty: order.qty,
            price: order.price,
            order_type: order.order_type,
            id: order.id,
            account: account_name.to_string(),
            ts: order.ts.clone(),
            total_filled: order.total_filled,
            open: order.open,
            fills: fills.resolve(&order.fills),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_order(qty: i32) -> Order {
        Order::new(
            OrderId(7),
            AccountId(0),
            Side::Buy,
            OrderType::Limit,
            qty,
            5000,
            "2015-07-05T22:16:18.000000Z".to_string(),
        )
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
    }

    #[test]
    fn test_wire_codes() {
        assert_eq!(Side::from_wire(1), Some(Side::Buy));
        assert_eq!(Side::from_wire(2), Some(Side::Sell));
        assert_eq!(Side::from_wire(0), None);
        assert_eq!(Side::from_wire(3), None);

        assert_eq!(OrderType::from_wire(1), Some(OrderType::Limit));
        assert_eq!(OrderType::from_wire(2), Some(OrderType::Market));
        assert_eq!(OrderType::from_wire(3), Some(OrderType::FillOrKill));
        assert_eq!(OrderType::from_wire(4), Some(OrderType::ImmediateOrCancel));
        assert_eq!(OrderType::from_wire(5), None);
    }

    #[test]
    fn test_type_json_spellings() {
        assert_eq!(
            serde_json::to_string(&OrderType::ImmediateOrCancel).unwrap(),
            "\"immediate-or-cancel\""
        );
        assert_eq!(
            serde_json::to_string(&OrderType::FillOrKill).unwrap(),
            "\"fill-or-kill\""
        );
        assert_eq!(serde_json::to_string(&Side::Buy).unwrap(), "\"buy\"");
    }

    #[test]
    fn test_apply_fill_keeps_invariant() {
        let mut order = test_order(100);
        order.apply_fill(FillId(0), 30);
        assert_eq!(order.qty, 70);
        assert_eq!(order.total_filled, 30);
        assert!(order.open);
        assert!(order.check_invariant());

        order.apply_fill(FillId(1), 70);
        assert_eq!(order.qty, 0);
        assert!(!order.open);
        assert!(order.check_invariant());
        assert_eq!(order.fills, vec![FillId(0), FillId(1)]);
    }

    #[test]
    fn test_close_discarding_remainder() {
        let mut order = test_order(100);
        order.apply_fill(FillId(0), 40);
        order.close_discarding_remainder();
        assert!(!order.open);
        assert_eq!(order.qty, 0);
        assert_eq!(order.total_filled, 40);
    }

    #[test]
    fn test_order_message_field_names() {
        let mut fills = FillLog::new();
        let fid = fills.record(Fill {
            price: 5000,
            qty: 10,
            ts: "2015-07-05T22:16:18.000001Z".to_string(),
        });
        let mut order = test_order(10);
        order.apply_fill(fid, 10);

        let msg = OrderMessage::snapshot(&order, "XYZ123", &fills, "TESTEX", "FOO");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["originalQty"], 10);
        assert_eq!(json["qty"], 0);
        assert_eq!(json["orderType"], "limit");
        assert_eq!(json["totalFilled"], 10);
        assert_eq!(json["open"], false);
        assert_eq!(json["direction"], "buy");
        assert_eq!(json["fills"][0]["price"], 5000);
        assert_eq!(json["account"], "XYZ123");
    }
}
