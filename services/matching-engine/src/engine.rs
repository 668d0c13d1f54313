//! Matching engine core
//!
//! Main coordinator: admission, the matching loop, booking, cancellation,
//! quote recomputation and event emission. All state for one
//! (venue, symbol) pair lives in one [`Engine`] value; tests instantiate
//! as many engines as they like.

use std::fmt;
use std::io::{self, Write};

use types::account::Account;
use types::clock::Clock;
use types::errors::{LookupError, OrderRejected};
use types::fill::{Fill, FillLog};
use types::ids::{AccountId, FillId, IdGen, OrderId};
use types::order::{Order, OrderMessage, OrderType, Side};
use types::quote::{Quote, QuoteMessage};

use crate::book::{ArenaStats, OrderBook};
use crate::events::{EventEmitter, ExecutionMessage};
use crate::ledger::AccountLedger;
use crate::store::OrderStore;

/// Default order-id ceiling. Deliberately short of 2³¹: various derived
/// numbers would creep past the signed range otherwise.
pub const DEFAULT_MAX_ORDERS: u32 = 2_000_000_000;

/// Default account-id cap. Slots are allocated up to the highest id seen,
/// so the front-end keeps ids low and dense.
pub const DEFAULT_MAX_ACCOUNTS: u32 = 5_000;

/// Engine identity and limits.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub venue: String,
    pub symbol: String,
    pub max_orders: u32,
    pub max_accounts: u32,
}

impl EngineConfig {
    pub fn new(venue: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            venue: venue.into(),
            symbol: symbol.into(),
            max_orders: DEFAULT_MAX_ORDERS,
            max_accounts: DEFAULT_MAX_ACCOUNTS,
        }
    }
}

/// A raw order request, exactly as tokenized off the wire. Validation is
/// the engine's job, at admission.
#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub account_name: String,
    pub account_id: i64,
    pub qty: i64,
    pub price: i64,
    pub direction: i64,
    pub order_type: i64,
}

impl OrderRequest {
    /// Request with already-typed direction and order type (tests, tools).
    pub fn typed(
        account_name: impl Into<String>,
        account_id: u32,
        qty: i64,
        price: i64,
        direction: Side,
        order_type: OrderType,
    ) -> Self {
        Self {
            account_name: account_name.into(),
            account_id: account_id as i64,
            qty,
            price,
            direction: direction.wire_code(),
            order_type: order_type.wire_code(),
        }
    }
}

/// One resting order as seen in a book snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookEntry {
    pub id: OrderId,
    pub qty: i32,
    pub price: i32,
}

/// The matching state for one (venue, symbol) pair.
pub struct Engine {
    config: EngineConfig,
    clock: Clock,
    ids: IdGen,
    store: OrderStore,
    fills: FillLog,
    ledger: AccountLedger,
    book: OrderBook,
    quote: Quote,
    events: EventEmitter,
    start_time: String,
}

impl Engine {
    /// Engine with a discarded event stream (tests, tools).
    pub fn new(config: EngineConfig) -> Self {
        Self::with_event_sink(config, Box::new(io::sink()))
    }

    /// Engine publishing its event stream to the given sink.
    pub fn with_event_sink(config: EngineConfig, sink: Box<dyn Write>) -> Self {
        let mut clock = Clock::new();
        let start_time = clock.now();
        Self {
            ids: IdGen::new(config.max_orders),
            clock,
            store: OrderStore::new(),
            fills: FillLog::new(),
            ledger: AccountLedger::new(),
            book: OrderBook::new(),
            quote: Quote::new(start_time.clone()),
            events: EventEmitter::new(sink),
            start_time,
            config,
        }
    }

    // ── Placement ───────────────────────────────────────────────────

    /// Admit, match and book one order.
    ///
    /// Admission errors consume no order id and leave every structure
    /// untouched. On success the returned id resolves to the order's
    /// post-placement state: market/IOC/failed-FOK residuals are already
    /// closed by the time this returns.
    pub fn place(&mut self, req: &OrderRequest) -> Result<OrderId, OrderRejected> {
        if self.ids.peek().is_none() {
            return Err(OrderRejected::TooManyOrders);
        }
        if req.account_id < 0 || req.account_id >= self.config.max_accounts as i64 {
            return Err(OrderRejected::TooHighAccount);
        }
        if req.price < 0 || req.price > i32::MAX as i64 {
            return Err(OrderRejected::SillyValue);
        }
        if req.qty < 1 || req.qty > i32::MAX as i64 {
            return Err(OrderRejected::SillyValue);
        }
        let direction = Side::from_wire(req.direction).ok_or(OrderRejected::SillyValue)?;
        let order_type = OrderType::from_wire(req.order_type).ok_or(OrderRejected::SillyValue)?;
        let (qty, price) = (req.qty as i32, req.price as i32);

        let account_id = AccountId(req.account_id as u32);
        self.ledger.lookup_or_create(account_id, &req.account_name);

        let Some(id) = self.ids.take() else {
            return Err(OrderRejected::TooManyOrders);
        };
        let ts = self.clock.now();
        self.store.put(Order::new(id, account_id, direction, order_type, qty, price, ts));
        if let Some(account) = self.ledger.get_mut(account_id) {
            account.orders.push(id);
        }
        tracing::debug!(%id, %account_id, qty, price, "order admitted");

        // FOK orders only run if the opposite side can fill them whole.
        let feasible = order_type != OrderType::FillOrKill
            || self
                .book
                .side(direction.opposite())
                .can_fill(qty, price, &self.store);
        if feasible {
            self.run_matching(id, direction, order_type, price);
        }

        self.book.cleanup_head(direction.opposite(), &self.store);

        // Market orders report a stored price of 0. Their fills were
        // already recorded against standing prices.
        let mut filled_any = false;
        let mut rest_on_book = false;
        if let Some(order) = self.store.get_mut(id) {
            if order.order_type == OrderType::Market {
                order.price = 0;
            }
            filled_any = order.total_filled > 0;
            if order.open {
                if order.order_type.is_limit() {
                    rest_on_book = true;
                } else {
                    order.close_discarding_remainder();
                }
            }
        }
        if rest_on_book {
            let Self { book, store, .. } = self;
            if let Some(order) = store.get(id) {
                book.insert_limit(order);
            }
        }

        // The book changed iff anything filled or a limit was placed.
        if filled_any || order_type.is_limit() {
            self.refresh_quote_and_tick();
        }

        Ok(id)
    }

    /// Walk the opposite side from the best level outward, crossing until
    /// the incoming order closes or prices stop being matchable.
    fn run_matching(&mut self, incoming_id: OrderId, direction: Side, order_type: OrderType, limit: i32) {
        let is_market = order_type == OrderType::Market;
        let Self {
            config,
            clock,
            store,
            fills,
            ledger,
            book,
            quote,
            events,
            ..
        } = self;
        let opposite = book.side(direction.opposite());
        let mut walk = opposite.walk_matchable();
        while store.get(incoming_id).is_some_and(|order| order.open) {
            let Some(standing_id) = opposite.next_matchable(&mut walk, limit, is_market) else {
                return;
            };
            cross(config, clock, store, fills, ledger, quote, events, standing_id, incoming_id);
        }
    }

    // ── Cancellation & lookups ──────────────────────────────────────

    /// Cancel an order. Non-limit orders were closed when their placement
    /// returned, so only resting limit orders change the book; those are
    /// unbooked, closed, and their remainder discarded.
    pub fn cancel(&mut self, raw_id: i64) -> Result<OrderId, LookupError> {
        let id = self.resolve_order_id(raw_id)?;
        let unbooked = {
            let Self { book, store, .. } = self;
            match store.get(id) {
                Some(order) if order.order_type.is_limit() => book.cancel(order),
                _ => false,
            }
        };
        if unbooked {
            if let Some(order) = self.store.get_mut(id) {
                order.close_discarding_remainder();
            }
            tracing::debug!(%id, "order cancelled");
            self.refresh_quote_and_tick();
        }
        Ok(id)
    }

    /// Resolve an id for a status query.
    pub fn status(&self, raw_id: i64) -> Result<OrderId, LookupError> {
        self.resolve_order_id(raw_id)
    }

    fn resolve_order_id(&self, raw: i64) -> Result<OrderId, LookupError> {
        if raw < 0 || raw > u32::MAX as i64 {
            return Err(LookupError::NoSuchOrder);
        }
        let id = OrderId(raw as u32);
        match self.store.get(id) {
            Some(_) => Ok(id),
            None => Err(LookupError::NoSuchOrder),
        }
    }

    /// Every order the account has ever placed, in placement order.
    pub fn account_orders(&self, raw_id: i64) -> Result<Vec<OrderMessage>, LookupError> {
        if raw_id < 0 || raw_id >= self.ledger.slot_count() as i64 {
            return Err(LookupError::UnknownAccount);
        }
        let account = self
            .ledger
            .get(AccountId(raw_id as u32))
            .ok_or(LookupError::UnknownAccount)?;
        Ok(account
            .orders
            .iter()
            .filter_map(|id| self.order_message(*id))
            .collect())
    }

    /// Owner name of an order, for front-end authorization checks.
    pub fn account_name_of(&self, raw_id: i64) -> Option<&str> {
        if raw_id < 0 || raw_id > u32::MAX as i64 {
            return None;
        }
        let order = self.store.get(OrderId(raw_id as u32))?;
        self.ledger.get(order.account).map(|acc| acc.name.as_str())
    }

    // ── Quote ───────────────────────────────────────────────────────

    fn refresh_quote_and_tick(&mut self) {
        let (bid, bid_size, bid_depth, ask, ask_size, ask_depth) = {
            let bids = self.book.side(Side::Buy);
            let asks = self.book.side(Side::Sell);
            (
                bids.best_price(),
                bids.best_size(&self.store),
                bids.depth(&self.store),
                asks.best_price(),
                asks.best_size(&self.store),
                asks.depth(&self.store),
            )
        };
        let ts = self.clock.now();
        self.quote
            .refresh_book_fields(bid, ask, bid_size, ask_size, bid_depth, ask_depth, ts);
        let msg = self.quote.message(&self.config.venue, &self.config.symbol);
        self.events.ticker(&self.config.venue, &self.config.symbol, &msg);
    }

    // ── Snapshots & accessors ───────────────────────────────────────

    /// Wire snapshot of an order.
    pub fn order_message(&self, id: OrderId) -> Option<OrderMessage> {
        let order = self.store.get(id)?;
        let name = self
            .ledger
            .get(order.account)
            .map(|acc| acc.name.as_str())
            .unwrap_or("");
        Some(OrderMessage::snapshot(
            order,
            name,
            &self.fills,
            &self.config.venue,
            &self.config.symbol,
        ))
    }

    /// Wire snapshot of the quote.
    pub fn quote_message(&self) -> QuoteMessage {
        self.quote.message(&self.config.venue, &self.config.symbol)
    }

    /// Resting orders on one side, best level to worst, FIFO within level.
    pub fn book_entries(&self, side: Side) -> Vec<BookEntry> {
        self.book
            .side(side)
            .orders()
            .into_iter()
            .filter_map(|id| {
                self.store.get(id).map(|order| BookEntry {
                    id: order.id,
                    qty: order.qty,
                    price: order.price,
                })
            })
            .collect()
    }

    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.store.get(id)
    }

    pub fn fill(&self, id: FillId) -> Option<&Fill> {
        self.fills.get(id)
    }

    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.ledger.get(id)
    }

    /// Accounts in slot order (for the scoreboard).
    pub fn accounts(&self) -> impl Iterator<Item = (AccountId, &Account)> + '_ {
        self.ledger.iter()
    }

    pub fn quote(&self) -> &Quote {
        &self.quote
    }

    pub fn venue(&self) -> &str {
        &self.config.venue
    }

    pub fn symbol(&self) -> &str {
        &self.config.symbol
    }

    pub fn start_time(&self) -> &str {
        &self.start_time
    }

    /// A fresh timestamp from the engine clock.
    pub fn timestamp(&mut self) -> String {
        self.clock.now()
    }

    /// Occupancy counters for the introspection verb.
    pub fn memory_stats(&self) -> MemoryStats {
        MemoryStats {
            orders_stored: self.store.len(),
            order_slots: self.store.slot_count(),
            fills_recorded: self.fills.len(),
            accounts_created: self.ledger.len(),
            account_slots: self.ledger.slot_count(),
            bid_levels: self.book.side(Side::Buy).level_stats(),
            bid_nodes: self.book.side(Side::Buy).node_stats(),
            ask_levels: self.book.side(Side::Sell).level_stats(),
            ask_nodes: self.book.side(Side::Sell).node_stats(),
        }
    }
}

/// Pair a standing and an incoming order at the standing order's price;
/// price improvement accrues to the incoming party. Decrements both
/// remainders, records the shared fill, applies the ledger (unless the
/// two accounts share a name), updates last-trade quote fields and emits
/// the two execution events.
#[allow(clippy::too_many_arguments)]
fn cross(
    config: &EngineConfig,
    clock: &mut Clock,
    store: &mut OrderStore,
    fills: &mut FillLog,
    ledger: &mut AccountLedger,
    quote: &mut Quote,
    events: &mut EventEmitter,
    standing_id: OrderId,
    incoming_id: OrderId,
) {
    let ts = clock.now();

    let (qty, price, standing_account, incoming_account, standing_dir) = {
        let (Some(standing), Some(incoming)) = (store.get(standing_id), store.get(incoming_id))
        else {
            return;
        };
        (
            standing.qty.min(incoming.qty),
            standing.price,
            standing.account,
            incoming.account,
            standing.direction,
        )
    };

    let fill_id = fills.record(Fill {
        price,
        qty,
        ts: ts.clone(),
    });
    if let Some(standing) = store.get_mut(standing_id) {
        standing.apply_fill(fill_id, qty);
    }
    if let Some(incoming) = store.get_mut(incoming_id) {
        incoming.apply_fill(fill_id, qty);
    }

    // Self-trades fill both orders but never touch the ledger. The test
    // is by name: the slots are distinct, the names may not be.
    let same_name = match (ledger.get(standing_account), ledger.get(incoming_account)) {
        (Some(a), Some(b)) => a.name == b.name,
        _ => true,
    };
    if !same_name {
        if let Some(account) = ledger.get_mut(standing_account) {
            account.apply_trade(qty, price, standing_dir);
        }
        if let Some(account) = ledger.get_mut(incoming_account) {
            account.apply_trade(qty, price, standing_dir.opposite());
        }
    }

    quote.set_last(price, qty, clock.now());

    let standing_complete = store.get(standing_id).is_some_and(|order| !order.open);
    let incoming_complete = store.get(incoming_id).is_some_and(|order| !order.open);
    for participant in [standing_id, incoming_id] {
        let Some(order) = store.get(participant) else {
            continue;
        };
        let name = ledger
            .get(order.account)
            .map(|acc| acc.name.as_str())
            .unwrap_or("");
        events.execution(&ExecutionMessage {
            ok: true,
            account: name.to_string(),
            venue: config.venue.clone(),
            symbol: config.symbol.clone(),
            order: OrderMessage::snapshot(order, name, fills, &config.venue, &config.symbol),
            standing_id,
            incoming_id,
            price,
            filled: qty,
            filled_at: ts.clone(),
            standing_complete,
            incoming_complete,
        });
    }
}

/// Occupancy counters reported by the introspection verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryStats {
    pub orders_stored: usize,
    pub order_slots: usize,
    pub fills_recorded: usize,
    pub accounts_created: usize,
    pub account_slots: usize,
    pub bid_levels: ArenaStats,
    pub bid_nodes: ArenaStats,
    pub ask_levels: ArenaStats,
    pub ask_nodes: ArenaStats,
}

impl fmt::Display for MemoryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = vec![
            format!("orders_stored: {}", self.orders_stored),
            format!("order_slots: {}", self.order_slots),
            format!("fills_recorded: {}", self.fills_recorded),
            format!("accounts_created: {}", self.accounts_created),
            format!("account_slots: {}", self.account_slots),
        ];
        for (label, stats) in [
            ("bid_levels", self.bid_levels),
            ("bid_nodes", self.bid_nodes),
            ("ask_levels", self.ask_levels),
            ("ask_nodes", self.ask_nodes),
        ] {
            lines.push(format!("{}_live: {}", label, stats.live));
            lines.push(format!("{}_allocated: {}", label, stats.allocated));
            lines.push(format!("{}_free: {}", label, stats.free));
        }
        write!(f, "{}", lines.join(",\n"))
    }
}
