//! Matching engine for one (venue, symbol) pair
//!
//! The engine owns all matching state: the order store, the account
//! ledger, the fill log, the two-sided book, the derived quote and the
//! event stream. One engine processes one command at a time to
//! completion; there is no internal parallelism and nothing suspends
//! mid-command.
//!
//! **Key invariants:**
//! - Price-time priority strictly enforced (bids high-first, asks
//!   low-first, FIFO within a price)
//! - Trades execute at the standing order's price
//! - For every order, remaining + filled = original quantity
//! - Orders and fills stay retrievable by id for the life of the process

pub mod book;
pub mod engine;
pub mod events;
pub mod ledger;
pub mod store;

pub use engine::{BookEntry, Engine, EngineConfig, MemoryStats, OrderRequest};
