//! Shared fills and the append-only fill log
//!
//! One trade produces one fill, referenced by the two participating
//! orders. Fills have no single owner, so they live in a global
//! append-only log addressed by [`FillId`]; each order keeps a small list
//! of fill ids. Nothing is ever removed: historical status queries must be
//! able to resolve every fill for the life of the process.

use crate::ids::FillId;
use serde::{Deserialize, Serialize};

/// One execution record: the traded price, quantity and time of a cross.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    pub price: i32,
    pub qty: i32,
    pub ts: String,
}

/// Append-only log of every fill on the venue.
#[derive(Debug, Default)]
pub struct FillLog {
    fills: Vec<Fill>,
}

impl FillLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fill, returning its id.
    pub fn record(&mut self, fill: Fill) -> FillId {
        let id = FillId(self.fills.len() as u32);
        self.fills.push(fill);
        id
    }

    pub fn get(&self, id: FillId) -> Option<&Fill> {
        self.fills.get(id.index())
    }

    /// Resolve a list of fill ids into owned fills, in order. Ids always
    /// come from this log, so unknown ids are simply skipped.
    pub fn resolve(&self, ids: &[FillId]) -> Vec<Fill> {
        ids.iter().filter_map(|id| self.get(*id)).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.fills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fills.is_empty()
    }
}
