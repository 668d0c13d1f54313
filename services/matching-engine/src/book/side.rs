//! One side of the order book
//!
//! A side is a doubly linked list of price levels sorted best-first (bids
//! descending, asks ascending). Each level owns a FIFO doubly linked list
//! of order nodes, one node per resting limit order, appended at the tail
//! so arrival order is preserved. All links are arena indices.
//!
//! Structural invariants while on the book: level prices are strictly
//! monotonic, no level is empty, and — outside the window between a match
//! and the following head cleanup — every node references an open order.

use crate::book::arena::{Arena, ArenaStats, NIL};
use crate::store::OrderStore;
use types::ids::OrderId;
use types::order::{Order, Side};

/// A price level: one node in the sorted level list, owning the FIFO of
/// resting orders at exactly this price.
#[derive(Debug, Clone, Copy)]
struct Level {
    price: i32,
    prev: u32,
    next: u32,
    head: u32,
    tail: u32,
}

/// Book-side membership record for one open limit order. At most one node
/// per order exists at any time.
#[derive(Debug, Clone, Copy)]
struct OrderNode {
    order: OrderId,
    prev: u32,
    next: u32,
}

/// Cursor over matchable standing orders: best level first, FIFO within
/// each level. Holds indices only, so the walk survives order mutation —
/// but the book must not change structurally until the walk is done.
#[derive(Debug, Clone, Copy)]
pub struct MatchWalk {
    level: u32,
    node: u32,
}

/// One side of the book.
#[derive(Debug)]
pub struct BookSide {
    side: Side,
    levels: Arena<Level>,
    nodes: Arena<OrderNode>,
    best: u32,
}

impl BookSide {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: Arena::new(),
            nodes: Arena::new(),
            best: NIL,
        }
    }

    /// Is price `a` strictly better than `b` on this side?
    fn beats(&self, a: i32, b: i32) -> bool {
        match self.side {
            Side::Buy => a > b,
            Side::Sell => a < b,
        }
    }

    /// Is a level at `level_price` strictly worse than an incoming order's
    /// limit? (Better-or-equal means matchable.)
    fn worse_than(&self, level_price: i32, limit: i32) -> bool {
        self.beats(limit, level_price)
    }

    pub fn best_price(&self) -> Option<i32> {
        (self.best != NIL).then(|| self.levels.get(self.best).price)
    }

    pub fn is_empty(&self) -> bool {
        self.best == NIL
    }

    /// Add a resting limit order: find or create its level, append its
    /// node at the level's tail. A level created between two existing ones
    /// is spliced into the sorted list.
    pub fn insert(&mut self, order: &Order) {
        let node = self.nodes.alloc(OrderNode {
            order: order.id,
            prev: NIL,
            next: NIL,
        });
        let price = order.price;

        let mut prev = NIL;
        let mut cur = self.best;
        while cur != NIL {
            let level_price = self.levels.get(cur).price;
            if level_price == price {
                self.push_node(cur, node);
                return;
            }
            if self.beats(price, level_price) {
                break;
            }
            prev = cur;
            cur = self.levels.get(cur).next;
        }

        // New level between prev and cur (either may be nil).
        let level = self.levels.alloc(Level {
            price,
            prev,
            next: cur,
            head: node,
            tail: node,
        });
        if prev == NIL {
            self.best = level;
        } else {
            self.levels.get_mut(prev).next = level;
        }
        if cur != NIL {
            self.levels.get_mut(cur).prev = level;
        }
    }

    fn push_node(&mut self, level_idx: u32, node_idx: u32) {
        let old_tail = self.levels.get(level_idx).tail;
        if old_tail == NIL {
            let level = self.levels.get_mut(level_idx);
            level.head = node_idx;
            level.tail = node_idx;
        } else {
            self.nodes.get_mut(old_tail).next = node_idx;
            self.nodes.get_mut(node_idx).prev = old_tail;
            self.levels.get_mut(level_idx).tail = node_idx;
        }
    }

    /// Start a matching walk at the head of the book.
    pub fn walk_matchable(&self) -> MatchWalk {
        match self.best {
            NIL => MatchWalk {
                level: NIL,
                node: NIL,
            },
            best => MatchWalk {
                level: best,
                node: self.levels.get(best).head,
            },
        }
    }

    /// Yield the next standing order, or `None` once the walk reaches a
    /// level priced worse than `limit` (market walks never stop on price)
    /// or runs off the end of the side.
    pub fn next_matchable(
        &self,
        walk: &mut MatchWalk,
        limit: i32,
        is_market: bool,
    ) -> Option<OrderId> {
        loop {
            if walk.level == NIL {
                return None;
            }
            let level = *self.levels.get(walk.level);
            if !is_market && self.worse_than(level.price, limit) {
                return None;
            }
            if walk.node == NIL {
                walk.level = level.next;
                walk.node = if walk.level == NIL {
                    NIL
                } else {
                    self.levels.get(walk.level).head
                };
                continue;
            }
            let node = *self.nodes.get(walk.node);
            walk.node = node.next;
            return Some(node.order);
        }
    }

    /// Remove the node for a resting limit order, collapsing its level if
    /// that empties it. Returns false if the order is not on this side
    /// (already filled or cancelled).
    pub fn cancel(&mut self, order: &Order) -> bool {
        let Some(level_idx) = self.find_level(order.price) else {
            return false;
        };
        let Some(node_idx) = self.find_node(level_idx, order.id) else {
            return false;
        };
        self.unlink_node(level_idx, node_idx);
        true
    }

    fn find_level(&self, price: i32) -> Option<u32> {
        let mut cur = self.best;
        while cur != NIL {
            let level_price = self.levels.get(cur).price;
            if level_price == price {
                return Some(cur);
            }
            if self.beats(price, level_price) {
                // Walked past where the level would be: it does not exist.
                return None;
            }
            cur = self.levels.get(cur).next;
        }
        None
    }

    fn find_node(&self, level_idx: u32, id: OrderId) -> Option<u32> {
        let mut cur = self.levels.get(level_idx).head;
        while cur != NIL {
            let node = self.nodes.get(cur);
            if node.order == id {
                return Some(cur);
            }
            cur = node.next;
        }
        None
    }

    fn unlink_node(&mut self, level_idx: u32, node_idx: u32) {
        let node = *self.nodes.get(node_idx);
        if node.prev != NIL {
            self.nodes.get_mut(node.prev).next = node.next;
        } else {
            self.levels.get_mut(level_idx).head = node.next;
        }
        if node.next != NIL {
            self.nodes.get_mut(node.next).prev = node.prev;
        } else {
            self.levels.get_mut(level_idx).tail = node.prev;
        }
        self.nodes.release(node_idx);

        if self.levels.get(level_idx).head == NIL {
            self.unlink_level(level_idx);
        }
    }

    fn unlink_level(&mut self, level_idx: u32) {
        let level = *self.levels.get(level_idx);
        if level.prev != NIL {
            self.levels.get_mut(level.prev).next = level.next;
        } else {
            self.best = level.next;
        }
        if level.next != NIL {
            self.levels.get_mut(level.next).prev = level.prev;
        }
        self.levels.release(level_idx);
    }

    /// Strip filled orders from the head of the side. After a match, only
    /// the head region can hold closed nodes — matching traverses strictly
    /// from the head outward — so this restores the all-open invariant.
    pub fn cleanup_head(&mut self, store: &OrderStore) {
        while self.best != NIL {
            let level_idx = self.best;
            let head = self.levels.get(level_idx).head;
            let open = store
                .get(self.nodes.get(head).order)
                .is_some_and(|order| order.open);
            if open {
                return;
            }
            self.unlink_node(level_idx, head);
        }
    }

    /// Total remaining quantity at the best level.
    pub fn best_size(&self, store: &OrderStore) -> i64 {
        if self.best == NIL {
            0
        } else {
            self.level_size(self.best, store)
        }
    }

    /// Total remaining quantity over the best level and all worse levels.
    pub fn depth(&self, store: &OrderStore) -> i64 {
        let mut total = 0i64;
        let mut level = self.best;
        while level != NIL {
            total += self.level_size(level, store);
            level = self.levels.get(level).next;
        }
        total
    }

    fn level_size(&self, level_idx: u32, store: &OrderStore) -> i64 {
        let mut total = 0i64;
        let mut cur = self.levels.get(level_idx).head;
        while cur != NIL {
            let node = self.nodes.get(cur);
            if let Some(order) = store.get(node.order) {
                total += order.qty as i64;
            }
            cur = node.next;
        }
        total
    }

    /// True iff this side holds at least `qty` of volume at prices equal
    /// to or better than `limit`. Counts down from `qty` rather than
    /// summing the book: a pathological book could overflow any
    /// accumulator built the other way.
    pub fn can_fill(&self, qty: i32, limit: i32, store: &OrderStore) -> bool {
        let mut needed = qty;
        let mut level = self.best;
        while level != NIL {
            let l = *self.levels.get(level);
            if self.worse_than(l.price, limit) {
                break;
            }
            let mut cur = l.head;
            while cur != NIL {
                let node = *self.nodes.get(cur);
                if let Some(order) = store.get(node.order) {
                    needed -= order.qty;
                    if needed <= 0 {
                        return true;
                    }
                }
                cur = node.next;
            }
            level = l.next;
        }
        false
    }

    /// Every resting order id, best level to worst, FIFO within a level.
    pub fn orders(&self) -> Vec<OrderId> {
        let mut out = Vec::new();
        let mut level = self.best;
        while level != NIL {
            let l = self.levels.get(level);
            let mut cur = l.head;
            while cur != NIL {
                let node = self.nodes.get(cur);
                out.push(node.order);
                cur = node.next;
            }
            level = l.next;
        }
        out
    }

    /// Level prices, best first.
    pub fn level_prices(&self) -> Vec<i32> {
        let mut out = Vec::new();
        let mut level = self.best;
        while level != NIL {
            let l = self.levels.get(level);
            out.push(l.price);
            level = l.next;
        }
        out
    }

    pub fn level_stats(&self) -> ArenaStats {
        self.levels.stats()
    }

    pub fn node_stats(&self) -> ArenaStats {
        self.nodes.stats()
    }
}
