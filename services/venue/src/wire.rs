//! Binary order-book encoding
//!
//! Big-endian, 8 bytes per message: u32 quantity then u32 price, one
//! message per resting order, bids first (best level to worst, FIFO
//! within a level), then asks. A resting order's quantity is never zero,
//! so an all-zero message is an unambiguous side terminator:
//!
//! ```text
//! bids … 0x0000000000000000 asks … 0x0000000000000000
//! ```

use matching_engine::Engine;
use types::order::Side;

const SIDE_FLAG: [u8; 8] = [0; 8];

/// Encode the whole book.
pub fn encode_book(engine: &Engine) -> Vec<u8> {
    let mut out = Vec::new();
    for side in [Side::Buy, Side::Sell] {
        for entry in engine.book_entries(side) {
            out.extend_from_slice(&(entry.qty as u32).to_be_bytes());
            out.extend_from_slice(&(entry.price as u32).to_be_bytes());
        }
        out.extend_from_slice(&SIDE_FLAG);
    }
    out
}
