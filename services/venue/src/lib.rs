//! Venue process library
//!
//! The pieces of the venue binary that make sense to exercise directly:
//! the command dispatcher, the binary book encoding and the scoreboard
//! rendering. The binary itself only wires these to stdin/stdout/stderr.

pub mod dispatch;
pub mod scores;
pub mod wire;
