//! Packet buffering
//!
//! The reconstruction pipeline works on a finite, already-captured packet
//! collection, so the buffer here is a plain sorted holding area rather
//! than a timed playout (jitter) buffer.

mod reorder;

pub use reorder::{InsertOutcome, ReorderBuffer};
