//! Sequence-number reorder buffer

use std::collections::VecDeque;
use tracing::trace;

use crate::error::{Error, Result};
use crate::packet::MediaPacket;

/// Result of offering a packet to the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The packet was stored at its ordered position
    Inserted,
    /// A packet with the same sequence number is already buffered; the
    /// new one was discarded
    Duplicate,
}

/// Holding area that yields packets in ascending sequence-number order.
///
/// Entries are kept sorted at all times and no two entries share a
/// sequence number. Ordering is plain numeric on the 16-bit value, so a
/// batch that straddles a sequence wrap is not reordered correctly.
#[derive(Debug, Default)]
pub struct ReorderBuffer {
    packets: VecDeque<MediaPacket>,
}

impl ReorderBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self {
            packets: VecDeque::new(),
        }
    }

    /// Create an empty buffer with room for `capacity` packets
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            packets: VecDeque::with_capacity(capacity),
        }
    }

    /// Insert a packet at its ordered position.
    ///
    /// If a packet with the same sequence number is already buffered the
    /// new packet is dropped and the buffered copy is kept.
    pub fn insert(&mut self, packet: MediaPacket) -> InsertOutcome {
        let seq = packet.sequence_number();
        match self
            .packets
            .binary_search_by_key(&seq, MediaPacket::sequence_number)
        {
            Ok(_) => {
                trace!("Dropping duplicate packet seq={}", seq);
                InsertOutcome::Duplicate
            }
            Err(position) => {
                self.packets.insert(position, packet);
                InsertOutcome::Inserted
            }
        }
    }

    /// Remove and return the packet with the lowest sequence number
    pub fn pop_min(&mut self) -> Result<MediaPacket> {
        self.packets.pop_front().ok_or(Error::EmptyBuffer)
    }

    /// Look at the packet `pop_min` would return
    pub fn peek_min(&self) -> Option<&MediaPacket> {
        self.packets.front()
    }

    /// Whether the buffer holds no packets
    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    /// Number of buffered packets
    pub fn len(&self) -> usize {
        self.packets.len()
    }

    /// Drop every buffered packet
    pub fn clear(&mut self) {
        self.packets.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packet(seq: u16, fill: u8) -> MediaPacket {
        MediaPacket::new(0, seq, seq as u32 * 160, vec![fill; 4])
    }

    #[test]
    fn test_pops_in_sequence_order() {
        let mut buffer = ReorderBuffer::new();
        for seq in [5u16, 2, 9, 1, 7] {
            assert_eq!(buffer.insert(packet(seq, 0)), InsertOutcome::Inserted);
        }
        assert_eq!(buffer.len(), 5);
        assert_eq!(buffer.peek_min().map(MediaPacket::sequence_number), Some(1));

        let order: Vec<u16> = std::iter::from_fn(|| buffer.pop_min().ok())
            .map(|p| p.sequence_number())
            .collect();
        assert_eq!(order, vec![1, 2, 5, 7, 9]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_duplicate_keeps_first_copy() {
        let mut buffer = ReorderBuffer::new();
        assert_eq!(buffer.insert(packet(5, 0xAA)), InsertOutcome::Inserted);
        assert_eq!(buffer.insert(packet(5, 0xBB)), InsertOutcome::Duplicate);
        assert_eq!(buffer.len(), 1);

        let kept = buffer.pop_min().unwrap();
        assert_eq!(&kept.payload()[..], &[0xAA; 4]);
    }

    #[test]
    fn test_pop_empty_is_error() {
        let mut buffer = ReorderBuffer::new();
        assert!(matches!(buffer.pop_min(), Err(Error::EmptyBuffer)));

        buffer.insert(packet(1, 0));
        buffer.clear();
        assert!(matches!(buffer.pop_min(), Err(Error::EmptyBuffer)));
    }
}
