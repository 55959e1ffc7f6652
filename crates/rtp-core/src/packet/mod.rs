//! Media packet model
//!
//! A [`MediaPacket`] is the unit that flows through the reconstruction
//! pipeline. It is immutable once built; ownership moves from the packet
//! source into the reorder buffer and from there into the decoder.

mod rtp;

pub use rtp::{RTP_FIXED_HEADER_LEN, RTP_VERSION};

use bytes::Bytes;
use std::fmt;

use crate::{RtpPayloadType, RtpSequenceNumber, RtpTimestamp};

/// One received media packet of a single stream
#[derive(Clone, PartialEq, Eq)]
pub struct MediaPacket {
    payload_type: RtpPayloadType,
    sequence_number: RtpSequenceNumber,
    timestamp: RtpTimestamp,
    ssrc: u32,
    marker: bool,
    payload: Bytes,
}

impl MediaPacket {
    /// Create a packet from already-demultiplexed fields
    pub fn new(
        payload_type: RtpPayloadType,
        sequence_number: RtpSequenceNumber,
        timestamp: RtpTimestamp,
        payload: impl Into<Bytes>,
    ) -> Self {
        Self {
            payload_type,
            sequence_number,
            timestamp,
            ssrc: 0,
            marker: false,
            payload: payload.into(),
        }
    }

    /// Set the synchronization source identifier
    pub fn with_ssrc(mut self, ssrc: u32) -> Self {
        self.ssrc = ssrc;
        self
    }

    /// Set the marker bit
    pub fn with_marker(mut self, marker: bool) -> Self {
        self.marker = marker;
        self
    }

    /// Payload type identifier used to pick a decoder
    pub fn payload_type(&self) -> RtpPayloadType {
        self.payload_type
    }

    /// Sender-assigned sequence number
    pub fn sequence_number(&self) -> RtpSequenceNumber {
        self.sequence_number
    }

    /// Media timestamp in codec clock units
    pub fn timestamp(&self) -> RtpTimestamp {
        self.timestamp
    }

    /// Synchronization source identifier (0 when not known)
    pub fn ssrc(&self) -> u32 {
        self.ssrc
    }

    /// Marker bit
    pub fn marker(&self) -> bool {
        self.marker
    }

    /// Compressed payload bytes
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }
}

impl fmt::Debug for MediaPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaPacket")
            .field("payload_type", &self.payload_type)
            .field("sequence_number", &self.sequence_number)
            .field("timestamp", &self.timestamp)
            .field("ssrc", &format_args!("{:#010x}", self.ssrc))
            .field("marker", &self.marker)
            .field("payload_len", &self.payload.len())
            .finish()
    }
}
