//! Error types for packet parsing, reordering and capture input

use thiserror::Error;

/// Result type alias for rtp-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by rtp-core
#[derive(Error, Debug)]
pub enum Error {
    /// `pop_min` was called on an empty reorder buffer.
    ///
    /// The pipeline only pops after checking for emptiness, so seeing this
    /// error means the refill/drain discipline was broken.
    #[error("Reorder buffer is empty (this is a bug, please report it)")]
    EmptyBuffer,

    /// Datagram shorter than the header it claims to carry
    #[error("RTP packet too short: need {needed} bytes, got {actual}")]
    PacketTooShort { needed: usize, actual: usize },

    /// RTP version field is not 2
    #[error("Unsupported RTP version: {version}")]
    UnsupportedVersion { version: u8 },

    /// Padding count larger than the remaining payload
    #[error("Invalid RTP padding: {padding} bytes with {available} bytes of payload")]
    InvalidPadding { padding: usize, available: usize },

    /// rtpdump file does not start with the expected preamble
    #[error("Invalid rtpdump header: {details}")]
    InvalidDumpHeader { details: String },

    /// rtpdump record header or body cut short
    #[error("Truncated rtpdump record: expected {expected} bytes, got {actual}")]
    TruncatedRecord { expected: usize, actual: usize },

    /// Underlying reader failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new invalid rtpdump header error
    pub fn invalid_dump_header(details: impl Into<String>) -> Self {
        Self::InvalidDumpHeader {
            details: details.into(),
        }
    }

    /// Whether the error only affects a single packet and the caller can
    /// move on to the next one
    pub fn is_per_packet(&self) -> bool {
        matches!(
            self,
            Self::PacketTooShort { .. }
                | Self::UnsupportedVersion { .. }
                | Self::InvalidPadding { .. }
        )
    }
}
