//! Error types for the reconstruction pipeline
//!
//! Only errors that abort a run live here. Per-packet problems (unknown
//! payload type, undecodable payload) are logged and counted in the
//! [`ReconstructionReport`](crate::ReconstructionReport) instead.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for media-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal reconstruction errors
#[derive(Error, Debug)]
pub enum Error {
    /// Output destination could not be created
    #[error("Failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Write, seek, flush or close on the destination failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// PCM length no longer fits the container's 32-bit size fields
    #[error("Container too large: {pcm_len} bytes of PCM exceeds the RIFF size limit")]
    ContainerOverflow { pcm_len: u64 },

    /// A packet's codec disagrees with the stream's sample rate under the abort policy
    #[error("Sample rate mismatch at sequence {sequence}: stream {expected}Hz, codec {actual}Hz")]
    SampleRateMismatch {
        expected: u32,
        actual: u32,
        sequence: u16,
    },

    /// Reorder buffer invariant violation
    #[error("Reorder buffer error: {0}")]
    Buffer(#[from] rtp_core::Error),

    /// Invalid pipeline configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Bytes that do not form a WAV header this crate writes
    #[error("Invalid WAV header: {0}")]
    InvalidHeader(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config(details: impl Into<String>) -> Self {
        Self::Config(details.into())
    }

    /// Create a new invalid header error
    pub fn invalid_header(details: impl Into<String>) -> Self {
        Self::InvalidHeader(details.into())
    }
}
