//! Error handling for the codec library
//!
//! Every error in this module is scoped to a single payload: the caller
//! decides whether to skip the packet or give up on the stream.

#![allow(missing_docs)]

use std::fmt;
use thiserror::Error;

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;

/// Error type for codec lookup and decoding
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// No decoder exists for a payload type
    #[error("Unsupported payload type: {payload_type}")]
    UnsupportedPayloadType { payload_type: u8 },

    /// No decoder exists for a codec name
    #[error("Unsupported codec: {name}")]
    UnsupportedCodec { name: String },

    /// Invalid decoder configuration
    #[error("Invalid codec configuration: {details}")]
    InvalidConfig { details: String },

    /// Payload cannot be decoded by the codec it was routed to
    #[error("Invalid payload data: {details}")]
    InvalidPayload { details: String },

    /// Decoding operation failed
    #[error("Decoding failed: {reason}")]
    DecodingFailed { reason: String },
}

impl CodecError {
    /// Create a new unsupported codec error
    pub fn unsupported_codec(name: impl Into<String>) -> Self {
        Self::UnsupportedCodec { name: name.into() }
    }

    /// Create a new invalid configuration error
    pub fn invalid_config(details: impl Into<String>) -> Self {
        Self::InvalidConfig {
            details: details.into(),
        }
    }

    /// Create a new invalid payload error
    pub fn invalid_payload(details: impl Into<String>) -> Self {
        Self::InvalidPayload {
            details: details.into(),
        }
    }

    /// Create a new decoding failed error
    pub fn decoding_failed(reason: impl Into<String>) -> Self {
        Self::DecodingFailed {
            reason: reason.into(),
        }
    }

    /// Check if this error is recoverable, i.e. the next packet may decode fine
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidPayload { .. } | Self::DecodingFailed { .. } => true,

            Self::UnsupportedPayloadType { .. }
            | Self::UnsupportedCodec { .. }
            | Self::InvalidConfig { .. } => false,
        }
    }

    /// Get the error category
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnsupportedPayloadType { .. }
            | Self::UnsupportedCodec { .. }
            | Self::InvalidConfig { .. } => ErrorCategory::Configuration,

            Self::InvalidPayload { .. } | Self::DecodingFailed { .. } => ErrorCategory::Processing,
        }
    }
}

/// Error category for grouping related errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Lookup and configuration errors
    Configuration,
    /// Payload processing errors
    Processing,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "Configuration"),
            Self::Processing => write!(f, "Processing"),
        }
    }
}
