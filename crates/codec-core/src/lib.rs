//! # Codec-Core: payload decoders for rtpwav
//!
//! Maps an RTP payload type to a decoder that turns compressed payload
//! bytes into 16-bit little-endian linear PCM.
//!
//! - **G.711 (PCMU/PCMA)**: ITU-T μ-law and A-law expansion via lookup tables
//! - **L16**: RFC 3551 linear PCM, byte-swapped from network order
//!
//! ## Usage
//!
//! ```rust
//! use codec_core::CodecRegistry;
//!
//! let mut registry = CodecRegistry::with_static_payload_types();
//!
//! let decoder = registry.resolve(0).expect("PCMU is registered");
//! assert_eq!(decoder.info().sample_rate, 8000);
//!
//! let pcm = decoder.decode(&[0xFF; 160])?;
//! assert_eq!(pcm.len(), 320);
//!
//! // Unknown payload types resolve to nothing rather than an error
//! assert!(registry.resolve(101).is_none());
//! # Ok::<(), codec_core::CodecError>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `g711`: G.711 μ-law/A-law decoders (enabled by default)
//! - `l16`: linear PCM decoder (enabled by default)

#![warn(missing_docs)]

pub mod codecs;
pub mod error;
pub mod types;

pub use codecs::{CodecFactory, CodecRegistry};
pub use error::{CodecError, Result};
pub use types::{CodecInfo, CodecType, PayloadDecoder};

/// Version information for the codec library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Supported codec names
pub const SUPPORTED_CODECS: &[&str] = &[
    #[cfg(feature = "g711")]
    "PCMU",
    #[cfg(feature = "g711")]
    "PCMA",
    #[cfg(feature = "l16")]
    "L16",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_codecs() {
        assert!(!SUPPORTED_CODECS.is_empty());

        #[cfg(feature = "g711")]
        {
            assert!(SUPPORTED_CODECS.contains(&"PCMU"));
            assert!(SUPPORTED_CODECS.contains(&"PCMA"));
        }

        #[cfg(feature = "l16")]
        assert!(SUPPORTED_CODECS.contains(&"L16"));
    }
}
