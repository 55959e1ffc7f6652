//! Core types and traits for the codec library

use bytes::Bytes;
use std::fmt;

use crate::error::{CodecError, Result};

/// Decoding capability bound to one payload type.
///
/// Decoders are stateful: whatever a codec needs to carry from one
/// payload to the next lives in `self`, which is why [`decode`] takes
/// `&mut self`. Output is always mono 16-bit little-endian PCM at
/// [`CodecInfo::sample_rate`].
///
/// [`decode`]: PayloadDecoder::decode
pub trait PayloadDecoder: Send {
    /// Get codec information
    fn info(&self) -> CodecInfo;

    /// Decode one payload to little-endian 16-bit PCM bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is malformed for this codec. The
    /// decoder stays usable for the next payload.
    fn decode(&mut self, payload: &[u8]) -> Result<Bytes>;

    /// Reset codec state
    ///
    /// Clears any state carried between payloads, e.g. on a stream
    /// discontinuity.
    fn reset(&mut self) {}
}

/// Audio codec information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecInfo {
    /// Codec name (e.g., "PCMU", "PCMA", "L16")
    pub name: &'static str,
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u8,
    /// RTP payload type this decoder is bound to
    pub payload_type: u8,
}

/// Audio codec types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecType {
    /// G.711 μ-law (PCMU)
    G711Pcmu,
    /// G.711 A-law (PCMA)
    G711Pcma,
    /// Linear 16-bit PCM, network byte order
    L16,
}

impl CodecType {
    /// Get the codec name
    pub fn name(self) -> &'static str {
        match self {
            Self::G711Pcmu => "PCMU",
            Self::G711Pcma => "PCMA",
            Self::L16 => "L16",
        }
    }

    /// Look up a codec by its SDP encoding name (case-insensitive)
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_ascii_uppercase().as_str() {
            "PCMU" => Ok(Self::G711Pcmu),
            "PCMA" => Ok(Self::G711Pcma),
            "L16" => Ok(Self::L16),
            _ => Err(CodecError::unsupported_codec(name)),
        }
    }

    /// Get the default sample rate
    pub fn default_sample_rate(self) -> u32 {
        match self {
            Self::G711Pcmu | Self::G711Pcma => 8000,
            Self::L16 => 44100,
        }
    }

    /// Get the static RTP payload type (RFC 3551), mono variants only
    pub fn static_payload_type(self) -> u8 {
        match self {
            Self::G711Pcmu => 0,
            Self::G711Pcma => 8,
            Self::L16 => 11,
        }
    }

    /// Map a static payload type back to a codec type
    pub fn from_static_payload_type(payload_type: u8) -> Option<Self> {
        match payload_type {
            0 => Some(Self::G711Pcmu),
            8 => Some(Self::G711Pcma),
            11 => Some(Self::L16),
            _ => None,
        }
    }
}

impl fmt::Display for CodecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_type_names() {
        assert_eq!(CodecType::from_name("pcmu").unwrap(), CodecType::G711Pcmu);
        assert_eq!(CodecType::from_name("PCMA").unwrap(), CodecType::G711Pcma);
        assert_eq!(CodecType::from_name("l16").unwrap(), CodecType::L16);
        assert!(matches!(
            CodecType::from_name("G729"),
            Err(CodecError::UnsupportedCodec { .. })
        ));
        assert_eq!(CodecType::G711Pcma.to_string(), "PCMA");
    }

    #[test]
    fn test_static_payload_type_mapping() {
        for codec in [CodecType::G711Pcmu, CodecType::G711Pcma, CodecType::L16] {
            assert_eq!(
                CodecType::from_static_payload_type(codec.static_payload_type()),
                Some(codec)
            );
        }
        assert_eq!(CodecType::from_static_payload_type(18), None);
        assert_eq!(CodecType::from_static_payload_type(96), None);
    }
}
