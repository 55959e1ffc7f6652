//! G.711 decoder
//!
//! G.711 is the ITU-T companding standard used in most telephony:
//! - μ-law (PCMU, payload type 0, North America and Japan)
//! - A-law (PCMA, payload type 8, elsewhere)
//!
//! Every payload byte expands to one 16-bit sample at 8 kHz, so any
//! payload length is valid.

pub mod reference;
pub mod tables;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::Result;
use crate::types::{CodecInfo, CodecType, PayloadDecoder};

pub use reference::{alaw_expand, ulaw_expand};
pub use tables::{alaw_expand_table, mulaw_expand_table};

/// G.711 sample rate, fixed by the standard
pub const G711_SAMPLE_RATE: u32 = 8000;

/// G.711 codec variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum G711Variant {
    /// μ-law
    MuLaw,
    /// A-law
    ALaw,
}

/// Stateless G.711 decoder bound to a payload type
#[derive(Debug, Clone)]
pub struct G711Decoder {
    variant: G711Variant,
    payload_type: u8,
}

impl G711Decoder {
    /// μ-law decoder for `payload_type`
    pub fn pcmu(payload_type: u8) -> Self {
        Self {
            variant: G711Variant::MuLaw,
            payload_type,
        }
    }

    /// A-law decoder for `payload_type`
    pub fn pcma(payload_type: u8) -> Self {
        Self {
            variant: G711Variant::ALaw,
            payload_type,
        }
    }

    /// Get the G.711 variant
    pub fn variant(&self) -> G711Variant {
        self.variant
    }

    fn codec_type(&self) -> CodecType {
        match self.variant {
            G711Variant::MuLaw => CodecType::G711Pcmu,
            G711Variant::ALaw => CodecType::G711Pcma,
        }
    }
}

impl PayloadDecoder for G711Decoder {
    fn info(&self) -> CodecInfo {
        CodecInfo {
            name: self.codec_type().name(),
            sample_rate: G711_SAMPLE_RATE,
            channels: 1,
            payload_type: self.payload_type,
        }
    }

    fn decode(&mut self, payload: &[u8]) -> Result<Bytes> {
        let expand = match self.variant {
            G711Variant::MuLaw => mulaw_expand_table,
            G711Variant::ALaw => alaw_expand_table,
        };

        let mut output = BytesMut::with_capacity(payload.len() * 2);
        for &code in payload {
            output.put_i16_le(expand(code));
        }
        Ok(output.freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pcmu_silence_decodes_to_zero() {
        let mut decoder = G711Decoder::pcmu(0);
        let pcm = decoder.decode(&[0xFF; 160]).unwrap();
        assert_eq!(pcm.len(), 320);
        assert!(pcm.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_pcma_little_endian_output() {
        let mut decoder = G711Decoder::pcma(8);
        // 0xAA expands to 32256 = 0x7E00
        let pcm = decoder.decode(&[0xAA, 0xD5]).unwrap();
        assert_eq!(&pcm[..], &[0x00, 0x7E, 0x08, 0x00]);
    }

    #[test]
    fn test_info_reports_binding() {
        let decoder = G711Decoder::pcma(97);
        let info = decoder.info();
        assert_eq!(info.name, "PCMA");
        assert_eq!(info.sample_rate, 8000);
        assert_eq!(info.channels, 1);
        assert_eq!(info.payload_type, 97);
        assert_eq!(decoder.variant(), G711Variant::ALaw);
    }

    #[test]
    fn test_empty_payload() {
        let mut decoder = G711Decoder::pcmu(0);
        assert!(decoder.decode(&[]).unwrap().is_empty());
    }
}
