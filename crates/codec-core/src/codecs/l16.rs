//! L16 linear PCM decoder (RFC 3551 §4.5.11)
//!
//! Samples travel as signed 16-bit big-endian; decoding is a byte swap.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{CodecError, Result};
use crate::types::{CodecInfo, CodecType, PayloadDecoder};

/// Mono L16 decoder
#[derive(Debug, Clone)]
pub struct L16Decoder {
    payload_type: u8,
    sample_rate: u32,
}

impl L16Decoder {
    /// Create a decoder for `payload_type` at `sample_rate`
    pub fn new(payload_type: u8, sample_rate: u32) -> Self {
        Self {
            payload_type,
            sample_rate,
        }
    }
}

impl PayloadDecoder for L16Decoder {
    fn info(&self) -> CodecInfo {
        CodecInfo {
            name: CodecType::L16.name(),
            sample_rate: self.sample_rate,
            channels: 1,
            payload_type: self.payload_type,
        }
    }

    fn decode(&mut self, payload: &[u8]) -> Result<Bytes> {
        if payload.len() % 2 != 0 {
            return Err(CodecError::invalid_payload(format!(
                "L16 payload of {} bytes is not a whole number of samples",
                payload.len()
            )));
        }

        let mut input = payload;
        let mut output = BytesMut::with_capacity(payload.len());
        while input.has_remaining() {
            output.put_i16_le(input.get_i16());
        }
        Ok(output.freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_swap() {
        let mut decoder = L16Decoder::new(11, 44100);
        let pcm = decoder.decode(&[0x12, 0x34, 0xFF, 0xFE]).unwrap();
        assert_eq!(&pcm[..], &[0x34, 0x12, 0xFE, 0xFF]);
        assert_eq!(decoder.info().sample_rate, 44100);
    }

    #[test]
    fn test_odd_length_is_rejected() {
        let mut decoder = L16Decoder::new(11, 44100);
        let err = decoder.decode(&[0x00, 0x01, 0x02]).unwrap_err();
        assert!(matches!(err, CodecError::InvalidPayload { .. }));
        assert!(err.is_recoverable());

        // still usable afterwards
        assert_eq!(decoder.decode(&[0x00, 0x01]).unwrap().len(), 2);
    }
}
