//! Canonical 44-byte PCM WAV header
//!
//! ```text
//! offset  size  field
//!  0      4     "RIFF"
//!  4      4     chunk size = 44 + data_len - 8
//!  8      4     "WAVE"
//! 12      4     "fmt "
//! 16      4     16
//! 20      2     audio format = 1 (PCM)
//! 22      2     channels
//! 24      4     sample rate
//! 28      4     byte rate = sample_rate * block_align
//! 32      2     block align = channels * bits / 8
//! 34      2     bits per sample
//! 36      4     "data"
//! 40      4     data_len
//! ```
//!
//! All integers little-endian.

use bytes::{Buf, BufMut};

use crate::error::{Error, Result};

/// Size of the header in bytes
pub const WAV_HEADER_LEN: usize = 44;

const PCM_FORMAT_TAG: u16 = 1;
const FMT_CHUNK_LEN: u32 = 16;
const RIFF_PREAMBLE_LEN: u32 = 8;

/// Header fields of a PCM WAV file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    /// Samples per second
    pub sample_rate: u32,
    /// Channel count
    pub channels: u16,
    /// Bits per sample
    pub bits_per_sample: u16,
    /// Length of the `data` chunk payload in bytes
    pub data_len: u32,
}

impl WavHeader {
    /// Mono 16-bit PCM header, the only layout the pipeline produces
    pub fn mono_pcm16(sample_rate: u32, data_len: u32) -> Self {
        Self {
            sample_rate,
            channels: 1,
            bits_per_sample: 16,
            data_len,
        }
    }

    /// Bytes per sample frame, `None` if it does not fit the 16-bit field
    pub fn block_align(&self) -> Option<u16> {
        self.channels.checked_mul(self.bits_per_sample / 8)
    }

    /// Bytes per second, `None` if it does not fit the 32-bit field
    pub fn byte_rate(&self) -> Option<u32> {
        self.sample_rate
            .checked_mul(self.block_align()? as u32)
    }

    /// Value of the RIFF chunk size field
    pub fn riff_chunk_size(&self) -> u32 {
        (WAV_HEADER_LEN as u32 - RIFF_PREAMBLE_LEN).saturating_add(self.data_len)
    }

    /// Serialize to the on-disk layout.
    ///
    /// Fails with [`Error::InvalidHeader`] when the derived block align or
    /// byte rate overflow their fields.
    pub fn to_bytes(&self) -> Result<[u8; WAV_HEADER_LEN]> {
        let (block_align, byte_rate) = self.derived_fields()?;
        let mut out = [0u8; WAV_HEADER_LEN];
        let mut buf = &mut out[..];

        buf.put_slice(b"RIFF");
        buf.put_u32_le(self.riff_chunk_size());
        buf.put_slice(b"WAVE");

        buf.put_slice(b"fmt ");
        buf.put_u32_le(FMT_CHUNK_LEN);
        buf.put_u16_le(PCM_FORMAT_TAG);
        buf.put_u16_le(self.channels);
        buf.put_u32_le(self.sample_rate);
        buf.put_u32_le(byte_rate);
        buf.put_u16_le(block_align);
        buf.put_u16_le(self.bits_per_sample);

        buf.put_slice(b"data");
        buf.put_u32_le(self.data_len);

        Ok(out)
    }

    fn derived_fields(&self) -> Result<(u16, u32)> {
        match (self.block_align(), self.byte_rate()) {
            (Some(block_align), Some(byte_rate)) => Ok((block_align, byte_rate)),
            _ => Err(Error::invalid_header(format!(
                "{} channels of {} bits at {}Hz overflow the rate fields",
                self.channels, self.bits_per_sample, self.sample_rate
            ))),
        }
    }

    /// Parse a header in the layout [`to_bytes`](Self::to_bytes) writes.
    ///
    /// Checks every fixed field and the derived ones (chunk size, byte
    /// rate, block align), so a placeholder or a header from a different
    /// layout is rejected.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < WAV_HEADER_LEN {
            return Err(Error::invalid_header(format!(
                "need {} bytes, got {}",
                WAV_HEADER_LEN,
                bytes.len()
            )));
        }
        let mut buf = &bytes[..WAV_HEADER_LEN];

        expect_tag(&mut buf, b"RIFF")?;
        let riff_chunk_size = buf.get_u32_le();
        expect_tag(&mut buf, b"WAVE")?;

        expect_tag(&mut buf, b"fmt ")?;
        let fmt_len = buf.get_u32_le();
        if fmt_len != FMT_CHUNK_LEN {
            return Err(Error::invalid_header(format!("fmt chunk size {fmt_len}")));
        }
        let format = buf.get_u16_le();
        if format != PCM_FORMAT_TAG {
            return Err(Error::invalid_header(format!("audio format {format}")));
        }
        let channels = buf.get_u16_le();
        let sample_rate = buf.get_u32_le();
        let byte_rate = buf.get_u32_le();
        let block_align = buf.get_u16_le();
        let bits_per_sample = buf.get_u16_le();

        expect_tag(&mut buf, b"data")?;
        let data_len = buf.get_u32_le();

        let header = Self {
            sample_rate,
            channels,
            bits_per_sample,
            data_len,
        };
        if riff_chunk_size != header.riff_chunk_size() {
            return Err(Error::invalid_header(format!(
                "chunk size {riff_chunk_size} does not match data length {data_len}"
            )));
        }
        let (expected_align, expected_rate) = header.derived_fields()?;
        if byte_rate != expected_rate || block_align != expected_align {
            return Err(Error::invalid_header("byte rate or block align inconsistent"));
        }
        Ok(header)
    }
}

fn expect_tag(buf: &mut &[u8], tag: &[u8; 4]) -> Result<()> {
    let mut found = [0u8; 4];
    buf.copy_to_slice(&mut found);
    if &found != tag {
        return Err(Error::invalid_header(format!(
            "expected {:?}, found {:?}",
            String::from_utf8_lossy(tag),
            String::from_utf8_lossy(&found)
        )));
    }
    Ok(())
}
