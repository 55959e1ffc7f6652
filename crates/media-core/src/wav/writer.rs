//! Streaming WAV writer with deferred header

use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::{debug, trace};

use super::header::{WavHeader, WAV_HEADER_LEN};
use crate::config::DEFAULT_PLACEHOLDER_BYTE;
use crate::error::{Error, Result};

/// Largest PCM length whose RIFF chunk size still fits in 32 bits
pub const MAX_PCM_LEN: u64 = u32::MAX as u64 - (WAV_HEADER_LEN as u64 - 8);

/// Writes mono 16-bit PCM into a WAV container.
///
/// Construction reserves [`WAV_HEADER_LEN`] placeholder bytes at offset 0.
/// [`append`](Self::append) streams PCM after them, and
/// [`finalize`](Self::finalize) overwrites the placeholder with the real
/// header once the data length and sample rate are known. Consuming `self`
/// in `finalize` makes appending after it impossible.
#[derive(Debug)]
pub struct WavWriter<W: Write + Seek> {
    inner: W,
    pcm_len: u64,
}

impl WavWriter<BufWriter<File>> {
    /// Create (or truncate) `path` and reserve a header filled with `placeholder`
    pub fn create(path: impl AsRef<Path>, placeholder: u8) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Create {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Created WAV output {}", path.display());
        Self::with_placeholder(BufWriter::new(file), placeholder)
    }
}

impl<W: Write + Seek> WavWriter<W> {
    /// Reserve the header using the default placeholder byte
    pub fn new(inner: W) -> Result<Self> {
        Self::with_placeholder(inner, DEFAULT_PLACEHOLDER_BYTE)
    }

    /// Reserve the header filled with `placeholder`
    pub fn with_placeholder(mut inner: W, placeholder: u8) -> Result<Self> {
        inner.seek(SeekFrom::Start(0))?;
        inner.write_all(&[placeholder; WAV_HEADER_LEN])?;
        Ok(Self { inner, pcm_len: 0 })
    }

    /// Append PCM bytes after everything written so far
    pub fn append(&mut self, pcm: &[u8]) -> Result<()> {
        let pcm_len = self.pcm_len + pcm.len() as u64;
        if pcm_len > MAX_PCM_LEN {
            return Err(Error::ContainerOverflow { pcm_len });
        }
        self.inner.write_all(pcm)?;
        self.pcm_len = pcm_len;
        trace!("Appended {} PCM bytes, total {}", pcm.len(), self.pcm_len);
        Ok(())
    }

    /// PCM bytes appended so far
    pub fn pcm_len(&self) -> u64 {
        self.pcm_len
    }

    /// Write the real header over the placeholder and hand back the
    /// destination, positioned at its end and flushed.
    pub fn finalize(mut self, sample_rate: u32) -> Result<W> {
        // append() keeps pcm_len within MAX_PCM_LEN
        let data_len = u32::try_from(self.pcm_len)
            .map_err(|_| Error::ContainerOverflow { pcm_len: self.pcm_len })?;
        let header = WavHeader::mono_pcm16(sample_rate, data_len).to_bytes()?;

        self.inner.seek(SeekFrom::Start(0))?;
        self.inner.write_all(&header)?;
        self.inner.seek(SeekFrom::End(0))?;
        self.inner.flush()?;

        debug!("Finalized WAV: {} Hz, {} bytes of PCM", sample_rate, data_len);
        Ok(self.inner)
    }
}
