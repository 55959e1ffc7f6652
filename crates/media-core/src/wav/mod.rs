//! WAV (RIFF/WAVE) container output
//!
//! The container is written in two passes: a placeholder header is
//! reserved up front, PCM is streamed in after it, and the real header is
//! written over the placeholder once the total length is known. Decoded
//! audio never has to be held in memory as a whole.

mod header;
mod writer;

pub use header::{WavHeader, WAV_HEADER_LEN};
pub use writer::{WavWriter, MAX_PCM_LEN};
