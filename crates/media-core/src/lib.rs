//! # Media-Core: audio reconstruction for rtpwav
//!
//! Turns a captured, arrival-ordered RTP packet sequence into a finished
//! WAV file:
//!
//! ```text
//! packet source ─► ReorderBuffer ─► decode (CodecRegistry) ─► WavWriter ─► finalize
//! ```
//!
//! - [`wav`]: streaming WAV writer that reserves the header, appends PCM,
//!   and patches the header in place once the length is known.
//! - [`pipeline`]: the refill/drain state machine tying buffer, registry
//!   and writer together.
//! - [`config`]: pipeline tuning and policies.
//!
//! ```rust
//! use codec_core::CodecRegistry;
//! use media_core::{PipelineConfig, ReconstructionPipeline};
//! use rtp_core::MediaPacket;
//! use std::io::Cursor;
//!
//! let packets = vec![
//!     MediaPacket::new(0, 2, 160, vec![0xFF; 160]),
//!     MediaPacket::new(0, 1, 0, vec![0xFF; 160]),
//! ];
//!
//! let pipeline = ReconstructionPipeline::new(
//!     packets,
//!     CodecRegistry::with_static_payload_types(),
//!     Cursor::new(Vec::new()),
//!     PipelineConfig::default(),
//! )?;
//! let (report, out) = pipeline.run()?;
//!
//! assert_eq!(report.packets_decoded, 2);
//! assert_eq!(out.into_inner().len(), 44 + 640);
//! # Ok::<(), media_core::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod wav;

pub use config::{PipelineConfig, PipelineConfigBuilder, SampleRateMismatchPolicy};
pub use error::{Error, Result};
pub use pipeline::{
    reconstruct_to_file, PipelineState, ReconstructionPipeline, ReconstructionReport,
};
pub use wav::{WavHeader, WavWriter, WAV_HEADER_LEN};
