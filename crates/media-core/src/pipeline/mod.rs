//! Reconstruction pipeline
//!
//! Drives packets from an arrival-ordered source through a
//! [`ReorderBuffer`], decodes them with the [`CodecRegistry`] and streams
//! the PCM into a [`WavWriter`]:
//!
//! ```text
//!            buffer non-empty
//! Refilling ────────────────► Draining
//!     ▲                          │
//!     └──────── one packet ──────┘
//!     │
//!     └─ buffer empty and source exhausted ─► Done ─► finalize
//! ```
//!
//! The buffer is topped up only when it is empty, with at most
//! `reorder_window` packets, and is then drained completely before the
//! source is touched again. Everything inside one window is written in
//! sequence order. A packet that shows up after a later sequence number
//! was already written is still written, in the position it is popped.
//! Only a repeat of the sequence number written last is dropped.
//!
//! Whenever the written sequence is not contiguous (a gap, a step back,
//! or a packet with the marker bit set) every decoder is reset, so codec
//! state never carries across the break.

mod report;

pub use report::ReconstructionReport;

use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use codec_core::CodecRegistry;
use rtp_core::{InsertOutcome, MediaPacket, ReorderBuffer, RtpSequenceNumber};
use tracing::{debug, info, trace, warn};

use crate::config::{PipelineConfig, SampleRateMismatchPolicy};
use crate::error::{Error, Result};
use crate::wav::WavWriter;

/// Pipeline state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Pulling packets from the source into the reorder buffer
    Refilling,
    /// Writing out the lowest buffered packet
    Draining,
    /// Source exhausted and buffer empty
    Done,
}

/// RTP-to-WAV reconstruction state machine
///
/// Owns the packet source, the decoders and the destination for the whole
/// run. Drive it with [`step`](Self::step) or run it to completion with
/// [`run`](Self::run).
pub struct ReconstructionPipeline<I, W>
where
    I: Iterator<Item = MediaPacket>,
    W: Write + Seek,
{
    config: PipelineConfig,
    source: I,
    source_exhausted: bool,
    buffer: ReorderBuffer,
    registry: CodecRegistry,
    writer: WavWriter<W>,
    state: PipelineState,
    last_emitted: Option<RtpSequenceNumber>,
    sample_rate: Option<u32>,
    report: ReconstructionReport,
}

impl<I, W> ReconstructionPipeline<I, W>
where
    I: Iterator<Item = MediaPacket>,
    W: Write + Seek,
{
    /// Create a pipeline writing to `destination`.
    ///
    /// Validates `config` and reserves the WAV header on the destination
    /// before any packet is read.
    pub fn new<S>(
        source: S,
        registry: CodecRegistry,
        destination: W,
        config: PipelineConfig,
    ) -> Result<Self>
    where
        S: IntoIterator<Item = MediaPacket, IntoIter = I>,
    {
        config.validate()?;
        let writer = WavWriter::with_placeholder(destination, config.placeholder_byte)?;
        Self::with_writer(source, registry, writer, config)
    }

    /// Create a pipeline around an already opened writer
    pub fn with_writer<S>(
        source: S,
        registry: CodecRegistry,
        writer: WavWriter<W>,
        config: PipelineConfig,
    ) -> Result<Self>
    where
        S: IntoIterator<Item = MediaPacket, IntoIter = I>,
    {
        config.validate()?;
        debug!(
            "Reconstruction pipeline created: window={}, payload types={:?}",
            config.reorder_window,
            registry.payload_types()
        );
        Ok(Self {
            buffer: ReorderBuffer::new(),
            config,
            source: source.into_iter(),
            source_exhausted: false,
            registry,
            writer,
            state: PipelineState::Refilling,
            last_emitted: None,
            sample_rate: None,
            report: ReconstructionReport::default(),
        })
    }

    /// Current state
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Counters so far
    pub fn report(&self) -> &ReconstructionReport {
        &self.report
    }

    /// Sample rate captured from the first decoded packet, if any
    pub fn sample_rate(&self) -> Option<u32> {
        self.sample_rate
    }

    /// Perform one state transition and return the new state.
    ///
    /// Only destination I/O failures, a violated buffer invariant and the
    /// `abort` mismatch policy produce an error. Once `Done` is reached
    /// further calls are no-ops.
    pub fn step(&mut self) -> Result<PipelineState> {
        self.state = match self.state {
            PipelineState::Refilling => {
                self.refill();
                if self.buffer.is_empty() {
                    PipelineState::Done
                } else {
                    PipelineState::Draining
                }
            }
            PipelineState::Draining => {
                self.drain_one()?;
                PipelineState::Refilling
            }
            PipelineState::Done => PipelineState::Done,
        };
        trace!("Pipeline state: {:?}", self.state);
        Ok(self.state)
    }

    /// Run to completion, finalize the container and return the report
    /// together with the destination.
    pub fn run(mut self) -> Result<(ReconstructionReport, W)> {
        while self.step()? != PipelineState::Done {}

        let sample_rate = match self.sample_rate {
            Some(rate) => rate,
            None => {
                debug!(
                    "No packet decoded, using fallback sample rate {}",
                    self.config.fallback_sample_rate
                );
                self.config.fallback_sample_rate
            }
        };

        let mut report = self.report;
        report.sample_rate = sample_rate;
        report.pcm_bytes = self.writer.pcm_len();
        let destination = self.writer.finalize(sample_rate)?;

        info!("Reconstruction complete: {}", report);
        if report.skipped() > 0 {
            warn!("{} packets were not written to the output", report.skipped());
        }
        Ok((report, destination))
    }

    /// Top up an empty buffer with up to `reorder_window` packets
    fn refill(&mut self) {
        if !self.buffer.is_empty() {
            return;
        }
        while !self.source_exhausted && self.buffer.len() < self.config.reorder_window {
            match self.source.next() {
                Some(packet) => self.admit(packet),
                None => {
                    debug!(
                        "Packet source exhausted after {} packets",
                        self.report.packets_received
                    );
                    self.source_exhausted = true;
                }
            }
        }
    }

    fn admit(&mut self, packet: MediaPacket) {
        self.report.packets_received += 1;
        let seq = packet.sequence_number();

        // first copy wins, even when it was written in an earlier window
        if self.last_emitted == Some(seq) {
            warn!("Dropping duplicate of already written packet seq={}", seq);
            self.report.duplicates += 1;
            return;
        }

        if self.buffer.insert(packet) == InsertOutcome::Duplicate {
            warn!("Dropping duplicate packet seq={}", seq);
            self.report.duplicates += 1;
        }
    }

    fn drain_one(&mut self) -> Result<()> {
        let packet = self.buffer.pop_min()?;
        let seq = packet.sequence_number();
        let payload_type = packet.payload_type();
        debug!(
            "Decoding packet seq={} pt={} ts={} len={}",
            seq,
            payload_type,
            packet.timestamp(),
            packet.payload().len()
        );

        if let Some(last) = self.last_emitted {
            if seq != last.wrapping_add(1) || packet.marker() {
                debug!(
                    "Discontinuity at seq={} (previous seq={}), resetting decoders",
                    seq, last
                );
                self.registry.reset_all();
                self.report.discontinuities += 1;
            }
        }
        self.last_emitted = Some(seq);

        let Some(decoder) = self.registry.resolve(payload_type) else {
            warn!(
                "No decoder for payload type {}, skipping packet seq={}",
                payload_type, seq
            );
            self.report.skipped_unknown_payload += 1;
            return Ok(());
        };

        let rate = decoder.info().sample_rate;
        if let Some(expected) = self.sample_rate {
            if rate != expected {
                match self.config.sample_rate_mismatch {
                    SampleRateMismatchPolicy::Warn => {
                        warn!(
                            "Packet seq={} decodes at {}Hz, stream is {}Hz; writing anyway",
                            seq, rate, expected
                        );
                    }
                    SampleRateMismatchPolicy::Skip => {
                        warn!(
                            "Packet seq={} decodes at {}Hz, stream is {}Hz; skipping",
                            seq, rate, expected
                        );
                        self.report.skipped_rate_mismatch += 1;
                        return Ok(());
                    }
                    SampleRateMismatchPolicy::Abort => {
                        return Err(Error::SampleRateMismatch {
                            expected,
                            actual: rate,
                            sequence: seq,
                        });
                    }
                }
            }
        }

        let pcm = match decoder.decode(packet.payload()) {
            Ok(pcm) => pcm,
            Err(e) => {
                warn!(
                    "Failed to decode packet seq={} (payload type {}): {}",
                    seq, payload_type, e
                );
                self.report.skipped_decode_error += 1;
                return Ok(());
            }
        };

        self.writer.append(&pcm)?;
        self.report.packets_decoded += 1;

        if self.sample_rate.is_none() {
            debug!("Stream sample rate {}Hz from payload type {}", rate, payload_type);
            self.sample_rate = Some(rate);
        }
        Ok(())
    }
}

/// Reconstruct `packets` into a WAV file at `path`.
///
/// The file is created (or truncated) up front and synced to disk after
/// the header is written.
pub fn reconstruct_to_file<P>(
    packets: P,
    path: impl AsRef<Path>,
    registry: CodecRegistry,
    config: PipelineConfig,
) -> Result<ReconstructionReport>
where
    P: IntoIterator<Item = MediaPacket>,
{
    config.validate()?;
    let writer = WavWriter::create(path.as_ref(), config.placeholder_byte)?;
    let pipeline = ReconstructionPipeline::with_writer(packets, registry, writer, config)?;
    let (report, destination): (_, BufWriter<File>) = pipeline.run()?;

    let file = destination.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    Ok(report)
}
