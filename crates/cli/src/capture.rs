//! rtpdump capture as a packet source

use std::io::BufRead;

use rtp_core::io::RtpDumpReader;
use rtp_core::{Error as RtpError, MediaPacket};
use tracing::{error, warn};

/// Yields the parseable RTP packets of an rtpdump capture.
///
/// Records that do not hold a valid RTP packet are logged and skipped. A
/// truncated trailing record ends the capture with a warning. An I/O error
/// ends it too and is kept for [`take_error`](Self::take_error).
pub struct CapturePackets<R> {
    reader: RtpDumpReader<R>,
    unparseable: u64,
    error: Option<RtpError>,
    finished: bool,
}

impl<R: BufRead> CapturePackets<R> {
    pub fn new(reader: RtpDumpReader<R>) -> Self {
        Self {
            reader,
            unparseable: 0,
            error: None,
            finished: false,
        }
    }

    /// Records that were skipped because they did not parse as RTP
    pub fn unparseable(&self) -> u64 {
        self.unparseable
    }

    /// Non-RTP records skipped by the reader
    pub fn non_rtp(&self) -> u64 {
        self.reader.records_skipped()
    }

    /// The error that ended the capture early, if any
    pub fn take_error(&mut self) -> Option<RtpError> {
        self.error.take()
    }
}

impl<R: BufRead> Iterator for CapturePackets<R> {
    type Item = MediaPacket;

    fn next(&mut self) -> Option<MediaPacket> {
        while !self.finished {
            let record = match self.reader.next()? {
                Ok(record) => record,
                Err(e @ RtpError::TruncatedRecord { .. }) => {
                    warn!("Capture ends with a truncated record: {}", e);
                    self.finished = true;
                    return None;
                }
                Err(e) => {
                    error!("Failed to read capture: {}", e);
                    self.error = Some(e);
                    self.finished = true;
                    return None;
                }
            };

            match record.to_packet() {
                Ok(packet) => return Some(packet),
                Err(e) if e.is_per_packet() => {
                    warn!("Skipping record at {}ms: {}", record.offset_ms, e);
                    self.unparseable += 1;
                }
                Err(e) => {
                    error!("Failed to parse record at {}ms: {}", record.offset_ms, e);
                    self.error = Some(e);
                    self.finished = true;
                }
            }
        }
        None
    }
}
