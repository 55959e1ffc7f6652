//! Reader for the rtptools `rtpdump` binary format
//!
//! Layout (all integers network byte order):
//!
//! ```text
//! "#!rtpplay1.0 <address>/<port>\n"
//! u32 start_sec | u32 start_usec | u32 source | u16 port | u16 padding
//! repeated:
//!   u16 length (record incl. this 8-byte header) | u16 plen | u32 offset_ms
//!   <length - 8 bytes of packet data>
//! ```
//!
//! Records with `plen == 0` carry RTCP or other non-RTP data and are
//! skipped by the iterator.

use bytes::{Buf, Bytes};
use std::io::{BufRead, ErrorKind, Read};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::packet::MediaPacket;

const PREAMBLE: &str = "#!rtpplay1.0 ";
const FILE_HEADER_LEN: usize = 16;
const RECORD_HEADER_LEN: usize = 8;
const MAX_PREAMBLE_LEN: usize = 256;

/// Information from the rtpdump preamble and file header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtpDumpHeader {
    /// `address/port` text from the preamble line
    pub source_text: String,
    /// Capture start, seconds since the epoch
    pub start_sec: u32,
    /// Capture start, microsecond part
    pub start_usec: u32,
    /// Source IPv4 address as a 32-bit value
    pub source: u32,
    /// Source port
    pub port: u16,
}

/// One RTP record of an rtpdump file
#[derive(Debug, Clone)]
pub struct RtpDumpRecord {
    /// Milliseconds since the capture start
    pub offset_ms: u32,
    /// Raw RTP datagram
    pub data: Bytes,
}

impl RtpDumpRecord {
    /// Parse the record's datagram as an RTP packet
    pub fn to_packet(&self) -> Result<MediaPacket> {
        MediaPacket::parse(self.data.clone())
    }
}

/// Streaming rtpdump reader yielding RTP records in file order
pub struct RtpDumpReader<R> {
    inner: R,
    header: RtpDumpHeader,
    records_read: u64,
    records_skipped: u64,
}

impl<R: BufRead> RtpDumpReader<R> {
    /// Read and validate the preamble and file header
    pub fn new(mut inner: R) -> Result<Self> {
        let mut line = Vec::new();
        (&mut inner)
            .take(MAX_PREAMBLE_LEN as u64)
            .read_until(b'\n', &mut line)?;

        if line.last() != Some(&b'\n') {
            return Err(Error::invalid_dump_header("missing preamble line"));
        }
        let line = String::from_utf8_lossy(&line[..line.len() - 1]).into_owned();
        let source_text = line
            .strip_prefix(PREAMBLE)
            .ok_or_else(|| Error::invalid_dump_header(format!("unexpected preamble {line:?}")))?
            .trim()
            .to_string();

        let mut raw = [0u8; FILE_HEADER_LEN];
        inner.read_exact(&mut raw).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => Error::invalid_dump_header("file header truncated"),
            _ => Error::Io(e),
        })?;
        let mut buf = &raw[..];
        let header = RtpDumpHeader {
            source_text,
            start_sec: buf.get_u32(),
            start_usec: buf.get_u32(),
            source: buf.get_u32(),
            port: buf.get_u16(),
        };
        debug!("Opened rtpdump input from {}", header.source_text);

        Ok(Self {
            inner,
            header,
            records_read: 0,
            records_skipped: 0,
        })
    }

    /// File header information
    pub fn header(&self) -> &RtpDumpHeader {
        &self.header
    }

    /// Number of RTP records returned so far
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Number of non-RTP records skipped so far
    pub fn records_skipped(&self) -> u64 {
        self.records_skipped
    }

    /// Read the next raw record, `None` at a clean end of file
    fn read_record(&mut self) -> Result<Option<(u16, u32, Bytes)>> {
        let mut head = [0u8; RECORD_HEADER_LEN];
        let got = read_fully(&mut self.inner, &mut head)?;
        if got == 0 {
            return Ok(None);
        }
        if got < RECORD_HEADER_LEN {
            return Err(Error::TruncatedRecord {
                expected: RECORD_HEADER_LEN,
                actual: got,
            });
        }

        let mut buf = &head[..];
        let length = buf.get_u16() as usize;
        let plen = buf.get_u16();
        let offset_ms = buf.get_u32();
        if length < RECORD_HEADER_LEN {
            return Err(Error::TruncatedRecord {
                expected: RECORD_HEADER_LEN,
                actual: length,
            });
        }

        let mut body = vec![0u8; length - RECORD_HEADER_LEN];
        let got = read_fully(&mut self.inner, &mut body)?;
        if got < body.len() {
            return Err(Error::TruncatedRecord {
                expected: body.len(),
                actual: got,
            });
        }
        Ok(Some((plen, offset_ms, Bytes::from(body))))
    }
}

impl<R: BufRead> Iterator for RtpDumpReader<R> {
    type Item = Result<RtpDumpRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.read_record() {
                Ok(None) => return None,
                Err(e) => return Some(Err(e)),
                Ok(Some((0, offset_ms, _))) => {
                    trace!("Skipping non-RTP record at {}ms", offset_ms);
                    self.records_skipped += 1;
                }
                Ok(Some((plen, offset_ms, mut data))) => {
                    // plen is the original datagram size; the body may hold less
                    data.truncate(plen as usize);
                    self.records_read += 1;
                    return Some(Ok(RtpDumpRecord { offset_ms, data }));
                }
            }
        }
    }
}

/// Read until `buf` is full or EOF, returning the number of bytes read
fn read_fully<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::Io(e)),
        }
    }
    Ok(filled)
}
