//! RFC 3550 fixed header parsing
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |V=2|P|X|  CC   |M|     PT      |       sequence number         |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                           timestamp                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |           synchronization source (SSRC) identifier            |
//! +=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+
//! |            contributing source (CSRC) identifiers             |
//! |                             ....                              |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```

use bytes::{Buf, Bytes};

use super::MediaPacket;
use crate::error::{Error, Result};

/// RTP protocol version carried in the top two bits
pub const RTP_VERSION: u8 = 2;

/// Size of the fixed header without CSRCs or extension
pub const RTP_FIXED_HEADER_LEN: usize = 12;

const CSRC_LEN: usize = 4;
const EXTENSION_HEADER_LEN: usize = 4;

impl MediaPacket {
    /// Parse an RTP datagram (UDP payload) into a media packet.
    ///
    /// CSRC identifiers and the header extension are skipped, trailing
    /// padding is stripped. The payload shares the input buffer.
    pub fn parse(datagram: impl Into<Bytes>) -> Result<Self> {
        let mut buf: Bytes = datagram.into();
        let total = buf.len();

        if total < RTP_FIXED_HEADER_LEN {
            return Err(Error::PacketTooShort {
                needed: RTP_FIXED_HEADER_LEN,
                actual: total,
            });
        }

        let b0 = buf.get_u8();
        let version = b0 >> 6;
        if version != RTP_VERSION {
            return Err(Error::UnsupportedVersion { version });
        }
        let has_padding = (b0 & 0x20) != 0;
        let has_extension = (b0 & 0x10) != 0;
        let csrc_count = (b0 & 0x0F) as usize;

        let b1 = buf.get_u8();
        let marker = (b1 & 0x80) != 0;
        let payload_type = b1 & 0x7F;
        let sequence_number = buf.get_u16();
        let timestamp = buf.get_u32();
        let ssrc = buf.get_u32();

        let mut header_len = RTP_FIXED_HEADER_LEN + csrc_count * CSRC_LEN;
        if total < header_len {
            return Err(Error::PacketTooShort {
                needed: header_len,
                actual: total,
            });
        }
        buf.advance(csrc_count * CSRC_LEN);

        if has_extension {
            if total < header_len + EXTENSION_HEADER_LEN {
                return Err(Error::PacketTooShort {
                    needed: header_len + EXTENSION_HEADER_LEN,
                    actual: total,
                });
            }
            let _profile = buf.get_u16();
            let words = buf.get_u16() as usize;
            header_len += EXTENSION_HEADER_LEN + words * 4;
            if total < header_len {
                return Err(Error::PacketTooShort {
                    needed: header_len,
                    actual: total,
                });
            }
            buf.advance(words * 4);
        }

        if has_padding {
            let available = buf.len();
            let padding = buf.last().copied().unwrap_or(0) as usize;
            if padding == 0 || padding > available {
                return Err(Error::InvalidPadding { padding, available });
            }
            buf.truncate(available - padding);
        }

        Ok(MediaPacket {
            payload_type,
            sequence_number,
            timestamp,
            ssrc,
            marker,
            payload: buf,
        })
    }
}
