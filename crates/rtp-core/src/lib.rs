//! # RTP-Core: packet model and reordering for rtpwav
//!
//! This crate holds the packet-level half of the reconstruction pipeline:
//!
//! - [`MediaPacket`]: one received RTP unit (payload type, sequence number,
//!   timestamp, payload), with an RFC 3550 fixed-header parser.
//! - [`ReorderBuffer`]: a sorted holding area that restores sequence-number
//!   order and suppresses duplicates (first copy wins).
//! - [`io::rtpdump`]: a reader for the rtptools `rtpdump` capture format,
//!   used by the command line tool as its packet source.
//!
//! ```rust
//! use rtp_core::{MediaPacket, ReorderBuffer};
//!
//! let mut buffer = ReorderBuffer::new();
//! buffer.insert(MediaPacket::new(0, 3, 480, vec![3u8; 4]));
//! buffer.insert(MediaPacket::new(0, 1, 160, vec![1u8; 4]));
//!
//! assert_eq!(buffer.pop_min()?.sequence_number(), 1);
//! assert_eq!(buffer.pop_min()?.sequence_number(), 3);
//! assert!(buffer.pop_min().is_err());
//! # Ok::<(), rtp_core::Error>(())
//! ```

pub mod buffer;
pub mod error;
pub mod io;
pub mod packet;

pub use buffer::{InsertOutcome, ReorderBuffer};
pub use error::{Error, Result};
pub use packet::MediaPacket;

/// RTP sequence number type
pub type RtpSequenceNumber = u16;

/// RTP timestamp type
pub type RtpTimestamp = u32;

/// RTP payload type identifier (7 significant bits)
pub type RtpPayloadType = u8;
