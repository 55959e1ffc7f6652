//! Capture file input

pub mod rtpdump;

pub use rtpdump::{RtpDumpHeader, RtpDumpReader, RtpDumpRecord};
