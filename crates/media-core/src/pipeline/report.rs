//! Run summary

use std::fmt;

/// Counters collected over one reconstruction run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconstructionReport {
    /// Packets pulled from the source
    pub packets_received: u64,
    /// Packets whose PCM made it into the container
    pub packets_decoded: u64,
    /// Packets whose payload type had no registered decoder
    pub skipped_unknown_payload: u64,
    /// Packets the decoder rejected
    pub skipped_decode_error: u64,
    /// Packets dropped by the `skip` sample rate mismatch policy
    pub skipped_rate_mismatch: u64,
    /// Packets dropped for repeating a sequence number
    pub duplicates: u64,
    /// Breaks in the written sequence where decoders were reset
    pub discontinuities: u64,
    /// PCM bytes written after the header
    pub pcm_bytes: u64,
    /// Sample rate stamped into the header
    pub sample_rate: u32,
}

impl ReconstructionReport {
    /// Packets received but not written, for whatever reason
    pub fn skipped(&self) -> u64 {
        self.skipped_unknown_payload
            + self.skipped_decode_error
            + self.skipped_rate_mismatch
            + self.duplicates
    }
}

impl fmt::Display for ReconstructionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} packets received, {} decoded, {} skipped \
             (unknown payload: {}, decode error: {}, rate mismatch: {}, duplicate: {}); \
             {} discontinuities, {} PCM bytes at {} Hz",
            self.packets_received,
            self.packets_decoded,
            self.skipped(),
            self.skipped_unknown_payload,
            self.skipped_decode_error,
            self.skipped_rate_mismatch,
            self.duplicates,
            self.discontinuities,
            self.pcm_bytes,
            self.sample_rate,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skipped_sums_every_drop() {
        let report = ReconstructionReport {
            packets_received: 9,
            packets_decoded: 5,
            skipped_unknown_payload: 1,
            skipped_decode_error: 1,
            skipped_rate_mismatch: 1,
            duplicates: 1,
            discontinuities: 3,
            pcm_bytes: 1600,
            sample_rate: 8000,
        };
        assert_eq!(report.skipped(), 4);
        assert_eq!(report.packets_decoded + report.skipped(), report.packets_received);

        let display = report.to_string();
        assert!(display.contains("9 packets received"));
        assert!(display.contains("4 skipped"));
        assert!(display.contains("3 discontinuities"));
        assert!(display.contains("8000 Hz"));
    }
}
