//! Pipeline configuration

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default number of packets pulled into an empty reorder buffer per refill
pub const DEFAULT_REORDER_WINDOW: usize = 32;

/// Sample rate stamped into the header when nothing was decoded
pub const DEFAULT_FALLBACK_SAMPLE_RATE: u32 = 8000;

/// Largest accepted reorder window, one full sequence number space
pub const MAX_REORDER_WINDOW: usize = 1 << 16;

/// Largest accepted sample rate; the header's byte rate field holds twice this
pub const MAX_SAMPLE_RATE: u32 = u32::MAX / 2;

/// Fill byte of the reserved header before it is patched
pub const DEFAULT_PLACEHOLDER_BYTE: u8 = 0xFF;

/// What to do when a packet's codec runs at a different rate than the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleRateMismatchPolicy {
    /// Log a warning and write the PCM anyway
    #[default]
    Warn,
    /// Log a warning and skip the packet
    Skip,
    /// Abort the run with [`Error::SampleRateMismatch`]
    Abort,
}

/// Reconstruction pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Maximum packets pulled from the source into an empty buffer per
    /// refill. `1` decodes strictly one packet at a time in arrival order.
    pub reorder_window: usize,

    /// Header sample rate used when no packet decoded successfully
    pub fallback_sample_rate: u32,

    /// Policy for codecs disagreeing with the first decoded sample rate
    pub sample_rate_mismatch: SampleRateMismatchPolicy,

    /// Byte the reserved header is filled with until finalize
    pub placeholder_byte: u8,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            reorder_window: DEFAULT_REORDER_WINDOW,
            fallback_sample_rate: DEFAULT_FALLBACK_SAMPLE_RATE,
            sample_rate_mismatch: SampleRateMismatchPolicy::default(),
            placeholder_byte: DEFAULT_PLACEHOLDER_BYTE,
        }
    }
}

impl PipelineConfig {
    /// Start building a configuration from the defaults
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::new()
    }

    /// Check the configuration for values the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.reorder_window == 0 || self.reorder_window > MAX_REORDER_WINDOW {
            return Err(Error::config(format!(
                "reorder_window must be between 1 and {}, got {}",
                MAX_REORDER_WINDOW, self.reorder_window
            )));
        }
        if self.fallback_sample_rate == 0 || self.fallback_sample_rate > MAX_SAMPLE_RATE {
            return Err(Error::config(format!(
                "fallback_sample_rate must be between 1 and {}, got {}",
                MAX_SAMPLE_RATE, self.fallback_sample_rate
            )));
        }
        Ok(())
    }
}

/// Builder for [`PipelineConfig`]
#[derive(Debug, Clone, Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// Create a builder with default values
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }

    /// Set the reorder window
    pub fn reorder_window(mut self, packets: usize) -> Self {
        self.config.reorder_window = packets;
        self
    }

    /// Set the fallback sample rate
    pub fn fallback_sample_rate(mut self, hz: u32) -> Self {
        self.config.fallback_sample_rate = hz;
        self
    }

    /// Set the sample rate mismatch policy
    pub fn sample_rate_mismatch(mut self, policy: SampleRateMismatchPolicy) -> Self {
        self.config.sample_rate_mismatch = policy;
        self
    }

    /// Set the header placeholder byte
    pub fn placeholder_byte(mut self, byte: u8) -> Self {
        self.config.placeholder_byte = byte;
        self
    }

    /// Validate and return the configuration
    pub fn build(self) -> Result<PipelineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
