//! rtpwav: reconstruct WAV audio from an rtpdump capture

mod capture;
mod config;
mod logging;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use codec_core::CodecRegistry;
use media_core::reconstruct_to_file;
use rtp_core::io::RtpDumpReader;
use tracing::{debug, info, warn};

use crate::capture::CapturePackets;
use crate::config::{parse_binding, AppConfig};
use crate::logging::setup_logging;

#[derive(Parser, Debug)]
#[command(name = "rtpwav")]
#[command(about = "Reconstruct a WAV file from an RTP capture", long_about = None)]
#[command(version)]
struct Cli {
    /// rtpdump capture holding a single RTP stream
    #[arg(short, long)]
    input: PathBuf,

    /// WAV file to write (created or truncated)
    #[arg(short, long)]
    output: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Packets pulled into the reorder buffer per refill
    #[arg(long, value_name = "N")]
    reorder_window: Option<usize>,

    /// Header sample rate when no packet decodes
    #[arg(long, value_name = "HZ")]
    fallback_sample_rate: Option<u32>,

    /// Bind a dynamic payload type to a codec, e.g. 96=L16
    #[arg(long = "payload-type", value_name = "PT=NAME")]
    payload_types: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut app_config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    let logging = app_config
        .logging
        .resolve(cli.log_level.as_deref(), cli.json_logs)?;
    setup_logging(&logging)?;
    info!("Starting rtpwav v{}", env!("CARGO_PKG_VERSION"));

    if let Some(window) = cli.reorder_window {
        app_config.pipeline.reorder_window = window;
    }
    if let Some(rate) = cli.fallback_sample_rate {
        app_config.pipeline.fallback_sample_rate = rate;
    }
    app_config.pipeline.validate()?;

    let mut registry = CodecRegistry::with_static_payload_types();
    let mut bindings = app_config.payload_type_bindings()?;
    for binding in &cli.payload_types {
        bindings.push(parse_binding(binding)?);
    }
    for (payload_type, name) in bindings {
        registry
            .register_by_name(payload_type, &name)
            .with_context(|| format!("Cannot bind payload type {} to '{}'", payload_type, name))?;
    }
    debug!("Decoders: {:?}", registry);

    let input = File::open(&cli.input)
        .with_context(|| format!("Failed to open {}", cli.input.display()))?;
    let reader = RtpDumpReader::new(BufReader::new(input))
        .with_context(|| format!("{} is not an rtpdump capture", cli.input.display()))?;
    info!(
        "Reading capture of {} from {}",
        reader.header().source_text,
        cli.input.display()
    );

    let mut packets = CapturePackets::new(reader);
    let report = reconstruct_to_file(&mut packets, &cli.output, registry, app_config.pipeline)
        .with_context(|| format!("Failed to reconstruct {}", cli.output.display()))?;

    if packets.unparseable() > 0 {
        warn!("{} capture records were not valid RTP", packets.unparseable());
    }
    debug!("{} non-RTP records skipped", packets.non_rtp());
    if let Some(e) = packets.take_error() {
        return Err(e).context("Capture could not be read to the end");
    }

    println!("{}: {}", cli.output.display(), report);
    Ok(())
}
