//! End-to-end reconstruction tests
//!
//! Run the full pipeline over small packet sequences and check the bytes
//! of the resulting WAV container.

use std::io::{self, Cursor, Seek, SeekFrom, Write};

use bytes::Bytes;
use codec_core::{CodecError, CodecInfo, CodecRegistry, PayloadDecoder};
use media_core::{
    reconstruct_to_file, Error, PipelineConfig, ReconstructionPipeline, ReconstructionReport,
    SampleRateMismatchPolicy, WavHeader, WAV_HEADER_LEN,
};
use rtp_core::MediaPacket;
use temp_dir::TempDir;

const STUB_PT: u8 = 96;

/// Decodes payload bytes 1:1 into PCM
struct StubCodec {
    payload_type: u8,
    sample_rate: u32,
}

impl PayloadDecoder for StubCodec {
    fn info(&self) -> CodecInfo {
        CodecInfo {
            name: "stub",
            sample_rate: self.sample_rate,
            channels: 1,
            payload_type: self.payload_type,
        }
    }

    fn decode(&mut self, payload: &[u8]) -> codec_core::Result<Bytes> {
        if payload.first() == Some(&0xEE) {
            return Err(CodecError::invalid_payload("corrupt marker byte"));
        }
        Ok(Bytes::copy_from_slice(payload))
    }
}

fn stub_registry() -> CodecRegistry {
    let mut registry = CodecRegistry::new();
    registry.register(
        STUB_PT,
        Box::new(StubCodec {
            payload_type: STUB_PT,
            sample_rate: 8000,
        }),
    );
    registry
}

fn stub_packet(seq: u16, payload: [u8; 4]) -> MediaPacket {
    MediaPacket::new(STUB_PT, seq, seq as u32 * 4, payload.to_vec())
}

fn reconstruct(
    packets: Vec<MediaPacket>,
    registry: CodecRegistry,
    config: PipelineConfig,
) -> media_core::Result<(ReconstructionReport, Vec<u8>)> {
    let pipeline =
        ReconstructionPipeline::new(packets, registry, Cursor::new(Vec::new()), config)?;
    let (report, out) = pipeline.run()?;
    Ok((report, out.into_inner()))
}

fn u32_at(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(buf[offset..offset + 4].try_into().unwrap())
}

#[test]
fn test_out_of_order_packets_written_in_sequence_order() {
    let packets = vec![
        stub_packet(3, [3, 3, 3, 3]),
        stub_packet(1, [1, 1, 1, 1]),
        stub_packet(2, [2, 2, 2, 2]),
    ];

    let (report, buf) = reconstruct(packets, stub_registry(), PipelineConfig::default()).unwrap();

    assert_eq!(report.packets_decoded, 3);
    assert_eq!(report.skipped(), 0);
    assert_eq!(u32_at(&buf, 40), 12); // data size
    assert_eq!(u32_at(&buf, 24), 8000); // sample rate
    assert_eq!(u32_at(&buf, 28), 16000); // byte rate
    assert_eq!(
        &buf[WAV_HEADER_LEN..],
        &[1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3]
    );
}

#[test]
fn test_unregistered_payload_type_yields_empty_container() {
    let packets = vec![MediaPacket::new(127, 1, 0, vec![0u8; 4])];

    let (report, buf) = reconstruct(packets, stub_registry(), PipelineConfig::default()).unwrap();

    assert_eq!(report.skipped_unknown_payload, 1);
    assert_eq!(report.skipped(), 1);
    assert_eq!(buf.len(), WAV_HEADER_LEN);
    assert_eq!(u32_at(&buf, 40), 0);
    assert_eq!(u32_at(&buf, 4), (WAV_HEADER_LEN - 8) as u32);
    assert!(WavHeader::parse(&buf).is_ok());
}

#[test]
fn test_duplicate_sequence_keeps_first_payload() {
    let packets = vec![
        stub_packet(5, [0xA1, 0xA2, 0xA3, 0xA4]),
        stub_packet(5, [0xB1, 0xB2, 0xB3, 0xB4]),
    ];

    let (report, buf) = reconstruct(packets, stub_registry(), PipelineConfig::default()).unwrap();

    assert_eq!(report.duplicates, 1);
    assert_eq!(report.packets_decoded, 1);
    assert_eq!(&buf[WAV_HEADER_LEN..], &[0xA1, 0xA2, 0xA3, 0xA4]);
}

#[test]
fn test_header_matches_pcm_length_for_any_packet_count() {
    for count in 0u16..6 {
        let packets = (0..count).map(|seq| stub_packet(seq, [seq as u8; 4])).collect();

        let (report, buf) =
            reconstruct(packets, stub_registry(), PipelineConfig::default()).unwrap();

        let pcm_len = 4 * count as u32;
        let header = WavHeader::parse(&buf).unwrap();
        assert_eq!(header.data_len, pcm_len);
        assert_eq!(header.riff_chunk_size(), WAV_HEADER_LEN as u32 + pcm_len - 8);
        assert_eq!(report.pcm_bytes, pcm_len as u64);
        assert_eq!(buf.len(), WAV_HEADER_LEN + pcm_len as usize);
    }
}

#[test]
fn test_single_packet_window_writes_in_arrival_order() {
    let config = PipelineConfig::builder().reorder_window(1).build().unwrap();
    let packets = vec![
        stub_packet(3, [3; 4]),
        stub_packet(1, [1; 4]),
        stub_packet(2, [2; 4]),
    ];

    let (report, buf) = reconstruct(packets, stub_registry(), config).unwrap();

    assert_eq!(report.packets_received, 3);
    assert_eq!(report.packets_decoded, 3);
    assert_eq!(report.skipped(), 0);
    assert_eq!(u32_at(&buf, 40), 12);
    assert_eq!(&buf[WAV_HEADER_LEN..], &[3, 3, 3, 3, 1, 1, 1, 1, 2, 2, 2, 2]);
}

#[test]
fn test_pcmu_packets_behind_output_reach_container() {
    let config = PipelineConfig::builder().reorder_window(1).build().unwrap();
    let packets = vec![
        MediaPacket::new(0, 3, 320, vec![0xFF; 4]),
        MediaPacket::new(0, 1, 0, vec![0xFF; 4]),
        MediaPacket::new(0, 2, 160, vec![0xFF; 4]),
    ];

    let (report, buf) =
        reconstruct(packets, CodecRegistry::with_static_payload_types(), config).unwrap();

    assert_eq!(report.packets_decoded, 3);
    assert_eq!(report.pcm_bytes, 24);
    assert_eq!(buf.len(), WAV_HEADER_LEN + 24);
}

#[test]
fn test_decode_failure_does_not_abort() {
    let packets = vec![
        stub_packet(1, [1; 4]),
        stub_packet(2, [0xEE; 4]),
        stub_packet(3, [3; 4]),
    ];

    let (report, buf) = reconstruct(packets, stub_registry(), PipelineConfig::default()).unwrap();

    assert_eq!(report.skipped_decode_error, 1);
    assert_eq!(&buf[WAV_HEADER_LEN..], &[1, 1, 1, 1, 3, 3, 3, 3]);
}

fn mixed_rate_stream() -> (Vec<MediaPacket>, CodecRegistry) {
    let mut registry = stub_registry();
    registry.register(
        97,
        Box::new(StubCodec {
            payload_type: 97,
            sample_rate: 16000,
        }),
    );
    let packets = vec![
        stub_packet(1, [1; 4]),
        MediaPacket::new(97, 2, 8, vec![2u8; 4]),
        stub_packet(3, [3; 4]),
    ];
    (packets, registry)
}

#[test]
fn test_sample_rate_mismatch_warn_writes_packet() {
    let (packets, registry) = mixed_rate_stream();

    let (report, buf) = reconstruct(packets, registry, PipelineConfig::default()).unwrap();

    assert_eq!(report.packets_decoded, 3);
    assert_eq!(report.sample_rate, 8000);
    assert_eq!(u32_at(&buf, 24), 8000);
}

#[test]
fn test_sample_rate_mismatch_skip_drops_packet() {
    let (packets, registry) = mixed_rate_stream();
    let config = PipelineConfig::builder()
        .sample_rate_mismatch(SampleRateMismatchPolicy::Skip)
        .build()
        .unwrap();

    let (report, buf) = reconstruct(packets, registry, config).unwrap();

    assert_eq!(report.skipped_rate_mismatch, 1);
    assert_eq!(&buf[WAV_HEADER_LEN..], &[1, 1, 1, 1, 3, 3, 3, 3]);
}

#[test]
fn test_sample_rate_mismatch_abort_fails_run() {
    let (packets, registry) = mixed_rate_stream();
    let config = PipelineConfig::builder()
        .sample_rate_mismatch(SampleRateMismatchPolicy::Abort)
        .build()
        .unwrap();

    let err = reconstruct(packets, registry, config).unwrap_err();
    assert!(matches!(
        err,
        Error::SampleRateMismatch {
            expected: 8000,
            actual: 16000,
            sequence: 2
        }
    ));
}

#[test]
fn test_fallback_rate_when_nothing_decodes() {
    let config = PipelineConfig::builder()
        .fallback_sample_rate(16000)
        .build()
        .unwrap();

    let (report, buf) = reconstruct(Vec::new(), stub_registry(), config).unwrap();

    assert_eq!(report.sample_rate, 16000);
    assert_eq!(u32_at(&buf, 24), 16000);
    assert_eq!(u32_at(&buf, 28), 32000);
}

#[test]
fn test_static_pcmu_stream() {
    // 0xFF is mu-law silence
    let packets = vec![
        MediaPacket::new(0, 11, 160, vec![0xFF; 160]),
        MediaPacket::new(0, 10, 0, vec![0xFF; 160]),
    ];

    let (report, buf) = reconstruct(
        packets,
        CodecRegistry::with_static_payload_types(),
        PipelineConfig::default(),
    )
    .unwrap();

    assert_eq!(report.packets_decoded, 2);
    assert_eq!(report.pcm_bytes, 640);
    assert!(buf[WAV_HEADER_LEN..].iter().all(|&b| b == 0));
}

#[test]
fn test_file_output_readable_by_hound() {
    let dir = TempDir::new().unwrap();
    let path = dir.child("out.wav");
    let packets = vec![
        stub_packet(2, [0x00, 0x10, 0x00, 0x20]),
        stub_packet(1, [0x34, 0x12, 0xCC, 0xFF]),
    ];

    let report =
        reconstruct_to_file(packets, &path, stub_registry(), PipelineConfig::default()).unwrap();
    assert_eq!(report.packets_decoded, 2);

    let mut reader = hound::WavReader::open(&path).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 8000);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_format, hound::SampleFormat::Int);

    let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(samples, vec![0x1234, -52, 0x1000, 0x2000]);
}

#[test]
fn test_file_output_overwrites_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.child("out.wav");
    std::fs::write(&path, vec![0x55; 4096]).unwrap();

    reconstruct_to_file(Vec::new(), &path, stub_registry(), PipelineConfig::default()).unwrap();

    assert_eq!(std::fs::metadata(&path).unwrap().len(), WAV_HEADER_LEN as u64);
}

#[test]
fn test_unwritable_destination_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = dir.child("missing").join("out.wav");

    let err = reconstruct_to_file(Vec::new(), &path, stub_registry(), PipelineConfig::default())
        .unwrap_err();
    assert!(matches!(err, Error::Create { .. }));
}

#[test]
fn test_pipeline_config_from_toml() {
    let config: PipelineConfig = toml::from_str(
        r#"
        reorder_window = 4
        sample_rate_mismatch = "abort"
        "#,
    )
    .unwrap();

    assert_eq!(config.reorder_window, 4);
    assert_eq!(config.sample_rate_mismatch, SampleRateMismatchPolicy::Abort);
    assert_eq!(config.fallback_sample_rate, 8000);
    assert!(toml::from_str::<PipelineConfig>("window = 4").is_err());
}

/// Destination that stops accepting writes after a byte budget
struct ShortDisk {
    inner: Cursor<Vec<u8>>,
    capacity: u64,
}

impl Write for ShortDisk {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.inner.position() + buf.len() as u64 > self.capacity {
            return Err(io::Error::new(io::ErrorKind::StorageFull, "no space left"));
        }
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for ShortDisk {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

/// Destination that can be written but not rewound
struct Pipe {
    written: Vec<u8>,
}

impl Write for Pipe {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for Pipe {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        if pos == SeekFrom::Start(0) && self.written.is_empty() {
            return Ok(0);
        }
        Err(io::Error::new(io::ErrorKind::Unsupported, "pipe is not seekable"))
    }
}

#[test]
fn test_write_failure_aborts_run() {
    let destination = ShortDisk {
        inner: Cursor::new(Vec::new()),
        capacity: (WAV_HEADER_LEN + 4) as u64,
    };
    let packets = vec![stub_packet(1, [1; 4]), stub_packet(2, [2; 4])];

    let pipeline = ReconstructionPipeline::new(
        packets,
        stub_registry(),
        destination,
        PipelineConfig::default(),
    )
    .unwrap();

    assert!(matches!(pipeline.run(), Err(Error::Io(_))));
}

#[test]
fn test_unseekable_destination_fails_finalize() {
    let pipeline = ReconstructionPipeline::new(
        vec![stub_packet(1, [1; 4])],
        stub_registry(),
        Pipe { written: Vec::new() },
        PipelineConfig::default(),
    )
    .unwrap();

    assert!(matches!(pipeline.run(), Err(Error::Io(_))));
}
