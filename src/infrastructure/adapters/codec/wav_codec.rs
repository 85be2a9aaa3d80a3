//! WAV Codec - 基于 symphonia 解码、hound 编码
//!
//! 解码支持 symphonia 启用的格式，多声道混为单声道；
//! 编码输出 16 位 PCM 单声道 WAV

use async_trait::async_trait;
use std::fs::File;
use std::path::{Path, PathBuf};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::{AudioCodecPort, CodecError};
use crate::domain::audio::AudioBuffer;

/// WAV 编解码器
///
/// 解码和编码都是阻塞 IO，放在 blocking 线程池执行
#[derive(Debug, Clone, Copy, Default)]
pub struct WavCodec;

impl WavCodec {
    pub fn new() -> Self {
        Self
    }

    fn decode_file(path: &Path) -> Result<AudioBuffer, CodecError> {
        let file = File::open(path).map_err(|e| CodecError::decode(path, e))?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| CodecError::decode(path, format!("probe failed: {}", e)))?;

        let mut format = probed.format;

        let track = format
            .default_track()
            .ok_or_else(|| CodecError::decode(path, "no audio track found"))?;

        let sample_rate = track
            .codec_params
            .sample_rate
            .ok_or_else(|| CodecError::decode(path, "unknown sample rate"))?;

        let mut channels = track
            .codec_params
            .channels
            .map(|c| c.count())
            .unwrap_or(1);

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| CodecError::decode(path, format!("decoder creation failed: {}", e)))?;

        let track_id = track.id;
        let mut interleaved: Vec<f32> = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(p) => p,
                Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    break;
                }
                Err(e) => {
                    return Err(CodecError::decode(path, format!("packet read error: {}", e)));
                }
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(d) => d,
                Err(SymphoniaError::DecodeError(e)) => {
                    tracing::warn!(path = %path.display(), "Decode error (skipping packet): {}", e);
                    continue;
                }
                Err(e) => return Err(CodecError::decode(path, e)),
            };

            let spec = *decoded.spec();
            let frames = decoded.frames();
            channels = spec.channels.count();

            let mut sample_buf = SampleBuffer::<f32>::new(frames as u64, spec);
            sample_buf.copy_interleaved_ref(decoded);
            interleaved.extend(&sample_buf.samples()[..frames * channels]);
        }

        let buffer = AudioBuffer::from_interleaved(&interleaved, channels, sample_rate);

        tracing::debug!(
            path = %path.display(),
            sample_rate = sample_rate,
            channels = channels,
            duration_secs = buffer.duration_secs(),
            "Decoded audio"
        );

        Ok(buffer)
    }

    fn encode_file(buffer: &AudioBuffer, path: &Path) -> Result<(), CodecError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| CodecError::encode(path, e))?;
        }

        let spec = hound::WavSpec {
            channels: buffer.channels(),
            sample_rate: buffer.sample_rate(),
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut writer = hound::WavWriter::create(path, spec).map_err(|e| CodecError::encode(path, e))?;
        for &sample in buffer.samples() {
            let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer
                .write_sample(value)
                .map_err(|e| CodecError::encode(path, e))?;
        }
        writer.finalize().map_err(|e| CodecError::encode(path, e))?;

        Ok(())
    }
}

#[async_trait]
impl AudioCodecPort for WavCodec {
    async fn decode(&self, path: &Path) -> Result<AudioBuffer, CodecError> {
        let owned: PathBuf = path.to_path_buf();
        tokio::task::spawn_blocking(move || Self::decode_file(&owned))
            .await
            .map_err(|e| CodecError::decode(path, format!("decode task failed: {}", e)))?
    }

    async fn encode(&self, buffer: &AudioBuffer, path: &Path) -> Result<(), CodecError> {
        let owned: PathBuf = path.to_path_buf();
        let buffer = buffer.clone();
        tokio::task::spawn_blocking(move || Self::encode_file(&buffer, &owned))
            .await
            .map_err(|e| CodecError::encode(path, format!("encode task failed: {}", e)))?
    }
}
