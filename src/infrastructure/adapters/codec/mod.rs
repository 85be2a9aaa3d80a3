//! Codec Adapter - 参考音频读写

mod wav_codec;

pub use wav_codec::WavCodec;
