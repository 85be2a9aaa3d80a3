//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_codec;
mod retention;
mod synthesizer;

pub use audio_codec::{AudioCodecPort, CodecError};
pub use retention::{RetentionPort, SweepReport};
pub use synthesizer::{SynthesisError, SynthesisRequest, SynthesizerPort};
