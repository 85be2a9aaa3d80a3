//! Audio - 参考音频的样本表示与 DSP

mod buffer;
mod pitch;
mod resample;

pub use buffer::AudioBuffer;
pub use pitch::{shift, shift_factor, PitchShiftError, NORMALIZED_PEAK};
pub use resample::resample_to_len;
