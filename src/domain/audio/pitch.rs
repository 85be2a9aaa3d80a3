//! Pitch Shifter
//!
//! 两段式重采样变调：先重采样到 len / factor，再重采样回原长度以恢复时长。
//! 结果做峰值归一化（0.95）并截断到 [-1, 1]。

use thiserror::Error;

use super::resample::resample_to_len;
use super::AudioBuffer;

/// 归一化后的峰值幅度，为下游编码保留余量
pub const NORMALIZED_PEAK: f32 = 0.95;

#[derive(Debug, Error)]
pub enum PitchShiftError {
    #[error("Resampling failed: {0}")]
    Resample(#[from] realfft::FftError),
}

/// 半音偏移对应的频率比
pub fn shift_factor(semitones: i32) -> f64 {
    2f64.powf(semitones as f64 / 12.0)
}

/// 按半音偏移变调，保持时长不变
///
/// - `semitones == 0` 原样返回
/// - 空缓冲区返回空缓冲区（静音变调仍是静音）
pub fn shift(buffer: AudioBuffer, semitones: i32) -> Result<AudioBuffer, PitchShiftError> {
    if semitones == 0 || buffer.is_empty() {
        return Ok(buffer);
    }

    let original_len = buffer.len();
    let pitched_len = ((original_len as f64 / shift_factor(semitones)).round() as usize).max(1);

    let pitched = resample_to_len(buffer.samples(), pitched_len)?;
    let mut restored = resample_to_len(&pitched, original_len)?;

    normalize_peak(&mut restored, NORMALIZED_PEAK);

    Ok(AudioBuffer::new(restored, buffer.sample_rate()))
}

/// 缩放使峰值等于 `target`，全零信号保持不变
fn normalize_peak(samples: &mut [f32], target: f32) {
    let peak = samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
    if peak > 0.0 && peak.is_finite() {
        let gain = target / peak;
        for s in samples.iter_mut() {
            *s *= gain;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voice_like(len: usize, sample_rate: u32) -> AudioBuffer {
        let samples = (0..len)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                0.4 * (2.0 * std::f32::consts::PI * 180.0 * t).sin()
                    + 0.2 * (2.0 * std::f32::consts::PI * 720.0 * t).sin()
                    + 0.1 * (2.0 * std::f32::consts::PI * 2100.0 * t).sin()
            })
            .collect();
        AudioBuffer::new(samples, sample_rate)
    }

    #[test]
    fn test_zero_shift_is_identity() {
        let buffer = voice_like(4000, 16000);
        let shifted = shift(buffer.clone(), 0).unwrap();
        assert_eq!(shifted, buffer);
    }

    #[test]
    fn test_duration_is_preserved() {
        let buffer = voice_like(4001, 16000);
        for semitones in [-12, -5, -2, -1, 1, 3, 4, 7, 12] {
            let shifted = shift(buffer.clone(), semitones).unwrap();
            assert_eq!(shifted.len(), buffer.len(), "semitones={}", semitones);
            assert_eq!(shifted.sample_rate(), buffer.sample_rate());
        }
    }

    #[test]
    fn test_output_is_bounded() {
        // 接近满幅的方波，重采样会产生过冲
        let samples: Vec<f32> = (0..3000)
            .map(|i| if (i / 50) % 2 == 0 { 1.0 } else { -1.0 })
            .collect();
        let buffer = AudioBuffer::new(samples, 8000);
        for semitones in [-7, -3, 2, 5, 11] {
            let shifted = shift(buffer.clone(), semitones).unwrap();
            assert!(shifted.samples().iter().all(|s| (-1.0..=1.0).contains(s)));
        }
    }

    #[test]
    fn test_peak_is_normalized() {
        let buffer = voice_like(8000, 16000);
        for semitones in [-4, -2, 1, 4, 5] {
            let shifted = shift(buffer.clone(), semitones).unwrap();
            assert!(
                (shifted.peak() - NORMALIZED_PEAK).abs() < 1e-4,
                "semitones={} peak={}",
                semitones,
                shifted.peak()
            );
        }
    }

    #[test]
    fn test_silence_stays_silent() {
        let buffer = AudioBuffer::new(vec![0.0; 1024], 16000);
        let shifted = shift(buffer, 3).unwrap();
        assert_eq!(shifted.len(), 1024);
        assert!(shifted.samples().iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = AudioBuffer::new(Vec::new(), 16000);
        let shifted = shift(buffer, 4).unwrap();
        assert!(shifted.is_empty());
    }

    #[test]
    fn test_shift_is_deterministic() {
        let buffer = voice_like(5000, 16000);
        let a = shift(buffer.clone(), -3).unwrap();
        let b = shift(buffer, -3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_shift_factor() {
        assert!((shift_factor(12) - 2.0).abs() < 1e-12);
        assert!((shift_factor(-12) - 0.5).abs() < 1e-12);
        assert!((shift_factor(0) - 1.0).abs() < 1e-12);
    }
}
