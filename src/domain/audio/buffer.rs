//! Audio Buffer - 单声道 PCM 样本

/// 单声道音频缓冲区
///
/// 不变量:
/// - 仅单声道（多声道输入在构建时取平均）
/// - 样本值始终在 [-1.0, 1.0] 内
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioBuffer {
    /// 从单声道样本构建，越界样本会被截断
    pub fn new(mut samples: Vec<f32>, sample_rate: u32) -> Self {
        for s in samples.iter_mut() {
            *s = if s.is_nan() { 0.0 } else { s.clamp(-1.0, 1.0) };
        }
        Self {
            samples,
            sample_rate,
        }
    }

    /// 从交错的多声道样本构建，按帧取平均混为单声道
    pub fn from_interleaved(interleaved: &[f32], channels: usize, sample_rate: u32) -> Self {
        if channels <= 1 {
            return Self::new(interleaved.to_vec(), sample_rate);
        }

        let mono = interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect();

        Self::new(mono, sample_rate)
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// 声道数，恒为 1
    pub fn channels(&self) -> u16 {
        1
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// 时长（秒）
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// 峰值绝对幅度
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_are_clamped() {
        let buffer = AudioBuffer::new(vec![1.5, -2.0, 0.25, f32::NAN], 16000);
        assert_eq!(buffer.samples(), &[1.0, -1.0, 0.25, 0.0]);
    }

    #[test]
    fn test_stereo_is_averaged_to_mono() {
        let buffer = AudioBuffer::from_interleaved(&[0.5, 0.1, -0.2, -0.4], 2, 22050);
        assert_eq!(buffer.len(), 2);
        assert!((buffer.samples()[0] - 0.3).abs() < 1e-6);
        assert!((buffer.samples()[1] + 0.3).abs() < 1e-6);
        assert_eq!(buffer.channels(), 1);
    }

    #[test]
    fn test_duration() {
        let buffer = AudioBuffer::new(vec![0.0; 48000], 16000);
        assert!((buffer.duration_secs() - 3.0).abs() < 1e-9);
        assert_eq!(AudioBuffer::new(vec![0.0; 10], 0).duration_secs(), 0.0);
    }
}
