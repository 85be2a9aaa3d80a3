//! Fourier Resampler
//!
//! 频域截断/补零实现的带限重采样，输出长度精确，且对相同输入完全确定

use realfft::num_complex::Complex;
use realfft::{FftError, RealFftPlanner};

/// 将样本重采样到指定长度
///
/// 信号被视为覆盖相同时间跨度：保留两者共有的低频分量，
/// 偶数长度时按双边频谱的对称性拆分/合并 Nyquist 分量。
pub fn resample_to_len(samples: &[f32], target_len: usize) -> Result<Vec<f32>, FftError> {
    let len = samples.len();
    if len == 0 || target_len == 0 {
        return Ok(vec![0.0; target_len]);
    }
    if len == target_len {
        return Ok(samples.to_vec());
    }

    let mut planner = RealFftPlanner::<f64>::new();

    let forward = planner.plan_fft_forward(len);
    let mut input: Vec<f64> = samples.iter().map(|&s| s as f64).collect();
    let mut spectrum = forward.make_output_vec();
    forward.process(&mut input, &mut spectrum)?;

    let inverse = planner.plan_fft_inverse(target_len);
    let mut resized = inverse.make_input_vec();

    let shared = len.min(target_len);
    let kept_bins = shared / 2 + 1;
    resized[..kept_bins].copy_from_slice(&spectrum[..kept_bins]);

    if shared % 2 == 0 {
        let nyquist = shared / 2;
        if target_len < len {
            resized[nyquist] = resized[nyquist] * 2.0;
        } else {
            resized[nyquist] = resized[nyquist] * 0.5;
        }
    }

    // 逆变换要求 DC 与（偶数长度时的）Nyquist 分量为实数
    resized[0] = Complex::new(resized[0].re, 0.0);
    if target_len % 2 == 0 {
        let last = resized.len() - 1;
        resized[last] = Complex::new(resized[last].re, 0.0);
    }

    let mut output = inverse.make_output_vec();
    inverse.process(&mut resized, &mut output)?;

    // realfft 不做归一化：1/target_len 抵消逆变换增益，再乘 target_len/len 保持幅度
    let scale = 1.0 / len as f64;
    Ok(output.into_iter().map(|v| (v * scale) as f32).collect())
}
