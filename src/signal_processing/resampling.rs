use rubato::{
    FastFixedIn, PolynomialDegree, Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType,
    WindowFunction,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResampleError {
    #[error("Invalid sample rate: {0} Hz")]
    InvalidRate(u32),
    #[error("Invalid channel count: {0}")]
    InvalidChannels(usize),
    #[error("{samples} samples do not divide into {channels}-channel frames")]
    PartialFrame { samples: usize, channels: usize },
    #[error("Resampler initialization failed: {0}")]
    Construction(#[from] rubato::ResamplerConstructionError),
    #[error("Resampling failed: {0}")]
    Process(#[from] rubato::ResampleError),
    #[error("Resampler produced {produced} of {expected} frames")]
    Incomplete { expected: usize, produced: usize },
}

/// Input frames handed to rubato per call. The last chunk is zero-padded.
pub const CHUNK_FRAMES: usize = 1024;

/// Interpolation used between input samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// Linear interpolation between neighbouring samples. Fast, no anti-alias filter.
    #[default]
    Linear,
    /// Band-limited sinc interpolation with a Blackman-Harris window.
    Sinc,
}

/// Resamples a mono signal with sinc interpolation.
pub fn resample(samples: &[f32], orig_sr: u32, target_sr: u32) -> Result<Vec<f32>, ResampleError> {
    resample_interleaved(samples, 1, orig_sr, target_sr, Interpolation::Sinc)
}

/// Resamples an interleaved signal of `channels` channels from `orig_sr` to `target_sr`.
///
/// The signal is fed in [`CHUNK_FRAMES`]-frame chunks to a resampler built for this
/// call, followed by silence until the resampler's output delay has drained. The
/// delay is trimmed so the result holds exactly `ceil(frames * target_sr / orig_sr)`
/// frames aligned with the input, however short the input is.
pub fn resample_interleaved(
    samples: &[f32],
    channels: usize,
    orig_sr: u32,
    target_sr: u32,
    interpolation: Interpolation,
) -> Result<Vec<f32>, ResampleError> {
    if orig_sr == 0 {
        return Err(ResampleError::InvalidRate(orig_sr));
    }
    if target_sr == 0 {
        return Err(ResampleError::InvalidRate(target_sr));
    }
    if channels == 0 {
        return Err(ResampleError::InvalidChannels(channels));
    }
    if samples.len() % channels != 0 {
        return Err(ResampleError::PartialFrame { samples: samples.len(), channels });
    }

    if orig_sr == target_sr || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let frames = samples.len() / channels;
    let ratio = target_sr as f64 / orig_sr as f64;
    let expected = (frames as u64 * target_sr as u64).div_ceil(orig_sr as u64) as usize;
    let planar = deinterleave(samples, channels);

    let output = match interpolation {
        Interpolation::Linear => {
            let mut resampler = FastFixedIn::<f32>::new(ratio, 1.0, PolynomialDegree::Linear, CHUNK_FRAMES, channels)?;
            run(&mut resampler, &planar, ratio, expected)?
        }
        Interpolation::Sinc => {
            let params = SincInterpolationParameters {
                sinc_len: 256,
                f_cutoff: 0.95,
                oversampling_factor: 256,
                interpolation: SincInterpolationType::Linear,
                window: WindowFunction::BlackmanHarris2,
            };
            let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, params, CHUNK_FRAMES, channels)?;
            run(&mut resampler, &planar, ratio, expected)?
        }
    };

    Ok(interleave(&output))
}

fn run<R: Resampler<f32>>(
    resampler: &mut R,
    planar: &[Vec<f32>],
    ratio: f64,
    expected: usize,
) -> Result<Vec<Vec<f32>>, ResampleError> {
    let delay = resampler.output_delay();
    let needed = delay + expected;
    // Input chunks that cover `needed` output frames, with slack for rounding.
    let max_chunks = ((needed + 1) as f64 / ratio / CHUNK_FRAMES as f64).ceil() as usize + 2;

    let mut output: Vec<Vec<f32>> = vec![Vec::with_capacity(needed); planar.len()];
    let mut chunk = vec![vec![0.0f32; CHUNK_FRAMES]; planar.len()];
    let mut pos = 0;

    for _ in 0..max_chunks {
        if output[0].len() >= needed {
            break;
        }
        for (buf, channel) in chunk.iter_mut().zip(planar) {
            let start = pos.min(channel.len());
            let end = (pos + CHUNK_FRAMES).min(channel.len());
            let filled = end - start;
            buf[..filled].copy_from_slice(&channel[start..end]);
            buf[filled..].fill(0.0);
        }
        pos += CHUNK_FRAMES;

        let produced = resampler.process(&chunk[..], None)?;
        for (channel, rest) in output.iter_mut().zip(produced) {
            channel.extend(rest);
        }
    }

    if output[0].len() < needed {
        return Err(ResampleError::Incomplete {
            expected,
            produced: output[0].len().saturating_sub(delay),
        });
    }

    for channel in output.iter_mut() {
        channel.truncate(needed);
        channel.drain(..delay);
    }
    Ok(output)
}

fn deinterleave(samples: &[f32], channels: usize) -> Vec<Vec<f32>> {
    let frames = samples.len() / channels;
    let mut planar = vec![Vec::with_capacity(frames); channels];
    for frame in samples.chunks_exact(channels) {
        for (channel, &s) in planar.iter_mut().zip(frame) {
            channel.push(s);
        }
    }
    planar
}

fn interleave(planar: &[Vec<f32>]) -> Vec<f32> {
    let frames = planar.iter().map(Vec::len).min().unwrap_or(0);
    let mut out = Vec::with_capacity(frames * planar.len());
    for i in 0..frames {
        for channel in planar {
            out.push(channel[i]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleave_inverts_deinterleave() {
        let samples = vec![1.0, -1.0, 2.0, -2.0, 3.0, -3.0];
        let planar = deinterleave(&samples, 2);
        assert_eq!(planar, vec![vec![1.0, 2.0, 3.0], vec![-1.0, -2.0, -3.0]]);
        assert_eq!(interleave(&planar), samples);
    }

    #[test]
    fn zero_rate_rejected() {
        assert!(matches!(
            resample_interleaved(&[0.0; 4], 1, 0, 16000, Interpolation::Linear),
            Err(ResampleError::InvalidRate(0))
        ));
        assert!(matches!(
            resample_interleaved(&[0.0; 4], 1, 16000, 0, Interpolation::Linear),
            Err(ResampleError::InvalidRate(0))
        ));
    }

    #[test]
    fn partial_frame_rejected() {
        assert!(matches!(
            resample_interleaved(&[0.0; 5], 2, 44100, 16000, Interpolation::Linear),
            Err(ResampleError::PartialFrame { samples: 5, channels: 2 })
        ));
    }
}
