use thiserror::Error;

/// Error types for channel layout conversion.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ChannelError {
    /// A channel count of zero.
    #[error("Invalid channel count: {0}")]
    InvalidChannelCount(usize),

    /// Sample buffer length is not a whole number of frames.
    #[error("{samples} samples do not divide into {channels}-channel frames")]
    PartialFrame { samples: usize, channels: usize },

    /// Selected channel does not exist in the source layout.
    #[error("Channel {index} out of range for {channels} channels")]
    ChannelOutOfRange { index: usize, channels: usize },

    /// Layout change other than identity, collapse to mono, or mono duplication.
    #[error("Cannot convert {from} channels to {to} channels")]
    UnsupportedLayout { from: usize, to: usize },
}

/// How a multi-channel signal collapses to one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonoMix {
    /// Mean of all channels in the frame.
    #[default]
    Average,
    /// Keep a single channel, dropping the rest (`Channel(0)` keeps the left channel).
    Channel(usize),
}

/// Averages each interleaved frame into one sample.
pub fn to_mono(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    let mut mono = Vec::with_capacity(samples.len() / channels);
    for chunk in samples.chunks_exact(channels) {
        let sum: f32 = chunk.iter().sum();
        mono.push(sum / channels as f32);
    }
    mono
}

/// Extracts channel `index` from an interleaved signal.
pub fn select_channel(samples: &[f32], channels: usize, index: usize) -> Result<Vec<f32>, ChannelError> {
    check_frames(samples, channels)?;
    if index >= channels {
        return Err(ChannelError::ChannelOutOfRange { index, channels });
    }
    Ok(samples.chunks_exact(channels).map(|frame| frame[index]).collect())
}

/// Duplicates a mono signal into `channels` interleaved channels.
pub fn upmix(samples: &[f32], channels: usize) -> Vec<f32> {
    let mut out = Vec::with_capacity(samples.len() * channels);
    for &s in samples {
        out.extend(std::iter::repeat_n(s, channels));
    }
    out
}

/// Converts an interleaved signal from `from` channels to `to` channels.
///
/// Supported changes are identity, any layout down to mono (using `mix`), and
/// mono up to any layout by duplication.
pub fn convert_channels(samples: &[f32], from: usize, to: usize, mix: MonoMix) -> Result<Vec<f32>, ChannelError> {
    if to == 0 {
        return Err(ChannelError::InvalidChannelCount(to));
    }
    check_frames(samples, from)?;

    match (from, to) {
        (f, t) if f == t => Ok(samples.to_vec()),
        (_, 1) => match mix {
            MonoMix::Average => Ok(to_mono(samples, from)),
            MonoMix::Channel(index) => select_channel(samples, from, index),
        },
        (1, t) => Ok(upmix(samples, t)),
        (from, to) => Err(ChannelError::UnsupportedLayout { from, to }),
    }
}

fn check_frames(samples: &[f32], channels: usize) -> Result<(), ChannelError> {
    if channels == 0 {
        return Err(ChannelError::InvalidChannelCount(channels));
    }
    if samples.len() % channels != 0 {
        return Err(ChannelError::PartialFrame { samples: samples.len(), channels });
    }
    Ok(())
}
