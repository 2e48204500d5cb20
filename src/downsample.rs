//! WAV-to-WAV sample rate and channel layout conversion.

use crate::io::wav::{AudioError, EXPORT_BITS_PER_SAMPLE, WavInfo, ensure_parent_dir, load, pcm16_spec, probe, to_pcm16};
use crate::signal_processing::{ChannelError, Interpolation, MonoMix, ResampleError, convert_channels, resample_interleaved};
use hound::WavWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Parameters of a conversion. The defaults take 44.1 kHz stereo to 16 kHz mono,
/// keeping the left channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownsampleOptions {
    /// Sample rate the source samples are interpreted at, in Hz.
    pub input_rate: u32,
    /// Sample rate of the destination, in Hz.
    pub output_rate: u32,
    /// Channel count the source samples are deinterleaved with.
    pub input_channels: u16,
    /// Channel count of the destination.
    pub output_channels: u16,
    /// Collapse strategy when `output_channels` is 1. Defaults to `MonoMix::Channel(0)`;
    /// use `MonoMix::Average` to mix all channels instead.
    pub mono_mix: MonoMix,
    /// Rate conversion method, linear interpolation by default.
    pub interpolation: Interpolation,
    /// Refuse sources whose header disagrees with `input_rate` or `input_channels`.
    /// Off by default: the declared format wins and the header is only logged.
    pub strict_format: bool,
}

impl Default for DownsampleOptions {
    fn default() -> Self {
        Self {
            input_rate: 44100,
            output_rate: 16000,
            input_channels: 2,
            output_channels: 1,
            mono_mix: MonoMix::Channel(0),
            interpolation: Interpolation::default(),
            strict_format: false,
        }
    }
}

/// Formats of both ends of a finished conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownsampleReport {
    /// Header of the source as found on disk.
    pub source: WavInfo,
    /// Format and frame count of the written file.
    pub destination: WavInfo,
}

/// Where a conversion failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Source path check.
    Source,
    /// Destination directory creation.
    Directory,
    /// Opening the source or creating the destination.
    Open,
    /// Channel and rate conversion.
    Convert,
    /// Writing samples.
    Write,
    /// Finalizing the destination header.
    Close,
}

#[derive(Error, Debug)]
pub enum DownsampleError {
    /// Source path does not exist. Nothing is created.
    #[error("Source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// Destination directory tree could not be created.
    #[error("Failed to create directory for {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: AudioError,
    },

    /// Source could not be opened or decoded, or destination could not be created.
    #[error("Failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: AudioError,
    },

    /// Header disagrees with the declared input format while `strict_format` is set.
    #[error("Source is {actual_rate} Hz / {actual_channels} channels, expected {expected_rate} Hz / {expected_channels} channels")]
    FormatMismatch {
        expected_rate: u32,
        expected_channels: u16,
        actual_rate: u32,
        actual_channels: u16,
    },

    /// Channel layout conversion failed.
    #[error("Failed to convert channels: {0}")]
    Channels(#[from] ChannelError),

    /// Rate conversion failed.
    #[error("Failed to resample: {0}")]
    Resample(#[from] ResampleError),

    /// A sample could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    /// Destination header could not be finalized.
    #[error("Failed to close {}: {source}", path.display())]
    Close {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },
}

impl DownsampleError {
    /// Coarse stage of the failure, for callers that do not need the cause.
    pub fn stage(&self) -> Stage {
        match self {
            DownsampleError::SourceNotFound(_) => Stage::Source,
            DownsampleError::CreateDir { .. } => Stage::Directory,
            DownsampleError::Open { .. } => Stage::Open,
            DownsampleError::FormatMismatch { .. }
            | DownsampleError::Channels(_)
            | DownsampleError::Resample(_) => Stage::Convert,
            DownsampleError::Write { .. } => Stage::Write,
            DownsampleError::Close { .. } => Stage::Close,
        }
    }
}

/// Converts `src` to `dst` at `options.output_rate` Hz with `options.output_channels`
/// channels of 16-bit PCM.
///
/// The destination directory tree is created when missing. The destination file is
/// only created once conversion has succeeded, and is overwritten if it exists.
///
/// # Examples
/// ```no_run
/// use downsample_rs::{DownsampleOptions, downsample_wav};
///
/// let report = downsample_wav("raw/take1.wav", "out/16k/take1.wav", &DownsampleOptions::default())?;
/// assert_eq!(report.destination.sample_rate, 16000);
/// # Ok::<(), downsample_rs::DownsampleError>(())
/// ```
pub fn downsample_wav<S: AsRef<Path>, D: AsRef<Path>>(
    src: S,
    dst: D,
    options: &DownsampleOptions,
) -> Result<DownsampleReport, DownsampleError> {
    let (src, dst) = (src.as_ref(), dst.as_ref());

    if !src.exists() {
        return Err(DownsampleError::SourceNotFound(src.to_path_buf()));
    }

    ensure_parent_dir(dst).map_err(|source| DownsampleError::CreateDir { path: dst.to_path_buf(), source })?;

    let source_info = probe(src).map_err(|source| DownsampleError::Open { path: src.to_path_buf(), source })?;
    tracing::debug!(
        path = %src.display(),
        sample_rate = source_info.sample_rate,
        channels = source_info.channels,
        bits = source_info.bits_per_sample,
        frames = source_info.frames,
        "opened source"
    );

    if source_info.sample_rate != options.input_rate || source_info.channels != options.input_channels {
        if options.strict_format {
            return Err(DownsampleError::FormatMismatch {
                expected_rate: options.input_rate,
                expected_channels: options.input_channels,
                actual_rate: source_info.sample_rate,
                actual_channels: source_info.channels,
            });
        }
        tracing::warn!(
            header_rate = source_info.sample_rate,
            header_channels = source_info.channels,
            input_rate = options.input_rate,
            input_channels = options.input_channels,
            "source header disagrees with declared format, converting as declared"
        );
    }

    let audio = load(src).map_err(|source| DownsampleError::Open { path: src.to_path_buf(), source })?;
    let converted = convert(&audio.samples, options)?;
    let out_channels = options.output_channels as usize;

    let mut writer = WavWriter::create(dst, pcm16_spec(options.output_rate, options.output_channels))
        .map_err(|e| DownsampleError::Open { path: dst.to_path_buf(), source: e.into() })?;
    for &sample in &converted {
        writer
            .write_sample(to_pcm16(sample))
            .map_err(|source| DownsampleError::Write { path: dst.to_path_buf(), source })?;
    }
    writer.finalize().map_err(|source| DownsampleError::Close { path: dst.to_path_buf(), source })?;

    let destination = WavInfo {
        sample_rate: options.output_rate,
        channels: options.output_channels,
        bits_per_sample: EXPORT_BITS_PER_SAMPLE,
        sample_format: hound::SampleFormat::Int,
        frames: (converted.len() / out_channels) as u32,
    };
    tracing::info!(
        src = %src.display(),
        dst = %dst.display(),
        from_rate = source_info.sample_rate,
        to_rate = destination.sample_rate,
        from_channels = source_info.channels,
        to_channels = destination.channels,
        frames = destination.frames,
        "downsampled wav"
    );

    Ok(DownsampleReport { source: source_info, destination })
}

/// Converts `src` to `dst`, logging any failure and reporting only success.
///
/// Use [`downsample_wav`] to find out which stage failed.
pub fn downsample<S: AsRef<Path>, D: AsRef<Path>>(src: S, dst: D, options: &DownsampleOptions) -> bool {
    match downsample_wav(src, dst, options) {
        Ok(_) => true,
        Err(e) => {
            tracing::error!(stage = ?e.stage(), "{e}");
            false
        }
    }
}

// Channel reduction runs before resampling so the resampler sees fewer channels;
// duplication runs after for the same reason.
fn convert(samples: &[f32], options: &DownsampleOptions) -> Result<Vec<f32>, DownsampleError> {
    let (from, to) = (options.input_channels as usize, options.output_channels as usize);
    let resample = |samples: &[f32], channels: usize| {
        resample_interleaved(samples, channels, options.input_rate, options.output_rate, options.interpolation)
    };

    if to <= from {
        let reduced = convert_channels(samples, from, to, options.mono_mix)?;
        Ok(resample(&reduced, to)?)
    } else {
        let resampled = resample(samples, from)?;
        Ok(convert_channels(&resampled, from, to, options.mono_mix)?)
    }
}
