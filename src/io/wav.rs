use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;
use thiserror::Error;

/// Bit depth of every file written by [`export`].
pub const EXPORT_BITS_PER_SAMPLE: u16 = 16;

/// Error types for WAV file handling.
#[derive(Error, Debug)]
pub enum AudioError {
    /// WAV open or decode failure, typically an invalid path or a corrupted header.
    #[error("WAV open failed: {0}")]
    OpenError(#[from] hound::Error),

    /// Sample format the decoder does not handle (e.g. 64-bit float).
    #[error("Unsupported WAV format: {bits}-bit {format:?}")]
    UnsupportedFormat { bits: u16, format: SampleFormat },

    /// Filesystem error outside `hound` (e.g. directory creation).
    #[error("Audio IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Channel count of zero, which no WAV header or buffer may carry.
    #[error("Invalid channel count: {0}")]
    InvalidChannels(u16),
}

/// Audio data with interleaved samples normalized to `[-1.0, 1.0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioData {
    /// Interleaved samples.
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of interleaved channels.
    pub channels: u16,
}

impl AudioData {
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        Self { samples, sample_rate, channels }
    }

    /// Number of frames (one sample per channel).
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels as usize
        }
    }
}

/// Format parameters read from a WAV header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavInfo {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub sample_format: SampleFormat,
    /// Frame count, as reported by the `data` chunk length.
    pub frames: u32,
}

impl WavInfo {
    fn from_spec(spec: WavSpec, frames: u32) -> Self {
        Self {
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            bits_per_sample: spec.bits_per_sample,
            sample_format: spec.sample_format,
            frames,
        }
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames as f64 / self.sample_rate as f64
    }
}

/// Loads every frame of a WAV file.
///
/// Integer PCM of 8, 16, 24 or 32 bits is scaled by `2^(bits - 1)`; 32-bit
/// float is taken as is. Samples stay interleaved.
///
/// # Arguments
/// * `path` - Path to the WAV file
///
/// # Returns
/// Returns `Result<AudioData, AudioError>` with the decoded samples and the header's
/// sample rate and channel count.
///
/// # Examples
/// ```no_run
/// let audio = downsample_rs::load("speech.wav")?;
/// println!("{} frames at {} Hz", audio.frames(), audio.sample_rate);
/// # Ok::<(), downsample_rs::AudioError>(())
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<AudioData, AudioError> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    if spec.channels == 0 {
        return Err(AudioError::InvalidChannels(spec.channels));
    }

    let samples: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => reader.samples::<f32>().collect::<Result<_, _>>()?,
        (SampleFormat::Int, bits @ (8 | 16 | 24 | 32)) => {
            let scale = (1u64 << (bits - 1)) as f64;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| (v as f64 / scale) as f32))
                .collect::<Result<_, _>>()?
        }
        (format, bits) => return Err(AudioError::UnsupportedFormat { bits, format }),
    };

    Ok(AudioData::new(samples, spec.sample_rate, spec.channels))
}

/// Reads the header of a WAV file without decoding samples.
pub fn probe<P: AsRef<Path>>(path: P) -> Result<WavInfo, AudioError> {
    let reader = WavReader::open(path)?;
    Ok(WavInfo::from_spec(reader.spec(), reader.duration()))
}

/// Gets the sample rate of a WAV file.
pub fn get_samplerate<P: AsRef<Path>>(path: P) -> Result<u32, AudioError> {
    Ok(probe(path)?.sample_rate)
}

/// Writes `audio_data` as uncompressed 16-bit PCM.
///
/// Samples are clamped to `[-1.0, 1.0]` and scaled by 32768, saturating at
/// `i16::MAX`, so 16-bit sources survive a `load`/`export` round trip unchanged.
pub fn export<P: AsRef<Path>>(path: P, audio_data: &AudioData) -> Result<(), AudioError> {
    if audio_data.channels == 0 {
        return Err(AudioError::InvalidChannels(audio_data.channels));
    }
    let mut writer = WavWriter::create(path, pcm16_spec(audio_data.sample_rate, audio_data.channels))?;
    for &sample in &audio_data.samples {
        writer.write_sample(to_pcm16(sample))?;
    }
    writer.finalize()?;
    Ok(())
}

/// Creates the parent directory tree of `path` if it is missing.
///
/// A bare file name has no parent to create.
pub fn ensure_parent_dir<P: AsRef<Path>>(path: P) -> Result<(), AudioError> {
    match path.as_ref().parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
            std::fs::create_dir_all(dir)?;
            Ok(())
        }
        _ => Ok(()),
    }
}

pub(crate) fn pcm16_spec(sample_rate: u32, channels: u16) -> WavSpec {
    WavSpec {
        channels,
        sample_rate,
        bits_per_sample: EXPORT_BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    }
}

pub(crate) fn to_pcm16(sample: f32) -> i16 {
    let scaled = (sample.clamp(-1.0, 1.0) * 32768.0).round();
    scaled.clamp(i16::MIN as f32, i16::MAX as f32) as i16
}
