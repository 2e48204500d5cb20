//! # downsample-rs: WAV sample rate and channel conversion
//!
//! Converts an uncompressed WAV file to a new sample rate and channel layout and
//! writes the result as 16-bit PCM. Rate conversion is delegated to `rubato`;
//! WAV decoding and encoding to `hound`.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! downsample-rs = "0.1.0"
//! ```
//!
//! ```no_run
//! use downsample_rs::{DownsampleOptions, downsample};
//!
//! // 44.1 kHz stereo in, 16 kHz mono out.
//! let ok = downsample("raw/swwv9a.wav", "data/16k/swwv9a.wav", &DownsampleOptions::default());
//! assert!(ok);
//! ```
//!
//! Failures are logged through `tracing`; call [`downsample_wav`] instead to get a
//! [`DownsampleError`] naming the stage that failed.

/// WAV input/output.
///
/// Loading, probing and exporting WAV files as interleaved `f32` sample buffers.
pub mod io;

/// Signal processing module.
///
/// Channel layout conversion and sample rate conversion.
pub mod signal_processing;

/// The file-to-file conversion.
pub mod downsample;

pub use downsample::*;
pub use io::*;
pub use signal_processing::*;
