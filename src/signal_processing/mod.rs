pub mod mono;
pub mod resampling;

pub use mono::{ChannelError, MonoMix, convert_channels, select_channel, to_mono, upmix};
pub use resampling::{Interpolation, ResampleError, resample, resample_interleaved};
