pub mod wav;

pub use wav::{AudioData, AudioError, WavInfo, ensure_parent_dir, export, get_samplerate, load, probe};
