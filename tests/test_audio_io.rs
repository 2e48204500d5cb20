use downsample_rs::{AudioData, AudioError, ensure_parent_dir, export, get_samplerate, load, probe};
use approx::assert_abs_diff_eq;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;
use tempfile::tempdir;

fn write_i16(path: &Path, sample_rate: u32, channels: u16, samples: &[i16]) {
    let spec = WavSpec { channels, sample_rate, bits_per_sample: 16, sample_format: SampleFormat::Int };
    let mut writer = WavWriter::create(path, spec).unwrap();
    for &s in samples {
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();
}

#[test]
fn test_load_16_bit_stereo() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stereo.wav");
    write_i16(&path, 44100, 2, &[16384, -16384, 0, i16::MIN]);

    let audio = load(&path).unwrap();
    assert_eq!(audio.sample_rate, 44100);
    assert_eq!(audio.channels, 2);
    assert_eq!(audio.frames(), 2);
    assert_eq!(audio.samples, vec![0.5, -0.5, 0.0, -1.0]);
}

#[test]
fn test_load_24_bit() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hires.wav");
    let spec = WavSpec { channels: 1, sample_rate: 96000, bits_per_sample: 24, sample_format: SampleFormat::Int };
    let mut writer = WavWriter::create(&path, spec).unwrap();
    writer.write_sample(1 << 22).unwrap();
    writer.write_sample(-(1 << 23)).unwrap();
    writer.finalize().unwrap();

    let audio = load(&path).unwrap();
    assert_abs_diff_eq!(audio.samples[0], 0.5, epsilon = 1e-6);
    assert_abs_diff_eq!(audio.samples[1], -1.0, epsilon = 1e-6);
}

#[test]
fn test_load_float() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("float.wav");
    let spec = WavSpec { channels: 1, sample_rate: 22050, bits_per_sample: 32, sample_format: SampleFormat::Float };
    let mut writer = WavWriter::create(&path, spec).unwrap();
    for s in [0.25f32, -0.75] {
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();

    let audio = load(&path).unwrap();
    assert_eq!(audio.samples, vec![0.25, -0.75]);
}

#[test]
fn test_load_missing_file() {
    let dir = tempdir().unwrap();
    let err = load(dir.path().join("nope.wav")).unwrap_err();
    assert!(matches!(err, AudioError::OpenError(_)));
}

#[test]
fn test_probe() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("probe.wav");
    write_i16(&path, 8000, 2, &[0; 1600]);

    let info = probe(&path).unwrap();
    assert_eq!(info.sample_rate, 8000);
    assert_eq!(info.channels, 2);
    assert_eq!(info.bits_per_sample, 16);
    assert_eq!(info.sample_format, SampleFormat::Int);
    assert_eq!(info.frames, 800);
    assert_abs_diff_eq!(info.duration(), 0.1, epsilon = 1e-9);
}

#[test]
fn test_get_samplerate() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rate.wav");
    write_i16(&path, 11025, 1, &[1, 2, 3]);
    assert_eq!(get_samplerate(&path).unwrap(), 11025);
}

#[test]
fn test_export_round_trip_is_exact() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src.wav");
    let dst = dir.path().join("dst.wav");
    let original: Vec<i16> = vec![i16::MIN, -20000, -1, 0, 1, 12345, i16::MAX, 42];
    write_i16(&src, 16000, 2, &original);

    export(&dst, &load(&src).unwrap()).unwrap();

    let mut reader = WavReader::open(&dst).unwrap();
    assert_eq!(reader.spec().bits_per_sample, 16);
    assert_eq!(reader.spec().channels, 2);
    let written: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(written, original);
}

#[test]
fn test_export_clamps_out_of_range() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("loud.wav");
    export(&path, &AudioData::new(vec![1.7, -3.0, 0.5], 16000, 1)).unwrap();

    let mut reader = WavReader::open(&path).unwrap();
    let written: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(written, vec![i16::MAX, i16::MIN, 16384]);
}

#[test]
fn test_export_zero_channels() {
    let dir = tempdir().unwrap();
    let err = export(dir.path().join("bad.wav"), &AudioData::new(vec![], 16000, 0)).unwrap_err();
    assert!(matches!(err, AudioError::InvalidChannels(0)));
}

#[test]
fn test_ensure_parent_dir_creates_tree() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a").join("b").join("out.wav");
    ensure_parent_dir(&path).unwrap();
    assert!(dir.path().join("a").join("b").is_dir());
    assert!(!path.exists());
}
