#![allow(dead_code)]

use std::{
    f32::consts::PI,
    fs,
    path::{Path, PathBuf},
};

use serde_json::json;
use stem_reverb_augment::{AugmentConfig, ReverbType};

pub const SR: u32 = 16_000;

pub fn sine(freq: f32, len: usize, amp: f32) -> Vec<f32> {
    (0..len)
        .map(|i| (2.0 * PI * freq * i as f32 / SR as f32).sin() * amp)
        .collect()
}

/// Exponentially decaying noise-free tail, `len` samples.
pub fn decaying_ir(len: usize, decay: f32) -> Vec<f32> {
    (0..len)
        .map(|i| (-(i as f32) / decay).exp() * if i % 2 == 0 { 0.5 } else { -0.25 })
        .collect()
}

pub fn write_wav_f32(path: &Path, samples: &[f32], sample_rate: u32) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut w = hound::WavWriter::create(path, spec).unwrap();
    for s in samples {
        w.write_sample(*s).unwrap();
    }
    w.finalize().unwrap();
}

pub fn read_wav_f32(path: &Path) -> Vec<f32> {
    let mut r = hound::WavReader::open(path).unwrap();
    r.samples::<f32>().map(|s| s.unwrap()).collect()
}

/// IR directory with one `<variant>.wav` per reverb type, each a different length.
pub fn write_ir_dir(root: &Path) -> PathBuf {
    let dir = root.join("ir");
    fs::create_dir_all(&dir).unwrap();
    for (i, kind) in ReverbType::ALL.into_iter().enumerate() {
        let len = 200 * (i + 1);
        write_wav_f32(
            &dir.join(format!("{kind}.wav")),
            &decaying_ir(len, 40.0 * (i + 1) as f32),
            SR,
        );
    }
    dir
}

pub fn test_config(ir_dir: &Path) -> AugmentConfig {
    let mut cfg = AugmentConfig {
        sample_rate: SR,
        ir_dir: Some(ir_dir.to_path_buf()),
        ..Default::default()
    };
    cfg.impulse_responses.small = "small.wav".into();
    cfg.impulse_responses.medium = "medium.wav".into();
    cfg.impulse_responses.large = "large.wav".into();
    cfg
}

/// Synthesis directory with stems `a.wav`, `b.wav`, a pre-existing `mix.wav`
/// and `metadata.json`.
pub fn write_synthesis_dir(root: &Path, name: &str) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();

    let a = sine(220.0, 1600, 0.3);
    let b = sine(330.0, 1200, 0.2);
    write_wav_f32(&dir.join("a.wav"), &a, SR);
    write_wav_f32(&dir.join("b.wav"), &b, SR);
    // Old mix with a length no stem has, so re-processing it would show up.
    write_wav_f32(&dir.join("mix.wav"), &vec![0.9; 4321], SR);

    let metadata = json!({
        "instrument": ["violin", "cello"],
        "midi_file": "piece_001.mid",
        "seed": 7
    });
    fs::write(
        dir.join("metadata.json"),
        serde_json::to_string_pretty(&metadata).unwrap(),
    )
    .unwrap();
    dir
}
