mod common;

use std::{cell::RefCell, fs, path::PathBuf};

use common::{read_wav_f32, test_config, write_ir_dir, write_synthesis_dir, SR};
use serde_json::json;
use stem_reverb_augment::core::augment::resolve_output_dir;
use stem_reverb_augment::{
    augment_batch, augment_dir, discover_synthesis_dirs, list_stem_files, Alignment,
    AugmentError, AugmentOptions, Metadata, ReverbBank, ReverbTail, ReverbType,
};
use tempfile::tempdir;

#[test]
fn stem_listing_excludes_the_mix() {
    let tmp = tempdir().unwrap();
    let dir = write_synthesis_dir(tmp.path(), "piece");
    fs::write(dir.join("notes.txt"), "not audio").unwrap();
    fs::create_dir(dir.join("sub.wav")).unwrap();

    let stems = list_stem_files(&dir, "mix.wav").unwrap();
    let names: Vec<_> = stems
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap())
        .collect();
    assert_eq!(names, ["a.wav", "b.wav"]);
}

#[test]
fn output_dir_mirrors_basename() {
    let tmp = tempdir().unwrap();
    let dir = write_synthesis_dir(tmp.path(), "piece_07");
    let root = tmp.path().join("augmented");

    let with_slash = PathBuf::from(format!("{}/", dir.display()));
    let out = resolve_output_dir(&with_slash, Some(&root)).unwrap();
    assert_eq!(out, root.join("piece_07"));
    assert!(out.is_dir());

    assert_eq!(resolve_output_dir(&dir, None).unwrap(), dir);
}

#[test]
fn augment_into_output_dir_processes_only_stems() {
    let tmp = tempdir().unwrap();
    let cfg = test_config(&write_ir_dir(tmp.path()));
    let dir = write_synthesis_dir(tmp.path(), "piece");
    let root = tmp.path().join("out");

    let opts = AugmentOptions {
        output_dir: Some(root.clone()),
        reverb: ReverbType::Medium,
    };
    let mut bank = ReverbBank::new(&cfg);
    let res = augment_dir(&dir, &opts, &cfg, &mut bank).unwrap();

    let out = root.join("piece");
    assert_eq!(res.output_dir, out);
    assert_eq!(res.reverb, ReverbType::Medium);
    assert_eq!(res.stem_paths, vec![out.join("a.wav"), out.join("b.wav")]);

    // Same-length tail: stems keep their lengths, mix pads to the longest.
    assert_eq!(read_wav_f32(&out.join("a.wav")).len(), 1600);
    assert_eq!(read_wav_f32(&out.join("b.wav")).len(), 1200);
    let mix = read_wav_f32(&res.mix_path);
    assert_eq!(mix.len(), 1600);
    assert_eq!(res.mix_len, 1600);

    let a = read_wav_f32(&out.join("a.wav"));
    let b = read_wav_f32(&out.join("b.wav"));
    for i in [0, 17, 900, 1199] {
        assert!((mix[i] - (a[i] + b[i])).abs() < 1e-5, "sample {i}");
    }
    assert!((mix[1500] - a[1500]).abs() < 1e-6);

    // Inputs untouched.
    assert_eq!(read_wav_f32(&dir.join("mix.wav")).len(), 4321);
    assert!(Metadata::load(dir.join("metadata.json"))
        .unwrap()
        .get("audio_augmentation")
        .is_none());

    let md = Metadata::load(&res.metadata_path).unwrap();
    assert_eq!(md.len(), 4);
    assert_eq!(md.get("seed"), Some(&json!(7)));
    assert_eq!(md.get("audio_augmentation"), Some(&json!("reverb_medium")));
}

#[test]
fn augment_in_place_rewrites_stems_and_mix() {
    let tmp = tempdir().unwrap();
    let cfg = test_config(&write_ir_dir(tmp.path()));
    let dir = write_synthesis_dir(tmp.path(), "piece");
    let dry_a = read_wav_f32(&dir.join("a.wav"));

    let mut bank = ReverbBank::new(&cfg);
    let res = augment_dir(
        &dir,
        &AugmentOptions::in_place(ReverbType::Large),
        &cfg,
        &mut bank,
    )
    .unwrap();

    assert_eq!(res.output_dir, dir);
    let wet_a = read_wav_f32(&dir.join("a.wav"));
    assert_eq!(wet_a.len(), dry_a.len());
    assert_ne!(wet_a, dry_a);
    assert_eq!(read_wav_f32(&dir.join("mix.wav")).len(), 1600);

    let md = Metadata::load(dir.join("metadata.json")).unwrap();
    assert_eq!(md.get("audio_augmentation"), Some(&json!("reverb_large")));
}

#[test]
fn full_tail_and_truncation_policies_shape_the_mix() {
    let tmp = tempdir().unwrap();
    let mut cfg = test_config(&write_ir_dir(tmp.path()));
    cfg.tail = ReverbTail::Full;
    cfg.alignment = Alignment::TruncateToShortest;
    let dir = write_synthesis_dir(tmp.path(), "piece");

    let mut bank = ReverbBank::new(&cfg);
    let res = augment_dir(
        &dir,
        &AugmentOptions {
            output_dir: Some(tmp.path().join("out")),
            reverb: ReverbType::Small,
        },
        &cfg,
        &mut bank,
    )
    .unwrap();

    // Small IR is 200 samples: stems grow by 199, mix follows the shorter one.
    assert_eq!(read_wav_f32(&res.stem_paths[0]).len(), 1600 + 199);
    assert_eq!(read_wav_f32(&res.stem_paths[1]).len(), 1200 + 199);
    assert_eq!(res.mix_len, 1200 + 199);
}

#[test]
fn directory_without_stems_fails() {
    let tmp = tempdir().unwrap();
    let cfg = test_config(&write_ir_dir(tmp.path()));
    let dir = tmp.path().join("empty");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("metadata.json"), "{}").unwrap();
    common::write_wav_f32(&dir.join("mix.wav"), &[0.0; 10], SR);

    let root = tmp.path().join("out");
    let opts = AugmentOptions {
        output_dir: Some(root.clone()),
        reverb: ReverbType::Small,
    };
    let mut bank = ReverbBank::new(&cfg);
    let err = augment_dir(&dir, &opts, &cfg, &mut bank).unwrap_err();
    assert!(matches!(err, AugmentError::NoStems { .. }), "{err}");
    assert!(!root.join("empty").exists(), "mirror dir created for a failed input");
}

#[test]
fn missing_metadata_leaves_no_mirror_dir() {
    let tmp = tempdir().unwrap();
    let cfg = test_config(&write_ir_dir(tmp.path()));
    let dir = write_synthesis_dir(tmp.path(), "piece");
    fs::remove_file(dir.join("metadata.json")).unwrap();
    let root = tmp.path().join("out");

    let mut bank = ReverbBank::new(&cfg);
    let opts = AugmentOptions {
        output_dir: Some(root.clone()),
        reverb: ReverbType::Medium,
    };
    assert!(augment_dir(&dir, &opts, &cfg, &mut bank).is_err());
    assert!(!root.join("piece").exists());
}

#[test]
fn missing_ir_aborts_before_writing_outputs() {
    let tmp = tempdir().unwrap();
    let cfg = test_config(&tmp.path().join("no_irs_here"));
    let dir = write_synthesis_dir(tmp.path(), "piece");
    let root = tmp.path().join("out");

    let mut bank = ReverbBank::new(&cfg);
    let err = augment_dir(
        &dir,
        &AugmentOptions {
            output_dir: Some(root.clone()),
            reverb: ReverbType::Small,
        },
        &cfg,
        &mut bank,
    )
    .unwrap_err();
    assert!(matches!(err, AugmentError::ImpulseResponse { .. }), "{err}");
    assert!(!root.join("piece").exists());
}

#[test]
fn batch_chooses_once_per_directory() {
    let tmp = tempdir().unwrap();
    let cfg = test_config(&write_ir_dir(tmp.path()));
    let multi = tmp.path().join("batch");
    for name in ["p2", "p0", "p1"] {
        write_synthesis_dir(&multi, name);
    }
    fs::write(multi.join("README"), "stray file").unwrap();

    let dirs = discover_synthesis_dirs(&multi).unwrap();
    let names: Vec<_> = dirs
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["p0", "p1", "p2"]);

    let picks = [ReverbType::Large, ReverbType::Small, ReverbType::Large];
    let calls = RefCell::new(Vec::new());
    let root = tmp.path().join("out");
    let results = augment_batch(&dirs, Some(&root), &cfg, |dir| {
        let mut calls = calls.borrow_mut();
        let pick = picks[calls.len()];
        calls.push(dir.to_path_buf());
        pick
    })
    .unwrap();

    assert_eq!(calls.into_inner(), dirs);
    assert_eq!(results.len(), 3);
    for (res, pick) in results.iter().zip(picks) {
        assert_eq!(res.reverb, pick);
        let md = Metadata::load(&res.metadata_path).unwrap();
        assert_eq!(
            md.get("audio_augmentation"),
            Some(&json!(pick.metadata_tag()))
        );
    }
}
