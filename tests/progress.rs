mod common;

use std::sync::{Arc, Mutex};

use common::{test_config, write_ir_dir, write_synthesis_dir};
use stem_reverb_augment::{
    augment_batch, discover_synthesis_dirs, set_augment_progress_callback, AugmentProgress,
    ReverbType,
};
use tempfile::tempdir;

// Only test in this binary: the progress callback is process-wide.
#[test]
fn batch_reports_start_stems_and_finish_per_directory() {
    let tmp = tempdir().unwrap();
    let cfg = test_config(&write_ir_dir(tmp.path()));
    let multi = tmp.path().join("batch");
    write_synthesis_dir(&multi, "p0");
    write_synthesis_dir(&multi, "p1");
    let dirs = discover_synthesis_dirs(&multi).unwrap();

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    set_augment_progress_callback(move |p| sink.lock().unwrap().push(p));

    let results = augment_batch(&dirs, Some(&tmp.path().join("out")), &cfg, |_| {
        ReverbType::Small
    })
    .unwrap();

    let events = events.lock().unwrap();
    let tags: Vec<String> = events
        .iter()
        .map(|e| match e {
            AugmentProgress::Directory { index, .. } => format!("dir{index}"),
            AugmentProgress::Stem { name, .. } => format!("stem:{name}"),
            AugmentProgress::Finished { .. } => "finished".to_string(),
        })
        .collect();
    assert_eq!(
        tags,
        [
            "dir0", "stem:a.wav", "stem:b.wav", "finished", "dir1", "stem:a.wav", "stem:b.wav",
            "finished",
        ]
    );

    let finished: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            AugmentProgress::Finished { dir, mix_path } => Some((dir.clone(), mix_path.clone())),
            _ => None,
        })
        .collect();
    for ((dir, mix_path), (res, input)) in finished.iter().zip(results.iter().zip(&dirs)) {
        assert_eq!(dir, input);
        assert_eq!(mix_path, &res.mix_path);
        assert!(res.metadata_path.exists());
    }
}
