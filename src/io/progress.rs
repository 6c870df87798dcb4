use std::{
    path::PathBuf,
    sync::{Mutex, OnceLock},
};

use crate::types::ReverbType;

#[derive(Clone, Debug)]
pub enum AugmentProgress {
    Directory {
        index: usize,
        total: usize,
        dir: PathBuf,
        reverb: ReverbType,
    },
    Stem {
        name: String,
        done: usize,
        total: usize,
    },
    /// Stems, mix and metadata of `dir` are all written.
    Finished {
        dir: PathBuf,
        mix_path: PathBuf,
    },
}

type ProgressCallback = Box<dyn Fn(AugmentProgress) + Send + 'static>;

static AUGMENT_PROGRESS_CB: OnceLock<Mutex<Option<ProgressCallback>>> = OnceLock::new();

pub fn set_augment_progress_callback(cb: impl Fn(AugmentProgress) + Send + 'static) {
    let slot = AUGMENT_PROGRESS_CB.get_or_init(|| Mutex::new(None));
    if let Ok(mut g) = slot.lock() {
        *g = Some(Box::new(cb));
    }
}

pub fn emit_augment_progress(progress: AugmentProgress) {
    if let Some(m) = AUGMENT_PROGRESS_CB.get() {
        if let Ok(g) = m.lock() {
            if let Some(cb) = &*g {
                cb(progress);
            }
        }
    }
}
