//! # stem-reverb-augment
//!
//! Reverb data augmentation for synthesized instrument stems: convolve every
//! stem of a synthesis directory with a hall impulse response, rebuild the
//! mix from the reverberated stems and record the reverb in the metadata.

pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

pub use crate::{
    config::AugmentConfig,
    core::{
        audio::{load_mono, read_audio, write_audio},
        augment::{augment_batch, augment_dir, discover_synthesis_dirs, list_stem_files},
        dsp::mix_down,
        metadata::Metadata,
        reverb::{Reverb, ReverbBank},
    },
    error::{AugmentError, Result},
    io::progress::{set_augment_progress_callback, AugmentProgress},
    types::{
        Alignment, AudioData, AugmentOptions, AugmentResult, ReverbTail, ReverbType, SampleFormat,
    },
};
