pub mod audio;
pub mod augment;
pub mod dsp;
pub mod metadata;
pub mod reverb;
