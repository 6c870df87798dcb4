use directories::ProjectDirs;
use std::{
    env,
    path::{Path, PathBuf},
};

pub const CONFIG_ENV: &str = "STEM_REVERB_CONFIG";
pub const IR_DIR_ENV: &str = "STEM_REVERB_IR_DIR";
pub const SAMPLE_RATE_ENV: &str = "STEM_REVERB_SAMPLE_RATE";

/// Per-user `config.toml`, whether or not it exists.
pub fn user_config_file() -> Option<PathBuf> {
    let proj = ProjectDirs::from("dev", "StemReverb", "stem-reverb-augment")?;
    Some(proj.config_dir().join("config.toml"))
}

/// Config file to read when none is given explicitly.
pub fn default_config_file() -> Option<PathBuf> {
    if let Ok(p) = env::var(CONFIG_ENV) {
        return Some(PathBuf::from(p));
    }
    user_config_file().filter(|p| p.exists())
}

pub fn default_ir_dir() -> PathBuf {
    env::var(IR_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| Path::new(env!("CARGO_MANIFEST_DIR")).join("ir"))
}
