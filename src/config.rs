//! Runtime configuration: processing sample rate, impulse response location
//! and the file names making up a synthesis directory.
//!
//! Values are resolved in this order, highest first: CLI flags (applied by the
//! binary), environment, TOML file, built-in defaults.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{AugmentError, Result},
    io::paths::{default_config_file, default_ir_dir, IR_DIR_ENV, SAMPLE_RATE_ENV},
    types::{Alignment, ReverbTail, ReverbType, SampleFormat},
};

pub const DEFAULT_SAMPLE_RATE: u32 = 16_000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpulseResponseFiles {
    pub small: String,
    pub medium: String,
    pub large: String,
}

impl Default for ImpulseResponseFiles {
    fn default() -> Self {
        Self {
            small: ReverbType::Small.default_ir_file().into(),
            medium: ReverbType::Medium.default_ir_file().into(),
            large: ReverbType::Large.default_ir_file().into(),
        }
    }
}

impl ImpulseResponseFiles {
    pub fn file_for(&self, kind: ReverbType) -> &str {
        match kind {
            ReverbType::Small => &self.small,
            ReverbType::Medium => &self.medium,
            ReverbType::Large => &self.large,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AugmentConfig {
    pub sample_rate: u32,
    pub ir_dir: Option<PathBuf>,
    pub impulse_responses: ImpulseResponseFiles,
    pub mix_file: String,
    pub metadata_file: String,
    pub metadata_key: String,
    pub alignment: Alignment,
    pub tail: ReverbTail,
    pub sample_format: SampleFormat,
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            ir_dir: None,
            impulse_responses: ImpulseResponseFiles::default(),
            mix_file: "mix.wav".into(),
            metadata_file: "metadata.json".into(),
            metadata_key: "audio_augmentation".into(),
            alignment: Alignment::default(),
            tail: ReverbTail::default(),
            sample_format: SampleFormat::default(),
        }
    }
}

impl AugmentConfig {
    /// Load from `path`, or from the default config location when `None`.
    /// An explicit path must exist; a missing default file means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_file(),
        };

        let mut cfg = match file {
            Some(p) => {
                debug!("Reading config from {}", p.display());
                let text = fs::read_to_string(&p).map_err(|e| {
                    AugmentError::Config(format!("cannot read {}: {e}", p.display()))
                })?;
                Self::from_toml_str(&text)?
            }
            None => Self::default(),
        };

        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(dir) = env::var(IR_DIR_ENV) {
            self.ir_dir = Some(PathBuf::from(dir));
        }
        if let Ok(rate) = env::var(SAMPLE_RATE_ENV) {
            self.sample_rate = rate.trim().parse().map_err(|_| {
                AugmentError::Config(format!("{SAMPLE_RATE_ENV}={rate} is not a sample rate"))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(AugmentError::Config("sample_rate must be > 0".into()));
        }
        for (key, value) in [
            ("mix_file", &self.mix_file),
            ("metadata_file", &self.metadata_file),
            ("metadata_key", &self.metadata_key),
        ] {
            if value.trim().is_empty() {
                return Err(AugmentError::Config(format!("{key} must not be empty")));
            }
        }
        for kind in ReverbType::ALL {
            if self.impulse_responses.file_for(kind).trim().is_empty() {
                return Err(AugmentError::Config(format!(
                    "impulse_responses.{kind} must not be empty"
                )));
            }
        }
        Ok(())
    }

    pub fn ir_dir(&self) -> PathBuf {
        self.ir_dir.clone().unwrap_or_else(default_ir_dir)
    }

    pub fn ir_path(&self, kind: ReverbType) -> PathBuf {
        self.ir_dir().join(self.impulse_responses.file_for(kind))
    }
}
