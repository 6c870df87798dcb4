use std::{fmt, path::PathBuf, str::FromStr};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::AugmentError;

#[derive(Clone, Debug)]
pub struct AudioData {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioData {
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
            channels: 1,
        }
    }
}

/// Reverb profile, each backed by one pre-recorded hall impulse response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReverbType {
    Small,
    Medium,
    Large,
}

impl ReverbType {
    pub const ALL: [ReverbType; 3] = [ReverbType::Small, ReverbType::Medium, ReverbType::Large];

    pub fn as_str(self) -> &'static str {
        match self {
            ReverbType::Small => "small",
            ReverbType::Medium => "medium",
            ReverbType::Large => "large",
        }
    }

    /// IR file shipped for this profile when the config does not override it.
    pub fn default_ir_file(self) -> &'static str {
        match self {
            ReverbType::Small => "Small Hall.aif",
            ReverbType::Medium => "Medium Hall.aif",
            ReverbType::Large => "Large Hall.aif",
        }
    }

    /// Value recorded in the metadata record, e.g. `reverb_small`.
    pub fn metadata_tag(self) -> String {
        format!("reverb_{}", self.as_str())
    }

    /// Uniform pick over all profiles.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

impl fmt::Display for ReverbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReverbType {
    type Err = AugmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AugmentError::UnknownReverb(s.to_string()))
    }
}

/// How reverberated stems of different lengths are brought to a common length
/// before summing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    /// Zero-pad every stem to the longest one.
    #[default]
    PadToLongest,
    /// Cut every stem to the shortest one.
    TruncateToShortest,
}

/// Output length of a reverberated stem.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReverbTail {
    /// Same length as the dry input; the decay past the end is dropped.
    #[default]
    Same,
    /// Full convolution length, `input + ir - 1`.
    Full,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleFormat {
    #[default]
    Float32,
    Pcm16,
}

#[derive(Clone, Debug)]
pub struct AugmentOptions {
    /// Root under which `<basename(dir)>` is mirrored. `None` rewrites in place.
    pub output_dir: Option<PathBuf>,
    pub reverb: ReverbType,
}

impl AugmentOptions {
    pub fn in_place(reverb: ReverbType) -> Self {
        Self {
            output_dir: None,
            reverb,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AugmentResult {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub reverb: ReverbType,
    pub stem_paths: Vec<PathBuf>,
    pub mix_path: PathBuf,
    pub metadata_path: PathBuf,
    pub mix_len: usize,
}
