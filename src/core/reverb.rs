//! Convolution reverb driven by pre-recorded hall impulse responses.
//!
//! The first IR sample is zeroed and the dry signal is added back after
//! convolution, so an IR is treated as the wet path only.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::{
    config::AugmentConfig,
    core::{audio::load_mono, dsp::fft_convolve},
    error::{AugmentError, Result},
    types::{ReverbTail, ReverbType},
};

#[derive(Clone, Debug)]
pub struct Reverb {
    kind: ReverbType,
    ir: Vec<f32>,
    sample_rate: u32,
    tail: ReverbTail,
}

impl Reverb {
    pub fn from_ir(
        kind: ReverbType,
        mut ir: Vec<f32>,
        sample_rate: u32,
        tail: ReverbTail,
    ) -> Result<Self> {
        if ir.is_empty() {
            return Err(AugmentError::EmptyImpulseResponse {
                path: format!("<{kind} in memory>"),
            });
        }
        ir[0] = 0.0;
        Ok(Self {
            kind,
            ir,
            sample_rate,
            tail,
        })
    }

    /// Load the IR file configured for `kind`, resampled to the configured rate.
    pub fn load(kind: ReverbType, config: &AugmentConfig) -> Result<Self> {
        let path = config.ir_path(kind);
        let ir_path = path.display().to_string();

        let ir = load_mono(&path, config.sample_rate).map_err(|source| {
            AugmentError::ImpulseResponse {
                kind,
                path: ir_path.clone(),
                source,
            }
        })?;
        if ir.is_empty() {
            return Err(AugmentError::EmptyImpulseResponse { path: ir_path });
        }

        info!(
            "Loaded {} impulse response {} ({} samples @ {} Hz)",
            kind,
            ir_path,
            ir.len(),
            config.sample_rate
        );
        Self::from_ir(kind, ir, config.sample_rate, config.tail)
    }

    pub fn kind(&self) -> ReverbType {
        self.kind
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn ir_len(&self) -> usize {
        self.ir.len()
    }

    /// Reverberate `wav`, returning a new waveform.
    ///
    /// With [`ReverbTail::Same`] the output has the input's length; with
    /// [`ReverbTail::Full`] it has `input + ir - 1` samples.
    pub fn apply(&self, wav: &[f32], sample_rate: u32) -> Result<Vec<f32>> {
        if sample_rate != self.sample_rate {
            return Err(AugmentError::SampleRateMismatch {
                expected: self.sample_rate,
                got: sample_rate,
            });
        }
        if wav.is_empty() {
            return Ok(Vec::new());
        }

        let mut wet = fft_convolve(wav, &self.ir);
        for (w, &dry) in wet.iter_mut().zip(wav) {
            *w += dry as f64;
        }

        if self.tail == ReverbTail::Same {
            wet.truncate(wav.len());
        }

        debug!(
            "Applied {} reverb: {} -> {} samples",
            self.kind,
            wav.len(),
            wet.len()
        );
        Ok(wet.into_iter().map(|x| x as f32).collect())
    }
}

/// Impulse responses loaded on first use and kept for the rest of a batch.
pub struct ReverbBank {
    config: AugmentConfig,
    loaded: HashMap<ReverbType, Reverb>,
}

impl ReverbBank {
    pub fn new(config: &AugmentConfig) -> Self {
        Self {
            config: config.clone(),
            loaded: HashMap::new(),
        }
    }

    /// Seed the bank with an already built reverb, e.g. a synthetic IR.
    pub fn insert(&mut self, reverb: Reverb) {
        self.loaded.insert(reverb.kind(), reverb);
    }

    pub fn get(&mut self, kind: ReverbType) -> Result<&Reverb> {
        if !self.loaded.contains_key(&kind) {
            let reverb = Reverb::load(kind, &self.config)?;
            self.loaded.insert(kind, reverb);
        }
        self.loaded
            .get(&kind)
            .ok_or_else(|| anyhow::anyhow!("{kind} reverb missing from bank").into())
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }
}
