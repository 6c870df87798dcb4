use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use hound::WavWriter;
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use symphonia::core::{
    audio::SampleBuffer, codecs::DecoderOptions, formats::FormatOptions, io::MediaSourceStream,
    meta::MetadataOptions, probe::Hint,
};
use symphonia::default::{get_codecs, get_probe};
use tracing::debug;

use crate::types::{AudioData, SampleFormat};

pub fn read_audio<P: AsRef<Path>>(path: P) -> Result<AudioData> {
    let path: &Path = path.as_ref();

    let file: File =
        File::open(path).with_context(|| format!("Failed to open audio file: {:?}", path))?;

    let mss: MediaSourceStream = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint: Hint = Hint::new();

    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .with_context(|| format!("Unsupported or corrupt audio file: {:?}", path))?;

    let mut format = probed.format;
    let track = format.default_track().context("No default track found")?;
    let track_id = track.id;

    let mut sample_rate: u32 = track.codec_params.sample_rate.unwrap_or(0);
    let mut channels: u16 = track
        .codec_params
        .channels
        .map(|c| c.count() as u16)
        .unwrap_or(0);

    let mut decoder = get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .with_context(|| format!("No decoder for {:?}", path))?;

    let mut samples: Vec<f32> = Vec::new();

    while let Ok(packet) = format.next_packet() {
        if packet.track_id() != track_id {
            continue;
        }
        let decoded = decoder
            .decode(&packet)
            .with_context(|| format!("Failed to decode {:?}", path))?;
        sample_rate = decoded.spec().rate;
        channels = decoded.spec().channels.count() as u16;

        let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, *decoded.spec());
        buffer.copy_interleaved_ref(decoded);

        samples.extend_from_slice(buffer.samples());
    }

    debug!(
        "Read audio {:?}: sample_rate={}, channels={}, samples={}",
        path,
        sample_rate,
        channels,
        samples.len()
    );

    Ok(AudioData {
        samples,
        sample_rate,
        channels,
    })
}

pub fn write_audio<P: AsRef<Path>>(path: P, audio: &AudioData, format: SampleFormat) -> Result<()> {
    let path = path.as_ref();
    let spec = match format {
        SampleFormat::Float32 => hound::WavSpec {
            channels: audio.channels,
            sample_rate: audio.sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        },
        SampleFormat::Pcm16 => hound::WavSpec {
            channels: audio.channels,
            sample_rate: audio.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        },
    };

    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create WAV file: {:?}", path))?;
    match format {
        SampleFormat::Float32 => {
            for sample in &audio.samples {
                writer.write_sample(*sample)?;
            }
        }
        SampleFormat::Pcm16 => {
            for sample in &audio.samples {
                let s = (sample * i16::MAX as f32).clamp(i16::MIN as f32, i16::MAX as f32) as i16;
                writer.write_sample(s)?;
            }
        }
    }

    writer.finalize()?;
    Ok(())
}

pub fn downmix_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }

    samples
        .chunks(channels as usize)
        .map(|chunk| chunk.iter().copied().sum::<f32>() / channels as f32)
        .collect()
}

/// Band-limited sinc resampling of a mono signal.
pub fn resample_mono(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }
    if from_rate == 0 {
        anyhow::bail!("Cannot resample from a 0 Hz source");
    }

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = to_rate as f64 / from_rate as f64;
    // ceil(n * to / from) without float rounding.
    let target_len =
        ((samples.len() as u64 * to_rate as u64).div_ceil(from_rate as u64)) as usize;

    // Chunk size is the whole signal; empty partial calls flush the delay line.
    let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, params, samples.len(), 1)
        .context("Failed to create rubato resampler")?;
    let delay = resampler.output_delay();

    let mut resampled = resampler
        .process(&[samples], None)
        .context("Rubato resampling failed")?
        .pop()
        .unwrap_or_default();

    while resampled.len() < delay + target_len {
        let tail = resampler
            .process_partial(None::<&[Vec<f32>]>, None)
            .context("Rubato flush failed")?
            .pop()
            .unwrap_or_default();
        if tail.is_empty() {
            break;
        }
        resampled.extend_from_slice(&tail);
    }

    resampled.drain(..delay.min(resampled.len()));
    resampled.resize(target_len, 0.0);

    debug!(
        "Resampled {} samples ({} Hz) -> {} samples ({} Hz), delay {}",
        samples.len(),
        from_rate,
        resampled.len(),
        to_rate,
        delay
    );
    Ok(resampled)
}

/// Decode any supported file to a mono waveform at `sample_rate`.
pub fn load_mono<P: AsRef<Path>>(path: P, sample_rate: u32) -> Result<Vec<f32>> {
    let audio = read_audio(path)?;
    let mono = downmix_to_mono(&audio.samples, audio.channels);
    resample_mono(&mono, audio.sample_rate, sample_rate)
}
