use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use tracing::{debug, info};

use crate::{
    config::AugmentConfig,
    core::{
        audio::{load_mono, write_audio},
        dsp::mix_down,
        metadata::Metadata,
        reverb::ReverbBank,
    },
    error::{AugmentError, Result},
    io::progress::{emit_augment_progress, AugmentProgress},
    types::{AudioData, AugmentOptions, AugmentResult, ReverbType},
};

/// Where a directory's outputs go: `data_dir` itself, or `<root>/<basename(data_dir)>`.
pub fn resolve_output_dir(data_dir: &Path, output_root: Option<&Path>) -> Result<PathBuf> {
    let Some(root) = output_root else {
        return Ok(data_dir.to_path_buf());
    };

    let name = match data_dir.file_name() {
        Some(n) => n.to_os_string(),
        None => fs::canonicalize(data_dir)?
            .file_name()
            .map(|n| n.to_os_string())
            .ok_or_else(|| {
                anyhow::anyhow!("Cannot derive a directory name from {:?}", data_dir)
            })?,
    };

    let out = root.join(name);
    fs::create_dir_all(&out)?;
    Ok(out)
}

/// Every `*.wav` in `data_dir` except the mix, sorted by path.
pub fn list_stem_files(data_dir: &Path, mix_file: &str) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(data_dir).with_context(|| format!("Failed to list {:?}", data_dir))?;

    let mut stems = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let is_wav = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("wav"));
        if !is_wav || entry.file_name() == mix_file {
            continue;
        }
        stems.push(path);
    }
    stems.sort();
    Ok(stems)
}

/// Immediate sub-directories of `multi_dir`, sorted.
pub fn discover_synthesis_dirs(multi_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(multi_dir).with_context(|| format!("Failed to list {:?}", multi_dir))?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Reverberate every stem of one synthesis directory, rebuild its mix and
/// record the reverb in its metadata.
pub fn augment_dir(
    data_dir: &Path,
    opts: &AugmentOptions,
    config: &AugmentConfig,
    bank: &mut ReverbBank,
) -> Result<AugmentResult> {
    let mut metadata = Metadata::load(data_dir.join(&config.metadata_file))?;

    let stem_files = list_stem_files(data_dir, &config.mix_file)?;
    if stem_files.is_empty() {
        return Err(AugmentError::NoStems {
            dir: data_dir.display().to_string(),
        });
    }

    let reverb = bank.get(opts.reverb)?;
    let sr = config.sample_rate;

    // Inputs are all present; only now create the mirror directory.
    let output_dir = resolve_output_dir(data_dir, opts.output_dir.as_deref())?;

    info!(
        "Augmenting {:?} with {} reverb ({} stems) -> {:?}",
        data_dir,
        opts.reverb,
        stem_files.len(),
        output_dir
    );

    let mut processed: Vec<Vec<f32>> = Vec::with_capacity(stem_files.len());
    let mut stem_paths = Vec::with_capacity(stem_files.len());

    for (i, stem_file) in stem_files.iter().enumerate() {
        let file_name = stem_file
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("Stem path without a file name: {:?}", stem_file))?;

        let dry = load_mono(stem_file, sr)?;
        let wet = reverb.apply(&dry, sr)?;

        let out_path = output_dir.join(file_name);
        let audio = AudioData::mono(wet, sr);
        write_audio(&out_path, &audio, config.sample_format)?;
        debug!("Wrote {:?} ({} samples)", out_path, audio.samples.len());

        emit_augment_progress(AugmentProgress::Stem {
            name: file_name.to_string_lossy().into_owned(),
            done: i + 1,
            total: stem_files.len(),
        });

        processed.push(audio.samples);
        stem_paths.push(out_path);
    }

    let mix: Vec<f32> = mix_down(&processed, config.alignment)
        .into_iter()
        .map(|x| x as f32)
        .collect();
    let mix_len = mix.len();
    let mix_path = output_dir.join(&config.mix_file);
    write_audio(&mix_path, &AudioData::mono(mix, sr), config.sample_format)?;

    metadata.record_augmentation(&config.metadata_key, opts.reverb);
    let metadata_path = output_dir.join(&config.metadata_file);
    metadata.save(&metadata_path)?;

    emit_augment_progress(AugmentProgress::Finished {
        dir: data_dir.to_path_buf(),
        mix_path: mix_path.clone(),
    });

    Ok(AugmentResult {
        input_dir: data_dir.to_path_buf(),
        output_dir,
        reverb: opts.reverb,
        stem_paths,
        mix_path,
        metadata_path,
        mix_len,
    })
}

/// Run [`augment_dir`] over `dirs` with one shared [`ReverbBank`].
///
/// `choose` is called exactly once per directory, before it is processed, and
/// its pick is used for every stem of that directory.
pub fn augment_batch<F>(
    dirs: &[PathBuf],
    output_root: Option<&Path>,
    config: &AugmentConfig,
    mut choose: F,
) -> Result<Vec<AugmentResult>>
where
    F: FnMut(&Path) -> ReverbType,
{
    let mut bank = ReverbBank::new(config);
    let mut results = Vec::with_capacity(dirs.len());

    for (index, dir) in dirs.iter().enumerate() {
        let reverb = choose(dir);
        emit_augment_progress(AugmentProgress::Directory {
            index,
            total: dirs.len(),
            dir: dir.clone(),
            reverb,
        });

        let opts = AugmentOptions {
            output_dir: output_root.map(Path::to_path_buf),
            reverb,
        };
        results.push(augment_dir(dir, &opts, config, &mut bank)?);
    }

    Ok(results)
}
