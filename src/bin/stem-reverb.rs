use clap::{Args, Parser};
use rand::{rngs::StdRng, SeedableRng};
use std::{path::PathBuf, process};
use stem_reverb_augment::{
    augment_batch, discover_synthesis_dirs, set_augment_progress_callback, AugmentConfig,
    AugmentProgress, ReverbType,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stem-reverb")]
#[command(about = "Add hall reverb to synthesized stems and rebuild the mix", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    input: InputDirs,

    /// Mirror each synthesis directory under this root instead of rewriting in place
    #[arg(short, long, alias = "output_dir")]
    output_dir: Option<PathBuf>,

    /// Use this reverb for every directory instead of a random pick per directory
    #[arg(short, long)]
    reverb: Option<ReverbType>,

    /// Seed for the per-directory reverb pick
    #[arg(long)]
    seed: Option<u64>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the impulse response files
    #[arg(long)]
    ir_dir: Option<PathBuf>,

    #[arg(long)]
    sample_rate: Option<u32>,

    #[arg(short, long)]
    quiet: bool,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct InputDirs {
    /// A directory generated by the synthesis step
    #[arg(long, alias = "synthesis_dir")]
    synthesis_dir: Option<PathBuf>,

    /// A directory containing many synthesis directories
    #[arg(long, alias = "multi_synthesis_dir")]
    multi_synthesis_dir: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AugmentConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.ir_dir {
        config.ir_dir = Some(dir);
    }
    if let Some(rate) = cli.sample_rate {
        config.sample_rate = rate;
    }
    config.validate()?;

    let dirs = match (cli.input.synthesis_dir, cli.input.multi_synthesis_dir) {
        (Some(dir), None) => vec![dir],
        (None, Some(multi)) => discover_synthesis_dirs(&multi)?,
        _ => {
            return Err("exactly one of --synthesis-dir or --multi-synthesis-dir is required".into())
        }
    };

    if dirs.is_empty() {
        return Err("no synthesis directories found".into());
    }

    if !cli.quiet {
        setup_progress_callback();
    }

    info!(
        "Processing {} director{} at {} Hz, IRs from {}",
        dirs.len(),
        if dirs.len() == 1 { "y" } else { "ies" },
        config.sample_rate,
        config.ir_dir().display()
    );

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let forced = cli.reverb;

    let results = augment_batch(&dirs, cli.output_dir.as_deref(), &config, |_| {
        forced.unwrap_or_else(|| ReverbType::random(&mut rng))
    })?;

    if cli.quiet {
        for r in &results {
            println!("{}", r.mix_path.display());
        }
    } else {
        eprintln!();
        eprintln!("✅ Augmented {} synthesis dir(s)", results.len());
        for r in &results {
            eprintln!(
                "  🎛  {} [{}] -> {}",
                r.input_dir.display(),
                r.reverb,
                r.output_dir.display()
            );
        }
    }

    Ok(())
}

fn setup_progress_callback() {
    set_augment_progress_callback(|progress| match progress {
        AugmentProgress::Directory {
            index,
            total,
            dir,
            reverb,
        } => {
            eprintln!(
                "⏳ [{}/{}] {} ({} reverb)",
                index + 1,
                total,
                dir.display(),
                reverb
            );
        }
        AugmentProgress::Stem { name, done, total } => {
            eprint!("\r🔄 Stems: {}/{} ({})", done, total, name);
            if done >= total {
                eprintln!();
            }
        }
        AugmentProgress::Finished { mix_path, .. } => {
            eprintln!("💾 Mix written: {}", mix_path.display());
        }
    });
}
