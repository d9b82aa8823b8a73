use anyhow::Context;
use clap::Parser;
use driver::{registry_for, run_analysis, Config, DriverError, ValidateConfig};
use hadronic::generator::ToyGenerator;
use hadronic::utils::logging;
use std::path::PathBuf;
use std::process::ExitCode;

// ------------------------------------------------------------------------------------------------
// Command Line
// ------------------------------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "hadronic-driver")]
#[command(about = "Run an analysis over simulated hadron-nucleus collisions", long_about = None)]
struct Cli {
    /// Run configuration (TOML)
    #[arg(short, long, default_value = "driver/config/run.toml")]
    config: PathBuf,

    /// Analysis name, overrides run.analysis
    #[arg(short, long)]
    analysis: Option<String>,

    /// Number of collisions, overrides run.num_collisions
    #[arg(short = 'n', long)]
    collisions: Option<usize>,

    /// Generator seed, overrides run.seed
    #[arg(long)]
    seed: Option<u64>,

    /// Output directory, overrides run.output_dir
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long, default_value = "false")]
    no_progress: bool,

    /// Tracing verbosity (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: tracing::Level,
}

// ------------------------------------------------------------------------------------------------
// Main
// ------------------------------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();
    logging::init_logging();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = e.downcast_ref::<DriverError>().map_or(1, DriverError::exit_code);
            eprintln!("ERROR: {:#}", e);
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(&cli.config)
        .map_err(DriverError::from)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    apply_overrides(&mut config, &cli);
    config.validate().map_err(DriverError::from)?;

    let mut generator = ToyGenerator::new(&config.physics.physics_case, config.run.seed).map_err(DriverError::from)?;
    let registry = registry_for(&config);

    let summary = run_analysis(&config, &mut generator, &registry, !cli.no_progress)?;
    println!(
        "{}: {} collisions, {} secondaries, histograms in {}",
        summary.analysis,
        summary.stats.collisions,
        summary.stats.secondaries,
        summary.histogram_file.display()
    );
    Ok(())
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(analysis) = &cli.analysis {
        config.run.analysis = analysis.clone();
    }
    if let Some(collisions) = cli.collisions {
        config.run.num_collisions = collisions;
    }
    if let Some(seed) = cli.seed {
        config.run.seed = seed;
    }
    if let Some(output_dir) = &cli.output_dir {
        config.run.output_dir = output_dir.clone();
    }
}
