use clap::Parser;
use env_logger::Env;
use log::info;

use expander_patcher::cli::Args;
use expander_patcher::{run_batch, Result};

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logger
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    info!("=== Expander / Patcher Classifier ===");

    let config = args.batch_config();
    info!("Input folder: {}", config.input_dir.display());
    info!("Output folder: {}", config.output_dir.display());

    let report = run_batch(&config)?;

    info!("=== Done! {} rasters classified ===", report.processed.len());
    Ok(())
}
