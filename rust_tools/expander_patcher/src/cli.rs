use crate::batch::{BatchConfig, DEFAULT_OUTPUT_PREFIX, DEFAULT_PATTERN};
use crate::gtiff::Compression;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "expander-patcher")]
#[command(
    about = "Label patcher regions of categorical rasters as expander or patcher by adjacency"
)]
#[command(version)]
pub struct Args {
    /// Folder holding the input rasters
    #[arg(short, long, value_name = "DIR", default_value = "raster_process/")]
    pub input_dir: PathBuf,

    /// Folder for classified rasters (created if missing)
    #[arg(short, long, value_name = "DIR", default_value = "output_raster/")]
    pub output_dir: PathBuf,

    /// File name pattern matched inside the input folder
    #[arg(short, long, value_name = "GLOB", default_value = DEFAULT_PATTERN)]
    pub pattern: String,

    /// Prefix prepended to each output file name
    #[arg(long, value_name = "STR", default_value = DEFAULT_OUTPUT_PREFIX)]
    pub prefix: String,

    /// Output compression
    #[arg(long, value_enum, default_value_t = Compression::None)]
    pub compress: Compression,

    /// Stop at the first raster that fails instead of continuing
    #[arg(long)]
    pub fail_fast: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig {
            input_dir: self.input_dir.clone(),
            output_dir: self.output_dir.clone(),
            pattern: self.pattern.clone(),
            prefix: self.prefix.clone(),
            compression: self.compress,
            fail_fast: self.fail_fast,
        }
    }
}
