// Library exports for testing and reuse

pub mod batch;
pub mod classify;
pub mod cli;
pub mod crs;
pub mod error;
pub mod gtiff;
pub mod io;

// Re-export commonly used types
pub use batch::{run_batch, BatchConfig, BatchReport};
pub use classify::{classify, grid_from_rows, ClassCounts};
pub use error::{ExpanderPatcherError, Result};
pub use io::{read_input_raster, write_classified_raster, RasterMetadata};
