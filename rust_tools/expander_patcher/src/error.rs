use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExpanderPatcherError {
    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Array shape error: {0}")]
    ShapeError(#[from] ndarray::ShapeError),

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Invalid input grid: {0}")]
    InvalidInput(String),

    #[error("Input raster has invalid dimensions: {0}x{1}")]
    InvalidDimensions(usize, usize),

    #[error("Grid shape {rows}x{cols} does not match raster size {width}x{height}")]
    ShapeMismatch {
        rows: usize,
        cols: usize,
        width: usize,
        height: usize,
    },

    #[error("Path is not valid UTF-8: {0}")]
    NonUtf8Path(std::path::PathBuf),

    #[error("{failed} of {total} rasters failed")]
    BatchFailed { failed: usize, total: usize },
}

pub type Result<T> = std::result::Result<T, ExpanderPatcherError>;
