use crate::classify::{classify, ClassCounts};
use crate::crs::report_spatial_reference;
use crate::error::{ExpanderPatcherError, Result};
use crate::gtiff::{creation_options, Compression};
use crate::io::{read_input_raster, write_classified_raster};
use glob::{glob, Pattern};
use log::{debug, error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_PATTERN: &str = "*.tif";
pub const DEFAULT_OUTPUT_PREFIX: &str = "expander_patcher_";

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub pattern: String,
    pub prefix: String,
    pub compression: Compression,
    pub fail_fast: bool,
}

impl BatchConfig {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            pattern: DEFAULT_PATTERN.to_string(),
            prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            compression: Compression::None,
            fail_fast: false,
        }
    }
}

/// Outcome of a batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    pub processed: Vec<PathBuf>,
    pub failures: Vec<(PathBuf, String)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.processed.len() + self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// List files in `input_dir` matching `pattern`, sorted by path.
///
/// Only `pattern` is interpreted as a glob; `input_dir` is matched literally.
pub fn discover_rasters(input_dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let dir = input_dir
        .to_str()
        .ok_or_else(|| ExpanderPatcherError::NonUtf8Path(input_dir.to_path_buf()))?;
    let full_pattern = Path::new(&Pattern::escape(dir)).join(pattern);
    let full_pattern = full_pattern
        .to_str()
        .ok_or_else(|| ExpanderPatcherError::NonUtf8Path(full_pattern.clone()))?;
    debug!("Searching for rasters: {}", full_pattern);

    let mut rasters: Vec<PathBuf> = glob(&full_pattern)?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Skipping unreadable path: {}", e);
                None
            }
        })
        .filter(|p| p.is_file())
        .collect();
    rasters.sort();

    Ok(rasters)
}

/// `<output_dir>/<prefix><file name>`
pub fn output_path_for(input: &Path, output_dir: &Path, prefix: &str) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!("{}{}", prefix, file_name))
}

/// Read, classify and write one raster
pub fn process_raster(input: &Path, output: &Path, options: &[String]) -> Result<ClassCounts> {
    let (grid, metadata) = read_input_raster(input)?;
    report_spatial_reference(
        &input.display().to_string(),
        &metadata.projection,
        &metadata.geotransform,
    );

    let classified = classify(&grid)?;
    let counts = ClassCounts::from_grid(&classified);

    write_classified_raster(output, &classified, &metadata, options)?;
    Ok(counts)
}

/// Process every matching raster in sequence.
///
/// Failures are logged and collected unless `fail_fast` is set, in which case
/// the first error is returned. Returns `BatchFailed` if any file failed.
pub fn run_batch(config: &BatchConfig) -> Result<BatchReport> {
    fs::create_dir_all(&config.output_dir)?;

    let rasters = discover_rasters(&config.input_dir, &config.pattern)?;
    if rasters.is_empty() {
        warn!(
            "No rasters found matching {} in {}",
            config.pattern,
            config.input_dir.display()
        );
        return Ok(BatchReport::default());
    }

    info!("Found {} rasters", rasters.len());
    let options = creation_options(config.compression);
    let mut report = BatchReport::default();

    for (i, raster) in rasters.iter().enumerate() {
        info!("[{}/{}] Processing: {}", i + 1, rasters.len(), raster.display());
        let output = output_path_for(raster, &config.output_dir, &config.prefix);

        match process_raster(raster, &output, &options) {
            Ok(counts) => {
                info!(
                    "Expander: {}, patcher: {}, background: {} pixels",
                    counts.expander, counts.patcher, counts.background
                );
                report.processed.push(raster.clone());
            }
            Err(e) if config.fail_fast => {
                error!("Failed on {}: {}", raster.display(), e);
                return Err(e);
            }
            Err(e) => {
                error!("Failed on {}: {}", raster.display(), e);
                report.failures.push((raster.clone(), e.to_string()));
            }
        }
    }

    if !report.is_success() {
        for (path, message) in &report.failures {
            error!("  {}: {}", path.display(), message);
        }
        return Err(ExpanderPatcherError::BatchFailed {
            failed: report.failures.len(),
            total: report.total(),
        });
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdal::raster::Buffer;
    use gdal::DriverManager;

    fn write_raster(path: &Path, width: usize, height: usize, values: Vec<i32>) {
        let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
        let mut dataset = driver
            .create_with_band_type::<i32, _>(path, width, height, 1)
            .unwrap();
        dataset
            .set_geo_transform(&[100.0, 10.0, 0.0, 200.0, 0.0, -10.0])
            .unwrap();
        let mut band = dataset.rasterband(1).unwrap();
        let mut buffer = Buffer::new((width, height), values);
        band.write((0, 0), (width, height), &mut buffer).unwrap();
    }

    #[test]
    fn test_output_path_for() {
        let out = output_path_for(
            Path::new("raster_process/tile_01.tif"),
            Path::new("output_raster"),
            "expander_patcher_",
        );
        assert_eq!(out, PathBuf::from("output_raster/expander_patcher_tile_01.tif"));
    }

    #[test]
    fn test_discover_rasters_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.tif", "a.tif", "notes.txt"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("sub.tif")).unwrap();

        let found = discover_rasters(dir.path(), "*.tif").unwrap();
        assert_eq!(
            found,
            vec![dir.path().join("a.tif"), dir.path().join("b.tif")]
        );
    }

    #[test]
    fn test_discover_rasters_in_dir_with_glob_characters() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("tiles[2024]");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("a.tif"), b"").unwrap();

        let found = discover_rasters(&dir, "*.tif").unwrap();
        assert_eq!(found, vec![dir.join("a.tif")]);
    }

    #[test]
    fn test_empty_input_creates_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().join("nested").join("out");
        let config = BatchConfig::new(dir.path(), &output_dir);

        let report = run_batch(&config).unwrap();
        assert_eq!(report.total(), 0);
        assert!(output_dir.is_dir());
    }

    #[test]
    fn test_batch_classifies_and_collects_failures() {
        let dir = tempfile::tempdir().unwrap();
        let input_dir = dir.path().join("in");
        let output_dir = dir.path().join("out");
        fs::create_dir(&input_dir).unwrap();

        write_raster(&input_dir.join("good.tif"), 3, 3, vec![2, 2, 2, 2, 1, 2, 2, 2, 2]);
        fs::write(input_dir.join("corrupt.tif"), b"not a tiff").unwrap();

        let config = BatchConfig::new(&input_dir, &output_dir);
        match run_batch(&config) {
            Err(ExpanderPatcherError::BatchFailed { failed, total }) => {
                assert_eq!(failed, 1);
                assert_eq!(total, 2);
            }
            other => panic!("expected BatchFailed, got {:?}", other),
        }

        // The good file is still written after the corrupt one failed
        let good_output = output_dir.join("expander_patcher_good.tif");
        let (written, _) = read_input_raster(&good_output).unwrap();
        assert_eq!(
            written.iter().copied().collect::<Vec<_>>(),
            vec![1, 1, 1, 1, 0, 1, 1, 1, 1]
        );
    }

    #[test]
    fn test_fail_fast_returns_first_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.tif"), b"garbage").unwrap();

        let mut config = BatchConfig::new(dir.path(), dir.path().join("out"));
        config.fail_fast = true;
        assert!(matches!(
            run_batch(&config),
            Err(ExpanderPatcherError::Gdal(_))
        ));
    }

    #[test]
    fn test_process_raster_with_compression() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.tif");
        let output = dir.path().join("out.tif");
        write_raster(&input, 2, 2, vec![2, 0, 0, 2]);

        let counts =
            process_raster(&input, &output, &creation_options(Compression::Deflate)).unwrap();
        assert_eq!(counts.patcher, 2);
        assert_eq!(counts.background, 2);
        assert!(output.is_file());
    }
}
