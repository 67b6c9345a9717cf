use crate::error::{ExpanderPatcherError, Result};
use gdal::cpl::CslStringList;
use gdal::raster::{Buffer, RasterBand};
use gdal::{Dataset, DriverManager};
use log::{debug, info, warn};
use ndarray::Array2;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct RasterMetadata {
    pub width: usize,
    pub height: usize,
    pub geotransform: [f64; 6],
    pub projection: String,
    pub nodata: Option<f64>,
}

/// Pixel-space transform GDAL reports for rasters without georeferencing
pub const IDENTITY_GEOTRANSFORM: [f64; 6] = [0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

/// Stand-in for pixel values that are not whole numbers; never 1 or 2
pub const NON_CATEGORY: i32 = i32::MIN;

/// Read band 1 of a categorical raster together with its spatial metadata.
///
/// The band is read as f64 so floating-point rasters are compared by their
/// stored value: whole numbers become that integer, anything fractional,
/// NaN or out of `i32` range becomes `NON_CATEGORY`.
pub fn read_input_raster(path: &Path) -> Result<(Array2<i32>, RasterMetadata)> {
    debug!("Opening input raster: {}", path.display());
    let dataset = Dataset::open(path)?;
    let metadata = extract_metadata(&dataset)?;

    let rasterband: RasterBand = dataset.rasterband(1)?;
    let size = (metadata.width, metadata.height);
    let buffer = rasterband.read_as::<f64>((0, 0), size, size, None)?;
    let data_vec: Vec<i32> = buffer.into_iter().map(to_category).collect();
    let data = Array2::from_shape_vec((metadata.height, metadata.width), data_vec)?;

    Ok((data, metadata))
}

/// Map a raw pixel value onto an integer category without rounding
fn to_category(value: f64) -> i32 {
    if value.fract() == 0.0 && value >= i32::MIN as f64 && value <= i32::MAX as f64 {
        value as i32
    } else {
        NON_CATEGORY
    }
}

/// Pull dimensions, geotransform and projection from an open dataset
pub fn extract_metadata(dataset: &Dataset) -> Result<RasterMetadata> {
    let rasterband: RasterBand = dataset.rasterband(1)?;

    let width = rasterband.x_size() as usize;
    let height = rasterband.y_size() as usize;

    if width == 0 || height == 0 {
        return Err(ExpanderPatcherError::InvalidDimensions(width, height));
    }

    let geotransform = match dataset.geo_transform() {
        Ok(gt) => gt,
        Err(e) => {
            warn!("No geotransform ({}), using pixel coordinates", e);
            IDENTITY_GEOTRANSFORM
        }
    };

    let metadata = RasterMetadata {
        width,
        height,
        geotransform,
        projection: dataset.projection(),
        nodata: rasterband.no_data_value(),
    };

    debug!("Raster dimensions: {}x{}", width, height);
    debug!("Geotransform: {:?}", metadata.geotransform);
    if let Some(nd) = metadata.nodata {
        debug!("Input nodata value: {} (not carried to output)", nd);
    }

    Ok(metadata)
}

/// Write a single-band u8 GeoTIFF with the input's geotransform and projection
pub fn write_classified_raster(
    path: &Path,
    grid: &Array2<u8>,
    metadata: &RasterMetadata,
    options: &[String],
) -> Result<()> {
    let (rows, cols) = grid.dim();
    if rows != metadata.height || cols != metadata.width {
        return Err(ExpanderPatcherError::ShapeMismatch {
            rows,
            cols,
            width: metadata.width,
            height: metadata.height,
        });
    }

    let mut dataset = create_output_dataset(path, metadata, options)?;

    dataset.set_geo_transform(&metadata.geotransform)?;
    if !metadata.projection.is_empty() {
        dataset.set_projection(&metadata.projection)?;
    }

    let mut raster_band = dataset.rasterband(1)?;

    // Row-major iteration regardless of memory layout
    let data: Vec<u8> = grid.iter().copied().collect();
    let mut buffer = Buffer::new((metadata.width, metadata.height), data);
    raster_band.write((0, 0), (metadata.width, metadata.height), &mut buffer)?;

    info!("Wrote {}", path.display());
    Ok(())
}

/// Create a one-band u8 GTiff dataset, applying creation options if any
fn create_output_dataset(
    path: &Path,
    metadata: &RasterMetadata,
    options: &[String],
) -> Result<Dataset> {
    debug!("Creating output dataset: {}", path.display());

    let driver = DriverManager::get_driver_by_name("GTiff")?;

    let dataset = if options.is_empty() {
        driver.create_with_band_type::<u8, _>(path, metadata.width, metadata.height, 1)?
    } else {
        let mut gdal_options = CslStringList::new();
        for opt in options {
            gdal_options.add_string(opt)?;
        }

        driver.create_with_band_type_with_options::<u8, _>(
            path,
            metadata.width,
            metadata.height,
            1,
            &gdal_options,
        )?
    };

    Ok(dataset)
}
