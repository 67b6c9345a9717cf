use crate::io::IDENTITY_GEOTRANSFORM;
use gdal::spatial_ref::SpatialRef;
use log::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrsKind {
    Projected,  // Planar coordinates (e.g. UTM)
    Geographic, // Lat/lon in degrees
    Missing,    // No projection stored in the file
    Unknown,    // Present but unparseable or neither of the above
}

/// Classify the projection WKT carried by an input raster
pub fn detect_crs_kind(projection_wkt: &str) -> CrsKind {
    if projection_wkt.trim().is_empty() {
        return CrsKind::Missing;
    }

    let spatial_ref = match SpatialRef::from_wkt(projection_wkt) {
        Ok(sr) => sr,
        Err(e) => {
            warn!("Failed to parse projection WKT: {}", e);
            return CrsKind::Unknown;
        }
    };

    if spatial_ref.is_geographic() {
        CrsKind::Geographic
    } else if spatial_ref.is_projected() {
        CrsKind::Projected
    } else {
        CrsKind::Unknown
    }
}

/// True when the geotransform maps pixels 1:1 onto the origin, i.e. the file is not georeferenced
pub fn is_identity_transform(geotransform: &[f64; 6]) -> bool {
    *geotransform == IDENTITY_GEOTRANSFORM
}

/// Log what spatial reference the output will inherit
pub fn report_spatial_reference(name: &str, projection_wkt: &str, geotransform: &[f64; 6]) {
    match detect_crs_kind(projection_wkt) {
        CrsKind::Missing => warn!("{}: no CRS stored, output will not be georeferenced", name),
        kind => info!("{}: {:?} CRS preserved in output", name, kind),
    }

    if is_identity_transform(geotransform) {
        warn!("{}: identity geotransform, pixel coordinates only", name);
    }
}
