//! Mapping between geographic coordinates and raster pixel indices.
//!
//! Rasters are north-up: latitude decreases with increasing row, so the
//! geotransform's pixel height is negative while its pixel width is positive.
//! Both axes therefore use the same floor-division formula.
use serde::{Deserialize, Serialize};

use crate::io::gdal::RasterError;

/// Affine geotransform in GDAL order:
/// `[origin_lon, pixel_width, rot_x, origin_lat, rot_y, pixel_height]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    coeffs: [f64; 6],
}

impl GeoTransform {
    /// Validate raw coefficients: pixel width must be positive and pixel height negative.
    pub fn new(coeffs: [f64; 6]) -> Result<Self, RasterError> {
        if !(coeffs[1] > 0.0) || !(coeffs[5] < 0.0) {
            return Err(RasterError::InvalidGeoTransform(coeffs));
        }
        Ok(Self { coeffs })
    }

    pub fn origin_lon(&self) -> f64 {
        self.coeffs[0]
    }

    pub fn pixel_width(&self) -> f64 {
        self.coeffs[1]
    }

    pub fn origin_lat(&self) -> f64 {
        self.coeffs[3]
    }

    pub fn pixel_height(&self) -> f64 {
        self.coeffs[5]
    }

    pub fn coeffs(&self) -> [f64; 6] {
        self.coeffs
    }

    /// (lat, lon) of the upper-left corner of pixel (row, col).
    pub fn corner_of(&self, row: i64, col: i64) -> (f64, f64) {
        (
            self.origin_lat() + row as f64 * self.pixel_height(),
            self.origin_lon() + col as f64 * self.pixel_width(),
        )
    }
}

/// Pixel (row, col) containing (lat, lon). No bounds checking; see [`in_extent`].
pub fn pixel_of(gt: &GeoTransform, lat: f64, lon: f64) -> (i64, i64) {
    let row = ((lat - gt.origin_lat()) / gt.pixel_height()).floor() as i64;
    let col = ((lon - gt.origin_lon()) / gt.pixel_width()).floor() as i64;
    (row, col)
}

/// Whether (lat, lon) lies strictly inside a `rows` x `cols` frame.
///
/// Points on any edge count as outside.
pub fn in_extent(gt: &GeoTransform, rows: usize, cols: usize, lat: f64, lon: f64) -> bool {
    let upper_lat = gt.origin_lat();
    let right_lon = gt.origin_lon() + cols as f64 * gt.pixel_width();
    let lower_lat = gt.origin_lat() + rows as f64 * gt.pixel_height();
    let left_lon = gt.origin_lon();

    lat < upper_lat && lon < right_lon && lat > lower_lat && lon > left_lon
}
