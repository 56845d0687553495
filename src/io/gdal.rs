use gdal::{Dataset, errors::GdalError as GdalCrateError};
use ndarray::Array2;
use std::path::Path;
use thiserror::Error;

use crate::core::geo::GeoTransform;

/// Errors encountered when opening or reading a daily raster
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("GDAL error: {0}")]
    Gdal(#[from] GdalCrateError),
    #[error("Unsupported raster: {0}")]
    UnsupportedFormat(String),
    #[error("Dimension mismatch: expected {0}x{1}, got {2} values")]
    DimensionMismatch(usize, usize, usize),
    #[error("Geotransform {0:?} is not north-up (pixel width must be > 0, pixel height < 0)")]
    InvalidGeoTransform([f64; 6]),
}

/// One day's raster: pixel grid, georeferencing and declared no-data value.
#[derive(Debug, Clone)]
pub struct RasterFrame {
    /// Pixel values with shape (rows, cols)
    pub data: Array2<f64>,
    pub geotransform: GeoTransform,
    /// No-data value declared by the band, if any
    pub nodata: Option<f64>,
}

impl RasterFrame {
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }
}

/// Source of daily raster frames.
///
/// The series builder only asks whether a file exists and for its frame; the
/// GDAL implementation is the production one, tests substitute in-memory frames.
pub trait FrameSource {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn open(&self, path: &Path) -> Result<RasterFrame, RasterError>;
}

/// Reads band 1 of any GDAL-supported raster (ENVI `.dat`/`.hdr` pairs in practice)
#[derive(Debug, Clone, Copy, Default)]
pub struct GdalFrameSource;

impl FrameSource for GdalFrameSource {
    fn open(&self, path: &Path) -> Result<RasterFrame, RasterError> {
        let dataset = Dataset::open(path)?;
        if dataset.raster_count() == 0 {
            return Err(RasterError::UnsupportedFormat("No raster bands found".into()));
        }
        let geotransform = GeoTransform::new(dataset.geo_transform()?)?;
        let (size_x, size_y) = dataset.raster_size();

        let band = dataset.rasterband(1)?;
        let nodata = band.no_data_value();
        let window = (size_x, size_y);
        let buf = band.read_as::<f64>((0, 0), window, window, None)?;
        let data_vec = buf.data().to_vec();
        let len = data_vec.len();
        let data = Array2::from_shape_vec((size_y, size_x), data_vec)
            .map_err(|_| RasterError::DimensionMismatch(size_y, size_x, len))?;

        Ok(RasterFrame {
            data,
            geotransform,
            nodata,
        })
    }
}
