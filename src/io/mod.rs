//! I/O layer: GDAL-backed daily rasters (`gdal`), flux tower tables (`flux`),
//! the site reference table (`sites`), and `writers` for the comparison CSV
//! and per-site diagnostic logs.
pub mod gdal;
pub use gdal::{FrameSource, GdalFrameSource, RasterError, RasterFrame};

pub mod flux;
pub use flux::{FluxError, FluxSeries, FluxSource};

pub mod sites;
pub use sites::{Site, SiteCatalog, SiteError};

pub mod writers;
