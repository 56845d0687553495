#![doc = r#"
etflux: site-level evapotranspiration extraction and flux tower alignment.

This crate samples a time series of daily ET rasters around flux tower
locations, averages a pixel window per day, and joins the result with the
tower's own daily observations into one integer CSV per site. It powers the
`etflux` CLI and can be embedded in your own Rust applications.

Requirements
------------
- GDAL development headers and runtime available on your system.
- Rust 2024 edition toolchain.

Inputs
------
- Daily rasters named `<prefix>_<YYYY><DDD>.dat` (ENVI with a `.hdr` companion,
  or anything GDAL opens), north-up, band 1 holding ET; -9999 is fill.
- A site table with `SITE_ID, SITE_NAME, LOCATION_LAT, LOCATION_LONG`.
- Flux tower CSVs with a `TIMESTAMP` (`YYYYMMDD`) column and the requested
  variable columns: one fixed file, a glob pattern, or `<dir>/<SITE_ID>.csv`.

Quick start
-----------
```rust,no_run
use std::path::PathBuf;
use etflux::{AnalysisConfig, FluxSource, WindowSize, YearRange, run_analysis};

fn main() -> etflux::Result<()> {
    let config = AnalysisConfig {
        et_path: PathBuf::from("/data/alexi/EDAY_CERES"),
        flux: FluxSource::Directory(PathBuf::from("/data/fluxnet")),
        site_table: PathBuf::from("Fluxnet_site_list.csv"),
        output_dir: PathBuf::from("/out"),
        window: WindowSize::Buffer(1),
        flip: false,
        years: YearRange::new(2015, 2016),
        variables: vec!["LE_F_MDS".into()],
        sites: vec!["US-Ne1".into(), "US-Var".into()],
        parallel: false,
        verbose: false,
    };

    let report = run_analysis(&config)?.into_result()?;
    for site in &report.processed {
        println!("{} -> {}", site.site_id, site.output.display());
    }
    Ok(())
}
```

Building blocks
---------------
```rust
use ndarray::array;
use etflux::core::geo::{GeoTransform, in_extent, pixel_of};
use etflux::core::window::{mean_ignoring_missing, window_around};
use etflux::io::RasterFrame;
use etflux::WindowSize;

let gt = GeoTransform::new([-100.0, 1.0, 0.0, 50.0, 0.0, -1.0]).unwrap();
assert!(in_extent(&gt, 3, 3, 48.5, -98.5));
assert_eq!(pixel_of(&gt, 48.5, -98.5), (1, 1));

let frame = RasterFrame {
    data: array![[1.0, 2.0, 3.0], [4.0, -9999.0, 6.0], [7.0, 8.0, 9.0]],
    geotransform: gt,
    nodata: None,
};
let window = window_around(&frame, 1, 1, WindowSize::Buffer(1), false);
assert_eq!(mean_ignoring_missing(&window.data), Some(5.0));
```

Error handling
--------------
Setup problems (bad configuration, unreadable site table, unknown site IDs)
are returned as `etflux::Error` before any site is processed. Per-day raster
problems never fail a run: they become diagnostics, written to
`<output>/errors/<unix-seconds>_<SITE_ID>_Errors.txt`. A flux table lacking a
requested column fails that site only; `RunReport::into_result` turns site
failures into `Error::SitesFailed`.

Useful modules
--------------
- [`api`]: high-level entry points and run reports.
- [`core`]: coordinate mapping, windows, the daily series builder, alignment.
- [`io`]: GDAL rasters, flux tables, the site table and output writers.
- [`types`]: calendar keys, year ranges, window sizes.
- [`error`]: crate-level `Error` and `Result`.
"#]

pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
pub use core::params::{AnalysisConfig, ConfigError};
pub use error::{Error, Result};
pub use types::{DayKey, MISSING_SENTINEL, WindowSize, YearRange};

pub use io::flux::{FluxSeries, FluxSource};
pub use io::gdal::{FrameSource, GdalFrameSource, RasterFrame};
pub use io::sites::{Site, SiteCatalog};

pub use api::{
    RunReport, SiteFailure, SiteReport, process_site, resolve_sites, run_analysis,
    run_analysis_with,
};
