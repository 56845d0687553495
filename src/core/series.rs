//! Daily ET series for one site: one value per calendar day of the requested
//! years, each the mean of a pixel window around the site.
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::core::diagnostics::{Diagnostic, Diagnostics};
use crate::core::geo::{in_extent, pixel_of};
use crate::core::window::{mean_ignoring_missing, window_around};
use crate::io::gdal::FrameSource;
use crate::io::sites::Site;
use crate::types::{DayKey, WindowSize, YearRange};

/// ET value for one day, `None` when no valid pixel was available
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyValue {
    pub day: DayKey,
    pub value: Option<f64>,
}

/// Chronological ET values for a site plus what went wrong along the way
#[derive(Debug, Clone)]
pub struct DailySeries {
    pub site_id: String,
    pub values: Vec<DailyValue>,
    pub diagnostics: Diagnostics,
}

impl DailySeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// `<prefix>_<YYYY><DDD>.dat`
pub fn raster_path(prefix: &Path, day: DayKey) -> PathBuf {
    let mut name = prefix.as_os_str().to_owned();
    name.push(format!("_{:04}{:03}.dat", day.year, day.doy));
    PathBuf::from(name)
}

// One-shot reporting flags, reset per site
#[derive(Default)]
struct ScanState {
    located: bool,
    out_of_bounds_reported: bool,
    clip_reported: bool,
}

pub struct DailySeriesBuilder<S: FrameSource> {
    source: S,
    et_path: PathBuf,
    window: WindowSize,
    flip: bool,
}

impl<S: FrameSource> DailySeriesBuilder<S> {
    pub fn new(source: S, et_path: impl Into<PathBuf>, window: WindowSize, flip: bool) -> Self {
        Self {
            source,
            et_path: et_path.into(),
            window,
            flip,
        }
    }

    /// Walk every calendar day of `years` in order and sample the site's window.
    ///
    /// Day 366 is only visited in leap years. Missing files, unreadable rasters
    /// and out-of-extent locations yield `None` and a diagnostic; none of them
    /// stop the walk.
    pub fn build(&self, site: &Site, years: &YearRange) -> DailySeries {
        info!(
            "Building daily ET series for {} ({}) over {}",
            site.id, site.name, years
        );
        let mut state = ScanState::default();
        let mut diagnostics = Diagnostics::new();
        let values: Vec<DailyValue> = years
            .day_keys()
            .map(|day| DailyValue {
                day,
                value: self.sample_day(site, day, &mut state, &mut diagnostics),
            })
            .collect();

        let counts = diagnostics.counts();
        if counts.total() > 0 {
            info!(
                "{}: {} diagnostics ({} not found, {} unreadable, {} out of bounds, {} clipped)",
                site.id,
                counts.total(),
                counts.not_found,
                counts.open_failed,
                counts.out_of_bounds,
                counts.clipped
            );
        }

        DailySeries {
            site_id: site.id.clone(),
            values,
            diagnostics,
        }
    }

    fn sample_day(
        &self,
        site: &Site,
        day: DayKey,
        state: &mut ScanState,
        diagnostics: &mut Diagnostics,
    ) -> Option<f64> {
        let path = raster_path(&self.et_path, day);
        if !self.source.exists(&path) {
            debug!("Couldn't find file {}", path.display());
            diagnostics.push(Diagnostic::FileNotFound { day, path });
            return None;
        }

        let frame = match self.source.open(&path) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Could not load {}: {}", path.display(), e);
                diagnostics.push(Diagnostic::OpenFailed {
                    day,
                    path,
                    reason: e.to_string(),
                });
                return None;
            }
        };

        let gt = &frame.geotransform;
        if !in_extent(gt, frame.rows(), frame.cols(), site.lat, site.lon) {
            if !state.out_of_bounds_reported {
                warn!(
                    "Site {} at ({}, {}) is outside the raster extent",
                    site.id, site.lat, site.lon
                );
                diagnostics.push(Diagnostic::OutOfBounds {
                    site_id: site.id.clone(),
                    lat: site.lat,
                    lon: site.lon,
                });
                state.out_of_bounds_reported = true;
            }
            return None;
        }

        let (row, col) = pixel_of(gt, site.lat, site.lon);
        let window = window_around(&frame, row, col, self.window, self.flip);

        if !state.located {
            debug!(
                "Site {} at ({}, {}) is located at row={}, col={}; window rows {}..{}, cols {}..{}",
                site.id,
                site.lat,
                site.lon,
                row,
                col,
                window.rows.0,
                window.rows.1,
                window.cols.0,
                window.cols.1
            );
            state.located = true;
        }
        if window.clipped && !state.clip_reported {
            diagnostics.push(Diagnostic::WindowClipped {
                site_id: site.id.clone(),
                day,
                rows: window.rows,
                cols: window.cols,
            });
            state.clip_reported = true;
        }

        mean_ignoring_missing(&window.data)
    }
}
