//! Pixel windows around a site and their reduction to one daily value.
use ndarray::{Array2, s};

use crate::io::gdal::RasterFrame;
use crate::types::{MISSING_SENTINEL, WindowSize};

/// Sub-array cut from a frame. Missing cells are `NaN`.
#[derive(Debug, Clone)]
pub struct Window {
    pub data: Array2<f64>,
    /// Requested window extended past the frame and was cut down to the overlap
    pub clipped: bool,
    /// Row/col bounds actually taken from the (possibly flipped) frame, end-exclusive
    pub rows: (usize, usize),
    pub cols: (usize, usize),
}

impl Window {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// Clamp [start, start + len) to [0, limit); returns the range and whether it was cut.
fn clamp_span(start: i64, len: usize, limit: usize) -> ((usize, usize), bool) {
    let end = start + len as i64;
    let lo = start.clamp(0, limit as i64) as usize;
    let hi = end.clamp(0, limit as i64) as usize;
    let clipped = start < 0 || end > limit as i64;
    ((lo, hi.max(lo)), clipped)
}

fn is_missing(value: f64, nodata: Option<f64>) -> bool {
    value.is_nan() || value == MISSING_SENTINEL as f64 || nodata.is_some_and(|nd| value == nd)
}

/// Cut a `size` window centered on (`center_row`, `center_col`).
///
/// With `flip` the frame is mirrored vertically first, for products stored
/// bottom-up relative to their geotransform. The window starts `height / 2`
/// rows above the center (and `width / 2` columns left of it), so odd sizes are
/// centered and even sizes lean up/left. Windows crossing the frame edge are
/// clipped, never padded; a window entirely outside the frame is empty.
pub fn window_around(
    frame: &RasterFrame,
    center_row: i64,
    center_col: i64,
    size: WindowSize,
    flip: bool,
) -> Window {
    let (height, width) = size.dims();
    let (row_span, row_clipped) =
        clamp_span(center_row - (height / 2) as i64, height, frame.rows());
    let (col_span, col_clipped) =
        clamp_span(center_col - (width / 2) as i64, width, frame.cols());

    let oriented = if flip {
        frame.data.slice(s![..;-1, ..])
    } else {
        frame.data.view()
    };

    let mut data = oriented
        .slice(s![row_span.0..row_span.1, col_span.0..col_span.1])
        .to_owned();
    data.mapv_inplace(|v| if is_missing(v, frame.nodata) { f64::NAN } else { v });

    Window {
        data,
        clipped: row_clipped || col_clipped,
        rows: row_span,
        cols: col_span,
    }
}

/// Arithmetic mean of the non-missing cells, `None` when there are none.
pub fn mean_ignoring_missing(window: &Array2<f64>) -> Option<f64> {
    let (sum, count) = window
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
