//! Shared types used across etflux.
//! Includes the calendar keys (`DayKey`, `YearRange`), the window sizing
//! convention (`WindowSize`) and the persisted missing-value sentinel.
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Fill value used by the rasters and flux tables, and written for missing output cells.
pub const MISSING_SENTINEL: i64 = -9999;

/// Returns true when `year` has a February 29th.
pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

/// Number of calendar days in `year`.
pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) { 366 } else { 365 }
}

/// A calendar day addressed as (year, day-of-year).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct DayKey {
    pub year: i32,
    pub doy: u32,
}

impl DayKey {
    /// Build a key, rejecting day 366 on non-leap years and anything outside 1..=366.
    pub fn new(year: i32, doy: u32) -> Option<Self> {
        if doy >= 1 && doy <= days_in_year(year) {
            Some(Self { year, doy })
        } else {
            None
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_yo_opt(self.year, self.doy)
    }

    /// Compact `YYYYMMDD` integer, the timestamp format of the flux tables.
    pub fn timestamp(&self) -> Option<u32> {
        self.date()
            .map(|d| d.year() as u32 * 10_000 + d.month() * 100 + d.day())
    }
}

impl std::fmt::Display for DayKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}{:03}", self.year, self.doy)
    }
}

/// Inclusive range of calendar years.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn single(year: i32) -> Self {
        Self {
            start: year,
            end: year,
        }
    }

    pub fn years(&self) -> std::ops::RangeInclusive<i32> {
        self.start..=self.end
    }

    /// Every calendar day of the range in chronological order, leap days included.
    pub fn day_keys(&self) -> impl Iterator<Item = DayKey> {
        self.years()
            .flat_map(|year| (1..=days_in_year(year)).map(move |doy| DayKey { year, doy }))
    }

    pub fn total_days(&self) -> usize {
        self.years().map(|y| days_in_year(y) as usize).sum()
    }

    /// First and last `YYYYMMDD` timestamps covered by the range.
    pub fn timestamp_bounds(&self) -> (u32, u32) {
        (
            self.start as u32 * 10_000 + 101,
            self.end as u32 * 10_000 + 1231,
        )
    }
}

impl std::fmt::Display for YearRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Size of the pixel window averaged around a site.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowSize {
    /// Symmetric buffer of `n` pixels on each side, a (2n+1) x (2n+1) window.
    Buffer(usize),
    /// Explicit box; even sides snap toward the upper/left index.
    Box { height: usize, width: usize },
}

impl WindowSize {
    /// (height, width) in pixels.
    pub fn dims(&self) -> (usize, usize) {
        match *self {
            WindowSize::Buffer(b) => (2 * b + 1, 2 * b + 1),
            WindowSize::Box { height, width } => (height, width),
        }
    }

    /// Suffix used in output file names, e.g. `3px` or `4x6px`.
    pub fn label(&self) -> String {
        match *self {
            WindowSize::Buffer(b) => format!("{}px", b),
            WindowSize::Box { height, width } => format!("{}x{}px", height, width),
        }
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        WindowSize::Buffer(0)
    }
}

impl std::fmt::Display for WindowSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (h, w) = self.dims();
        write!(f, "{}x{}", h, w)
    }
}
