//! Per-site record of non-fatal problems met while building the daily series.
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::types::DayKey;

/// Category of a non-fatal problem
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize)]
pub enum DiagnosticKind {
    FileNotFound,
    OpenFailed,
    OutOfBounds,
    WindowClipped,
}

/// One non-fatal problem, in the order it was met
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Diagnostic {
    FileNotFound {
        day: DayKey,
        path: PathBuf,
    },
    OpenFailed {
        day: DayKey,
        path: PathBuf,
        reason: String,
    },
    OutOfBounds {
        site_id: String,
        lat: f64,
        lon: f64,
    },
    WindowClipped {
        site_id: String,
        day: DayKey,
        rows: (usize, usize),
        cols: (usize, usize),
    },
}

impl Diagnostic {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Diagnostic::FileNotFound { .. } => DiagnosticKind::FileNotFound,
            Diagnostic::OpenFailed { .. } => DiagnosticKind::OpenFailed,
            Diagnostic::OutOfBounds { .. } => DiagnosticKind::OutOfBounds,
            Diagnostic::WindowClipped { .. } => DiagnosticKind::WindowClipped,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::FileNotFound { day, path } => {
                write!(f, "File not found for {}: {}", day, path.display())
            }
            Diagnostic::OpenFailed { day, path, reason } => write!(
                f,
                "Could not open {} for {}: {}",
                path.display(),
                day,
                reason
            ),
            Diagnostic::OutOfBounds { site_id, lat, lon } => write!(
                f,
                "Site {} at ({}, {}) is not within the bounds of the raster files",
                site_id, lat, lon
            ),
            Diagnostic::WindowClipped {
                site_id,
                day,
                rows,
                cols,
            } => write!(
                f,
                "Window for site {} was clipped at the raster edge on {}: rows {}..{}, cols {}..{}",
                site_id, day, rows.0, rows.1, cols.0, cols.1
            ),
        }
    }
}

/// Number of diagnostics per category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiagnosticCounts {
    pub not_found: usize,
    pub open_failed: usize,
    pub out_of_bounds: usize,
    pub clipped: usize,
}

impl DiagnosticCounts {
    pub fn total(&self) -> usize {
        self.not_found + self.open_failed + self.out_of_bounds + self.clipped
    }

    pub fn add(&mut self, other: &DiagnosticCounts) {
        self.not_found += other.not_found;
        self.open_failed += other.open_failed;
        self.out_of_bounds += other.out_of_bounds;
        self.clipped += other.clipped;
    }
}

/// Ordered diagnostics for one site
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind() == kind).count()
    }

    pub fn counts(&self) -> DiagnosticCounts {
        let mut counts = DiagnosticCounts::default();
        for entry in &self.entries {
            match entry.kind() {
                DiagnosticKind::FileNotFound => counts.not_found += 1,
                DiagnosticKind::OpenFailed => counts.open_failed += 1,
                DiagnosticKind::OutOfBounds => counts.out_of_bounds += 1,
                DiagnosticKind::WindowClipped => counts.clipped += 1,
            }
        }
        counts
    }
}
