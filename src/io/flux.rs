//! Flux tower daily tables: locating a site's file and re-indexing the
//! requested variables by sequential day so they line up with the ET series.
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::types::{MISSING_SENTINEL, YearRange};

/// Name of the `YYYYMMDD` date column
pub const TIMESTAMP_COLUMN: &str = "TIMESTAMP";

/// Errors encountered when reading flux tower data
#[derive(Debug, Error)]
pub enum FluxError {
    #[error("Failed to read flux file {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Invalid glob pattern {pattern}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("Flux file {path} has no column(s): {columns}")]
    MissingColumns { path: PathBuf, columns: String },
    #[error("Flux file {path}, line {line}: cannot parse {column} value {value:?}")]
    Parse {
        path: PathBuf,
        line: u64,
        column: String,
        value: String,
    },
}

/// Where a site's flux table lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FluxSource {
    /// One fixed file used for every site
    File(PathBuf),
    /// Glob pattern; `{site}` is replaced by the site ID and the first match (sorted) is used
    Glob(String),
    /// Directory containing `<SITE_ID>.csv`
    Directory(PathBuf),
}

impl FluxSource {
    /// Path of the flux table for `site_id`, `None` when nothing matches.
    pub fn resolve(&self, site_id: &str) -> Result<Option<PathBuf>, FluxError> {
        match self {
            FluxSource::File(path) => Ok(path.is_file().then(|| path.clone())),
            FluxSource::Directory(dir) => {
                let path = dir.join(format!("{}.csv", site_id));
                Ok(path.is_file().then_some(path))
            }
            FluxSource::Glob(pattern) => {
                let pattern = pattern.replace("{site}", site_id);
                let paths = glob::glob(&pattern).map_err(|source| FluxError::Pattern {
                    pattern: pattern.clone(),
                    source,
                })?;
                let mut matches: Vec<PathBuf> = paths.filter_map(|p| p.ok()).collect();
                matches.sort();
                Ok(matches.into_iter().find(|p| p.is_file()))
            }
        }
    }
}

/// One row of the re-indexed flux table
#[derive(Debug, Clone, PartialEq)]
pub struct FluxRecord {
    /// Sequential day index starting at 1
    pub index: usize,
    /// Source `YYYYMMDD` date; `None` for synthesized rows
    pub timestamp: Option<u32>,
    /// One value per requested variable, in request order
    pub values: Vec<Option<f64>>,
}

/// Requested variables over the requested years, indexed by sequential day
#[derive(Debug, Clone, PartialEq)]
pub struct FluxSeries {
    pub variables: Vec<String>,
    pub records: Vec<FluxRecord>,
    /// File the data came from; `None` when the series was synthesized
    pub source: Option<PathBuf>,
}

impl FluxSeries {
    /// All-missing series with one row per calendar day of `years`.
    pub fn missing(variables: &[String], years: &YearRange) -> Self {
        let records = (1..=years.total_days())
            .map(|index| FluxRecord {
                index,
                timestamp: None,
                values: vec![None; variables.len()],
            })
            .collect();
        Self {
            variables: variables.to_vec(),
            records,
            source: None,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Value of variable `var` at zero-based position `pos`; missing past the end.
    pub fn value_at(&self, pos: usize, var: usize) -> Option<f64> {
        self.records
            .get(pos)
            .and_then(|r| r.values.get(var).copied().flatten())
    }
}

/// Load `variables` for `site_id`, synthesizing an all-missing series when the
/// site has no flux file.
pub fn load_flux_series(
    source: &FluxSource,
    site_id: &str,
    years: &YearRange,
    variables: &[String],
) -> Result<FluxSeries, FluxError> {
    match source.resolve(site_id)? {
        Some(path) => {
            debug!("Found flux data file for {}: {}", site_id, path.display());
            read_flux_file(&path, years, variables)
        }
        None => {
            warn!(
                "No flux data file found for site {} ({:?}); using an all-missing series",
                site_id, source
            );
            Ok(FluxSeries::missing(variables, years))
        }
    }
}

fn parse_value(raw: &str) -> Option<Option<f64>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(None);
    }
    let value = raw.parse::<f64>().ok()?;
    if value.is_nan() || value == MISSING_SENTINEL as f64 {
        Some(None)
    } else {
        Some(Some(value))
    }
}

/// Read the rows of `path` dated within `years`, keeping only `variables`.
pub fn read_flux_file(
    path: &Path,
    years: &YearRange,
    variables: &[String],
) -> Result<FluxSeries, FluxError> {
    let csv_err = |source: csv::Error| FluxError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_path(path)
        .map_err(csv_err)?;

    let headers = rdr.headers().map_err(csv_err)?.clone();
    let column = |name: &str| headers.iter().position(|h| h == name);

    let mut missing = Vec::new();
    let ts_idx = column(TIMESTAMP_COLUMN);
    if ts_idx.is_none() {
        missing.push(TIMESTAMP_COLUMN.to_string());
    }
    let var_idx: Vec<Option<usize>> = variables.iter().map(|v| column(v.as_str())).collect();
    missing.extend(
        variables
            .iter()
            .zip(&var_idx)
            .filter(|(_, idx)| idx.is_none())
            .map(|(v, _)| v.clone()),
    );
    let (Some(ts_idx), true) = (ts_idx, missing.is_empty()) else {
        return Err(FluxError::MissingColumns {
            path: path.to_path_buf(),
            columns: missing.join(", "),
        });
    };
    let var_idx: Vec<usize> = var_idx.into_iter().flatten().collect();

    let (first, last) = years.timestamp_bounds();
    let mut records = Vec::new();
    for row in rdr.records() {
        let record = row.map_err(csv_err)?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let parse_err = |column: &str, value: &str| FluxError::Parse {
            path: path.to_path_buf(),
            line,
            column: column.to_string(),
            value: value.to_string(),
        };

        let raw_ts = record.get(ts_idx).unwrap_or("");
        let timestamp: u32 = raw_ts
            .trim()
            .parse()
            .map_err(|_| parse_err(TIMESTAMP_COLUMN, raw_ts))?;
        if timestamp < first || timestamp > last {
            continue;
        }

        let mut values = Vec::with_capacity(var_idx.len());
        for (name, &idx) in variables.iter().zip(&var_idx) {
            let raw = record.get(idx).unwrap_or("");
            values.push(parse_value(raw).ok_or_else(|| parse_err(name.as_str(), raw))?);
        }
        records.push(FluxRecord {
            index: records.len() + 1,
            timestamp: Some(timestamp),
            values,
        });
    }

    debug!(
        "Read {} flux rows for {} from {}",
        records.len(),
        years,
        path.display()
    );

    Ok(FluxSeries {
        variables: variables.to_vec(),
        records,
        source: Some(path.to_path_buf()),
    })
}
