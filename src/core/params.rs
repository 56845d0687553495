use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::io::flux::FluxSource;
use crate::types::{WindowSize, YearRange};

/// Errors in a run configuration, detected before any site is processed
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Year range is inverted: {start} > {end}")]
    YearOrder { start: i32, end: i32 },
    #[error("At least one flux variable is required")]
    NoVariables,
    #[error("Flux variable {0} requested more than once")]
    DuplicateVariable(String),
    #[error("At least one site is required")]
    NoSites,
    #[error("Window must be at least one pixel in each direction, got {height}x{width}")]
    EmptyWindow { height: usize, width: usize },
}

/// Everything one analysis run needs, suitable for JSON config files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Raster path prefix; day files are `<et_path>_<YYYY><DDD>.dat`
    pub et_path: PathBuf,
    pub flux: FluxSource,
    /// Reference table with site coordinates
    pub site_table: PathBuf,
    pub output_dir: PathBuf,
    #[serde(default)]
    pub window: WindowSize,
    /// Mirror rasters vertically before sampling
    #[serde(default)]
    pub flip: bool,
    pub years: YearRange,
    pub variables: Vec<String>,
    pub sites: Vec<String>,
    /// Process sites concurrently
    #[serde(default)]
    pub parallel: bool,
    #[serde(default)]
    pub verbose: bool,
}

impl AnalysisConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let reader = BufReader::new(File::open(path)?);
        let config: AnalysisConfig = serde_json::from_reader(reader)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.years.start > self.years.end {
            return Err(ConfigError::YearOrder {
                start: self.years.start,
                end: self.years.end,
            });
        }
        if self.variables.is_empty() {
            return Err(ConfigError::NoVariables);
        }
        for (i, var) in self.variables.iter().enumerate() {
            if self.variables[..i].contains(var) {
                return Err(ConfigError::DuplicateVariable(var.clone()));
            }
        }
        if self.sites.is_empty() {
            return Err(ConfigError::NoSites);
        }
        let (height, width) = self.window.dims();
        if height == 0 || width == 0 {
            return Err(ConfigError::EmptyWindow { height, width });
        }
        Ok(())
    }

    /// Output CSV for a site, e.g. `US-Ne1_1px.csv`
    pub fn output_path(&self, site_id: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{}.csv", site_id, self.window.label()))
    }

    pub fn error_log_dir(&self) -> PathBuf {
        self.output_dir.join("errors")
    }
}
