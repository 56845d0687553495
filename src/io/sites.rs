//! Flux tower site reference table and site-list parsing.
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors encountered while loading or querying the site table
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse site table: {0}")]
    Csv(#[from] csv::Error),
    #[error("Unknown site ID(s), not present in the site table: {0}")]
    UnknownSites(String),
    #[error("No sites requested")]
    Empty,
}

/// A flux tower location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    #[serde(rename = "SITE_ID")]
    pub id: String,
    #[serde(rename = "SITE_NAME")]
    pub name: String,
    #[serde(rename = "LOCATION_LAT")]
    pub lat: f64,
    #[serde(rename = "LOCATION_LONG")]
    pub lon: f64,
}

/// All sites of the reference table, keyed by identifier
#[derive(Debug, Clone, Default)]
pub struct SiteCatalog {
    sites: HashMap<String, Site>,
}

impl SiteCatalog {
    /// Load a `SITE_ID,SITE_NAME,LOCATION_LAT,LOCATION_LONG` table. Extra columns are ignored.
    pub fn load(path: &Path) -> Result<Self, SiteError> {
        let text = fs::read_to_string(path).map_err(|source| SiteError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_csv(&text)
    }

    pub fn from_csv(text: &str) -> Result<Self, SiteError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());
        let mut sites = HashMap::new();
        for row in rdr.deserialize() {
            let site: Site = row?;
            sites.insert(site.id.clone(), site);
        }
        Ok(Self { sites })
    }

    pub fn get(&self, id: &str) -> Option<&Site> {
        self.sites.get(id)
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Sites for `ids`, in request order. Fails listing every identifier the table lacks.
    pub fn select(&self, ids: &[String]) -> Result<Vec<Site>, SiteError> {
        if ids.is_empty() {
            return Err(SiteError::Empty);
        }
        let unknown: Vec<&str> = ids
            .iter()
            .filter(|id| !self.sites.contains_key(id.as_str()))
            .map(String::as_str)
            .collect();
        if !unknown.is_empty() {
            return Err(SiteError::UnknownSites(unknown.join(", ")));
        }
        Ok(ids.iter().filter_map(|id| self.get(id).cloned()).collect())
    }
}

/// Site identifiers from a text file: one per line, blanks and `#` comments skipped.
pub fn read_site_list(path: &Path) -> Result<Vec<String>, SiteError> {
    let text = fs::read_to_string(path).map_err(|source| SiteError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_site_list(&text))
}

pub fn parse_site_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
