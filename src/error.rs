//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Wraps the configuration, site table and flux errors, and the I/O and CSV
//! failures of writing outputs. Per-day raster problems never surface here;
//! they become diagnostics.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::core::params::ConfigError),

    #[error("Site table error: {0}")]
    Site(#[from] crate::io::SiteError),

    #[error("Flux data error: {0}")]
    Flux(#[from] crate::io::FluxError),

    #[error("{failed} of {total} site(s) failed: {sites}")]
    SitesFailed {
        failed: usize,
        total: usize,
        sites: String,
    },
}
