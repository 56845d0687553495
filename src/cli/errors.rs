use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing required argument: {arg}")]
    MissingArgument { arg: String },

    #[error("--years takes a single year or <start> <end>, got {count} values")]
    InvalidYears { count: usize },

    #[error("--box takes <height> <width>, got {count} values")]
    InvalidBox { count: usize },

    #[error("Site list error: {0}")]
    Site(#[from] etflux::io::SiteError),
}
