use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "etflux",
    version,
    about = "Average daily ET rasters around flux tower sites and align them with tower observations"
)]
pub struct CliArgs {
    /// JSON run configuration. When given, the options below are ignored (except --verbose)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Raster path prefix; daily files are <prefix>_<YYYY><DDD>.dat with a .hdr companion
    #[arg(long)]
    pub et_path: Option<PathBuf>,

    /// Flux tower CSV used for every site
    #[arg(long, conflicts_with_all = ["flux_glob", "flux_dir"])]
    pub flux_file: Option<PathBuf>,

    /// Glob pattern for flux tower CSVs; `{site}` is replaced by the site ID
    #[arg(long, conflicts_with = "flux_dir")]
    pub flux_glob: Option<String>,

    /// Directory of per-site flux tower CSVs named <SITE_ID>.csv
    #[arg(long)]
    pub flux_dir: Option<PathBuf>,

    /// Site reference table (SITE_ID, SITE_NAME, LOCATION_LAT, LOCATION_LONG)
    #[arg(long, default_value = "Fluxnet_site_list.csv")]
    pub site_table: PathBuf,

    /// Output directory (created if missing)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Buffer, in pixels, around the site pixel
    #[arg(short, long, default_value_t = 0, conflicts_with = "box_size")]
    pub buff: usize,

    /// Explicit window size instead of a buffer; even sides snap up/left
    #[arg(long = "box", num_args = 2, value_names = ["HEIGHT", "WIDTH"])]
    pub box_size: Option<Vec<usize>>,

    /// Flip rasters vertically before sampling (for upside-down products)
    #[arg(short, long, default_value_t = false)]
    pub flip: bool,

    /// Verbose (debug) logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Year or inclusive year range: <start_year> [<end_year>]
    #[arg(short, long, num_args = 1..=2, value_names = ["START", "END"])]
    pub years: Vec<i32>,

    /// Flux variable columns to compare against ET
    #[arg(long = "vars", alias = "variables", num_args = 1..)]
    pub variables: Vec<String>,

    /// Site IDs, or a single text file listing one site ID per line
    #[arg(short, long, num_args = 1..)]
    pub sites: Vec<String>,

    /// Process sites concurrently
    #[arg(long, default_value_t = false)]
    pub parallel: bool,
}
