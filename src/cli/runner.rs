use std::path::Path;

use tracing::info;
use tracing_subscriber::EnvFilter;

use etflux::io::sites::read_site_list;
use etflux::{AnalysisConfig, FluxSource, WindowSize, YearRange, run_analysis};

use super::args::CliArgs;
use super::errors::AppError;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn missing(arg: &str) -> AppError {
    AppError::MissingArgument {
        arg: arg.to_string(),
    }
}

/// A lone `--sites` value naming an existing file is read as a site list.
fn site_ids(sites: Vec<String>) -> Result<Vec<String>, AppError> {
    if let [single] = sites.as_slice() {
        let path = Path::new(single);
        if path.is_file() {
            return Ok(read_site_list(path)?);
        }
    }
    Ok(sites)
}

fn config_from_args(args: CliArgs) -> Result<AnalysisConfig, AppError> {
    let et_path = args.et_path.ok_or_else(|| missing("--et-path"))?;
    let output_dir = args.output_dir.ok_or_else(|| missing("--output-dir"))?;

    let flux = match (args.flux_file, args.flux_glob, args.flux_dir) {
        (Some(file), _, _) => FluxSource::File(file),
        (_, Some(pattern), _) => FluxSource::Glob(pattern),
        (_, _, Some(dir)) => FluxSource::Directory(dir),
        _ => return Err(missing("--flux-file | --flux-glob | --flux-dir")),
    };

    let years = match args.years.as_slice() {
        [year] => YearRange::single(*year),
        [start, end] => YearRange::new(*start, *end),
        other => return Err(AppError::InvalidYears { count: other.len() }),
    };

    let window = match args.box_size.as_deref() {
        None => WindowSize::Buffer(args.buff),
        Some([height, width]) => WindowSize::Box {
            height: *height,
            width: *width,
        },
        Some(other) => return Err(AppError::InvalidBox { count: other.len() }),
    };

    if args.variables.is_empty() {
        return Err(missing("--vars"));
    }
    if args.sites.is_empty() {
        return Err(missing("--sites"));
    }

    Ok(AnalysisConfig {
        et_path,
        flux,
        site_table: args.site_table,
        output_dir,
        window,
        flip: args.flip,
        years,
        variables: args.variables,
        sites: site_ids(args.sites)?,
        parallel: args.parallel,
        verbose: args.verbose,
    })
}

pub fn run(mut args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    let verbose = args.verbose;
    let config = match args.config.take() {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => config_from_args(args)?,
    };
    init_logging(verbose || config.verbose);
    execute(config)
}

fn execute(config: AnalysisConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!("Looking at sites {:?}", config.sites);
    info!("Using variables {:?}", config.variables);
    if config.flip {
        info!("Flipping images");
    }

    let report = run_analysis(&config)?;

    for site in &report.processed {
        info!(
            "{}: {} days, {} with ET, {} diagnostics ({} unreadable, {} not found, {} out of bounds, {} clipped) -> {}",
            site.site_id,
            site.days,
            site.et_days,
            site.counts.total(),
            site.counts.open_failed,
            site.counts.not_found,
            site.counts.out_of_bounds,
            site.counts.clipped,
            site.output.display()
        );
    }
    let totals = report.totals();
    info!("Run complete!");
    info!("Processed: {}", report.processed.len());
    info!("Failed: {}", report.failed.len());
    info!(
        "Diagnostics: {} total ({} unreadable, {} not found, {} out of bounds, {} clipped)",
        totals.total(),
        totals.open_failed,
        totals.not_found,
        totals.out_of_bounds,
        totals.clipped
    );

    report.into_result()?;
    Ok(())
}
