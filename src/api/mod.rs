//! High-level library API: run a whole analysis from an `AnalysisConfig`, or
//! process a single site with a custom raster source. Prefer these entry points
//! over the lower-level `core` modules when integrating etflux.
use std::path::PathBuf;

use rayon::prelude::*;
use tracing::{error, info};

use crate::core::align::align;
use crate::core::diagnostics::DiagnosticCounts;
use crate::core::params::AnalysisConfig;
use crate::core::series::DailySeriesBuilder;
use crate::error::{Error, Result};
use crate::io::flux::load_flux_series;
use crate::io::gdal::{FrameSource, GdalFrameSource};
use crate::io::sites::{Site, SiteCatalog};
use crate::io::writers::{write_comparison_csv, write_error_log};

/// Outcome of one processed site
#[derive(Debug, Clone)]
pub struct SiteReport {
    pub site_id: String,
    pub output: PathBuf,
    pub error_log: PathBuf,
    /// Number of calendar days (rows) written
    pub days: usize,
    /// Days with a usable ET value
    pub et_days: usize,
    pub counts: DiagnosticCounts,
    /// Flux table used; `None` when the flux columns were synthesized as missing
    pub flux_source: Option<PathBuf>,
}

/// A site whose output could not be produced
#[derive(Debug)]
pub struct SiteFailure {
    pub site_id: String,
    pub error: Error,
}

/// Run report, sites in request order
#[derive(Debug, Default)]
pub struct RunReport {
    pub processed: Vec<SiteReport>,
    pub failed: Vec<SiteFailure>,
}

impl RunReport {
    /// Diagnostic counts summed over all processed sites
    pub fn totals(&self) -> DiagnosticCounts {
        let mut totals = DiagnosticCounts::default();
        for site in &self.processed {
            totals.add(&site.counts);
        }
        totals
    }

    /// `Err(SitesFailed)` when any site failed.
    pub fn into_result(self) -> Result<Self> {
        if self.failed.is_empty() {
            return Ok(self);
        }
        let sites = self
            .failed
            .iter()
            .map(|f| format!("{} ({})", f.site_id, f.error))
            .collect::<Vec<_>>()
            .join("; ");
        Err(Error::SitesFailed {
            failed: self.failed.len(),
            total: self.failed.len() + self.processed.len(),
            sites,
        })
    }
}

/// Validate `config`, load the site table and resolve every requested site.
/// Unknown identifiers fail here, before any raster is touched.
pub fn resolve_sites(config: &AnalysisConfig) -> Result<Vec<Site>> {
    config.validate()?;
    let catalog = SiteCatalog::load(&config.site_table)?;
    info!(
        "Loaded {} sites from {}",
        catalog.len(),
        config.site_table.display()
    );
    Ok(catalog.select(&config.sites)?)
}

/// Build, align and persist one site's comparison table.
///
/// The diagnostic log is written as soon as the ET series is complete, so it
/// survives a flux failure for the same site.
pub fn process_site<S: FrameSource>(
    builder: &DailySeriesBuilder<S>,
    site: &Site,
    config: &AnalysisConfig,
) -> Result<SiteReport> {
    let series = builder.build(site, &config.years);
    let counts = series.diagnostics.counts();
    let error_log = write_error_log(&config.error_log_dir(), &site.id, &series.diagnostics)?;
    info!(
        "Saved {} ({} diagnostics: {} unreadable rasters, {} raster files not found, {} out of bounds, {} clipped windows)",
        error_log.display(),
        counts.total(),
        counts.open_failed,
        counts.not_found,
        counts.out_of_bounds,
        counts.clipped
    );

    let flux = load_flux_series(&config.flux, &site.id, &config.years, &config.variables)?;
    let table = align(&series, &flux);
    let output = config.output_path(&site.id);
    write_comparison_csv(&table, &output)?;

    Ok(SiteReport {
        site_id: site.id.clone(),
        output,
        error_log,
        days: table.len(),
        et_days: series.values.iter().filter(|v| v.value.is_some()).count(),
        counts,
        flux_source: flux.source,
    })
}

/// Process every site of `config` with `source` as raster reader.
/// Site failures are collected in the report; setup errors are returned.
pub fn run_analysis_with<S: FrameSource + Sync>(
    config: &AnalysisConfig,
    source: S,
) -> Result<RunReport> {
    let sites = resolve_sites(config)?;
    std::fs::create_dir_all(&config.output_dir)?;

    info!(
        "Processing {} site(s) for {} with a {} window{}",
        sites.len(),
        config.years,
        config.window,
        if config.flip { " (flipped rasters)" } else { "" }
    );

    let builder = DailySeriesBuilder::new(source, &config.et_path, config.window, config.flip);
    let run_one = |site: &Site| (site.id.clone(), process_site(&builder, site, config));
    let outcomes: Vec<(String, Result<SiteReport>)> = if config.parallel {
        sites.par_iter().map(run_one).collect()
    } else {
        sites.iter().map(run_one).collect()
    };

    let mut report = RunReport::default();
    for (site_id, outcome) in outcomes {
        match outcome {
            Ok(site) => report.processed.push(site),
            Err(e) => {
                error!("Site {} failed: {}", site_id, e);
                report.failed.push(SiteFailure { site_id, error: e });
            }
        }
    }
    Ok(report)
}

/// Process every site of `config`, reading rasters through GDAL.
pub fn run_analysis(config: &AnalysisConfig) -> Result<RunReport> {
    run_analysis_with(config, GdalFrameSource)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::GeoTransform;
    use crate::core::series::raster_path;
    use crate::io::flux::FluxSource;
    use crate::io::gdal::{RasterError, RasterFrame};
    use crate::types::{WindowSize, YearRange};
    use ndarray::Array2;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    // Every path under the prefix exists and holds a constant 4x4 frame.
    struct ConstantSource;

    impl FrameSource for ConstantSource {
        fn exists(&self, _path: &Path) -> bool {
            true
        }

        fn open(&self, _path: &Path) -> std::result::Result<RasterFrame, RasterError> {
            Ok(RasterFrame {
                data: Array2::from_elem((4, 4), 7.9),
                geotransform: GeoTransform::new([0.0, 1.0, 0.0, 4.0, 0.0, -1.0])?,
                nodata: None,
            })
        }
    }

    fn config(root: &Path, variables: &[&str]) -> AnalysisConfig {
        fs::write(
            root.join("sites.csv"),
            "SITE_ID,SITE_NAME,LOCATION_LAT,LOCATION_LONG\nUS-Aaa,A,2.5,1.5\nUS-Bbb,B,1.5,2.5\n",
        )
        .unwrap();
        fs::create_dir_all(root.join("flux")).unwrap();
        fs::write(
            root.join("flux").join("US-Aaa.csv"),
            "TIMESTAMP,LE_F_MDS\n20150101,55.5\n20150102,-9999\n",
        )
        .unwrap();
        AnalysisConfig {
            et_path: root.join("et").join("EDAY"),
            flux: FluxSource::Directory(root.join("flux")),
            site_table: root.join("sites.csv"),
            output_dir: root.join("out"),
            window: WindowSize::Buffer(0),
            flip: false,
            years: YearRange::single(2015),
            variables: variables.iter().map(|s| s.to_string()).collect(),
            sites: vec!["US-Aaa".into(), "US-Bbb".into()],
            parallel: false,
            verbose: false,
        }
    }

    #[test]
    fn runs_every_site_and_writes_outputs() {
        let dir = tempdir().unwrap();
        let config = config(dir.path(), &["LE_F_MDS"]);
        let report = run_analysis_with(&config, ConstantSource).unwrap();

        assert!(report.failed.is_empty());
        assert_eq!(report.processed.len(), 2);
        let a = &report.processed[0];
        assert_eq!(a.site_id, "US-Aaa");
        assert_eq!(a.days, 365);
        assert_eq!(a.et_days, 365);
        assert!(a.flux_source.is_some());
        assert!(report.processed[1].flux_source.is_none());

        let text = fs::read_to_string(dir.path().join("out").join("US-Aaa_0px.csv")).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Year,DOY,ET,LE_F_MDS");
        assert_eq!(lines[1], "2015,1,7,55");
        assert_eq!(lines[2], "2015,2,7,-9999");
        assert_eq!(lines[3], "2015,3,7,-9999");
        assert_eq!(lines.len(), 366);
        assert!(a.error_log.exists());
    }

    #[test]
    fn parallel_run_reports_sites_in_request_order() {
        let dir = tempdir().unwrap();
        let mut config = config(dir.path(), &["LE_F_MDS"]);
        config.parallel = true;
        let report = run_analysis_with(&config, ConstantSource).unwrap();
        let ids: Vec<&str> = report.processed.iter().map(|s| s.site_id.as_str()).collect();
        assert_eq!(ids, vec!["US-Aaa", "US-Bbb"]);
    }

    #[test]
    fn missing_variable_fails_only_that_site() {
        let dir = tempdir().unwrap();
        let config = config(dir.path(), &["GPP_NT_VUT_REF"]);
        let report = run_analysis_with(&config, ConstantSource).unwrap();

        // US-Aaa has a flux file without the column; US-Bbb has none and is synthesized.
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].site_id, "US-Aaa");
        assert!(matches!(report.failed[0].error, Error::Flux(_)));
        assert_eq!(report.processed.len(), 1);
        assert!(!dir.path().join("out").join("US-Aaa_0px.csv").exists());
        assert!(matches!(
            report.into_result(),
            Err(Error::SitesFailed { failed: 1, total: 2, .. })
        ));
    }

    #[test]
    fn unknown_site_fails_before_processing() {
        let dir = tempdir().unwrap();
        let mut config = config(dir.path(), &["LE_F_MDS"]);
        config.sites.push("XX-Nop".into());
        let err = run_analysis_with(&config, ConstantSource).unwrap_err();
        assert!(matches!(err, Error::Site(_)));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn raster_path_uses_configured_prefix() {
        let dir = tempdir().unwrap();
        let config = config(dir.path(), &["LE_F_MDS"]);
        let day = crate::types::DayKey::new(2015, 1).unwrap();
        assert!(
            raster_path(&config.et_path, day)
                .to_string_lossy()
                .ends_with("EDAY_2015001.dat")
        );
    }
}
