use std::fs;
use std::path::{Path, PathBuf};

use gdal::DriverManager;
use gdal::raster::Buffer;
use tempfile::{TempDir, tempdir};

use etflux::{AnalysisConfig, FluxSource, WindowSize, YearRange, run_analysis};

const GT: [f64; 6] = [-100.0, 1.0, 0.0, 50.0, 0.0, -1.0];

// 3x3 grid, centre pixel (row 1, col 1) covers lat 48..49, lon -99..-98.
const CENTRE: [f64; 9] = [1.0, 2.0, 3.0, 4.0, 42.0, 6.0, 7.0, 8.0, 9.0];

// GDAL opens by content, so a GeoTIFF behind the `.dat` name reads like the
// ENVI product.
fn write_day(path: &Path, values: &[f64]) {
    let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
    let mut ds = driver
        .create_with_band_type::<f64, _>(path, 3, 3, 1)
        .unwrap();
    ds.set_geo_transform(&GT).unwrap();
    let mut buf = Buffer::new((3, 3), values.to_vec());
    let mut band = ds.rasterband(1).unwrap();
    band.write((0, 0), (3, 3), &mut buf).unwrap();
}

fn day_file(prefix: &Path, year: i32, doy: u32) -> PathBuf {
    let mut name = prefix.as_os_str().to_owned();
    name.push(format!("_{:04}{:03}.dat", year, doy));
    PathBuf::from(name)
}

struct Fixture {
    dir: TempDir,
    prefix: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("et")).unwrap();
        fs::write(
            dir.path().join("sites.csv"),
            "SITE_ID,SITE_NAME,LOCATION_LAT,LOCATION_LONG\n\
             US-Ne1,Mead irrigated,48.5,-98.5\n\
             US-Far,Far away,10.0,10.0\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("flux.csv"),
            "TIMESTAMP,LE_F_MDS\n20150101,12.7\n20150102,-9999\n20150103,\n",
        )
        .unwrap();
        let prefix = dir.path().join("et").join("EDAY_CERES");
        Self { dir, prefix }
    }

    fn write_year(&self, year: i32, days: u32, skip: &[u32]) {
        for doy in (1..=days).filter(|d| !skip.contains(d)) {
            write_day(&day_file(&self.prefix, year, doy), &CENTRE);
        }
    }

    fn config(&self, site: &str, years: YearRange, window: WindowSize) -> AnalysisConfig {
        AnalysisConfig {
            et_path: self.prefix.clone(),
            flux: FluxSource::File(self.dir.path().join("flux.csv")),
            site_table: self.dir.path().join("sites.csv"),
            output_dir: self.dir.path().join("out"),
            window,
            flip: false,
            years,
            variables: vec!["LE_F_MDS".into()],
            sites: vec![site.into()],
            parallel: false,
            verbose: false,
        }
    }

    fn output_lines(&self, name: &str) -> Vec<String> {
        fs::read_to_string(self.dir.path().join("out").join(name))
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn error_log_lines(&self) -> Vec<String> {
        let entries: Vec<_> = fs::read_dir(self.dir.path().join("out").join("errors"))
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(entries.len(), 1);
        fs::read_to_string(&entries[0])
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

#[test]
fn single_pixel_over_a_full_year() {
    let fx = Fixture::new();
    fx.write_year(2015, 365, &[]);
    let config = fx.config("US-Ne1", YearRange::single(2015), WindowSize::Buffer(0));

    let report = run_analysis(&config).unwrap().into_result().unwrap();
    assert_eq!(report.processed[0].days, 365);
    assert_eq!(report.processed[0].counts.total(), 0);

    let lines = fx.output_lines("US-Ne1_0px.csv");
    assert_eq!(lines.len(), 366);
    assert_eq!(lines[0], "Year,DOY,ET,LE_F_MDS");
    assert_eq!(lines[1], "2015,1,42,12");
    assert_eq!(lines[2], "2015,2,42,-9999");
    assert_eq!(lines[3], "2015,3,42,-9999");
    assert_eq!(lines[365], "2015,365,42,-9999");
    assert!(fx.error_log_lines().is_empty());
}

#[test]
fn buffer_averages_the_full_window() {
    let fx = Fixture::new();
    fx.write_year(2015, 365, &[]);
    let config = fx.config("US-Ne1", YearRange::single(2015), WindowSize::Buffer(1));

    run_analysis(&config).unwrap().into_result().unwrap();
    // (1+2+3+4+42+6+7+8+9) / 9 = 9.11 -> 9
    let lines = fx.output_lines("US-Ne1_1px.csv");
    assert_eq!(lines[1], "2015,1,9,12");
}

#[test]
fn missing_day_is_logged_once() {
    let fx = Fixture::new();
    fx.write_year(2015, 365, &[45]);
    let config = fx.config("US-Ne1", YearRange::single(2015), WindowSize::Buffer(0));

    run_analysis(&config).unwrap().into_result().unwrap();
    let lines = fx.output_lines("US-Ne1_0px.csv");
    assert_eq!(lines[45], "2015,45,-9999,-9999");
    assert_eq!(lines[46], "2015,46,42,-9999");

    let log = fx.error_log_lines();
    assert_eq!(log.len(), 1);
    assert!(log[0].starts_with("File not found for 2015045"));
}

#[test]
fn site_outside_extent_yields_sentinels() {
    let fx = Fixture::new();
    fx.write_year(2015, 365, &[]);
    let config = fx.config("US-Far", YearRange::single(2015), WindowSize::Buffer(0));

    let report = run_analysis(&config).unwrap().into_result().unwrap();
    assert_eq!(report.processed[0].et_days, 0);
    assert_eq!(report.processed[0].counts.out_of_bounds, 1);

    let lines = fx.output_lines("US-Far_0px.csv");
    assert_eq!(lines.len(), 366);
    assert!(
        lines[1..]
            .iter()
            .all(|l| l.split(',').nth(2) == Some("-9999"))
    );
    assert_eq!(fx.error_log_lines().len(), 1);
}

#[test]
fn two_years_follow_the_calendar() {
    let fx = Fixture::new();
    fx.write_year(2015, 366, &[]);
    fx.write_year(2016, 366, &[]);
    let config = fx.config("US-Ne1", YearRange::new(2015, 2016), WindowSize::Buffer(0));

    let report = run_analysis(&config).unwrap().into_result().unwrap();
    assert_eq!(report.processed[0].days, 731);

    let lines = fx.output_lines("US-Ne1_0px.csv");
    assert_eq!(lines.len(), 732);
    assert!(!lines.iter().any(|l| l.starts_with("2015,366,")));
    assert_eq!(lines[366], "2016,1,42,-9999");
    assert_eq!(lines[731], "2016,366,42,-9999");
}

#[test]
fn corrupt_raster_is_reported_as_unreadable() {
    let fx = Fixture::new();
    fx.write_year(2015, 365, &[10]);
    fs::write(day_file(&fx.prefix, 2015, 10), b"not a raster").unwrap();
    let config = fx.config("US-Ne1", YearRange::single(2015), WindowSize::Buffer(0));

    let report = run_analysis(&config).unwrap().into_result().unwrap();
    assert_eq!(report.processed[0].counts.open_failed, 1);
    let lines = fx.output_lines("US-Ne1_0px.csv");
    assert_eq!(lines[10], "2015,10,-9999,-9999");
}
