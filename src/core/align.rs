//! Positional join of the ET series with the flux series.
use tracing::warn;

use crate::core::series::DailySeries;
use crate::io::flux::FluxSeries;
use crate::types::{DayKey, MISSING_SENTINEL};

/// One calendar day of the comparison table
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub day: DayKey,
    pub et: Option<f64>,
    /// Flux values in variable order
    pub values: Vec<Option<f64>>,
}

impl ComparisonRow {
    /// Persisted cells: year, doy, ET, then each variable.
    pub fn persisted(&self) -> Vec<i64> {
        let mut cells = Vec::with_capacity(3 + self.values.len());
        cells.push(self.day.year as i64);
        cells.push(self.day.doy as i64);
        cells.push(persisted_value(self.et));
        cells.extend(self.values.iter().map(|v| persisted_value(*v)));
        cells
    }
}

/// ET and flux values side by side, one row per calendar day
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonTable {
    pub site_id: String,
    pub variables: Vec<String>,
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    pub fn header(&self) -> Vec<String> {
        let mut header = vec!["Year".to_string(), "DOY".to_string(), "ET".to_string()];
        header.extend(self.variables.iter().cloned());
        header
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Missing becomes -9999; values are truncated toward zero.
pub fn persisted_value(value: Option<f64>) -> i64 {
    match value {
        Some(v) if v.is_finite() => v.trunc() as i64,
        _ => MISSING_SENTINEL,
    }
}

/// Join by position: the n-th ET day takes the n-th flux row. Both sides are
/// built with the same calendar, so positions agree unless the flux file has
/// gaps; flux rows past the ET series are dropped, and ET days past the flux
/// series get missing values.
pub fn align(et: &DailySeries, flux: &FluxSeries) -> ComparisonTable {
    if et.len() != flux.len() {
        warn!(
            "{}: ET series has {} days but flux series has {} rows; joining by position",
            et.site_id,
            et.len(),
            flux.len()
        );
    }

    let rows = et
        .values
        .iter()
        .enumerate()
        .map(|(pos, daily)| ComparisonRow {
            day: daily.day,
            et: daily.value,
            values: (0..flux.variables.len())
                .map(|var| flux.value_at(pos, var))
                .collect(),
        })
        .collect();

    ComparisonTable {
        site_id: et.site_id.clone(),
        variables: flux.variables.clone(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::diagnostics::Diagnostics;
    use crate::core::series::DailyValue;
    use crate::io::flux::FluxRecord;
    use crate::types::YearRange;

    fn et_series(years: &YearRange, f: impl Fn(DayKey) -> Option<f64>) -> DailySeries {
        DailySeries {
            site_id: "US-Tst".into(),
            values: years
                .day_keys()
                .map(|day| DailyValue { day, value: f(day) })
                .collect(),
            diagnostics: Diagnostics::new(),
        }
    }

    #[test]
    fn persisted_values_truncate_and_fill() {
        assert_eq!(persisted_value(Some(3.99)), 3);
        assert_eq!(persisted_value(Some(-3.99)), -3);
        assert_eq!(persisted_value(None), -9999);
        assert_eq!(persisted_value(Some(f64::NAN)), -9999);
    }

    #[test]
    fn joins_by_position() {
        let years = YearRange::single(2016);
        let et = et_series(&years, |d| Some(d.doy as f64 * 0.5));
        let variables = vec!["LE_F_MDS".to_string(), "H_F_MDS".to_string()];
        let flux = FluxSeries {
            variables: variables.clone(),
            records: (1..=366)
                .map(|i| FluxRecord {
                    index: i,
                    timestamp: None,
                    values: vec![Some(i as f64), if i % 2 == 0 { None } else { Some(-1.5) }],
                })
                .collect(),
            source: None,
        };

        let table = align(&et, &flux);
        assert_eq!(table.len(), 366);
        assert_eq!(table.header(), vec!["Year", "DOY", "ET", "LE_F_MDS", "H_F_MDS"]);
        assert_eq!(table.rows[0].persisted(), vec![2016, 1, 0, 1, -1]);
        assert_eq!(table.rows[1].persisted(), vec![2016, 2, 1, 2, -9999]);
        assert_eq!(table.rows[365].day, DayKey { year: 2016, doy: 366 });
    }

    #[test]
    fn short_flux_series_pads_with_missing() {
        let years = YearRange::single(2015);
        let et = et_series(&years, |_| None);
        let flux = FluxSeries {
            variables: vec!["LE_F_MDS".into()],
            records: vec![FluxRecord {
                index: 1,
                timestamp: Some(20150101),
                values: vec![Some(12.0)],
            }],
            source: None,
        };

        let table = align(&et, &flux);
        assert_eq!(table.len(), 365);
        assert_eq!(table.rows[0].persisted(), vec![2015, 1, -9999, 12]);
        assert_eq!(table.rows[1].values, vec![None]);
    }
}
