use std::path::Path;

use csv::WriterBuilder;
use tempfile::NamedTempFile;
use tracing::info;

use crate::core::align::ComparisonTable;
use crate::error::{Error, Result};

/// Write the comparison table as CSV (`Year,DOY,ET,<vars>...`, integers, -9999 for missing).
///
/// Rows go to a temporary file next to `output` which is renamed into place
/// once complete.
pub fn write_comparison_csv(table: &ComparisonTable, output: &Path) -> Result<()> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = WriterBuilder::new().from_writer(tmp.as_file());
        writer.write_record(table.header())?;
        for row in &table.rows {
            writer.write_record(row.persisted().iter().map(|v| v.to_string()))?;
        }
        writer.flush()?;
    }
    tmp.persist(output).map_err(|e| Error::Io(e.error))?;

    info!(
        "Saved {} rows for {} to {}",
        table.len(),
        table.site_id,
        output.display()
    );
    Ok(())
}
