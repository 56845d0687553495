use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::core::diagnostics::Diagnostics;

/// Write one diagnostic per line to `<dir>/<unix-seconds>_<site>_Errors.txt`.
pub fn write_error_log(
    dir: &Path,
    site_id: &str,
    diagnostics: &Diagnostics,
) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}_{}_Errors.txt", Utc::now().timestamp(), site_id));
    let mut file = BufWriter::new(File::create(&path)?);
    for entry in diagnostics.entries() {
        writeln!(file, "{}", entry)?;
    }
    file.flush()?;
    Ok(path)
}
