//! Newline-delimited URL handoff file between `extract` and `categorize`.

use crate::error::Result;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write one URL per line, in order.
pub fn write_urls(path: &Path, urls: &[String]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut out = BufWriter::new(fs::File::create(path)?);
    for url in urls {
        writeln!(out, "{url}")?;
    }
    out.flush()?;
    Ok(())
}

/// Read a URL file, dropping blank lines and surrounding whitespace.
pub fn read_urls(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
