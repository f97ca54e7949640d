//! The aggregation table and its CSV handoff format.
//!
//! Columns are `0..=depth` (host, then one column per path segment)
//! followed by `counts`. There is no index column.

use crate::config::MAX_DEPTH;
use crate::error::{Result, TaxonomyError};
use serde::Serialize;
use std::path::Path;

/// Name of the trailing count column.
pub const COUNTS_COLUMN: &str = "counts";

/// One distinct segment tuple and the number of URLs that share it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    /// `(host, seg_1, .., seg_depth)`; always `depth + 1` long.
    pub segments: Vec<String>,
    pub count: u64,
}

impl Row {
    pub fn new<S: Into<String>>(segments: impl IntoIterator<Item = S>, count: u64) -> Self {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
            count,
        }
    }
}

/// Grouped URL counts at a fixed depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregationTable {
    depth: usize,
    rows: Vec<Row>,
}

impl AggregationTable {
    /// Build a table, checking that every row has `depth + 1` segments.
    pub fn new(depth: usize, rows: Vec<Row>) -> Result<Self> {
        if depth > MAX_DEPTH {
            return Err(TaxonomyError::table(
                "<memory>",
                format!("depth {depth} exceeds the maximum of {MAX_DEPTH}"),
            ));
        }
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.segments.len() != depth + 1)
        {
            return Err(TaxonomyError::table(
                "<memory>",
                format!(
                    "row {i} has {} segments, expected {}",
                    row.segments.len(),
                    depth + 1
                ),
            ));
        }
        Ok(Self { depth, rows })
    }

    /// Rows already known to have `depth + 1` segments.
    pub(crate) fn from_parts(depth: usize, rows: Vec<Row>) -> Self {
        Self { depth, rows }
    }

    /// Number of path segments beyond the host.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of all row counts.
    pub fn total(&self) -> u64 {
        self.rows.iter().map(|r| r.count).sum()
    }

    /// Column labels: `"0"`, `"1"`, .., `"<depth>"`, `"counts"`.
    pub fn columns(&self) -> Vec<String> {
        (0..=self.depth)
            .map(|i| i.to_string())
            .chain(std::iter::once(COUNTS_COLUMN.to_string()))
            .collect()
    }

    /// Write the table as CSV with a header row.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let csv_err = |e: csv::Error| TaxonomyError::table(path, e);
        let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
        writer.write_record(self.columns()).map_err(csv_err)?;
        for row in &self.rows {
            let count = row.count.to_string();
            writer
                .write_record(row.segments.iter().map(String::as_str).chain([count.as_str()]))
                .map_err(csv_err)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Read a table written by [`write_csv`](Self::write_csv).
    ///
    /// Empty cells stay empty strings. Rows keep their file order.
    pub fn read_csv(path: &Path) -> Result<Self> {
        let csv_err = |e: csv::Error| TaxonomyError::table(path, e);
        let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;

        let headers = reader.headers().map_err(csv_err)?.clone();
        let depth = validate_headers(&headers).map_err(|m| TaxonomyError::table(path, m))?;

        let mut rows = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record.map_err(csv_err)?;
            let count_cell = record.get(depth + 1).unwrap_or_default();
            let count = count_cell.trim().parse::<u64>().map_err(|_| {
                TaxonomyError::table(
                    path,
                    format!("row {}: invalid count '{count_cell}'", line + 1),
                )
            })?;
            let segments = record.iter().take(depth + 1).map(str::to_string).collect();
            rows.push(Row { segments, count });
        }

        Ok(Self { depth, rows })
    }
}

/// Check the `0,1,..,n,counts` header and return `n`.
fn validate_headers(headers: &csv::StringRecord) -> std::result::Result<usize, String> {
    let n = headers.len();
    if n < 2 || headers.get(n - 1) != Some(COUNTS_COLUMN) {
        return Err(format!(
            "expected header '0,..,{COUNTS_COLUMN}', found '{}'",
            headers.iter().collect::<Vec<_>>().join(",")
        ));
    }
    for (i, name) in headers.iter().take(n - 1).enumerate() {
        if name != i.to_string() {
            return Err(format!("column {i} is named '{name}', expected '{i}'"));
        }
    }
    Ok(n - 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AggregationTable {
        AggregationTable::new(
            2,
            vec![
                Row::new(["a.com", "x", "y"], 2),
                Row::new(["a.com", "x", ""], 1),
                Row::new(["b.com", "", ""], 4),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_columns_and_total() {
        let t = sample();
        assert_eq!(t.columns(), vec!["0", "1", "2", "counts"]);
        assert_eq!(t.total(), 7);
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn test_new_rejects_ragged_rows() {
        let err = AggregationTable::new(1, vec![Row::new(["a.com"], 1)]).unwrap_err();
        assert!(matches!(err, TaxonomyError::Table { .. }));
    }

    #[test]
    fn test_new_rejects_oversized_depth() {
        let err = AggregationTable::new(usize::MAX, Vec::new()).unwrap_err();
        assert!(err.to_string().contains("exceeds the maximum"));
    }

    #[test]
    fn test_csv_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layers.csv");
        sample().write_csv(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "0,1,2,counts\na.com,x,y,2\na.com,x,,1\nb.com,,,4\n"
        );
        assert_eq!(AggregationTable::read_csv(&path).unwrap(), sample());
    }

    #[test]
    fn test_read_rejects_bad_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "host,path,counts\na.com,x,1\n").unwrap();
        let err = AggregationTable::read_csv(&path).unwrap_err();
        assert!(err.to_string().contains("column 0"));

        std::fs::write(&path, "0,1\na.com,x\n").unwrap();
        assert!(AggregationTable::read_csv(&path).is_err());
    }

    #[test]
    fn test_read_rejects_bad_counts_and_ragged_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "0,1,counts\na.com,x,many\n").unwrap();
        let err = AggregationTable::read_csv(&path).unwrap_err();
        assert!(err.to_string().contains("invalid count 'many'"));

        std::fs::write(&path, "0,1,counts\na.com,x,1,extra\n").unwrap();
        assert!(AggregationTable::read_csv(&path).is_err());
    }
}
