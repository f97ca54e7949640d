// Copyright 2026 Sitemap Taxonomy Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy shared by the extract, categorize and render stages.
//!
//! Per-child failures in index mode are absorbed by the extractor and
//! reported as warnings; everything that reaches a caller through this type
//! concerns the top-level input of a stage and is fatal for that stage.

use std::path::PathBuf;

/// All errors that can occur while building a sitemap taxonomy.
#[derive(thiserror::Error, Debug)]
pub enum TaxonomyError {
    #[error("Fetch error for {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Parse error in {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    #[error("Unsupported style '{0}' (expected \"light\" or \"dark\")")]
    UnsupportedStyle(String),

    #[error("Decompression failed for {path}: {message}")]
    Decompress { path: PathBuf, message: String },

    #[error("Malformed table {path}: {message}")]
    Table { path: PathBuf, message: String },

    #[error("Graph rendering failed: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TaxonomyError {
    pub fn fetch(url: &str, message: impl ToString) -> Self {
        Self::Fetch {
            url: url.to_string(),
            message: message.to_string(),
        }
    }

    pub fn parse(source_name: &str, message: impl ToString) -> Self {
        Self::Parse {
            source_name: source_name.to_string(),
            message: message.to_string(),
        }
    }

    pub fn table(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Table {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, TaxonomyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let e = TaxonomyError::fetch("https://example.com/a.xml", "HTTP 404");
        assert_eq!(
            e.to_string(),
            "Fetch error for https://example.com/a.xml: HTTP 404"
        );

        let e = TaxonomyError::UnsupportedStyle("neon".into());
        assert!(e.to_string().contains("neon"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let e: TaxonomyError = io.into();
        assert!(matches!(e, TaxonomyError::Io(_)));
    }
}
