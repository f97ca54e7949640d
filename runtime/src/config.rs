// Copyright 2026 Sitemap Taxonomy Contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-stage configuration.
//!
//! Each stage entry point takes one of these structs explicitly. Defaults
//! live here; the CLI layer overrides individual fields from flags.

use crate::graph::types::Style;
use serde::Serialize;
use std::path::PathBuf;

/// Sitemap used when no `--url` is given.
pub const DEFAULT_SITEMAP_URL: &str = "https://www.sportchek.ca/sitemap.xml";
/// Newline-delimited URL handoff file written by `extract`.
pub const DEFAULT_URL_FILE: &str = "sitemap_urls.dat";
/// CSV handoff file written by `categorize`.
pub const DEFAULT_TABLE_FILE: &str = "sitemap_layers.csv";
/// Directory compressed sitemaps are downloaded into.
pub const DEFAULT_DOWNLOAD_DIR: &str = "gzip-sitemaps";
pub const DEFAULT_DEPTH: usize = 3;
/// Deepest path layer the stages accept.
pub const MAX_DEPTH: usize = 64;
pub const DEFAULT_LIMIT: usize = 50;
pub const DEFAULT_SIZE: &str = "8,5";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Parse a `--depth` value, rejecting anything beyond [`MAX_DEPTH`].
pub fn parse_depth(s: &str) -> std::result::Result<usize, String> {
    let depth: usize = s
        .trim()
        .parse()
        .map_err(|e| format!("'{s}' is not a valid depth: {e}"))?;
    if depth > MAX_DEPTH {
        return Err(format!("depth {depth} exceeds the maximum of {MAX_DEPTH}"));
    }
    Ok(depth)
}

/// Configuration for the extract stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractConfig {
    /// Root sitemap document (or sitemap index) location.
    pub sitemap_url: String,
    /// Does `sitemap_url` point to other sitemap documents?
    pub is_index: bool,
    /// Are the sitemap documents gzip-compressed?
    pub is_gzip: bool,
    /// Where the discovered URLs are written.
    pub output: PathBuf,
    /// Where compressed documents are saved before decompression.
    pub download_dir: PathBuf,
    /// Per-request timeout.
    pub timeout_ms: u64,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            sitemap_url: DEFAULT_SITEMAP_URL.to_string(),
            is_index: true,
            is_gzip: false,
            output: PathBuf::from(DEFAULT_URL_FILE),
            download_dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// Configuration for the categorize stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorizeConfig {
    /// Number of path segments beyond the host to group on.
    pub depth: usize,
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Default for CategorizeConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            input: PathBuf::from(DEFAULT_URL_FILE),
            output: PathBuf::from(DEFAULT_TABLE_FILE),
        }
    }
}

/// Configuration for the render stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderConfig {
    /// Number of layers to plot beyond the host layer.
    pub depth: usize,
    /// Maximum number of child nodes drawn per parent.
    pub limit: usize,
    /// Graph title, placed as the graph label.
    pub title: String,
    pub style: Style,
    /// Graphviz canvas size, e.g. `"8,5"` or `"40"`.
    pub size: String,
    pub input: PathBuf,
    /// Output path without extension. `None` derives
    /// `<output_dir>/sitemap_graph_<depth>_layer` from the effective depth.
    pub output_stem: Option<PathBuf>,
    /// Directory for the derived output name. Empty means the working
    /// directory.
    pub output_dir: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            limit: DEFAULT_LIMIT,
            title: String::new(),
            style: Style::Light,
            size: DEFAULT_SIZE.to_string(),
            input: PathBuf::from(DEFAULT_TABLE_FILE),
            output_stem: None,
            output_dir: PathBuf::new(),
        }
    }
}

impl RenderConfig {
    /// Output stem for a graph rendered at `depth` layers.
    pub fn stem_for(&self, depth: usize) -> PathBuf {
        self.output_stem
            .clone()
            .unwrap_or_else(|| self.output_dir.join(format!("sitemap_graph_{depth}_layer")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let e = ExtractConfig::default();
        assert!(e.is_index);
        assert!(!e.is_gzip);
        assert_eq!(e.output, PathBuf::from("sitemap_urls.dat"));

        let c = CategorizeConfig::default();
        assert_eq!(c.depth, 3);
        assert_eq!(c.input, e.output);

        let r = RenderConfig::default();
        assert_eq!(r.limit, 50);
        assert_eq!(r.style, Style::Light);
        assert_eq!(r.input, c.output);
    }

    #[test]
    fn test_stem_for() {
        let mut r = RenderConfig::default();
        assert_eq!(r.stem_for(2), PathBuf::from("sitemap_graph_2_layer"));
        r.output_dir = PathBuf::from("work");
        assert_eq!(r.stem_for(2), PathBuf::from("work/sitemap_graph_2_layer"));
        r.output_stem = Some(PathBuf::from("out/graph"));
        assert_eq!(r.stem_for(2), PathBuf::from("out/graph"));
    }

    #[test]
    fn test_parse_depth_bounds() {
        assert_eq!(parse_depth("0"), Ok(0));
        assert_eq!(parse_depth("64"), Ok(MAX_DEPTH));
        assert!(parse_depth("65").is_err());
        assert!(parse_depth(&usize::MAX.to_string()).is_err());
        assert!(parse_depth("-1").is_err());
        assert!(parse_depth("three").is_err());
    }

    #[test]
    fn test_config_serializes() {
        let json = serde_json::to_value(RenderConfig::default()).unwrap();
        assert_eq!(json["style"], "light");
        assert_eq!(json["size"], "8,5");
    }
}
