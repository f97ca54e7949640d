//! `sitemap-taxonomy extract`: collect page URLs from a sitemap.

use crate::acquisition::http_client::HttpClient;
use crate::cartography::extractor::{ChildFailure, Extractor};
use crate::cartography::sitemap::DocumentKind;
use crate::cartography::url_list;
use crate::cli::output::{self, OutputMode};
use crate::config::ExtractConfig;
use crate::graph::types::format_count;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// What an extract run produced.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractSummary {
    pub sitemap_url: String,
    pub output: PathBuf,
    pub is_index: bool,
    pub root_kind: DocumentKind,
    pub urls: usize,
    pub documents_searched: usize,
    pub skipped: Vec<String>,
    pub failed: Vec<ChildFailure>,
}

/// Run the extract stage and write the URL file.
pub async fn execute(config: &ExtractConfig, mode: OutputMode) -> Result<ExtractSummary> {
    let client = Arc::new(HttpClient::new(config.timeout_ms));
    let extractor = Extractor::new(client).with_progress(mode.progress_bar(0));

    let report = extractor
        .extract(config)
        .await
        .with_context(|| format!("failed to extract URLs from {}", config.sitemap_url))?;

    url_list::write_urls(&config.output, &report.urls)
        .with_context(|| format!("failed to write {}", config.output.display()))?;

    Ok(ExtractSummary {
        sitemap_url: config.sitemap_url.clone(),
        output: config.output.clone(),
        is_index: config.is_index,
        root_kind: report.root_kind,
        urls: report.urls.len(),
        documents_searched: report.documents_searched,
        skipped: report.skipped,
        failed: report.failed,
    })
}

/// Print the human-readable result of an extract run.
pub fn report(summary: &ExtractSummary, mode: OutputMode) {
    if !mode.human() {
        return;
    }
    let s = mode.styled();

    match (summary.root_kind, summary.is_index) {
        (DocumentKind::UrlSet, true) => output::print_warn(
            &s,
            &format!(
                "{} lists pages, not sitemaps; try again with --not-index",
                summary.sitemap_url
            ),
        ),
        (DocumentKind::Index, false) => output::print_warn(
            &s,
            &format!(
                "{} is a sitemap index; try again without --not-index",
                summary.sitemap_url
            ),
        ),
        _ => {}
    }
    if !summary.skipped.is_empty() {
        output::print_warn(
            &s,
            &format!(
                "Ignored {} sitemap file(s) with non-matching compression",
                summary.skipped.len()
            ),
        );
    }
    for failure in &summary.failed {
        output::print_warn(&s, &format!("Skipped {}: {}", failure.url, failure.error));
    }
    output::print_ok(
        &s,
        &format!(
            "Found {} URLs in the sitemap and saved them to {}",
            s.bold(&format_count(summary.urls as u64)),
            summary.output.display()
        ),
    );
}

/// Run the extract command.
pub async fn run(config: &ExtractConfig, mode: OutputMode) -> Result<()> {
    let summary = execute(config, mode).await?;
    if mode.json {
        output::print_json(&serde_json::to_value(&summary)?);
    } else {
        report(&summary, mode);
    }
    Ok(())
}
