//! Extractor: turns a sitemap (or sitemap index) into a flat list of URLs.
//!
//! Modes, selected by [`ExtractConfig`]:
//!
//! 1. **Plain document**: fetch, collect `<loc>` values.
//! 2. **Compressed document**: download into the download dir, gunzip, collect.
//! 3. **Index**: fetch the index, keep children whose `.gz` suffix matches
//!    `is_gzip` (the rest are skipped with a warning), then apply mode 1 or 2
//!    to each child in index order.
//!
//! In index mode a child that fails to fetch, decompress or parse is logged
//! and recorded in the report; the run continues. A failure on the root
//! document is returned as an error.

use crate::acquisition::http_client::DocumentFetcher;
use crate::cartography::sitemap::{self, DocumentKind, SitemapDocument};
use crate::config::ExtractConfig;
use crate::error::{Result, TaxonomyError};
use flate2::read::MultiGzDecoder;
use indicatif::ProgressBar;
use serde::Serialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Suffix that marks a compressed sitemap document.
pub const GZIP_SUFFIX: &str = ".gz";

/// A child document that could not be turned into URLs.
#[derive(Debug, Clone, Serialize)]
pub struct ChildFailure {
    pub url: String,
    pub error: String,
}

/// Outcome of an extraction run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractReport {
    /// Page URLs in discovery order.
    pub urls: Vec<String>,
    /// What the root document's top element said it was.
    pub root_kind: DocumentKind,
    /// Number of documents whose `<loc>` entries were collected.
    pub documents_searched: usize,
    /// Index entries ignored because their compression did not match.
    pub skipped: Vec<String>,
    /// Index entries that failed and were left out.
    pub failed: Vec<ChildFailure>,
}

/// Runs the extract stage against a [`DocumentFetcher`].
pub struct Extractor {
    fetcher: Arc<dyn DocumentFetcher>,
    progress: ProgressBar,
}

impl Extractor {
    pub fn new(fetcher: Arc<dyn DocumentFetcher>) -> Self {
        Self {
            fetcher,
            progress: ProgressBar::hidden(),
        }
    }

    /// Report per-child progress on `bar`. Hidden by default.
    pub fn with_progress(mut self, bar: ProgressBar) -> Self {
        self.progress = bar;
        self
    }

    /// Extract all page URLs reachable from `config.sitemap_url`.
    pub async fn extract(&self, config: &ExtractConfig) -> Result<ExtractReport> {
        info!(
            "extracting {} (index={}, gzip={})",
            config.sitemap_url, config.is_index, config.is_gzip
        );

        if config.is_gzip {
            tokio::fs::create_dir_all(&config.download_dir).await?;
        }

        let mut report = ExtractReport::default();

        if !config.is_index {
            let root = if config.is_gzip {
                let path =
                    download_path(&config.download_dir, &config.sitemap_url, 0, &HashSet::new());
                self.download(&config.sitemap_url, &path).await?;
                read_gzip_document(&path)?
            } else {
                self.fetch_document(&config.sitemap_url).await?
            };
            check_root_kind(&config.sitemap_url, root.kind, false);
            report.root_kind = root.kind;
            report.urls = root.locs;
            report.documents_searched = 1;
            return Ok(report);
        }

        // The index itself is always served uncompressed.
        let root = self.fetch_document(&config.sitemap_url).await?;
        check_root_kind(&config.sitemap_url, root.kind, true);
        report.root_kind = root.kind;
        let (wanted, skipped) = partition_children(root.locs, config.is_gzip);

        if !skipped.is_empty() {
            warn!(
                "ignoring {} {} file(s) listed in {}",
                skipped.len(),
                if config.is_gzip { "non-gzip" } else { "gzip" },
                config.sitemap_url
            );
            for url in &skipped {
                warn!("  ignored: {url}");
            }
        }
        report.skipped = skipped;

        self.progress.set_length(wanted.len() as u64);
        if config.is_gzip {
            self.extract_gzip_children(&wanted, &config.download_dir, &mut report)
                .await;
        } else {
            self.extract_plain_children(&wanted, &mut report).await;
        }
        self.progress.finish_and_clear();

        info!(
            "searched {} of {} sitemap document(s), {} URL(s) found",
            report.documents_searched,
            wanted.len(),
            report.urls.len()
        );

        Ok(report)
    }

    async fn extract_plain_children(&self, children: &[String], report: &mut ExtractReport) {
        for url in children {
            match self.fetch_locs(url).await {
                Ok(links) => {
                    debug!("{} URL(s) in {}", links.len(), url);
                    report.urls.extend(links);
                    report.documents_searched += 1;
                    self.progress.set_message(format!(
                        "Searched through {} XML file(s)",
                        report.documents_searched
                    ));
                }
                Err(e) => record_failure(report, url, e),
            }
            self.progress.inc(1);
        }
    }

    /// Download every child first, then decompress and parse the files
    /// that arrived, in child order.
    async fn extract_gzip_children(
        &self,
        children: &[String],
        download_dir: &Path,
        report: &mut ExtractReport,
    ) {
        let mut used = HashSet::new();
        let mut downloaded = Vec::with_capacity(children.len());

        for (i, url) in children.iter().enumerate() {
            let path = download_path(download_dir, url, i, &used);
            match self.download(url, &path).await {
                Ok(()) => {
                    used.insert(path.clone());
                    downloaded.push((url, path));
                }
                Err(e) => {
                    record_failure(report, url, e);
                    self.progress.inc(1);
                }
            }
        }

        for (url, path) in downloaded {
            match read_gzip_document(&path).map(|doc| doc.locs) {
                Ok(links) => {
                    debug!("{} URL(s) in {}", links.len(), path.display());
                    report.urls.extend(links);
                    report.documents_searched += 1;
                    self.progress.set_message(format!(
                        "Searched through {} XML file(s)",
                        report.documents_searched
                    ));
                }
                Err(e) => record_failure(report, url, e),
            }
            self.progress.inc(1);
        }
    }

    async fn fetch_locs(&self, url: &str) -> Result<Vec<String>> {
        let body = self.fetcher.fetch(url).await?;
        sitemap::parse_locs(&body, url)
    }

    async fn fetch_document(&self, url: &str) -> Result<SitemapDocument> {
        let body = self.fetcher.fetch(url).await?;
        sitemap::parse_document(&body, url)
    }

    async fn download(&self, url: &str, path: &Path) -> Result<()> {
        let body = self.fetcher.fetch(url).await?;
        tokio::fs::write(path, &body).await?;
        debug!("saved {} to {}", url, path.display());
        Ok(())
    }
}

/// Split index entries into (matching, skipped) by their compression suffix.
pub fn partition_children(children: Vec<String>, is_gzip: bool) -> (Vec<String>, Vec<String>) {
    children
        .into_iter()
        .partition(|url| url.ends_with(GZIP_SUFFIX) == is_gzip)
}

/// Decompress a downloaded gzip sitemap and parse it.
pub fn read_gzip_document(path: &Path) -> Result<SitemapDocument> {
    let file = std::fs::File::open(path)?;
    let mut xml = Vec::new();
    MultiGzDecoder::new(file)
        .read_to_end(&mut xml)
        .map_err(|e| TaxonomyError::Decompress {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    sitemap::parse_document(&xml, &path.display().to_string())
}

/// Warn when the root document's top element contradicts `is_index`.
fn check_root_kind(url: &str, kind: DocumentKind, is_index: bool) {
    match (kind, is_index) {
        (DocumentKind::UrlSet, true) => warn!(
            "{url} is a <urlset>, not a sitemap index; its page URLs will be fetched as sitemaps"
        ),
        (DocumentKind::Index, false) => warn!(
            "{url} is a <sitemapindex>; its entries are sitemap documents, not pages"
        ),
        _ => {}
    }
}

/// Local file name for a downloaded document: the last path segment of its
/// URL, prefixed with the child index (and then a counter) until the name
/// is not already used.
fn download_path(dir: &Path, url: &str, index: usize, used: &HashSet<PathBuf>) -> PathBuf {
    let name = url::Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segs| segs.next_back().map(str::to_string))
        })
        .or_else(|| url.rsplit('/').next().map(str::to_string))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| format!("sitemap-{index}.xml.gz"));

    let mut path = dir.join(&name);
    let mut attempt = 0usize;
    while used.contains(&path) {
        path = if attempt == 0 {
            dir.join(format!("{index}-{name}"))
        } else {
            dir.join(format!("{index}-{attempt}-{name}"))
        };
        attempt += 1;
    }
    path
}

fn record_failure(report: &mut ExtractReport, url: &str, error: TaxonomyError) {
    warn!("skipping {url}: {error}");
    report.failed.push(ChildFailure {
        url: url.to_string(),
        error: error.to_string(),
    });
}
