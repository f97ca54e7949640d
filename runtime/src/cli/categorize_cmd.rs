//! `sitemap-taxonomy categorize`: group the URL file into a layer table.

use crate::cartography::url_list;
use crate::cli::output::{self, OutputMode};
use crate::config::CategorizeConfig;
use crate::graph::types::format_count;
use crate::taxonomy::categorize;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

/// What a categorize run produced.
#[derive(Debug, Clone, Serialize)]
pub struct CategorizeSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub depth: usize,
    pub urls: usize,
    pub rows: usize,
}

/// Read the URL file, categorize, and write the table.
pub fn execute(config: &CategorizeConfig, mode: OutputMode) -> Result<CategorizeSummary> {
    let urls = url_list::read_urls(&config.input)
        .with_context(|| format!("failed to read URLs from {}", config.input.display()))?;

    if mode.human() {
        let s = mode.styled();
        output::print_info(&s, &format!("Loaded {} URLs", format_count(urls.len() as u64)));
        output::print_info(
            &s,
            &format!("Categorizing up to a depth of {}", config.depth),
        );
    }

    let table = categorize(&urls, config.depth);
    table
        .write_csv(&config.output)
        .with_context(|| format!("failed to write {}", config.output.display()))?;

    Ok(CategorizeSummary {
        input: config.input.clone(),
        output: config.output.clone(),
        depth: config.depth,
        urls: urls.len(),
        rows: table.len(),
    })
}

/// Print the human-readable result of a categorize run.
pub fn report(summary: &CategorizeSummary, mode: OutputMode) {
    if !mode.human() {
        return;
    }
    let s = mode.styled();
    output::print_ok(
        &s,
        &format!(
            "Printed {} rows of data to {}",
            s.bold(&format_count(summary.rows as u64)),
            summary.output.display()
        ),
    );
}

/// Run the categorize command.
pub fn run(config: &CategorizeConfig, mode: OutputMode) -> Result<()> {
    let summary = execute(config, mode)?;
    if mode.json {
        output::print_json(&serde_json::to_value(&summary)?);
    } else {
        report(&summary, mode);
    }
    Ok(())
}
