//! `sitemap-taxonomy render`: draw the layer table as a graph.

use crate::cli::output::{self, OutputMode};
use crate::config::RenderConfig;
use crate::graph::{dot, render};
use crate::graph::types::format_count;
use crate::taxonomy::AggregationTable;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

/// What a render run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RenderSummary {
    pub input: PathBuf,
    pub rows: usize,
    pub requested_depth: usize,
    pub depth: usize,
    pub nodes: usize,
    pub edges: usize,
    pub source: PathBuf,
    pub pdf: Option<PathBuf>,
}

/// Load the table, build the graph, and export it.
pub fn execute(config: &RenderConfig, mode: OutputMode) -> Result<RenderSummary> {
    let table = AggregationTable::read_csv(&config.input)
        .with_context(|| format!("failed to load {}", config.input.display()))?;

    let s = mode.styled();
    if mode.human() {
        output::print_info(
            &s,
            &format!(
                "Loaded {} rows of categorized data from {}",
                format_count(table.len() as u64),
                config.input.display()
            ),
        );
    }

    let doc = render(&table, config);
    if mode.human() {
        if let Some(requested) = doc.clamped_from {
            output::print_warn(
                &s,
                &format!(
                    "Requested {requested} layers but only {} are available; plotting {}",
                    doc.depth, doc.depth
                ),
            );
        }
        output::print_info(
            &s,
            &format!("Building {} layer deep sitemap graph", doc.depth),
        );
    }

    let stem = config.stem_for(doc.depth);
    let files = dot::export(&doc, &stem)
        .with_context(|| format!("failed to export graph to {}", stem.display()))?;

    Ok(RenderSummary {
        input: config.input.clone(),
        rows: table.len(),
        requested_depth: config.depth,
        depth: doc.depth,
        nodes: doc.node_count(),
        edges: doc.edge_count(),
        source: files.source,
        pdf: files.pdf,
    })
}

/// Print the human-readable result of a render run.
pub fn report(summary: &RenderSummary, mode: OutputMode) {
    if !mode.human() {
        return;
    }
    let s = mode.styled();
    match &summary.pdf {
        Some(pdf) => output::print_ok(&s, &format!("Exported graph to {}", pdf.display())),
        None => {
            output::print_warn(&s, "Graphviz 'dot' not found; PDF not rendered");
            output::print_ok(
                &s,
                &format!("Exported graph description to {}", summary.source.display()),
            );
        }
    }
    output::print_info(
        &s,
        &format!(
            "{} nodes, {} edges",
            format_count(summary.nodes as u64),
            format_count(summary.edges as u64)
        ),
    );
}

/// Run the render command.
pub fn run(config: &RenderConfig, mode: OutputMode) -> Result<()> {
    let summary = execute(config, mode)?;
    if mode.json {
        output::print_json(&serde_json::to_value(&summary)?);
    } else {
        report(&summary, mode);
    }
    Ok(())
}
