//! Build a layered taxonomy graph from an aggregation table.
//!
//! Layer 0 holds one node per host. Layer `i` adds, under every layer
//! `i - 1` node, the distinct values of column `i` ranked by summed count
//! and truncated to `limit`. A branch is only attached when its parent node
//! exists, so truncation at one layer prunes everything beneath it.

use crate::config::RenderConfig;
use crate::graph::types::{format_count, GraphDocument, GraphNode, NodeShape};
use crate::taxonomy::AggregationTable;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Build the graph document for `table` as described by `config`.
///
/// `config.depth` is clamped to the table's depth (with a warning).
pub fn render(table: &AggregationTable, config: &RenderConfig) -> GraphDocument {
    let available = table.depth();
    let depth = if config.depth > available {
        warn!(
            "There are only {available} layers available to plot, setting layers={available}"
        );
        available
    } else {
        config.depth
    };

    let mut doc = GraphDocument::new(config.style, &config.title, &config.size, depth);
    if depth < config.depth {
        doc.clamped_from = Some(config.depth);
    }

    add_host_layer(&mut doc, table);

    for layer in 1..=depth {
        add_layer(&mut doc, table, layer, config.limit);
        debug!(
            "built layer {layer}: {} node(s), {} edge(s) so far",
            doc.node_count(),
            doc.edge_count()
        );
    }

    doc
}

fn add_host_layer(doc: &mut GraphDocument, table: &AggregationTable) {
    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, u64> = HashMap::new();
    for row in table.rows() {
        let host = row.segments[0].as_str();
        let total = totals.entry(host).or_insert_with(|| {
            order.push(host);
            0
        });
        *total += row.count;
    }

    let mut hosts: Vec<(&str, u64)> = order.into_iter().map(|h| (h, totals[h])).collect();
    hosts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    for (host, count) in hosts {
        doc.add_node(GraphNode {
            key: vec![host.to_string()],
            label: format!("{host} ({})", format_count(count)),
            layer: 0,
            count,
            shape: NodeShape::Rectangle,
        });
    }
}

/// Per-parent child totals for column `layer`, parents in first-seen order.
fn child_groups(table: &AggregationTable, layer: usize) -> Vec<(&[String], Vec<(&str, u64)>)> {
    let mut parents: Vec<&[String]> = Vec::new();
    let mut groups: HashMap<&[String], HashMap<&str, u64>> = HashMap::new();

    for row in table.rows() {
        let parent = &row.segments[..layer];
        let children = groups.entry(parent).or_insert_with(|| {
            parents.push(parent);
            HashMap::new()
        });
        *children.entry(row.segments[layer].as_str()).or_insert(0) += row.count;
    }

    parents
        .into_iter()
        .map(|parent| {
            let mut children: Vec<(&str, u64)> = groups
                .remove(parent)
                .unwrap_or_default()
                .into_iter()
                .collect();
            children.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
            (parent, children)
        })
        .collect()
}

fn add_layer(doc: &mut GraphDocument, table: &AggregationTable, layer: usize, limit: usize) {
    for (parent_key, children) in child_groups(table, layer) {
        let Some(parent) = doc.lookup(parent_key) else {
            continue;
        };

        // Empty segments are padding for URLs that end above this layer.
        for (name, count) in children
            .into_iter()
            .filter(|(name, _)| !name.is_empty())
            .take(limit)
        {
            let mut key = parent_key.to_vec();
            key.push(name.to_string());
            let child = doc.add_node(GraphNode {
                key,
                label: name.to_string(),
                layer,
                count,
                shape: NodeShape::Oval,
            });
            doc.add_edge(parent, child, count);
        }
    }
}
