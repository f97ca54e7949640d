//! Serialize a [`GraphDocument`] to Graphviz DOT and hand it to `dot`.

use crate::error::{Result, TaxonomyError};
use crate::graph::types::{Attributes, GraphDocument};
use petgraph::visit::EdgeRef;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{info, warn};

/// Graphviz executable used to render PDFs.
const DOT_BINARY: &str = "dot";

/// Files produced by [`export`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedFiles {
    /// The DOT source (`<stem>.gv`).
    pub source: PathBuf,
    /// The rendered PDF, or `None` when Graphviz is unavailable.
    pub pdf: Option<PathBuf>,
}

/// Quote a DOT ID or attribute value.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn attr_list(attrs: &Attributes) -> String {
    attrs
        .iter()
        .map(|(k, v)| format!("{k}={}", quote(v)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render `doc` as DOT text. Node IDs are `n<index>` in insertion order.
pub fn to_dot(doc: &GraphDocument) -> String {
    let palette = doc.style.palette(&doc.title);
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "digraph {} {{", quote(&doc.name));
    let _ = writeln!(out, "\tgraph [{}]", attr_list(&palette.graph));
    let _ = writeln!(out, "\tnode [{}]", attr_list(&palette.node));
    let _ = writeln!(out, "\tedge [{}]", attr_list(&palette.edge));
    let _ = writeln!(out, "\trankdir={}", doc.rankdir);
    let _ = writeln!(out, "\tsize={}", quote(&doc.size));

    for idx in doc.graph.node_indices() {
        let node = &doc.graph[idx];
        let _ = writeln!(
            out,
            "\tn{} [label={} shape={}]",
            idx.index(),
            quote(&node.label),
            node.shape.as_str()
        );
    }

    for edge in doc.graph.edge_references() {
        let _ = writeln!(
            out,
            "\tn{} -> n{} [label={}]",
            edge.source().index(),
            edge.target().index(),
            quote(&edge.weight().label)
        );
    }

    out.push_str("}\n");
    out
}

/// Write `<stem>.gv` and, when Graphviz is installed, render `<stem>.pdf`.
pub fn export(doc: &GraphDocument, stem: &Path) -> Result<ExportedFiles> {
    if let Some(parent) = stem.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let source = stem.with_extension("gv");
    std::fs::write(&source, to_dot(doc))?;
    info!("wrote graph description to {}", source.display());

    let dot = match which::which(DOT_BINARY) {
        Ok(path) => path,
        Err(_) => {
            warn!(
                "Graphviz '{DOT_BINARY}' not found on PATH; skipping PDF, source kept at {}",
                source.display()
            );
            return Ok(ExportedFiles { source, pdf: None });
        }
    };

    let pdf = stem.with_extension("pdf");
    render_pdf(&dot, &source, &pdf)?;
    Ok(ExportedFiles {
        source,
        pdf: Some(pdf),
    })
}

/// Run `dot -Tpdf <source> -o <pdf>`.
pub fn render_pdf(dot: &Path, source: &Path, pdf: &Path) -> Result<()> {
    let output = Command::new(dot)
        .arg("-Tpdf")
        .arg(source)
        .arg("-o")
        .arg(pdf)
        .output()
        .map_err(|e| TaxonomyError::Render(format!("failed to run {}: {e}", dot.display())))?;

    if !output.status.success() {
        return Err(TaxonomyError::Render(format!(
            "{} exited with {}: {}",
            dot.display(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    info!("rendered {}", pdf.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::graph::builder::render;
    use crate::graph::types::Style;
    use crate::taxonomy::categorize;

    fn sample_doc(style: Style) -> GraphDocument {
        let urls = ["https://a.com/x/1", "https://a.com/x/2", "https://a.com/\"q\""];
        let cfg = RenderConfig {
            depth: 2,
            style,
            title: "My \"Site\"".into(),
            ..Default::default()
        };
        render(&categorize(&urls, 2), &cfg)
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("plain"), "\"plain\"");
        assert_eq!(quote("a\"b"), "\"a\\\"b\"");
        assert_eq!(quote("c:\\dir"), "\"c:\\\\dir\"");
        assert_eq!(quote("two\nlines"), "\"two\\nlines\"");
    }

    #[test]
    fn test_dot_structure() {
        let dot = to_dot(&sample_doc(Style::Light));
        assert!(dot.starts_with("digraph \"sitemap\" {\n"));
        assert!(dot.ends_with("}\n"));
        assert!(dot.contains("\trankdir=LR\n"));
        assert!(dot.contains("\tsize=\"8,5\"\n"));
        assert!(dot.contains("label=\"My \\\"Site\\\"\""));
        assert!(dot.contains("\tn0 [label=\"a.com (3)\" shape=rectangle]\n"));
        assert!(dot.contains("\tn1 [label=\"x\" shape=oval]\n"));
        assert!(dot.contains("\tn0 -> n1 [label=\"2\"]\n"));
        assert!(dot.contains("label=\"\\\"q\\\"\""));
        assert!(dot.contains("fillcolor=\"#dbdddd\""));
    }

    #[test]
    fn test_dark_palette_in_dot() {
        let dot = to_dot(&sample_doc(Style::Dark));
        assert!(dot.contains("bgcolor=\"#3a3a3a\""));
        assert!(dot.contains("fontcolor=\"white\""));
    }

    #[test]
    fn test_export_writes_source() {
        let dir = tempfile::tempdir().unwrap();
        let stem = dir.path().join("out/sitemap_graph_2_layer");
        let files = export(&sample_doc(Style::Light), &stem).unwrap();
        assert_eq!(files.source, stem.with_extension("gv"));
        let text = std::fs::read_to_string(&files.source).unwrap();
        assert!(text.contains("digraph"));
        if let Some(pdf) = files.pdf {
            assert!(pdf.exists());
        }
    }
}
