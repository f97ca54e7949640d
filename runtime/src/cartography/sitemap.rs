//! Parse `<loc>` values out of sitemap and sitemap index documents.

use crate::error::{Result, TaxonomyError};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Serialize;

/// What the document's root element says it is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// `<urlset>`: entries are page URLs.
    UrlSet,
    /// `<sitemapindex>`: entries point to further sitemap documents.
    Index,
    /// Any other (or missing) root element.
    #[default]
    Unknown,
}

/// The `<loc>` entries of one document, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapDocument {
    pub kind: DocumentKind,
    pub locs: Vec<String>,
}

/// Parse a sitemap document and collect the text of every `<loc>` element.
///
/// Namespace prefixes are ignored (`<sm:loc>` counts). Entity references
/// and CDATA sections are decoded. `source_name` only labels errors.
pub fn parse_document(xml: &[u8], source_name: &str) -> Result<SitemapDocument> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut kind = None;
    let mut locs = Vec::new();
    let mut in_loc = false;
    let mut current = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = e.local_name();
                let name = name.as_ref();
                if kind.is_none() {
                    kind = Some(root_kind(name));
                }
                if name == b"loc" {
                    in_loc = true;
                    current.clear();
                }
            }
            Ok(Event::Empty(e)) => {
                if kind.is_none() {
                    kind = Some(root_kind(e.local_name().as_ref()));
                }
            }
            Ok(Event::End(e)) => {
                if in_loc && e.local_name().as_ref() == b"loc" {
                    let loc = current.trim();
                    if !loc.is_empty() {
                        locs.push(loc.to_string());
                    }
                    in_loc = false;
                }
            }
            Ok(Event::Text(e)) if in_loc => {
                let text = e
                    .unescape()
                    .map_err(|err| TaxonomyError::parse(source_name, err))?;
                current.push_str(&text);
            }
            Ok(Event::CData(e)) if in_loc => {
                current.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(TaxonomyError::parse(
                    source_name,
                    format!("XML parse error at byte {}: {e}", reader.error_position()),
                ));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(SitemapDocument {
        kind: kind.unwrap_or(DocumentKind::Unknown),
        locs,
    })
}

/// Parse a document and return only its `<loc>` values.
pub fn parse_locs(xml: &[u8], source_name: &str) -> Result<Vec<String>> {
    parse_document(xml, source_name).map(|doc| doc.locs)
}

fn root_kind(local_name: &[u8]) -> DocumentKind {
    match local_name {
        b"urlset" => DocumentKind::UrlSet,
        b"sitemapindex" => DocumentKind::Index,
        _ => DocumentKind::Unknown,
    }
}
