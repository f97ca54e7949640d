//! Cartography: discovering a site's URLs from its sitemaps.

pub mod extractor;
pub mod sitemap;
pub mod url_list;
