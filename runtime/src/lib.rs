// Copyright 2026 Sitemap Taxonomy Contributors
// SPDX-License-Identifier: Apache-2.0

//! Sitemap taxonomy: map a website's URL hierarchy from its XML sitemap.
//!
//! The pipeline has three stages, each handing off through a file:
//!
//! 1. [`cartography`] fetches a sitemap (or sitemap index, optionally
//!    gzip-compressed) and collects every page URL.
//! 2. [`taxonomy`] groups those URLs by host and leading path segments and
//!    counts them into an [`taxonomy::AggregationTable`].
//! 3. [`graph`] turns the table into a layered directed graph and exports
//!    it as Graphviz DOT (and PDF when `dot` is installed).

pub mod acquisition;
pub mod cartography;
pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod taxonomy;
