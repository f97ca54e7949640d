//! CLI subcommand implementations for the sitemap-taxonomy binary.

pub mod categorize_cmd;
pub mod extract_cmd;
pub mod output;
pub mod pipeline_cmd;
pub mod render_cmd;
