//! `sitemap-taxonomy pipeline`: extract, categorize and render in one go.
//!
//! Stages still hand off through their files: each stage reads what the
//! previous one wrote.

use crate::cli::output::{self, OutputMode};
use crate::cli::{categorize_cmd, extract_cmd, render_cmd};
use crate::config::{
    CategorizeConfig, ExtractConfig, RenderConfig, DEFAULT_DOWNLOAD_DIR, DEFAULT_TABLE_FILE,
    DEFAULT_URL_FILE,
};
use anyhow::Result;
use std::path::Path;

/// Wire each stage's input to the previous stage's output.
pub fn chain(
    extract: &ExtractConfig,
    categorize: &CategorizeConfig,
    render: &RenderConfig,
) -> (CategorizeConfig, RenderConfig) {
    let categorize = CategorizeConfig {
        input: extract.output.clone(),
        ..categorize.clone()
    };
    let render = RenderConfig {
        input: categorize.output.clone(),
        ..render.clone()
    };
    (categorize, render)
}

/// Place every file the pipeline reads or writes under `workdir`.
///
/// The graph keeps a derived name so it reflects the depth actually drawn,
/// which may be less than requested when the table is shallower.
pub fn in_workdir(
    workdir: &Path,
    extract: ExtractConfig,
    categorize: CategorizeConfig,
    render: RenderConfig,
) -> (ExtractConfig, CategorizeConfig, RenderConfig) {
    let extract = ExtractConfig {
        output: workdir.join(DEFAULT_URL_FILE),
        download_dir: workdir.join(DEFAULT_DOWNLOAD_DIR),
        ..extract
    };
    let categorize = CategorizeConfig {
        output: workdir.join(DEFAULT_TABLE_FILE),
        ..categorize
    };
    let render = RenderConfig {
        output_stem: None,
        output_dir: workdir.to_path_buf(),
        ..render
    };
    (extract, categorize, render)
}

/// Run the pipeline command.
pub async fn run(
    extract: &ExtractConfig,
    categorize: &CategorizeConfig,
    render: &RenderConfig,
    mode: OutputMode,
) -> Result<()> {
    let (categorize, render) = chain(extract, categorize, render);

    let extracted = extract_cmd::execute(extract, mode).await?;
    extract_cmd::report(&extracted, mode);

    let categorized = categorize_cmd::execute(&categorize, mode)?;
    categorize_cmd::report(&categorized, mode);

    let rendered = render_cmd::execute(&render, mode)?;
    render_cmd::report(&rendered, mode);

    if mode.json {
        output::print_json(&serde_json::json!({
            "extract": extracted,
            "categorize": categorized,
            "render": rendered,
        }));
    }
    Ok(())
}
