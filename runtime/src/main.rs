// Copyright 2026 Sitemap Taxonomy Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use sitemap_taxonomy::cli::{self, output, output::OutputMode};
use sitemap_taxonomy::config::{
    parse_depth, CategorizeConfig, ExtractConfig, RenderConfig, DEFAULT_DEPTH,
    DEFAULT_DOWNLOAD_DIR, DEFAULT_LIMIT, DEFAULT_SITEMAP_URL, DEFAULT_SIZE, DEFAULT_TABLE_FILE,
    DEFAULT_TIMEOUT_MS, DEFAULT_URL_FILE,
};
use sitemap_taxonomy::graph::Style;
use std::path::PathBuf;
use tracing::warn;

#[derive(Parser)]
#[command(
    name = "sitemap-taxonomy",
    about = "Map a website's URL hierarchy from its XML sitemap",
    version,
    after_help = "Run 'sitemap-taxonomy <command> --help' for details on each command."
)]
struct Cli {
    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract page URLs from an XML sitemap or sitemap index
    Extract {
        /// Link to the XML sitemap (or sitemap index)
        #[arg(long)]
        url: Option<String>,
        /// The given URL contains the page links directly
        #[arg(long)]
        not_index: bool,
        /// The sitemap documents are gzip (.gz) files
        #[arg(long)]
        gzip: bool,
        /// Where to write the URLs, one per line
        #[arg(long, default_value = DEFAULT_URL_FILE)]
        output: PathBuf,
        /// Directory for downloaded .gz documents
        #[arg(long, default_value = DEFAULT_DOWNLOAD_DIR)]
        download_dir: PathBuf,
        /// Per-request timeout in milliseconds
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
        timeout: u64,
    },
    /// Group extracted URLs by path segment and count them
    Categorize {
        /// Number of layers deep to categorize
        #[arg(long, default_value_t = DEFAULT_DEPTH, value_parser = parse_depth)]
        depth: usize,
        /// URL file written by `extract`
        #[arg(long, default_value = DEFAULT_URL_FILE)]
        input: PathBuf,
        /// Where to write the layer table (CSV)
        #[arg(long, default_value = DEFAULT_TABLE_FILE)]
        output: PathBuf,
    },
    /// Render the layer table as a Graphviz graph
    Render {
        #[command(flatten)]
        graph: GraphArgs,
        /// Layer table written by `categorize`
        #[arg(long, default_value = DEFAULT_TABLE_FILE)]
        input: PathBuf,
        /// Output path without extension [default: sitemap_graph_<depth>_layer]
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Run extract, categorize and render in sequence
    Pipeline {
        /// Link to the XML sitemap (or sitemap index)
        #[arg(long)]
        url: Option<String>,
        /// The given URL contains the page links directly
        #[arg(long)]
        not_index: bool,
        /// The sitemap documents are gzip (.gz) files
        #[arg(long)]
        gzip: bool,
        /// Number of layers deep to categorize
        #[arg(long, default_value_t = DEFAULT_DEPTH, value_parser = parse_depth)]
        categorize_depth: usize,
        #[command(flatten)]
        graph: GraphArgs,
        /// Directory all intermediate and output files are written to
        #[arg(long, default_value = ".")]
        workdir: PathBuf,
        /// Per-request timeout in milliseconds
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
        timeout: u64,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

/// Graph options shared by `render` and `pipeline`.
#[derive(clap::Args)]
struct GraphArgs {
    /// Number of layers deep to plot
    #[arg(long, default_value_t = DEFAULT_DEPTH, value_parser = parse_depth)]
    depth: usize,
    /// Maximum number of nodes for a branch
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    limit: usize,
    /// Graph title
    #[arg(long, default_value = "")]
    title: String,
    /// Graph style: "light" or "dark"
    #[arg(long, default_value = "light")]
    style: Style,
    /// Size of the rendered graph, e.g. "8,5" or "40"
    #[arg(long, default_value = DEFAULT_SIZE)]
    size: String,
}

impl GraphArgs {
    fn into_config(self, input: PathBuf, output_stem: Option<PathBuf>) -> RenderConfig {
        RenderConfig {
            depth: self.depth,
            limit: self.limit,
            title: self.title,
            style: self.style,
            size: self.size,
            input,
            output_stem,
            ..Default::default()
        }
    }
}

fn resolve_sitemap_url(url: Option<String>, mode: OutputMode) -> String {
    url.unwrap_or_else(|| {
        warn!("no sitemap URL given, using {DEFAULT_SITEMAP_URL}");
        if mode.human() {
            eprintln!("  No sitemap URL argument passed, using {DEFAULT_SITEMAP_URL}.");
            eprintln!("  Run 'sitemap-taxonomy extract --help' for usage details.");
        }
        DEFAULT_SITEMAP_URL.to_string()
    })
}

fn init_tracing(mode: OutputMode) {
    let default_directive = if mode.verbose {
        "sitemap_taxonomy=debug"
    } else if mode.quiet {
        "sitemap_taxonomy=error"
    } else {
        "sitemap_taxonomy=warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!mode.no_color && output::color_enabled());
    if mode.json {
        builder.json().init();
    } else {
        builder.with_target(false).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mode = OutputMode {
        json: cli.json,
        quiet: cli.quiet,
        verbose: cli.verbose,
        no_color: cli.no_color,
    };
    init_tracing(mode);

    let result = match cli.command {
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
        Some(Commands::Extract {
            url,
            not_index,
            gzip,
            output,
            download_dir,
            timeout,
        }) => {
            let config = ExtractConfig {
                sitemap_url: resolve_sitemap_url(url, mode),
                is_index: !not_index,
                is_gzip: gzip,
                output,
                download_dir,
                timeout_ms: timeout,
            };
            cli::extract_cmd::run(&config, mode).await
        }
        Some(Commands::Categorize {
            depth,
            input,
            output,
        }) => {
            let config = CategorizeConfig {
                depth,
                input,
                output,
            };
            cli::categorize_cmd::run(&config, mode)
        }
        Some(Commands::Render {
            graph,
            input,
            output,
        }) => cli::render_cmd::run(&graph.into_config(input, output), mode),
        Some(Commands::Pipeline {
            url,
            not_index,
            gzip,
            categorize_depth,
            graph,
            workdir,
            timeout,
        }) => {
            let extract = ExtractConfig {
                sitemap_url: resolve_sitemap_url(url, mode),
                is_index: !not_index,
                is_gzip: gzip,
                timeout_ms: timeout,
                ..Default::default()
            };
            let categorize = CategorizeConfig {
                depth: categorize_depth,
                ..Default::default()
            };
            let render = graph.into_config(PathBuf::new(), None);
            let (extract, categorize, render) =
                cli::pipeline_cmd::in_workdir(&workdir, extract, categorize, render);
            cli::pipeline_cmd::run(&extract, &categorize, &render, mode).await
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "sitemap-taxonomy", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        if mode.json {
            output::print_json(&serde_json::json!({
                "error": true,
                "message": format!("{e:#}"),
            }));
        } else if !mode.quiet {
            eprintln!("  Error: {e:#}");
        }
        std::process::exit(1);
    }

    result
}
