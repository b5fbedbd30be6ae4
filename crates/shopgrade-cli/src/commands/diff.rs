//! Diff command
//!
//! Usage: shopgrade diff <SHOP> [--config] [--format markdown|json]

use anyhow::Context;
use clap::{Args, ValueEnum};
use shopgrade_core::diff::render_upgrade_summary;
use shopgrade_core::PreviewReport;
use shopgrade_engine::commands::preview::{gather_changes, gather_config_diff};
use shopgrade_engine::EngineConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Markdown,
    Json,
}

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Shop id
    pub shop: String,

    /// Also report template and translation drift
    #[arg(long = "config")]
    pub config_diff: bool,

    #[arg(long, value_enum, default_value = "markdown")]
    pub format: OutputFormat,
}

/// Execute diff command
///
/// Reads the repository directly; no preview token is involved.
pub fn execute(args: DiffArgs, config: EngineConfig) -> anyhow::Result<()> {
    let shop = super::parse_shop(&args.shop)?;
    let layout = config.layout();

    let components = gather_changes(&layout, &shop).context("gathering component changes")?;
    let config_diff = if args.config_diff {
        Some(gather_config_diff(&layout, &shop).context("comparing shop config")?)
    } else {
        None
    };
    let report = PreviewReport {
        components,
        config_diff,
    };

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Markdown => print!("{}", render_upgrade_summary(&shop, &report)),
    }
    Ok(())
}
