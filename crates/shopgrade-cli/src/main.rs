//! shopgrade CLI
//!
//! Operator interface for previewing and publishing component upgrades

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shopgrade_core::logging_facility::{self, Profile};
use shopgrade_engine::EngineConfig;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "shopgrade")]
#[command(about = "Preview and publish shared component upgrades per shop", long_about = None)]
struct Cli {
    /// Repository root (overrides SHOPGRADE_ROOT)
    #[arg(long, global = true, env = "SHOPGRADE_ROOT")]
    root: Option<PathBuf>,

    /// Build/deploy executable (overrides SHOPGRADE_PACKAGE_MANAGER)
    #[arg(long, global = true, env = "SHOPGRADE_PACKAGE_MANAGER")]
    package_manager: Option<String>,

    /// Log profile: dev or prod
    #[arg(long, global = true, env = "SHOPGRADE_LOG", default_value = "dev")]
    log: Profile,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show pending component upgrades for a shop
    Diff(commands::diff::DiffArgs),
    /// Lock component versions for a shop, then build and deploy it
    Publish(commands::publish::PublishArgs),
    /// Mint a preview token for a shop
    Token(commands::token::TokenArgs),
    /// Serve the HTTP endpoints
    Serve(commands::serve::ServeArgs),
}

impl Cli {
    fn engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::from_env();
        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        if let Some(pm) = self.package_manager.as_ref().filter(|pm| !pm.is_empty()) {
            config.package_manager = pm.clone();
        }
        config
    }
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging_facility::init(cli.log);

    let config = cli.engine_config();
    let result = match cli.command {
        Commands::Diff(args) => commands::diff::execute(args, config),
        Commands::Publish(args) => commands::publish::execute(args, config),
        Commands::Token(args) => commands::token::execute(args, config),
        Commands::Serve(args) => commands::serve::execute(args, config),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
