//! Token command
//!
//! Usage: shopgrade token --shop <SHOP> [--ttl-minutes N]

use anyhow::Context;
use chrono::{Duration, Utc};
use clap::Args;
use shopgrade_core::auth::mint_preview_token;
use shopgrade_engine::config::ENV_PREVIEW_SECRET;
use shopgrade_engine::EngineConfig;

#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Shop the token is scoped to
    #[arg(long)]
    pub shop: String,

    /// Lifetime in minutes
    #[arg(long, default_value_t = 15)]
    pub ttl_minutes: i64,
}

/// Execute token command
///
/// The secret comes from the environment only, never from argv.
pub fn execute(args: TokenArgs, config: EngineConfig) -> anyhow::Result<()> {
    let shop = super::parse_shop(&args.shop)?;
    let secret = config
        .preview_secret
        .with_context(|| format!("{} is not set", ENV_PREVIEW_SECRET))?;
    anyhow::ensure!(args.ttl_minutes > 0, "--ttl-minutes must be positive");

    let token = mint_preview_token(&secret, &shop, Duration::minutes(args.ttl_minutes), Utc::now())?;
    println!("{}", token.expose());
    Ok(())
}
