//! Serve command
//!
//! Usage: shopgrade serve [--bind ADDR]

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Args;
use shopgrade_engine::commands::runner::ProcessRunner;
use shopgrade_engine::{Engine, EngineConfig};
use shopgrade_server::AppState;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Listen address
    #[arg(long, env = "SHOPGRADE_BIND", default_value = "127.0.0.1:8787")]
    pub bind: SocketAddr,
}

/// Execute serve command
pub fn execute(args: ServeArgs, config: EngineConfig) -> anyhow::Result<()> {
    if !config.guard().is_enabled() {
        tracing::warn!("preview token secret not configured, every preview will be refused");
    }
    let state = AppState::new(Engine::new(config, Arc::new(ProcessRunner)));

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(shopgrade_server::serve(args.bind, state))?;
    Ok(())
}
