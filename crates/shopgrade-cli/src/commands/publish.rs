//! Publish command
//!
//! Usage: shopgrade publish <SHOP> [--components a,b,...]

use std::sync::Arc;

use clap::Args;
use shopgrade_engine::commands::publish::{Selection, UpgradePublisher};
use shopgrade_engine::commands::runner::ProcessRunner;
use shopgrade_engine::EngineConfig;

#[derive(Debug, Args)]
pub struct PublishArgs {
    /// Shop id
    pub shop: String,

    /// Components to lock (default: every dependency of the shop app)
    #[arg(long, value_delimiter = ',')]
    pub components: Vec<String>,
}

impl PublishArgs {
    fn selection(&self) -> Selection {
        let mut names: Vec<String> = Vec::new();
        for name in self.components.iter().filter(|n| !n.is_empty()) {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        if names.is_empty() {
            Selection::All
        } else {
            Selection::Only(names)
        }
    }
}

/// Execute publish command
pub fn execute(args: PublishArgs, config: EngineConfig) -> anyhow::Result<()> {
    let shop = super::parse_shop(&args.shop)?;
    let publisher = UpgradePublisher::new(config, Arc::new(ProcessRunner));

    let report = publisher.publish(&shop, &args.selection())?;

    if report.locked.is_empty() {
        println!("No components locked for {}", shop);
    }
    for (name, version) in &report.locked {
        println!("✓ Locked {} @ {}", name, version);
    }
    if report.pipeline_ran {
        println!("✓ Built and deployed {}", shop.app_name());
    } else {
        println!("Skipped build and deploy: {} declares no dependencies", shop.app_name());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_defaults_to_all() {
        let args = PublishArgs {
            shop: "demo".to_string(),
            components: vec![],
        };
        assert_eq!(args.selection(), Selection::All);
    }

    #[test]
    fn test_selection_dedupes() {
        let args = PublishArgs {
            shop: "demo".to_string(),
            components: vec!["a".into(), "b".into(), "a".into(), String::new()],
        };
        assert_eq!(
            args.selection(),
            Selection::Only(vec!["a".to_string(), "b".to_string()])
        );
    }
}
