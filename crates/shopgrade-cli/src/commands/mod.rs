pub mod diff;
pub mod publish;
pub mod serve;
pub mod token;

use anyhow::Context;
use shopgrade_core::ShopId;

/// Validate a shop id from the command line
pub(crate) fn parse_shop(raw: &str) -> anyhow::Result<ShopId> {
    ShopId::parse(raw).with_context(|| format!("'{}' is not a valid shop id", raw))
}
