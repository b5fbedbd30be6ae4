pub mod change;
pub mod package;
pub mod shop;

pub use change::{ComponentChange, ConfigDiff, PreviewReport};
pub use package::{AppManifest, PackageManifest};
pub use shop::{ComponentVersions, ShopId, ShopManifest};
