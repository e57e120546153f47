//! Content loaders for reading rules data from files.
//!
//! Every loader reads RON or TOML into `unicreon-core` types and repairs what
//! the core types cannot express on their own (duplicate item ids, trait
//! progress that disagrees with the catalog).

pub mod actors;
pub mod compendium;
pub mod config;
pub mod encounter;
pub mod factory;
pub mod traits;

pub use actors::RosterLoader;
pub use compendium::CompendiumLoader;
pub use config::ConfigLoader;
pub use encounter::EncounterLoader;
pub use factory::ContentFactory;
pub use traits::TraitCatalogLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
