//! Negative trait catalog loader.

use std::path::Path;

use unicreon_core::{NegativeTrait, TraitCatalog};

use crate::loaders::{LoadResult, read_file};

/// Loads `negative_traits.ron`: a list of [`NegativeTrait`] entries.
///
/// ```ron
/// [
///     (key: "faible", label: "Faible", short_active: "...",
///      mechanics: (carac_disadvantage: ["puissance"])),
/// ]
/// ```
pub struct TraitCatalogLoader;

impl TraitCatalogLoader {
    pub fn load(path: &Path) -> LoadResult<TraitCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse trait catalog at {:?}: {}", path, e))
    }

    pub fn parse(content: &str) -> LoadResult<TraitCatalog> {
        let traits: Vec<NegativeTrait> = ron::from_str(content)?;
        for def in &traits {
            if def.secret && def.secret_trigger.is_none() {
                tracing::warn!(key = %def.key, "secret trait without trigger can never be revealed");
            }
        }
        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = traits.iter().find(|def| !seen.insert(def.key.as_str())) {
            anyhow::bail!("duplicate trait key {:?}", dup.key);
        }
        Ok(TraitCatalog::new(traits))
    }
}
