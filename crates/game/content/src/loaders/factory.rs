//! Content factory for building the rules engine and roster from data files.

use std::path::{Path, PathBuf};

use unicreon_core::{Character, CompendiumSnapshot, RulesConfig, RulesEngine, TraitCatalog};

use crate::loaders::{
    CompendiumLoader, ConfigLoader, EncounterLoader, LoadResult, RosterLoader, TraitCatalogLoader,
    encounter::EncounterScript,
};

/// Content factory that loads all rules content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── rules.toml
/// ├── negative_traits.ron
/// ├── characters.ron
/// ├── packs/
/// │   ├── competences.ron
/// │   └── equipement.ron
/// └── encounters/
///     └── embuscade.ron
/// ```
///
/// `rules.toml` and `negative_traits.ron` are optional: the defaults and the
/// built-in catalog are used when they are absent.
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load the rules configuration from `rules.toml`.
    pub fn load_config(&self) -> LoadResult<RulesConfig> {
        let path = self.data_dir.join("rules.toml");
        if !path.exists() {
            tracing::info!("no rules.toml in {}, using defaults", self.data_dir.display());
            return Ok(RulesConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the negative trait catalog from `negative_traits.ron`.
    pub fn load_trait_catalog(&self) -> LoadResult<TraitCatalog> {
        let path = self.data_dir.join("negative_traits.ron");
        if !path.exists() {
            tracing::info!("no negative_traits.ron, using the built-in catalog");
            return Ok(TraitCatalog::builtin());
        }
        TraitCatalogLoader::load(&path)
    }

    /// Build the engine from the configuration and the trait catalog.
    pub fn load_engine(&self) -> LoadResult<RulesEngine> {
        Ok(RulesEngine::new(self.load_config()?, self.load_trait_catalog()?))
    }

    /// Load every pack under `packs/`. A missing directory yields an empty
    /// compendium.
    pub fn load_compendium(&self) -> LoadResult<CompendiumSnapshot> {
        let dir = self.data_dir.join("packs");
        if !dir.is_dir() {
            return Ok(CompendiumSnapshot::new());
        }
        CompendiumLoader::load_dir(&dir)
    }

    /// Load `characters.ron`, normalized against `catalog`.
    pub fn load_roster(&self, catalog: &TraitCatalog) -> LoadResult<Vec<Character>> {
        let path = self.data_dir.join("characters.ron");
        RosterLoader::load(&path, catalog)
    }

    /// Load an encounter from `encounters/{name}.ron`.
    pub fn load_encounter(&self, name: &str) -> LoadResult<EncounterScript> {
        let path = self.data_dir.join("encounters").join(format!("{}.ron", name));
        EncounterLoader::load(&path)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn optional_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.load_config().unwrap(), RulesConfig::default());
        assert_eq!(factory.load_trait_catalog().unwrap(), TraitCatalog::builtin());
        assert!(factory.load_compendium().unwrap().is_empty());
        assert!(factory.load_roster(&TraitCatalog::builtin()).is_err());
    }
}
