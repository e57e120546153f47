//! Compendium pack loader.

use std::path::Path;

use unicreon_core::{CompendiumEntry, CompendiumSnapshot};

use crate::loaders::{LoadResult, read_file};

/// Loads every `*.ron` file of a directory as one pack named after the file.
///
/// ```text
/// packs/
///   ├── competences.ron
///   └── equipement.ron
/// ```
pub struct CompendiumLoader;

impl CompendiumLoader {
    pub fn load_dir(dir: &Path) -> LoadResult<CompendiumSnapshot> {
        let mut paths = std::fs::read_dir(dir)
            .map_err(|e| anyhow::anyhow!("Failed to list packs in {}: {}", dir.display(), e))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "ron"))
            .collect::<Vec<_>>();
        paths.sort();

        let mut snapshot = CompendiumSnapshot::new();
        for path in paths {
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let entries = Self::load_pack(&path)?;
            tracing::debug!(pack = name, entries = entries.len(), "compendium pack loaded");
            snapshot.insert_pack(name, entries);
        }
        Ok(snapshot)
    }

    pub fn load_pack(path: &Path) -> LoadResult<Vec<CompendiumEntry>> {
        let content = read_file(path)?;
        Self::parse_pack(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse pack at {:?}: {}", path, e))
    }

    pub fn parse_pack(content: &str) -> LoadResult<Vec<CompendiumEntry>> {
        let entries: Vec<CompendiumEntry> = ron::from_str(content)?;
        if let Some(entry) = entries.iter().find(|e| e.id.trim().is_empty()) {
            anyhow::bail!("entry {:?} has an empty id", entry.item.name);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use unicreon_core::{GrantSpec, ItemKind, ItemSource};

    use super::*;

    const SKILLS: &str = r#"[
        (id: "riposte", item: (name: "Riposte", kind: Skill, level: Some("d6"))),
        (id: "esquive", item: (name: "Esquive", kind: Skill)),
    ]"#;

    #[test]
    fn loads_one_pack_per_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("competences.ron"), SKILLS).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let snapshot = CompendiumLoader::load_dir(dir.path()).unwrap();
        assert_eq!(snapshot.pack_names().collect::<Vec<_>>(), vec!["competences"]);
        assert_eq!(snapshot.len(), 2);

        let found = snapshot
            .lookup(&GrantSpec {
                name: Some("riposte".into()),
                ..GrantSpec::default()
            })
            .unwrap();
        assert_eq!(found.kind, ItemKind::Skill);
        assert_eq!(found.level.map(|d| d.faces()), Some(6));
    }

    #[test]
    fn empty_ids_are_rejected() {
        let bad = r#"[(id: " ", item: (name: "Sans id", kind: Skill))]"#;
        assert!(CompendiumLoader::parse_pack(bad).is_err());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CompendiumLoader::load_dir(&dir.path().join("absent")).is_err());
    }
}
