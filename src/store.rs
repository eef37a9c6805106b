//! Asset stores backing the registry
//!
//! A store enumerates the raw records of a category and maps locators back to
//! asset handles. Two implementations ship with the crate:
//! - [`MemoryAssetStore`] for hosts that push records in directly
//! - [`ManifestStore`] reading a JSON manifest from disk

use crate::discovery::CategoryDiscovery;
use crate::error::{RegistryError, Result};
use crate::kind::Category;
use crate::record::RawRecord;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Asset store collaborator
pub trait AssetStore {
    /// Handle returned when a locator is resolved
    type Handle;

    /// All records backing `category`, in store order
    fn records(&self, category: &Category) -> Result<Vec<RawRecord>>;

    /// Persist pending changes and rescan, run before each rebuild
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// Map a locator back to its asset
    fn resolve_locator(&self, locator: &str) -> Option<Self::Handle>;
}

/// Asset handle yielded by the bundled stores
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAsset {
    pub category: Category,
    pub record: RawRecord,
}

/// In-memory asset store
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetStore {
    records: Vec<(Category, Vec<RawRecord>)>,
    unreadable: HashMap<Category, String>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to a category; categories keep their first-insertion order
    pub fn insert(&mut self, category: &Category, record: RawRecord) {
        match self.records.iter_mut().find(|(c, _)| c == category) {
            Some((_, records)) => records.push(record),
            None => self.records.push((category.clone(), vec![record])),
        }
    }

    /// Builder form of [`MemoryAssetStore::insert`]
    pub fn with(mut self, category: &Category, record: RawRecord) -> Self {
        self.insert(category, record);
        self
    }

    /// Remove every record with the given locator
    pub fn remove(&mut self, locator: &str) -> usize {
        let mut removed = 0;
        for (_, records) in self.records.iter_mut() {
            let before = records.len();
            records.retain(|r| r.locator != locator);
            removed += before - records.len();
        }
        removed
    }

    /// Make `records` fail for a category, as a store would for a corrupt asset
    pub fn mark_unreadable(&mut self, category: &Category, reason: impl Into<String>) {
        self.unreadable.insert(category.clone(), reason.into());
    }

    pub fn len(&self) -> usize {
        self.records.iter().map(|(_, records)| records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AssetStore for MemoryAssetStore {
    type Handle = StoredAsset;

    fn records(&self, category: &Category) -> Result<Vec<RawRecord>> {
        if let Some(reason) = self.unreadable.get(category) {
            return Err(RegistryError::UnreadableRecords {
                category: category.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self
            .records
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, records)| records.clone())
            .unwrap_or_default())
    }

    fn resolve_locator(&self, locator: &str) -> Option<StoredAsset> {
        self.records.iter().find_map(|(category, records)| {
            records.iter().find(|r| r.locator == locator).map(|r| StoredAsset {
                category: category.clone(),
                record: r.clone(),
            })
        })
    }
}

/// One category section of a manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestSection {
    #[serde(flatten)]
    pub category: Category,
    #[serde(default)]
    pub records: Vec<RawRecord>,
}

/// On-disk manifest layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub categories: Vec<ManifestSection>,
}

/// Asset store reading a JSON manifest
///
/// `flush` re-reads the file, so edits on disk show up at the next rebuild.
#[derive(Debug, Clone)]
pub struct ManifestStore {
    path: PathBuf,
    manifest: Manifest,
}

impl ManifestStore {
    /// Open and parse the manifest at `path`
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let manifest = Self::read(&path)?;
        Ok(Self { path, manifest })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Write a manifest to disk
    pub fn write(path: &Path, manifest: &Manifest) -> Result<()> {
        let json = serde_json::to_string_pretty(manifest)?;
        fs::write(path, json)?;
        Ok(())
    }

    fn read(path: &Path) -> Result<Manifest> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl AssetStore for ManifestStore {
    type Handle = StoredAsset;

    fn records(&self, category: &Category) -> Result<Vec<RawRecord>> {
        Ok(self
            .manifest
            .categories
            .iter()
            .filter(|section| section.category == *category)
            .flat_map(|section| section.records.iter().cloned())
            .collect())
    }

    fn flush(&mut self) -> Result<()> {
        self.manifest = Self::read(&self.path)?;
        Ok(())
    }

    fn resolve_locator(&self, locator: &str) -> Option<StoredAsset> {
        self.manifest.categories.iter().find_map(|section| {
            section
                .records
                .iter()
                .find(|r| r.locator == locator)
                .map(|r| StoredAsset {
                    category: section.category.clone(),
                    record: r.clone(),
                })
        })
    }
}

impl CategoryDiscovery for ManifestStore {
    fn discover(&self) -> Vec<Result<Category>> {
        let mut seen: Vec<&Category> = Vec::new();
        for section in &self.manifest.categories {
            if !seen.contains(&&section.category) {
                seen.push(&section.category);
            }
        }
        seen.into_iter().cloned().map(Ok).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn swords() -> Category {
        Category::new("IWeapon", "SwordAsset")
    }

    #[test]
    fn test_memory_store_records() {
        let store = MemoryAssetStore::new()
            .with(&swords(), RawRecord::new("fire_sword", "loc1", "Fire Sword"))
            .with(&swords(), RawRecord::new("ice_sword", "loc2", "Ice Sword"));

        let records = store.records(&swords()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].locator, "loc1");
        assert!(store.records(&Category::new("IPotion", "PotionAsset")).unwrap().is_empty());
    }

    #[test]
    fn test_memory_store_resolve_and_remove() {
        let mut store =
            MemoryAssetStore::new().with(&swords(), RawRecord::new("fire_sword", "loc1", "Fire Sword"));

        let handle = store.resolve_locator("loc1").unwrap();
        assert_eq!(handle.category, swords());
        assert_eq!(handle.record.display_name, "Fire Sword");
        assert!(store.resolve_locator("missing").is_none());

        assert_eq!(store.remove("loc1"), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_memory_store_resolves_in_insertion_order() {
        let bows = Category::new("IWeapon", "BowAsset");
        let mut store = MemoryAssetStore::new();
        for i in 0..16 {
            store.insert(
                &Category::new("IItem", format!("Filler{}", i)),
                RawRecord::new("x", format!("f{}", i), "Filler"),
            );
        }
        store.insert(&bows, RawRecord::new("shared", "loc-shared", "Bow Copy"));
        store.insert(&swords(), RawRecord::new("shared", "loc-shared", "Sword Copy"));

        for _ in 0..4 {
            let handle = store.resolve_locator("loc-shared").unwrap();
            assert_eq!(handle.category, bows);
            assert_eq!(handle.record.display_name, "Bow Copy");
        }
    }

    #[test]
    fn test_memory_store_unreadable() {
        let mut store = MemoryAssetStore::new();
        store.mark_unreadable(&swords(), "corrupt import");

        let err = store.records(&swords()).unwrap_err();
        assert!(err.to_string().contains("corrupt import"));
    }

    #[test]
    fn test_manifest_roundtrip_and_flush() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("manifest.json");

        let mut manifest = Manifest {
            categories: vec![ManifestSection {
                category: swords(),
                records: vec![RawRecord::new("fire_sword", "loc1", "Fire Sword")],
            }],
        };
        ManifestStore::write(&path, &manifest).unwrap();

        let mut store = ManifestStore::open(&path).unwrap();
        assert_eq!(store.records(&swords()).unwrap().len(), 1);
        assert_eq!(store.discover().len(), 1);

        manifest.categories[0]
            .records
            .push(RawRecord::new("ice_sword", "loc2", "Ice Sword"));
        ManifestStore::write(&path, &manifest).unwrap();

        assert_eq!(store.records(&swords()).unwrap().len(), 1);
        store.flush().unwrap();
        assert_eq!(store.records(&swords()).unwrap().len(), 2);
        assert_eq!(store.resolve_locator("loc2").unwrap().record.display_name, "Ice Sword");
    }

    #[test]
    fn test_manifest_flat_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("manifest.json");
        fs::write(
            &path,
            r#"{"categories": [{"entity": "IWeapon", "asset": "SwordAsset",
                "records": [{"locator": "loc9", "display_name": "Nameless"}]}]}"#,
        )
        .unwrap();

        let store = ManifestStore::open(&path).unwrap();
        let records = store.records(&swords()).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].identifier.is_none());
    }

    #[test]
    fn test_manifest_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(ManifestStore::open(dir.path().join("absent.json")).is_err());
    }
}
