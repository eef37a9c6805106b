//! Category discovery
//!
//! The registry never scans for categories itself. A [`CategoryDiscovery`]
//! implementation hands it the declared entity/asset pairings; the bundled
//! [`CategoryCatalog`] builds that list from explicit registration calls.

use crate::error::{RegistryError, Result};
use crate::kind::{Category, Kind};

/// Source of declared categories
pub trait CategoryDiscovery {
    /// One entry per asset kind; an `Err` covers a single kind only
    fn discover(&self) -> Vec<Result<Category>>;
}

/// Explicitly registered categories, in registration order
#[derive(Debug, Clone, Default)]
pub struct CategoryCatalog {
    entries: Vec<(Kind, Vec<Kind>)>,
}

impl CategoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `asset` as implementing the `entity` marker
    pub fn register(&mut self, entity: impl Into<Kind>, asset: impl Into<Kind>) -> &mut Self {
        let asset = asset.into();
        let entity = entity.into();
        match self.entries.iter_mut().find(|(kind, _)| *kind == asset) {
            Some((_, markers)) => {
                if !markers.contains(&entity) {
                    markers.push(entity);
                }
            }
            None => self.entries.push((asset, vec![entity])),
        }
        self
    }

    /// Builder form of [`CategoryCatalog::register`]
    pub fn with(mut self, entity: impl Into<Kind>, asset: impl Into<Kind>) -> Self {
        self.register(entity, asset);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CategoryDiscovery for CategoryCatalog {
    fn discover(&self) -> Vec<Result<Category>> {
        self.entries
            .iter()
            .map(|(asset, markers)| match markers.as_slice() {
                [entity] => Ok(Category::new(entity.clone(), asset.clone())),
                _ => Err(RegistryError::DiscoveryFailure {
                    asset: asset.to_string(),
                    reason: format!(
                        "declares {} entity markers ({}), expected exactly one",
                        markers.len(),
                        markers
                            .iter()
                            .map(Kind::as_str)
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                }),
            })
            .collect()
    }
}

impl CategoryDiscovery for Vec<Category> {
    fn discover(&self) -> Vec<Result<Category>> {
        self.iter().cloned().map(Ok).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_order() {
        let catalog = CategoryCatalog::new()
            .with("IWeapon", "SwordAsset")
            .with("IPotion", "PotionAsset");

        let found: Vec<_> = catalog.discover().into_iter().map(|c| c.unwrap()).collect();
        assert_eq!(
            found,
            vec![
                Category::new("IWeapon", "SwordAsset"),
                Category::new("IPotion", "PotionAsset"),
            ]
        );
    }

    #[test]
    fn test_repeat_registration_is_idempotent() {
        let catalog = CategoryCatalog::new()
            .with("IWeapon", "SwordAsset")
            .with("IWeapon", "SwordAsset");
        assert_eq!(catalog.len(), 1);
        assert!(catalog.discover()[0].is_ok());
    }

    #[test]
    fn test_ambiguous_asset_kind_fails_alone() {
        let catalog = CategoryCatalog::new()
            .with("IWeapon", "SwordAsset")
            .with("IPotion", "PotionAsset")
            .with("IItem", "SwordAsset");

        let found = catalog.discover();
        assert_eq!(found.len(), 2);
        match &found[0] {
            Err(RegistryError::DiscoveryFailure { asset, reason }) => {
                assert_eq!(asset, "SwordAsset");
                assert!(reason.contains("IWeapon"));
                assert!(reason.contains("IItem"));
            }
            other => panic!("Expected DiscoveryFailure, got {:?}", other),
        }
        assert!(found[1].is_ok());
    }
}
