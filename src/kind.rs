//! Entity markers, asset kinds and the "is-a" relation between them

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of an entity marker or a concrete asset kind
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kind(String);

impl Kind {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Kind {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Kind {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Declared pairing of an entity marker with the asset kind implementing it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    /// Abstract entity marker
    pub entity: Kind,
    /// Concrete asset kind
    pub asset: Kind,
}

impl Category {
    pub fn new(entity: impl Into<Kind>, asset: impl Into<Kind>) -> Self {
        Self {
            entity: entity.into(),
            asset: asset.into(),
        }
    }

    /// True when either side of the pairing is compatible with `kind`
    pub fn is_a(&self, hierarchy: &KindHierarchy, kind: &Kind) -> bool {
        hierarchy.is_compatible(&self.entity, kind) || hierarchy.is_compatible(&self.asset, kind)
    }

    /// True when the category is an `include` kind and none of the `exclude` kinds
    pub fn matches(&self, hierarchy: &KindHierarchy, include: &[Kind], exclude: &[Kind]) -> bool {
        if exclude.iter().any(|kind| self.is_a(hierarchy, kind)) {
            return false;
        }
        include.iter().any(|kind| self.is_a(hierarchy, kind))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.asset, self.entity)
    }
}

/// Explicit "is-a" graph over kinds
///
/// Parents are declared up front; the transitive closure is recomputed after
/// every declaration so compatibility checks are a single set lookup.
#[derive(Debug, Clone, Default)]
pub struct KindHierarchy {
    parents: HashMap<Kind, Vec<Kind>>,
    ancestors: HashMap<Kind, HashSet<Kind>>,
}

impl KindHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `kind` as a direct child of each of `parents`
    pub fn declare<K, I, P>(&mut self, kind: K, parents: I) -> &mut Self
    where
        K: Into<Kind>,
        I: IntoIterator<Item = P>,
        P: Into<Kind>,
    {
        let entry = self.parents.entry(kind.into()).or_default();
        for parent in parents {
            let parent = parent.into();
            if !entry.contains(&parent) {
                entry.push(parent);
            }
        }
        self.recompute();
        self
    }

    /// Builder form of [`KindHierarchy::declare`]
    pub fn with<K, I, P>(mut self, kind: K, parents: I) -> Self
    where
        K: Into<Kind>,
        I: IntoIterator<Item = P>,
        P: Into<Kind>,
    {
        self.declare(kind, parents);
        self
    }

    /// True when `child` is `ancestor` or reaches it through declared parents
    pub fn is_compatible(&self, child: &Kind, ancestor: &Kind) -> bool {
        child == ancestor
            || self
                .ancestors
                .get(child)
                .is_some_and(|set| set.contains(ancestor))
    }

    /// Direct parents of a kind
    pub fn parents_of(&self, kind: &Kind) -> &[Kind] {
        self.parents.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    fn recompute(&mut self) {
        let mut ancestors = HashMap::with_capacity(self.parents.len());
        for kind in self.parents.keys() {
            let mut seen = HashSet::new();
            let mut stack: Vec<&Kind> = self.parents_of(kind).iter().collect();
            while let Some(next) = stack.pop() {
                if seen.insert(next.clone()) {
                    stack.extend(self.parents_of(next));
                }
            }
            ancestors.insert(kind.clone(), seen);
        }
        self.ancestors = ancestors;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> KindHierarchy {
        KindHierarchy::new()
            .with("IWeapon", ["IItem"])
            .with("SwordAsset", ["IWeapon"])
            .with("PotionAsset", ["IItem"])
    }

    #[test]
    fn test_self_compatibility() {
        let hierarchy = KindHierarchy::new();
        assert!(hierarchy.is_compatible(&"Unknown".into(), &"Unknown".into()));
        assert!(!hierarchy.is_compatible(&"Unknown".into(), &"Other".into()));
    }

    #[test]
    fn test_transitive_compatibility() {
        let hierarchy = items();
        assert!(hierarchy.is_compatible(&"SwordAsset".into(), &"IItem".into()));
        assert!(hierarchy.is_compatible(&"SwordAsset".into(), &"IWeapon".into()));
        assert!(!hierarchy.is_compatible(&"IItem".into(), &"SwordAsset".into()));
        assert!(!hierarchy.is_compatible(&"PotionAsset".into(), &"IWeapon".into()));
    }

    #[test]
    fn test_cycle_terminates() {
        let hierarchy = KindHierarchy::new().with("A", ["B"]).with("B", ["A"]);
        assert!(hierarchy.is_compatible(&"A".into(), &"B".into()));
        assert!(hierarchy.is_compatible(&"B".into(), &"A".into()));
    }

    #[test]
    fn test_category_matching() {
        let hierarchy = items();
        let sword = Category::new("IWeapon", "SwordAsset");

        assert!(sword.matches(&hierarchy, &["IItem".into()], &[]));
        assert!(!sword.matches(&hierarchy, &["IItem".into()], &["IWeapon".into()]));
        assert!(!sword.matches(&hierarchy, &["IItem".into()], &["SwordAsset".into()]));
        assert!(!sword.matches(&hierarchy, &[], &[]));
    }

    #[test]
    fn test_duplicate_parent_declaration() {
        let mut hierarchy = KindHierarchy::new();
        hierarchy.declare("A", ["B"]).declare("A", ["B", "C"]);
        assert_eq!(hierarchy.parents_of(&"A".into()).len(), 2);
    }
}
