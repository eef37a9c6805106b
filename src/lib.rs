//! # Referenceables
//!
//! A type-indexed registry of assets that carry a stable string identifier.
//!
//! Categories pair an abstract entity marker with the concrete asset kind that
//! implements it. The [`registry::ReferenceRegistry`] indexes every record of the
//! declared categories by identifier, display name and locator, tracks
//! identifiers shared by more than one record, and answers filtered lookups
//! using an explicit "is-a" [`kind::KindHierarchy`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use referenceables::prelude::*;
//!
//! let hierarchy = KindHierarchy::new().with("SwordAsset", ["IWeapon"]);
//! let swords = Category::new("IWeapon", "SwordAsset");
//!
//! let mut store = MemoryAssetStore::new()
//!     .with(&swords, RawRecord::new("fire_sword", "loc1", "Fire Sword"));
//!
//! let mut registry = ReferenceRegistry::new(hierarchy, RegistrySettings::default());
//! registry.declare_categories([swords]);
//! registry.apply_pending_rebuild(&mut store, false);
//!
//! assert_eq!(registry.resolve_name("fire_sword").as_deref(), Some("Fire Sword"));
//! ```

pub mod discovery;
pub mod error;
pub mod kind;
pub mod logging;
pub mod record;
pub mod registry;
pub mod search;
pub mod settings;
pub mod store;

pub mod prelude {
    //! Commonly used types and traits
    pub use crate::discovery::{CategoryCatalog, CategoryDiscovery};
    pub use crate::error::{RegistryError, Result};
    pub use crate::kind::{Category, Kind, KindHierarchy};
    pub use crate::record::{RawRecord, Record};
    pub use crate::registry::{ReferenceRegistry, TickOutcome};
    pub use crate::search::{FilteredList, SearchSession};
    pub use crate::settings::RegistrySettings;
    pub use crate::store::{AssetStore, ManifestStore, MemoryAssetStore};
}
