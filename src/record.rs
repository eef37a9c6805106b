//! Referenceable records as indexed by the registry

use crate::kind::Category;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Record as yielded by an asset store, before validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Identifier read from the asset; `None` when the asset never assigned one
    #[serde(default)]
    pub identifier: Option<String>,
    /// Opaque handle back to the asset (content-addressed id, path, ...)
    pub locator: String,
    /// Human readable name
    pub display_name: String,
}

impl RawRecord {
    pub fn new(
        identifier: impl Into<String>,
        locator: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            identifier: Some(identifier.into()),
            locator: locator.into(),
            display_name: display_name.into(),
        }
    }

    /// Record whose asset has no identifier
    pub fn anonymous(locator: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            identifier: None,
            locator: locator.into(),
            display_name: display_name.into(),
        }
    }

    /// The identifier, if present and non-empty
    pub fn valid_identifier(&self) -> Option<&str> {
        self.identifier.as_deref().filter(|id| !id.is_empty())
    }
}

/// One indexed asset instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    pub category: Category,
    pub identifier: String,
    pub locator: String,
    pub display_name: String,
}

impl Record {
    pub(crate) fn from_raw(category: &Category, identifier: &str, raw: &RawRecord) -> Self {
        Self {
            category: category.clone(),
            identifier: identifier.to_string(),
            locator: raw.locator.clone(),
            display_name: raw.display_name.clone(),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}' [{}] @ {}",
            self.category.asset, self.display_name, self.identifier, self.locator
        )
    }
}
