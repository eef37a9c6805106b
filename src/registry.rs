//! Reference registry - identifier/name/locator indexes per category
//!
//! The registry owns every index and rebuilds them from scratch on each pass:
//! - one [`Bucket`] per declared category, with index-aligned identifier,
//!   locator and display name sequences
//! - a unique map from identifier to the first record seen with it
//! - a duplicate map listing every record of a colliding identifier
//!
//! A host drives it by calling [`ReferenceRegistry::mark_dirty`] on asset
//! changes and [`ReferenceRegistry::apply_pending_rebuild`] once per tick.

use crate::discovery::CategoryDiscovery;
use crate::error::{RegistryError, Result};
use crate::kind::{Category, Kind, KindHierarchy};
use crate::logging::LogGate;
use crate::record::{RawRecord, Record};
use crate::settings::RegistrySettings;
use crate::store::AssetStore;
use hashbrown::HashMap;
use std::collections::BTreeSet;
use std::fmt::Write as _;

/// Index-aligned sequences for one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub category: Category,
    pub identifiers: Vec<String>,
    pub locators: Vec<String>,
    pub names: Vec<String>,
}

impl Bucket {
    fn new(category: Category) -> Self {
        Self {
            category,
            identifiers: Vec::new(),
            locators: Vec::new(),
            names: Vec::new(),
        }
    }

    fn push(&mut self, identifier: &str, raw: &RawRecord) {
        self.identifiers.push(identifier.to_string());
        self.locators.push(raw.locator.clone());
        self.names.push(raw.display_name.clone());
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    fn position(&self, identifier: &str) -> Option<usize> {
        self.identifiers.iter().position(|id| id == identifier)
    }
}

/// Everything one rebuild pass produces
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryIndex {
    pub buckets: Vec<Bucket>,
    pub unique: HashMap<String, Record>,
    pub duplicates: HashMap<String, Vec<Record>>,
}

/// Result of one host tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing to do
    Idle,
    /// Indexes rebuilt; still dirty because the host is compiling
    Rebuilt,
    /// Indexes rebuilt and the dirty flag cleared
    Settled,
    /// A compile started while clean; nothing rebuilt, the next tick will
    Anticipated,
}

/// Type-indexed registry of referenceable records
#[derive(Debug, Clone)]
pub struct ReferenceRegistry {
    hierarchy: KindHierarchy,
    settings: RegistrySettings,
    log: LogGate,
    categories: Vec<Category>,
    index: RegistryIndex,
    initialized: bool,
    dirty: bool,
}

impl ReferenceRegistry {
    pub fn new(hierarchy: KindHierarchy, settings: RegistrySettings) -> Self {
        Self {
            hierarchy,
            log: LogGate::from_settings(&settings),
            settings,
            categories: Vec::new(),
            index: RegistryIndex::default(),
            initialized: false,
            dirty: false,
        }
    }

    pub fn hierarchy(&self) -> &KindHierarchy {
        &self.hierarchy
    }

    pub fn settings(&self) -> &RegistrySettings {
        &self.settings
    }

    /// Swap settings; takes effect for logging immediately and for duplicates at the next rebuild
    pub fn set_settings(&mut self, settings: RegistrySettings) {
        self.log = LogGate::from_settings(&settings);
        self.settings = settings;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn index(&self) -> &RegistryIndex {
        &self.index
    }

    /// Replace the category set used by the next rebuild
    pub fn declare_categories<I>(&mut self, categories: I)
    where
        I: IntoIterator<Item = Category>,
    {
        self.categories.clear();
        for category in categories {
            if !self.categories.contains(&category) {
                self.categories.push(category);
            }
        }
    }

    /// Declare every category a discovery collaborator yields, logging failures
    pub fn declare_from<D>(&mut self, discovery: &D) -> usize
    where
        D: CategoryDiscovery + ?Sized,
    {
        let mut found = Vec::new();
        for result in discovery.discover() {
            match result {
                Ok(category) => {
                    self.log.info(format_args!("Searching for: {}", category));
                    found.push(category);
                }
                Err(e) => self.log.error(format_args!("{}", e)),
            }
        }
        self.declare_categories(found);
        self.categories.len()
    }

    /// Declared categories, in declaration order
    pub fn declared_categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Discard every index and rebuild from the store
    pub fn rebuild<S>(&mut self, store: &S)
    where
        S: AssetStore + ?Sized,
    {
        let mut index = RegistryIndex::default();
        let mut collisions: Vec<String> = Vec::new();

        for category in &self.categories {
            let mut bucket = Bucket::new(category.clone());

            let records = match store.records(category) {
                Ok(records) => records,
                Err(e) => {
                    self.log.error(format_args!("{}", e));
                    index.buckets.push(bucket);
                    continue;
                }
            };

            for raw in &records {
                let Some(identifier) = raw.valid_identifier() else {
                    let err = RegistryError::InvalidRecord {
                        locator: raw.locator.clone(),
                    };
                    self.log.warn(format_args!("{} ({})", err, category));
                    continue;
                };

                bucket.push(identifier, raw);
                let record = Record::from_raw(category, identifier, raw);

                match index.unique.get(identifier) {
                    None => {
                        index.unique.insert(identifier.to_string(), record);
                    }
                    Some(_) if self.settings.allow_duplicates => {}
                    Some(first) => {
                        let first = first.clone();
                        index
                            .duplicates
                            .entry(identifier.to_string())
                            .or_insert_with(|| {
                                collisions.push(identifier.to_string());
                                vec![first]
                            })
                            .push(record);
                    }
                }
            }

            index.buckets.push(bucket);
        }

        for identifier in &collisions {
            let records = &index.duplicates[identifier];
            let err = RegistryError::DuplicateIdentifier {
                identifier: identifier.clone(),
                count: records.len(),
            };
            let locators: Vec<&str> = records.iter().map(|r| r.locator.as_str()).collect();
            self.log
                .error(format_args!("{}: {}", err, locators.join(", ")));
        }

        self.index = index;
        self.initialized = true;
    }

    /// Advance the Clean/Dirty state machine by one host tick
    ///
    /// Rebuilds whenever the registry is uninitialised or dirty, but only
    /// clears the dirty flag once the host has stopped compiling. A compile
    /// starting while clean marks the registry dirty ahead of time.
    pub fn apply_pending_rebuild<S>(&mut self, store: &mut S, is_compiling: bool) -> TickOutcome
    where
        S: AssetStore + ?Sized,
    {
        let mut rebuilt = false;
        if !self.initialized || self.dirty {
            if let Err(e) = store.flush() {
                self.log.error(format_args!("Asset store flush failed: {}", e));
            }
            self.rebuild(&*store);
            rebuilt = true;
        }

        if self.dirty && !is_compiling {
            self.dirty = false;
            self.log_summary();
            return TickOutcome::Settled;
        }

        if !self.dirty && is_compiling {
            self.dirty = true;
            if rebuilt {
                return TickOutcome::Rebuilt;
            }
            return TickOutcome::Anticipated;
        }

        if rebuilt {
            TickOutcome::Rebuilt
        } else {
            TickOutcome::Idle
        }
    }

    /// Mark dirty and apply at once, reporting tracked duplicates
    pub fn refresh<S>(&mut self, store: &mut S, is_compiling: bool) -> TickOutcome
    where
        S: AssetStore + ?Sized,
    {
        self.mark_dirty();
        let outcome = self.apply_pending_rebuild(store, is_compiling);
        if !self.index.duplicates.is_empty() {
            self.log.error(format_args!(
                "Duplicate identifiers were found: {}",
                self.index.duplicates.len()
            ));
        }
        outcome
    }

    fn log_summary(&self) {
        if self.index.buckets.is_empty() {
            self.log.info(format_args!("No referenceable assets were found"));
            return;
        }
        let mut summary = String::from("Indexed referenceables:");
        for bucket in &self.index.buckets {
            let _ = write!(summary, "\n{}: {}", bucket.category, bucket.len());
        }
        self.log.info(format_args!("{}", summary));
    }

    fn matching<'a>(
        &'a self,
        include: &'a [Kind],
        exclude: &'a [Kind],
    ) -> impl Iterator<Item = &'a Bucket> + 'a {
        self.index
            .buckets
            .iter()
            .filter(move |b| b.category.matches(&self.hierarchy, include, exclude))
    }

    /// Identifiers of every matching category, in declaration order
    pub fn query_identifiers(&self, include: &[Kind], exclude: &[Kind]) -> Vec<String> {
        self.matching(include, exclude)
            .flat_map(|b| b.identifiers.iter().cloned())
            .collect()
    }

    /// Display names, aligned with [`ReferenceRegistry::query_identifiers`]
    pub fn query_names(&self, include: &[Kind], exclude: &[Kind]) -> Vec<String> {
        self.matching(include, exclude)
            .flat_map(|b| b.names.iter().cloned())
            .collect()
    }

    /// Locators, aligned with [`ReferenceRegistry::query_identifiers`]
    pub fn query_locators(&self, include: &[Kind], exclude: &[Kind]) -> Vec<String> {
        self.matching(include, exclude)
            .flat_map(|b| b.locators.iter().cloned())
            .collect()
    }

    fn find_in<'a, I, F>(buckets: I, identifier: &str, project: F) -> Option<String>
    where
        I: IntoIterator<Item = &'a Bucket>,
        F: Fn(&'a Bucket, usize) -> &'a String,
    {
        buckets.into_iter().find_map(|b| {
            b.position(identifier)
                .map(|i| project(b, i).clone())
        })
    }

    /// Display name of `identifier` within categories compatible with `kind`
    pub fn resolve_name_in(&self, kind: &Kind, identifier: &str) -> Option<String> {
        let include = std::slice::from_ref(kind);
        Self::find_in(self.matching(include, &[]), identifier, |b, i| &b.names[i])
    }

    /// Display name of `identifier`, first match in declaration order
    pub fn resolve_name(&self, identifier: &str) -> Option<String> {
        Self::find_in(&self.index.buckets, identifier, |b, i| &b.names[i])
    }

    /// Locator of `identifier` within categories compatible with `kind`
    pub fn resolve_locator_in(&self, kind: &Kind, identifier: &str) -> Option<String> {
        let include = std::slice::from_ref(kind);
        Self::find_in(self.matching(include, &[]), identifier, |b, i| &b.locators[i])
    }

    /// Locator of `identifier`, first match in declaration order
    pub fn resolve_locator(&self, identifier: &str) -> Option<String> {
        Self::find_in(&self.index.buckets, identifier, |b, i| &b.locators[i])
    }

    /// Asset kinds compatible with a parent and with none of the excludes
    pub fn subtypes_of(&self, parents: &[Kind], exclude: &[Kind]) -> BTreeSet<Kind> {
        self.categories
            .iter()
            .filter(|c| c.matches(&self.hierarchy, parents, exclude))
            .map(|c| c.asset.clone())
            .collect()
    }

    /// Categories that own a bucket after the last rebuild
    pub fn categories(&self) -> Vec<&Category> {
        self.index.buckets.iter().map(|b| &b.category).collect()
    }

    pub fn bucket(&self, category: &Category) -> Option<&Bucket> {
        self.index.buckets.iter().find(|b| b.category == *category)
    }

    /// Locator sequence of one category
    pub fn locators_of(&self, category: &Category) -> Option<&[String]> {
        self.bucket(category).map(|b| b.locators.as_slice())
    }

    pub fn unique_record(&self, identifier: &str) -> Option<&Record> {
        self.index.unique.get(identifier)
    }

    /// Like [`ReferenceRegistry::unique_record`], as an error on a miss
    pub fn record(&self, identifier: &str) -> Result<&Record> {
        self.unique_record(identifier)
            .ok_or_else(|| RegistryError::UnresolvedReference(identifier.to_string()))
    }

    pub fn duplicates(&self) -> &HashMap<String, Vec<Record>> {
        &self.index.duplicates
    }

    pub fn is_duplicate(&self, identifier: &str) -> bool {
        self.index.duplicates.contains_key(identifier)
    }

    /// Resolve an identifier through its unique record to a store handle
    pub fn asset_with_id<S>(&self, store: &S, identifier: &str) -> Option<S::Handle>
    where
        S: AssetStore + ?Sized,
    {
        self.unique_record(identifier)
            .and_then(|r| store.resolve_locator(&r.locator))
    }
}

impl Default for ReferenceRegistry {
    fn default() -> Self {
        Self::new(KindHierarchy::default(), RegistrySettings::default())
    }
}
