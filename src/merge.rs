//! Three-tier merge of raw resource maps.
//!
//! Each locale's effective map is built by folding the tiers in ascending
//! precedence, so a key present in several tiers keeps the value of the
//! highest one: Upper over Own over Lower.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::{
    error::Error,
    locale::Locale,
    types::{RawResourceMap, ResourceKey, ResourceKind, Tiers},
};

/// The effective per-locale resources of one kind for one generation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedResourceMap<V> {
    kind: ResourceKind,
    locales: BTreeMap<Locale, BTreeMap<ResourceKey, V>>,
}

impl<V> MergedResourceMap<V> {
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn is_empty(&self) -> bool {
        self.locales.values().all(BTreeMap::is_empty)
    }

    /// Locales with at least one entry, base first.
    pub fn locales(&self) -> impl Iterator<Item = &Locale> {
        self.locales
            .iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(locale, _)| locale)
    }

    pub fn entries(&self, locale: &Locale) -> Option<&BTreeMap<ResourceKey, V>> {
        self.locales.get(locale)
    }

    pub fn get(&self, locale: &Locale, key: &str) -> Option<&V> {
        self.locales.get(locale)?.get(key)
    }

    /// The whole map, for validators working on raw shapes.
    pub fn as_raw(&self) -> &RawResourceMap<V> {
        &self.locales
    }

    /// Keys defined in the base locale; these drive code generation.
    ///
    /// Fails when other locales have entries but the base locale has none,
    /// since there is then no default to generate accessors from.
    pub fn canonical_keys(&self) -> Result<BTreeSet<&str>, Error> {
        let base: BTreeSet<&str> = self
            .locales
            .get(&Locale::Base)
            .map(|entries| entries.keys().map(String::as_str).collect())
            .unwrap_or_default();

        if base.is_empty() && !self.is_empty() {
            return Err(Error::MissingBaseLocale { kind: self.kind });
        }
        Ok(base)
    }

    /// Every locale's value for `key`, base first.
    pub fn values_for<'a>(&'a self, key: &'a str) -> impl Iterator<Item = (&'a Locale, &'a V)> {
        self.locales
            .iter()
            .filter_map(move |(locale, entries)| entries.get(key).map(|value| (locale, value)))
    }
}

/// Folds the tiers per locale: Lower, then Own, then Upper, last writer wins.
pub fn merge<V: Clone>(kind: ResourceKind, tiers: &Tiers<RawResourceMap<V>>) -> MergedResourceMap<V> {
    let mut locales: BTreeMap<Locale, BTreeMap<ResourceKey, V>> = BTreeMap::new();

    for layer in [&tiers.lower, &tiers.own, &tiers.upper] {
        for (locale, entries) in layer {
            locales
                .entry(locale.clone())
                .or_default()
                .extend(entries.iter().map(|(key, value)| (key.clone(), value.clone())));
        }
    }

    debug!(
        %kind,
        locales = locales.len(),
        keys = locales.get(&Locale::Base).map_or(0, BTreeMap::len),
        "merged resource tiers"
    );

    MergedResourceMap { kind, locales }
}
