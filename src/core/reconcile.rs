//! Missing/unused computation and whitelist accounting.

use std::collections::BTreeSet;

use regex::Regex;

use crate::core::keys::{CatalogKeyMap, KeyMap, UsedKeyMap, merge_key_maps};

/// A whitelist pattern. Matching is an unanchored search.
#[derive(Debug, Clone)]
pub struct WhitelistEntry {
    pub pattern: String,
    pub regex: Regex,
}

impl WhitelistEntry {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: pattern.to_string(),
            regex: Regex::new(pattern)?,
        })
    }
}

/// Whitelist entries in configuration order.
#[derive(Debug, Clone, Default)]
pub struct Whitelist {
    entries: Vec<WhitelistEntry>,
}

impl Whitelist {
    pub fn new(entries: Vec<WhitelistEntry>) -> Self {
        Self { entries }
    }

    pub fn compile<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = patterns
            .into_iter()
            .map(|pattern| WhitelistEntry::new(pattern.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[WhitelistEntry] {
        &self.entries
    }

    /// First entry matching `key`.
    pub fn find(&self, key: &str) -> Option<&WhitelistEntry> {
        self.entries.iter().find(|entry| entry.regex.is_match(key))
    }
}

/// Keys of `a` (trimmed) absent from `b` and not whitelisted.
///
/// The first entry exempting a key is added to `used_entries`.
pub fn diff(
    a: &KeyMap,
    b: &KeyMap,
    whitelist: &Whitelist,
    used_entries: &mut BTreeSet<String>,
) -> KeyMap {
    let mut result = KeyMap::new();
    for (key, files) in a {
        let key = key.trim();
        if b.contains_key(key) {
            continue;
        }
        if let Some(entry) = whitelist.find(key) {
            used_entries.insert(entry.pattern.clone());
            continue;
        }
        result
            .entry(key.to_string())
            .or_default()
            .extend(files.iter().cloned());
    }
    result
}

/// Catalog keys split by ownership. Only own keys may be reported unused.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogKeys {
    pub own: CatalogKeyMap,
    pub external: CatalogKeyMap,
}

impl CatalogKeys {
    pub fn all(&self) -> CatalogKeyMap {
        merge_key_maps(&self.own, &self.external)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub missing: KeyMap,
    pub unused: KeyMap,
    /// Whitelist patterns that exempted nothing, in configuration order.
    pub unused_whitelist_entries: Vec<String>,
}

impl Diagnostics {
    pub fn has_issues(&self) -> bool {
        !self.missing.is_empty() || !self.unused.is_empty()
    }
}

pub fn reconcile(catalogs: &CatalogKeys, used: &UsedKeyMap, whitelist: &Whitelist) -> Diagnostics {
    let mut used_entries = BTreeSet::new();
    let unused = diff(&catalogs.own, used, whitelist, &mut used_entries);
    let missing = diff(used, &catalogs.all(), whitelist, &mut used_entries);
    let unused_whitelist_entries = whitelist
        .entries()
        .iter()
        .filter(|entry| !used_entries.contains(&entry.pattern))
        .map(|entry| entry.pattern.clone())
        .collect();

    Diagnostics {
        missing,
        unused,
        unused_whitelist_entries,
    }
}
