//! Removal of unused keys from catalog documents (fix mode).
//!
//! Documents are rebuilt rather than edited in place. A key is removed by
//! deleting the literal entry at the current level when one exists, otherwise
//! by descending into a child object whose name is a dotted prefix of the key.
//! Objects left empty by a removal are dropped as well, up to the root.

use std::collections::{HashMap, HashSet};
use std::io;

use serde_json::{Map, Value};

use crate::core::keys::KeyMap;
use crate::core::parsers::catalog::{CatalogFile, serialize_catalog};
use crate::core::{AnalyzerError, AnalyzerResult};

/// Whether `key` resolves to an entry of `map`, literally or through nested objects.
fn contains_key_path(map: &Map<String, Value>, key: &str) -> bool {
    map.contains_key(key)
        || map.iter().any(|(name, value)| match value {
            Value::Object(child) => key
                .strip_prefix(name.as_str())
                .and_then(|rest| rest.strip_prefix('.'))
                .is_some_and(|rest| contains_key_path(child, rest)),
            _ => false,
        })
}

/// The child object a dotted key descends into, with the remaining key.
fn route<'m, 'k>(map: &'m Map<String, Value>, key: &'k str) -> Option<(&'m str, &'k str)> {
    map.iter().find_map(|(name, value)| {
        let Value::Object(child) = value else {
            return None;
        };
        let rest = key.strip_prefix(name.as_str())?.strip_prefix('.')?;
        contains_key_path(child, rest).then_some((name.as_str(), rest))
    })
}

/// `map` without `keys`, rebuilt in one pass, or `None` when none is present.
pub fn remove_keys(map: &Map<String, Value>, keys: &[&str]) -> Option<Map<String, Value>> {
    let mut removed: HashSet<&str> = HashSet::new();
    let mut routed: HashMap<&str, Vec<&str>> = HashMap::new();
    for &key in keys {
        if map.contains_key(key) {
            removed.insert(key);
        } else if let Some((name, rest)) = route(map, key) {
            routed.entry(name).or_default().push(rest);
        }
    }
    if removed.is_empty() && routed.is_empty() {
        return None;
    }

    let rebuilt = map
        .iter()
        .filter(|(name, _)| !removed.contains(name.as_str()))
        .filter_map(|(name, value)| {
            let pruned = match (value, routed.get(name.as_str())) {
                (Value::Object(child), Some(rest)) => remove_keys(child, rest),
                _ => None,
            };
            match pruned {
                Some(pruned) if pruned.is_empty() => None,
                Some(pruned) => Some((name.clone(), Value::Object(pruned))),
                None => Some((name.clone(), value.clone())),
            }
        })
        .collect();
    Some(rebuilt)
}

/// `map` without `key`, or `None` when `key` is not present.
pub fn remove_key(map: &Map<String, Value>, key: &str) -> Option<Map<String, Value>> {
    remove_keys(map, &[key])
}

/// Remove unused keys from the catalogs that define them and hand every
/// modified document to `writer`. Returns the number of files written.
pub fn prune_catalogs<W>(catalogs: &[CatalogFile], unused: &KeyMap, mut writer: W) -> AnalyzerResult<usize>
where
    W: FnMut(&str, &str) -> io::Result<()>,
{
    let mut written = 0;
    for catalog in catalogs {
        let keys: Vec<&str> = unused
            .iter()
            .filter(|(_, files)| files.contains(&catalog.path))
            .map(|(key, _)| key.as_str())
            .collect();
        let Some(document) = remove_keys(&catalog.document, &keys) else {
            continue;
        };

        let content = serialize_catalog(&catalog.path, catalog.format, &document)?;
        writer(&catalog.path, &content).map_err(|err| AnalyzerError::io(&catalog.path, err))?;
        tracing::debug!(file = %catalog.path, removed = keys.len(), "pruned catalog");
        written += 1;
    }
    Ok(written)
}
