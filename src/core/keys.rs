//! Key-to-evidence maps shared by every pipeline stage.

use std::collections::{BTreeMap, BTreeSet};

/// Translation key → files that reference (or define) it.
pub type KeyMap = BTreeMap<String, BTreeSet<String>>;

/// Keys referenced in source files, with the referencing files.
pub type UsedKeyMap = KeyMap;

/// Keys defined in catalog files, with the defining files.
pub type CatalogKeyMap = KeyMap;

/// Record that `file` is evidence for `key`. A file is recorded once per key.
pub fn record_key(map: &mut KeyMap, key: impl Into<String>, file: &str) {
    map.entry(key.into()).or_default().insert(file.to_string());
}

/// Union of two key maps; evidence files of shared keys are merged.
pub fn merge_key_maps(left: &KeyMap, right: &KeyMap) -> KeyMap {
    let mut merged = left.clone();
    for (key, files) in right {
        merged
            .entry(key.clone())
            .or_default()
            .extend(files.iter().cloned());
    }
    merged
}

#[cfg(test)]
mod tests {
    use crate::core::keys::*;

    #[test]
    fn test_record_key_set_semantics() {
        let mut map = KeyMap::new();
        record_key(&mut map, "hello.world", "app/a.js");
        record_key(&mut map, "hello.world", "app/a.js");
        record_key(&mut map, "hello.world", "app/b.hbs");

        assert_eq!(map.len(), 1);
        assert_eq!(map["hello.world"].len(), 2);
    }

    #[test]
    fn test_merge_key_maps() {
        let mut left = KeyMap::new();
        record_key(&mut left, "a", "translations/en.json");
        let mut right = KeyMap::new();
        record_key(&mut right, "a", "node_modules/addon/translations/en.json");
        record_key(&mut right, "b", "node_modules/addon/translations/en.json");

        let merged = merge_key_maps(&left, &right);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged["a"].len(), 2);
        assert_eq!(merged["b"].len(), 1);
    }
}
