//! Catalog loading and flattening into a [`CatalogKeyMap`].

use std::io;
use std::path::Path;

use rayon::prelude::*;

use crate::core::keys::{CatalogKeyMap, record_key};
use crate::core::parsers::catalog::{CatalogFile, flatten_catalog, parse_catalog};
use crate::core::{AnalyzerError, AnalyzerResult};

/// Read and parse catalog files, keeping the input order.
pub fn load_catalogs<R>(root: &Path, files: &[String], read: R) -> AnalyzerResult<Vec<CatalogFile>>
where
    R: Fn(&Path) -> io::Result<String> + Sync,
{
    files
        .par_iter()
        .map(|file| -> AnalyzerResult<CatalogFile> {
            let content = read(&root.join(file)).map_err(|err| AnalyzerError::io(file, err))?;
            let catalog = parse_catalog(file, &content)?;
            tracing::debug!(file = %file, keys = catalog.document.len(), "loaded catalog");
            Ok(catalog)
        })
        .collect()
}

/// Every flattened key with the catalogs that define it.
pub fn catalog_keys(catalogs: &[CatalogFile]) -> AnalyzerResult<CatalogKeyMap> {
    let mut keys = CatalogKeyMap::new();
    for catalog in catalogs {
        for (key, _message) in flatten_catalog(catalog)? {
            record_key(&mut keys, key, &catalog.path);
        }
    }
    Ok(keys)
}
