//! Source-file analysis: extension dispatch, parallel extraction and the
//! merge into a [`UsedKeyMap`].
//!
//! Each file is read and parsed on a rayon worker with its own parser state.
//! Results come back in input order and are merged sequentially, so the
//! recorded evidence does not depend on scheduling.

use std::collections::BTreeSet;
use std::io;
use std::path::Path;

use rayon::prelude::*;

use crate::core::dialect::{Dialect, ExtractKeys};
use crate::core::keys::{UsedKeyMap, record_key};
use crate::core::options::normalize_extension;
use crate::core::{AnalysisOptions, AnalyzerError, AnalyzerResult};

/// Lowercased extension of a relative path, with its leading dot.
pub fn file_extension(file: &str) -> String {
    let name = file.rsplit('/').next().unwrap_or(file);
    match name.rfind('.') {
        Some(index) if index > 0 => normalize_extension(&name[index..]),
        _ => String::new(),
    }
}

/// Extract the keys of a single file.
pub fn analyze_file<R>(
    root: &Path,
    file: &str,
    options: &AnalysisOptions,
    read: &R,
) -> AnalyzerResult<BTreeSet<String>>
where
    R: Fn(&Path) -> io::Result<String>,
{
    let extension = file_extension(file);
    if !options.extensions.contains(&extension) {
        return Err(AnalyzerError::UnknownExtension {
            extension,
            file: file.to_string(),
        });
    }

    let source = read(&root.join(file)).map_err(|err| AnalyzerError::io(file, err))?;
    let keys = Dialect::for_extension(&extension).extract_keys(&source, file, options)?;
    tracing::debug!(file, keys = keys.len(), "analyzed source file");
    Ok(keys)
}

/// Analyze every file under `root` and map each used key to its files.
///
/// The first failing file (in input order) aborts the run.
pub fn analyze_sources<R>(
    root: &Path,
    files: &[String],
    options: &AnalysisOptions,
    read: R,
) -> AnalyzerResult<UsedKeyMap>
where
    R: Fn(&Path) -> io::Result<String> + Sync,
{
    let results: Vec<(&String, AnalyzerResult<BTreeSet<String>>)> = files
        .par_iter()
        .map(|file| (file, analyze_file(root, file, options, &read)))
        .collect();

    // Sequential merge
    let mut used = UsedKeyMap::new();
    for (file, result) in results {
        for key in result? {
            record_key(&mut used, key, file);
        }
    }
    Ok(used)
}
