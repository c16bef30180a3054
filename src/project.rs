//! Project layout discovery: root directory, source files and catalogs.
//!
//! All returned paths are relative to the project root, `/`-separated,
//! de-duplicated and sorted.

use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use glob::Pattern;
use serde_json::Value;

use crate::core::AnalysisOptions;

pub const PACKAGE_JSON: &str = "package.json";
pub const TRANSLATIONS_DIR: &str = "translations";
pub const DEFAULT_TRANSLATION_PATTERNS: &[&str] = &["**/*.json", "**/*.yaml", "**/*.yml"];

/// Nearest ancestor of `start` holding a `package.json`, else `start`.
pub fn find_project_root(start: &Path) -> PathBuf {
    let mut current = start.to_path_buf();
    loop {
        if current.join(PACKAGE_JSON).is_file() {
            return current;
        }
        if !current.pop() {
            return start.to_path_buf();
        }
    }
}

/// In-repo addon paths declared under `ember-addon.paths` in `package.json`.
pub fn in_repo_paths(root: &Path) -> Result<Vec<String>> {
    let path = root.join(PACKAGE_JSON);
    if !path.is_file() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let package: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let paths = package
        .pointer("/ember-addon/paths")
        .and_then(Value::as_array)
        .map(|paths| {
            paths
                .iter()
                .filter_map(Value::as_str)
                .map(|p| p.trim_end_matches('/').to_string())
                .filter(|p| !p.is_empty())
                .collect()
        })
        .unwrap_or_default();
    Ok(paths)
}

/// `root`-relative path with `/` separators.
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    Some(parts.join("/"))
}

/// Files matching any of `patterns`, each relative to `root`.
fn glob_files<I>(root: &Path, patterns: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = String>,
{
    let escaped_root = Pattern::escape(&root.to_string_lossy());
    let mut files = BTreeSet::new();
    for pattern in patterns {
        let full = format!("{}/{}", escaped_root.trim_end_matches('/'), pattern);
        let entries =
            glob::glob(&full).with_context(|| format!("Invalid glob pattern: \"{}\"", pattern))?;
        for entry in entries {
            let path = entry.with_context(|| format!("Failed to read files matching \"{}\"", pattern))?;
            if path.is_file()
                && let Some(relative) = relative_path(root, &path)
            {
                files.insert(relative);
            }
        }
    }
    Ok(files.into_iter().collect())
}

fn prefixed(base: &str, pattern: &str) -> String {
    if base.is_empty() {
        pattern.to_string()
    } else {
        format!("{}/{}", Pattern::escape(base), pattern)
    }
}

/// Source files of the app and of every in-repo addon.
pub fn find_source_files(
    root: &Path,
    options: &AnalysisOptions,
    in_repo: &[String],
) -> Result<Vec<String>> {
    let mut dirs = vec!["app".to_string()];
    for path in in_repo {
        dirs.push(format!("{}/addon", path));
        dirs.push(format!("{}/app", path));
    }

    let patterns = dirs.iter().flat_map(|dir| {
        options
            .extensions
            .iter()
            .map(move |ext| prefixed(dir, &format!("**/*{}", Pattern::escape(ext))))
    });
    glob_files(root, patterns)
}

fn translation_patterns(options: &AnalysisOptions) -> Vec<String> {
    match &options.translation_files {
        Some(patterns) => patterns.clone(),
        None => DEFAULT_TRANSLATION_PATTERNS
            .iter()
            .map(|p| p.to_string())
            .collect(),
    }
}

/// Catalogs owned by the project: its `translations/` folder and those of
/// in-repo addons.
pub fn find_own_catalog_files(
    root: &Path,
    options: &AnalysisOptions,
    in_repo: &[String],
) -> Result<Vec<String>> {
    let patterns = translation_patterns(options);
    let mut dirs = vec![TRANSLATIONS_DIR.to_string()];
    dirs.extend(in_repo.iter().map(|path| format!("{}/{}", path, TRANSLATIONS_DIR)));

    glob_files(
        root,
        dirs.iter()
            .flat_map(|dir| patterns.iter().map(move |pattern| prefixed(dir, pattern))),
    )
}

/// Catalogs of external packages listed in `externalPaths`.
pub fn find_external_catalog_files(root: &Path, options: &AnalysisOptions) -> Result<Vec<String>> {
    let patterns = translation_patterns(options);
    glob_files(
        root,
        options.external_paths.iter().flat_map(|package| {
            let dir = format!("node_modules/{}/{}", package, TRANSLATIONS_DIR);
            patterns
                .iter()
                .map(move |pattern| prefixed(&dir, pattern))
                .collect::<Vec<_>>()
        }),
    )
}
