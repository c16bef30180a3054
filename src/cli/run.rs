//! Orchestration of a single analysis run.

use std::{
    env, fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use super::{args::Arguments, report::print_step_to};
use crate::config::load_config;
use crate::core::{
    CatalogKeys, Diagnostics, analyze_sources, catalog_keys, load_catalogs, prune_catalogs,
    reconcile,
};
use crate::project::{
    find_external_catalog_files, find_own_catalog_files, find_project_root, find_source_files,
    in_repo_paths,
};

/// Outcome of a run, ready to be reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub diagnostics: Diagnostics,
    /// `--fix` was given.
    pub fix: bool,
    /// Catalog files rewritten by `--fix`.
    pub fixed_files: usize,
    /// Stale whitelist entries are errors.
    pub error_on_unused_whitelist_entries: bool,
}

fn resolve_root(args: &Arguments) -> Result<PathBuf> {
    match &args.root {
        Some(root) => root
            .canonicalize()
            .with_context(|| format!("Project directory not found: {}", root.display())),
        None => {
            let cwd = env::current_dir().context("Failed to determine the working directory")?;
            Ok(find_project_root(&cwd))
        }
    }
}

fn read_file(path: &Path) -> std::io::Result<String> {
    fs::read_to_string(path)
}

pub fn run<W: Write>(args: &Arguments, out: &mut W) -> Result<RunSummary> {
    let root = resolve_root(args)?;
    let loaded = load_config(&root)?;
    match &loaded.path {
        Some(path) => tracing::debug!(config = %path.display(), "loaded config"),
        None => tracing::debug!("no config file, using defaults"),
    }
    let config = loaded.config;
    let options = config.analysis_options();
    let whitelist = config.whitelist()?;

    print_step_to(out, 1, "🔍  Finding JS and HBS files...")?;
    let in_repo = in_repo_paths(&root)?;
    let source_files = find_source_files(&root, &options, &in_repo)?;
    tracing::debug!(count = source_files.len(), root = %root.display(), "found source files");

    print_step_to(out, 2, "🔍  Searching for translations keys in JS and HBS files...")?;
    let used = analyze_sources(&root, &source_files, &options, read_file)?;

    print_step_to(out, 3, "⚙️   Checking for unused translations...")?;
    let own_files = find_own_catalog_files(&root, &options, &in_repo)?;
    let external_files = find_external_catalog_files(&root, &options)?;
    let own_catalogs = load_catalogs(&root, &own_files, read_file)?;
    let external_catalogs = load_catalogs(&root, &external_files, read_file)?;
    let catalogs = CatalogKeys {
        own: catalog_keys(&own_catalogs)?,
        external: catalog_keys(&external_catalogs)?,
    };

    print_step_to(out, 4, "⚙️   Checking for missing translations...")?;
    let diagnostics = reconcile(&catalogs, &used, &whitelist);

    let mut fixed_files = 0;
    if args.fix && !diagnostics.unused.is_empty() {
        fixed_files = prune_catalogs(&own_catalogs, &diagnostics.unused, |path, content| {
            fs::write(root.join(path), content)
        })?;
    }

    Ok(RunSummary {
        diagnostics,
        fix: args.fix,
        fixed_files,
        error_on_unused_whitelist_entries: config.error_on_unused_whitelist_entries,
    })
}
