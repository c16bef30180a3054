use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::{AnalysisOptions, ParserPlugin, Whitelist};

/// Config file location, relative to the project root.
pub const CONFIG_FILE_PATH: &str = "config/intl-analyzer.json";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Regular expressions for keys that are never reported.
    pub whitelist: Vec<String>,
    pub error_on_unused_whitelist_entries: bool,
    pub analyze_concat_expression: bool,
    #[serde(alias = "babelParserPlugins")]
    pub parser_plugins: Vec<ParserPlugin>,
    /// Extra source extensions, e.g. `.ts` or `gjs`.
    pub extensions: Vec<String>,
    /// Extra translation helper names next to `t`.
    pub helpers: Vec<String>,
    /// Catalog globs relative to each `translations/` folder.
    pub translation_files: Option<Vec<String>>,
    /// Packages under `node_modules/` whose catalogs also define keys.
    pub external_paths: Vec<String>,
}

impl Config {
    /// Validate configuration values.
    ///
    /// Every whitelist entry must be a valid regular expression and every
    /// translation file pattern a valid glob.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.whitelist {
            Regex::new(pattern).with_context(|| {
                format!("Invalid regular expression in 'whitelist': \"{}\"", pattern)
            })?;
        }

        for pattern in self.translation_files.iter().flatten() {
            Pattern::new(pattern).with_context(|| {
                format!("Invalid glob pattern in 'translationFiles': \"{}\"", pattern)
            })?;
        }

        for extension in &self.extensions {
            if extension.trim().trim_start_matches('.').is_empty() {
                bail!("Invalid entry in 'extensions': \"{}\"", extension);
            }
        }

        for path in &self.external_paths {
            if path.trim().is_empty() || Path::new(path).is_absolute() || path.contains("..") {
                bail!("Invalid entry in 'externalPaths': \"{}\"", path);
            }
        }

        Ok(())
    }

    /// Resolve the per-run analysis options.
    pub fn analysis_options(&self) -> AnalysisOptions {
        let mut parser_plugins = Vec::new();
        for plugin in &self.parser_plugins {
            if *plugin == ParserPlugin::Unsupported {
                tracing::warn!("ignoring unsupported parser plugin in '{}'", CONFIG_FILE_PATH);
            } else if !parser_plugins.contains(plugin) {
                parser_plugins.push(*plugin);
            }
        }

        AnalysisOptions {
            parser_plugins,
            analyze_concat_expression: self.analyze_concat_expression,
            translation_files: self.translation_files.clone(),
            external_paths: self.external_paths.clone(),
            ..AnalysisOptions::default()
        }
        .with_extensions(&self.extensions)
        .with_helpers(self.helpers.iter().cloned())
    }

    pub fn whitelist(&self) -> Result<Whitelist> {
        Whitelist::compile(&self.whitelist).context("Invalid regular expression in 'whitelist'")
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// The file the config was read from, `None` when using defaults.
    pub path: Option<PathBuf>,
}

pub fn load_config(root: &Path) -> Result<ConfigLoadResult> {
    let path = root.join(CONFIG_FILE_PATH);
    if !path.is_file() {
        return Ok(ConfigLoadResult {
            config: Config::default(),
            path: None,
        });
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    config.validate()?;
    Ok(ConfigLoadResult {
        config,
        path: Some(path),
    })
}
