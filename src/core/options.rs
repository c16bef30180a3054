use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Source extensions that are always scanned.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".js", ".hbs", ".emblem"];

/// Helper name that is always treated as a translation call.
pub const DEFAULT_HELPER: &str = "t";

/// Script parser extensions that can be enabled from the config file.
///
/// Names follow the plugin names commonly used in JavaScript tooling so
/// existing configuration keeps working. Several of them are always on in
/// our parser and only exist for compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum ParserPlugin {
    #[serde(rename = "jsx")]
    Jsx,
    #[serde(rename = "typescript")]
    Typescript,
    #[serde(rename = "decorators")]
    Decorators,
    #[serde(rename = "decorators-legacy")]
    DecoratorsLegacy,
    #[serde(rename = "classProperties")]
    ClassProperties,
    #[serde(rename = "classStaticBlock")]
    ClassStaticBlock,
    #[serde(rename = "dynamicImport")]
    DynamicImport,
    #[serde(rename = "exportDefaultFrom")]
    ExportDefaultFrom,
    #[serde(rename = "functionBind")]
    FunctionBind,
    /// Anything we do not know about. Ignored with a warning.
    #[serde(other)]
    Unsupported,
}

/// Immutable per-run analysis configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Recognized source extensions, lowercase with a leading dot.
    pub extensions: BTreeSet<String>,
    pub parser_plugins: Vec<ParserPlugin>,
    /// Translation helper names; always contains `t`.
    pub helpers: Vec<String>,
    pub analyze_concat_expression: bool,
    /// Catalog glob overrides, relative to each `translations/` folder.
    pub translation_files: Option<Vec<String>>,
    /// External packages whose catalogs satisfy missing-key checks.
    pub external_paths: Vec<String>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            parser_plugins: Vec::new(),
            helpers: vec![DEFAULT_HELPER.to_string()],
            analyze_concat_expression: false,
            translation_files: None,
            external_paths: Vec::new(),
        }
    }
}

impl AnalysisOptions {
    /// Add user-declared extensions (`ts`, `.gjs`, ...) to the defaults.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions
            .extend(extensions.into_iter().map(|e| normalize_extension(e.as_ref())));
        self
    }

    /// Add custom helper names next to the default `t`.
    pub fn with_helpers<I, S>(mut self, helpers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for helper in helpers {
            let helper = helper.into();
            if !self.helpers.contains(&helper) {
                self.helpers.push(helper);
            }
        }
        self
    }

    pub fn is_translation_helper(&self, name: &str) -> bool {
        self.helpers.iter().any(|h| h == name)
    }

    pub fn has_plugin(&self, plugin: ParserPlugin) -> bool {
        self.parser_plugins.contains(&plugin)
    }
}

/// `TS` → `.ts`, `.Hbs` → `.hbs`.
pub fn normalize_extension(extension: &str) -> String {
    let extension = extension.trim().to_lowercase();
    if extension.starts_with('.') {
        extension
    } else {
        format!(".{}", extension)
    }
}
