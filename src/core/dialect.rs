//! Source dialects and their key-extraction pipelines.

use std::collections::BTreeSet;

use enum_dispatch::enum_dispatch;

use crate::core::extract::{composite::confirmed_templates, script::script_keys, template::template_keys};
use crate::core::parsers::{
    content_tag::preprocess,
    emblem::emblem_to_markup,
    script::{ScriptSyntax, parse_script},
    template::parse_template,
};
use crate::core::{AnalysisOptions, AnalyzerResult};

/// Turns the text of one source file into the translation keys it uses.
#[enum_dispatch]
pub trait ExtractKeys {
    fn extract_keys(
        &self,
        source: &str,
        file_path: &str,
        options: &AnalysisOptions,
    ) -> AnalyzerResult<BTreeSet<String>>;
}

/// Plain script, optionally with type annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptDialect {
    pub typescript: bool,
}

/// Script with JSX.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsxDialect {
    pub typescript: bool,
}

/// Component-template markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkupDialect;

/// Indentation-based templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhitespaceTemplateDialect;

/// Script with embedded `<template>` regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositeDialect {
    pub typescript: bool,
}

#[enum_dispatch(ExtractKeys)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Script(ScriptDialect),
    Jsx(JsxDialect),
    Markup(MarkupDialect),
    WhitespaceTemplate(WhitespaceTemplateDialect),
    Composite(CompositeDialect),
}

impl Dialect {
    /// Dialect for a normalized extension (`.ts`, `.hbs`, ...).
    ///
    /// Unlisted extensions are scripts; configured parser plugins decide
    /// their grammar.
    pub fn for_extension(extension: &str) -> Self {
        match extension {
            ".ts" | ".mts" | ".cts" => ScriptDialect { typescript: true }.into(),
            ".jsx" => JsxDialect { typescript: false }.into(),
            ".tsx" => JsxDialect { typescript: true }.into(),
            ".hbs" | ".handlebars" => MarkupDialect.into(),
            ".emblem" | ".em" => WhitespaceTemplateDialect.into(),
            ".gjs" => CompositeDialect { typescript: false }.into(),
            ".gts" => CompositeDialect { typescript: true }.into(),
            _ => ScriptDialect { typescript: false }.into(),
        }
    }
}

impl ExtractKeys for ScriptDialect {
    fn extract_keys(
        &self,
        source: &str,
        file_path: &str,
        options: &AnalysisOptions,
    ) -> AnalyzerResult<BTreeSet<String>> {
        let syntax = ScriptSyntax::new(self.typescript, false).with_plugins(&options.parser_plugins);
        let module = parse_script(source, file_path, syntax)?;
        Ok(script_keys(&module, options))
    }
}

impl ExtractKeys for JsxDialect {
    fn extract_keys(
        &self,
        source: &str,
        file_path: &str,
        options: &AnalysisOptions,
    ) -> AnalyzerResult<BTreeSet<String>> {
        let syntax = ScriptSyntax::new(self.typescript, true).with_plugins(&options.parser_plugins);
        let module = parse_script(source, file_path, syntax)?;
        Ok(script_keys(&module, options))
    }
}

impl ExtractKeys for MarkupDialect {
    fn extract_keys(
        &self,
        source: &str,
        file_path: &str,
        options: &AnalysisOptions,
    ) -> AnalyzerResult<BTreeSet<String>> {
        let template = parse_template(source, file_path)?;
        Ok(template_keys(&template, options))
    }
}

impl ExtractKeys for WhitespaceTemplateDialect {
    fn extract_keys(
        &self,
        source: &str,
        file_path: &str,
        options: &AnalysisOptions,
    ) -> AnalyzerResult<BTreeSet<String>> {
        let markup = emblem_to_markup(source, file_path)?;
        MarkupDialect.extract_keys(&markup, file_path, options)
    }
}

impl ExtractKeys for CompositeDialect {
    fn extract_keys(
        &self,
        source: &str,
        file_path: &str,
        options: &AnalysisOptions,
    ) -> AnalyzerResult<BTreeSet<String>> {
        let script = preprocess(source, file_path)?;
        let syntax = ScriptSyntax::new(self.typescript, false).with_plugins(&options.parser_plugins);
        let module = parse_script(&script, file_path, syntax)?;

        let mut keys = script_keys(&module, options);
        for text in confirmed_templates(&module) {
            let template = parse_template(&text, file_path)?;
            keys.extend(template_keys(&template, options));
        }
        Ok(keys)
    }
}
