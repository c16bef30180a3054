//! Parsers for source dialects and catalog documents.
//!
//! - `script`: ECMAScript / TypeScript / JSX (swc)
//! - `template`: mustache-style component markup
//! - `emblem`: indentation-based templates, transpiled to markup
//! - `content_tag`: `<template>` regions of single-file components
//! - `catalog`: JSON and YAML translation catalogs

pub mod catalog;
pub mod content_tag;
pub mod emblem;
pub mod script;
pub mod template;
