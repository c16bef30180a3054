//! intl-analyzer - missing and unused translation finder
//!
//! Scans the scripts and templates of a component-based front-end project
//! for translation keys and compares them with the project's translation
//! catalogs. Unused keys can be removed from the catalogs automatically.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (arguments, run, report)
//! - `config`: Configuration file loading and parsing
//! - `core`: Extraction, reconciliation and pruning engine
//! - `logging`: Diagnostic logging setup
//! - `project`: Source and catalog file discovery
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod logging;
pub mod project;
pub mod utils;
