//! Key extraction rules, one module per source dialect.
//!
//! Every rule lowers call arguments into a [`KeyShape`] and records the
//! literal candidates it resolves to.

pub mod composite;
pub mod file_analyzer;
pub mod key_shape;
pub mod script;
pub mod template;

pub use file_analyzer::{analyze_file, analyze_sources};
pub use key_shape::KeyShape;
