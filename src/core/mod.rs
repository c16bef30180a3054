//! Analysis core: key extraction, catalog reading, reconciliation and pruning.
//!
//! The core never touches the filesystem directly. File contents are read
//! through a `read` closure and rewritten catalogs are handed to a `writer`
//! closure, both supplied by the caller.
//!
//! ```text
//! source files  -> analyze_sources -> UsedKeyMap ----+
//!                                                    +-> reconcile -> Diagnostics
//! catalog files -> load_catalogs -> catalog_keys ----+
//!                        |
//!                        +-> prune_catalogs (fix mode) -> writer
//! ```

pub mod catalog_reader;
pub mod dialect;
pub mod error;
pub mod extract;
pub mod keys;
pub mod options;
pub mod parsers;
pub mod prune;
pub mod reconcile;

pub use catalog_reader::{catalog_keys, load_catalogs};
pub use dialect::{Dialect, ExtractKeys};
pub use error::{AnalyzerError, AnalyzerResult};
pub use extract::{KeyShape, analyze_sources};
pub use keys::{CatalogKeyMap, KeyMap, UsedKeyMap};
pub use options::{AnalysisOptions, ParserPlugin};
pub use parsers::catalog::CatalogFile;
pub use prune::prune_catalogs;
pub use reconcile::{CatalogKeys, Diagnostics, Whitelist, WhitelistEntry, diff, reconcile};
