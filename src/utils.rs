//! Common utility functions shared across the codebase.

use crate::core::{AnalyzerError, AnalyzerResult};

const TRANSLATIONS_PREFIX: &str = "translations/";

/// Joins file paths into prose for the report.
///
/// Files are sorted and the leading `translations/` folder is dropped.
///
/// # Examples
///
/// ```
/// use intl_analyzer::utils::generate_file_list;
///
/// assert_eq!(generate_file_list(["translations/en.json"]).unwrap(), "en.json");
/// assert_eq!(
///     generate_file_list(["b.hbs", "a.js"]).unwrap(),
///     "a.js and b.hbs"
/// );
/// assert!(generate_file_list(Vec::<String>::new()).is_err());
/// ```
pub fn generate_file_list<I, S>(files: I) -> AnalyzerResult<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut files: Vec<String> = files
        .into_iter()
        .map(|file| {
            let file = file.as_ref();
            file.strip_prefix(TRANSLATIONS_PREFIX)
                .unwrap_or(file)
                .to_string()
        })
        .collect();
    files.sort();

    match files.as_slice() {
        [] => Err(AnalyzerError::EmptyFileList),
        [only] => Ok(only.clone()),
        [init @ .., last] => Ok(format!("{} and {}", init.join(", "), last)),
    }
}
