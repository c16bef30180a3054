//! Translation catalog documents (`.json`, `.yaml`, `.yml`).
//!
//! A catalog is a tree of nested objects whose leaves are message strings.
//! Documents are kept in their original key order so that rewritten files
//! stay diff-friendly.

use serde_json::{Map, Value};

use crate::core::{AnalyzerError, AnalyzerResult};

/// Key reported when the document root itself is not an object.
pub const ROOT_KEY: &str = "<root>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Json,
    /// Any non-JSON catalog is read as YAML, a superset of JSON.
    Yaml,
}

impl CatalogFormat {
    pub fn from_path(path: &str) -> Self {
        if path.to_lowercase().ends_with(".json") {
            CatalogFormat::Json
        } else {
            CatalogFormat::Yaml
        }
    }
}

/// One parsed catalog file.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogFile {
    /// Relative, `/`-separated path.
    pub path: String,
    pub format: CatalogFormat,
    pub document: Map<String, Value>,
}

pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Only blank lines, comments and document markers.
fn is_blank_yaml(content: &str) -> bool {
    content.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

pub fn parse_catalog(path: &str, content: &str) -> AnalyzerResult<CatalogFile> {
    let format = CatalogFormat::from_path(path);
    let value = match format {
        CatalogFormat::Json => serde_json::from_str::<Value>(content)
            .map_err(|err| AnalyzerError::parse(path, err.to_string()))?,
        CatalogFormat::Yaml if is_blank_yaml(content) => Value::Null,
        CatalogFormat::Yaml => serde_saphyr::from_str::<Value>(content)
            .map_err(|err| AnalyzerError::parse(path, err.to_string()))?,
    };

    let document = match value {
        Value::Object(map) => map,
        // A YAML file holding only comments.
        Value::Null if format == CatalogFormat::Yaml => Map::new(),
        other => {
            return Err(AnalyzerError::InvalidCatalogValue {
                file: path.to_string(),
                key: ROOT_KEY.to_string(),
                found: value_type_name(&other),
            });
        }
    };

    Ok(CatalogFile {
        path: path.to_string(),
        format,
        document,
    })
}

/// Flatten a catalog into `(dotted.key, message)` pairs in document order.
pub fn flatten_catalog(file: &CatalogFile) -> AnalyzerResult<Vec<(String, String)>> {
    let mut entries = Vec::new();
    flatten_object(&file.document, "", &file.path, &mut entries)?;
    Ok(entries)
}

fn flatten_object(
    map: &Map<String, Value>,
    prefix: &str,
    file_path: &str,
    entries: &mut Vec<(String, String)>,
) -> AnalyzerResult<()> {
    for (key, value) in map {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            Value::Object(child) => flatten_object(child, &full_key, file_path, entries)?,
            Value::String(message) => entries.push((full_key, message.clone())),
            other => {
                return Err(AnalyzerError::InvalidCatalogValue {
                    file: file_path.to_string(),
                    key: full_key,
                    found: value_type_name(other),
                });
            }
        }
    }
    Ok(())
}

/// Rebuild nested objects from flattened entries.
pub fn unflatten<'a, I>(entries: I) -> Map<String, Value>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut root = Map::new();
    for (key, message) in entries {
        let segments: Vec<&str> = key.split('.').collect();
        insert_path(&mut root, &segments, message);
    }
    root
}

fn insert_path(map: &mut Map<String, Value>, segments: &[&str], message: &str) {
    match segments {
        [] => {}
        [leaf] => {
            map.insert(leaf.to_string(), Value::String(message.to_string()));
        }
        [head, rest @ ..] => {
            let child = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(child) = child {
                insert_path(child, rest, message);
            }
        }
    }
}

/// Serialize a catalog document back into its file format.
pub fn serialize_catalog(
    path: &str,
    format: CatalogFormat,
    document: &Map<String, Value>,
) -> AnalyzerResult<String> {
    let serialize_error = |message: String| AnalyzerError::Serialize {
        file: path.to_string(),
        message,
    };
    match format {
        CatalogFormat::Json => serde_json::to_string_pretty(document)
            .map(|json| json + "\n")
            .map_err(|err| serialize_error(err.to_string())),
        CatalogFormat::Yaml => {
            serde_saphyr::to_string(document).map_err(|err| serialize_error(err.to_string()))
        }
    }
}
