//! Loading specification documents from disk.
//!
//! Documents are keyed by their `file://` URL so relative `$ref`s resolve
//! against the referencing document's location.

use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use openapi_mock_core::{ref_info, MockOptions, SpecStore};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

/// Parse `path` as YAML when its extension says so, as JSON otherwise.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    );
    if is_yaml {
        serde_yaml_ng::from_str(&content)
            .with_context(|| format!("Failed to parse YAML from: {}", path.display()))
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON from: {}", path.display()))
    }
}

/// Load mock options, or the defaults when no file is given.
pub fn load_options(path: Option<&Path>) -> Result<MockOptions> {
    match path {
        Some(path) => read_document(path),
        None => Ok(MockOptions::default()),
    }
}

/// Spec key of a document on disk.
pub fn spec_key(path: &Path) -> Result<String> {
    let absolute = fs::canonicalize(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;
    Url::from_file_path(&absolute)
        .map(String::from)
        .map_err(|()| anyhow!("Cannot build a file URL for {}", absolute.display()))
}

/// Load `root` and every local document reachable through its `$ref`s.
///
/// Returns the store and the root document's spec key. Remote (`http`)
/// documents and referenced local files that do not exist are skipped with
/// a warning; resolution degrades to empty schemas for references into
/// them. A missing root or a document that fails to parse is an error.
pub fn load_specs(root: &Path) -> Result<(SpecStore, String)> {
    let root_key = spec_key(root)?;
    let mut store = SpecStore::new();
    let mut seen = HashSet::from([root_key.clone()]);
    let mut queue = VecDeque::from([root_key.clone()]);

    while let Some(key) = queue.pop_front() {
        let path = key_path(&key)?;
        if key != root_key && !path.is_file() {
            tracing::warn!(
                document = %key,
                path = %path.display(),
                "referenced document not found, references into it resolve as empty schemas"
            );
            continue;
        }
        let document: Value = read_document(&path)?;

        let mut references = Vec::new();
        collect_references(&document, &mut references);
        for reference in references {
            let info = ref_info(&reference, &key);
            let target = info.target_spec_key(&key).to_string();
            if seen.contains(&target) {
                continue;
            }
            seen.insert(target.clone());

            if target.starts_with("file:") {
                tracing::debug!(reference = %reference, document = %target, "queueing referenced document");
                queue.push_back(target);
            } else {
                tracing::warn!(reference = %reference, document = %target, "skipping remote document");
            }
        }

        store.insert(key, document);
    }

    Ok((store, root_key))
}

fn key_path(key: &str) -> Result<PathBuf> {
    let url = Url::parse(key).with_context(|| format!("Invalid document URL: {key}"))?;
    url.to_file_path()
        .map_err(|()| anyhow!("Not a local document: {key}"))
}

/// Every string `$ref` in `value`, in document order.
fn collect_references(value: &Value, references: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                match (key.as_str(), child) {
                    ("$ref", Value::String(reference)) => references.push(reference.clone()),
                    _ => collect_references(child, references),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_references(item, references);
            }
        }
        _ => {}
    }
}
