//! `$ref` metadata resolution.
//!
//! Turns a reference string into the document it targets and the pointer
//! segments to walk inside it. No document is touched here; the value
//! resolver materializes the target with [`crate::schema_utils::deep_get`].
//!
//! Spec keys are document identifiers. They are either absolute URLs
//! (`file:///api/petstore.yaml`) or relative paths (`petstore.yaml`);
//! external references are joined against the directory of the current
//! key with RFC 3986 semantics in both cases.

use heck::ToUpperCamelCase;
use url::Url;

use crate::schema_utils::split_pointer;

/// Base used to give relative spec keys URL join semantics.
const DEFAULT_BASE: &str = "file:///";

/// Where a `$ref` points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefInfo {
    /// Type-style name derived from the last pointer segment.
    pub name: String,
    /// Target document. `None` for local (`#/...`) references.
    pub spec_key: Option<String>,
    /// Decoded pointer segments inside the target document.
    pub ref_paths: Vec<String>,
}

impl RefInfo {
    /// Target document, defaulting to the current one for local references.
    pub fn target_spec_key<'a>(&'a self, current: &'a str) -> &'a str {
        self.spec_key.as_deref().unwrap_or(current)
    }

    /// Stable identity of the target, `{spec_key}#/{segments}`.
    pub fn target_key(&self, current: &str) -> String {
        let pointer = crate::schema_utils::build_pointer(
            "#",
            &self.ref_paths.iter().map(String::as_str).collect::<Vec<_>>(),
        );
        format!("{}{}", self.target_spec_key(current), pointer)
    }
}

/// Resolve `reference` relative to the document `current_spec_key`.
///
/// ```
/// use openapi_mock_core::resolver::ref_info;
///
/// let info = ref_info("#/components/schemas/pet-status", "api.yaml");
/// assert_eq!(info.name, "PetStatus");
/// assert_eq!(info.spec_key, None);
/// assert_eq!(info.ref_paths, vec!["components", "schemas", "pet-status"]);
///
/// let info = ref_info("../common/models.yaml#/Error", "specs/api.yaml");
/// assert_eq!(info.spec_key.as_deref(), Some("common/models.yaml"));
/// ```
pub fn ref_info(reference: &str, current_spec_key: &str) -> RefInfo {
    let (document, fragment) = match reference.split_once('#') {
        Some((document, fragment)) => (document, fragment),
        None => (reference, ""),
    };

    let ref_paths = split_pointer(fragment);
    let spec_key = (!document.is_empty()).then(|| resolve_spec_key(current_spec_key, document));

    let raw_name = ref_paths
        .last()
        .map(String::as_str)
        .unwrap_or_else(|| document_stem(document));

    RefInfo {
        name: raw_name.to_upper_camel_case(),
        spec_key,
        ref_paths,
    }
}

/// Join an external document path onto the current spec key.
///
/// Absolute URL keys produce absolute URLs. Relative keys stay relative
/// (rooted keys keep their leading `/`). A join that fails falls back to
/// the document path as written.
pub fn resolve_spec_key(current_spec_key: &str, document: &str) -> String {
    if let Ok(base) = Url::parse(current_spec_key) {
        return match base.join(document) {
            Ok(joined) => joined.to_string(),
            Err(_) => document.to_string(),
        };
    }

    let joined = Url::parse(DEFAULT_BASE)
        .and_then(|base| base.join(current_spec_key))
        .and_then(|base| base.join(document));

    match joined {
        Ok(joined) if current_spec_key.starts_with('/') => joined.path().to_string(),
        Ok(joined) => joined.path().trim_start_matches('/').to_string(),
        Err(err) => {
            tracing::debug!(current_spec_key, document, error = %err, "could not join spec key");
            document.to_string()
        }
    }
}

/// File name without directories or extension.
fn document_stem(document: &str) -> &str {
    let file = document.rsplit('/').next().unwrap_or(document);
    file.split('.').next().unwrap_or(file)
}
