//! Path helpers shared by reference resolution and override matching.
//!
//! Two kinds of path live side by side in this crate:
//! 1. **JSON Pointers** (RFC 6901) such as `#/components/schemas/User`, used by
//!    `$ref` values and to address nodes inside a loaded document.
//! 2. **Override paths** such as `#.user.id`, the dotted locator of a value
//!    from the root of the schema being mocked. Override keys are matched
//!    against these.

use std::borrow::Cow;

use serde_json::Value;

// ---------------------------------------------------------------------------
// JSON Pointers
// ---------------------------------------------------------------------------

/// Escape one pointer segment (`~` → `~0`, `/` → `~1`).
pub fn escape_pointer_segment(segment: &str) -> Cow<'_, str> {
    if segment.contains(['~', '/']) {
        Cow::Owned(segment.replace('~', "~0").replace('/', "~1"))
    } else {
        Cow::Borrowed(segment)
    }
}

/// Undo [`escape_pointer_segment`]. `~1` is handled before `~0` so that
/// `~01` decodes to `~1` rather than `/`.
pub fn unescape_pointer_segment(segment: &str) -> Cow<'_, str> {
    if segment.contains('~') {
        Cow::Owned(segment.replace("~1", "/").replace("~0", "~"))
    } else {
        Cow::Borrowed(segment)
    }
}

/// Append escaped segments to a pointer.
///
/// ```
/// use openapi_mock_core::schema_utils::build_pointer;
/// assert_eq!(build_pointer("#", &["paths", "/pets"]), "#/paths/~1pets");
/// ```
pub fn build_pointer(parent: &str, segments: &[&str]) -> String {
    let mut pointer = parent.to_string();
    for segment in segments {
        pointer.push('/');
        pointer.push_str(&escape_pointer_segment(segment));
    }
    pointer
}

/// Split a pointer fragment into decoded segments.
///
/// A leading `#` is optional. `#` and the empty string address the document
/// root and yield no segments.
///
/// ```
/// use openapi_mock_core::schema_utils::split_pointer;
/// assert_eq!(split_pointer("#/components/schemas/User"), vec!["components", "schemas", "User"]);
/// assert!(split_pointer("#").is_empty());
/// ```
pub fn split_pointer(pointer: &str) -> Vec<String> {
    let stripped = pointer.strip_prefix('#').unwrap_or(pointer);
    if stripped.is_empty() {
        return Vec::new();
    }

    let mut segments = stripped.split('/');
    if stripped.starts_with('/') {
        segments.next();
    }

    segments
        .map(|s| unescape_pointer_segment(s).into_owned())
        .collect()
}

/// Walk `segments` from `document`, descending through object keys and array
/// indices. Returns `None` as soon as a segment does not resolve.
pub fn deep_get<'a, S: AsRef<str>>(document: &'a Value, segments: &[S]) -> Option<&'a Value> {
    segments
        .iter()
        .try_fold(document, |node, segment| match node {
            Value::Object(map) => map.get(segment.as_ref()),
            Value::Array(items) => segment
                .as_ref()
                .parse::<usize>()
                .ok()
                .and_then(|i| items.get(i)),
            _ => None,
        })
}

// ---------------------------------------------------------------------------
// Override paths
// ---------------------------------------------------------------------------

/// Prefix shared by every override path.
pub const OVERRIDE_PATH_ROOT: &str = "#";

/// Override path of a property named `key` below `parent`.
///
/// With no parent path the property sits at the root: `#.{key}`.
pub fn child_override_path(parent: Option<&str>, key: &str) -> String {
    match parent {
        Some(parent) => format!("{parent}.{key}"),
        None => format!("{OVERRIDE_PATH_ROOT}.{key}"),
    }
}
