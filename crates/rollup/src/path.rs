// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dotted-path projection over serialized records.
//!
//! Filter predicates and category keys address record fields by dotted path
//! (`"sites"`, `"extra_meta.team"`). A miss is never an error; callers get
//! `None` and fall back to their own default.

use serde_json::Value;

/// Resolve a dotted path against a document. `None` on any missing segment
/// or non-object intermediate.
pub fn project<'v>(root: &'v Value, path: &str) -> Option<&'v Value> {
    let mut cur = root;
    for seg in path.split('.') {
        cur = cur.as_object()?.get(seg)?;
    }
    Some(cur)
}

/// Project to display text: strings verbatim, numbers and booleans
/// stringified, everything else (miss, null, containers) the empty string.
pub fn project_text(root: &Value, path: &str) -> String {
    match project(root, path) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
#[path = "path_tests.rs"]
mod tests;
