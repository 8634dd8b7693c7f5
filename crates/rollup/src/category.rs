// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hierarchical rollup: group workflow records by an extracted key.
//!
//! Map- and array-valued keys fan a workflow out into every group it
//! touches, crediting its *entire* counters to each — uncapped. A workflow
//! on 3 sites counts fully in all 3 site groups, so group totals are not
//! globally conserved. That matches the dashboard's long-standing behavior
//! and is expected, not a bug.

use crate::summary::Summary;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use wfmon_core::WorkflowRecord;

/// Fallback group for workflows missing the category field.
pub const NA_KEY: &str = "NA";

/// One rollup group: member records plus their running summary. Built
/// transiently per request, never stored.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryGroup {
    pub key: String,
    pub workflows: HashMap<String, WorkflowRecord>,
    pub summary: Summary,
}

impl CategoryGroup {
    fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Default::default()
        }
    }
}

/// Which groups a record lands in for the given category key.
fn group_keys(doc: &Value, category_key: &str) -> Vec<String> {
    match crate::path::project(doc, category_key) {
        Some(Value::Object(map)) if !map.is_empty() => map.keys().cloned().collect(),
        Some(Value::Array(items)) if !items.is_empty() => items
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        Some(Value::Number(n)) => vec![n.to_string()],
        Some(Value::Bool(b)) => vec![b.to_string()],
        _ => vec![NA_KEY.to_string()],
    }
}

/// Group records by the value at `category_key` (dotted path), one summary
/// per group.
pub fn categorize(
    category_key: &str,
    workflows: &HashMap<String, WorkflowRecord>,
) -> HashMap<String, CategoryGroup> {
    let mut groups: HashMap<String, CategoryGroup> = HashMap::new();

    for (name, rec) in workflows {
        let doc = serde_json::to_value(rec).unwrap_or(Value::Null);
        for key in group_keys(&doc, category_key) {
            let group = groups
                .entry(key.clone())
                .or_insert_with(|| CategoryGroup::new(&key));
            group.workflows.insert(name.clone(), rec.clone());
            group.summary.update_from_workflow(rec);
        }
    }

    groups
}

#[cfg(test)]
#[path = "category_tests.rs"]
mod tests;
