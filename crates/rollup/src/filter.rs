// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Predicate filter applied before aggregation.
//!
//! Each predicate is `field path -> wanted substring`, ANDed together.
//! Empty predicate values are vacuous: an empty search box must not exclude
//! anything.

use crate::path;
use serde_json::Value;
use std::collections::HashMap;
use wfmon_core::WorkflowRecord;

/// Case-insensitive substring test of every non-empty predicate against the
/// record's projected field values.
pub fn matches(rec: &WorkflowRecord, predicates: &HashMap<String, String>) -> bool {
    if predicates.values().all(|want| want.is_empty()) {
        return true;
    }
    let doc = serde_json::to_value(rec).unwrap_or(Value::Null);

    for (field, want) in predicates {
        if want.is_empty() {
            continue;
        }
        // request_status is a history array; only the latest entry counts.
        let have = if field == "request_status" {
            rec.latest_request_status()
                .map(|s| s.status.clone())
                .unwrap_or_default()
        } else {
            path::project_text(&doc, field)
        };
        if !have.to_lowercase().contains(&want.to_lowercase()) {
            return false;
        }
    }
    true
}

/// The passing subset, as a snapshot ready for rollup.
pub fn apply(
    workflows: &HashMap<String, WorkflowRecord>,
    predicates: &HashMap<String, String>,
) -> HashMap<String, WorkflowRecord> {
    workflows
        .iter()
        .filter(|(_, rec)| matches(rec, predicates))
        .map(|(name, rec)| (name.clone(), rec.clone()))
        .collect()
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
