// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Field-wise merge of agent reports into one workflow record.
//!
//! The rule table ([`rule_for`]) decides how each field combines:
//!
//! | rule        | fields                                         | behavior |
//! |-------------|------------------------------------------------|----------|
//! | `DeepAdd`   | `status`, `sites`, `cmssw_versions`, `tasks`   | recursive numeric-leaf sum, key union |
//! | `IndexAdd`  | `output_progress`                              | positional sum, longer tail verbatim |
//! | `Append`    | `agent_urls`                                   | dedup append |
//! | `LastWrite` | everything else                                | incoming overwrites when present |
//!
//! Counter merges are commutative: agent report order never changes the
//! sums. Last-write scalars are order-dependent on purpose — the feed
//! itself has no deterministic order, so neither do we.

use serde_json::{Map, Value};
use wfmon_core::{PartialRecord, WorkflowRecord};

/// How one field of an incoming report combines into the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeRule {
    LastWrite,
    DeepAdd,
    IndexAdd,
    Append,
}

/// The declarative rule table, also consulted for untyped `extra` fields so
/// new counter-shaped fields can be added without touching [`merge`].
pub fn rule_for(field: &str) -> MergeRule {
    match field {
        "status" | "sites" | "cmssw_versions" | "tasks" => MergeRule::DeepAdd,
        "output_progress" => MergeRule::IndexAdd,
        "agent_urls" => MergeRule::Append,
        _ => MergeRule::LastWrite,
    }
}

/// Recursively sum numeric leaves; union non-overlapping keys; recurse into
/// overlapping objects. Mismatched shapes fall back to last-write.
pub fn deep_add(existing: &mut Value, incoming: &Value) {
    match (existing, incoming) {
        (Value::Object(a), Value::Object(b)) => {
            for (key, v) in b {
                match a.get_mut(key) {
                    Some(slot) => deep_add(slot, v),
                    None => {
                        a.insert(key.clone(), v.clone());
                    }
                }
            }
        }
        (slot, inc) => {
            if let (Some(x), Some(y)) = (slot.as_u64(), inc.as_u64()) {
                *slot = Value::from(x + y);
            } else if let (Some(x), Some(y)) = (slot.as_f64(), inc.as_f64()) {
                *slot = Value::from(x + y);
            } else {
                *slot = inc.clone();
            }
        }
    }
}

fn deep_add_map(existing: &mut Map<String, Value>, incoming: &Map<String, Value>) {
    for (key, v) in incoming {
        match existing.get_mut(key) {
            Some(slot) => deep_add(slot, v),
            None => {
                existing.insert(key.clone(), v.clone());
            }
        }
    }
}

/// Sum numeric sub-fields at each index; indices beyond either side's length
/// are taken verbatim from the longer one.
pub fn index_aligned_add(
    existing: &mut Vec<wfmon_core::OutputProgress>,
    incoming: &[wfmon_core::OutputProgress],
) {
    for (i, p) in incoming.iter().enumerate() {
        match existing.get_mut(i) {
            Some(slot) => {
                slot.events += p.events;
                slot.lumis += p.lumis;
            }
            None => existing.push(*p),
        }
    }
}

/// Fold one agent report into the workflow aggregate. Called once per
/// incoming record, unboundedly often per workflow.
pub fn merge(existing: &mut WorkflowRecord, incoming: &PartialRecord) {
    // DeepAdd fields
    existing.status.add(&incoming.status);
    deep_add_map(&mut existing.sites, &incoming.sites);
    for (release, count) in &incoming.cmssw_versions {
        *existing.cmssw_versions.entry(release.clone()).or_insert(0) += count;
    }

    // IndexAdd
    index_aligned_add(&mut existing.output_progress, &incoming.output_progress);

    // Append
    if !incoming.agent_url.is_empty() && !existing.agent_urls.contains(&incoming.agent_url) {
        existing.agent_urls.push(incoming.agent_url.clone());
    }

    // LastWrite scalars: only fields the agent actually reported.
    if !incoming.request_status.is_empty() {
        existing.request_status = incoming.request_status.clone();
    }
    if let Some(v) = incoming.total_jobs {
        existing.total_jobs = v;
    }
    if let Some(v) = incoming.input_events {
        existing.input_events = v;
    }
    if let Some(v) = &incoming.site_white_list {
        existing.site_white_list = v.clone();
    }
    if let Some(v) = &incoming.campaign {
        existing.campaign = v.clone();
    }
    if let Some(v) = &incoming.request_type {
        existing.request_type = v.clone();
    }
    if let Some(v) = incoming.priority {
        existing.priority = v;
    }

    // Unknown fields go through the rule table.
    for (key, v) in &incoming.extra {
        match rule_for(key) {
            MergeRule::DeepAdd => match existing.extra.get_mut(key) {
                Some(slot) => deep_add(slot, v),
                None => {
                    existing.extra.insert(key.clone(), v.clone());
                }
            },
            _ => {
                existing.extra.insert(key.clone(), v.clone());
            }
        }
    }
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;
