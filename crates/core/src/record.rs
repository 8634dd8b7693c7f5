// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow records: the unit of aggregation.
//!
//! One logical [`WorkflowRecord`] is assembled from many [`PartialRecord`]
//! documents, one per reporting agent. Partials are decoded permissively:
//! scalar fields an agent did not report stay `None`, counters default to
//! zero, so sparse documents never fail ingestion.

use crate::counters::StatusCounters;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One entry in the request-level status history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestStatus {
    pub status: String,
    #[serde(default)]
    pub update_time: i64,
}

/// Request statuses after which no further jobs will run.
pub const TERMINAL_REQUEST_STATUSES: &[&str] = &[
    "completed",
    "closed-out",
    "announced",
    "aborted",
    "aborted-completed",
    "rejected",
    "normal-archived",
    "aborted-archived",
    "rejected-archived",
];

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        TERMINAL_REQUEST_STATUSES.contains(&self.status.as_str())
    }
}

/// Event/lumi progress of one output dataset. Index 0 in the containing
/// array is the primary output dataset by convention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputProgress {
    #[serde(default)]
    pub events: u64,
    #[serde(default)]
    pub lumis: u64,
}

/// The merged, store-resident view of one workflow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowRecord {
    pub workflow: String,
    #[serde(default)]
    pub request_status: Vec<RequestStatus>,
    #[serde(default)]
    pub status: StatusCounters,
    #[serde(default)]
    pub total_jobs: u64,
    #[serde(default)]
    pub input_events: u64,
    #[serde(default)]
    pub output_progress: Vec<OutputProgress>,
    #[serde(default)]
    pub site_white_list: Vec<String>,
    #[serde(default)]
    pub campaign: String,
    #[serde(default)]
    pub request_type: String,
    #[serde(default)]
    pub priority: i64,
    /// Job counts per CMSSW release touched by this workflow.
    #[serde(default)]
    pub cmssw_versions: BTreeMap<String, u64>,
    /// Nested per-site counters, deep-added across agent reports.
    #[serde(default)]
    pub sites: Map<String, Value>,
    /// Every agent that has reported this workflow, in first-seen order.
    #[serde(default)]
    pub agent_urls: Vec<String>,
    /// Fields outside the merge-rule table; last writer wins.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WorkflowRecord {
    pub fn new(workflow: &str) -> Self {
        Self {
            workflow: workflow.to_string(),
            ..Default::default()
        }
    }

    /// Latest entry of the request status history, by update time.
    pub fn latest_request_status(&self) -> Option<&RequestStatus> {
        self.request_status.iter().max_by_key(|s| s.update_time)
    }
}

/// One agent's report for one workflow, as fetched from the document store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartialRecord {
    pub workflow: String,
    #[serde(default)]
    pub agent_url: String,
    #[serde(default)]
    pub request_status: Vec<RequestStatus>,
    #[serde(default)]
    pub status: StatusCounters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_jobs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_events: Option<u64>,
    #[serde(default)]
    pub output_progress: Vec<OutputProgress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_white_list: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(default)]
    pub cmssw_versions: BTreeMap<String, u64>,
    #[serde(default)]
    pub sites: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PartialRecord {
    pub fn new(workflow: &str, agent_url: &str) -> Self {
        Self {
            workflow: workflow.to_string(),
            agent_url: agent_url.to_string(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
