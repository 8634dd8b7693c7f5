// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory keyed collection of merged workflow records.
//!
//! Records live for the lifetime of the process; the periodic refresh
//! replays fresh snapshots through [`WorkflowStore::bulk_upsert`]. There is
//! no eviction. Single writer; rollups fold over [`WorkflowStore::snapshot`].

use crate::merge;
use std::collections::HashMap;
use wfmon_core::{PartialRecord, WorkflowRecord};

#[derive(Debug, Default)]
pub struct WorkflowStore {
    workflows: HashMap<String, WorkflowRecord>,
    /// Latest raw report per (workflow, agent), unmerged. Some consumers
    /// need per-agent detail, e.g. which agent hosts a workflow's jobs.
    agent_records: HashMap<(String, String), PartialRecord>,
}

impl WorkflowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one agent report into the store, creating the workflow record
    /// on first sighting.
    pub fn upsert(&mut self, rec: PartialRecord) {
        let existing = self
            .workflows
            .entry(rec.workflow.clone())
            .or_insert_with(|| WorkflowRecord::new(&rec.workflow));
        merge::merge(existing, &rec);

        if !rec.agent_url.is_empty() {
            self.agent_records
                .insert((rec.workflow.clone(), rec.agent_url.clone()), rec);
        }
    }

    /// Apply [`Self::upsert`] for each record, in array order. Order only
    /// matters for last-write scalar fields.
    pub fn bulk_upsert(&mut self, recs: Vec<PartialRecord>) {
        for rec in recs {
            self.upsert(rec);
        }
    }

    pub fn get(&self, workflow: &str) -> Option<&WorkflowRecord> {
        self.workflows.get(workflow)
    }

    pub fn all(&self) -> &HashMap<String, WorkflowRecord> {
        &self.workflows
    }

    /// Owned copy for read-only rollups while the writer keeps ingesting.
    pub fn snapshot(&self) -> HashMap<String, WorkflowRecord> {
        self.workflows.clone()
    }

    /// Latest raw (unmerged) report this agent sent for the workflow.
    pub fn agent_record(&self, workflow: &str, agent_url: &str) -> Option<&PartialRecord> {
        self.agent_records
            .get(&(workflow.to_string(), agent_url.to_string()))
    }

    /// Agents that have reported the workflow, per the merged record.
    pub fn agents_for(&self, workflow: &str) -> Vec<&str> {
        self.workflows
            .get(workflow)
            .map(|rec| rec.agent_urls.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.workflows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
