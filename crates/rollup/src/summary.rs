// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Running-total summary over a set of workflow records.
//!
//! Never persisted, always recomputed as a pure fold. Derived quantities
//! are computed on demand from the accumulated counters, never cached.

use serde::Serialize;
use wfmon_core::{Clock, RequestStatus, StatusCounters, WorkflowRecord};

/// Sentinel for "not enough data to estimate".
pub const ESTIMATE_UNKNOWN: i64 = -1;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    pub status: StatusCounters,
    /// Number of workflows folded in.
    pub length: u64,
    pub total_events: u64,
    /// Events of the primary output dataset (`output_progress[0]` by
    /// convention) summed across workflows.
    pub processed_events: u64,
    /// Sum of the per-request estimated job totals.
    pub total_jobs_estimate: u64,
    /// Most recent request-level status seen across folded workflows.
    pub latest_status: Option<RequestStatus>,
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one workflow's counters and progress into the totals.
    pub fn update_from_workflow(&mut self, rec: &WorkflowRecord) {
        self.status.add(&rec.status);
        self.length += 1;
        self.total_events += rec.input_events;
        self.processed_events += rec.output_progress.first().map(|p| p.events).unwrap_or(0);
        self.total_jobs_estimate += rec.total_jobs;
        if let Some(s) = rec.latest_request_status() {
            self.take_later_status(s);
        }
    }

    /// Combine two summaries (e.g. per-group partials into a grand total).
    pub fn merge(&mut self, other: &Summary) {
        self.status.add(&other.status);
        self.length += other.length;
        self.total_events += other.total_events;
        self.processed_events += other.processed_events;
        self.total_jobs_estimate += other.total_jobs_estimate;
        if let Some(s) = &other.latest_status {
            self.take_later_status(s);
        }
    }

    fn take_later_status(&mut self, s: &RequestStatus) {
        let newer = self
            .latest_status
            .as_ref()
            .map(|cur| s.update_time > cur.update_time)
            .unwrap_or(true);
        if newer {
            self.latest_status = Some(s.clone());
        }
    }

    pub fn total_failure(&self) -> u64 {
        self.status.total_failure()
    }

    pub fn total_cooloff(&self) -> u64 {
        self.status.total_cooloff()
    }

    pub fn total_paused(&self) -> u64 {
        self.status.total_paused()
    }

    pub fn total_queued(&self) -> u64 {
        self.status.total_queued()
    }

    pub fn total_submitted(&self) -> u64 {
        self.status.total_submitted()
    }

    /// Jobs materialized agent-side: the sum over every bucket.
    pub fn wmbs_total_jobs(&self) -> u64 {
        self.status.wmbs_total_jobs()
    }

    /// Jobs that reached a terminal outcome (success or final failure).
    pub fn completed_jobs(&self) -> u64 {
        self.status.success + self.status.total_failure()
    }

    /// Seconds left until completion, by linear extrapolation from the time
    /// spent in the current request status.
    ///
    /// Known to be rough (the source acknowledges as much); operators rely
    /// on its exact behavior, so the formula is preserved as-is:
    /// `time_left = duration / (completion_ratio * injection_ratio) - duration`.
    /// Returns [`ESTIMATE_UNKNOWN`] when nothing has completed yet or a
    /// denominator is empty, and `0` once the request status is terminal.
    pub fn estimate_completion_time<C: Clock>(&self, clock: &C) -> i64 {
        let completed = self.completed_jobs();
        if completed == 0 {
            return ESTIMATE_UNKNOWN;
        }
        let latest = match &self.latest_status {
            Some(s) => s,
            None => return ESTIMATE_UNKNOWN,
        };
        if latest.is_terminal() {
            return 0;
        }

        let total_excl_canceled = self.wmbs_total_jobs() - self.status.canceled;
        if total_excl_canceled == 0 || self.total_jobs_estimate == 0 {
            return ESTIMATE_UNKNOWN;
        }

        let duration = (clock.epoch_secs() - latest.update_time) as f64;
        if duration <= 0.0 {
            return ESTIMATE_UNKNOWN;
        }
        let completion_ratio = completed as f64 / total_excl_canceled as f64;
        let injection_ratio = self.wmbs_total_jobs() as f64 / self.total_jobs_estimate as f64;

        let time_left = duration / (completion_ratio * injection_ratio) - duration;
        time_left as i64
    }
}

#[cfg(test)]
#[path = "summary_tests.rs"]
mod tests;
