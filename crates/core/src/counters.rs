// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-bucket job counters in the wire shape agents report.
//!
//! Every numeric field defaults to zero on deserialization: agents send
//! sparse documents and an absent counter means "nothing to report", never
//! an error.

use crate::bucket::StatusBucket;
use serde::{Deserialize, Deserializer, Serialize};

/// first/retry split used by the queued and submitted phases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairCounts {
    #[serde(default)]
    pub first: u64,
    #[serde(default)]
    pub retry: u64,
}

impl PairCounts {
    pub fn total(&self) -> u64 {
        self.first + self.retry
    }

    fn add(&mut self, other: &PairCounts) {
        self.first += other.first;
        self.retry += other.retry;
    }
}

/// create/submit/job split used by the cooloff and paused phases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseCounts {
    #[serde(default)]
    pub create: u64,
    #[serde(default)]
    pub submit: u64,
    #[serde(default)]
    pub job: u64,
}

impl PhaseCounts {
    pub fn total(&self) -> u64 {
        self.create + self.submit + self.job
    }

    fn add(&mut self, other: &PhaseCounts) {
        self.create += other.create;
        self.submit += other.submit;
        self.job += other.job;
    }
}

/// create/submit/exception split for terminal failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureCounts {
    #[serde(default)]
    pub create: u64,
    #[serde(default)]
    pub submit: u64,
    #[serde(default)]
    pub exception: u64,
}

impl FailureCounts {
    pub fn total(&self) -> u64 {
        self.create + self.submit + self.exception
    }

    fn add(&mut self, other: &FailureCounts) {
        self.create += other.create;
        self.submit += other.submit;
        self.exception += other.exception;
    }
}

/// Job counts keyed by status bucket, in the nested wire shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounters {
    #[serde(default)]
    pub success: u64,
    #[serde(default)]
    pub canceled: u64,
    #[serde(default)]
    pub transition: u64,
    #[serde(default)]
    pub queued: PairCounts,
    #[serde(default)]
    pub submitted: PairCounts,
    /// Older agents report cooloff as a bare integer (job-phase only); the
    /// upgrade to the split shape happens here, once, at ingestion.
    #[serde(default, deserialize_with = "cooloff_field")]
    pub cooloff: PhaseCounts,
    #[serde(default)]
    pub paused: PhaseCounts,
    #[serde(default)]
    pub failure: FailureCounts,
}

/// Versioned wire shape for the cooloff field.
#[derive(Deserialize)]
#[serde(untagged)]
enum CooloffField {
    Split(PhaseCounts),
    Legacy(u64),
    Other(serde_json::Value),
}

impl CooloffField {
    fn upgrade(self) -> PhaseCounts {
        match self {
            CooloffField::Split(c) => c,
            CooloffField::Legacy(n) => PhaseCounts { create: 0, submit: 0, job: n },
            CooloffField::Other(v) => {
                // Data error, not a crash: log and zero the field.
                tracing::warn!(value = %v, "unrecognized cooloff shape, zeroing");
                PhaseCounts::default()
            }
        }
    }
}

fn cooloff_field<'de, D>(deserializer: D) -> Result<PhaseCounts, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(CooloffField::deserialize(deserializer)?.upgrade())
}

impl StatusCounters {
    /// Count held in the given bucket.
    pub fn get(&self, bucket: StatusBucket) -> u64 {
        match bucket {
            StatusBucket::QueuedFirst => self.queued.first,
            StatusBucket::QueuedRetry => self.queued.retry,
            StatusBucket::CooloffCreate => self.cooloff.create,
            StatusBucket::CooloffSubmit => self.cooloff.submit,
            StatusBucket::CooloffJob => self.cooloff.job,
            StatusBucket::PausedCreate => self.paused.create,
            StatusBucket::PausedSubmit => self.paused.submit,
            StatusBucket::PausedJob => self.paused.job,
            StatusBucket::SubmittedFirst => self.submitted.first,
            StatusBucket::SubmittedRetry => self.submitted.retry,
            StatusBucket::Success => self.success,
            StatusBucket::FailureCreate => self.failure.create,
            StatusBucket::FailureSubmit => self.failure.submit,
            StatusBucket::FailureException => self.failure.exception,
            StatusBucket::Canceled => self.canceled,
            StatusBucket::Transition => self.transition,
        }
    }

    /// Increment the given bucket by one.
    pub fn bump(&mut self, bucket: StatusBucket) {
        let slot = match bucket {
            StatusBucket::QueuedFirst => &mut self.queued.first,
            StatusBucket::QueuedRetry => &mut self.queued.retry,
            StatusBucket::CooloffCreate => &mut self.cooloff.create,
            StatusBucket::CooloffSubmit => &mut self.cooloff.submit,
            StatusBucket::CooloffJob => &mut self.cooloff.job,
            StatusBucket::PausedCreate => &mut self.paused.create,
            StatusBucket::PausedSubmit => &mut self.paused.submit,
            StatusBucket::PausedJob => &mut self.paused.job,
            StatusBucket::SubmittedFirst => &mut self.submitted.first,
            StatusBucket::SubmittedRetry => &mut self.submitted.retry,
            StatusBucket::Success => &mut self.success,
            StatusBucket::FailureCreate => &mut self.failure.create,
            StatusBucket::FailureSubmit => &mut self.failure.submit,
            StatusBucket::FailureException => &mut self.failure.exception,
            StatusBucket::Canceled => &mut self.canceled,
            StatusBucket::Transition => &mut self.transition,
        };
        *slot += 1;
    }

    /// Bucket-wise sum of `other` into `self`.
    pub fn add(&mut self, other: &StatusCounters) {
        self.success += other.success;
        self.canceled += other.canceled;
        self.transition += other.transition;
        self.queued.add(&other.queued);
        self.submitted.add(&other.submitted);
        self.cooloff.add(&other.cooloff);
        self.paused.add(&other.paused);
        self.failure.add(&other.failure);
    }

    pub fn total_queued(&self) -> u64 {
        self.queued.total()
    }

    pub fn total_submitted(&self) -> u64 {
        self.submitted.total()
    }

    pub fn total_cooloff(&self) -> u64 {
        self.cooloff.total()
    }

    pub fn total_paused(&self) -> u64 {
        self.paused.total()
    }

    pub fn total_failure(&self) -> u64 {
        self.failure.total()
    }

    /// Sum over every bucket: the number of jobs materialized agent-side.
    pub fn wmbs_total_jobs(&self) -> u64 {
        self.success
            + self.canceled
            + self.transition
            + self.total_failure()
            + self.total_cooloff()
            + self.total_paused()
            + self.total_queued()
            + self.total_submitted()
    }
}

#[cfg(test)]
#[path = "counters_tests.rs"]
mod tests;
