// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Canonical status buckets derived from job transition histories.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The aggregation key for a job: exactly one bucket per job at any point in
/// time. Buckets partition job counts, so no rollup double-counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusBucket {
    QueuedFirst,
    QueuedRetry,
    CooloffCreate,
    CooloffSubmit,
    CooloffJob,
    PausedCreate,
    PausedSubmit,
    PausedJob,
    SubmittedFirst,
    SubmittedRetry,
    Success,
    FailureCreate,
    FailureSubmit,
    FailureException,
    Canceled,
    /// Catch-all for a job mid-transition: a valid, if uninformative, outcome.
    /// Distinct from a classification error.
    Transition,
}

impl StatusBucket {
    /// Every bucket, for partition-invariant checks and counter iteration.
    pub const ALL: [StatusBucket; 16] = [
        StatusBucket::QueuedFirst,
        StatusBucket::QueuedRetry,
        StatusBucket::CooloffCreate,
        StatusBucket::CooloffSubmit,
        StatusBucket::CooloffJob,
        StatusBucket::PausedCreate,
        StatusBucket::PausedSubmit,
        StatusBucket::PausedJob,
        StatusBucket::SubmittedFirst,
        StatusBucket::SubmittedRetry,
        StatusBucket::Success,
        StatusBucket::FailureCreate,
        StatusBucket::FailureSubmit,
        StatusBucket::FailureException,
        StatusBucket::Canceled,
        StatusBucket::Transition,
    ];
}

impl fmt::Display for StatusBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::QueuedFirst => "queued_first",
            Self::QueuedRetry => "queued_retry",
            Self::CooloffCreate => "cooloff_create",
            Self::CooloffSubmit => "cooloff_submit",
            Self::CooloffJob => "cooloff_job",
            Self::PausedCreate => "paused_create",
            Self::PausedSubmit => "paused_submit",
            Self::PausedJob => "paused_job",
            Self::SubmittedFirst => "submitted_first",
            Self::SubmittedRetry => "submitted_retry",
            Self::Success => "success",
            Self::FailureCreate => "failure_create",
            Self::FailureSubmit => "failure_submit",
            Self::FailureException => "failure_exception",
            Self::Canceled => "canceled",
            Self::Transition => "transition",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
#[path = "bucket_tests.rs"]
mod tests;
