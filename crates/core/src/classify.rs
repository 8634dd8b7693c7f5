// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job-state classifier: transition history → status bucket.
//!
//! The classifier looks at the newest transition and, for a few states, one
//! or two entries further back. An invalid transition is an error for that
//! job only; batch classification keeps going and collects per-job errors.

use crate::bucket::StatusBucket;
use crate::counters::StatusCounters;
use crate::transition::{JobRecord, JobStateTransition, NO_SITE};
use std::collections::BTreeMap;
use thiserror::Error;

/// Why a single job's history could not be classified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("empty state history")]
    EmptyHistory,
    #[error("invalid transition {old_state:?} -> {new_state:?}")]
    InvalidTransition { old_state: String, new_state: String },
    #[error("history too short: {new_state:?} needs {needed} prior transition(s)")]
    TruncatedHistory { new_state: String, needed: usize },
}

fn invalid(t: &JobStateTransition) -> ClassifyError {
    ClassifyError::InvalidTransition {
        old_state: t.old_state.clone(),
        new_state: t.new_state.clone(),
    }
}

/// Look `steps` entries behind the newest transition.
fn look_back(
    history: &[JobStateTransition],
    steps: usize,
) -> Result<&JobStateTransition, ClassifyError> {
    let last = history.len() - 1;
    history.get(last.wrapping_sub(steps)).ok_or_else(|| {
        ClassifyError::TruncatedHistory {
            new_state: history[last].new_state.clone(),
            needed: steps,
        }
    })
}

/// Failure sub-rule shared by `retrydone`, `exhausted`, and `cleanout`:
/// which phase the job last failed in, keyed on the state it failed from.
fn failure_bucket(failed_from: &str) -> Option<StatusBucket> {
    match failed_from {
        "jobfailed" | "jobcooloff" | "jobpaused" => Some(StatusBucket::FailureException),
        "submitfailed" | "submitcooloff" | "submitpaused" => Some(StatusBucket::FailureSubmit),
        "createfailed" | "createcooloff" | "createpaused" => Some(StatusBucket::FailureCreate),
        _ => None,
    }
}

/// Derive the canonical status bucket from an ordered transition history.
pub fn classify(history: &[JobStateTransition]) -> Result<StatusBucket, ClassifyError> {
    let last = history.last().ok_or(ClassifyError::EmptyHistory)?;

    match last.new_state.as_str() {
        "created" => match last.old_state.as_str() {
            "new" | "submitpaused" | "submitcooloff" => Ok(StatusBucket::QueuedFirst),
            "jobcooloff" | "jobpaused" => Ok(StatusBucket::QueuedRetry),
            _ => Err(invalid(last)),
        },

        "createcooloff" => Ok(StatusBucket::CooloffCreate),
        "submitcooloff" => Ok(StatusBucket::CooloffSubmit),
        "jobcooloff" => Ok(StatusBucket::CooloffJob),

        "createpaused" => Ok(StatusBucket::PausedCreate),
        "submitpaused" => Ok(StatusBucket::PausedSubmit),
        "jobpaused" => Ok(StatusBucket::PausedJob),

        // First submission or a retry: the transition before this one tells
        // which, via the state the job was created out of.
        "executing" => {
            let prev = look_back(history, 1)?;
            match prev.old_state.as_str() {
                "new" | "submitpaused" | "submitcooloff" => Ok(StatusBucket::SubmittedFirst),
                "jobpaused" | "jobcooloff" => Ok(StatusBucket::SubmittedRetry),
                _ => Err(invalid(prev)),
            }
        }

        "success" => Ok(StatusBucket::Success),
        "killed" => Ok(StatusBucket::Canceled),

        "retrydone" => failure_bucket(&last.old_state).ok_or_else(|| invalid(last)),

        // Retries exhausted: the failure detail sits one entry back, on the
        // transition into retrydone.
        "exhausted" => {
            if last.old_state != "retrydone" {
                return Err(invalid(last));
            }
            let prev = look_back(history, 1)?;
            failure_bucket(&prev.old_state).ok_or_else(|| invalid(prev))
        }

        // Terminal cleanup keeps the bucket of whatever it cleaned out, with
        // a two-step look-back through retrydone for the exhausted case.
        "cleanout" => match last.old_state.as_str() {
            "success" => Ok(StatusBucket::Success),
            "killed" => Ok(StatusBucket::Canceled),
            "exhausted" => {
                let prev = look_back(history, 1)?;
                if prev.old_state != "retrydone" {
                    return Err(invalid(prev));
                }
                let prev2 = look_back(history, 2)?;
                failure_bucket(&prev2.old_state).ok_or_else(|| invalid(prev2))
            }
            _ => Err(invalid(last)),
        },

        // Any other state is a job mid-transition.
        _ => Ok(StatusBucket::Transition),
    }
}

/// The job's current site: the most recent transition that happened at a
/// real site, or [`NO_SITE`] if the job never left the agent.
pub fn current_site(history: &[JobStateTransition]) -> &str {
    history
        .iter()
        .rev()
        .find(|t| t.location != NO_SITE)
        .map(|t| t.location.as_str())
        .unwrap_or(NO_SITE)
}

/// One job that failed classification within a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobError {
    pub index: usize,
    pub workflow: String,
    pub error: ClassifyError,
}

/// Result of classifying a batch of jobs: aggregate counters, per-site
/// counters, and the jobs that could not be classified. Failed jobs are
/// excluded from the counters.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub counters: StatusCounters,
    pub sites: BTreeMap<String, StatusCounters>,
    pub errors: Vec<JobError>,
}

/// Classify every job independently; one bad history never aborts the batch.
/// The site scan runs for every job, classified or not, so `site` is always
/// refreshed.
pub fn classify_batch(jobs: &mut [JobRecord]) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for (index, job) in jobs.iter_mut().enumerate() {
        let site = current_site(&job.state_history).to_string();
        job.site = Some(site.clone());

        match classify(&job.state_history) {
            Ok(bucket) => {
                outcome.counters.bump(bucket);
                outcome.sites.entry(site).or_default().bump(bucket);
            }
            Err(error) => outcome.errors.push(JobError {
                index,
                workflow: job.workflow.clone(),
                error,
            }),
        }
    }

    outcome
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
