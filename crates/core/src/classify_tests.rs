// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::{history, job_with_history};
use yare::parameterized;

#[parameterized(
    from_new = { "new" },
    from_submitpaused = { "submitpaused" },
    from_submitcooloff = { "submitcooloff" },
)]
fn created_first_pass_is_queued_first(old: &str) {
    let h = history(&[(old, "created")]);
    assert_eq!(classify(&h).unwrap(), StatusBucket::QueuedFirst);
}

#[parameterized(
    from_jobcooloff = { "jobcooloff" },
    from_jobpaused = { "jobpaused" },
)]
fn created_after_job_retry_is_queued_retry(old: &str) {
    let h = history(&[(old, "created")]);
    assert_eq!(classify(&h).unwrap(), StatusBucket::QueuedRetry);
}

#[test]
fn created_from_success_is_invalid() {
    let h = history(&[("success", "created")]);
    assert_eq!(
        classify(&h),
        Err(ClassifyError::InvalidTransition {
            old_state: "success".to_string(),
            new_state: "created".to_string(),
        })
    );
}

#[parameterized(
    cooloff_create = { "createcooloff", StatusBucket::CooloffCreate },
    cooloff_submit = { "submitcooloff", StatusBucket::CooloffSubmit },
    cooloff_job = { "jobcooloff", StatusBucket::CooloffJob },
    paused_create = { "createpaused", StatusBucket::PausedCreate },
    paused_submit = { "submitpaused", StatusBucket::PausedSubmit },
    paused_job = { "jobpaused", StatusBucket::PausedJob },
)]
fn cooloff_and_paused_states(new: &str, expected: StatusBucket) {
    let h = history(&[("executing", new)]);
    assert_eq!(classify(&h).unwrap(), expected);
}

#[test]
fn executing_after_first_create_is_submitted_first() {
    let h = history(&[("new", "created"), ("created", "executing")]);
    assert_eq!(classify(&h).unwrap(), StatusBucket::SubmittedFirst);
}

#[parameterized(
    after_jobpaused = { "jobpaused" },
    after_jobcooloff = { "jobcooloff" },
)]
fn executing_after_retry_create_is_submitted_retry(old: &str) {
    let h = history(&[(old, "created"), ("created", "executing")]);
    assert_eq!(classify(&h).unwrap(), StatusBucket::SubmittedRetry);
}

#[test]
fn executing_with_bad_lookback_is_invalid() {
    let h = history(&[("success", "created"), ("created", "executing")]);
    assert!(matches!(
        classify(&h),
        Err(ClassifyError::InvalidTransition { .. })
    ));
}

#[test]
fn executing_without_lookback_is_truncated() {
    let h = history(&[("created", "executing")]);
    assert_eq!(
        classify(&h),
        Err(ClassifyError::TruncatedHistory {
            new_state: "executing".to_string(),
            needed: 1,
        })
    );
}

#[test]
fn success_and_killed() {
    assert_eq!(
        classify(&history(&[("executing", "success")])).unwrap(),
        StatusBucket::Success
    );
    assert_eq!(
        classify(&history(&[("executing", "killed")])).unwrap(),
        StatusBucket::Canceled
    );
}

#[parameterized(
    job_failed = { "jobfailed", StatusBucket::FailureException },
    job_cooloff = { "jobcooloff", StatusBucket::FailureException },
    job_paused = { "jobpaused", StatusBucket::FailureException },
    submit_failed = { "submitfailed", StatusBucket::FailureSubmit },
    submit_cooloff = { "submitcooloff", StatusBucket::FailureSubmit },
    submit_paused = { "submitpaused", StatusBucket::FailureSubmit },
    create_failed = { "createfailed", StatusBucket::FailureCreate },
    create_cooloff = { "createcooloff", StatusBucket::FailureCreate },
    create_paused = { "createpaused", StatusBucket::FailureCreate },
)]
fn retrydone_maps_to_failure_phase(old: &str, expected: StatusBucket) {
    let h = history(&[(old, "retrydone")]);
    assert_eq!(classify(&h).unwrap(), expected);
}

#[test]
fn retrydone_from_unknown_state_is_invalid() {
    let h = history(&[("executing", "retrydone")]);
    assert!(matches!(
        classify(&h),
        Err(ClassifyError::InvalidTransition { .. })
    ));
}

#[test]
fn exhausted_uses_lookback_failure_detail() {
    let h = history(&[("jobfailed", "retrydone"), ("retrydone", "exhausted")]);
    assert_eq!(classify(&h).unwrap(), StatusBucket::FailureException);
}

#[test]
fn exhausted_without_lookback_is_truncated() {
    let h = history(&[("retrydone", "exhausted")]);
    assert_eq!(
        classify(&h),
        Err(ClassifyError::TruncatedHistory {
            new_state: "exhausted".to_string(),
            needed: 1,
        })
    );
}

#[test]
fn exhausted_not_from_retrydone_is_invalid() {
    let h = history(&[("executing", "exhausted")]);
    assert!(matches!(
        classify(&h),
        Err(ClassifyError::InvalidTransition { .. })
    ));
}

#[test]
fn cleanout_of_success_stays_success() {
    let h = history(&[("executing", "success"), ("success", "cleanout")]);
    assert_eq!(classify(&h).unwrap(), StatusBucket::Success);
}

#[test]
fn cleanout_of_killed_stays_canceled() {
    let h = history(&[("executing", "killed"), ("killed", "cleanout")]);
    assert_eq!(classify(&h).unwrap(), StatusBucket::Canceled);
}

#[test]
fn cleanout_of_exhausted_looks_back_two_steps() {
    let h = history(&[
        ("submitfailed", "retrydone"),
        ("retrydone", "exhausted"),
        ("exhausted", "cleanout"),
    ]);
    assert_eq!(classify(&h).unwrap(), StatusBucket::FailureSubmit);
}

#[test]
fn cleanout_of_exhausted_without_full_lookback_is_truncated() {
    // The transition into retrydone is missing, so the failure detail two
    // steps back cannot be recovered.
    let h = history(&[("retrydone", "exhausted"), ("exhausted", "cleanout")]);
    assert_eq!(
        classify(&h),
        Err(ClassifyError::TruncatedHistory {
            new_state: "cleanout".to_string(),
            needed: 2,
        })
    );
}

#[test]
fn cleanout_of_executing_is_invalid() {
    let h = history(&[("created", "executing"), ("executing", "cleanout")]);
    assert!(matches!(
        classify(&h),
        Err(ClassifyError::InvalidTransition { .. })
    ));
}

#[test]
fn unknown_new_state_is_transition_not_error() {
    let h = history(&[("created", "somenewstate")]);
    assert_eq!(classify(&h).unwrap(), StatusBucket::Transition);
}

#[test]
fn empty_history_is_an_error() {
    assert_eq!(classify(&[]), Err(ClassifyError::EmptyHistory));
}

// ── current_site ────────────────────────────────────────────────────────────

#[test]
fn site_is_most_recent_real_location() {
    let h = vec![
        JobStateTransition::new("new", "created"),
        JobStateTransition::at_site("created", "executing", "T1_US_FNAL"),
        JobStateTransition::at_site("executing", "jobfailed", "T2_CH_CERN"),
        JobStateTransition::new("jobfailed", "jobcooloff"),
    ];
    assert_eq!(current_site(&h), "T2_CH_CERN");
}

#[test]
fn site_defaults_to_agent_sentinel() {
    let h = history(&[("new", "created")]);
    assert_eq!(current_site(&h), NO_SITE);
    assert_eq!(current_site(&[]), NO_SITE);
}

// ── classify_batch ──────────────────────────────────────────────────────────

#[test]
fn batch_collects_errors_without_aborting() {
    let mut jobs = vec![
        job_with_history("wf1", &[("new", "created")]),
        job_with_history("wf1", &[("success", "created")]),
        job_with_history("wf2", &[("executing", "success")]),
    ];
    let outcome = classify_batch(&mut jobs);

    assert_eq!(outcome.counters.queued.first, 1);
    assert_eq!(outcome.counters.success, 1);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].index, 1);
    assert_eq!(outcome.errors[0].workflow, "wf1");
}

#[test]
fn batch_refreshes_site_on_every_job() {
    let mut job = JobRecord::new("wf1", "/Task");
    job.state_history = vec![JobStateTransition::at_site(
        "created",
        "executing",
        "T1_US_FNAL",
    )];
    // Invalid history still gets its site refreshed.
    let bad = job_with_history("wf1", &[("success", "created")]);

    let mut jobs = vec![job, bad];
    let outcome = classify_batch(&mut jobs);

    assert_eq!(jobs[0].site.as_deref(), Some("T1_US_FNAL"));
    assert_eq!(jobs[1].site.as_deref(), Some(NO_SITE));
    assert_eq!(outcome.errors.len(), 1);
}

#[test]
fn batch_buckets_by_site() {
    let mut at_site = JobRecord::new("wf1", "/Task");
    at_site.state_history = vec![
        JobStateTransition::new("new", "created"),
        JobStateTransition::at_site("created", "executing", "T1_US_FNAL"),
    ];
    let agent_side = job_with_history("wf1", &[("new", "created")]);

    let mut jobs = vec![at_site, agent_side];
    let outcome = classify_batch(&mut jobs);

    assert_eq!(outcome.sites["T1_US_FNAL"].submitted.first, 1);
    assert_eq!(outcome.sites[NO_SITE].queued.first, 1);
}
