// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::counters::{FailureCounts, PairCounts, PhaseCounts, StatusCounters};
use crate::record::PartialRecord;
use crate::transition::{JobRecord, JobStateTransition};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for counter and record types.
pub mod strategies {
    use super::*;
    use proptest::prelude::*;

    // Small ranges keep shrunk failures readable.
    fn arb_count() -> impl Strategy<Value = u64> {
        0u64..1000
    }

    pub fn arb_status_counters() -> impl Strategy<Value = StatusCounters> {
        (
            (arb_count(), arb_count(), arb_count()),
            (arb_count(), arb_count()),
            (arb_count(), arb_count()),
            (arb_count(), arb_count(), arb_count()),
            (arb_count(), arb_count(), arb_count()),
            (arb_count(), arb_count(), arb_count()),
        )
            .prop_map(
                |(
                    (success, canceled, transition),
                    (qf, qr),
                    (sf, sr),
                    (cc, cs, cj),
                    (pc, ps, pj),
                    (fc, fs, fe),
                )| StatusCounters {
                    success,
                    canceled,
                    transition,
                    queued: PairCounts { first: qf, retry: qr },
                    submitted: PairCounts { first: sf, retry: sr },
                    cooloff: PhaseCounts { create: cc, submit: cs, job: cj },
                    paused: PhaseCounts { create: pc, submit: ps, job: pj },
                    failure: FailureCounts { create: fc, submit: fs, exception: fe },
                },
            )
    }

    pub fn arb_partial_record(workflow: &'static str) -> impl Strategy<Value = PartialRecord> {
        (arb_status_counters(), "agent[0-9]", arb_count()).prop_map(
            move |(status, agent, total)| {
                let mut rec = PartialRecord::new(workflow, &agent);
                rec.status = status;
                rec.total_jobs = Some(total);
                rec
            },
        )
    }
}

// ── History factory functions ───────────────────────────────────────────────

/// A history walking a job from `new` through the given `(old, new)` steps.
pub fn history(steps: &[(&str, &str)]) -> Vec<JobStateTransition> {
    steps
        .iter()
        .map(|(old, new)| JobStateTransition::new(old, new))
        .collect()
}

pub fn job_with_history(workflow: &str, steps: &[(&str, &str)]) -> JobRecord {
    let mut job = JobRecord::new(workflow, "/Task");
    job.state_history = history(steps);
    job
}
