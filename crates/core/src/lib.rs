// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wfmon-core: data model and job-state classifier for the workflow monitor.
//!
//! Every rollup in the dashboard keys off the status bucket derived here, so
//! this crate owns the transition state machine and the counter shapes that
//! the store and rollup crates aggregate.

pub mod bucket;
pub mod classify;
pub mod clock;
pub mod counters;
pub mod record;
pub mod transition;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use bucket::StatusBucket;
pub use classify::{classify, classify_batch, current_site, BatchOutcome, ClassifyError, JobError};
pub use clock::{Clock, FakeClock, SystemClock};
pub use counters::{FailureCounts, PairCounts, PhaseCounts, StatusCounters};
pub use record::{
    OutputProgress, PartialRecord, RequestStatus, WorkflowRecord, TERMINAL_REQUEST_STATUSES,
};
pub use transition::{JobRecord, JobStateTransition, NO_SITE};
