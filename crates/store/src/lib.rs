// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wfmon-store: merge engine and in-memory workflow store.
//!
//! Agents report partial, possibly-overlapping documents per workflow; this
//! crate folds them into one record per workflow under field-specific merge
//! rules and keeps a per-agent secondary index for consumers that need the
//! raw reports.

pub mod merge;
pub mod refresh;
pub mod store;

pub use merge::{deep_add, index_aligned_add, merge, rule_for, MergeRule};
pub use refresh::{FetchError, RecordSource, Refresher, RefreshStats};
pub use store::WorkflowStore;
