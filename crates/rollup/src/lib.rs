// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wfmon-rollup: filtering and on-demand aggregation over workflow records.
//!
//! Everything here is a pure, re-entrant fold over a snapshot of the store;
//! nothing blocks and nothing caches. Output objects are plain data for the
//! rendering layer.

pub mod category;
pub mod filter;
pub mod path;
pub mod summary;

pub use category::{categorize, CategoryGroup, NA_KEY};
pub use filter::{apply, matches};
pub use summary::Summary;
