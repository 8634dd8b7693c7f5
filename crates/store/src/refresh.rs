// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic snapshot refresh: fetch agent reports, replay through the store.
//!
//! Only the fetch runs under a deadline. The replay and all downstream
//! rollups are pure in-memory folds and are never timed out.

use crate::store::WorkflowStore;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use wfmon_core::PartialRecord;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("fetch timed out after {0:?}")]
    Timeout(Duration),
    #[error("source error: {0}")]
    Source(String),
}

/// A snapshot source of agent reports (the document store, behind the
/// transport layer this crate does not know about).
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<PartialRecord>, FetchError>;
}

/// Outcome of one refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshStats {
    pub records: usize,
    pub workflows: usize,
}

/// Drives the 5-minute pull cycle: fetch under a deadline, replay in order.
pub struct Refresher<S> {
    source: S,
    deadline: Duration,
}

impl<S: RecordSource> Refresher<S> {
    pub fn new(source: S, deadline: Duration) -> Self {
        Self { source, deadline }
    }

    /// One refresh cycle. A failed or timed-out fetch leaves the store
    /// untouched.
    pub async fn refresh(&self, store: &mut WorkflowStore) -> Result<RefreshStats, FetchError> {
        let recs = match tokio::time::timeout(self.deadline, self.source.fetch()).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(deadline = ?self.deadline, "snapshot fetch timed out");
                return Err(FetchError::Timeout(self.deadline));
            }
        };

        let records = recs.len();
        store.bulk_upsert(recs);
        let stats = RefreshStats {
            records,
            workflows: store.len(),
        };
        debug!(records, workflows = stats.workflows, "refresh cycle applied");
        Ok(stats)
    }
}

#[cfg(test)]
#[path = "refresh_tests.rs"]
mod tests;
