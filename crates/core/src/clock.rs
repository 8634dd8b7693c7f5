// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling.
//!
//! Request status timestamps and the completion-time estimate work in epoch
//! seconds, matching the document store's convention.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// A clock that provides the current time.
pub trait Clock: Clone + Send + Sync {
    fn epoch_secs(&self) -> i64;
}

/// Real system clock.
#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn epoch_secs(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }
}

/// Fake clock for testing with controllable time.
#[derive(Clone)]
pub struct FakeClock {
    epoch_secs: Arc<Mutex<i64>>,
}

impl FakeClock {
    pub fn new(epoch_secs: i64) -> Self {
        Self {
            epoch_secs: Arc::new(Mutex::new(epoch_secs)),
        }
    }

    /// Advance the clock by the given number of seconds.
    pub fn advance(&self, secs: i64) {
        *self.epoch_secs.lock() += secs;
    }

    pub fn set(&self, epoch_secs: i64) {
        *self.epoch_secs.lock() = epoch_secs;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new(1_000_000)
    }
}

impl Clock for FakeClock {
    fn epoch_secs(&self) -> i64 {
        *self.epoch_secs.lock()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
