// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job state-transition history as reported by agents.

use serde::{Deserialize, Serialize};

/// Sentinel `location` value meaning the job has not been dispatched to a
/// site yet.
pub const NO_SITE: &str = "Agent";

/// One entry in a job's append-only transition history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStateTransition {
    #[serde(default)]
    pub old_state: String,
    #[serde(default)]
    pub new_state: String,
    /// Site the job was at when the transition happened; [`NO_SITE`] while
    /// the job is still agent-side.
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default)]
    pub timestamp: i64,
}

fn default_location() -> String {
    NO_SITE.to_string()
}

impl JobStateTransition {
    pub fn new(old_state: &str, new_state: &str) -> Self {
        Self {
            old_state: old_state.to_string(),
            new_state: new_state.to_string(),
            location: NO_SITE.to_string(),
            timestamp: 0,
        }
    }

    pub fn at_site(old_state: &str, new_state: &str, location: &str) -> Self {
        Self {
            old_state: old_state.to_string(),
            new_state: new_state.to_string(),
            location: location.to_string(),
            timestamp: 0,
        }
    }
}

/// One processing job: immutable history plus the site derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub workflow: String,
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub state_history: Vec<JobStateTransition>,
    /// Derived by [`crate::classify::current_site`]; `None` until a
    /// classification pass has run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
}

impl JobRecord {
    pub fn new(workflow: &str, task: &str) -> Self {
        Self {
            workflow: workflow.to_string(),
            task: task.to_string(),
            state_history: Vec::new(),
            site: None,
        }
    }

    /// Append a transition to the history (histories are append-only).
    pub fn push_transition(&mut self, t: JobStateTransition) {
        self.state_history.push(t);
    }
}

#[cfg(test)]
#[path = "transition_tests.rs"]
mod tests;
