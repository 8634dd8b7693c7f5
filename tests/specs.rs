// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end pipeline specs: agent reports → merge → store → filter →
//! summary / category rollup, the same path a dashboard refresh takes.

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use wfmon_core::{classify_batch, test_support::job_with_history, PartialRecord, StatusBucket};
use wfmon_rollup::{apply, categorize, Summary};
use wfmon_store::{FetchError, RecordSource, Refresher, WorkflowStore};

fn doc(v: serde_json::Value) -> PartialRecord {
    serde_json::from_value(v).unwrap()
}

/// Two agents report the same-shaped snapshot a real feed would deliver.
fn agent_snapshot() -> Vec<PartialRecord> {
    vec![
        doc(json!({
            "workflow": "pdmvserv_Run2026A_v1",
            "agent_url": "vocms0255.cern.ch",
            "campaign": "Run2026A",
            "total_jobs": 100,
            "input_events": 10_000,
            "status": {"success": 40, "submitted": {"first": 10}},
            "output_progress": [{"events": 4_000, "lumis": 40}],
            "sites": {"T1_US_FNAL": {"submitted": {"running": 10}}},
            "request_status": [
                {"status": "new", "update_time": 100},
                {"status": "running-open", "update_time": 1_000}
            ]
        })),
        doc(json!({
            "workflow": "pdmvserv_Run2026A_v1",
            "agent_url": "vocms0192.cern.ch",
            "total_jobs": 100,
            "status": {"success": 20, "failure": {"exception": 5}, "cooloff": 3},
            "output_progress": [{"events": 2_000, "lumis": 20}],
            "sites": {"T2_CH_CERN": {"submitted": {"running": 4}}}
        })),
        doc(json!({
            "workflow": "task_SMP_Run2026B_v3",
            "agent_url": "vocms0255.cern.ch",
            "campaign": "Run2026B",
            "total_jobs": 50,
            "input_events": 5_000,
            "status": {"queued": {"first": 50}},
            "sites": {"T1_US_FNAL": {"submitted": {"pending": 50}}}
        })),
    ]
}

struct SnapshotSource;

#[async_trait]
impl RecordSource for SnapshotSource {
    async fn fetch(&self) -> Result<Vec<PartialRecord>, FetchError> {
        Ok(agent_snapshot())
    }
}

#[tokio::test]
async fn refresh_cycle_builds_consistent_rollups() {
    let refresher = Refresher::new(SnapshotSource, Duration::from_secs(30));
    let mut store = WorkflowStore::new();
    let stats = refresher.refresh(&mut store).await.unwrap();
    assert_eq!(stats.records, 3);
    assert_eq!(stats.workflows, 2);

    // Merged record: counters added across agents, legacy cooloff upgraded.
    let rec = store.get("pdmvserv_Run2026A_v1").unwrap();
    assert_eq!(rec.status.success, 60);
    assert_eq!(rec.status.failure.exception, 5);
    assert_eq!(rec.status.cooloff.job, 3);
    assert_eq!(rec.total_jobs, 100);
    assert_eq!(rec.output_progress[0].events, 6_000);
    assert_eq!(
        store.agents_for("pdmvserv_Run2026A_v1"),
        vec!["vocms0255.cern.ch", "vocms0192.cern.ch"]
    );

    // Per-agent index still has the raw, unmerged reports.
    let raw = store
        .agent_record("pdmvserv_Run2026A_v1", "vocms0192.cern.ch")
        .unwrap();
    assert_eq!(raw.status.success, 20);

    // Filter, then summarize the passing subset.
    let snapshot = store.snapshot();
    let predicates: HashMap<String, String> =
        [("campaign".to_string(), "run2026a".to_string())].into();
    let hits = apply(&snapshot, &predicates);
    assert_eq!(hits.len(), 1);

    let mut summary = Summary::new();
    for rec in hits.values() {
        summary.update_from_workflow(rec);
    }
    assert_eq!(summary.total_events, 10_000);
    assert_eq!(summary.processed_events, 6_000);
    assert_eq!(summary.total_failure(), 5);
    assert_eq!(summary.total_cooloff(), 3);
    assert_eq!(summary.wmbs_total_jobs(), 60 + 5 + 3 + 10);

    // Site rollup: the two-site workflow lands fully in both site groups.
    let by_site = categorize("sites", &snapshot);
    assert_eq!(by_site["T1_US_FNAL"].workflows.len(), 2);
    assert_eq!(by_site["T2_CH_CERN"].summary.status.success, 60);
    assert_eq!(by_site["T1_US_FNAL"].summary.status.success, 60);
}

#[test]
fn classifier_feeds_the_buckets_the_rollups_consume() {
    let mut jobs = vec![
        job_with_history("wf1", &[("new", "created"), ("created", "executing")]),
        job_with_history("wf1", &[("jobfailed", "retrydone")]),
        job_with_history("wf1", &[("executing", "jobcooloff")]),
        job_with_history("wf1", &[("new", "created")]),
    ];
    let outcome = classify_batch(&mut jobs);
    assert!(outcome.errors.is_empty());

    assert_eq!(outcome.counters.get(StatusBucket::SubmittedFirst), 1);
    assert_eq!(outcome.counters.get(StatusBucket::FailureException), 1);
    assert_eq!(outcome.counters.get(StatusBucket::CooloffJob), 1);
    assert_eq!(outcome.counters.get(StatusBucket::QueuedFirst), 1);

    // The classifier's counter shape is exactly what a partial record
    // carries, so a report built from it folds straight into the store.
    let mut report = PartialRecord::new("wf1", "vocms0255.cern.ch");
    report.status = outcome.counters.clone();
    let mut store = WorkflowStore::new();
    store.upsert(report);
    assert_eq!(store.get("wf1").unwrap().status.wmbs_total_jobs(), 4);
}
