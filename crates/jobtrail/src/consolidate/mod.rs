//! Merges extracted records into one row per application.
//!
//! A row's status always comes from the highest priority seen for its
//! identity key. Content fields are first-write: later records may only
//! fill what is still empty.

mod store;

use std::sync::{Mutex, PoisonError};

use log::debug;
use serde::Serialize;

use crate::record::{ApplicationRecord, ApplicationStatus};

pub use store::MergeOutcome;
use store::Store;

/// Thread-safe consolidation table.
#[derive(Debug, Default)]
pub struct Consolidator {
    store: Mutex<Store>,
}

impl Consolidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges `record`, which was extracted under a label of `priority`.
    pub fn ingest(&self, record: ApplicationRecord, priority: i32) -> MergeOutcome {
        let company = record.company.clone();
        let job_title = record.job_title.clone();

        let outcome = self
            .store
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .merge(record, priority);

        debug!(
            "Consolidated '{}' / '{}' at priority {}: {:?}",
            company, job_title, priority, outcome
        );
        outcome
    }

    pub fn len(&self) -> usize {
        self.store
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the table, grouped by status.
    ///
    /// Groups are ordered by priority (highest first); rows inside a group
    /// keep ingestion order. Whatever has been ingested so far is valid.
    pub fn finalize(&self) -> ConsolidatedTable {
        let store = self.store.lock().unwrap_or_else(PoisonError::into_inner);

        let mut groups: Vec<StatusGroup> = Vec::new();
        for row in &store.rows {
            match groups.iter_mut().find(|g| g.status == row.record.status) {
                Some(group) => {
                    group.priority = group.priority.max(row.priority);
                    group.records.push(row.record.clone());
                }
                None => groups.push(StatusGroup {
                    status: row.record.status.clone(),
                    priority: row.priority,
                    records: vec![row.record.clone()],
                }),
            }
        }

        // Stable, so equal priorities keep first-appearance order.
        groups.sort_by(|a, b| b.priority.cmp(&a.priority));

        ConsolidatedTable { groups }
    }
}

/// Rows sharing one final status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusGroup {
    pub status: ApplicationStatus,
    pub priority: i32,
    pub records: Vec<ApplicationRecord>,
}

/// Final consolidated output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConsolidatedTable {
    pub groups: Vec<StatusGroup>,
}

impl ConsolidatedTable {
    /// All rows, group by group.
    pub fn records(&self) -> impl Iterator<Item = &ApplicationRecord> {
        self.groups.iter().flat_map(|g| g.records.iter())
    }

    pub fn group(&self, status: &ApplicationStatus) -> Option<&StatusGroup> {
        self.groups.iter().find(|g| &g.status == status)
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
