//! Keyed row store behind the consolidator.
//!
//! All merge decisions happen in [`Store::merge`], so the priority rule
//! is enforced in one place.

use std::collections::HashMap;

use crate::record::{is_blank_location, ApplicationRecord, IdentityKey};

/// What an ingest did to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// First record for its identity key.
    Inserted,
    /// A strictly higher priority took over the status.
    Upgraded,
    /// Status kept; some empty fields were filled.
    Filled,
    /// Nothing changed.
    Unchanged,
}

#[derive(Debug, Clone)]
pub(crate) struct Row {
    pub record: ApplicationRecord,
    pub priority: i32,
}

#[derive(Debug, Default)]
pub(crate) struct Store {
    pub rows: Vec<Row>,
    index: HashMap<IdentityKey, usize>,
}

impl Store {
    pub fn merge(&mut self, record: ApplicationRecord, priority: i32) -> MergeOutcome {
        let key = record.identity_key();

        let Some(&position) = self.index.get(&key) else {
            self.index.insert(key, self.rows.len());
            self.rows.push(Row { record, priority });
            return MergeOutcome::Inserted;
        };

        let row = &mut self.rows[position];

        if priority > row.priority {
            row.priority = priority;
            row.record.status = record.status.clone();
            if !record.metadata_subject.is_empty() {
                row.record.metadata_subject = record.metadata_subject.clone();
            }
            fill_content(&mut row.record, record);
            return MergeOutcome::Upgraded;
        }

        if fill_content(&mut row.record, record) {
            MergeOutcome::Filled
        } else {
            MergeOutcome::Unchanged
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Copies incoming values into fields the stored record leaves empty.
/// Returns whether anything changed.
fn fill_content(stored: &mut ApplicationRecord, incoming: ApplicationRecord) -> bool {
    let mut changed = false;

    if stored.date.is_none() && incoming.date.is_some() {
        stored.date = incoming.date;
        changed = true;
    }
    if stored.location_is_blank() && !is_blank_location(&incoming.location) {
        stored.location = incoming.location;
        changed = true;
    }
    if stored.metadata_subject.is_empty() && !incoming.metadata_subject.is_empty() {
        stored.metadata_subject = incoming.metadata_subject;
        changed = true;
    }
    if stored.comment.is_empty() && !incoming.comment.is_empty() {
        stored.comment = incoming.comment;
        changed = true;
    }

    changed
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::record::{ApplicationStatus, UNKNOWN_LOCATION};

    fn record(status: ApplicationStatus, location: &str, subject: &str) -> ApplicationRecord {
        ApplicationRecord {
            company: "Acme".to_string(),
            job_title: "Engineer".to_string(),
            status,
            date: None,
            location: location.to_string(),
            metadata_subject: subject.to_string(),
            comment: String::new(),
        }
    }

    #[test]
    fn test_insert_then_upgrade() {
        let mut store = Store::default();
        assert_eq!(
            store.merge(record(ApplicationStatus::Applied, UNKNOWN_LOCATION, "a"), 1),
            MergeOutcome::Inserted
        );

        let mut viewed = record(ApplicationStatus::Viewed, "Remote", "b");
        viewed.date = NaiveDate::from_ymd_opt(2024, 2, 1);
        assert_eq!(store.merge(viewed, 2), MergeOutcome::Upgraded);

        let row = &store.rows[0];
        assert_eq!(row.priority, 2);
        assert_eq!(row.record.status, ApplicationStatus::Viewed);
        assert_eq!(row.record.location, "Remote");
        assert_eq!(row.record.metadata_subject, "b");
        assert_eq!(row.record.date, NaiveDate::from_ymd_opt(2024, 2, 1));
    }

    #[test]
    fn test_lower_priority_never_overwrites() {
        let mut store = Store::default();
        store.merge(record(ApplicationStatus::Rejected, "Berlin", "r"), 3);

        assert_eq!(
            store.merge(record(ApplicationStatus::Applied, "Remote", "a"), 1),
            MergeOutcome::Unchanged
        );

        let row = &store.rows[0];
        assert_eq!(row.record.status, ApplicationStatus::Rejected);
        assert_eq!(row.record.location, "Berlin");
        assert_eq!(row.record.metadata_subject, "r");
    }

    #[test]
    fn test_lower_priority_fills_empty_fields() {
        let mut store = Store::default();
        store.merge(record(ApplicationStatus::Rejected, UNKNOWN_LOCATION, "r"), 3);

        let mut applied = record(ApplicationStatus::Applied, "Remote", "a");
        applied.date = NaiveDate::from_ymd_opt(2024, 1, 10);
        applied.comment = "Email regarding: a".to_string();
        assert_eq!(store.merge(applied, 1), MergeOutcome::Filled);

        let row = &store.rows[0];
        assert_eq!(row.record.status, ApplicationStatus::Rejected);
        assert_eq!(row.record.location, "Remote");
        assert_eq!(row.record.metadata_subject, "r");
        assert_eq!(row.record.comment, "Email regarding: a");
        assert_eq!(row.priority, 3);
    }

    #[test]
    fn test_equal_priority_keeps_first() {
        let mut store = Store::default();
        store.merge(record(ApplicationStatus::Applied, "Remote", "first"), 1);
        assert_eq!(
            store.merge(record(ApplicationStatus::Applied, "Zurich", "second"), 1),
            MergeOutcome::Unchanged
        );
        assert_eq!(store.rows[0].record.location, "Remote");
        assert_eq!(store.rows[0].record.metadata_subject, "first");
    }

    #[test]
    fn test_identity_is_normalized() {
        let mut store = Store::default();
        store.merge(record(ApplicationStatus::Applied, "", "a"), 1);

        let mut shouting = record(ApplicationStatus::Viewed, "", "b");
        shouting.company = "  ACME ".to_string();
        shouting.job_title = "engineer".to_string();
        assert_eq!(store.merge(shouting, 2), MergeOutcome::Upgraded);

        assert_eq!(store.len(), 1);
        assert_eq!(store.rows[0].record.company, "Acme");
    }
}
