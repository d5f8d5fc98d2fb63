use std::collections::HashMap;

use thiserror::Error;

use crate::config::schema::LabelAssignment;
use crate::config::validate_labels;
use crate::error::ConfigError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassificationError {
    #[error("unmapped label '{0}'")]
    UnknownLabel(String),
}

/// Resolves label names to their assignment.
///
/// Names match exactly and case-sensitively; `Parent/Child` is one opaque
/// key with no hierarchy behind it.
#[derive(Debug, Clone)]
pub struct LabelClassifier {
    assignments: HashMap<String, LabelAssignment>,
}

impl LabelClassifier {
    pub fn new(assignments: Vec<LabelAssignment>) -> Result<Self, ConfigError> {
        validate_labels(&assignments)?;

        let assignments = assignments
            .into_iter()
            .map(|a| (a.label_name.clone(), a))
            .collect();

        Ok(Self { assignments })
    }

    pub fn resolve(&self, label_name: &str) -> Result<&LabelAssignment, ClassificationError> {
        self.assignments
            .get(label_name)
            .ok_or_else(|| ClassificationError::UnknownLabel(label_name.to_string()))
    }

    /// Assignments ordered by priority, highest first.
    pub fn assignments(&self) -> Vec<&LabelAssignment> {
        let mut all: Vec<&LabelAssignment> = self.assignments.values().collect();
        all.sort_by(|a, b| b.priority.cmp(&a.priority));
        all
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}
