use crate::email::RawMessage;
use crate::pipeline::MessageOutcome;

/// One message queued for processing under a label.
#[derive(Debug, Clone)]
pub struct Job {
    /// Position of the message in the whole run, used to restore input order.
    pub seq: usize,
    pub label: String,
    pub message: RawMessage,
}

impl Job {
    pub fn new(seq: usize, label: impl Into<String>, message: RawMessage) -> Self {
        Self {
            seq,
            label: label.into(),
            message,
        }
    }

    pub fn message_id(&self) -> &str {
        &self.message.id
    }
}

#[derive(Debug, Clone)]
pub struct JobResult {
    pub seq: usize,
    pub message_id: String,
    pub outcome: MessageOutcome,
}

impl JobResult {
    pub fn new(job: &Job, outcome: MessageOutcome) -> Self {
        Self {
            seq: job.seq,
            message_id: job.message.id.clone(),
            outcome,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_recorded()
    }
}
