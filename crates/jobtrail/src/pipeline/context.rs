use crate::config::LabelAssignment;
use crate::email::MessageMetadata;
use crate::worker::job::Job;

/// Where a message is in its single pass through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageState {
    Fetched,
    Classified,
    ExtractionAttempted,
    Recorded,
    Failed,
}

impl MessageState {
    pub fn is_terminal(self) -> bool {
        matches!(self, MessageState::Recorded | MessageState::Failed)
    }
}

pub struct PipelineContext {
    // Input
    pub job: Job,
    pub metadata: MessageMetadata,

    pub state: MessageState,

    // Classification result
    pub assignment: Option<LabelAssignment>,

    // Decoded body for the assignment's content type
    pub body: Option<String>,
}

impl PipelineContext {
    pub fn new(job: Job) -> Self {
        let metadata = job.message.metadata(&job.label);
        Self {
            job,
            metadata,
            state: MessageState::Fetched,
            assignment: None,
            body: None,
        }
    }
}
