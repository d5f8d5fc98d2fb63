use std::sync::Arc;

use tracing::{debug, info_span};

use crate::classifier::LabelClassifier;
use crate::email::decode_body;
use crate::extract::{extract_record, generate_comment};
use crate::failure::{FailureReason, PartialRecord};
use crate::record::ApplicationRecord;
use crate::worker::job::{Job, JobResult};

use super::context::{MessageState, PipelineContext};

/// Result of one message's pass: exactly one of a record or a failure.
#[derive(Debug, Clone)]
pub enum MessageOutcome {
    Recorded {
        record: ApplicationRecord,
        priority: i32,
    },
    Failed {
        reason: FailureReason,
        partial: PartialRecord,
    },
}

impl MessageOutcome {
    pub fn is_recorded(&self) -> bool {
        matches!(self, MessageOutcome::Recorded { .. })
    }

    pub(crate) fn worker_lost() -> Self {
        MessageOutcome::Failed {
            reason: FailureReason::WorkerLost,
            partial: PartialRecord::default(),
        }
    }
}

/// Classify, decode and extract a single message.
///
/// Every error is turned into a [`MessageOutcome::Failed`]; nothing a
/// message contains can abort the run.
pub struct Pipeline {
    classifier: Arc<LabelClassifier>,
}

impl Pipeline {
    pub fn new(classifier: Arc<LabelClassifier>) -> Self {
        Self { classifier }
    }

    pub fn process(&self, job: Job) -> JobResult {
        let (outcome, ctx) = self.run(PipelineContext::new(job));
        JobResult::new(&ctx.job, outcome)
    }

    /// Run all steps for the message in `ctx`.
    /// Returns the outcome together with the final context.
    pub fn run(&self, mut ctx: PipelineContext) -> (MessageOutcome, PipelineContext) {
        let _pipeline_span = info_span!("pipeline",
            message_id = %ctx.job.message_id(),
            label = %ctx.job.label,
        )
        .entered();

        // Step 1: Classify
        let assignment = {
            let _step = info_span!("classify").entered();
            match self.classifier.resolve(&ctx.job.label) {
                Ok(assignment) => assignment.clone(),
                Err(e) => {
                    let partial = base_partial(&ctx);
                    return fail(ctx, FailureReason::UnmappedLabel(e), partial);
                }
            }
        };
        ctx.assignment = Some(assignment.clone());
        ctx.state = MessageState::Classified;

        // Step 2: Decode
        {
            let _step = info_span!("decode").entered();
            let content_type = assignment.parser_type.content_type();
            match decode_body(&ctx.job.message, Some(content_type)) {
                Ok(body) => {
                    debug!("Decoded {} bytes of {}", body.len(), content_type);
                    ctx.body = Some(body);
                }
                Err(e) => {
                    let partial = base_partial(&ctx);
                    return fail(ctx, FailureReason::Decode(e), partial);
                }
            }
        }

        // Step 3: Extract
        let _step = info_span!("extract").entered();
        ctx.state = MessageState::ExtractionAttempted;
        let body = ctx.body.as_deref().unwrap_or_default();
        match extract_record(&assignment, body, &ctx.metadata) {
            Ok(record) => {
                debug!("Extracted '{}' / '{}'", record.company, record.job_title);
                ctx.state = MessageState::Recorded;
                let outcome = MessageOutcome::Recorded {
                    record,
                    priority: assignment.priority,
                };
                (outcome, ctx)
            }
            Err(e) => {
                let fields = e.partial();
                let partial = PartialRecord {
                    company: fields.company.clone(),
                    job_title: fields.job_title.clone(),
                    location: fields.location.clone(),
                    ..base_partial(&ctx)
                };
                fail(ctx, FailureReason::Extraction(e), partial)
            }
        }
    }
}

/// Partial fields known before extraction: status, date and subject.
fn base_partial(ctx: &PipelineContext) -> PartialRecord {
    PartialRecord {
        date: ctx.metadata.received_on(),
        status: ctx.assignment.as_ref().map(|a| a.status.clone()),
        metadata: ctx.metadata.subject.clone(),
        comment: generate_comment(&ctx.metadata.subject),
        ..Default::default()
    }
}

fn fail(
    mut ctx: PipelineContext,
    reason: FailureReason,
    partial: PartialRecord,
) -> (MessageOutcome, PipelineContext) {
    debug!("Message failed: {}", reason);
    ctx.state = MessageState::Failed;
    (MessageOutcome::Failed { reason, partial }, ctx)
}

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine as _;

    use super::*;
    use crate::config::Config;
    use crate::email::{Header, MessageBody, MessagePart, RawMessage};
    use crate::record::ApplicationStatus;

    fn pipeline() -> Pipeline {
        let classifier = LabelClassifier::new(Config::default().labels).unwrap();
        Pipeline::new(Arc::new(classifier))
    }

    fn message(mime_type: &str, subject: &str, body: &str) -> RawMessage {
        RawMessage {
            id: "m1".to_string(),
            internal_date: Some("1706781600000".to_string()),
            payload: MessagePart {
                mime_type: mime_type.to_string(),
                headers: vec![Header {
                    name: "Subject".to_string(),
                    value: subject.to_string(),
                }],
                body: MessageBody {
                    data: Some(URL_SAFE_NO_PAD.encode(body)),
                    ..Default::default()
                },
                ..Default::default()
            },
            attachments: Default::default(),
        }
    }

    #[test]
    fn test_recorded_applied_message() {
        let job = Job::new(
            0,
            "LinkedIn/Applied",
            message(
                "text/plain",
                "Jane, your application was sent to Acme",
                "Your application was sent to Acme\nEngineer\nAcme\nRemote\n",
            ),
        );
        let (outcome, ctx) = pipeline().run(PipelineContext::new(job));

        assert_eq!(ctx.state, MessageState::Recorded);
        assert!(ctx.state.is_terminal());
        match outcome {
            MessageOutcome::Recorded { record, priority } => {
                assert_eq!(priority, 1);
                assert_eq!(record.status, ApplicationStatus::Applied);
                assert_eq!(record.company, "Acme");
                assert_eq!(record.location, "Remote");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_unmapped_label_fails_before_classification() {
        let job = Job::new(0, "linkedin/applied", message("text/plain", "s", "b"));
        let (outcome, ctx) = pipeline().run(PipelineContext::new(job));

        assert_eq!(ctx.state, MessageState::Failed);
        assert!(ctx.assignment.is_none());
        match outcome {
            MessageOutcome::Failed { reason, partial } => {
                assert_eq!(reason.kind(), "UnmappedLabel");
                assert_eq!(partial.metadata, "s");
                assert!(partial.status.is_none());
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_missing_html_part_is_decode_failure() {
        let job = Job::new(
            0,
            "LinkedIn/Viewed",
            message("text/plain", "Your application was viewed by Acme", "hi"),
        );
        let result = pipeline().process(job);

        assert!(!result.is_success());
        match result.outcome {
            MessageOutcome::Failed { reason, partial } => {
                assert_eq!(reason.kind(), "DecodeError");
                assert_eq!(partial.status, Some(ApplicationStatus::Viewed));
                assert!(partial.date.is_some());
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_extraction_failure_keeps_partial_fields() {
        let job = Job::new(
            0,
            "LinkedIn/Viewed",
            message("text/html", "Your application was viewed by Hooli", "<p>nothing</p>"),
        );
        let (outcome, ctx) = pipeline().run(PipelineContext::new(job));

        assert_eq!(ctx.state, MessageState::Failed);
        match outcome {
            MessageOutcome::Failed { reason, partial } => {
                assert_eq!(reason.to_string(), "MissingField: job_title");
                assert_eq!(partial.company, "Hooli");
                assert_eq!(
                    partial.comment,
                    "Email regarding: Your application was viewed by Hooli"
                );
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
