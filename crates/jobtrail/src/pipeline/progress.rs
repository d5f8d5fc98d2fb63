use log::info;

/// Events emitted while a run works through its label batches.
///
/// Events arrive in input order: a batch's messages are reported between
/// its `BatchStarted` and `BatchFinished`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    BatchStarted {
        label: String,
        total: usize,
    },
    MessageFinished {
        label: String,
        message_id: String,
        row_number: usize,
        total: usize,
        recorded: bool,
    },
    BatchFinished {
        label: String,
        recorded: usize,
        failed: usize,
    },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// No-op reporter for unit tests.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Writes progress to the log.
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::BatchStarted { label, total } => {
                info!("Processing {} messages for label '{}'", total, label);
            }
            ProgressEvent::MessageFinished {
                label,
                message_id,
                row_number,
                total,
                recorded,
            } => {
                let verdict = if recorded { "recorded" } else { "failed" };
                info!(
                    "[{}] {}/{} message {} {}",
                    label, row_number, total, message_id, verdict
                );
            }
            ProgressEvent::BatchFinished {
                label,
                recorded,
                failed,
            } => {
                info!(
                    "Finished label '{}': {} recorded, {} failed",
                    label, recorded, failed
                );
            }
        }
    }
}
