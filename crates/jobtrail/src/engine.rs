//! Run orchestration: label batches in, two finalized tables out.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;

use chrono::{DateTime, Local};
use log::{info, warn};
use tracing::info_span;

use crate::classifier::LabelClassifier;
use crate::config::{Config, DateRange};
use crate::consolidate::{ConsolidatedTable, Consolidator};
use crate::email::RawMessage;
use crate::error::{ConfigError, Result, WorkerError};
use crate::failure::{FailureRecord, FailureSink, MessageOrigin};
use crate::pipeline::{MessageOutcome, Pipeline, ProgressEvent, ProgressReporter};
use crate::worker::{Job, WorkerPool};

/// Messages the fetch layer found under one label, in fetch order.
#[derive(Debug, Clone, Default)]
pub struct LabelBatch {
    pub label: String,
    pub messages: Vec<RawMessage>,
}

impl LabelBatch {
    pub fn new(label: impl Into<String>, messages: Vec<RawMessage>) -> Self {
        Self {
            label: label.into(),
            messages,
        }
    }
}

/// Everything a run produced, ready for the artifact writer.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub applications: ConsolidatedTable,
    pub failures: Vec<FailureRecord>,
    pub batch_id: String,
    pub date_range: DateRange,
    pub started_at: DateTime<Local>,
}

pub struct Engine {
    pipeline: Arc<Pipeline>,
    worker_count: usize,
    date_range: DateRange,
}

impl Engine {
    /// Builds an engine from a loaded configuration. Duplicate labels or
    /// priorities are rejected here, before any message is seen.
    pub fn new(config: &Config) -> std::result::Result<Self, ConfigError> {
        let classifier = LabelClassifier::new(config.labels.clone())?;
        Ok(Self {
            pipeline: Arc::new(Pipeline::new(Arc::new(classifier))),
            worker_count: config.worker_count.max(1),
            date_range: config.date_range,
        })
    }

    pub fn batch_id(&self, started_at: DateTime<Local>) -> String {
        format!(
            "{}_{}",
            self.date_range.file_suffix(),
            started_at.format("%Y%m%d_%H%M%S")
        )
    }

    pub fn run(
        &self,
        batches: Vec<LabelBatch>,
        progress: &dyn ProgressReporter,
    ) -> Result<RunOutput> {
        self.run_at(batches, progress, Local::now())
    }

    /// Processes every message of every batch and finalizes both tables.
    ///
    /// Messages are processed concurrently but ingested in input order
    /// (batch order, then position), so the output does not depend on
    /// which worker finishes first. Each message yields exactly one
    /// record or one failure.
    pub fn run_at(
        &self,
        batches: Vec<LabelBatch>,
        progress: &dyn ProgressReporter,
        started_at: DateTime<Local>,
    ) -> Result<RunOutput> {
        let batch_id = self.batch_id(started_at);
        let _run_span = info_span!("run", batch_id = %batch_id).entered();

        let consolidator = Consolidator::new();
        let sink = FailureSink::new(batch_id.clone(), self.date_range.description());

        let mut plan = Vec::with_capacity(batches.len());
        let mut jobs = Vec::new();
        for batch in batches {
            let total = batch.messages.len();
            let mut origins = Vec::with_capacity(total);
            for (position, message) in batch.messages.into_iter().enumerate() {
                origins.push(MessageOrigin {
                    message_id: message.id.clone(),
                    label: batch.label.clone(),
                    row_number: position + 1,
                    total_in_batch: total,
                });
                jobs.push(Job::new(jobs.len(), batch.label.clone(), message));
            }
            plan.push((batch.label, origins));
        }

        let total_jobs = jobs.len();
        info!(
            "Starting run {} ({}): {} messages in {} labels",
            batch_id,
            self.date_range.description(),
            total_jobs,
            plan.len()
        );

        let mut ingest = Ingest {
            consolidator: &consolidator,
            sink: &sink,
            progress,
        };

        if total_jobs == 0 {
            for (label, origins) in &plan {
                ingest.batch(label, origins, &mut |_| None);
            }
        } else {
            let workers = self.worker_count.min(total_jobs);
            let pool = WorkerPool::new(Arc::clone(&self.pipeline), workers)?;

            thread::scope(|scope| -> std::result::Result<(), WorkerError> {
                let pool = &pool;
                let _abort = AbortOnUnwind(pool);
                thread::Builder::new()
                    .name("jobtrail-submit".to_string())
                    .spawn_scoped(scope, move || {
                        for job in jobs {
                            let seq = job.seq;
                            if let Err(e) = pool.submit(job) {
                                warn!("Stopped submitting at message #{}: {}", seq, e);
                                break;
                            }
                        }
                    })
                    .map_err(|e| WorkerError::SpawnFailed(e.to_string()))?;

                let mut results = InOrder::new(pool);
                let mut seq = 0;
                for (label, origins) in &plan {
                    ingest.batch(label, origins, &mut |_| {
                        let outcome = results.take(seq);
                        seq += 1;
                        outcome
                    });
                }
                Ok(())
            })?;

            pool.wait();
        }

        let applications = consolidator.finalize();
        let failures = sink.finalize();
        info!(
            "Run {} finished: {} applications, {} failures",
            batch_id,
            applications.len(),
            failures.len()
        );

        Ok(RunOutput {
            applications,
            failures,
            batch_id,
            date_range: self.date_range,
            started_at,
        })
    }
}

/// Aborts the pool if ingestion unwinds, so the scope can join the
/// submitter instead of waiting on it forever.
struct AbortOnUnwind<'a>(&'a WorkerPool);

impl Drop for AbortOnUnwind<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.abort();
        }
    }
}

/// Hands out worker results by sequence number, buffering early arrivals.
struct InOrder<'a> {
    pool: &'a WorkerPool,
    pending: BTreeMap<usize, MessageOutcome>,
    exhausted: bool,
}

impl<'a> InOrder<'a> {
    fn new(pool: &'a WorkerPool) -> Self {
        Self {
            pool,
            pending: BTreeMap::new(),
            exhausted: false,
        }
    }

    /// `None` when every worker stopped without producing `seq`.
    fn take(&mut self, seq: usize) -> Option<MessageOutcome> {
        loop {
            if let Some(outcome) = self.pending.remove(&seq) {
                return Some(outcome);
            }
            if self.exhausted {
                return None;
            }
            match self.pool.recv_result() {
                Some(result) => {
                    self.pending.insert(result.seq, result.outcome);
                }
                None => self.exhausted = true,
            }
        }
    }
}

/// Routes outcomes into the two sinks and reports progress.
struct Ingest<'a> {
    consolidator: &'a Consolidator,
    sink: &'a FailureSink,
    progress: &'a dyn ProgressReporter,
}

impl Ingest<'_> {
    fn batch(
        &mut self,
        label: &str,
        origins: &[MessageOrigin],
        next: &mut dyn FnMut(&MessageOrigin) -> Option<MessageOutcome>,
    ) {
        self.progress.report(ProgressEvent::BatchStarted {
            label: label.to_string(),
            total: origins.len(),
        });

        let mut recorded = 0;
        let mut failed = 0;
        for origin in origins {
            let outcome = next(origin).unwrap_or_else(MessageOutcome::worker_lost);
            let is_recorded = outcome.is_recorded();
            match outcome {
                MessageOutcome::Recorded { record, priority } => {
                    self.consolidator.ingest(record, priority);
                    recorded += 1;
                }
                MessageOutcome::Failed { reason, partial } => {
                    self.sink.record(origin, reason, partial);
                    failed += 1;
                }
            }
            self.progress.report(ProgressEvent::MessageFinished {
                label: label.to_string(),
                message_id: origin.message_id.clone(),
                row_number: origin.row_number,
                total: origin.total_in_batch,
                recorded: is_recorded,
            });
        }

        self.progress.report(ProgressEvent::BatchFinished {
            label: label.to_string(),
            recorded,
            failed,
        });
    }
}
