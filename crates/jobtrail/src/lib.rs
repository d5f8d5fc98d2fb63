pub mod classifier;
pub mod config;
pub mod consolidate;
pub mod email;
pub mod engine;
pub mod error;
pub mod extract;
pub mod failure;
pub mod logging;
pub mod pipeline;
pub mod record;
pub mod storage;
pub mod worker;

pub use classifier::{ClassificationError, LabelClassifier};
pub use config::{load_config, Config, DateRange, LabelAssignment, ParserType};
pub use consolidate::{ConsolidatedTable, Consolidator, MergeOutcome, StatusGroup};
pub use email::{decode_body, ContentType, DecodeError, MessageMetadata, RawMessage};
pub use engine::{Engine, LabelBatch, RunOutput};
pub use error::{ConfigError, JobtrailError, Result, StorageError, WorkerError};
pub use extract::{extract_record, ExtractionError};
pub use failure::{FailureReason, FailureRecord, FailureSink};
pub use logging::{init_tracing, LogFormat};
pub use pipeline::{LogProgress, NoopProgress, Pipeline, ProgressEvent, ProgressReporter};
pub use record::{ApplicationRecord, ApplicationStatus, IdentityKey};
pub use storage::{ArtifactWriter, JsonArtifactWriter};
