pub mod context;
pub mod progress;
pub mod runner;

pub use context::{MessageState, PipelineContext};
pub use progress::{LogProgress, NoopProgress, ProgressEvent, ProgressReporter};
pub use runner::{MessageOutcome, Pipeline};
