pub mod resolver;

pub use resolver::{ClassificationError, LabelClassifier};
