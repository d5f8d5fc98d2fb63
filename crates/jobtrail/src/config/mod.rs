pub mod date_range;
pub mod loader;
pub mod schema;

pub use date_range::DateRange;
pub use loader::{load_config, load_config_from_str, load_config_from_yaml_str, validate_labels};
pub use schema::{Config, LabelAssignment, ParserType};
