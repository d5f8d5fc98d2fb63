use std::collections::HashMap;
use std::path::Path;

use crate::config::schema::{Config, LabelAssignment};
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../../../schema/config-v1.json");

/// Loads a config file, choosing YAML or JSON by extension.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => load_config_from_yaml_str(&content),
        _ => load_config_from_str(&content),
    }
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;
    load_config_from_value(json_value)
}

pub fn load_config_from_yaml_str(content: &str) -> Result<Config, ConfigError> {
    let yaml_value: serde_yaml::Value = serde_yaml::from_str(content)?;
    let json_value = serde_json::to_value(yaml_value)?;
    load_config_from_value(json_value)
}

fn load_config_from_value(json_value: serde_json::Value) -> Result<Config, ConfigError> {
    validate_schema(&json_value)?;

    let config: Config = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != "1.0" {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    if config.worker_count == 0 {
        return Err(ConfigError::Validation {
            message: "worker_count must be at least 1".to_string(),
        });
    }

    validate_labels(&config.labels)
}

/// Checks the label invariants: non-empty names, unique names, unique
/// priorities. Violations are the only fatal conditions of a run.
pub fn validate_labels(labels: &[LabelAssignment]) -> Result<(), ConfigError> {
    let mut names = std::collections::HashSet::new();
    let mut priorities: HashMap<i32, &str> = HashMap::new();

    for label in labels {
        if label.label_name.trim().is_empty() {
            return Err(ConfigError::Validation {
                message: "Label name must not be empty".to_string(),
            });
        }

        if !names.insert(label.label_name.as_str()) {
            return Err(ConfigError::DuplicateLabel(label.label_name.clone()));
        }

        if let Some(first) = priorities.insert(label.priority, &label.label_name) {
            return Err(ConfigError::DuplicatePriority {
                priority: label.priority,
                first: first.to_string(),
                second: label.label_name.clone(),
            });
        }
    }

    Ok(())
}
