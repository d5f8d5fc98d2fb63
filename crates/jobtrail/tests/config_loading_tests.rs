//! Table-driven tests for configuration loading and validation.

mod common;

use std::io::Write;

use jobtrail::config::{load_config, load_config_from_str, DateRange, ParserType};
use jobtrail::engine::Engine;
use jobtrail::error::ConfigError;

use common::{AssignmentBuilder, ConfigBuilder};

/// Represents a single config loading test case.
struct ConfigTestCase {
    /// Test case name for identification.
    name: &'static str,
    /// The config JSON content to test.
    config_json: &'static str,
    /// Whether loading should succeed.
    should_succeed: bool,
    /// Expected error substring (if should_succeed is false).
    expected_error: Option<&'static str>,
}

const JSON_CONFIG_TESTS: &[ConfigTestCase] = &[
    ConfigTestCase {
        name: "valid_minimal",
        config_json: r#"{ "version": "1.0", "labels": [] }"#,
        should_succeed: true,
        expected_error: None,
    },
    ConfigTestCase {
        name: "valid_full",
        config_json: r#"{
            "version": "1.0",
            "worker_count": 8,
            "output_directory": "/srv/jobs",
            "date_range": "2024-01-01:2024-01-31",
            "labels": [
                { "label_name": "Jobs/Applied", "status": "Applied", "priority": 1, "parser_type": "applied" },
                { "label_name": "Jobs/Rejected", "status": "Rejected", "priority": 5, "parser_type": "viewed_rejected" }
            ]
        }"#,
        should_succeed: true,
        expected_error: None,
    },
    ConfigTestCase {
        name: "missing_labels",
        config_json: r#"{ "version": "1.0" }"#,
        should_succeed: false,
        expected_error: Some("Schema validation failed"),
    },
    ConfigTestCase {
        name: "unknown_field",
        config_json: r#"{ "version": "1.0", "labels": [], "input_directory": "/in" }"#,
        should_succeed: false,
        expected_error: Some("Schema validation failed"),
    },
    ConfigTestCase {
        name: "unknown_parser_type",
        config_json: r#"{
            "version": "1.0",
            "labels": [
                { "label_name": "A", "status": "Applied", "priority": 1, "parser_type": "pdf" }
            ]
        }"#,
        should_succeed: false,
        expected_error: Some("Schema validation failed"),
    },
    ConfigTestCase {
        name: "zero_workers",
        config_json: r#"{ "version": "1.0", "worker_count": 0, "labels": [] }"#,
        should_succeed: false,
        expected_error: Some("Schema validation failed"),
    },
    ConfigTestCase {
        name: "unsupported_version",
        config_json: r#"{ "version": "2.0", "labels": [] }"#,
        should_succeed: false,
        expected_error: Some("Unsupported config version"),
    },
    ConfigTestCase {
        name: "duplicate_label",
        config_json: r#"{
            "version": "1.0",
            "labels": [
                { "label_name": "A", "status": "Applied", "priority": 1, "parser_type": "applied" },
                { "label_name": "A", "status": "Viewed", "priority": 2, "parser_type": "viewed_rejected" }
            ]
        }"#,
        should_succeed: false,
        expected_error: Some("Duplicate label name 'A'"),
    },
    ConfigTestCase {
        name: "duplicate_priority",
        config_json: r#"{
            "version": "1.0",
            "labels": [
                { "label_name": "A", "status": "Applied", "priority": 1, "parser_type": "applied" },
                { "label_name": "B", "status": "Viewed", "priority": 1, "parser_type": "viewed_rejected" }
            ]
        }"#,
        should_succeed: false,
        expected_error: Some("Duplicate priority 1"),
    },
    ConfigTestCase {
        name: "reversed_custom_range",
        config_json: r#"{ "version": "1.0", "date_range": "2024-02-01:2024-01-01", "labels": [] }"#,
        should_succeed: false,
        expected_error: Some("Start date must be before end date"),
    },
    ConfigTestCase {
        name: "invalid_json",
        config_json: r#"{ "version": "1.0", "labels": [ }"#,
        should_succeed: false,
        expected_error: Some("Failed to parse config JSON"),
    },
];

#[test]
fn test_json_config_loading() {
    for test_case in JSON_CONFIG_TESTS {
        let result = load_config_from_str(test_case.config_json);

        if test_case.should_succeed {
            assert!(
                result.is_ok(),
                "Test '{}': Expected success but got error: {:?}",
                test_case.name,
                result.err()
            );
        } else {
            let err = match result {
                Ok(_) => panic!("Test '{}': Expected failure but succeeded", test_case.name),
                Err(e) => e.to_string(),
            };
            if let Some(expected) = test_case.expected_error {
                assert!(
                    err.contains(expected),
                    "Test '{}': Expected error containing '{}', got '{}'",
                    test_case.name,
                    expected,
                    err
                );
            }
        }
    }
}

#[test]
fn test_load_yaml_file() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    write!(
        file,
        r#"
version: "1.0"
worker_count: 2
date_range: 30d
labels:
  - label_name: LinkedIn/Applied
    status: Applied
    priority: 1
    parser_type: applied
  - label_name: LinkedIn/Rejected
    status: Rejected
    priority: 3
    parser_type: viewed_rejected
"#
    )
    .unwrap();

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.worker_count, 2);
    assert_eq!(config.date_range, DateRange::LastMonth);
    assert_eq!(config.output_directory, "data/processed");
    assert_eq!(config.labels[1].parser_type, ParserType::ViewedRejected);
}

#[test]
fn test_load_json_file() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, r#"{{ "version": "1.0", "labels": [] }}"#).unwrap();

    let config = load_config(file.path()).unwrap();
    assert!(config.labels.is_empty());
    assert_eq!(config.date_range, DateRange::All);
}

#[test]
fn test_missing_file() {
    let err = load_config("/nonexistent/jobtrail.json").unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));
}

#[test]
fn test_engine_rejects_duplicate_priority() {
    let config = ConfigBuilder::new()
        .labels(vec![
            AssignmentBuilder::new("A").priority(7).build(),
            AssignmentBuilder::new("B").priority(7).build(),
        ])
        .build();

    match Engine::new(&config) {
        Err(ConfigError::DuplicatePriority {
            priority,
            first,
            second,
        }) => {
            assert_eq!(priority, 7);
            assert_eq!(first, "A");
            assert_eq!(second, "B");
        }
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("duplicate priority accepted"),
    }
}
