//! Tests for core_kernel error types

use core_kernel::error::CoreError;
use core_kernel::PortError;

#[test]
fn test_core_error_validation() {
    let error = CoreError::validation("Invalid input");

    match error {
        CoreError::Validation(msg) => assert_eq!(msg, "Invalid input"),
        _ => panic!("Expected Validation error"),
    }
}

#[test]
fn test_core_error_invalid_state() {
    let error = CoreError::invalid_state("Cannot transition from approved to rejected");

    match error {
        CoreError::InvalidStateTransition(msg) => assert!(msg.contains("Cannot transition")),
        _ => panic!("Expected InvalidStateTransition error"),
    }
}

#[test]
fn test_core_error_unknown_variant() {
    let error = CoreError::unknown_variant("claim status", "archived");
    let display = error.to_string();

    assert!(display.contains("archived"));
    assert!(display.contains("claim status"));
}

#[test]
fn test_core_error_configuration() {
    let error = CoreError::Configuration("Missing config".to_string());

    match error {
        CoreError::Configuration(msg) => assert_eq!(msg, "Missing config"),
        _ => panic!("Expected Configuration error"),
    }
}

#[test]
fn test_port_error_validation_field() {
    let error = PortError::validation_field("must not be empty", "file_name");

    match error {
        PortError::Validation { message, field } => {
            assert_eq!(message, "must not be empty");
            assert_eq!(field.as_deref(), Some("file_name"));
        }
        _ => panic!("Expected Validation error"),
    }
}
