//! Assertion macros for tests of validators
//!
//! ```rust
//! use favre_validators::prelude::*;
//! use favre_validators::{assert_failure, assert_success, assert_validation_errors};
//! use serde_json::json;
//!
//! assert_success!(validate_string(json!("Lyon")));
//! assert_failure!(validate_string(json!(69)));
//! assert_validation_errors!(
//!     tuple![validate_string, validate_integer].validate(json!([1, 2])),
//!     json!({"0": "Expected a string, got \"number\""})
//! );
//! ```

/// Assert that a validation succeeds.
///
/// Panics with the error when the validation carries one. Evaluates to the
/// validated value.
///
/// # Example
///
/// ```rust
/// use favre_validators::prelude::*;
/// use favre_validators::assert_success;
/// use serde_json::json;
///
/// let value = assert_success!(validate_trim(json!(" 5 ")));
/// assert_eq!(value, json!("5"));
/// ```
#[macro_export]
macro_rules! assert_success {
    ($validation:expr) => {
        match $validation {
            $crate::Validation { value, error: None } => value,
            $crate::Validation {
                value,
                error: Some(e),
            } => {
                panic!("Expected success, got error {} for {}", e, value);
            }
        }
    };
}

/// Assert that a validation fails.
///
/// Panics with the value when the validation succeeded. Evaluates to the
/// error.
///
/// # Example
///
/// ```rust
/// use favre_validators::prelude::*;
/// use favre_validators::assert_failure;
/// use serde_json::json;
///
/// let error = assert_failure!(validate_integer(json!("5")));
/// assert_eq!(error.to_string(), "Expected an integer, got \"string\"");
/// ```
#[macro_export]
macro_rules! assert_failure {
    ($validation:expr) => {
        match $validation {
            $crate::Validation { error: Some(e), .. } => e,
            $crate::Validation { value, error: None } => {
                panic!("Expected failure, got success: {}", value);
            }
        }
    };
}

/// Assert that a validation fails with errors of the given JSON shape.
///
/// The error is compared through [`ValidationError::to_json`], so nested
/// aggregates can be written as `json!` literals.
///
/// [`ValidationError::to_json`]: crate::ValidationError::to_json
#[macro_export]
macro_rules! assert_validation_errors {
    ($validation:expr, $expected:expr) => {
        match $validation {
            $crate::Validation { error: Some(e), .. } => {
                assert_eq!(e.to_json(), $expected);
            }
            $crate::Validation { value, error: None } => {
                panic!(
                    "Expected failure with errors {}, got success: {}",
                    $expected, value
                );
            }
        }
    };
}
