//! # favre-validators
//!
//! Composable, result-returning validators for the data-entry application
//! of the Favre bank and locality directories.
//!
//! A validator takes a raw JSON value and returns a [`Validation`]: the
//! (possibly cleaned up) value together with an optional, structured
//! [`ValidationError`]. Validators never panic on bad input and never stop
//! at the first bad field of an object, so a form can report every problem
//! at once.
//!
//! ## Quick Example
//!
//! ```rust
//! use favre_validators::prelude::*;
//! use favre_validators::predicate::non_negative;
//! use serde_json::json;
//!
//! let body = Fields::new()
//!     .field("cityName", validate_non_empty_trimmed_string)
//!     .field("page", chain![validate_integer, test(non_negative(), "Le nombre doit être positif ou nul.")])
//!     .field("comment", validate_maybe_trimmed_string);
//!
//! let result = body.validate(json!({"cityName": " Lyon ", "page": 12}));
//! assert_eq!(
//!     result,
//!     Validation::valid(json!({"cityName": "Lyon", "page": 12, "comment": null})),
//! );
//!
//! let result = body.validate(json!({"cityName": "", "page": -1, "extra": true}));
//! assert_eq!(
//!     serde_json::to_value(result.error.unwrap()).unwrap(),
//!     json!({
//!         "cityName": "Expected a non empty string",
//!         "extra": "Unexpected entry",
//!         "page": "Le nombre doit être positif ou nul.",
//!     }),
//! );
//! ```
//!
//! ## Features
//!
//! - `tracing`: emit `tracing` events from the combinators and the
//!   configuration loaders.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod combinators;
pub mod fields;
pub mod predicate;
pub mod primitives;
pub mod schemas;
pub mod testing;
pub mod url;
pub mod validation;
pub mod validator;

// Re-exports
pub use fields::Fields;
pub use validation::{assert_valid, Invalid, Kind, Validation, ValidationError};
pub use validator::{BoxedValidator, Validator, ValidatorExt};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::combinators::{
        any_array, array, chain, check, choice, function, option, set_value, strict_equal, test,
        test_with, tuple, Branch,
    };
    pub use crate::fields::Fields;
    pub use crate::predicate::{Predicate, PredicateExt};
    pub use crate::primitives::*;
    pub use crate::url::validate_url;
    pub use crate::validation::{Validation, ValidationError};
    pub use crate::validator::{Validator, ValidatorExt};
    pub use crate::{chain, tuple};
}
