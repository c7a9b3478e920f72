//! The `Validator` trait and boxing helpers
//!
//! A validator is any pure function from a candidate [`Value`] to a
//! [`Validation`]. Plain functions and closures with that signature are
//! validators through a blanket impl, and the combinator structs of this crate
//! implement the trait directly.
//!
//! # Example
//!
//! ```rust
//! use favre_validators::prelude::*;
//! use favre_validators::primitives::{validate_string, validate_trim};
//! use serde_json::json;
//!
//! let trimmed = validate_string.then(validate_trim);
//! assert_eq!(trimmed.validate(json!(" a ")), Validation::valid(json!("a")));
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::combinators::Chain;
use crate::Validation;

/// A pure function from a candidate value to a [`Validation`].
///
/// Validators hold no state between calls and may be shared across threads.
pub trait Validator: Send + Sync {
    /// Validate (and possibly transform) `value`.
    fn validate(&self, value: Value) -> Validation;
}

// Blanket impl for functions and closures
impl<F> Validator for F
where
    F: Fn(Value) -> Validation + Send + Sync,
{
    #[inline]
    fn validate(&self, value: Value) -> Validation {
        self(value)
    }
}

/// A type-erased, cheaply cloneable validator.
///
/// Combinators that hold heterogeneous lists of validators store them boxed.
/// Cloning shares the underlying validator.
#[derive(Clone)]
pub struct BoxedValidator(Arc<dyn Validator>);

impl BoxedValidator {
    /// Erase the type of `validator`.
    pub fn new<V: Validator + 'static>(validator: V) -> Self {
        BoxedValidator(Arc::new(validator))
    }
}

impl Validator for BoxedValidator {
    #[inline]
    fn validate(&self, value: Value) -> Validation {
        self.0.validate(value)
    }
}

impl fmt::Debug for BoxedValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BoxedValidator")
    }
}

/// Extension methods available on every validator.
pub trait ValidatorExt: Validator + Sized + 'static {
    /// Run `next` on this validator's output when this one succeeds.
    ///
    /// Repeated calls extend the same chain.
    ///
    /// ```rust
    /// use favre_validators::prelude::*;
    /// use favre_validators::primitives::{validate_string, validate_string_to_number, validate_integer};
    /// use serde_json::json;
    ///
    /// let year = validate_string.then(validate_string_to_number).then(validate_integer);
    /// assert_eq!(year.validate(json!("1850")), Validation::valid(json!(1850)));
    /// ```
    fn then<V: Validator + 'static>(self, next: V) -> Chain {
        Chain::new(vec![BoxedValidator::new(self), BoxedValidator::new(next)])
    }

    /// Erase this validator's type.
    fn boxed(self) -> BoxedValidator {
        BoxedValidator::new(self)
    }
}

impl<V: Validator + 'static> ValidatorExt for V {}
