//! Closed-shape object validation
//!
//! [`Fields`] validates a JSON object against a fixed list of expected keys.
//! Each declared field is validated independently and every key the object
//! carries that was not declared is reported as unexpected, so a request body
//! can never smuggle extra data past its schema.
//!
//! # Example
//!
//! ```rust
//! use favre_validators::prelude::*;
//! use favre_validators::predicate::{ge, lt};
//! use serde_json::json;
//!
//! let query = Fields::new().field(
//!     "year",
//!     chain![
//!         validate_string,
//!         validate_string_to_number,
//!         validate_integer,
//!         test(ge(1700).and(lt(2000)), "Expected a year between 1700 and 1999"),
//!     ],
//! );
//!
//! assert_eq!(query.validate(json!({"year": "1850"})), Validation::valid(json!({"year": 1850})));
//!
//! let result = query.validate(json!({"year": "1850", "foo": 1}));
//! assert_eq!(result.value, json!({"year": 1850, "foo": 1}));
//! assert_eq!(result.error.unwrap().to_json(), json!({"foo": "Unexpected entry"}));
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde_json::Value;

use crate::validator::{BoxedValidator, Validator};
use crate::{Kind, Validation, ValidationError};

struct FieldRule {
    key: String,
    validator: BoxedValidator,
    required: bool,
}

type KindMessage = Box<dyn Fn(Kind) -> ValidationError + Send + Sync>;

/// Validator for an object with an exact, declared set of keys.
///
/// Messages default to "Missing value" (input is null), `Expected an object,
/// got "<kind>"` (input is not an object), "Missing item" (a required key is
/// absent) and "Unexpected entry" (an undeclared key is present); each can be
/// replaced to match the wording of the calling form.
pub struct Fields {
    rules: Vec<FieldRule>,
    missing: ValidationError,
    wrong_type: Option<KindMessage>,
    absent: ValidationError,
    unexpected: ValidationError,
}

impl Default for Fields {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&str> = self.rules.iter().map(|rule| rule.key.as_str()).collect();
        f.debug_struct("Fields")
            .field("keys", &keys)
            .field("unexpected", &self.unexpected)
            .finish()
    }
}

impl Fields {
    /// An object schema with no fields yet; only `{}` passes.
    pub fn new() -> Self {
        Fields {
            rules: Vec::new(),
            missing: ValidationError::Missing,
            wrong_type: None,
            absent: ValidationError::message("Missing item"),
            unexpected: ValidationError::message("Unexpected entry"),
        }
    }

    /// Declare `key`, validated by `validator`.
    ///
    /// An absent key is validated as `null`, so optional fields are written
    /// with validators that accept `null`.
    pub fn field<V: Validator + 'static>(self, key: impl Into<String>, validator: V) -> Self {
        self.rule(key.into(), BoxedValidator::new(validator), false)
    }

    /// Declare several keys sharing one validator.
    pub fn fields<I, K, V>(mut self, keys: I, validator: V) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
        V: Validator + 'static,
    {
        let validator = BoxedValidator::new(validator);
        for key in keys {
            self = self.rule(key.into(), validator.clone(), false);
        }
        self
    }

    /// Declare `key` as required: when absent it fails with the missing-item
    /// message and `validator` is not run.
    pub fn required<V: Validator + 'static>(self, key: impl Into<String>, validator: V) -> Self {
        self.rule(key.into(), BoxedValidator::new(validator), true)
    }

    /// Declare several required keys sharing one validator.
    pub fn required_fields<I, K, V>(mut self, keys: I, validator: V) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
        V: Validator + 'static,
    {
        let validator = BoxedValidator::new(validator);
        for key in keys {
            self = self.rule(key.into(), validator.clone(), true);
        }
        self
    }

    fn rule(mut self, key: String, validator: BoxedValidator, required: bool) -> Self {
        self.rules.push(FieldRule {
            key,
            validator,
            required,
        });
        self
    }

    /// Error reported when the whole input is `null`.
    pub fn on_missing(mut self, error: impl Into<ValidationError>) -> Self {
        self.missing = error.into();
        self
    }

    /// Error reported when the input is not an object, from its kind.
    pub fn on_wrong_type<F, E>(mut self, message: F) -> Self
    where
        F: Fn(Kind) -> E + Send + Sync + 'static,
        E: Into<ValidationError>,
    {
        self.wrong_type = Some(Box::new(move |kind| message(kind).into()));
        self
    }

    /// Error reported for an absent required key.
    pub fn on_absent(mut self, error: impl Into<ValidationError>) -> Self {
        self.absent = error.into();
        self
    }

    /// Error reported for every undeclared key.
    pub fn on_unexpected(mut self, error: impl Into<ValidationError>) -> Self {
        self.unexpected = error.into();
        self
    }
}

impl Validator for Fields {
    fn validate(&self, value: Value) -> Validation {
        let mut object = match value {
            Value::Null => return Validation::invalid(Value::Null, self.missing.clone()),
            Value::Object(object) => object,
            other => {
                let found = Kind::of(&other);
                let error = match &self.wrong_type {
                    Some(message) => message(found),
                    None => ValidationError::Type {
                        expected: Kind::Object,
                        found,
                    },
                };
                return Validation::invalid(other, error);
            }
        };

        let mut remaining: BTreeSet<String> = object.keys().cloned().collect();
        let mut errors = BTreeMap::new();

        for rule in &self.rules {
            let present = remaining.remove(&rule.key);
            if rule.required && !present {
                errors.insert(rule.key.clone(), self.absent.clone());
                continue;
            }
            let field = object.remove(&rule.key).unwrap_or(Value::Null);
            let result = rule.validator.validate(field);
            object.insert(rule.key.clone(), result.value);
            if let Some(error) = result.error {
                errors.insert(rule.key.clone(), error);
            }
        }

        for key in remaining {
            #[cfg(feature = "tracing")]
            tracing::trace!(field = %key, "unexpected field");
            errors.insert(key, self.unexpected.clone());
        }

        if errors.is_empty() {
            Validation::valid(object)
        } else {
            Validation::invalid(object, ValidationError::Fields(errors))
        }
    }
}
