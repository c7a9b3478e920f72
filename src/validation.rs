//! The validation result pair and its error type
//!
//! Every validator in this crate returns a [`Validation`]: the candidate value
//! (possibly transformed) paired with an optional [`ValidationError`]. Unlike
//! `Result`, the value is kept on failure too, so a form can be echoed back to
//! the user with the parts that did validate already cleaned up.
//!
//! # Examples
//!
//! ```
//! use favre_validators::{Validation, ValidationError};
//! use serde_json::json;
//!
//! let ok = Validation::valid(json!("abc"));
//! assert!(ok.is_valid());
//!
//! let ko = Validation::invalid(json!(null), ValidationError::Missing);
//! assert_eq!(ko.error.as_ref().map(ToString::to_string), Some("Missing value".to_string()));
//! ```
//!
//! ## Error shape
//!
//! Errors serialize to the JSON shape the HTTP layer embeds in its 400
//! responses: leaves become strings, aggregates become objects keyed by
//! index or field name, and rejected alternatives become an array.
//!
//! ```
//! use favre_validators::ValidationError;
//! use serde_json::json;
//!
//! let error = ValidationError::fields([("year", ValidationError::message("Not a number"))]);
//! assert_eq!(error.to_json(), json!({"year": "Not a number"}));
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::Validator;

/// Runtime kind of a JSON value.
///
/// This is the closed set of shapes the primitives dispatch on. A number with
/// no fractional part is an [`Kind::Integer`], matching how integers arrive in
/// parsed request bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// `null` (also stands for an absent value)
    Null,
    /// `true` or `false`
    Boolean,
    /// A number with no fractional part
    Integer,
    /// Any other number
    Number,
    /// A character string
    String,
    /// An array
    Array,
    /// A plain mapping
    Object,
}

impl Kind {
    /// Classify a value.
    ///
    /// ```
    /// use favre_validators::Kind;
    /// use serde_json::json;
    ///
    /// assert_eq!(Kind::of(&json!(5)), Kind::Integer);
    /// assert_eq!(Kind::of(&json!(5.0)), Kind::Integer);
    /// assert_eq!(Kind::of(&json!(5.5)), Kind::Number);
    /// assert_eq!(Kind::of(&json!("5")), Kind::String);
    /// ```
    pub fn of(value: &Value) -> Kind {
        match value {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Boolean,
            Value::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    Kind::Integer
                } else {
                    match n.as_f64() {
                        Some(f) if f.is_finite() && f.fract() == 0.0 => Kind::Integer,
                        _ => Kind::Number,
                    }
                }
            }
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
        }
    }

    /// Bare name, as quoted in type mismatch messages.
    ///
    /// Integers and other numbers share the name `number`; only the expected
    /// side of a mismatch tells them apart.
    ///
    /// ```
    /// use favre_validators::Kind;
    ///
    /// assert_eq!(Kind::Integer.name(), "number");
    /// assert_eq!(Kind::Integer.with_article(), "an integer");
    /// ```
    pub fn name(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Boolean => "boolean",
            Kind::Integer | Kind::Number => "number",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
        }
    }

    /// Name with its indefinite article ("a string", "an integer").
    pub fn with_article(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Boolean => "a boolean",
            Kind::Integer => "an integer",
            Kind::Number => "a number",
            Kind::String => "a string",
            Kind::Array => "an array",
            Kind::Object => "an object",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a value was rejected.
///
/// Leaf variants describe a single value; `Items`, `Fields` and
/// `Alternatives` aggregate the errors of nested validators. An index or key
/// absent from an aggregate means that element was valid.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The value is `null` or absent where one is required.
    Missing,
    /// The value has the wrong runtime kind.
    Type {
        /// Kind the validator accepts
        expected: Kind,
        /// Kind actually received
        found: Kind,
    },
    /// Any other leaf: a failed constraint, a shape mismatch, a custom text.
    Message(String),
    /// A structured leaf computed by a caller-supplied message function.
    Custom(Value),
    /// Per-position errors of a tuple or array.
    Items(BTreeMap<usize, ValidationError>),
    /// Per-field errors of an object.
    Fields(BTreeMap<String, ValidationError>),
    /// First-step errors of every rejected option branch, in branch order.
    Alternatives(Vec<ValidationError>),
}

impl ValidationError {
    /// Leaf error with a free-form message.
    pub fn message(message: impl Into<String>) -> Self {
        ValidationError::Message(message.into())
    }

    /// Type mismatch between `expected` and the kind of `value`.
    pub fn type_mismatch(expected: Kind, value: &Value) -> Self {
        ValidationError::Type {
            expected,
            found: Kind::of(value),
        }
    }

    /// Build a field aggregate from `(key, error)` pairs.
    pub fn fields<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ValidationError)>,
    {
        ValidationError::Fields(entries.into_iter().map(|(k, e)| (k.into(), e)).collect())
    }

    /// Build an item aggregate from `(index, error)` pairs.
    pub fn items<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (usize, ValidationError)>,
    {
        ValidationError::Items(entries.into_iter().collect())
    }

    /// True for `Items`, `Fields` and `Alternatives`.
    pub fn is_aggregate(&self) -> bool {
        matches!(
            self,
            ValidationError::Items(_)
                | ValidationError::Fields(_)
                | ValidationError::Alternatives(_)
        )
    }

    /// Error recorded for `key`, if this is a field aggregate.
    pub fn field(&self, key: &str) -> Option<&ValidationError> {
        match self {
            ValidationError::Fields(fields) => fields.get(key),
            _ => None,
        }
    }

    /// Error recorded at `index`, if this is an item aggregate.
    pub fn item(&self, index: usize) -> Option<&ValidationError> {
        match self {
            ValidationError::Items(items) => items.get(&index),
            _ => None,
        }
    }

    /// JSON rendering, as embedded in error responses.
    pub fn to_json(&self) -> Value {
        match self {
            ValidationError::Custom(value) => value.clone(),
            ValidationError::Items(items) => Value::Object(
                items
                    .iter()
                    .map(|(index, error)| (index.to_string(), error.to_json()))
                    .collect(),
            ),
            ValidationError::Fields(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(key, error)| (key.clone(), error.to_json()))
                    .collect(),
            ),
            ValidationError::Alternatives(errors) => {
                Value::Array(errors.iter().map(ValidationError::to_json).collect())
            }
            leaf => Value::String(leaf.to_string()),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Missing => f.write_str("Missing value"),
            ValidationError::Type { expected, found } => {
                write!(f, "Expected {}, got \"{}\"", expected.with_article(), found)
            }
            ValidationError::Message(message) => f.write_str(message),
            ValidationError::Custom(Value::String(message)) => f.write_str(message),
            ValidationError::Custom(value) => write!(f, "{value}"),
            aggregate => write!(f, "{}", aggregate.to_json()),
        }
    }
}

impl From<&str> for ValidationError {
    fn from(message: &str) -> Self {
        ValidationError::Message(message.to_string())
    }
}

impl From<String> for ValidationError {
    fn from(message: String) -> Self {
        ValidationError::Message(message)
    }
}

impl Serialize for ValidationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ValidationError::Custom(value) => value.serialize(serializer),
            ValidationError::Items(items) => {
                let mut map = serializer.serialize_map(Some(items.len()))?;
                for (index, error) in items {
                    map.serialize_entry(&index.to_string(), error)?;
                }
                map.end()
            }
            ValidationError::Fields(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, error) in fields {
                    map.serialize_entry(key, error)?;
                }
                map.end()
            }
            ValidationError::Alternatives(errors) => {
                let mut seq = serializer.serialize_seq(Some(errors.len()))?;
                for error in errors {
                    seq.serialize_element(error)?;
                }
                seq.end()
            }
            leaf => serializer.collect_str(leaf),
        }
    }
}

/// Outcome of running a validator: the candidate value and, on failure, why.
///
/// `error` is `None` if and only if `value` is valid and usable. On failure
/// `value` is either the original input or the intermediate produced by the
/// last step that ran.
#[derive(Debug, Clone, PartialEq)]
pub struct Validation {
    /// The (possibly transformed) value
    pub value: Value,
    /// `None` on success
    pub error: Option<ValidationError>,
}

impl Validation {
    /// Successful validation of `value`.
    #[inline]
    pub fn valid(value: impl Into<Value>) -> Self {
        Validation {
            value: value.into(),
            error: None,
        }
    }

    /// Failed validation of `value`.
    #[inline]
    pub fn invalid(value: impl Into<Value>, error: impl Into<ValidationError>) -> Self {
        Validation {
            value: value.into(),
            error: Some(error.into()),
        }
    }

    /// Check if the value passed.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// Check if the value was rejected.
    #[inline]
    pub fn is_invalid(&self) -> bool {
        self.error.is_some()
    }

    /// Run `next` on the value when this validation succeeded.
    ///
    /// A failed validation is returned untouched, so this is one step of a
    /// [`chain`](crate::combinators::chain).
    ///
    /// ```
    /// use favre_validators::primitives::{validate_non_empty, validate_string};
    /// use serde_json::json;
    ///
    /// let result = validate_string(json!("")).and_then(validate_non_empty);
    /// assert!(result.is_invalid());
    /// ```
    #[inline]
    pub fn and_then<V: Validator>(self, next: V) -> Validation {
        match self.error {
            None => next.validate(self.value),
            Some(_) => self,
        }
    }

    /// Split into the `(value, error)` pair.
    #[inline]
    pub fn into_parts(self) -> (Value, Option<ValidationError>) {
        (self.value, self.error)
    }

    /// Convert to a `Result`, keeping the rejected value in the error.
    ///
    /// ```
    /// use favre_validators::primitives::validate_integer;
    /// use serde_json::json;
    ///
    /// assert_eq!(validate_integer(json!(3)).into_result().ok(), Some(json!(3)));
    ///
    /// let invalid = validate_integer(json!("3")).into_result().unwrap_err();
    /// assert_eq!(invalid.value, json!("3"));
    /// ```
    pub fn into_result(self) -> Result<Value, Invalid> {
        match self.error {
            None => Ok(self.value),
            Some(error) => Err(Invalid {
                value: self.value,
                error,
            }),
        }
    }

    /// Unwrap a validation of trusted, programmer-controlled input.
    ///
    /// # Panics
    ///
    /// Panics with the pretty-printed error and value when validation failed.
    /// Never call this on user-submitted data.
    #[track_caller]
    pub fn assert_valid(self) -> Value {
        match self.into_result() {
            Ok(value) => value,
            Err(invalid) => {
                #[cfg(feature = "tracing")]
                tracing::error!(error = %invalid.error, "assertion on trusted input failed");
                panic!("{invalid}")
            }
        }
    }
}

/// Unwrap a validation of trusted input; see [`Validation::assert_valid`].
///
/// # Panics
///
/// Panics when `validation` carries an error.
#[track_caller]
pub fn assert_valid(validation: Validation) -> Value {
    validation.assert_valid()
}

/// A rejected value together with the reason it was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Error {} for {}", to_pretty_json(.error), to_pretty_json(.value))]
pub struct Invalid {
    /// The value as it stood when validation stopped
    pub value: Value,
    /// Why it was rejected
    pub error: ValidationError,
}

pub(crate) fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| String::from("<unserializable>"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_of() {
        assert_eq!(Kind::of(&json!(null)), Kind::Null);
        assert_eq!(Kind::of(&json!(true)), Kind::Boolean);
        assert_eq!(Kind::of(&json!(-3)), Kind::Integer);
        assert_eq!(Kind::of(&json!(1850.0)), Kind::Integer);
        assert_eq!(Kind::of(&json!(0.5)), Kind::Number);
        assert_eq!(Kind::of(&json!("x")), Kind::String);
        assert_eq!(Kind::of(&json!([])), Kind::Array);
        assert_eq!(Kind::of(&json!({})), Kind::Object);
    }

    #[test]
    fn test_type_message() {
        let error = ValidationError::type_mismatch(Kind::Integer, &json!("5"));
        assert_eq!(error.to_string(), "Expected an integer, got \"string\"");
    }

    #[test]
    fn test_leaf_serializes_as_string() {
        let error = ValidationError::Missing;
        assert_eq!(serde_json::to_value(&error).unwrap(), json!("Missing value"));
        assert_eq!(error.to_json(), json!("Missing value"));
    }

    #[test]
    fn test_aggregates_serialize_by_key() {
        let error = ValidationError::fields([
            (
                "menu",
                ValidationError::items([(2, ValidationError::message("Unexpected item"))]),
            ),
            (
                "prefetch",
                ValidationError::Alternatives(vec![
                    "Expected null or undefined".into(),
                    ValidationError::Type {
                        expected: Kind::Boolean,
                        found: Kind::String,
                    },
                ]),
            ),
        ]);
        let expected = json!({
            "menu": {"2": "Unexpected item"},
            "prefetch": ["Expected null or undefined", "Expected a boolean, got \"string\""],
        });
        assert_eq!(serde_json::to_value(&error).unwrap(), expected);
        assert_eq!(error.to_json(), expected);
    }

    #[test]
    fn test_custom_error_keeps_structure() {
        let error = ValidationError::Custom(json!({"code": 7}));
        assert_eq!(error.to_json(), json!({"code": 7}));
        assert!(!error.is_aggregate());
    }

    #[test]
    fn test_field_and_item_accessors() {
        let error = ValidationError::fields([("a", ValidationError::Missing)]);
        assert_eq!(error.field("a"), Some(&ValidationError::Missing));
        assert_eq!(error.field("b"), None);
        assert_eq!(error.item(0), None);

        let error = ValidationError::items([(1, ValidationError::Missing)]);
        assert_eq!(error.item(1), Some(&ValidationError::Missing));
        assert!(error.is_aggregate());
    }

    #[test]
    fn test_into_result() {
        assert_eq!(Validation::valid(json!(1)).into_result(), Ok(json!(1)));

        let invalid = Validation::invalid(json!("x"), "Not a number")
            .into_result()
            .unwrap_err();
        assert_eq!(invalid.value, json!("x"));
        assert_eq!(invalid.error, ValidationError::message("Not a number"));
        assert_eq!(invalid.to_string(), "Error \"Not a number\" for \"x\"");
    }

    #[test]
    fn test_assert_valid_returns_value() {
        assert_eq!(assert_valid(Validation::valid(json!({"a": 1}))), json!({"a": 1}));
    }

    #[test]
    #[should_panic(expected = "Error \"Missing value\" for null")]
    fn test_assert_valid_panics_on_error() {
        Validation::invalid(Value::Null, ValidationError::Missing).assert_valid();
    }
}
