//! Primitive validators
//!
//! Leaf validators for the closed set of value kinds, plus the string
//! trimming and coercion steps every form field goes through. `null` stands
//! for both an explicit null and an absent field.
//!
//! # Example
//!
//! ```rust
//! use favre_validators::prelude::*;
//! use serde_json::json;
//!
//! assert_eq!(
//!     validate_non_empty_trimmed_string(json!("  Lyon ")),
//!     Validation::valid(json!("Lyon")),
//! );
//! assert_eq!(
//!     validate_maybe_trimmed_string(json!("   ")),
//!     Validation::valid(json!(null)),
//! );
//! assert_eq!(
//!     validate_integer(json!("5")).error.unwrap().to_string(),
//!     "Expected an integer, got \"string\"",
//! );
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Number, Value};

use crate::combinators::{option, Branch, Chain, Options};
use crate::validator::ValidatorExt;
use crate::{Kind, Validation, ValidationError, Validator};

fn expect_kind(value: Value, expected: Kind) -> Validation {
    match Kind::of(&value) {
        Kind::Null => Validation::invalid(value, ValidationError::Missing),
        found if found == expected => Validation::valid(value),
        found => Validation::invalid(value, ValidationError::Type { expected, found }),
    }
}

/// Reject `null`.
pub fn validate_present(value: Value) -> Validation {
    if value.is_null() {
        Validation::invalid(value, ValidationError::Missing)
    } else {
        Validation::valid(value)
    }
}

/// Accept character strings only.
pub fn validate_string(value: Value) -> Validation {
    expect_kind(value, Kind::String)
}

/// Accept booleans only.
pub fn validate_boolean(value: Value) -> Validation {
    expect_kind(value, Kind::Boolean)
}

/// Accept integral numbers only. Numeric-looking strings are rejected.
pub fn validate_integer(value: Value) -> Validation {
    expect_kind(value, Kind::Integer)
}

/// Accept plain mappings only.
pub fn validate_object(value: Value) -> Validation {
    expect_kind(value, Kind::Object)
}

/// Reject `null`, empty arrays, empty objects and empty strings.
///
/// Other kinds pass unchanged.
pub fn validate_non_empty(value: Value) -> Validation {
    if value.is_null() {
        return Validation::invalid(value, ValidationError::Missing);
    }
    let message = match &value {
        Value::Array(array) if array.is_empty() => Some("Expected a non empty array"),
        Value::Object(object) if object.is_empty() => Some("Expected a non empty object"),
        Value::String(s) if s.is_empty() => Some("Expected a non empty string"),
        _ => None,
    };
    match message {
        Some(message) => Validation::invalid(value, message),
        None => Validation::valid(value),
    }
}

/// Trim strings; anything else passes through.
pub fn validate_trim(value: Value) -> Validation {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.len() == s.len() {
                Validation::valid(s)
            } else {
                Validation::valid(trimmed)
            }
        }
        other => Validation::valid(other),
    }
}

/// A string, trimmed.
pub fn validate_trimmed_string(value: Value) -> Validation {
    validate_string(value).and_then(validate_trim)
}

/// A string that is not blank, trimmed.
///
/// Trimming is idempotent, so re-validating the output is a no-op.
pub fn validate_non_empty_trimmed_string(value: Value) -> Validation {
    validate_trimmed_string(value).and_then(validate_non_empty)
}

static MAYBE_TRIMMED_STRING: Lazy<Options> = Lazy::new(|| {
    option([
        Branch::new(validate_missing),
        Branch::new(validate_string)
            .then(validate_trim)
            .then(validate_empty_to_null),
    ])
});

/// An optional string: `null` stays `null`, strings are trimmed and blank
/// strings become `null`.
///
/// Any other kind fails with the errors of both alternatives.
pub fn validate_maybe_trimmed_string(value: Value) -> Validation {
    MAYBE_TRIMMED_STRING.validate(value)
}

/// Replace `null`, `[]`, `{}` and blank strings with `null`. Never fails.
pub fn validate_empty_to_null(value: Value) -> Validation {
    let empty = match &value {
        Value::Null => true,
        Value::Array(array) => array.is_empty(),
        Value::Object(object) => object.is_empty(),
        Value::String(s) => s.trim().is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    };
    if empty {
        Validation::valid(Value::Null)
    } else {
        Validation::valid(value)
    }
}

/// Accept only `null`.
pub fn validate_missing(value: Value) -> Validation {
    if value.is_null() {
        Validation::valid(Value::Null)
    } else {
        Validation::invalid(value, "Expected null or undefined")
    }
}

static EMPTY: Lazy<Chain> = Lazy::new(|| validate_empty_to_null.then(validate_missing));

/// Accept only empty values (see [`validate_empty_to_null`]), normalised to `null`.
pub fn validate_empty(value: Value) -> Validation {
    EMPTY.validate(value)
}

/// Coerce numeric text (and booleans) to a number.
///
/// Strings are trimmed, an empty string is `0`, `0x`/`0o`/`0b` prefixes are
/// honoured and booleans become `1`/`0`. Integral results are stored as JSON
/// integers so [`validate_integer`] accepts them. Infinities have no JSON
/// representation and are rejected.
///
/// ```rust
/// use favre_validators::prelude::*;
/// use serde_json::json;
///
/// assert_eq!(validate_string_to_number(json!(" 1850 ")), Validation::valid(json!(1850)));
/// assert_eq!(validate_string_to_number(json!("0x10")), Validation::valid(json!(16)));
/// assert!(validate_string_to_number(json!("12abc")).is_invalid());
/// ```
pub fn validate_string_to_number(value: Value) -> Validation {
    if value.is_null() {
        return Validation::invalid(value, ValidationError::Missing);
    }
    if value.is_number() {
        return Validation::valid(value);
    }
    let number = match &value {
        Value::Null | Value::Number(_) => None,
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => parse_number(s),
        Value::Array(_) | Value::Object(_) => None,
    };
    match number.and_then(number_value) {
        Some(number) => Validation::valid(number),
        None => Validation::invalid(value, "Not a number"),
    }
}

fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return Some(0.0);
    }

    let radix = match text.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &text[2..];
        if digits.is_empty() {
            return None;
        }
        // past 2^64 the literal is still a (rounded) number
        return digits.chars().try_fold(0.0_f64, |total, c| {
            c.to_digit(radix).map(|digit| total * f64::from(radix) + f64::from(digit))
        });
    }

    // `f64::from_str` also accepts "inf" and "nan"
    if text
        .chars()
        .any(|c| c.is_alphabetic() && c != 'e' && c != 'E')
    {
        return None;
    }
    text.parse::<f64>().ok()
}

fn number_value(number: f64) -> Option<Value> {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    if !number.is_finite() {
        return None;
    }
    if number.fract() == 0.0 && number.abs() <= MAX_SAFE_INTEGER {
        return Some(Value::from(number as i64));
    }
    Number::from_f64(number).map(Value::Number)
}

/// Coerce yes/no text to a boolean.
///
/// The trimmed text `""`, `"non"` or `"false"` is `false`; `"oui"` or
/// `"true"` is `true`. Anything else fails with `Invalid boolean text: ...`.
pub fn validate_string_to_boolean(value: Value) -> Validation {
    let result = validate_trimmed_string(value);
    if result.is_invalid() {
        return result;
    }
    match result.value.as_str() {
        Some("" | "non" | "false") => Validation::valid(false),
        Some("oui" | "true") => Validation::valid(true),
        _ => {
            let message = format!(
                "Invalid boolean text: {}",
                crate::combinators::raw_text(&result.value)
            );
            Validation::invalid(result.value, message)
        }
    }
}

static FRENCH_DATE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}$").ok());

/// A trimmed `d/m/yyyy` date, as written in the Favre spreadsheets.
///
/// Only the shape is checked; `31/02/1850` passes.
pub fn validate_french_date(value: Value) -> Validation {
    let result = validate_non_empty_trimmed_string(value);
    if result.is_invalid() {
        return result;
    }
    let matches = match (FRENCH_DATE.as_ref(), result.value.as_str()) {
        (Some(pattern), Some(text)) => pattern.is_match(text),
        _ => false,
    };
    if matches {
        result
    } else {
        Validation::invalid(result.value, "Invalid french date")
    }
}

/// A French date converted to an ISO `yyyy-mm-dd` string.
///
/// ```rust
/// use favre_validators::prelude::*;
/// use serde_json::json;
///
/// assert_eq!(
///     validate_french_date_to_iso_date(json!(" 1/7/1875")),
///     Validation::valid(json!("1875-07-01")),
/// );
/// ```
pub fn validate_french_date_to_iso_date(value: Value) -> Validation {
    let result = validate_french_date(value);
    if result.is_invalid() {
        return result;
    }
    let iso = result.value.as_str().and_then(|text| {
        let mut parts = text.split('/');
        let (day, month, year) = (parts.next()?, parts.next()?, parts.next()?);
        Some(format!("{year}-{month:0>2}-{day:0>2}"))
    });
    match iso {
        Some(iso) => Validation::valid(iso),
        None => Validation::invalid(result.value, "Invalid french date"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn missing() -> Option<ValidationError> {
        Some(ValidationError::Missing)
    }

    #[test]
    fn test_required_primitives_reject_null() {
        for validator in [
            validate_present,
            validate_string,
            validate_boolean,
            validate_integer,
            validate_object,
            validate_non_empty,
            validate_non_empty_trimmed_string,
            validate_trimmed_string,
            validate_string_to_number,
        ] {
            assert_eq!(validator(Value::Null).error, missing());
        }
    }

    #[test]
    fn test_optional_primitives_accept_null() {
        for validator in [
            validate_missing,
            validate_maybe_trimmed_string,
            validate_empty_to_null,
            validate_empty,
            validate_trim,
        ] {
            assert_eq!(validator(Value::Null), Validation::valid(Value::Null));
        }
    }

    #[test]
    fn test_type_checks() {
        assert!(validate_string(json!("")).is_valid());
        assert_eq!(
            validate_string(json!(1)).error.unwrap().to_string(),
            "Expected a string, got \"number\""
        );
        assert!(validate_boolean(json!(false)).is_valid());
        assert_eq!(
            validate_boolean(json!("true")).error.unwrap().to_string(),
            "Expected a boolean, got \"string\""
        );
        assert!(validate_object(json!({})).is_valid());
        assert_eq!(
            validate_object(json!([])).error.unwrap().to_string(),
            "Expected an object, got \"array\""
        );
    }

    #[test]
    fn test_integer() {
        assert!(validate_integer(json!(5)).is_valid());
        assert!(validate_integer(json!(-5)).is_valid());
        assert!(validate_integer(json!(5.0)).is_valid());
        assert_eq!(
            validate_integer(json!(5.5)).error.unwrap().to_string(),
            "Expected an integer, got \"number\""
        );
        let result = validate_integer(json!("5"));
        assert_eq!(result.value, json!("5"));
        assert_eq!(
            result.error.unwrap().to_string(),
            "Expected an integer, got \"string\""
        );
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(
            validate_non_empty(json!([])).error,
            Some(ValidationError::message("Expected a non empty array"))
        );
        assert_eq!(
            validate_non_empty(json!({})).error,
            Some(ValidationError::message("Expected a non empty object"))
        );
        assert_eq!(
            validate_non_empty(json!("")).error,
            Some(ValidationError::message("Expected a non empty string"))
        );
        assert!(validate_non_empty(json!(" ")).is_valid());
        assert!(validate_non_empty(json!(0)).is_valid());
        assert!(validate_non_empty(json!(false)).is_valid());
    }

    #[test]
    fn test_non_empty_trimmed_string() {
        assert_eq!(
            validate_non_empty_trimmed_string(json!("\t abc \n")),
            Validation::valid(json!("abc"))
        );
        assert_eq!(
            validate_non_empty_trimmed_string(json!("   ")),
            Validation::invalid(json!(""), "Expected a non empty string")
        );
        assert!(validate_non_empty_trimmed_string(json!(3)).is_invalid());
    }

    #[test]
    fn test_maybe_trimmed_string() {
        assert_eq!(
            validate_maybe_trimmed_string(json!(" note ")),
            Validation::valid(json!("note"))
        );
        assert_eq!(
            validate_maybe_trimmed_string(json!("  ")),
            Validation::valid(Value::Null)
        );
        let result = validate_maybe_trimmed_string(json!(12));
        assert_eq!(result.value, json!(12));
        assert_eq!(
            result.error,
            Some(ValidationError::Alternatives(vec![
                ValidationError::message("Expected null or undefined"),
                ValidationError::Type {
                    expected: Kind::String,
                    found: Kind::Integer
                },
            ]))
        );
    }

    #[test]
    fn test_empty_to_null() {
        assert_eq!(validate_empty_to_null(json!([])), Validation::valid(Value::Null));
        assert_eq!(validate_empty_to_null(json!({})), Validation::valid(Value::Null));
        assert_eq!(validate_empty_to_null(json!(" ")), Validation::valid(Value::Null));
        assert_eq!(validate_empty_to_null(json!(0)), Validation::valid(json!(0)));
        assert_eq!(validate_empty_to_null(json!(" a ")), Validation::valid(json!(" a ")));
    }

    #[test]
    fn test_missing_and_empty() {
        assert_eq!(
            validate_missing(json!(0)),
            Validation::invalid(json!(0), "Expected null or undefined")
        );
        assert_eq!(validate_empty(json!("  ")), Validation::valid(Value::Null));
        assert_eq!(
            validate_empty(json!("x")),
            Validation::invalid(json!("x"), "Expected null or undefined")
        );
    }

    #[test]
    fn test_string_to_number() {
        assert_eq!(validate_string_to_number(json!("42")), Validation::valid(json!(42)));
        assert_eq!(validate_string_to_number(json!("-1.5")), Validation::valid(json!(-1.5)));
        assert_eq!(validate_string_to_number(json!("1e3")), Validation::valid(json!(1000)));
        assert_eq!(validate_string_to_number(json!("")), Validation::valid(json!(0)));
        assert_eq!(validate_string_to_number(json!("0b101")), Validation::valid(json!(5)));
        assert_eq!(validate_string_to_number(json!(true)), Validation::valid(json!(1)));
        assert_eq!(validate_string_to_number(json!(7.5)), Validation::valid(json!(7.5)));
        for text in ["abc", "1,5", "inf", "NaN", "Infinity", "0x", "0xZZ", "--1"] {
            assert_eq!(
                validate_string_to_number(json!(text)),
                Validation::invalid(json!(text), "Not a number"),
                "{text}"
            );
        }
        assert!(validate_string_to_number(json!({})).is_invalid());
    }

    #[test]
    fn test_prefixed_literals_past_u64() {
        assert_eq!(
            validate_string_to_number(json!("0x10000000000000000")),
            Validation::valid(json!(18_446_744_073_709_551_616.0))
        );
        assert_eq!(
            validate_string_to_number(json!("0o777")),
            Validation::valid(json!(511))
        );
        assert!(validate_string_to_number(json!("0b102")).is_invalid());
    }

    #[test]
    fn test_string_to_number_then_integer() {
        let year = validate_string
            .then(validate_string_to_number)
            .then(validate_integer);
        assert_eq!(year.validate(json!("1850")), Validation::valid(json!(1850)));
        assert!(year.validate(json!("1850.5")).is_invalid());
    }

    #[test]
    fn test_string_to_boolean() {
        assert_eq!(validate_string_to_boolean(json!(" oui ")), Validation::valid(true));
        assert_eq!(validate_string_to_boolean(json!("non")), Validation::valid(false));
        assert_eq!(validate_string_to_boolean(json!("")), Validation::valid(false));
        assert_eq!(validate_string_to_boolean(json!("true")), Validation::valid(true));
        assert_eq!(
            validate_string_to_boolean(json!(" peut-être ")),
            Validation::invalid(json!("peut-être"), "Invalid boolean text: peut-être")
        );
        assert!(validate_string_to_boolean(json!(true)).is_invalid());
    }

    #[test]
    fn test_trim_leaves_non_strings() {
        assert_eq!(validate_trim(json!([" a "])), Validation::valid(json!([" a "])));
    }

    #[test]
    fn test_french_dates() {
        assert_eq!(
            validate_french_date(json!(" 14/07/1890 ")),
            Validation::valid(json!("14/07/1890"))
        );
        assert_eq!(
            validate_french_date_to_iso_date(json!("14/7/1890")),
            Validation::valid(json!("1890-07-14"))
        );
        for text in ["1890-07-14", "14/07/90", "14/07/1890 bis", "le 14/07/1890"] {
            assert_eq!(
                validate_french_date_to_iso_date(json!(text)),
                Validation::invalid(json!(text), "Invalid french date"),
                "{text}"
            );
        }
        assert_eq!(
            validate_french_date(json!("")).error,
            Some(ValidationError::message("Expected a non empty string"))
        );
        assert_eq!(validate_french_date(Value::Null).error, missing());
    }
}
