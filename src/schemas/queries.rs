//! Request query schemas
//!
//! Query string values always arrive as text, so numeric parameters go
//! through [`validate_string_to_number`] before their range check.

use crate::combinators::{option, test, Branch, Chain, Options};
use crate::fields::Fields;
use crate::predicate::{ge, lt, non_negative, PredicateExt};
use crate::primitives::*;
use crate::{chain, Kind};

const NEGATIVE_NUMBER: &str = "Le nombre doit être positif ou nul.";
const YEAR_RANGE: &str = "Expected a year between 1700 and 1999";

fn query() -> Fields {
    Fields::new()
        .on_missing("Missing query")
        .on_wrong_type(|kind: Kind| format!("Expected an object, got {kind}"))
}

/// Numeric text holding an integer `>= 0`.
pub fn id_text() -> Chain {
    chain![
        validate_string,
        validate_string_to_number,
        validate_integer,
        test(non_negative(), NEGATIVE_NUMBER),
    ]
}

/// Numeric text holding a year of the directories, 1700 to 1999.
///
/// ```rust
/// use favre_validators::prelude::*;
/// use favre_validators::schemas::queries::year_text;
/// use serde_json::json;
///
/// assert_eq!(year_text().validate(json!("1850")), Validation::valid(json!(1850)));
/// assert_eq!(
///     year_text().validate(json!("2000")),
///     Validation::invalid(json!(2000), "Expected a year between 1700 and 1999"),
/// );
/// ```
pub fn year_text() -> Chain {
    chain![
        validate_string,
        validate_string_to_number,
        validate_integer,
        test(ge(1700).and(lt(2000)), YEAR_RANGE),
    ]
}

// absent, or committed to `text` once it is a string
fn optional(text: Chain) -> Options {
    option([Branch::new(validate_missing), Branch::from_chain(text)])
}

/// Query of the bank name autocompletion.
pub fn autocomplete_bank_query() -> Fields {
    query().field("q", validate_maybe_trimmed_string)
}

/// Query of the city name autocompletion, within a district and year.
pub fn autocomplete_city_query() -> Fields {
    query()
        .field("district", id_text())
        .field("q", validate_maybe_trimmed_string)
        .field("year", year_text())
}

/// Query of the district name autocompletion.
pub fn autocomplete_district_query() -> Fields {
    query()
        .field("q", validate_maybe_trimmed_string)
        .field("year", year_text())
}

/// Filters of the line list; every filter is optional.
pub fn lines_query() -> Fields {
    query()
        .fields(["city", "district", "page", "user"], optional(id_text()))
        .field("year", optional(year_text()))
        .on_unexpected("Ce champ est inattendu.")
}

/// Query of the page list of one year.
pub fn pages_query() -> Fields {
    query().field("year", year_text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Validation, ValidationError, Validator};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    #[test]
    fn test_pages_query() {
        assert_eq!(
            pages_query().validate(json!({"year": "1850"})),
            Validation::valid(json!({"year": 1850}))
        );

        let result = pages_query().validate(json!({"year": "1850", "foo": 1}));
        assert_eq!(result.value, json!({"year": 1850, "foo": 1}));
        assert_eq!(
            result.error,
            Some(ValidationError::fields([(
                "foo",
                ValidationError::message("Unexpected entry")
            )]))
        );
    }

    #[test]
    fn test_year_bounds() {
        for (text, valid) in [("1699", false), ("1700", true), ("1999", true), ("2000", false)] {
            assert_eq!(year_text().validate(json!(text)).is_valid(), valid, "{text}");
        }
        assert_eq!(
            year_text().validate(json!("18.5")).error.unwrap().to_string(),
            "Expected an integer, got \"number\""
        );
        assert_eq!(
            year_text().validate(json!("mil huit cent")),
            Validation::invalid(json!("mil huit cent"), "Not a number")
        );
    }

    #[test]
    fn test_query_shape_errors() {
        assert_eq!(
            autocomplete_bank_query().validate(Value::Null),
            Validation::invalid(Value::Null, "Missing query")
        );
        assert_eq!(
            autocomplete_bank_query().validate(json!([])).error.unwrap().to_string(),
            "Expected an object, got array"
        );
    }

    #[test]
    fn test_autocomplete_city_query() {
        let result = autocomplete_city_query().validate(json!({
            "district": "69",
            "q": " Ly ",
            "year": "1875",
        }));
        assert_eq!(
            result,
            Validation::valid(json!({"district": 69, "q": "Ly", "year": 1875}))
        );

        let result = autocomplete_city_query().validate(json!({"district": "-3"}));
        assert_eq!(
            result.error.unwrap().to_json(),
            json!({"district": NEGATIVE_NUMBER, "year": "Missing value"})
        );
    }

    #[test]
    fn test_autocomplete_district_query_without_text() {
        let result = autocomplete_district_query().validate(json!({"year": "1900"}));
        assert_eq!(result, Validation::valid(json!({"q": null, "year": 1900})));
    }

    #[test]
    fn test_lines_query_filters_are_optional() {
        let result = lines_query().validate(json!({}));
        assert_eq!(
            result,
            Validation::valid(json!({
                "city": null,
                "district": null,
                "page": null,
                "user": null,
                "year": null,
            }))
        );

        let result = lines_query().validate(json!({"page": "12", "year": "1650", "sort": "asc"}));
        assert_eq!(result.value["page"], json!(12));
        assert_eq!(
            result.error.unwrap().to_json(),
            json!({"sort": "Ce champ est inattendu.", "year": YEAR_RANGE})
        );
    }

    #[test]
    fn test_lines_query_keeps_committed_errors() {
        let result = lines_query().validate(json!({"city": "-1", "user": "x", "year": 1850}));
        assert_eq!(
            result.error,
            Some(ValidationError::fields([
                ("city", ValidationError::message(NEGATIVE_NUMBER)),
                ("user", ValidationError::message("Not a number")),
                (
                    "year",
                    ValidationError::Alternatives(vec![
                        ValidationError::message("Expected null or undefined"),
                        ValidationError::type_mismatch(Kind::String, &json!(1850)),
                    ])
                ),
            ]))
        );
    }
}
