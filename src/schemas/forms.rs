//! Request body schemas
//!
//! Every form posted by the front end is validated before anything touches
//! the database. A rejected body is echoed back with the error attached, see
//! [`rejection`] and [`validate_form`].

use serde_json::{json, Map, Value};

use crate::combinators::{option, test, Branch};
use crate::fields::Fields;
use crate::predicate::{non_negative, significant};
use crate::primitives::*;
use crate::{chain, Kind, Validator, ValidationError};

/// Message of every 400 rejection body.
pub const FORM_ERROR_MESSAGE: &str = "Le formulaire contient des erreurs.";

const NEGATIVE_NUMBER: &str = "Le nombre doit être positif ou nul.";
const UNEXPECTED_FIELD: &str = "Ce champ est inattendu.";

fn form() -> Fields {
    Fields::new()
        .on_missing("Le formulaire est vide.")
        .on_wrong_type(|kind: Kind| {
            format!(
                "Le formulaire devrait être un \"object\" et non pas un \"{}\".",
                kind.name()
            )
        })
}

fn non_negative_integer() -> crate::combinators::Chain {
    chain![validate_integer, test(non_negative(), NEGATIVE_NUMBER)]
}

/// Body of the line editor, creating a line when `lineId` is absent.
pub fn upsert_line_body() -> Fields {
    form()
        .fields(
            ["cityId", "corporationId", "districtId", "page", "year"],
            non_negative_integer(),
        )
        .fields(
            ["cityName", "corporationName", "districtName"],
            validate_non_empty_trimmed_string,
        )
        .field("comment", validate_maybe_trimmed_string)
        .fields(["fair", "temporary"], validate_boolean)
        .field(
            "lineId",
            option([
                Branch::new(validate_missing),
                Branch::new(validate_integer).then(test(non_negative(), NEGATIVE_NUMBER)),
            ]),
        )
}

/// Body of the new city form.
///
/// The name must contain a letter, a digit or a symbol that slugs spell
/// out (see [`significant`](crate::predicate::significant)). Checking that no
/// similar name exists is left to the caller.
pub fn new_city_body() -> Fields {
    form()
        .field(
            "cityName",
            chain![
                validate_non_empty_trimmed_string,
                test(
                    significant(),
                    "Le texte ne contient aucun caractère signifiant."
                ),
            ],
        )
        .fields(["districtId", "page", "year"], non_negative_integer())
        .on_unexpected(UNEXPECTED_FIELD)
}

/// Body of the new corporation form.
pub fn new_corporation_body() -> Fields {
    form()
        .field("corporationName", validate_non_empty_trimmed_string)
        .fields(["page", "year"], non_negative_integer())
        .on_unexpected(UNEXPECTED_FIELD)
}

/// Body of the issue report form.
pub fn new_issue_body() -> Fields {
    form().fields(["description", "title"], validate_non_empty_trimmed_string)
}

/// Body of the sign up form.
pub fn register_body() -> Fields {
    form().fields(["password", "username"], validate_non_empty_trimmed_string)
}

/// Body of the sign in form.
pub fn login_body() -> Fields {
    register_body()
}

/// Build the 400 response body for a rejected form.
///
/// The sanitized body is echoed with an `error` member holding the code,
/// the structured details and `message`. A body that is not an object is
/// replaced by the `error` member alone.
///
/// ```rust
/// use favre_validators::schemas::forms::{rejection, FORM_ERROR_MESSAGE};
/// use favre_validators::ValidationError;
/// use serde_json::json;
///
/// let error = ValidationError::fields([("title", ValidationError::Missing)]);
/// assert_eq!(
///     rejection(json!({"title": null}), &error, FORM_ERROR_MESSAGE),
///     json!({
///         "title": null,
///         "error": {
///             "code": 400,
///             "details": {"title": "Missing value"},
///             "message": "Le formulaire contient des erreurs.",
///         },
///     }),
/// );
/// ```
pub fn rejection(body: Value, error: &ValidationError, message: &str) -> Value {
    let mut object = match body {
        Value::Object(object) => object,
        _ => Map::new(),
    };
    object.insert(
        "error".to_string(),
        json!({
            "code": 400,
            "details": error,
            "message": message,
        }),
    );
    Value::Object(object)
}

/// Validate `body` with `schema`, producing the sanitized body or the 400
/// rejection body.
pub fn validate_form<V: Validator>(schema: &V, body: Value) -> Result<Value, Value> {
    let result = schema.validate(body);
    match result.error {
        None => Ok(result.value),
        Some(error) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                body = %crate::validation::to_pretty_json(&result.value),
                error = %crate::validation::to_pretty_json(&error),
                "error in form"
            );
            Err(rejection(result.value, &error, FORM_ERROR_MESSAGE))
        }
    }
}
