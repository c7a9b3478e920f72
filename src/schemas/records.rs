//! CSV import records
//!
//! The Favre spreadsheets are exported as CSV and imported row by row. Each
//! row is a JSON array of strings validated positionally by a tuple, then
//! checked for consistency between its two copies of the city id.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::combinators::{test_with, Chain};
use crate::primitives::*;
use crate::{chain, tuple, Invalid, Validator};

/// Failure to turn a CSV row into a typed record.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The row was rejected by its schema.
    #[error(transparent)]
    Invalid(#[from] Invalid),
    /// The sanitized row does not fit the typed record.
    #[error("record does not deserialize: {0}")]
    Deserialize(#[from] serde_json::Error),
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn record_text(record: &Value) -> String {
    match record.as_array() {
        Some(cells) => cells.iter().map(cell_text).collect::<Vec<_>>().join(","),
        None => cell_text(record),
    }
}

// the city id is repeated at the end of each row; both copies must agree
fn same_city_ids(first: usize, second: usize) -> impl Validator {
    test_with(
        move |record: &Value| record.get(first) == record.get(second),
        move |record: &Value| {
            let cell = |index: usize| record.get(index).map(cell_text).unwrap_or_default();
            format!(
                "City IDs are not equal: {} ≠ {} in {}",
                cell(first),
                cell(second),
                record_text(record)
            )
        },
    )
}

/// Row of the Favre cities export, eleven columns.
///
/// ```rust
/// use favre_validators::prelude::*;
/// use favre_validators::schemas::records::favre_city_record;
/// use serde_json::json;
///
/// let row = json!(["Rhône", "Lyon ", "69", "1234", "", "", " ", "", "", "Lyon (Rhône)", "1234"]);
/// let result = favre_city_record().validate(row);
/// assert!(result.is_valid());
/// assert_eq!(result.value[3], json!(1234));
/// assert_eq!(result.value[4], json!(null));
/// ```
pub fn favre_city_record() -> Chain {
    chain![
        tuple![
            validate_non_empty_trimmed_string, // district name
            validate_non_empty_trimmed_string, // city name
            validate_string_to_number,         // district id
            validate_string_to_number,         // city id
            validate_empty,
            validate_empty,
            validate_empty,
            validate_empty,
            validate_empty,
            validate_non_empty_trimmed_string, // computed name
            validate_string_to_number,         // city id, again
        ],
        same_city_ids(3, 10),
    ]
}

/// Row of the Favre bank lines export, twelve columns.
pub fn favre_bank_line_record() -> Chain {
    chain![
        tuple![
            validate_french_date_to_iso_date,  // start date
            validate_french_date_to_iso_date,  // end date
            validate_non_empty_trimmed_string, // district name
            validate_string_to_number,         // district id
            validate_non_empty_trimmed_string, // city name
            validate_string_to_number,         // city id
            validate_non_empty_trimmed_string, // bank name
            validate_string_to_number,         // bank id
            validate_string_to_boolean,        // temporary
            validate_string_to_boolean,        // fair
            validate_non_empty_trimmed_string, // computed name
            validate_string_to_number,         // city id, again
        ],
        same_city_ids(5, 11),
    ]
}

fn leading<T: DeserializeOwned>(record: Value, columns: usize) -> Result<T, RecordError> {
    let cells = match record {
        Value::Array(mut cells) => {
            cells.truncate(columns);
            cells
        }
        other => vec![other],
    };
    Ok(serde_json::from_value(Value::Array(cells))?)
}

/// A city named in the Favre directories, matched to its DFIH ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavreCity {
    /// District name as spelled in the directories
    pub district_name: String,
    /// City name as spelled in the directories
    pub city_name: String,
    /// DFIH district id
    pub district_id: i64,
    /// DFIH city id
    pub city_id: i64,
}

impl FavreCity {
    /// Validate a CSV row and keep its meaningful columns.
    pub fn from_record(record: Value) -> Result<Self, RecordError> {
        let record = favre_city_record().validate(record).into_result()?;
        let (district_name, city_name, district_id, city_id) = leading(record, 4)?;
        Ok(FavreCity {
            district_name,
            city_name,
            district_id,
            city_id,
        })
    }
}

/// A bank office listed for a city over a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavreBankLine {
    /// ISO date
    pub start_date: String,
    /// ISO date
    pub end_date: String,
    /// District name
    pub district_name: String,
    /// DFIH district id
    pub district_id: i64,
    /// City name
    pub city_name: String,
    /// DFIH city id
    pub city_id: i64,
    /// Bank name
    pub bank_name: String,
    /// DFIH corporation id
    pub bank_id: i64,
    /// Temporary office
    pub temporary: bool,
    /// Open on fair days only
    pub fair: bool,
}

type BankLineColumns = (String, String, String, i64, String, i64, String, i64, bool, bool);

impl FavreBankLine {
    /// Validate a CSV row and keep its meaningful columns.
    pub fn from_record(record: Value) -> Result<Self, RecordError> {
        let record = favre_bank_line_record().validate(record).into_result()?;
        let columns: BankLineColumns = leading(record, 10)?;
        let (
            start_date,
            end_date,
            district_name,
            district_id,
            city_name,
            city_id,
            bank_name,
            bank_id,
            temporary,
            fair,
        ) = columns;
        Ok(FavreBankLine {
            start_date,
            end_date,
            district_name,
            district_id,
            city_name,
            city_id,
            bank_name,
            bank_id,
            temporary,
            fair,
        })
    }
}
