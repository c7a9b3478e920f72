//! Integration tests for the application schemas

use favre_validators::assert_validation_errors;
use favre_validators::prelude::*;
use favre_validators::schemas::config::{ConfigError, ConfigSchema, ServerConfig, SiteConfig};
use favre_validators::schemas::forms::{self, FORM_ERROR_MESSAGE};
use favre_validators::schemas::queries;
use favre_validators::schemas::records::{FavreBankLine, FavreCity, RecordError};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

#[test]
fn test_line_form_round_trip() {
    let body = json!({
        "cityId": 8,
        "cityName": "Saint-Étienne ",
        "comment": " Succursale ",
        "corporationId": 21,
        "corporationName": " Banque de France",
        "districtId": 42,
        "districtName": "Loire",
        "fair": false,
        "lineId": 311,
        "page": 77,
        "temporary": false,
        "year": 1902,
    });
    let sanitized = forms::validate_form(&forms::upsert_line_body(), body).unwrap();
    assert_eq!(sanitized["cityName"], json!("Saint-Étienne"));
    assert_eq!(sanitized["comment"], json!("Succursale"));
    assert_eq!(sanitized["corporationName"], json!("Banque de France"));
    assert_eq!(sanitized["lineId"], json!(311));

    // a sanitized body validates to itself
    let again = forms::upsert_line_body().validate(sanitized.clone());
    assert_eq!(again, Validation::valid(sanitized));
}

#[test]
fn test_rejected_form_echoes_sanitized_body() {
    let rejected = forms::validate_form(
        &forms::new_corporation_body(),
        json!({"corporationName": "  ", "page": "3", "year": 1890, "token": "x"}),
    )
    .unwrap_err();
    assert_eq!(
        rejected,
        json!({
            "corporationName": "",
            "page": "3",
            "year": 1890,
            "token": "x",
            "error": {
                "code": 400,
                "details": {
                    "corporationName": "Expected a non empty string",
                    "page": "Expected an integer, got \"string\"",
                    "token": "Ce champ est inattendu.",
                },
                "message": FORM_ERROR_MESSAGE,
            },
        })
    );
}

#[test]
fn test_queries_coerce_text() {
    let result = queries::lines_query().validate(json!({
        "city": "8",
        "district": " 42 ",
        "year": "1902",
    }));
    assert_eq!(
        result,
        Validation::valid(json!({
            "city": 8,
            "district": 42,
            "page": null,
            "user": null,
            "year": 1902,
        }))
    );

    assert_validation_errors!(
        queries::pages_query().validate(json!({})),
        json!({"year": "Missing value"})
    );
}

#[test]
fn test_lines_query_reports_range_errors_alone() {
    let result = queries::lines_query().validate(json!({
        "district": "42",
        "page": "2.5",
        "year": "1650",
    }));
    assert_eq!(result.value["district"], json!(42));
    assert_eq!(result.value["page"], json!(2.5));
    assert_eq!(result.value["year"], json!(1650));
    assert_validation_errors!(
        result,
        json!({
            "page": "Expected an integer, got \"number\"",
            "year": "Expected a year between 1700 and 1999",
        })
    );
}

#[test]
fn test_site_config_from_file() {
    let path = std::env::temp_dir().join(format!("favre-site-{}.json", std::process::id()));
    std::fs::write(
        &path,
        serde_json::to_string_pretty(&json!({
            "leftMenu": [{"contentHtml": "Accueil", "prefetch": true, "url": "."}],
            "missionStatement": "Saisie des annuaires Favre",
            "rightMenu": [],
            "title": "Annuaires Favre",
            "url": ".",
        }))
        .unwrap(),
    )
    .unwrap();
    let config = SiteConfig::load_json(&path);
    std::fs::remove_file(&path).unwrap();

    let config = config.unwrap();
    assert_eq!(config.global_alert, None);
    assert_eq!(config.left_menu.len(), 1);
    assert!(config.left_menu[0].prefetch);
    assert_eq!(config.left_menu[0].title, None);
    assert!(config.right_menu.is_empty());
}

#[test]
fn test_invalid_server_config_carries_details() {
    let error = ServerConfig::from_value(json!({
        "db": {"database": "favre", "host": "localhost", "password": "favre", "port": 5432, "user": "favre"},
        "gitlab": {"accessToken": "token", "projectPath": "a/b", "url": "gitlab"},
        "sessionSecret": "secret",
    }))
    .unwrap_err();
    match error {
        ConfigError::Invalid { name, invalid } => {
            assert_eq!(name, "server");
            assert_eq!(invalid.error.to_json(), json!({"gitlab": {"url": "Invalid URL"}}));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_csv_rows() {
    let city = FavreCity::from_record(json!([
        "Loire", "Saint-Étienne", "42", "8", "", "", "", "", "", "Saint-Étienne (Loire)", "8",
    ]))
    .unwrap();
    assert_eq!(city.city_id, 8);
    assert_eq!(city.city_name, "Saint-Étienne");

    let line = FavreBankLine::from_record(json!([
        "01/01/1900", "1/6/1902", "Loire", "42", "Saint-Étienne", "8",
        "Banque de France", "21", "", "true", "Saint-Étienne (Loire)", "8",
    ]))
    .unwrap();
    assert_eq!(line.start_date, "1900-01-01");
    assert_eq!(line.end_date, "1902-06-01");
    assert!(!line.temporary);
    assert!(line.fair);

    let error = FavreCity::from_record(Value::Null).unwrap_err();
    assert!(matches!(error, RecordError::Invalid(_)));
}
