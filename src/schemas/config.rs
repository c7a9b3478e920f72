//! Bootstrap configuration
//!
//! The site, server and Oracle import configurations are plain JSON. Each is
//! checked by a [`Fields`] schema that trims and normalises it, and only the
//! sanitized value is deserialized into its typed struct. A configuration
//! that fails validation never reaches the application.
//!
//! ```rust
//! use favre_validators::schemas::config::{ConfigSchema, OracleConfig};
//! use serde_json::json;
//!
//! let config = OracleConfig::from_value(json!({
//!     "connectString": " SERVER_NAME/DATABASE_NAME ",
//!     "password": "PASSWORD",
//!     "user": "USERNAME",
//! }))
//! .unwrap();
//! assert_eq!(config.connect_string, "SERVER_NAME/DATABASE_NAME");
//!
//! let error = OracleConfig::from_value(json!({"user": "USERNAME"})).unwrap_err();
//! assert!(error.to_string().starts_with("invalid Oracle configuration"));
//! ```

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::combinators::{array, option, set_value, test, Branch};
use crate::fields::Fields;
use crate::predicate::between;
use crate::primitives::*;
use crate::url::validate_url;
use crate::{chain, Invalid, Kind, Validator};

/// Failure to load a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read configuration file {}: {source}", .path.display())]
    Io {
        /// File that was read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file is not JSON.
    #[error("configuration file {} is not valid JSON: {source}", .path.display())]
    Json {
        /// File that was parsed
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// The configuration was rejected by its schema.
    #[error("invalid {name} configuration: {invalid}")]
    Invalid {
        /// Which configuration
        name: &'static str,
        /// Sanitized value and error
        #[source]
        invalid: Invalid,
    },

    /// The sanitized configuration does not fit its typed struct.
    #[error("{name} configuration does not deserialize: {source}")]
    Deserialize {
        /// Which configuration
        name: &'static str,
        /// Underlying serde error
        #[source]
        source: serde_json::Error,
    },
}

/// A configuration with a validation schema.
///
/// Implementors get [`from_value`](ConfigSchema::from_value) and
/// [`load_json`](ConfigSchema::load_json) for free.
pub trait ConfigSchema: DeserializeOwned {
    /// Human readable name, used in errors and logs.
    const NAME: &'static str;

    /// Schema the raw JSON must satisfy.
    fn schema() -> Fields;

    /// Validate `value`, then deserialize the sanitized result.
    fn from_value(value: Value) -> Result<Self, ConfigError> {
        let name = Self::NAME;
        let value = Self::schema()
            .validate(value)
            .into_result()
            .map_err(|invalid| {
                #[cfg(feature = "tracing")]
                tracing::error!(
                    config = name,
                    error = %crate::validation::to_pretty_json(&invalid.error),
                    "invalid configuration"
                );
                ConfigError::Invalid { name, invalid }
            })?;
        let config = serde_json::from_value(value)
            .map_err(|source| ConfigError::Deserialize { name, source })?;
        #[cfg(feature = "tracing")]
        tracing::debug!(config = name, "configuration loaded");
        Ok(config)
    }

    /// Read, validate and deserialize a JSON file.
    fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let value = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_value(value)
    }
}

fn expected_object(kind: Kind) -> String {
    format!("Expected an object got \"{}\"", kind.name())
}

fn config_fields() -> Fields {
    Fields::new()
        .on_wrong_type(expected_object)
        .on_unexpected("Unexpected item")
}

/// Banner shown on every page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// CSS class
    pub class: String,
    /// Raw HTML content
    pub message_html: String,
}

/// Navigation bar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Raw HTML label
    pub content_html: String,
    /// Prefetch the target page, `false` when unset
    pub prefetch: bool,
    /// Tooltip
    pub title: Option<String>,
    /// Target, relative or absolute
    pub url: String,
}

/// Public site configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    /// Optional banner
    pub global_alert: Option<Alert>,
    /// Left side of the navigation bar
    pub left_menu: Vec<MenuItem>,
    /// Subtitle
    pub mission_statement: String,
    /// Right side of the navigation bar
    pub right_menu: Vec<MenuItem>,
    /// Site title
    pub title: String,
    /// Base URL
    pub url: String,
}

fn menu_item() -> Fields {
    config_fields()
        .fields(["contentHtml", "url"], validate_non_empty_trimmed_string)
        .field(
            "prefetch",
            option([
                Branch::new(validate_missing).then(set_value(false)),
                Branch::new(validate_boolean),
            ]),
        )
        .field("title", validate_maybe_trimmed_string)
}

/// Schema of [`SiteConfig`].
pub fn site_config() -> Fields {
    let alert = config_fields().fields(["class", "messageHtml"], validate_non_empty_trimmed_string);
    config_fields()
        .on_missing("Missing config")
        .field(
            "globalAlert",
            option([Branch::new(validate_missing), Branch::new(alert)]),
        )
        .fields(["leftMenu", "rightMenu"], array(menu_item()))
        .fields(
            ["missionStatement", "title", "url"],
            validate_non_empty_trimmed_string,
        )
}

impl ConfigSchema for SiteConfig {
    const NAME: &'static str = "site";

    fn schema() -> Fields {
        site_config()
    }
}

/// PostgreSQL connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbConfig {
    /// Database name
    pub database: String,
    /// Server host
    pub host: String,
    /// Password
    pub password: String,
    /// Server port
    pub port: u32,
    /// Role
    pub user: String,
}

/// GitLab project receiving user issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitLabConfig {
    /// API token
    pub access_token: String,
    /// `namespace/project`
    pub project_path: String,
    /// GitLab instance
    pub url: String,
}

/// Private server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Database
    pub db: DbConfig,
    /// Issue tracker
    pub gitlab: GitLabConfig,
    /// Cookie signing secret
    pub session_secret: String,
}

/// Schema of [`ServerConfig`].
pub fn server_config() -> Fields {
    let db = config_fields()
        .on_missing("Valeur manquante")
        .fields(
            ["database", "host", "password", "user"],
            validate_non_empty_trimmed_string,
        )
        .field(
            "port",
            chain![
                validate_integer,
                test(between(0, 65536), "Must be an integer between 0 and 65536"),
            ],
        );
    let gitlab = config_fields()
        .on_missing("Valeur manquante")
        .fields(["accessToken", "projectPath"], validate_non_empty_trimmed_string)
        .field("url", validate_url);
    config_fields()
        .on_missing("Missing config")
        .field("db", db)
        .field("gitlab", gitlab)
        .field("sessionSecret", validate_non_empty_trimmed_string)
}

impl ConfigSchema for ServerConfig {
    const NAME: &'static str = "server";

    fn schema() -> Fields {
        server_config()
    }
}

impl ServerConfig {
    /// Build the configuration from `FAVRE_*` environment variables.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `FAVRE_DB_NAME` | `favre` |
    /// | `FAVRE_DB_HOST` | `localhost` |
    /// | `FAVRE_DB_PASSWORD` | `favre` |
    /// | `FAVRE_DB_PORT` | `5432` |
    /// | `FAVRE_DB_USER` | `favre` |
    /// | `FAVRE_GITLAB_URL` | `https://gitlab.huma-num.fr/` |
    /// | `FAVRE_GITLAB_ACCESS_TOKEN` | `ACCESS_TOKEN` |
    /// | `FAVRE_GITLAB_PROJECT_PATH` | `eurhisfirm/annuaires-favre` |
    /// | `FAVRE_SESSION_SECRET` | `annuaires-favre secret` |
    ///
    /// The defaults for passwords, token and secret are placeholders and
    /// must be overridden in production.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading variables from `var`.
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |name: &str, default: &str| var(name).unwrap_or_else(|| default.to_string());
        // a port that does not parse is left as text for the schema to reject
        let port = match var("FAVRE_DB_PORT") {
            None => json!(5432),
            Some(port) => port
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or(Value::String(port)),
        };
        Self::from_value(json!({
            "db": {
                "database": text("FAVRE_DB_NAME", "favre"),
                "host": text("FAVRE_DB_HOST", "localhost"),
                "password": text("FAVRE_DB_PASSWORD", "favre"),
                "port": port,
                "user": text("FAVRE_DB_USER", "favre"),
            },
            "gitlab": {
                "accessToken": text("FAVRE_GITLAB_ACCESS_TOKEN", "ACCESS_TOKEN"),
                "projectPath": text("FAVRE_GITLAB_PROJECT_PATH", "eurhisfirm/annuaires-favre"),
                "url": text("FAVRE_GITLAB_URL", "https://gitlab.huma-num.fr/"),
            },
            "sessionSecret": text("FAVRE_SESSION_SECRET", "annuaires-favre secret"),
        }))
    }
}

/// Credentials of the Oracle database the DFIH data is imported from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleConfig {
    /// `SERVER/DATABASE`
    pub connect_string: String,
    /// Password
    pub password: String,
    /// User name
    pub user: String,
}

/// Schema of [`OracleConfig`]; every key is required.
pub fn oracle_config() -> Fields {
    config_fields().required_fields(
        ["connectString", "password", "user"],
        validate_non_empty_trimmed_string,
    )
}

impl ConfigSchema for OracleConfig {
    const NAME: &'static str = "Oracle";

    fn schema() -> Fields {
        oracle_config()
    }
}
