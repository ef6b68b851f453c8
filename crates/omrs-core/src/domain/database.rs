//! Database connection settings of a server.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Placeholder in a connection URI that is replaced by the database name.
pub const DBNAME_PLACEHOLDER: &str = "@DBNAME@";

pub const DEFAULT_DB_NAME: &str = "openmrs";
pub const DEFAULT_DB_USER: &str = "root";
pub const DEFAULT_H2_PASSWORD: &str = "root";

/// Connection parameters appended to MySQL URIs unless the user set them.
const MYSQL_DEFAULT_PARAMS: [(&str, &str); 4] = [
    ("autoReconnect", "true"),
    ("sessionVariables", "storage_engine=InnoDB"),
    ("useUnicode", "true"),
    ("characterEncoding", "UTF-8"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DbDriver {
    #[default]
    H2,
    #[serde(rename = "mysql")]
    MySql,
    Postgres,
}

impl DbDriver {
    /// JDBC driver class.
    pub fn driver_class(self) -> &'static str {
        match self {
            Self::H2 => "org.h2.Driver",
            Self::MySql => "com.mysql.jdbc.Driver",
            Self::Postgres => "org.postgresql.Driver",
        }
    }

    pub fn default_uri(self) -> &'static str {
        match self {
            Self::H2 => "jdbc:h2://localhost",
            Self::MySql => "jdbc:mysql://localhost:3131",
            Self::Postgres => "jdbc:postgresql://localhost:5740",
        }
    }
}

impl fmt::Display for DbDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::H2 => "h2",
            Self::MySql => "mysql",
            Self::Postgres => "postgres",
        })
    }
}

impl FromStr for DbDriver {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "h2" => Ok(Self::H2),
            "mysql" => Ok(Self::MySql),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            _ => Err(DomainError::UnknownDatabaseDriver(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub driver: DbDriver,
    pub uri: String,
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_name")]
    pub name: String,
}

fn default_name() -> String {
    DEFAULT_DB_NAME.to_string()
}

impl DatabaseConfig {
    /// Embedded H2 with the default credentials.
    pub fn h2() -> Self {
        Self {
            driver: DbDriver::H2,
            uri: DbDriver::H2.default_uri().to_string(),
            user: DEFAULT_DB_USER.to_string(),
            password: DEFAULT_H2_PASSWORD.to_string(),
            name: default_name(),
        }
    }

    /// MySQL at `uri`, with the standard connection parameters merged in.
    pub fn mysql(uri: &str, user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            driver: DbDriver::MySql,
            uri: add_mysql_params_if_missing(uri),
            user: user.into(),
            password: password.into(),
            name: default_name(),
        }
    }

    pub fn driver_class(&self) -> &'static str {
        self.driver.driver_class()
    }

    /// The URI with the database name substituted for the placeholder.
    pub fn resolved_uri(&self) -> String {
        self.uri.replace(DBNAME_PLACEHOLDER, &self.name)
    }

    /// Copy with the placeholder resolved, as stored in a server config.
    pub fn resolved(mut self) -> Self {
        self.uri = self.resolved_uri();
        self
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::h2()
    }
}

/// Merge the default MySQL connection parameters into `uri`.
///
/// Values already present win. Default keys keep their position and
/// user-only keys follow them. Nothing is URL-encoded.
pub fn add_mysql_params_if_missing(uri: &str) -> String {
    let (base, query) = match uri.split_once('?') {
        Some((base, query)) => (base, query),
        None => (uri, ""),
    };

    let user_params: Vec<(&str, &str)> = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .collect();

    let lookup = |key: &str| {
        user_params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    };

    let mut merged: Vec<String> = MYSQL_DEFAULT_PARAMS
        .iter()
        .map(|(key, default)| format!("{key}={}", lookup(key).unwrap_or(default)))
        .collect();

    merged.extend(
        user_params
            .iter()
            .filter(|(key, _)| !MYSQL_DEFAULT_PARAMS.iter().any(|(d, _)| d == key))
            .map(|(key, value)| format!("{key}={value}")),
    );

    format!("{base}?{}", merged.join("&"))
}
