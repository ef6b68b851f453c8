//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `OMRS_<SECTION>__<KEY>`, e.g.
//!    `OMRS_SDK__SERVERS_PATH`; lists are comma-separated
//! 3. Config file: `--config FILE`, else [`AppConfig::config_path`]
//! 4. Built-in defaults (always present)

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult, IntoCli};

const ENV_PREFIX: &str = "OMRS";

/// Keys accepted by `omrs config get/set`.
pub const KNOWN_KEYS: &[&str] = &[
    "sdk.servers_path",
    "sdk.local_repository",
    "sdk.platform_versions",
    "archetypes.version",
    "archetypes.catalog",
    "output.no_color",
    "output.format",
];

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where servers and artifacts live.
    pub sdk: SdkConfig,
    /// Project generation settings.
    pub archetypes: ArchetypeConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkConfig {
    /// Root directory holding one directory per server.
    pub servers_path: PathBuf,
    /// Maven-layout repository artifacts are copied from.
    pub local_repository: PathBuf,
    /// Versions offered when setting up a platform server.
    pub platform_versions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchetypeConfig {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for SdkConfig {
    fn default() -> Self {
        let home = directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            servers_path: home.join("openmrs"),
            local_repository: home.join(".m2").join("repository"),
            platform_versions: vec![
                "1.11.5".into(),
                "1.11.6".into(),
                "2.0.0".into(),
            ],
        }
    }
}

impl Default for ArchetypeConfig {
    fn default() -> Self {
        Self {
            version: "1.1".into(),
            catalog: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "human".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration by layering defaults, the config file and the
    /// environment.
    ///
    /// An explicit `config_file` must exist when `must_exist` is set;
    /// the default location is always optional.
    pub fn load(config_file: Option<&PathBuf>, must_exist: bool) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), must_exist),
            None => (Self::config_path(), false),
        };

        let defaults = ::config::Config::try_from(&Self::default())
            .context("Failed to build default configuration")?;

        let settings = ::config::Config::builder()
            .add_source(defaults)
            .add_source(
                ::config::File::from(path.as_path())
                    .format(::config::FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("sdk.platform_versions")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        settings
            .try_deserialize()
            .context("Invalid configuration values")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.omrs.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("org", "openmrs", "omrs")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".omrs.toml"))
    }

    /// The file `init` and `config set` write to.
    pub fn target_path(config_file: Option<&PathBuf>) -> PathBuf {
        config_file.cloned().unwrap_or_else(Self::config_path)
    }

    /// Value of a dotted key, rendered for display.
    pub fn get(&self, key: &str) -> CliResult<String> {
        let value = match key {
            "sdk.servers_path" => self.sdk.servers_path.display().to_string(),
            "sdk.local_repository" => self.sdk.local_repository.display().to_string(),
            "sdk.platform_versions" => self.sdk.platform_versions.join(","),
            "archetypes.version" => self.archetypes.version.clone(),
            "archetypes.catalog" => self.archetypes.catalog.clone().unwrap_or_default(),
            "output.no_color" => self.output.no_color.to_string(),
            "output.format" => self.output.format.clone(),
            _ => {
                return Err(CliError::UnknownConfigKey {
                    key: key.to_string(),
                });
            }
        };
        Ok(value)
    }

    /// Serialise as the TOML written by `omrs init`.
    pub fn to_toml(&self) -> CliResult<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::ConfigError {
            message: format!("Failed to serialise config: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

/// Set `key` to `value` in the TOML file at `path`, keeping other entries.
///
/// The file is created when missing.  `value` is checked against the key's
/// type before anything is written.
pub fn set_in_file(path: &Path, key: &str, value: &str) -> CliResult<()> {
    let parsed = parse_value(key, value)?;
    let Some((section, field)) = key.split_once('.') else {
        return Err(CliError::UnknownConfigKey {
            key: key.to_string(),
        });
    };

    let mut document = if path.exists() {
        let raw = fs::read_to_string(path)
            .with_cli_context(|| format!("Failed to read '{}'", path.display()))?;
        raw.parse::<toml::Table>().map_err(|e| CliError::ConfigError {
            message: format!("{} is not valid TOML: {e}", path.display()),
            source: Some(Box::new(e)),
        })?
    } else {
        toml::Table::new()
    };

    let entry = document
        .entry(section.to_string())
        .or_insert(toml::Value::Table(toml::Table::new()));
    let Some(table) = entry.as_table_mut() else {
        return Err(CliError::ConfigError {
            message: format!("'{section}' in {} is not a table", path.display()),
            source: None,
        });
    };
    table.insert(field.to_string(), parsed);

    let serialised = toml::to_string_pretty(&document).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })?;
    write_file(path, &serialised)
}

/// Write `contents`, creating parent directories first.
pub fn write_file(path: &Path, contents: &str) -> CliResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_cli_context(|| format!("Failed to create config directory '{}'", parent.display()))?;
    }
    fs::write(path, contents)
        .with_cli_context(|| format!("Failed to write config to '{}'", path.display()))
}

fn parse_value(key: &str, value: &str) -> CliResult<toml::Value> {
    match key {
        "sdk.servers_path" | "sdk.local_repository" | "archetypes.version" | "archetypes.catalog" => {
            Ok(toml::Value::String(value.to_string()))
        }
        "sdk.platform_versions" => Ok(toml::Value::Array(
            value
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| toml::Value::String(v.to_string()))
                .collect(),
        )),
        "output.no_color" => value
            .parse::<bool>()
            .map(toml::Value::Boolean)
            .map_err(|e| CliError::InvalidInput {
                message: format!("'{value}' is not true or false"),
                source: Some(Box::new(e)),
            }),
        "output.format" => match value {
            "auto" | "human" | "plain" | "json" => Ok(toml::Value::String(value.to_string())),
            _ => Err(CliError::InvalidInput {
                message: format!("'{value}' is not one of auto, human, plain, json"),
                source: None,
            }),
        },
        _ => Err(CliError::UnknownConfigKey {
            key: key.to_string(),
        }),
    }
}
