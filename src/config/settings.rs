//! TOML-based configuration for Quill.
//!
//! Supports a config file (quill.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [render]
//! dialect = "${QUILL_DIALECT}"
//!
//! [tables.users]
//! schema = "dbo"
//!
//! [[tables.users.columns]]
//! name = "id"
//! type = "int"
//! identity = true
//!
//! [[tables.users.columns]]
//! name = "email"
//! type = "nvarchar(200)"
//! nullable = false
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::sql::declare::{ColumnSchema, TableSchema};
use crate::sql::dialect::{set_default_dialect, Dialect};
use crate::sql::error::SqlError;
use crate::sql::schema::Table;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Sql(#[from] SqlError),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Rendering defaults.
    pub render: RenderSettings,

    /// Declared tables, keyed by table name.
    pub tables: BTreeMap<String, TableSettings>,
}

/// Rendering configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Default dialect, e.g. `mssql-2012` or `mysql-8.0`
    /// (supports ${ENV_VAR} expansion).
    pub dialect: Option<String>,
}

/// One `[tables.<name>]` entry. The table name is the map key.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TableSettings {
    pub schema: Option<String>,
    pub columns: Vec<ColumnSchema>,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), tables = settings.tables.len(), "loaded settings");
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `QUILL_CONFIG`
    /// 2. `./quill.toml`
    /// 3. `~/.config/quill/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        // Check environment variable first
        if let Ok(path) = env::var("QUILL_CONFIG") {
            return Self::from_file(&path);
        }

        // Check local directory
        let local_config = PathBuf::from("quill.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        // Check user config directory
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("quill").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        // Return defaults if no config file found
        Ok(Settings::default())
    }

    /// The configured default dialect, if any.
    pub fn dialect(&self) -> Result<Option<Dialect>, SettingsError> {
        let Some(ref raw) = self.render.dialect else {
            return Ok(None);
        };
        let expanded = expand_env_vars(raw)?;
        Ok(Some(expanded.parse::<Dialect>()?))
    }

    /// Install the configured dialect as the process-wide default.
    ///
    /// Returns the installed dialect, or `None` when the file names none.
    pub fn install_default_dialect(&self) -> Result<Option<Dialect>, SettingsError> {
        let Some(dialect) = self.dialect()? else {
            return Ok(None);
        };
        set_default_dialect(dialect)?;
        tracing::info!(%dialect, "installed default dialect from settings");
        Ok(Some(dialect))
    }

    /// Declared schema for one table.
    pub fn table_schema(&self, name: &str) -> Option<TableSchema> {
        self.tables.get(name).map(|t| TableSchema {
            name: name.to_string(),
            schema: t.schema.clone(),
            columns: t.columns.clone(),
        })
    }

    /// Build every declared table, in name order.
    pub fn tables(&self) -> Result<Vec<Table>, SettingsError> {
        let mut tables = Vec::with_capacity(self.tables.len());
        for name in self.tables.keys() {
            let schema = self
                .table_schema(name)
                .ok_or_else(|| SettingsError::InvalidConfig(format!("table '{}' vanished", name)))?;
            tables.push(Table::from_schema(&schema)?);
        }
        Ok(tables)
    }

    /// Build one declared table.
    pub fn table(&self, name: &str) -> Result<Table, SettingsError> {
        let schema = self
            .table_schema(name)
            .ok_or_else(|| SettingsError::InvalidConfig(format!("no table '{}' declared", name)))?;
        Ok(Table::from_schema(&schema)?)
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        // Check for ${VAR} or $VAR
        if chars.peek() == Some(&'{') {
            chars.next(); // consume '{'
            let mut var_name = String::new();
            let mut closed = false;
            for ch in chars.by_ref() {
                if ch == '}' {
                    closed = true;
                    break;
                }
                var_name.push(ch);
            }
            if !closed {
                return Err(SettingsError::InvalidConfig(format!(
                    "unterminated variable reference '${{{}'",
                    var_name
                )));
            }
            let value =
                env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
            result.push_str(&value);
        } else {
            // $VAR (ends at non-alphanumeric/underscore)
            let mut var_name = String::new();
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                var_name.push(ch);
            }
            if var_name.is_empty() {
                // Just a lone $, keep it
                result.push('$');
            } else {
                let value = env::var(&var_name)
                    .map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
                result.push_str(&value);
            }
        }
    }

    Ok(result)
}
