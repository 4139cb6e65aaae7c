//! Configuration module for Quill.
//!
//! Handles the settings file, environment variables, and default-dialect
//! bootstrap.

mod settings;

pub use settings::{expand_env_vars, RenderSettings, Settings, SettingsError, TableSettings};
