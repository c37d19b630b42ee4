// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, loaded from and saved
//! to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[general]` - Persistence key for the language preference
//! - `[document]` - Attribute, ids and class that make up the document contract
//!
//! Every field is optional; unset fields resolve to the constants in
//! [`defaults`].
//!
//! # Examples
//!
//! ```no_run
//! use page_l10n::config;
//!
//! let (mut config, _warning) = config::load();
//! config.document.mount_class = Some("signin-panel".to_string());
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Section Structs
// =============================================================================

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GeneralConfig {
    /// Key under which the language code is persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_key: Option<String>,
}

impl GeneralConfig {
    pub fn storage_key(&self) -> &str {
        non_empty_or(&self.storage_key, DEFAULT_STORAGE_KEY)
    }
}

/// Names the document contract uses to find annotated elements and the
/// selector control.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DocumentConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation_attribute: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector_container_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mount_class: Option<String>,

    /// `onchange` script of the injected selector. An empty value omits the
    /// handler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector_onchange: Option<String>,
}

impl DocumentConfig {
    pub fn translation_attribute(&self) -> &str {
        non_empty_or(&self.translation_attribute, DEFAULT_TRANSLATION_ATTRIBUTE)
    }

    pub fn selector_id(&self) -> &str {
        non_empty_or(&self.selector_id, DEFAULT_SELECTOR_ID)
    }

    pub fn selector_container_id(&self) -> &str {
        non_empty_or(&self.selector_container_id, DEFAULT_SELECTOR_CONTAINER_ID)
    }

    pub fn mount_class(&self) -> &str {
        non_empty_or(&self.mount_class, DEFAULT_MOUNT_CLASS)
    }

    pub fn selector_onchange(&self) -> Option<&str> {
        match self.selector_onchange.as_deref().map(str::trim) {
            None => Some(DEFAULT_SELECTOR_ONCHANGE),
            Some("") => None,
            Some(script) => Some(script),
        }
    }
}

fn non_empty_or<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => v,
        _ => default,
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub document: DocumentConfig,
}

// =============================================================================
// Config Path Resolution
// =============================================================================

fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with a warning key explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(error) => {
                    tracing::warn!("failed to load {}: {}", path.display(), error);
                    return (
                        Config::default(),
                        Some("notification-config-load-error".to_string()),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}
