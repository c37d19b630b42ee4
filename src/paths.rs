// SPDX-License-Identifier: MPL-2.0
//! Centralized path management for application directories.
//!
//! # Path Resolution Order
//!
//! Paths are resolved in the following priority order:
//! 1. **Explicit override** - parameter to `_with_override()` functions (for tests)
//! 2. **CLI arguments** (`--data-dir`, `--config-dir`) - set via [`init_cli_overrides`]
//! 3. **Environment variables** (`PAGE_L10N_DATA_DIR`, `PAGE_L10N_CONFIG_DIR`)
//! 4. **Platform default** - via `dirs` crate
//!
//! The config directory holds `settings.toml` (user-editable). The data
//! directory holds the persisted language preference.

use std::path::PathBuf;
use std::sync::OnceLock;

/// Application name used for directory naming.
const APP_NAME: &str = "PageL10n";

/// Environment variable to override the data directory.
pub const ENV_DATA_DIR: &str = "PAGE_L10N_DATA_DIR";

/// Environment variable to override the config directory.
pub const ENV_CONFIG_DIR: &str = "PAGE_L10N_CONFIG_DIR";

static CLI_DATA_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();
static CLI_CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Initializes CLI overrides for data and config directories.
///
/// Only the first call has any effect; later calls are ignored.
pub fn init_cli_overrides(data_dir: Option<String>, config_dir: Option<String>) {
    if CLI_DATA_DIR.set(data_dir.map(PathBuf::from)).is_err() {
        tracing::debug!("data dir override already initialized");
    }
    if CLI_CONFIG_DIR.set(config_dir.map(PathBuf::from)).is_err() {
        tracing::debug!("config dir override already initialized");
    }
}

fn get_cli_data_dir() -> Option<PathBuf> {
    CLI_DATA_DIR.get().and_then(Clone::clone)
}

fn get_cli_config_dir() -> Option<PathBuf> {
    CLI_CONFIG_DIR.get().and_then(Clone::clone)
}

/// Resolves one directory following the documented priority order.
fn resolve_dir(
    override_path: Option<PathBuf>,
    cli_path: Option<PathBuf>,
    env_var: &str,
    platform_default: fn() -> Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path);
    }

    if let Some(path) = cli_path {
        return Some(path);
    }

    if let Ok(env_path) = std::env::var(env_var) {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }

    platform_default().map(|mut path| {
        path.push(APP_NAME);
        path
    })
}

/// Returns the application data directory path.
///
/// - Linux: `~/.local/share/PageL10n/`
/// - macOS: `~/Library/Application Support/PageL10n/`
/// - Windows: `C:\Users\<User>\AppData\Roaming\PageL10n\`
pub fn get_app_data_dir() -> Option<PathBuf> {
    get_app_data_dir_with_override(None)
}

/// Returns the application data directory path with an optional override.
pub fn get_app_data_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    resolve_dir(override_path, get_cli_data_dir(), ENV_DATA_DIR, dirs::data_dir)
}

/// Returns the application config directory path.
///
/// - Linux: `~/.config/PageL10n/`
/// - macOS: `~/Library/Application Support/PageL10n/`
/// - Windows: `C:\Users\<User>\AppData\Roaming\PageL10n\`
pub fn get_app_config_dir() -> Option<PathBuf> {
    get_app_config_dir_with_override(None)
}

/// Returns the application config directory path with an optional override.
pub fn get_app_config_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    resolve_dir(
        override_path,
        get_cli_config_dir(),
        ENV_CONFIG_DIR,
        dirs::config_dir,
    )
}

/// Serializes tests that mutate the path environment variables.
#[cfg(test)]
pub(crate) static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
