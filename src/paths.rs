// SPDX-License-Identifier: MPL-2.0
//! Location of `settings.toml`.
//!
//! Enrollment stations are usually provisioned by an administrator: the
//! backend URL, route layout and language are written once into a managed
//! folder, and the operator account only runs the client. The config
//! directory can therefore be pointed elsewhere without touching the user
//! profile.
//!
//! # Resolution order
//!
//! 1. Explicit override passed to [`resolve_config_dir`] (tests, embedding)
//! 2. `--config-dir`, registered once via [`init_cli_overrides`]
//! 3. `FACE_ENROLL_CONFIG_DIR`, for provisioning scripts and service units
//! 4. The per-user platform config directory (`dirs`), `FaceEnroll/` inside it

use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Folder created under the platform config directory.
const APP_NAME: &str = "FaceEnroll";

/// Environment variable naming a provisioned config directory.
pub const ENV_CONFIG_DIR: &str = "FACE_ENROLL_CONFIG_DIR";

static CLI_CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Where a resolved config directory came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigDirSource {
    Override,
    CommandLine,
    Environment,
    Platform,
}

impl fmt::Display for ConfigDirSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigDirSource::Override => write!(f, "explicit override"),
            ConfigDirSource::CommandLine => write!(f, "--config-dir"),
            ConfigDirSource::Environment => write!(f, "{}", ENV_CONFIG_DIR),
            ConfigDirSource::Platform => write!(f, "platform default"),
        }
    }
}

/// A resolved config directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDir {
    pub path: PathBuf,
    pub source: ConfigDirSource,
}

/// Registers the `--config-dir` value. Call once, before loading config.
///
/// Later calls are ignored with a warning.
pub fn init_cli_overrides(config_dir: Option<String>) {
    if CLI_CONFIG_DIR.set(config_dir.map(PathBuf::from)).is_err() {
        log::warn!("--config-dir was already registered; ignoring new value");
    }
}

/// Resolves the config directory, following the order in the module docs.
///
/// Returns `None` only when no override is given and the platform has no
/// per-user config directory (e.g. `$HOME` unset on a service account).
#[must_use]
pub fn resolve_config_dir(override_path: Option<PathBuf>) -> Option<ConfigDir> {
    let cli_path = CLI_CONFIG_DIR.get().cloned().flatten();
    let env_path = std::env::var_os(ENV_CONFIG_DIR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from);

    let resolved = override_path
        .map(|path| (path, ConfigDirSource::Override))
        .or_else(|| cli_path.map(|path| (path, ConfigDirSource::CommandLine)))
        .or_else(|| env_path.map(|path| (path, ConfigDirSource::Environment)))
        .or_else(|| dirs::config_dir().map(|path| (path.join(APP_NAME), ConfigDirSource::Platform)))
        .map(|(path, source)| ConfigDir { path, source });

    match &resolved {
        Some(dir) => log::debug!("Config directory {} (from {})", dir.path.display(), dir.source),
        None => log::warn!("No config directory available; using built-in settings"),
    }
    resolved
}

/// Path-only form of [`resolve_config_dir`].
#[must_use]
pub fn get_app_config_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    resolve_config_dir(override_path).map(|dir| dir.path)
}
