//! Configuration loader with hierarchical merging.
//!
//! # Load Order
//!
//! 1. Default values (compile-time)
//! 2. Global config (`~/.arena/config.toml`)
//! 3. Project config (`<root>/.arena/config.toml`)
//! 4. Environment variables (`ARENA_*`)
//!
//! Each layer overrides the previous.

use super::{
    default_config_path, ArenaConfig, ConfigError, PROJECT_CONFIG_DIR, PROJECT_CONFIG_FILE,
};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

macro_rules! parse_env_bool {
    ($lookup:expr, $field:expr, $var:literal) => {
        if let Some(val) = $lookup($var) {
            $field = parse_bool(&val)
                .ok_or_else(|| ConfigError::invalid_env_var($var, "expected bool"))?;
        }
    };
}

/// Configuration loader with builder pattern.
///
/// # Example
///
/// ```no_run
/// use arena_runtime::config::ConfigLoader;
///
/// let config = ConfigLoader::new()
///     .with_project_root("/srv/arena")
///     .skip_env_vars()
///     .load()?;
/// # Ok::<(), arena_runtime::config::ConfigError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    /// Global config file path (defaults to ~/.arena/config.toml).
    global_config_path: Option<PathBuf>,

    project_root: Option<PathBuf>,

    skip_env: bool,
    skip_global: bool,
    skip_project: bool,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom global config path.
    #[must_use]
    pub fn with_global_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_config_path = Some(path.into());
        self
    }

    /// Sets the project root directory.
    ///
    /// Project config will be loaded from `<project_root>/.arena/config.toml`.
    #[must_use]
    pub fn with_project_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_root = Some(path.into());
        self
    }

    #[must_use]
    pub fn skip_env_vars(mut self) -> Self {
        self.skip_env = true;
        self
    }

    #[must_use]
    pub fn skip_global_config(mut self) -> Self {
        self.skip_global = true;
        self
    }

    #[must_use]
    pub fn skip_project_config(mut self) -> Self {
        self.skip_project = true;
        self
    }

    /// Loads and merges configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a config file exists but cannot be read
    /// or parsed, or an `ARENA_*` variable is malformed. Missing files are
    /// skipped.
    pub fn load(&self) -> Result<ArenaConfig, ConfigError> {
        let mut config = ArenaConfig::default();

        if !self.skip_global {
            let global_path = self
                .global_config_path
                .clone()
                .unwrap_or_else(default_config_path);

            if let Some(global) = load_file(&global_path)? {
                debug!(path = %global_path.display(), "Loaded global config");
                config.merge(&global);
            }
        }

        if !self.skip_project {
            if let Some(ref root) = self.project_root {
                let path = root.join(PROJECT_CONFIG_DIR).join(PROJECT_CONFIG_FILE);
                if let Some(project) = load_file(&path)? {
                    debug!(path = %path.display(), "Loaded project config");
                    config.merge(&project);
                }
            }
        }

        if !self.skip_env {
            apply_env(&mut config, |name| std::env::var(name).ok())?;
        }

        Ok(config)
    }
}

/// Loads a config file, returning `None` if it doesn't exist.
fn load_file(path: &Path) -> Result<Option<ArenaConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    let config = ArenaConfig::from_toml(&content).map_err(|e| ConfigError::parse_toml(path, e))?;
    Ok(Some(config))
}

/// Applies `ARENA_*` overrides read through `lookup`.
fn apply_env<F>(config: &mut ArenaConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    parse_env_bool!(lookup, config.demo.enabled, "ARENA_SETUP_DEMO");

    if let Some(val) = lookup("ARENA_OPERATOR") {
        config.operator.login = val;
    }
    if let Some(val) = lookup("ARENA_OPERATOR_PASSWORD") {
        config.operator.password = val;
    }
    if let Some(val) = lookup("ARENA_ENDPOINT") {
        config.server.endpoint = val;
    }
    if let Some(val) = lookup("ARENA_DEMO_GAME") {
        config.demo.game = Some(val);
    }
    if let Some(val) = lookup("ARENA_SESSION_TTL_SECS") {
        config.session.ttl_secs = Some(parse_number("ARENA_SESSION_TTL_SECS", &val)?);
    }
    if let Some(val) = lookup("ARENA_PEER_MAX_ATTEMPTS") {
        config.peers.max_attempts = Some(parse_number("ARENA_PEER_MAX_ATTEMPTS", &val)?);
    }

    Ok(())
}

fn parse_number<T: FromStr>(name: &str, val: &str) -> Result<T, ConfigError> {
    val.trim().parse().map_err(|_| {
        ConfigError::invalid_env_var(name, format!("expected a non-negative integer, got '{val}'"))
    })
}

/// Parses a boolean from string.
///
/// Accepts: "true", "false", "1", "0", "yes", "no", "on", "off" (case-insensitive).
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
