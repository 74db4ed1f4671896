//! Arena configuration with hierarchical layering.
//!
//! ```text
//! Priority (highest to lowest):
//!
//! ┌──────────────────────────────────────────┐
//! │  1. Environment Variables (ARENA_*)      │
//! ├──────────────────────────────────────────┤
//! │  2. Project Config (.arena/config.toml)  │
//! ├──────────────────────────────────────────┤
//! │  3. Global Config (~/.arena/config.toml) │
//! ├──────────────────────────────────────────┤
//! │  4. Default Values (compile-time)        │
//! └──────────────────────────────────────────┘
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Config Field | Type |
//! |----------|--------------|------|
//! | `ARENA_OPERATOR` | `operator.login` | String |
//! | `ARENA_OPERATOR_PASSWORD` | `operator.password` | String |
//! | `ARENA_ENDPOINT` | `server.endpoint` | String |
//! | `ARENA_SESSION_TTL_SECS` | `session.ttl_secs` | u64 |
//! | `ARENA_PEER_MAX_ATTEMPTS` | `peers.max_attempts` | usize |
//! | `ARENA_SETUP_DEMO` | `demo.enabled` | bool |
//! | `ARENA_DEMO_GAME` | `demo.game` | String |
//!
//! # Example Configuration
//!
//! ```toml
//! [operator]
//! login = "admin"
//! password = "adminpass"
//!
//! [server]
//! endpoint = "0.0.0.0:1099"
//! code_base = ["https://arena.example.org/views/"]
//!
//! [session]
//! ttl_secs = 86400
//!
//! [peers]
//! max_attempts = 3
//!
//! [registry]
//! styles = ["knockout", "single-match"]
//! games = []
//!
//! [demo]
//! enabled = true
//! game = "tictactoe"
//! ```

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use types::{
    ArenaConfig, DemoConfig, OperatorConfig, PeersConfig, RegistryConfig, ServerConfig,
    SessionConfig,
};

/// Default global config directory.
pub fn default_config_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".arena")
}

/// Default global config file path.
pub fn default_config_path() -> std::path::PathBuf {
    default_config_dir().join("config.toml")
}

/// Project config directory name.
pub const PROJECT_CONFIG_DIR: &str = ".arena";

/// Project config file name.
pub const PROJECT_CONFIG_FILE: &str = "config.toml";
