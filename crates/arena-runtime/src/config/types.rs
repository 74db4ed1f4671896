//! Configuration types.
//!
//! All types implement [`Default`] for compile-time fallback values.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure, after merging all layers.
///
/// # Example
///
/// ```
/// use arena_runtime::config::ArenaConfig;
///
/// let config = ArenaConfig::default();
/// assert_eq!(config.operator.login, "admin");
/// assert!(!config.demo.enabled);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ArenaConfig {
    /// The arena operator account.
    pub operator: OperatorConfig,

    /// Endpoint and code base advertised to clients.
    pub server: ServerConfig,

    /// Session ticket lifetime.
    pub session: SessionConfig,

    /// Worker peer delegation.
    pub peers: PeersConfig,

    /// Which styles and games the arena exposes.
    pub registry: RegistryConfig,

    /// Demo data bootstrap.
    pub demo: DemoConfig,
}

impl ArenaConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes to TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserializes from TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if deserialization fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Merges another config into this one.
    ///
    /// Values from `other` override values in `self` only where they
    /// differ from the default, so a sparse file only touches what it names.
    pub fn merge(&mut self, other: &Self) {
        self.operator.merge(&other.operator);
        self.server.merge(&other.server);
        self.session.merge(&other.session);
        self.peers.merge(&other.peers);
        self.registry.merge(&other.registry);
        self.demo.merge(&other.demo);
    }
}

/// Operator account, created at arena construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OperatorConfig {
    pub login: String,
    pub password: String,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            login: "admin".into(),
            password: "adminpass".into(),
        }
    }
}

impl OperatorConfig {
    fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.login != default.login {
            self.login = other.login.clone();
        }
        if other.password != default.password {
            self.password = other.password.clone();
        }
    }
}

/// Connection details handed to clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    /// `host:port` the arena is reachable at.
    pub endpoint: String,

    /// Locations clients search for game views.
    pub code_base: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            endpoint: "0.0.0.0:1099".into(),
            code_base: Vec::new(),
        }
    }
}

impl ServerConfig {
    fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.endpoint != default.endpoint {
            self.endpoint = other.endpoint.clone();
        }
        if !other.code_base.is_empty() {
            self.code_base = other.code_base.clone();
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SessionConfig {
    /// Ticket lifetime in seconds. Unset means tickets never expire.
    pub ttl_secs: Option<u64>,
}

impl SessionConfig {
    fn merge(&mut self, other: &Self) {
        if other.ttl_secs.is_some() {
            self.ttl_secs = other.ttl_secs;
        }
    }

    /// Returns the lifetime as a [`Duration`].
    #[must_use]
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PeersConfig {
    /// Remote attempts per match before falling back to local creation.
    ///
    /// Unset means every pooled peer is tried.
    pub max_attempts: Option<usize>,
}

impl PeersConfig {
    fn merge(&mut self, other: &Self) {
        if other.max_attempts.is_some() {
            self.max_attempts = other.max_attempts;
        }
    }
}

/// Registry filters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RegistryConfig {
    /// Tournament styles to register, by name.
    pub styles: Vec<String>,

    /// Games to register, by name. Empty registers every supplied game.
    pub games: Vec<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            styles: vec!["knockout".into(), "single-match".into()],
            games: Vec::new(),
        }
    }
}

impl RegistryConfig {
    fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.styles != default.styles {
            self.styles = other.styles.clone();
        }
        if !other.games.is_empty() {
            self.games = other.games.clone();
        }
    }

    /// Returns `true` if `game` passes the filter.
    #[must_use]
    pub fn allows_game(&self, game: &str) -> bool {
        self.games.is_empty() || self.games.iter().any(|g| g == game)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DemoConfig {
    /// Populate demo users, leagues and tournaments at startup.
    pub enabled: bool,

    /// Game the demo leagues use. Unset picks the first registered game.
    pub game: Option<String>,
}

impl DemoConfig {
    fn merge(&mut self, other: &Self) {
        if other.enabled {
            self.enabled = true;
        }
        if other.game.is_some() {
            self.game = other.game.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_toml_keeps_defaults() {
        let config = ArenaConfig::from_toml(
            r#"
[server]
endpoint = "arena.example.org:1099"
"#,
        )
        .unwrap();

        assert_eq!(config.server.endpoint, "arena.example.org:1099");
        assert_eq!(config.operator, OperatorConfig::default());
        assert_eq!(config.registry.styles, vec!["knockout", "single-match"]);
    }

    #[test]
    fn toml_roundtrip() {
        let mut config = ArenaConfig::default();
        config.session.ttl_secs = Some(600);
        config.demo.enabled = true;
        let text = config.to_toml().unwrap();
        assert_eq!(ArenaConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn merge_overrides_non_default() {
        let mut base = ArenaConfig::default();
        base.operator.login = "root".into();

        let mut overlay = ArenaConfig::default();
        overlay.peers.max_attempts = Some(2);
        overlay.registry.games = vec!["tictactoe".into()];

        base.merge(&overlay);
        assert_eq!(base.operator.login, "root");
        assert_eq!(base.peers.max_attempts, Some(2));
        assert!(base.registry.allows_game("tictactoe"));
        assert!(!base.registry.allows_game("chess"));
    }

    #[test]
    fn merge_keeps_base_when_overlay_is_default() {
        let mut base = ArenaConfig::default();
        base.session.ttl_secs = Some(30);
        base.server.endpoint = "10.0.0.1:4000".into();

        base.merge(&ArenaConfig::default());
        assert_eq!(base.session.ttl(), Some(Duration::from_secs(30)));
        assert_eq!(base.server.endpoint, "10.0.0.1:4000");
    }

    #[test]
    fn empty_game_filter_allows_all() {
        assert!(RegistryConfig::default().allows_game("anything"));
    }
}
