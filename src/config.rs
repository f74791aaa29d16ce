//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and `COLLO_*` environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::backend::SupabaseConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub realtime: RealtimeConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Built UI bundle to serve; API only when unset
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![
                "http://localhost:8081".to_string(),
                "http://127.0.0.1:8081".to_string(),
            ],
            request_timeout_secs: default_request_timeout(),
            static_dir: None,
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Which backend implementation to talk to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Hosted project over REST
    #[default]
    Supabase,
    /// In-process store seeded with demo rows
    Memory,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "supabase" => Ok(BackendKind::Supabase),
            "memory" => Ok(BackendKind::Memory),
            other => Err(format!("unknown backend kind '{}'", other)),
        }
    }
}

/// Hosted backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub kind: BackendKind,

    #[serde(default = "default_backend_url")]
    pub url: String,

    /// Public (anon) key of the hosted project
    #[serde(default)]
    pub anon_key: String,

    #[serde(default = "default_backend_timeout")]
    pub request_timeout_ms: u64,
}

fn default_backend_url() -> String {
    "http://localhost:54321".to_string()
}

fn default_backend_timeout() -> u64 {
    10_000
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            url: default_backend_url(),
            anon_key: String::new(),
            request_timeout_ms: default_backend_timeout(),
        }
    }
}

impl BackendConfig {
    /// Client settings for the hosted backend
    pub fn supabase(&self) -> SupabaseConfig {
        SupabaseConfig {
            url: self.url.clone(),
            anon_key: self.anon_key.clone(),
            request_timeout_ms: self.request_timeout_ms,
            ..SupabaseConfig::default()
        }
    }
}

/// Session-change push configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RealtimeConfig {
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,

    #[serde(default = "default_broadcast_capacity")]
    pub broadcast_capacity: usize,
}

fn default_max_connections() -> usize {
    1000
}

fn default_broadcast_capacity() -> usize {
    256
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            broadcast_capacity: default_broadcast_capacity(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("collo").join("config.toml")),
            Some(PathBuf::from("/etc/collo/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // API
        if let Some(host) = var("COLLO_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = var("COLLO_API_PORT").and_then(|p| p.parse().ok()) {
            self.api.port = port;
        }
        if let Some(dir) = var("COLLO_STATIC_DIR") {
            self.api.static_dir = Some(PathBuf::from(dir));
        }

        // Backend
        if let Some(kind) = var("COLLO_BACKEND_KIND").and_then(|k| k.parse().ok()) {
            self.backend.kind = kind;
        }
        if let Some(url) = var("COLLO_BACKEND_URL") {
            self.backend.url = url;
        }
        if let Some(key) = var("COLLO_BACKEND_ANON_KEY") {
            self.backend.anon_key = key;
        }

        // Logging
        if let Some(level) = var("COLLO_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("COLLO_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Collo Configuration
#
# Environment variables override these settings:
# - COLLO_API_HOST
# - COLLO_API_PORT
# - COLLO_STATIC_DIR
# - COLLO_BACKEND_KIND
# - COLLO_BACKEND_URL
# - COLLO_BACKEND_ANON_KEY
# - COLLO_LOG_LEVEL
# - COLLO_LOG_FORMAT

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8080

# Allowed CORS origins
cors_origins = ["http://localhost:8081", "http://127.0.0.1:8081"]

# Request timeout in seconds
request_timeout_secs = 30

# Serve the built UI from this directory (unset: API only)
# static_dir = "collo-ui/dist"

[backend]
# supabase (hosted project) or memory (demo data, nothing persisted)
kind = "supabase"

# Project URL
url = "http://localhost:54321"

# Public anon key of the project
anon_key = ""

# Per-request timeout (ms)
request_timeout_ms = 10000

[realtime]
# Maximum concurrent session-change sockets
max_connections = 1000

# Buffered session events per subscriber
broadcast_capacity = 256

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.api.port, 8080);
        assert_eq!(config.backend.kind, BackendKind::Supabase);
        assert_eq!(config.backend.request_timeout_ms, 10_000);
        assert_eq!(config.realtime.max_connections, 1000);
        assert!(config.api.static_dir.is_none());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = Config::parse("[backend]\nkind = \"memory\"\n").unwrap();
        assert_eq!(config.backend.kind, BackendKind::Memory);
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[api]\nport = 9000\nstatic_dir = \"dist\"\n\n[backend]\nurl = \"https://abc.supabase.co\"\nanon_key = \"anon\""
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.api.port, 9000);
        assert_eq!(config.api.static_dir, Some(PathBuf::from("dist")));

        let supabase = config.backend.supabase();
        assert_eq!(supabase.url, "https://abc.supabase.co");
        assert_eq!(supabase.anon_key, "anon");
    }

    #[test]
    fn test_load_errors() {
        let missing = Config::load(Path::new("/definitely/not/here.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api\nport = ").unwrap();
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("COLLO_API_PORT", "7000"),
            ("COLLO_BACKEND_KIND", "Memory"),
            ("COLLO_BACKEND_ANON_KEY", "k"),
            ("COLLO_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.port, 7000);
        assert_eq!(config.backend.kind, BackendKind::Memory);
        assert_eq!(config.backend.anon_key, "k");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.api.host, "0.0.0.0");
    }

    #[test]
    fn test_bad_override_values_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| match key {
            "COLLO_API_PORT" => Some("not-a-port".to_string()),
            "COLLO_BACKEND_KIND" => Some("firebase".to_string()),
            _ => None,
        });
        assert_eq!(config.api.port, 8080);
        assert_eq!(config.backend.kind, BackendKind::Supabase);
    }
}
