use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::remote::{TmdbConfig, YoutubeConfig};

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Discovery API (required: the catalog cannot populate without it).
    pub tmdb: TmdbConfig,
    /// Video-hosting API used for trailer thumbnails (required).
    pub youtube: YoutubeConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("marquee.db")
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub tmdb: SanitizedRemoteConfig,
    pub youtube: SanitizedRemoteConfig,
}

/// Sanitized remote client config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedRemoteConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            database: config.database.clone(),
            tmdb: SanitizedRemoteConfig {
                base_url: config.tmdb.base_url.clone(),
                api_key_configured: !config.tmdb.api_key.is_empty(),
                timeout_secs: config.tmdb.timeout_secs,
            },
            youtube: SanitizedRemoteConfig {
                base_url: config.youtube.base_url.clone(),
                api_key_configured: !config.youtube.api_key.is_empty(),
                timeout_secs: config.youtube.timeout_secs,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_valid_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000

[tmdb]
api_key = "tmdb-key"

[youtube]
api_key = "yt-key"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
        assert_eq!(config.tmdb.api_key, "tmdb-key");
        assert_eq!(config.tmdb.timeout_secs, 30); // default
        assert!(config.tmdb.base_url.is_none());
    }

    #[test]
    fn test_deserialize_with_default_server_and_database() {
        let toml = r#"
[tmdb]
api_key = "tmdb-key"

[youtube]
api_key = "yt-key"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.database.path.to_str().unwrap(), "marquee.db");
    }

    #[test]
    fn test_deserialize_missing_tmdb_fails() {
        let toml = r#"
[youtube]
api_key = "yt-key"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_with_custom_database_path() {
        let toml = r#"
[database]
path = "/data/movies.sqlite"

[tmdb]
api_key = "tmdb-key"

[youtube]
api_key = "yt-key"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.database.path.to_str().unwrap(), "/data/movies.sqlite");
    }

    #[test]
    fn test_sanitized_config_hides_keys() {
        let toml = r#"
[tmdb]
api_key = "secret-tmdb"
base_url = "http://localhost:9000"

[youtube]
api_key = ""
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let sanitized = SanitizedConfig::from(&config);

        assert!(sanitized.tmdb.api_key_configured);
        assert_eq!(
            sanitized.tmdb.base_url.as_deref(),
            Some("http://localhost:9000")
        );
        assert!(!sanitized.youtube.api_key_configured);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("secret-tmdb"));
    }
}
