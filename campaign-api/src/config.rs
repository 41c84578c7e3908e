use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Used by the client when no backend location is configured at all.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";
pub const BACKEND_URL_ENV: &str = "BACKEND_URL";
pub const API_BASE_URL_ENV: &str = "API_BASE_URL";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub backend: Option<BackendConfig>,
    pub cors: Option<CorsConfig>,
    pub server: Option<ServerConfig>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            backend: None,
            cors: Some(CorsConfig {
                allowed_origins: vec!["http://localhost:3000".to_string()],
            }),
            server: Some(ServerConfig::default()),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct BackendConfig {
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
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

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl ApiConfig {
    pub fn load() -> Result<(Self, PathBuf), ConfigError> {
        let config_path = get_config_path();

        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        // Create default config file if it doesn't exist
        if !config_path.exists() {
            let default_config = r#"
[backend]
# Remote backend owning the contact data. BACKEND_URL or API_BASE_URL
# take precedence over this value.
# base_url = "https://wahlkampfmanager.example.org"

[cors]
allowed_origins = ["http://localhost:3000"]

[server]
host = "127.0.0.1"
port = 3000
"#;
            std::fs::write(&config_path, default_config).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let config = Self::load_from(&config_path)?;

        Ok((config, config_path))
    }

    /// Reads a TOML file; `CAMPAIGN__SECTION__KEY` variables override it.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::from(path.to_path_buf()).format(FileFormat::Toml))
            .add_source(
                Environment::with_prefix("CAMPAIGN")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        builder.try_deserialize()
    }

    /// Backend location for the proxy tier. `None` means misconfigured.
    pub fn proxy_backend_url(&self) -> Option<String> {
        resolve_backend_url(
            |key| std::env::var(key).ok(),
            self.backend.as_ref().and_then(|b| b.base_url.as_deref()),
        )
    }

    /// Backend location for the client, with the local fallback.
    pub fn client_base_url(&self) -> String {
        self.proxy_backend_url()
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
    }

    pub fn server_addr(&self) -> (String, u16) {
        let server = self.server.clone().unwrap_or_default();
        (server.host, server.port)
    }
}

/// `BACKEND_URL`, then `API_BASE_URL`, then the config file. The first one
/// that is set decides; a set-but-empty value counts as missing.
pub fn resolve_backend_url<F>(env: F, configured: Option<&str>) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    env(BACKEND_URL_ENV)
        .or_else(|| env(API_BASE_URL_ENV))
        .or_else(|| configured.map(str::to_string))
        .filter(|url| !url.trim().is_empty())
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("wahlkampf").join("api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}
