use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_address")]
    pub address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}

fn default_address() -> String {
    "0.0.0.0:8970".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_job_root")]
    pub job_root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            job_root: default_job_root(),
        }
    }
}

fn default_job_root() -> PathBuf {
    PathBuf::from("/jobs")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default = "default_api_key")]
    pub api_key: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
        }
    }
}

fn default_api_key() -> String {
    "changeme".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default = "default_fls_settings")]
    pub fls: ToolSettings,
    #[serde(default = "default_volatility_settings")]
    pub volatility: ToolSettings,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            fls: default_fls_settings(),
            volatility: default_volatility_settings(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolSettings {
    pub binary: String,
    pub timeout_seconds: u64,
}

fn default_fls_settings() -> ToolSettings {
    ToolSettings {
        binary: "fls".to_string(),
        timeout_seconds: 120,
    }
}

fn default_volatility_settings() -> ToolSettings {
    ToolSettings {
        binary: "vol.py".to_string(),
        timeout_seconds: 180,
    }
}

impl ServerConfig {
    pub fn from_file(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Build a config from defaults plus the environment variables the
    /// deployment sets: `JOB_STORAGE` and `FORGE_API_KEY`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(root) = std::env::var("JOB_STORAGE") {
            config.storage.job_root = PathBuf::from(root);
        }
        if let Ok(key) = std::env::var("FORGE_API_KEY") {
            config.auth.api_key = key;
        }

        config
    }
}
