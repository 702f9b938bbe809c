use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    /// Вышестоящий JSON-RPC сервер; без него форма только валидируется
    #[serde(default)]
    pub jrpc: Option<JrpcConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Каталог со сборкой фронтенда (trunk dist)
    pub static_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JrpcConfig {
    pub url: String,
    #[serde(default = "default_jrpc_version")]
    pub version: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// PEM-сертификат клиента
    pub cert_path: Option<String>,
    /// PKCS#8 ключ клиента в PEM
    pub key_path: Option<String>,
}

fn default_jrpc_version() -> String {
    contracts::usecases::u101_jrpc_call::JSONRPC_VERSION.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 8000
static_dir = "crates/frontend/dist"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Current working directory
/// 3. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf));

    let candidates = exe_dir
        .into_iter()
        .chain(std::env::current_dir().ok())
        .map(|dir| dir.join("config.toml"));

    for config_path in candidates {
        if config_path.exists() {
            tracing::info!("Loading config from: {}", config_path.display());
            let contents = std::fs::read_to_string(&config_path)?;
            return parse_config(&contents);
        }
        tracing::debug!("config.toml not found at: {}", config_path.display());
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    Ok(config)
}

/// Relative static dir resolves against the working directory
pub fn get_static_dir(config: &Config) -> PathBuf {
    let dir = Path::new(&config.server.static_dir);
    if dir.is_absolute() {
        return dir.to_path_buf();
    }

    match std::env::current_dir() {
        Ok(cwd) => cwd.join(dir),
        Err(_) => dir.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert!(config.jrpc.is_none());
    }

    #[test]
    fn test_jrpc_section_defaults() {
        let config = parse_config(
            r#"
[server]
host = "127.0.0.1"
port = 9000
static_dir = "/srv/dist"

[jrpc]
url = "https://rpc.example.com/api"
"#,
        )
        .unwrap();

        let jrpc = config.jrpc.as_ref().unwrap();
        assert_eq!(jrpc.url, "https://rpc.example.com/api");
        assert_eq!(jrpc.version, "2.0");
        assert_eq!(jrpc.timeout_secs, 30);
        assert!(jrpc.cert_path.is_none());
        assert_eq!(get_static_dir(&config), PathBuf::from("/srv/dist"));
    }

    #[test]
    fn test_missing_server_section_is_an_error() {
        assert!(parse_config("[jrpc]\nurl = \"http://localhost\"").is_err());
    }
}
