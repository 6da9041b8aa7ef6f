use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::loader::TableLoader;
use crate::Result;

/// Environment variable for the bind host
pub const HOST_ENV: &str = "TERNLEX_HOST";

/// Environment variable for the bind port
pub const PORT_ENV: &str = "TERNLEX_PORT";

/// Relay configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding `map.json` and `tier2_map.json`
    pub data_dir: PathBuf,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            data_dir: TableLoader::data_dir(),
        }
    }
}

impl RelayConfig {
    /// Defaults overridden by `TERNLEX_HOST` / `TERNLEX_PORT`
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(host) = std::env::var(HOST_ENV) {
            config.host = host;
        }
        match std::env::var(PORT_ENV).map(|p| p.parse::<u16>()) {
            Ok(Ok(port)) => config.port = port,
            Ok(Err(e)) => tracing::warn!("Ignoring invalid {}: {}", PORT_ENV, e),
            Err(_) => {}
        }
        config
    }

    /// Load config from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: RelayConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Get the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_addr() {
        let config = RelayConfig::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8000");
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relay.json");
        std::fs::write(&path, r#"{ "host": "127.0.0.1", "port": 9100, "data_dir": "tables" }"#).unwrap();
        let config = RelayConfig::from_file(&path).unwrap();
        assert_eq!(config.server_addr(), "127.0.0.1:9100");
        assert_eq!(config.data_dir, PathBuf::from("tables"));
    }
}
