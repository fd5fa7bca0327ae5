use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::net::SocketAddr;

const ADDR_VAR: &str = "SHEET_INSIGHT_ADDR";
const MAX_FILE_SIZE_VAR: &str = "SHEET_INSIGHT_MAX_FILE_SIZE";

fn default_max_file_size() -> usize {
    // 10 MB in bytes
    10 * 1024 * 1024
}

fn default_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    /// Upper bound for one upload request body.
    pub max_file_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            max_file_size: default_max_file_size(),
        }
    }
}

impl Config {
    pub fn new() -> Result<Self> {
        // Load .env file first
        dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(addr) = lookup(ADDR_VAR) {
            config.addr = addr
                .parse()
                .with_context(|| format!("Invalid {}: {}", ADDR_VAR, addr))?;
        }

        if let Some(size) = lookup(MAX_FILE_SIZE_VAR) {
            config.max_file_size = size
                .parse()
                .with_context(|| format!("Invalid {}: {}", MAX_FILE_SIZE_VAR, size))?;
        }

        Ok(config)
    }
}

pub fn load_config() -> Result<Config> {
    Config::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.addr, default_addr());
        assert_eq!(config.max_file_size, 10 * 1024 * 1024);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            (ADDR_VAR, "0.0.0.0:8080"),
            (MAX_FILE_SIZE_VAR, "1024"),
        ]))
        .unwrap();
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.max_file_size, 1024);
    }

    #[test]
    fn test_invalid_size_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[(MAX_FILE_SIZE_VAR, "lots")])).unwrap_err();
        assert!(err.to_string().contains(MAX_FILE_SIZE_VAR));
    }
}
