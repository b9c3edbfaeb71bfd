//! Server settings read from the environment

use std::env;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// `MAZE_BIND_ADDR`
    pub bind_addr: String,
    /// `MAZE_SEED`; a random seed per maze when unset
    pub seed: Option<u32>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            seed: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_vars(env::var("MAZE_BIND_ADDR").ok(), env::var("MAZE_SEED").ok())
    }

    fn from_vars(bind_addr: Option<String>, seed: Option<String>) -> Result<Self, String> {
        let seed = match seed.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse()
                    .map_err(|_| format!("Invalid MAZE_SEED '{}'. Must be a non-negative integer.", raw))?,
            ),
        };

        Ok(Self {
            bind_addr: bind_addr
                .filter(|addr| !addr.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_vars(None, None).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_addr, "0.0.0.0:5000");
    }

    #[test]
    fn test_overrides() {
        let config =
            ServerConfig::from_vars(Some("127.0.0.1:9000".to_string()), Some("2918957128".to_string())).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.seed, Some(2918957128));
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = ServerConfig::from_vars(Some(" ".to_string()), Some("".to_string())).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_invalid_seed_rejected() {
        assert!(ServerConfig::from_vars(None, Some("-1".to_string())).is_err());
        assert!(ServerConfig::from_vars(None, Some("abc".to_string())).is_err());
    }
}
