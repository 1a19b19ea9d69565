//! Server configuration from environment variables (a `.env` file is honoured by the binary).

use crate::error::ConfigError;
use crate::store::DEFAULT_TABLE;
use std::collections::HashMap;
use std::net::SocketAddr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub table: String,
    pub body_limit: usize,
    pub store: StoreBackend,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&std::env::vars().collect())
    }

    /// Build from an explicit variable map; unset keys take their defaults.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(vars, key);

        let database_url = get("DATABASE_URL")
            .unwrap_or("postgres://localhost/directories")
            .to_string();
        let bind_addr: SocketAddr = parse_or(get("BIND_ADDR"), "BIND_ADDR", "0.0.0.0:3000".parse().ok())?;
        let max_connections: u32 = parse_or(get("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", Some(5))?;
        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DB_MAX_CONNECTIONS",
                message: "must be at least 1".into(),
            });
        }
        let body_limit: usize = parse_or(get("BODY_LIMIT_BYTES"), "BODY_LIMIT_BYTES", Some(1024 * 1024))?;

        let table = get("DIRECTORIES_TABLE").unwrap_or(DEFAULT_TABLE).to_string();
        if !is_identifier(&table) {
            return Err(ConfigError::Invalid {
                key: "DIRECTORIES_TABLE",
                message: format!("'{}' is not a valid table name", table),
            });
        }

        let store = match get("DIRECTORY_STORE").map(|s| s.to_ascii_lowercase()).as_deref() {
            None | Some("postgres") => StoreBackend::Postgres,
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "DIRECTORY_STORE",
                    message: format!("expected 'postgres' or 'memory', got '{}'", other),
                })
            }
        };

        Ok(ServerConfig {
            database_url,
            bind_addr,
            max_connections,
            table,
            body_limit,
            store,
        })
    }
}

fn lookup<'a>(vars: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    vars.get(key).map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn parse_or<T: std::str::FromStr>(
    raw: Option<&str>,
    key: &'static str,
    default: Option<T>,
) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match raw {
        Some(s) => s.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            message: e.to_string(),
        }),
        None => default.ok_or_else(|| ConfigError::Invalid {
            key,
            message: "no default".into(),
        }),
    }
}

/// Letters, digits and underscore, not starting with a digit, at most 63 bytes.
fn is_identifier(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= 63
        && !s.starts_with(|c: char| c.is_ascii_digit())
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn defaults() {
        let cfg = ServerConfig::from_vars(&HashMap::new()).unwrap();
        assert_eq!(cfg.database_url, "postgres://localhost/directories");
        assert_eq!(cfg.bind_addr.port(), 3000);
        assert_eq!(cfg.max_connections, 5);
        assert_eq!(cfg.table, "directories");
        assert_eq!(cfg.body_limit, 1024 * 1024);
        assert_eq!(cfg.store, StoreBackend::Postgres);
    }

    #[test]
    fn overrides() {
        let cfg = ServerConfig::from_vars(&vars(&[
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("DB_MAX_CONNECTIONS", "20"),
            ("DIRECTORIES_TABLE", "team_directories"),
            ("DIRECTORY_STORE", "Memory"),
        ]))
        .unwrap();
        assert_eq!(cfg.bind_addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(cfg.max_connections, 20);
        assert_eq!(cfg.table, "team_directories");
        assert_eq!(cfg.store, StoreBackend::Memory);
    }

    #[test]
    fn rejects_invalid_values() {
        for pairs in [
            vec![("BIND_ADDR", "nowhere")],
            vec![("DB_MAX_CONNECTIONS", "0")],
            vec![("DB_MAX_CONNECTIONS", "many")],
            vec![("DIRECTORIES_TABLE", "drop table; --")],
            vec![("DIRECTORIES_TABLE", "1st")],
            vec![("DIRECTORY_STORE", "sqlite")],
        ] {
            assert!(ServerConfig::from_vars(&vars(&pairs)).is_err(), "accepted {:?}", pairs);
        }
    }
}
