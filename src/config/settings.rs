//! Process settings read from the environment.

use crate::error::ConfigError;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_DATABASE_URL: &str = "mysql://root@localhost:3306/pastelaria";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub max_connections: u32,
    /// JSON file with the entity allow-list. Takes precedence over `allowed_entities`.
    pub entities_path: Option<PathBuf>,
    /// Comma-separated entity names from `ALLOWED_ENTITIES`.
    pub allowed_entities: Option<Vec<String>>,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = match get("HOST") {
            Some(h) => h.parse().map_err(|_| ConfigError::InvalidSetting {
                key: "HOST",
                message: format!("'{}' is not an IP address", h),
            })?,
            None => IpAddr::from([0, 0, 0, 0]),
        };
        let port = match get("PORT") {
            Some(p) => p.parse().map_err(|_| ConfigError::InvalidSetting {
                key: "PORT",
                message: format!("'{}' is not a port number", p),
            })?,
            None => DEFAULT_PORT,
        };
        let max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(n) => match n.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidSetting {
                        key: "DB_MAX_CONNECTIONS",
                        message: format!("'{}' is not a positive integer", n),
                    })
                }
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };
        let allowed_entities = get("ALLOWED_ENTITIES").map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        });

        Ok(Settings {
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            host,
            port,
            max_connections,
            entities_path: get("ENTITIES_PATH").map(PathBuf::from),
            allowed_entities,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
