//! Node configuration.

use std::net::{IpAddr, SocketAddr};

use atlas_core::{AtlasError, Result};

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: IpAddr,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Administrator account created at startup (default: `admin`).
    pub seed_admin_login: String,
    /// Password for the seeded administrator (default: `admin`).
    pub seed_admin_password: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 8080,
            seed_admin_login: "admin".to_string(),
            seed_admin_password: "admin".to_string(),
        }
    }
}

impl NodeConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default   |
    /// |-----------------------------|-----------|
    /// | `HOST`                      | `0.0.0.0` |
    /// | `PORT`                      | `8080`    |
    /// | `ATLAS_SEED_ADMIN_LOGIN`    | `admin`   |
    /// | `ATLAS_SEED_ADMIN_PASSWORD` | `admin`   |
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let host = match lookup("HOST") {
            Some(raw) => raw
                .parse()
                .map_err(|_| AtlasError::Validation(format!("HOST is not an IP address: {raw}")))?,
            None => defaults.host,
        };

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| AtlasError::Validation(format!("PORT must be a valid u16, got {raw}")))?,
            None => defaults.port,
        };

        Ok(Self {
            host,
            port,
            seed_admin_login: lookup("ATLAS_SEED_ADMIN_LOGIN").unwrap_or(defaults.seed_admin_login),
            seed_admin_password: lookup("ATLAS_SEED_ADMIN_PASSWORD")
                .unwrap_or(defaults.seed_admin_password),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
