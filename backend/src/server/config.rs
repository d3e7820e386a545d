//! HTTP server settings and the configuration object built from them.

use std::io;
use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use profiles_api::domain::UserProfileManager;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Values loaded from CLI flags, `PROFILES_API_*` variables or a config file.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PROFILES_API")]
pub struct ServerSettings {
    /// Socket address to listen on.
    #[ortho_config(default = DEFAULT_BIND_ADDR.to_owned())]
    pub bind_addr: String,
    /// PostgreSQL connection string; profiles stay in memory when unset.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = DEFAULT_POOL_MAX_SIZE)]
    pub pool_max_size: u32,
}

impl ServerSettings {
    /// Parsed listen address; `0.0.0.0:8080` unless configured.
    ///
    /// # Errors
    /// [`io::ErrorKind::InvalidInput`] when the configured value is not a
    /// socket address.
    pub fn bind_addr(&self) -> io::Result<SocketAddr> {
        let raw = self.bind_addr.trim();
        raw.parse().map_err(|err| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid bind address {raw:?}: {err}"),
            )
        })
    }

    /// Configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Pool size; 10 unless configured.
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size
    }
}

/// Everything `create_server` needs once adapters are chosen.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) profiles: UserProfileManager,
}

impl ServerConfig {
    /// Pair a listen address with the profile service handed to handlers.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, profiles: UserProfileManager) -> Self {
        Self {
            bind_addr,
            profiles,
        }
    }
}
