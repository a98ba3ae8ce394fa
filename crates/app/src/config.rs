//! Layered configuration
//!
//! Defaults, then an optional TOML file, then `BUDDY_*` environment
//! variables. Command-line flags are applied last by `main`.

use std::fmt::Display;
use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use buddy_core::DEFAULT_BUDDIES;
use buddy_net::DEFAULT_PORT;
use directories::ProjectDirs;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{AppError, Result};

/// Config file looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "buddy.toml";

const DATABASE_FILE: &str = "chat.db";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// SQLite file; the platform data directory is used when unset
    pub database: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server_url: String,
    pub poll_interval_secs: u64,
    /// Roster seed. Buddies added while running are not written back here.
    pub buddies: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            database: None,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: format!("http://127.0.0.1:{}", DEFAULT_PORT),
            poll_interval_secs: 5,
            buddies: DEFAULT_BUDDIES.iter().map(|b| b.to_string()).collect(),
        }
    }
}

impl Config {
    /// Load the config file (if any) and apply environment overrides
    ///
    /// An explicitly named file must exist; the default file is optional.
    /// Not validated here: command-line flags still apply on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                info!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                Self::default()
            }
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let config = toml::from_str(&content).map_err(|source| AppError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Apply `BUDDY_*` overrides looked up through `var`
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        override_parsed(&var, "BUDDY_HOST", &mut self.server.host);
        override_parsed(&var, "BUDDY_PORT", &mut self.server.port);

        if let Some(path) = var("BUDDY_DATABASE") {
            self.server.database = Some(PathBuf::from(path));
        }
        if let Some(url) = var("BUDDY_SERVER_URL") {
            self.client.server_url = url;
        }
        override_parsed(&var, "BUDDY_POLL_INTERVAL", &mut self.client.poll_interval_secs);
    }

    pub fn validate(&self) -> Result<()> {
        if self.client.poll_interval_secs == 0 {
            return Err(AppError::InvalidConfig(
                "client.poll_interval_secs must be at least 1".to_string(),
            ));
        }
        if self.client.server_url.trim().is_empty() {
            return Err(AppError::InvalidConfig(
                "client.server_url must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.client.poll_interval_secs)
    }

    /// Resolved database path
    pub fn database_path(&self) -> PathBuf {
        if let Some(path) = &self.server.database {
            return path.clone();
        }

        match ProjectDirs::from("dev", "onyx", "buddy") {
            Some(dirs) => dirs.data_dir().join(DATABASE_FILE),
            None => {
                warn!("Could not determine data directory, using working directory");
                PathBuf::from(DATABASE_FILE)
            }
        }
    }
}

fn override_parsed<T>(var: &impl Fn(&str) -> Option<String>, key: &str, target: &mut T)
where
    T: FromStr,
    T::Err: Display,
{
    let Some(raw) = var(key) else {
        return;
    };

    match raw.parse() {
        Ok(value) => {
            info!("{key} set from environment");
            *target = value;
        }
        Err(e) => warn!("Invalid {key} value {raw:?}: {e}, keeping previous value"),
    }
}
