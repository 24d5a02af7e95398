//! Configuration Management
//!
//! Credentials and the API endpoint come from a TOML file looked up in a
//! fixed order: `ppaas.conf` in the working directory, `~/.ppaas.conf`, then
//! `/etc/ppaas.conf`. The first file that exists wins.
//!
//! ```toml
//! [auth]
//! user = "lab-robot"
//! pass = "..."
//!
//! [api]
//! endpoint = "https://ppaas.example.net/api"
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use crate::error::{Error, Result};

/// Name of the project-local configuration file.
const LOCAL_CONFIG_NAME: &str = "ppaas.conf";

/// Name of the per-user dotfile.
const USER_CONFIG_NAME: &str = ".ppaas.conf";

/// System-wide fallback location.
const SYSTEM_CONFIG_PATH: &str = "/etc/ppaas.conf";

/// Credentials and endpoint for one API.
///
/// Built explicitly with [`Config::new`] or loaded from disk. The only way
/// configuration reaches a client is by passing a `Config` into
/// [`crate::ApiClient::new`]; there is no global state.
#[derive(Clone)]
pub struct Config {
    /// Basic-auth user.
    pub user: String,
    /// Basic-auth password.
    pub pass: String,
    /// Base URL every request path is resolved against.
    pub endpoint: Url,
}

/// On-disk layout, section for section.
#[derive(Deserialize)]
struct ConfigFile {
    auth: AuthSection,
    api: ApiSection,
}

#[derive(Deserialize)]
struct AuthSection {
    user: String,
    pass: String,
}

#[derive(Deserialize)]
struct ApiSection {
    endpoint: String,
}

impl Config {
    /// Build a configuration without touching the filesystem.
    pub fn new(user: impl Into<String>, pass: impl Into<String>, endpoint: Url) -> Self {
        Self {
            user: user.into(),
            pass: pass.into(),
            endpoint,
        }
    }

    /// Load the first configuration file that exists among the default
    /// locations.
    pub fn load() -> Result<Self> {
        for path in Self::search_paths() {
            if path.exists() {
                tracing::debug!("loading configuration from {}", path.display());
                return Self::from_file(&path);
            }
        }
        Err(Error::ConfigurationNotFound)
    }

    /// Load one specific configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let invalid = |reason: String| Error::InvalidConfiguration {
            path: path.to_path_buf(),
            reason,
        };

        let content = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        let file: ConfigFile = toml::from_str(&content).map_err(|e| invalid(e.to_string()))?;
        let endpoint = Url::parse(&file.api.endpoint)
            .map_err(|e| invalid(format!("endpoint {:?}: {}", file.api.endpoint, e)))?;

        Ok(Self {
            user: file.auth.user,
            pass: file.auth.pass,
            endpoint,
        })
    }

    /// Lookup order: working directory, home dotfile, system-wide file.
    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_NAME)];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(USER_CONFIG_NAME));
        }
        paths.push(PathBuf::from(SYSTEM_CONFIG_PATH));
        paths
    }
}

// Manual Debug: the password must not land in logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("user", &self.user)
            .field("pass", &"<redacted>")
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}
