//! Configuration Management
//!
//! Handles persistent configuration storage for the Speckle client.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_HOST: &str = "hestia.speckle.works";
pub const DEFAULT_VERSION: &str = "v1";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server host, optionally with port (`localhost:3000`)
    #[serde(default)]
    pub host: Option<String>,
    /// API version segment
    #[serde(default)]
    pub version: Option<String>,
    /// Use https (default) or plain http
    #[serde(default)]
    pub use_ssl: Option<bool>,
    /// Last account used to log in
    #[serde(default)]
    pub email: Option<String>,
    /// Per-request timeout in seconds; none means no client-side timeout
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Config for an explicit server, bypassing the file on disk
    pub fn for_host(host: &str, use_ssl: bool) -> Self {
        Self {
            host: Some(host.to_string()),
            use_ssl: Some(use_ssl),
            ..Self::default()
        }
    }

    /// Config from a server URL such as `http://localhost:3000/api/v1`.
    /// A bare host is taken as https.
    pub fn from_server_url(server: &str) -> Result<Self> {
        let with_scheme = if server.contains("://") {
            server.to_string()
        } else {
            format!("https://{}", server)
        };
        let url = Url::parse(&with_scheme).with_context(|| format!("Invalid server URL: {}", server))?;

        let use_ssl = match url.scheme() {
            "https" => true,
            "http" => false,
            other => bail!("Unsupported scheme '{}' in {}", other, server),
        };
        let Some(host) = url.host_str() else {
            bail!("No host in server URL: {}", server);
        };
        let host = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        let mut segments = url.path_segments().into_iter().flatten().filter(|s| !s.is_empty());
        let version = match (segments.next(), segments.next()) {
            (Some("api"), Some(version)) => Some(version.to_string()),
            _ => None,
        };

        Ok(Self {
            host: Some(host),
            version,
            use_ssl: Some(use_ssl),
            ..Self::default()
        })
    }

    /// Copy of this config pointed at `server`; other settings are kept
    pub fn with_server(&self, server: &str) -> Result<Self> {
        let explicit = Self::from_server_url(server)?;
        Ok(Self {
            host: explicit.host,
            use_ssl: explicit.use_ssl,
            version: explicit.version.or_else(|| self.version.clone()),
            ..self.clone()
        })
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("speckle").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };

        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content).with_context(|| format!("Failed to write {:?}", path))?;

        Ok(())
    }

    /// Get effective host (config > SPECKLE_HOST > default)
    pub fn effective_host(&self) -> String {
        self.host
            .clone()
            .or_else(|| std::env::var("SPECKLE_HOST").ok().filter(|h| !h.is_empty()))
            .unwrap_or_else(|| DEFAULT_HOST.to_string())
    }

    pub fn effective_version(&self) -> String {
        self.version
            .clone()
            .unwrap_or_else(|| DEFAULT_VERSION.to_string())
    }

    pub fn scheme(&self) -> &'static str {
        if self.use_ssl.unwrap_or(true) {
            "https"
        } else {
            "http"
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// `{scheme}://{host}/api/{version}`
    pub fn server_url(&self) -> String {
        format!(
            "{}://{}/api/{}",
            self.scheme(),
            self.effective_host().trim_end_matches('/'),
            self.effective_version()
        )
    }

    /// Remember the last used account and save
    pub fn set_email(&mut self, email: &str) -> Result<()> {
        self.email = Some(email.to_string());
        self.save()
    }
}
