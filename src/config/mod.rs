//! Configuration system (layered: defaults > config file > env > code).

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConciergeError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_CHAT_AGENT_ID: &str = "699ff0b6510416af3e2a7ce6";
pub const DEFAULT_INQUIRY_AGENT_ID: &str = "699ff0d0509dca78ad07eef6";
pub const DEFAULT_KNOWLEDGE_BASE_ID: &str = "699ff0a900c2d274880efcbb";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const CONFIG_FILE_NAME: &str = "config.toml";

/// Endpoint and identifier settings shared by every component.
///
/// Identifiers are plain configuration values injected into each component
/// at construction; nothing here is process-global.
#[derive(Clone, PartialEq, Eq)]
pub struct ConciergeConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub chat_agent_id: String,
    pub inquiry_agent_id: String,
    pub knowledge_base_id: String,
    pub timeout: Duration,
}

impl fmt::Debug for ConciergeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConciergeConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| ".."))
            .field("chat_agent_id", &self.chat_agent_id)
            .field("inquiry_agent_id", &self.inquiry_agent_id)
            .field("knowledge_base_id", &self.knowledge_base_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for ConciergeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            chat_agent_id: DEFAULT_CHAT_AGENT_ID.to_string(),
            inquiry_agent_id: DEFAULT_INQUIRY_AGENT_ID.to_string(),
            knowledge_base_id: DEFAULT_KNOWLEDGE_BASE_ID.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// On-disk shape of `config.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    base_url: Option<String>,
    api_key: Option<String>,
    chat_agent_id: Option<String>,
    inquiry_agent_id: Option<String>,
    knowledge_base_id: Option<String>,
    timeout_secs: Option<u64>,
}

impl ConciergeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the full layered configuration: defaults, then the config file
    /// at [`default_config_path`] if it exists, then the environment.
    pub fn load() -> Result<Self, ConciergeError> {
        let mut config = Self::default();
        let path = default_config_path();
        if path.is_file() {
            config = config.merge_file(&path)?;
        }
        Ok(config.merge_env())
    }

    /// Defaults overlaid with the environment only.
    pub fn from_env() -> Self {
        Self::default().merge_env()
    }

    /// Defaults overlaid with a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConciergeError> {
        Self::default().merge_file(path)
    }

    /// Overlay values from a TOML file.
    pub fn merge_file(self, path: &Path) -> Result<Self, ConciergeError> {
        let raw = std::fs::read_to_string(path)?;
        self.merge_toml(&raw).map_err(|e| match e {
            ConciergeError::Configuration(msg) => {
                ConciergeError::Configuration(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Overlay values from TOML text.
    pub fn merge_toml(mut self, raw: &str) -> Result<Self, ConciergeError> {
        let file: ConfigFile =
            toml::from_str(raw).map_err(|e| ConciergeError::Configuration(e.to_string()))?;

        if let Some(v) = file.base_url {
            self.base_url = v;
        }
        if let Some(v) = file.api_key {
            self.api_key = Some(v);
        }
        if let Some(v) = file.chat_agent_id {
            self.chat_agent_id = v;
        }
        if let Some(v) = file.inquiry_agent_id {
            self.inquiry_agent_id = v;
        }
        if let Some(v) = file.knowledge_base_id {
            self.knowledge_base_id = v;
        }
        if let Some(secs) = file.timeout_secs {
            self.timeout = Duration::from_secs(secs);
        }
        Ok(self)
    }

    /// Overlay values from environment variables (`CONCIERGE_*`).
    pub fn merge_env(mut self) -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error

        if let Ok(v) = std::env::var("CONCIERGE_BASE_URL") {
            self.base_url = v;
        }
        if let Ok(v) = std::env::var("CONCIERGE_API_KEY") {
            self.api_key = Some(v);
        }
        if let Ok(v) = std::env::var("CONCIERGE_CHAT_AGENT_ID") {
            self.chat_agent_id = v;
        }
        if let Ok(v) = std::env::var("CONCIERGE_INQUIRY_AGENT_ID") {
            self.inquiry_agent_id = v;
        }
        if let Ok(v) = std::env::var("CONCIERGE_KNOWLEDGE_BASE_ID") {
            self.knowledge_base_id = v;
        }
        match std::env::var("CONCIERGE_TIMEOUT_SECS").map(|v| v.trim().parse::<u64>()) {
            Ok(Ok(secs)) => self.timeout = Duration::from_secs(secs),
            Ok(Err(_)) => tracing::warn!("ignoring unparsable CONCIERGE_TIMEOUT_SECS"),
            Err(_) => {}
        }
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_chat_agent_id(mut self, id: impl Into<String>) -> Self {
        self.chat_agent_id = id.into();
        self
    }

    pub fn with_inquiry_agent_id(mut self, id: impl Into<String>) -> Self {
        self.inquiry_agent_id = id.into();
        self
    }

    pub fn with_knowledge_base_id(mut self, id: impl Into<String>) -> Self {
        self.knowledge_base_id = id.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reject configurations that could never reach a remote service.
    pub fn validate(&self) -> Result<(), ConciergeError> {
        let required = [
            ("base_url", &self.base_url),
            ("chat_agent_id", &self.chat_agent_id),
            ("inquiry_agent_id", &self.inquiry_agent_id),
            ("knowledge_base_id", &self.knowledge_base_id),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConciergeError::Configuration(format!("{name} cannot be empty")));
            }
        }
        if self.timeout.is_zero() {
            return Err(ConciergeError::Configuration(
                "timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// `~/.concierge/config.toml`, or `.concierge/config.toml` without a home dir.
pub fn default_config_path() -> PathBuf {
    default_concierge_dir().join(CONFIG_FILE_NAME)
}

fn default_concierge_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".concierge"))
        .unwrap_or_else(|| PathBuf::from(".concierge"))
}
