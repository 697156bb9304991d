//! Client configuration loaded from `studio.json`.

use crate::error::ConfigError;
use crate::session::Session;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File names searched for by [`StudioConfig::discover`], in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["studio.json", ".studio.json"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudioConfig {
    /// Base URL of the studio, e.g. `http://studio.local:8080`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub studio_address: Option<String>,
    /// Session / environment identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psdevslnsys: Option<String>,
    /// Whole-request timeout in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Connect timeout in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout_ms: Option<u64>,
}

impl StudioConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Find a config file by walking up from `start`.
    pub fn find_from(start: &Path) -> Option<PathBuf> {
        let mut dir = start.to_path_buf();
        loop {
            for name in CONFIG_FILE_NAMES {
                let candidate = dir.join(name);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    /// Load the nearest config file above the current directory, if any.
    pub fn discover() -> Result<Option<Self>, ConfigError> {
        let Ok(cwd) = std::env::current_dir() else {
            return Ok(None);
        };
        match Self::find_from(&cwd) {
            Some(path) => {
                tracing::debug!("Using config at {}", path.display());
                Self::load(&path).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Overlay `other` on top of `self`; set fields in `other` win.
    pub fn merge(self, other: StudioConfig) -> StudioConfig {
        StudioConfig {
            studio_address: other.studio_address.or(self.studio_address),
            psdevslnsys: other.psdevslnsys.or(self.psdevslnsys),
            timeout_ms: other.timeout_ms.or(self.timeout_ms),
            connect_timeout_ms: other.connect_timeout_ms.or(self.connect_timeout_ms),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }

    /// Build the session descriptor; address and identifier must be set and
    /// non-blank.
    pub fn session(&self) -> Result<Session, ConfigError> {
        let address =
            non_blank(&self.studio_address).ok_or(ConfigError::Missing("studio_address"))?;
        let id = non_blank(&self.psdevslnsys).ok_or(ConfigError::Missing("psdevslnsys"))?;
        Ok(Session::new(address, id))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
