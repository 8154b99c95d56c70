//! Configuration Management
//!
//! Handles persistent configuration storage for tfe-runtask.

use crate::tfe::auth;
use crate::tfe::client::DEFAULT_HOSTNAME;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// TFE hostname or address
    #[serde(default)]
    pub hostname: Option<String>,
    /// API token; prefer the Terraform CLI credentials file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Accept invalid TLS certificates
    #[serde(default)]
    pub ssl_skip_verify: Option<bool>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tfe-runtask").join("config.json"))
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
                tracing::warn!("Ignoring malformed config {:?}: {}", path, e);
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

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content).with_context(|| format!("Failed to write {:?}", path))?;

        Ok(())
    }

    /// Get effective hostname (CLI/env > config > default)
    pub fn effective_hostname(&self) -> String {
        self.hostname
            .clone()
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| DEFAULT_HOSTNAME.to_string())
    }

    /// Get effective token (CLI/env > config > Terraform CLI credentials)
    pub fn effective_token(&self) -> Option<String> {
        self.token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| auth::get_default_token(&self.effective_hostname()))
    }

    pub fn effective_ssl_skip_verify(&self) -> bool {
        self.ssl_skip_verify.unwrap_or(false)
    }

    /// Set hostname and save
    pub fn set_hostname(&mut self, hostname: &str) -> Result<()> {
        self.hostname = Some(hostname.to_string());
        self.save()
    }

    /// Set TLS verification and save
    pub fn set_ssl_skip_verify(&mut self, skip: bool) -> Result<()> {
        self.ssl_skip_verify = Some(skip);
        self.save()
    }
}
