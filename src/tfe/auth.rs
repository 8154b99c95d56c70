//! TFE Authentication
//!
//! Resolves API tokens the way the Terraform CLI stores them: per-host
//! `TF_TOKEN_*` environment variables and the `credentials.tfrc.json` file
//! written by `terraform login`.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Credentials file written by `terraform login`
const CREDENTIALS_FILE: &str = "credentials.tfrc.json";

#[derive(Debug, Deserialize)]
struct CredentialsFile {
    #[serde(default)]
    credentials: HashMap<String, HostCredentials>,
}

#[derive(Debug, Deserialize)]
struct HostCredentials {
    token: String,
}

/// Strip scheme and path from a configured hostname, keeping any port
pub fn credentials_key(hostname: &str) -> String {
    let without_scheme = hostname
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(hostname);
    without_scheme
        .split('/')
        .next()
        .unwrap_or(without_scheme)
        .to_ascii_lowercase()
}

/// Name of the per-host token variable, e.g. `TF_TOKEN_app_terraform_io`
///
/// Dots become underscores and dashes become double underscores. Hosts with
/// a port have no variable form.
pub fn host_token_env_var(hostname: &str) -> Option<String> {
    let host = credentials_key(hostname);
    if host.is_empty() || host.contains(':') {
        return None;
    }
    Some(format!(
        "TF_TOKEN_{}",
        host.replace('-', "__").replace('.', "_")
    ))
}

/// Get the Terraform CLI configuration directory
pub fn get_terraform_config_dir() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("TF_CLI_CONFIG_DIR") {
        return Some(PathBuf::from(path));
    }

    if cfg!(windows) {
        dirs::config_dir().map(|p| p.join("terraform.d"))
    } else {
        dirs::home_dir().map(|p| p.join(".terraform.d"))
    }
}

/// Read the token for `hostname` from a credentials file
fn token_from_credentials_file(path: &Path, hostname: &str) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    let file: CredentialsFile = match serde_json::from_str(&content) {
        Ok(file) => file,
        Err(e) => {
            tracing::warn!("Ignoring malformed credentials file {:?}: {}", path, e);
            return None;
        }
    };

    let key = credentials_key(hostname);
    file.credentials
        .into_iter()
        .find(|(host, _)| host.to_ascii_lowercase() == key)
        .map(|(_, creds)| creds.token)
        .filter(|token| !token.is_empty())
}

/// Find a token for `hostname` from the Terraform CLI's stores
pub fn get_default_token(hostname: &str) -> Option<String> {
    if let Some(var) = host_token_env_var(hostname) {
        if let Ok(token) = std::env::var(&var) {
            if !token.is_empty() {
                tracing::debug!("Using token from {}", var);
                return Some(token);
            }
        }
    }

    let path = get_terraform_config_dir()?.join(CREDENTIALS_FILE);
    let token = token_from_credentials_file(&path, hostname);
    if token.is_some() {
        tracing::debug!("Using token from {:?}", path);
    }
    token
}
