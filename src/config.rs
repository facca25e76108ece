//! Configuration Management
//!
//! Endpoint and token come from (highest first): command line, environment,
//! config file, built-in default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:9101/v1";
pub const ENV_API_URL: &str = "RESCTL_API_URL";
pub const ENV_AUTH_TOKEN: &str = "RESCTL_AUTH_TOKEN";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Backend base URL
    #[serde(default)]
    pub api_url: Option<String>,
    /// Token used when a command is given none
    #[serde(default)]
    pub auth_token: Option<String>,
}

impl Config {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("resctl").join("config.yaml"))
    }

    /// Load `explicit` (which must exist) or the default file when present.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Get effective endpoint (CLI > env > config > default)
    pub fn effective_url(&self, cli: Option<&str>) -> String {
        pick([
            cli.map(str::to_string),
            env_non_empty(ENV_API_URL),
            self.api_url.clone(),
        ])
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    /// Get fallback token (env > config). A per-command `--token` wins over both.
    pub fn effective_token(&self) -> Option<String> {
        pick([env_non_empty(ENV_AUTH_TOKEN), self.auth_token.clone()])
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty())
}

fn pick<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_yaml_file() {
        let mut f = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(f, "api_url: https://backend.example/v1\nauth_token: abc").unwrap();
        let cfg = Config::load(Some(f.path())).unwrap();
        assert_eq!(cfg.api_url.as_deref(), Some("https://backend.example/v1"));
        assert_eq!(cfg.auth_token.as_deref(), Some("abc"));
    }

    #[test]
    fn empty_file_is_default() {
        let f = tempfile::NamedTempFile::new().unwrap();
        assert_eq!(Config::from_file(f.path()).unwrap(), Config::default());
    }

    #[test]
    fn explicit_missing_file_fails() {
        let err = Config::load(Some(Path::new("/no/such/resctl.yaml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn command_line_url_wins() {
        let cfg = Config {
            api_url: Some("http://from-config/v1".into()),
            auth_token: None,
        };
        assert_eq!(cfg.effective_url(Some("http://from-cli/v1")), "http://from-cli/v1");
    }

    #[test]
    fn pick_skips_blank_values() {
        assert_eq!(pick([None, Some(" ".into()), Some("x".into())]), Some("x".into()));
        assert_eq!(pick::<2>([None, None]), None);
    }
}
