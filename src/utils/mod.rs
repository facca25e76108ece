//! Utilities: logging setup (dynamic level), document key escaping, file decoding.
//!
//! Key items:
//!   init_logging / derive_level
//!   escape::{escape_chars, unescape_chars}
//!   read_document

pub mod escape;

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Logging helpers.
pub mod logging {
    use super::*;

    /// Map `-v` / `-q` flags onto a level filter.
    pub fn derive_level(verbose: u8, quiet: bool) -> LevelFilter {
        if quiet {
            return LevelFilter::ERROR;
        }
        match verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    /// Install the global subscriber. Output goes to stderr so tables and JSON
    /// on stdout stay machine readable. `RUST_LOG` takes precedence when set.
    pub fn init_logging(level: LevelFilter) {
        let filter = EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy();

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

pub use logging::{derive_level, init_logging};

/// Read and decode a JSON or YAML document. The file is fully read and closed
/// before this returns. YAML is selected by a `.yaml` / `.yml` extension.
pub fn read_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

    if is_yaml {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML: {}", path.display()))
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn derive_level_flags() {
        assert_eq!(derive_level(0, true), LevelFilter::ERROR);
        assert_eq!(derive_level(0, false), LevelFilter::WARN);
        assert_eq!(derive_level(1, false), LevelFilter::INFO);
        assert_eq!(derive_level(2, false), LevelFilter::DEBUG);
        assert_eq!(derive_level(9, false), LevelFilter::TRACE);
    }

    #[test]
    fn read_document_json_and_yaml() {
        let mut json_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(json_file, r#"{{"name": "x", "n": 1}}"#).unwrap();
        let doc = read_document(json_file.path()).unwrap();
        assert_eq!(doc["name"], "x");

        let mut yaml_file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(yaml_file, "name: y\ntags:\n  - a").unwrap();
        let doc = read_document(yaml_file.path()).unwrap();
        assert_eq!(doc["name"], "y");
        assert_eq!(doc["tags"][0], "a");
    }

    #[test]
    fn read_document_reports_bad_json() {
        let mut f = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(f, "{{not json").unwrap();
        let err = read_document(f.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }
}
