//! Configuration management.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `CITE_FINDER_*` environment variables (sections separated by `__`, e.g.
//! `CITE_FINDER_HTTP__TIMEOUT_SECONDS=10`).
//!
//! # Configuration File Format
//!
//! ```toml
//! [search]
//! default_source = "crossref"
//! exact = false
//! copy_to_clipboard = true
//!
//! [http]
//! timeout_seconds = 30
//! connect_timeout_seconds = 10
//! user_agent = "cite-finder/0.1.0"
//!
//! [endpoints]
//! pubmed = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils"
//! crossref = "https://api.crossref.org"
//! arxiv = "http://export.arxiv.org/api/query"
//! google_scholar = "https://scholar.google.co.jp/scholar"
//!
//! [logging]
//! level = "warn"
//! ```

mod file_config;

pub use file_config::{default_config_path, ConfigFileError};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::{SearchMode, SourceKind};

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "CITE_FINDER";

/// File name looked up in the config directories
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Search defaults
    #[serde(default)]
    pub search: SearchConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Base URLs of the literature databases
    #[serde(default)]
    pub endpoints: EndpointConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Search defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Source used when none is given on the command line
    #[serde(default = "default_source")]
    pub default_source: SourceKind,

    /// Rank by edit distance instead of taking the first result
    #[serde(default)]
    pub exact: bool,

    /// Copy each found citation to the clipboard
    #[serde(default = "default_true")]
    pub copy_to_clipboard: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_source: default_source(),
            exact: false,
            copy_to_clipboard: true,
        }
    }
}

impl SearchConfig {
    pub fn mode(&self) -> SearchMode {
        if self.exact {
            SearchMode::Exact
        } else {
            SearchMode::First
        }
    }
}

fn default_source() -> SourceKind {
    SourceKind::PubMed
}

fn default_true() -> bool {
    true
}

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Base URLs for each source.
///
/// Only the scheme/host/path prefix is configurable; query strings are fixed
/// by each source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_pubmed_url")]
    pub pubmed: String,

    #[serde(default = "default_crossref_url")]
    pub crossref: String,

    #[serde(default = "default_arxiv_url")]
    pub arxiv: String,

    #[serde(default = "default_google_scholar_url")]
    pub google_scholar: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            pubmed: default_pubmed_url(),
            crossref: default_crossref_url(),
            arxiv: default_arxiv_url(),
            google_scholar: default_google_scholar_url(),
        }
    }
}

impl EndpointConfig {
    /// Base URL for a source
    pub fn base_url(&self, source: SourceKind) -> &str {
        match source {
            SourceKind::PubMed => &self.pubmed,
            SourceKind::Crossref => &self.crossref,
            SourceKind::Arxiv => &self.arxiv,
            SourceKind::GoogleScholar => &self.google_scholar,
        }
    }
}

fn default_pubmed_url() -> String {
    "https://eutils.ncbi.nlm.nih.gov/entrez/eutils".to_string()
}

fn default_crossref_url() -> String {
    "https://api.crossref.org".to_string()
}

fn default_arxiv_url() -> String {
    "http://export.arxiv.org/api/query".to_string()
}

fn default_google_scholar_url() -> String {
    "https://scholar.google.co.jp/scholar".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Load configuration from an optional file plus environment overrides
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

/// Find a config file in the usual places.
///
/// Checked in order: `./cite-finder.toml`, then `<config dir>/cite-finder/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(concat!(env!("CARGO_PKG_NAME"), ".toml"));
    if local.is_file() {
        return Some(local);
    }

    default_config_path().filter(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.search.default_source, SourceKind::PubMed);
        assert!(!config.search.exact);
        assert!(config.search.copy_to_clipboard);
        assert_eq!(config.http.timeout_seconds, 30);
        assert_eq!(config.endpoints.crossref, "https://api.crossref.org");
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let toml_content = r#"
[search]
default_source = "arxiv"
exact = true

[http]
timeout_seconds = 5

[endpoints]
crossref = "http://localhost:8080"

[logging]
level = "debug"
"#;

        let mut file = File::create(&path).unwrap();
        file.write_all(toml_content.as_bytes()).unwrap();

        let config = load_config(Some(path.as_path())).unwrap();

        assert_eq!(config.search.default_source, SourceKind::Arxiv);
        assert_eq!(config.search.mode(), SearchMode::Exact);
        assert!(config.search.copy_to_clipboard);
        assert_eq!(config.http.timeout_seconds, 5);
        assert_eq!(config.http.connect_timeout_seconds, 10);
        assert_eq!(config.endpoints.crossref, "http://localhost:8080");
        assert_eq!(config.endpoints.pubmed, default_pubmed_url());
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[endpoints]\ngoogle_scholar = \"http://from-file/scholar\"\n",
        )
        .unwrap();

        std::env::set_var(
            "CITE_FINDER_ENDPOINTS__GOOGLE_SCHOLAR",
            "http://from-env/scholar",
        );
        let config = load_config(Some(path.as_path()));
        std::env::remove_var("CITE_FINDER_ENDPOINTS__GOOGLE_SCHOLAR");

        let config = config.unwrap();
        assert_eq!(config.endpoints.google_scholar, "http://from-env/scholar");
        assert_eq!(config.endpoints.pubmed, default_pubmed_url());
    }

    #[test]
    fn test_load_config_rejects_unknown_source() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search]\ndefault_source = \"semantic\"\n").unwrap();

        assert!(load_config(Some(path.as_path())).is_err());
    }

    #[test]
    fn test_load_config_nonexistent() {
        let path = PathBuf::from("/nonexistent/cite-finder/config.toml");
        assert!(load_config(Some(path.as_path())).is_err());
    }

    #[test]
    fn test_to_toml_round_trip() {
        let mut config = Config::default();
        config.search.default_source = SourceKind::GoogleScholar;
        config.http.timeout_seconds = 12;

        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("default_source = \"google_scholar\""));

        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_endpoint_lookup() {
        let endpoints = EndpointConfig::default();
        assert_eq!(
            endpoints.base_url(SourceKind::Arxiv),
            "http://export.arxiv.org/api/query"
        );
        assert_eq!(
            endpoints.base_url(SourceKind::GoogleScholar),
            "https://scholar.google.co.jp/scholar"
        );
    }
}
