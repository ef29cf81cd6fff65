use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ImportError, Result};
use crate::http::DEFAULT_USER_AGENT;
use crate::types::FieldId;

/// Root configuration, loaded from `~/.config/inspire-import/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ImportConfig {
    pub server: ServerConfig,
    pub sources: SourcesConfig,
    /// Field id → ordered source labels. Replaces the built-in row for each listed field.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub priority: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SourcesConfig {
    pub doi: SourceConfig,
    pub arxiv: SourceConfig,
    pub isbn: SourceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub enabled: bool,
    /// Endpoint path; `/<label>/search` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Query parameter carrying the identifier; the source label when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
}

// ─── Defaults ────────────────────────────────────────────────────────────────

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://inspirehep.net".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
            param: None,
        }
    }
}

impl SourceConfig {
    /// Request URL prefix; the encoded identifier is appended to it.
    pub fn url_template(&self, base_url: &str, label: &str) -> String {
        let path = self
            .path
            .clone()
            .unwrap_or_else(|| format!("/{label}/search"));
        let param = self.param.as_deref().unwrap_or(label);
        format!(
            "{}/{}?{}=",
            base_url.trim_end_matches('/'),
            path.trim_start_matches('/'),
            param
        )
    }
}

// ─── Load / Save ─────────────────────────────────────────────────────────────

impl ImportConfig {
    /// Standard config file path, overridable with `INSPIRE_IMPORT_CONFIG`.
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("INSPIRE_IMPORT_CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("inspire-import")
            .join("config.toml")
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load from `path`, falling back to defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let base = self.server.base_url.trim();
        if base.is_empty() {
            return Err(ImportError::Config("server.base_url is empty".to_string()));
        }
        reqwest::Url::parse(base)
            .map_err(|e| ImportError::Config(format!("server.base_url: {e}")))?;
        if self.server.request_timeout_secs == 0 {
            return Err(ImportError::Config(
                "server.request_timeout_secs must be positive".to_string(),
            ));
        }
        for field in self.priority.keys() {
            field.parse::<FieldId>()?;
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_valid() {
        let cfg = ImportConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.server.request_timeout_secs, 30);
        assert!(cfg.sources.doi.enabled);
    }

    #[test]
    fn url_template_joins_cleanly() {
        let cfg = ImportConfig::default();
        assert_eq!(
            cfg.sources.arxiv.url_template("https://inspirehep.net/", "arxiv"),
            "https://inspirehep.net/arxiv/search?arxiv="
        );

        let custom = SourceConfig {
            enabled: true,
            path: Some("api/lookup/doi".to_string()),
            param: Some("q".to_string()),
        };
        assert_eq!(
            custom.url_template("http://localhost:5000", "doi"),
            "http://localhost:5000/api/lookup/doi?q="
        );
    }

    #[test]
    fn toml_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = ImportConfig::default();
        cfg.sources.isbn.enabled = false;
        cfg.priority
            .insert("title".to_string(), vec!["arxiv".to_string(), "doi".to_string()]);
        cfg.save_to(&path).unwrap();

        let loaded = ImportConfig::load_from(&path).unwrap();
        assert!(!loaded.sources.isbn.enabled);
        assert_eq!(loaded.priority["title"], vec!["arxiv", "doi"]);
        assert_eq!(loaded.server.base_url, cfg.server.base_url);
    }

    #[test]
    fn partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nbase_url = \"http://localhost:5000\"\n").unwrap();

        let loaded = ImportConfig::load_from(&path).unwrap();
        assert_eq!(loaded.server.base_url, "http://localhost:5000");
        assert_eq!(loaded.server.request_timeout_secs, 30);
        assert!(loaded.sources.doi.param.is_none());
    }

    #[test]
    fn rejects_unknown_priority_field() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[priority]\ncolour = [\"doi\"]\n").unwrap();
        assert!(matches!(
            ImportConfig::load_from(&path),
            Err(ImportError::UnknownField(_))
        ));
    }

    #[test]
    fn rejects_zero_timeout() {
        let mut cfg = ImportConfig::default();
        cfg.server.request_timeout_secs = 0;
        assert!(matches!(cfg.validate(), Err(ImportError::Config(_))));
    }

    #[test]
    fn load_nonexistent_returns_default() {
        let cfg =
            ImportConfig::load_from(Path::new("/tmp/nonexistent_inspire_import.toml")).unwrap();
        assert_eq!(cfg.server.base_url, "https://inspirehep.net");
    }
}
