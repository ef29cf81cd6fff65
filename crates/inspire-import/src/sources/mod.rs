pub mod provider;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::ImportConfig;
use crate::error::Result;
use crate::http::ProviderClient;
use crate::identifiers::{Identifier, IdentifierKind};
use crate::task::TaskResult;
use crate::types::DocumentType;

pub use provider::HttpDataSource;

/// Adapter to one external metadata provider.
///
/// `import_data` never fails: every outcome, including transport errors, is
/// reported as a [`TaskResult`] carrying a status message.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Unique label, also used as the key in the priority table.
    fn id(&self) -> &str;

    fn display_name(&self) -> &str;

    /// The identifier scheme this source looks up.
    fn kind(&self) -> IdentifierKind;

    async fn import_data(&self, identifier: &Identifier, document_type: DocumentType)
    -> TaskResult;
}

/// Builds the enabled sources, in doi, arxiv, isbn order, sharing one HTTP client.
pub fn from_config(config: &ImportConfig) -> Result<Vec<Arc<dyn DataSource>>> {
    let client = ProviderClient::new(config.request_timeout(), &config.server.user_agent)?;
    let base = config.server.base_url.as_str();

    let mut sources: Vec<Arc<dyn DataSource>> = Vec::new();
    if config.sources.doi.enabled {
        sources.push(Arc::new(HttpDataSource::doi(
            config.sources.doi.url_template(base, "doi"),
            client.clone(),
        )));
    }
    if config.sources.arxiv.enabled {
        sources.push(Arc::new(HttpDataSource::arxiv(
            config.sources.arxiv.url_template(base, "arxiv"),
            client.clone(),
        )));
    }
    if config.sources.isbn.enabled {
        sources.push(Arc::new(HttpDataSource::isbn(
            config.sources.isbn.url_template(base, "isbn"),
            client,
        )));
    }
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_respects_enabled_flags() {
        let mut config = ImportConfig::default();
        config.sources.arxiv.enabled = false;

        let sources = from_config(&config).unwrap();
        let ids: Vec<&str> = sources.iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["doi", "isbn"]);
    }
}
