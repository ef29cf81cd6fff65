use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ImportError;
use crate::http::ProviderClient;
use crate::identifiers::{Identifier, IdentifierKind};
use crate::mapper::{ArxivMapper, DataMapper, DoiMapper, IsbnMapper};
use crate::sources::DataSource;
use crate::status::{ImportStatus, StatusMessage};
use crate::task::TaskResult;
use crate::types::DocumentType;

/// A provider reached through the INSPIRE lookup endpoints: one GET to
/// `<url_template><identifier>`, replying `{"status": .., "query": ..}`.
pub struct HttpDataSource {
    id: String,
    display_name: String,
    kind: IdentifierKind,
    url_template: String,
    mapper: Arc<dyn DataMapper>,
    client: ProviderClient,
}

impl HttpDataSource {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        kind: IdentifierKind,
        url_template: impl Into<String>,
        mapper: Arc<dyn DataMapper>,
        client: ProviderClient,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            kind,
            url_template: url_template.into(),
            mapper,
            client,
        }
    }

    pub fn doi(url_template: impl Into<String>, client: ProviderClient) -> Self {
        Self::new("doi", "DOI", IdentifierKind::Doi, url_template, Arc::new(DoiMapper), client)
    }

    pub fn arxiv(url_template: impl Into<String>, client: ProviderClient) -> Self {
        Self::new(
            "arxiv",
            "arXiv",
            IdentifierKind::Arxiv,
            url_template,
            Arc::new(ArxivMapper),
            client,
        )
    }

    pub fn isbn(url_template: impl Into<String>, client: ProviderClient) -> Self {
        Self::new("isbn", "ISBN", IdentifierKind::Isbn, url_template, Arc::new(IsbnMapper), client)
    }

    pub fn url_for(&self, identifier: &Identifier) -> String {
        format!("{}{}", self.url_template, urlencoding::encode(&identifier.value))
    }

    fn failure(&self, message: StatusMessage) -> TaskResult {
        TaskResult::failure(self.id.clone(), message)
    }

    /// Turns a decoded provider reply into a task result.
    fn settle(&self, reply: &Value, identifier: &Identifier, document_type: DocumentType) -> TaskResult {
        let id = identifier.value.as_str();
        let status = ImportStatus::from_json(&reply["status"]);
        if status != ImportStatus::Success {
            debug!(source = %self.id, identifier = id, ?status, "lookup did not succeed");
            return self.failure(StatusMessage::for_status(status, &self.display_name, id));
        }

        let mapping = match reply.get("query") {
            Some(payload) if !payload.is_null() => self.mapper.map(payload, document_type),
            _ => Default::default(),
        };
        if mapping.is_empty() {
            return self.failure(StatusMessage::no_usable_metadata(&self.display_name, id));
        }

        TaskResult::success(
            self.id.clone(),
            mapping,
            StatusMessage::for_status(ImportStatus::Success, &self.display_name, id),
        )
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn kind(&self) -> IdentifierKind {
        self.kind
    }

    async fn import_data(
        &self,
        identifier: &Identifier,
        document_type: DocumentType,
    ) -> TaskResult {
        if let Err(err) = identifier.validate() {
            debug!(source = %self.id, %err, "skipping request for malformed identifier");
            return self.failure(StatusMessage::for_status(
                ImportStatus::Malformed,
                &self.display_name,
                &identifier.value,
            ));
        }

        let url = self.url_for(identifier);
        match self.client.get_json(&url).await {
            Ok(reply) => self.settle(&reply, identifier, document_type),
            Err(ImportError::Api { status, .. }) => {
                warn!(source = %self.id, status, "provider returned an error status");
                self.failure(StatusMessage::for_status(
                    ImportStatus::Http(status),
                    &self.display_name,
                    &identifier.value,
                ))
            }
            Err(err) => {
                warn!(source = %self.id, %err, "provider request failed");
                self.failure(StatusMessage::unreachable(&self.display_name, err))
            }
        }
    }
}
