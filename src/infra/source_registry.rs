use crate::app::ports::SourceRegistryPort;
use crate::config::SourceConfig;
use crate::error::Result;
use crate::infra::http_client::{endpoint, fetch_all_pages, get_json, page_items};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::instrument;

/// HTTP adapter for the source metadata registry
pub struct SourceRegistryClient {
    client: Client,
    config: SourceConfig,
    token: String,
}

impl SourceRegistryClient {
    pub fn new(client: Client, config: SourceConfig, token: impl Into<String>) -> Self {
        Self {
            client,
            config,
            token: token.into(),
        }
    }
}

#[async_trait]
impl SourceRegistryPort for SourceRegistryClient {
    #[instrument(skip(self))]
    async fn get_variable(&self, variable_id: &str) -> Result<Option<Value>> {
        let url = endpoint(&self.config.base_url, &["api", "DefinedVariables", variable_id])?;
        get_json(&self.client, url, &self.token).await
    }

    #[instrument(skip(self))]
    async fn get_code_list(&self, code_list_id: &str) -> Result<Option<Value>> {
        let url = endpoint(&self.config.base_url, &["api", "CodeLists", code_list_id])?;
        get_json(&self.client, url, &self.token).await
    }

    #[instrument(skip(self))]
    async fn get_code_list_entries(&self, code_list_id: &str) -> Result<Option<Vec<Value>>> {
        let url = endpoint(
            &self.config.base_url,
            &["api", "CodeLists", code_list_id, "codeListEntries"],
        )?;
        Ok(get_json(&self.client, url, &self.token).await?.map(page_items))
    }

    #[instrument(skip(self))]
    async fn list_variables(&self) -> Result<Vec<Value>> {
        let base_url = self.config.base_url.as_str();
        fetch_all_pages(
            &self.client,
            &self.token,
            self.config.page_size,
            "list defined variables",
            |page, page_size| {
                let mut url = endpoint(base_url, &["api", "DefinedVariables"])?;
                url.query_pairs_mut()
                    .append_pair("page", &page.to_string())
                    .append_pair("pageSize", &page_size.to_string());
                Ok(url)
            },
        )
        .await
    }
}
