use crate::app::ports::{ApiResponse, DestinationRegistryPort};
use crate::config::DestinationConfig;
use crate::constants::{ENTRY_IMPORT_FILE_NAME, ENTRY_IMPORT_PART_NAME, JSON_MIME};
use crate::domain::{ConceptPayload, EntryListPayload, Environment, PersonPayload};
use crate::error::Result;
use crate::infra::http_client::{endpoint, fetch_all_pages, get_json, into_api_response};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

/// HTTP adapter for the destination concept catalog
pub struct DestinationRegistryClient {
    client: Client,
    config: DestinationConfig,
    token: String,
}

impl DestinationRegistryClient {
    pub fn new(client: Client, config: DestinationConfig, token: impl Into<String>) -> Self {
        Self {
            client,
            config,
            token: token.into(),
        }
    }

    fn url(&self, env: Environment, segments: &[&str]) -> Result<Url> {
        endpoint(self.config.base_url(env)?, segments)
    }

    async fn post_json<T: Serialize + Sync>(&self, url: Url, payload: &T) -> Result<ApiResponse> {
        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, &self.token)
            .json(payload)
            .send()
            .await?;
        into_api_response(response).await
    }

    async fn put(&self, url: Url) -> Result<ApiResponse> {
        let response = self
            .client
            .put(url)
            .header(AUTHORIZATION, &self.token)
            .send()
            .await?;
        into_api_response(response).await
    }
}

#[async_trait]
impl DestinationRegistryPort for DestinationRegistryClient {
    #[instrument(skip(self))]
    async fn get_person(&self, email: &str, env: Environment) -> Result<Option<Value>> {
        let url = self.url(env, &["api", "persons", email])?;
        get_json(&self.client, url, &self.token).await
    }

    #[instrument(skip(self, payload))]
    async fn create_person(&self, payload: &PersonPayload, env: Environment) -> Result<ApiResponse> {
        let url = self.url(env, &["api", "persons"])?;
        self.post_json(url, payload).await
    }

    #[instrument(skip(self, payload))]
    async fn create_concept(&self, payload: &ConceptPayload, env: Environment) -> Result<ApiResponse> {
        let url = self.url(env, &["api", "concepts"])?;
        self.post_json(url, payload).await
    }

    /// Entries go up as a JSON file attachment rather than a JSON body
    #[instrument(skip(self, payload))]
    async fn import_code_list_entries(
        &self,
        concept_id: &str,
        payload: &EntryListPayload,
        env: Environment,
    ) -> Result<ApiResponse> {
        let url = self.url(
            env,
            &["api", "concepts", concept_id, "codelist-entries", "imports", "json"],
        )?;
        let part = Part::bytes(serde_json::to_vec(payload)?)
            .file_name(ENTRY_IMPORT_FILE_NAME)
            .mime_str(JSON_MIME)?;
        let form = Form::new().part(ENTRY_IMPORT_PART_NAME, part);
        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, &self.token)
            .multipart(form)
            .send()
            .await?;
        into_api_response(response).await
    }

    #[instrument(skip(self))]
    async fn set_registration_status(&self, concept_id: &str, env: Environment) -> Result<ApiResponse> {
        let mut url = self.url(env, &["api", "concepts", concept_id, "registration-status"])?;
        url.query_pairs_mut()
            .append_pair("status", &self.config.registration_status);
        self.put(url).await
    }

    #[instrument(skip(self))]
    async fn set_publication_level(&self, concept_id: &str, env: Environment) -> Result<ApiResponse> {
        let mut url = self.url(env, &["api", "concepts", concept_id, "publication-level"])?;
        url.query_pairs_mut()
            .append_pair("level", &self.config.publication_level);
        self.put(url).await
    }

    #[instrument(skip(self))]
    async fn list_concepts(&self) -> Result<Vec<Value>> {
        let base_url = self.config.export_base_url.as_str();
        let publisher = self.config.export_publisher_identifier.as_str();
        fetch_all_pages(
            &self.client,
            &self.token,
            self.config.page_size,
            "list concepts",
            |page, page_size| {
                let mut url = endpoint(base_url, &["api", "public", "v1", "concepts"])?;
                url.query_pairs_mut()
                    .append_pair("publisherIdentifier", publisher)
                    .append_pair("page", &page.to_string())
                    .append_pair("pageSize", &page_size.to_string());
                Ok(url)
            },
        )
        .await
    }
}
