use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;

use crate::config::{StoreConfig, DEFAULT_STORE_BUCKET, DEFAULT_STORE_TABLE};
use crate::horse::{Horse, NewHorse};

use super::{RecordStore, StoreError};

/// Record store backed by a hosted Supabase project.
///
/// Records go through the PostgREST endpoint, photos through the storage
/// API:
/// ```text
/// GET  {url}/rest/v1/{table}?select=*           list horses
/// POST {url}/rest/v1/{table}                    insert, returns the row
/// POST {url}/storage/v1/object/{bucket}/{path}  upload a photo
///      {url}/storage/v1/object/public/{bucket}/{path}   public photo URL
/// ```
pub struct SupabaseStore {
    base_url: String,
    api_key: String,
    table: String,
    bucket: String,
    client: Client,
}

impl SupabaseStore {
    /// Creates a store for the given project URL and API key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            table: DEFAULT_STORE_TABLE.to_string(),
            bucket: DEFAULT_STORE_BUCKET.to_string(),
            client: Client::new(),
        }
    }

    /// Creates a store from the `[store]` config section.
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        let url = config
            .url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or(StoreError::MissingConfig("store.url (or PEDIGREE_STORE_URL)"))?;
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(StoreError::MissingConfig("store.api_key (or PEDIGREE_STORE_KEY)"))?;

        Ok(Self::new(url, api_key)
            .with_table(&config.table)
            .with_bucket(&config.bucket))
    }

    /// Sets the table holding horse records.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Sets the photo bucket.
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header("authorization", format!("Bearer {}", self.api_key))
    }

    /// Turn a non-success status into [`StoreError::Api`].
    async fn check(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(StoreError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl RecordStore for SupabaseStore {
    async fn fetch_all(&self) -> Result<Vec<Horse>, StoreError> {
        let url = self.table_url();
        tracing::debug!("Fetching horses from {}", url);

        let response = self
            .authorized(self.client.get(&url))
            .query(&[("select", "*")])
            .send()
            .await?;

        let rows: Vec<Value> = Self::check(response).await?.json().await?;
        let horses = Horse::decode_rows(rows);

        tracing::debug!("Fetched {} horses", horses.len());
        Ok(horses)
    }

    async fn insert(&self, horse: &NewHorse) -> Result<Horse, StoreError> {
        let response = self
            .authorized(self.client.post(self.table_url()))
            .header("content-type", "application/json")
            .header("prefer", "return=representation")
            .json(horse)
            .send()
            .await?;

        let rows: Vec<Value> = Self::check(response).await?.json().await?;
        let row = rows.into_iter().next().ok_or(StoreError::EmptyResponse)?;
        let created: Horse = serde_json::from_value(row)?;

        tracing::debug!("Inserted horse {} ({})", created.name, created.id);
        Ok(created)
    }

    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError> {
        let url = self.object_url(path);
        tracing::debug!("Uploading {} bytes to {}", bytes.len(), url);

        let response = self
            .authorized(self.client.post(&url))
            .header("content-type", content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    async fn public_url(&self, path: &str) -> Result<Option<String>, StoreError> {
        let path = path.trim_start_matches('/');
        if path.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, path
        )))
    }
}
