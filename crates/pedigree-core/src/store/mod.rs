mod error;
mod supabase;

pub use error::StoreError;
pub use supabase::SupabaseStore;

use std::sync::Arc;

use async_trait::async_trait;

use crate::horse::{Horse, NewHorse};

/// The external persistence boundary: a table of horse records plus an
/// object store for photos.
///
/// Every method is a single network round trip. Nothing is cached or
/// retried here; callers decide how to surface a failure.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Read every horse record.
    async fn fetch_all(&self) -> Result<Vec<Horse>, StoreError>;

    /// Insert a record and return it as stored, including its new id.
    async fn insert(&self, horse: &NewHorse) -> Result<Horse, StoreError>;

    /// Upload a blob to `path` in the photo bucket.
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str)
        -> Result<(), StoreError>;

    /// Public URL for an uploaded blob, if the store can provide one.
    async fn public_url(&self, path: &str) -> Result<Option<String>, StoreError>;
}

/// Shared stores (e.g. one per server) delegate to the inner store.
#[async_trait]
impl<S: RecordStore + ?Sized> RecordStore for Arc<S> {
    async fn fetch_all(&self) -> Result<Vec<Horse>, StoreError> {
        (**self).fetch_all().await
    }

    async fn insert(&self, horse: &NewHorse) -> Result<Horse, StoreError> {
        (**self).insert(horse).await
    }

    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError> {
        (**self).upload(path, bytes, content_type).await
    }

    async fn public_url(&self, path: &str) -> Result<Option<String>, StoreError> {
        (**self).public_url(path).await
    }
}
