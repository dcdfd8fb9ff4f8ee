use crate::{MetadataMatch, MetadataProvider, ProviderError};
use bytes::Bytes;

/// Offline provider: nothing is ever found.
#[derive(Debug, Default)]
pub struct NoopProvider;

#[async_trait::async_trait]
impl MetadataProvider for NoopProvider {
    async fn search(&self, _title: &str) -> Result<Option<MetadataMatch>, ProviderError> {
        Ok(None)
    }

    async fn fetch_poster(&self, _poster_id: &str) -> Result<Bytes, ProviderError> {
        Err(ProviderError::NotImplemented)
    }
}
