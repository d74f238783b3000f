use async_trait::async_trait;

use crate::search::{Itinerary, SearchQuery};

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Provider unavailable: {0}")]
    Unavailable(String),
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

/// External flight/package search source.
///
/// Implementations are expected to return itineraries sorted ascending by
/// price; callers take the first entry as the cheapest without re-sorting.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Itinerary>, ProviderError>;
}
