use async_trait::async_trait;

use crate::deal::Deal;
use crate::settings::Settings;

pub type RepositoryError = Box<dyn std::error::Error + Send + Sync>;

/// Persistence for the deal collection. Writes replace the whole collection.
#[async_trait]
pub trait DealRepository: Send + Sync {
    /// `Ok(None)` when nothing has been stored yet.
    async fn load_deals(&self) -> Result<Option<Vec<Deal>>, RepositoryError>;

    async fn save_deals(&self, deals: &[Deal]) -> Result<(), RepositoryError>;
}

/// Persistence for discovery settings.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn load_settings(&self) -> Result<Option<Settings>, RepositoryError>;

    async fn save_settings(&self, settings: &Settings) -> Result<(), RepositoryError>;
}
