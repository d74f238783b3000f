use async_trait::async_trait;
use farewatch_core::{RepositoryError, Settings, SettingsRepository};
use std::path::PathBuf;
use tokio::sync::Mutex;

use crate::json_file::JsonFile;

pub struct JsonSettingsRepository {
    file: JsonFile,
}

impl JsonSettingsRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { file: JsonFile::new(path) }
    }
}

#[async_trait]
impl SettingsRepository for JsonSettingsRepository {
    async fn load_settings(&self) -> Result<Option<Settings>, RepositoryError> {
        Ok(self.file.read::<Settings>().await?)
    }

    async fn save_settings(&self, settings: &Settings) -> Result<(), RepositoryError> {
        self.file.write(settings).await?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemorySettingsRepository {
    settings: Mutex<Option<Settings>>,
}

impl MemorySettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self { settings: Mutex::new(Some(settings)) }
    }

    pub async fn stored(&self) -> Option<Settings> {
        self.settings.lock().await.clone()
    }
}

#[async_trait]
impl SettingsRepository for MemorySettingsRepository {
    async fn load_settings(&self) -> Result<Option<Settings>, RepositoryError> {
        Ok(self.settings.lock().await.clone())
    }

    async fn save_settings(&self, settings: &Settings) -> Result<(), RepositoryError> {
        *self.settings.lock().await = Some(settings.clone());
        Ok(())
    }
}
