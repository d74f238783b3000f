pub mod app_config;
pub mod json_file;
pub mod deal_repo;
pub mod settings_repo;

pub use json_file::{JsonFile, StoreError};
pub use deal_repo::{JsonDealRepository, MemoryDealRepository};
pub use settings_repo::{JsonSettingsRepository, MemorySettingsRepository};
