use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub deals: DealsConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub deals_file: PathBuf,
    pub settings_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            deals_file: PathBuf::from("data/discovered-deals.json"),
            settings_file: PathBuf::from("data/discovery-settings.json"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DiscoveryConfig {
    /// Pause between two searches.
    #[serde(default = "default_search_interval_ms")]
    pub search_interval_ms: u64,
    /// Pause after a failed search.
    #[serde(default = "default_error_backoff_ms")]
    pub error_backoff_ms: u64,
    #[serde(default)]
    pub autostart: bool,
    #[serde(default = "default_progress_log_secs")]
    pub progress_log_secs: u64,
}

fn default_search_interval_ms() -> u64 { 10_000 }
fn default_error_backoff_ms() -> u64 { 5_000 }
fn default_progress_log_secs() -> u64 { 60 }

impl DiscoveryConfig {
    pub fn search_interval(&self) -> Duration {
        Duration::from_millis(self.search_interval_ms)
    }

    pub fn error_backoff(&self) -> Duration {
        Duration::from_millis(self.error_backoff_ms)
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            search_interval_ms: default_search_interval_ms(),
            error_backoff_ms: default_error_backoff_ms(),
            autostart: false,
            progress_log_secs: default_progress_log_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DealsConfig {
    /// Most deals kept; oldest are evicted first.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Two deals on the same route and date closer than this (GBP) are duplicates.
    #[serde(default = "default_tolerance")]
    pub duplicate_price_tolerance: f64,
}

fn default_capacity() -> usize { 100 }
fn default_tolerance() -> f64 { 50.0 }

impl Default for DealsConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            duplicate_price_tolerance: default_tolerance(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScoringConfig {
    /// Savings above this share of the budget flag a great deal.
    #[serde(default = "default_great_deal_ratio")]
    pub great_deal_ratio: f64,
    /// Hand-tuned preference bonus per destination display name.
    #[serde(default = "default_destination_bonus")]
    pub destination_bonus: HashMap<String, f64>,
}

fn default_great_deal_ratio() -> f64 { 0.1 }

fn default_destination_bonus() -> HashMap<String, f64> {
    [
        ("Cyprus", 2.0),
        ("Tenerife", 1.5),
        ("Gran Canaria", 1.5),
        ("Lanzarote", 1.5),
        ("Greece Crete", 1.5),
        ("Turkey Antalya", 1.0),
        ("Turkey Istanbul", 1.0),
        ("Malta", 1.0),
    ]
    .into_iter()
    .map(|(name, bonus)| (name.to_string(), bonus))
    .collect()
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            great_deal_ratio: default_great_deal_ratio(),
            destination_bonus: default_destination_bonus(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Shipped defaults
            .add_source(config::File::with_name("config/default").required(false))
            // Per-environment overrides, e.g. config/production.toml
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Machine-local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // FAREWATCH__SERVER__PORT=8080 sets server.port
            .add_source(config::Environment::with_prefix("FAREWATCH").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
