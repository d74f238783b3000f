use async_trait::async_trait;
use farewatch_core::{Deal, DealRepository, RepositoryError};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;

use crate::json_file::JsonFile;

/// Deals persisted as one JSON array.
pub struct JsonDealRepository {
    file: JsonFile,
}

impl JsonDealRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { file: JsonFile::new(path) }
    }
}

#[async_trait]
impl DealRepository for JsonDealRepository {
    async fn load_deals(&self) -> Result<Option<Vec<Deal>>, RepositoryError> {
        Ok(self.file.read::<Vec<Deal>>().await?)
    }

    async fn save_deals(&self, deals: &[Deal]) -> Result<(), RepositoryError> {
        self.file.write(deals).await?;
        Ok(())
    }
}

/// In-process repository for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryDealRepository {
    deals: Mutex<Option<Vec<Deal>>>,
    saves: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryDealRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deals(deals: Vec<Deal>) -> Self {
        Self {
            deals: Mutex::new(Some(deals)),
            ..Self::default()
        }
    }

    /// Make subsequent loads fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent saves fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub async fn stored(&self) -> Option<Vec<Deal>> {
        self.deals.lock().await.clone()
    }
}

#[async_trait]
impl DealRepository for MemoryDealRepository {
    async fn load_deals(&self) -> Result<Option<Vec<Deal>>, RepositoryError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err("simulated read failure".into());
        }
        Ok(self.deals.lock().await.clone())
    }

    async fn save_deals(&self, deals: &[Deal]) -> Result<(), RepositoryError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err("simulated write failure".into());
        }
        *self.deals.lock().await = Some(deals.to_vec());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use farewatch_core::DealStatus;

    fn deal(id: &str) -> Deal {
        Deal {
            id: id.to_string(),
            timestamp: Utc::now(),
            destination: "Malta".into(),
            origin: "LGW".into(),
            destination_code: "MLA".into(),
            price: 1400.0,
            currency: "GBP".into(),
            airline: "Emirates".into(),
            departure_date: NaiveDate::from_ymd_opt(2025, 8, 4).unwrap(),
            return_date: NaiveDate::from_ymd_opt(2025, 8, 9).unwrap(),
            duration: "5 days".into(),
            budget: 2100,
            savings: 700.0,
            passengers: "2 adults + 2 children".into(),
            flight_details: None,
            hotel: None,
            status: DealStatus::New,
            is_great_deal: true,
            deal_score: 4,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_json_repository_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonDealRepository::new(dir.path().join("deals.json"));

        assert!(repo.load_deals().await.unwrap().is_none());

        repo.save_deals(&[deal("deal-1"), deal("deal-2")]).await.unwrap();
        let loaded = repo.load_deals().await.unwrap().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, "deal-1");
    }

    #[tokio::test]
    async fn test_memory_repository_failure_switches() {
        let repo = MemoryDealRepository::with_deals(vec![deal("deal-1")]);

        repo.fail_writes(true);
        assert!(repo.save_deals(&[]).await.is_err());
        assert_eq!(repo.save_count(), 0);

        repo.fail_reads(true);
        assert!(repo.load_deals().await.is_err());
    }
}
