use std::cmp::Ordering;
use std::sync::Arc;

use farewatch_core::{CoreError, CoreResult, Deal, DealRepository, DealStatus};
use farewatch_store::app_config::DealsConfig;
use serde::Serialize;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Inserted,
    /// An equivalent deal is already stored; the candidate was dropped.
    Duplicate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealStats {
    pub total: usize,
    pub new_deals: usize,
    pub saved: usize,
    pub dismissed: usize,
    pub great_deals: usize,
    /// Whole pounds.
    pub avg_price: f64,
    pub best_deal: Option<Deal>,
}

/// Bounded, deduplicated deal collection, most recent first.
///
/// Memory is authoritative. Every mutation rewrites the repository; a failed
/// write is logged and the in-memory state is kept.
pub struct DealStore {
    deals: Vec<Deal>,
    repo: Arc<dyn DealRepository>,
    config: DealsConfig,
}

impl DealStore {
    /// Load persisted deals, starting empty if they cannot be read.
    pub async fn open(repo: Arc<dyn DealRepository>, config: DealsConfig) -> Self {
        let mut deals = match repo.load_deals().await {
            Ok(Some(deals)) => deals,
            Ok(None) => Vec::new(),
            Err(e) => {
                error!("Failed to load deals, starting empty: {}", e);
                Vec::new()
            }
        };
        deals.truncate(config.capacity);
        info!("Loaded {} discovered deals", deals.len());

        Self { deals, repo, config }
    }

    /// Insert unless an equivalent deal exists, evicting the oldest past capacity.
    pub async fn submit(&mut self, candidate: Deal) -> SubmitOutcome {
        let tolerance = self.config.duplicate_price_tolerance;
        if let Some(existing) = self.deals.iter().find(|d| d.is_duplicate_of(&candidate, tolerance)) {
            debug!(
                "Dropping duplicate of {} ({} -> {} on {}, £{:.0})",
                existing.id, candidate.origin, candidate.destination_code, candidate.departure_date, candidate.price
            );
            return SubmitOutcome::Duplicate;
        }

        self.deals.insert(0, candidate);
        if self.deals.len() > self.config.capacity {
            let evicted = self.deals.len() - self.config.capacity;
            self.deals.truncate(self.config.capacity);
            debug!("Evicted {} oldest deal(s)", evicted);
        }

        self.persist().await;
        SubmitOutcome::Inserted
    }

    /// Manual entry: validate first, then the same path as discovered deals.
    pub async fn import(&mut self, deal: Deal) -> CoreResult<SubmitOutcome> {
        validate_manual(&deal)?;
        Ok(self.submit(deal).await)
    }

    /// `false` if no deal has this id.
    pub async fn update_status(&mut self, id: &str, status: DealStatus) -> bool {
        let Some(deal) = self.deals.iter_mut().find(|d| d.id == id) else {
            warn!("Status update for unknown deal {}", id);
            return false;
        };
        deal.set_status(status);
        self.persist().await;
        true
    }

    pub async fn clear(&mut self) {
        self.deals.clear();
        self.persist().await;
    }

    /// All deals ranked by score then price, or those with `status` in stored order.
    pub fn list(&self, status: Option<DealStatus>) -> Vec<Deal> {
        match status {
            Some(status) => self.deals.iter().filter(|d| d.status == status).cloned().collect(),
            None => {
                let mut deals = self.deals.clone();
                deals.sort_by(|a, b| {
                    b.deal_score
                        .cmp(&a.deal_score)
                        .then_with(|| a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal))
                });
                deals
            }
        }
    }

    /// Stored order, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &Deal> {
        self.deals.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Deal> {
        self.deals.iter().find(|d| d.id == id)
    }

    pub fn len(&self) -> usize {
        self.deals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deals.is_empty()
    }

    pub fn stats(&self) -> DealStats {
        let count = |status: DealStatus| self.deals.iter().filter(|d| d.status == status).count();
        let total = self.deals.len();
        let avg_price = if total == 0 {
            0.0
        } else {
            (self.deals.iter().map(|d| d.price).sum::<f64>() / total as f64).round()
        };

        // First encountered wins ties.
        let best_deal = self
            .deals
            .iter()
            .fold(None::<&Deal>, |best, d| match best {
                Some(b) if b.price <= d.price => Some(b),
                _ => Some(d),
            })
            .cloned();

        DealStats {
            total,
            new_deals: count(DealStatus::New),
            saved: count(DealStatus::Saved),
            dismissed: count(DealStatus::Dismissed),
            great_deals: self.deals.iter().filter(|d| d.is_great_deal).count(),
            avg_price,
            best_deal,
        }
    }

    async fn persist(&self) {
        if let Err(e) = self.repo.save_deals(&self.deals).await {
            error!("Failed to persist {} deals: {}", self.deals.len(), e);
        }
    }
}

fn validate_manual(deal: &Deal) -> CoreResult<()> {
    let is_airport = |code: &str| code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic());
    if !is_airport(&deal.origin) {
        return Err(CoreError::ValidationError(format!("invalid origin airport '{}'", deal.origin)));
    }
    if !is_airport(&deal.destination_code) {
        return Err(CoreError::ValidationError(format!(
            "invalid destination airport '{}'",
            deal.destination_code
        )));
    }
    if !deal.price.is_finite() || deal.price < 0.0 {
        return Err(CoreError::ValidationError(format!("invalid price {}", deal.price)));
    }
    if deal.return_date < deal.departure_date {
        return Err(CoreError::ValidationError("return date is before departure date".into()));
    }
    Ok(())
}
