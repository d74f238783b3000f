use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use farewatch_core::{CoreResult, SearchRequest};
use farewatch_deals::{build_deal, SubmitOutcome};
use farewatch_shared::{DealDiscoveredEvent, DiscoveryEvent, DiscoveryStateEvent};
use farewatch_store::app_config::DiscoveryConfig;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::context::DiscoveryContext;

/// What one iteration of the loop did.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Settings produced no searches.
    NoPlan,
    NoResults,
    OverBudget { cheapest: f64, budget: u32 },
    Inserted { deal_id: String },
    Duplicate,
}

/// The single scheduler: one search at a time, round-robin over the plan.
///
/// Stopping is cooperative. A search already waiting on the provider
/// finishes before the task exits.
pub struct DiscoveryLoop {
    worker: Arc<Worker>,
    running: Mutex<Option<CancellationToken>>,
}

struct Worker {
    ctx: Arc<DiscoveryContext>,
    config: DiscoveryConfig,
    search_lock: tokio::sync::Mutex<()>,
}

impl DiscoveryLoop {
    pub fn new(ctx: Arc<DiscoveryContext>, config: DiscoveryConfig) -> Self {
        Self {
            worker: Arc::new(Worker {
                ctx,
                config,
                search_lock: tokio::sync::Mutex::new(()),
            }),
            running: Mutex::new(None),
        }
    }

    pub fn context(&self) -> &Arc<DiscoveryContext> {
        &self.worker.ctx
    }

    /// Spawn the loop. `false` if it was already running.
    pub fn start(&self) -> bool {
        let mut running = self.running.lock().unwrap_or_else(|e| e.into_inner());
        if running.is_some() {
            debug!("Discovery already running");
            return false;
        }

        let token = CancellationToken::new();
        *running = Some(token.clone());

        // Published under the lock so subscribers see state changes in call order.
        self.worker.announce(true);
        let worker = self.worker.clone();
        tokio::spawn(async move { worker.run(token).await });
        true
    }

    /// Signal the loop to stop. `false` if it was not running.
    pub fn stop(&self) -> bool {
        let mut running = self.running.lock().unwrap_or_else(|e| e.into_inner());
        match running.take() {
            Some(token) => {
                token.cancel();
                info!("Auto-discovery stopped");
                self.worker.announce(false);
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.lock().unwrap_or_else(|e| e.into_inner()).is_some()
    }

    /// One iteration against the request at `index` (wrapped to the plan length), without pacing.
    pub async fn search_once(&self, index: usize) -> CoreResult<SearchOutcome> {
        self.worker.search_once(index).await
    }
}

impl Worker {
    async fn run(self: Arc<Self>, token: CancellationToken) {
        let mut index = 0usize;
        let mut generation = None;

        let (_, plan) = self.ctx.plan().await;
        info!(
            "Auto-discovery started: {} searches, one every {:?}",
            plan.len(),
            self.config.search_interval()
        );

        while !token.is_cancelled() {
            let (current, plan) = self.ctx.plan().await;
            if generation != Some(current) {
                if generation.is_some() {
                    info!("Settings changed, restarting from the first of {} searches", plan.len());
                }
                generation = Some(current);
                index = 0;
            }

            let delay = match self.search_at(&plan, index).await {
                Ok(SearchOutcome::NoPlan) => {
                    warn!("No searches planned, check destinations and airports");
                    self.config.error_backoff()
                }
                Ok(outcome) => {
                    debug!("Search {}/{}: {:?}", index + 1, plan.len(), outcome);
                    index = (index + 1) % plan.len().max(1);
                    self.config.search_interval()
                }
                Err(e) => {
                    // Same index next time.
                    error!("Search {}/{} failed: {}", index + 1, plan.len(), e);
                    self.config.error_backoff()
                }
            };

            if !pause(&token, delay).await {
                break;
            }
        }

        debug!("Discovery task exited");
    }

    async fn search_once(&self, index: usize) -> CoreResult<SearchOutcome> {
        let (_, plan) = self.ctx.plan().await;
        self.search_at(&plan, index).await
    }

    async fn search_at(&self, plan: &[SearchRequest], index: usize) -> CoreResult<SearchOutcome> {
        let _guard = self.search_lock.lock().await;

        if plan.is_empty() {
            return Ok(SearchOutcome::NoPlan);
        }
        let request = &plan[index % plan.len()];
        debug!("Searching {} ({} to {})", request.name, request.departure_date, request.return_date);

        let itineraries = self.ctx.provider().search(&request.query()).await?;

        // Providers return cheapest first.
        let Some(cheapest) = itineraries.first() else {
            return Ok(SearchOutcome::NoResults);
        };
        cheapest.validate()?;

        let Some(deal) = build_deal(request, cheapest, self.ctx.scorer()) else {
            return Ok(SearchOutcome::OverBudget { cheapest: cheapest.price(), budget: request.budget });
        };

        let event = DealDiscoveredEvent {
            deal_id: deal.id.clone(),
            destination: deal.destination.clone(),
            origin: deal.origin.clone(),
            price: deal.price,
            savings: deal.savings,
            deal_score: deal.deal_score,
            is_great_deal: deal.is_great_deal,
            discovered_at: deal.timestamp.timestamp(),
        };
        let summary = format!("{} from {}: £{:.0} (save £{:.0})", deal.destination, deal.origin, deal.price, deal.savings);

        match self.ctx.deals().write().await.submit(deal).await {
            SubmitOutcome::Inserted => {
                info!("New deal: {}", summary);
                let deal_id = event.deal_id.clone();
                self.ctx.publish(DiscoveryEvent::DealDiscovered(event));
                Ok(SearchOutcome::Inserted { deal_id })
            }
            SubmitOutcome::Duplicate => Ok(SearchOutcome::Duplicate),
        }
    }

    fn announce(&self, running: bool) {
        self.ctx.publish(DiscoveryEvent::StateChanged(DiscoveryStateEvent {
            running,
            search_configs: self.ctx.plan_len(),
            timestamp: Utc::now().timestamp(),
        }));
    }
}

/// Sleep unless cancelled first. `false` if cancelled.
async fn pause(token: &CancellationToken, delay: Duration) -> bool {
    tokio::select! {
        _ = token.cancelled() => false,
        _ = tokio::time::sleep(delay) => true,
    }
}
