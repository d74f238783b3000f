use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Utc;
use farewatch_catalog::{DealScorer, SearchPlanner};
use farewatch_core::{CoreResult, DealStatus, SearchProvider, SearchRequest, Settings, SettingsRepository};
use farewatch_deals::DealStore;
use farewatch_shared::{DealStatusChangedEvent, DiscoveryEvent};
use tokio::sync::{broadcast, RwLock};
use tracing::{error, info, warn};

const EVENT_BUFFER: usize = 256;

/// Everything the discovery loop and the HTTP layer share, created once per process.
pub struct DiscoveryContext {
    settings: RwLock<Settings>,
    plan: RwLock<Arc<Vec<SearchRequest>>>,
    generation: AtomicU64,
    plan_len: AtomicUsize,
    deals: RwLock<DealStore>,
    provider: Arc<dyn SearchProvider>,
    planner: SearchPlanner,
    scorer: DealScorer,
    settings_repo: Arc<dyn SettingsRepository>,
    events: broadcast::Sender<DiscoveryEvent>,
}

impl DiscoveryContext {
    /// Load persisted settings (defaults if missing, unreadable or invalid) and plan the searches.
    pub async fn bootstrap(
        settings_repo: Arc<dyn SettingsRepository>,
        deals: DealStore,
        provider: Arc<dyn SearchProvider>,
        planner: SearchPlanner,
        scorer: DealScorer,
    ) -> Self {
        let stored = match settings_repo.load_settings().await {
            Ok(stored) => stored,
            Err(e) => {
                error!("Failed to load discovery settings, using defaults: {}", e);
                None
            }
        };

        let (settings, plan) = match stored.map(|s| s.normalized()) {
            Some(settings) => match planner.generate(&settings) {
                Ok(plan) => (settings, plan),
                Err(e) => {
                    warn!("Stored discovery settings rejected, using defaults: {}", e);
                    default_plan(&planner)
                }
            },
            None => default_plan(&planner),
        };
        info!("Planned {} searches", plan.len());

        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            settings: RwLock::new(settings),
            plan_len: AtomicUsize::new(plan.len()),
            plan: RwLock::new(Arc::new(plan)),
            generation: AtomicU64::new(0),
            deals: RwLock::new(deals),
            provider,
            planner,
            scorer,
            settings_repo,
            events,
        }
    }

    pub async fn settings(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Validate, persist and re-plan. Returns the number of planned searches.
    ///
    /// A running loop picks up the new plan from its first request.
    pub async fn update_settings(&self, settings: Settings) -> CoreResult<usize> {
        let settings = settings.normalized();
        let plan = self.planner.generate(&settings)?;

        if let Err(e) = self.settings_repo.save_settings(&settings).await {
            error!("Failed to persist discovery settings: {}", e);
        }

        let count = plan.len();
        info!(
            "Settings updated: {} adults + {} children, {} to {}, £{} per person, {} destinations from {}",
            settings.travelers.adults,
            settings.travelers.children,
            settings.dates.start_date,
            settings.dates.end_date,
            settings.budget.per_person,
            settings.destinations.len(),
            settings.airports.join(", ")
        );

        *self.settings.write().await = settings;
        *self.plan.write().await = Arc::new(plan);
        self.plan_len.store(count, Ordering::SeqCst);
        self.generation.fetch_add(1, Ordering::SeqCst);
        Ok(count)
    }

    /// Current plan and its generation, bumped on every settings update.
    pub async fn plan(&self) -> (u64, Arc<Vec<SearchRequest>>) {
        let plan = self.plan.read().await;
        (self.generation.load(Ordering::SeqCst), plan.clone())
    }

    /// Number of planned searches, readable without awaiting the plan lock.
    pub fn plan_len(&self) -> usize {
        self.plan_len.load(Ordering::SeqCst)
    }

    pub fn deals(&self) -> &RwLock<DealStore> {
        &self.deals
    }

    /// Status change plus a `deal_status_changed` event. `false` for an unknown id.
    pub async fn update_deal_status(&self, id: &str, status: DealStatus) -> bool {
        let updated = self.deals.write().await.update_status(id, status).await;
        if updated {
            self.publish(DiscoveryEvent::DealStatusChanged(DealStatusChangedEvent {
                deal_id: id.to_string(),
                status: status.to_string(),
                updated_at: Utc::now().timestamp(),
            }));
        }
        updated
    }

    pub fn provider(&self) -> &dyn SearchProvider {
        self.provider.as_ref()
    }

    pub fn scorer(&self) -> &DealScorer {
        &self.scorer
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DiscoveryEvent> {
        self.events.subscribe()
    }

    /// Fire and forget; nobody listening is fine.
    pub fn publish(&self, event: DiscoveryEvent) {
        let _ = self.events.send(event);
    }
}

fn default_plan(planner: &SearchPlanner) -> (Settings, Vec<SearchRequest>) {
    let settings = Settings::default();
    let plan = planner.generate(&settings).unwrap_or_default();
    (settings, plan)
}
