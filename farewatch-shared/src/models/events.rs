use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DealDiscoveredEvent {
    pub deal_id: String,
    pub destination: String,
    pub origin: String,
    pub price: f64,
    pub savings: f64,
    pub deal_score: u8,
    pub is_great_deal: bool,
    pub discovered_at: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DealStatusChangedEvent {
    pub deal_id: String,
    pub status: String,
    pub updated_at: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryStateEvent {
    pub running: bool,
    pub search_configs: usize,
    pub timestamp: i64,
}

/// Envelope broadcast to SSE subscribers.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum DiscoveryEvent {
    DealDiscovered(DealDiscoveredEvent),
    DealStatusChanged(DealStatusChangedEvent),
    StateChanged(DiscoveryStateEvent),
}

impl DiscoveryEvent {
    /// SSE event name for this payload.
    pub fn name(&self) -> &'static str {
        match self {
            DiscoveryEvent::DealDiscovered(_) => "deal_discovered",
            DiscoveryEvent::DealStatusChanged(_) => "deal_status_changed",
            DiscoveryEvent::StateChanged(_) => "state_changed",
        }
    }
}
