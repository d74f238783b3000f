use std::sync::Arc;

use farewatch_discovery::{DiscoveryContext, DiscoveryLoop};

#[derive(Clone)]
pub struct AppState {
    pub discovery: Arc<DiscoveryLoop>,
}

impl AppState {
    pub fn new(discovery: DiscoveryLoop) -> Self {
        Self { discovery: Arc::new(discovery) }
    }

    pub fn ctx(&self) -> &Arc<DiscoveryContext> {
        self.discovery.context()
    }
}
