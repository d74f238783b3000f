pub mod models;

pub use models::events::{
    DealDiscoveredEvent, DealStatusChangedEvent, DiscoveryEvent, DiscoveryStateEvent,
};
