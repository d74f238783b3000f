pub mod context;
pub mod engine;
pub mod progress;

pub use context::DiscoveryContext;
pub use engine::{DiscoveryLoop, SearchOutcome};
pub use progress::log_progress;
