pub mod scoring;
pub mod planner;

pub use farewatch_store::app_config::ScoringConfig;
pub use planner::SearchPlanner;
pub use scoring::DealScorer;
