pub mod candidate;
pub mod store;

pub use candidate::{build_deal, ManualDeal};
pub use store::{DealStats, DealStore, SubmitOutcome};
