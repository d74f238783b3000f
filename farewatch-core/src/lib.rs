pub mod settings;
pub mod search;
pub mod deal;
pub mod destinations;
pub mod provider;
pub mod mock_provider;
pub mod repository;

pub use deal::{Deal, DealStatus, FlightSnapshot, HotelSnapshot};
pub use destinations::{Destination, DestinationCatalog};
pub use mock_provider::MockSearchProvider;
pub use provider::{ProviderError, SearchProvider};
pub use repository::{DealRepository, RepositoryError, SettingsRepository};
pub use search::{CabinClass, FlightDetails, HotelDetails, Itinerary, SearchQuery, SearchRequest};
pub use settings::{BudgetSettings, SearchType, Settings, TravelDates, Travelers};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Search provider error: {0}")]
    ProviderError(#[from] ProviderError),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
