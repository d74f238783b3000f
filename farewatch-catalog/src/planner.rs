use chrono::{Days, NaiveDate};
use farewatch_core::{CoreResult, DestinationCatalog, SearchRequest, Settings, TravelDates};
use tracing::warn;

/// Spacing between sampled departure dates.
pub const DATE_STEP_DAYS: u64 = 3;

/// Expands discovery settings into the ordered list of searches the loop cycles through.
#[derive(Debug, Clone, Default)]
pub struct SearchPlanner {
    catalog: DestinationCatalog,
}

impl SearchPlanner {
    pub fn new(catalog: DestinationCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &DestinationCatalog {
        &self.catalog
    }

    /// (departure, return) pairs every three days from the start date,
    /// keeping only trips that are back by the end date.
    pub fn date_windows(&self, dates: &TravelDates) -> Vec<(NaiveDate, NaiveDate)> {
        let mut windows = Vec::new();
        let trip = Days::new(dates.duration as u64);
        let mut departure = dates.start_date;

        while let Some(ret) = departure.checked_add_days(trip) {
            if ret > dates.end_date {
                break;
            }
            windows.push((departure, ret));
            match departure.checked_add_days(Days::new(DATE_STEP_DAYS)) {
                Some(next) => departure = next,
                None => break,
            }
        }
        windows
    }

    /// Airport-major, then destination, then date.
    pub fn generate(&self, settings: &Settings) -> CoreResult<Vec<SearchRequest>> {
        settings.validate()?;

        let windows = self.date_windows(&settings.dates);
        let budget = settings.total_budget();
        let include_packages = settings.include_packages();
        let mut requests = Vec::new();

        for airport in settings.airports.iter().map(|a| a.trim()).filter(|a| !a.is_empty()) {
            let origin = airport.to_uppercase();

            for key in settings.destinations.iter().map(|d| d.trim()).filter(|d| !d.is_empty()) {
                let Some(destination) = self.catalog.lookup(key) else {
                    warn!("Skipping unknown destination '{}'", key);
                    continue;
                };
                let key = key.to_lowercase();

                for (departure, ret) in &windows {
                    requests.push(SearchRequest {
                        id: format!("auto-{}-{}-{}", key, origin, departure),
                        name: format!("{} from {}", destination.name, origin),
                        origin: origin.clone(),
                        destination: destination.code.clone(),
                        destination_name: destination.name.clone(),
                        departure_date: *departure,
                        return_date: *ret,
                        adults: settings.travelers.adults,
                        children: settings.travelers.children,
                        infants: settings.travelers.infants,
                        rooms: settings.travelers.rooms,
                        cabin_class: settings.budget.cabin_class,
                        include_packages,
                        budget,
                    });
                }
            }
        }

        Ok(requests)
    }
}
