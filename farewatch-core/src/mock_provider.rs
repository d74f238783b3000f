use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::provider::{ProviderError, SearchProvider};
use crate::search::{FlightDetails, HotelDetails, Itinerary, SearchQuery, DEFAULT_CURRENCY};

const AIRLINES: [&str; 5] = [
    "British Airways",
    "Emirates",
    "Qatar Airways",
    "Virgin Atlantic",
    "Turkish Airlines",
];
const PACKAGE_PROVIDERS: [&str; 4] = ["Expedia", "Booking.com", "TravelCity", "PackageDeals"];
const RESULTS_PER_SEARCH: usize = 5;
const BASE_FARE_PER_PERSON: f64 = 280.0;
const PACKAGE_FARE_PER_ADULT: f64 = 450.0;
const HOTEL_RATE_PER_ROOM_NIGHT: f64 = 150.0;
const DEFAULT_HOTEL_RATING: u8 = 3;

/// Offline provider producing plausible GBP prices for families.
pub struct MockSearchProvider {
    rng: Mutex<StdRng>,
}

impl MockSearchProvider {
    pub fn new() -> Self {
        Self { rng: Mutex::new(StdRng::from_entropy()) }
    }

    /// Deterministic output for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self { rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }

    fn flights(&self, rng: &mut StdRng, query: &SearchQuery) -> Vec<Itinerary> {
        let passengers = (query.adults + query.children + query.infants).max(1) as f64;
        let base = BASE_FARE_PER_PERSON * query.cabin_class.fare_multiplier() * passengers;

        (0..RESULTS_PER_SEARCH)
            .map(|i| {
                let price = base + rng.gen_range(-100..100) as f64;
                Itinerary::Flight {
                    price,
                    currency: DEFAULT_CURRENCY.to_string(),
                    flight: random_flight(rng, query.departure_date, i),
                    deep_link: format!("https://example.com/book-flight-{}", i),
                }
            })
            .collect()
    }

    fn packages(&self, rng: &mut StdRng, query: &SearchQuery) -> Vec<Itinerary> {
        let nights = nights_between(query.departure_date, query.return_date);
        let (names, multiplier) = hotel_category(DEFAULT_HOTEL_RATING);
        let base_flight = PACKAGE_FARE_PER_ADULT * (query.adults as f64 + query.children as f64 * 0.75);
        let base_hotel = HOTEL_RATE_PER_ROOM_NIGHT * query.rooms.max(1) as f64 * nights as f64;

        (0..RESULTS_PER_SEARCH)
            .map(|i| {
                let flight_price = base_flight + rng.gen_range(-100..100) as f64;
                let hotel_price = base_hotel * multiplier + rng.gen_range(-150..150) as f64;
                let bundle_savings = rng.gen_range(50..250) as f64;
                let locations = hotel_locations(&query.destination);

                Itinerary::Package {
                    price: flight_price + hotel_price - bundle_savings,
                    currency: DEFAULT_CURRENCY.to_string(),
                    flight: random_flight(rng, query.departure_date, i),
                    hotel: HotelDetails {
                        name: names[rng.gen_range(0..names.len())].to_string(),
                        rating: DEFAULT_HOTEL_RATING,
                        price_per_night: (hotel_price / nights as f64).floor(),
                        location: locations[rng.gen_range(0..locations.len())].to_string(),
                    },
                    deep_link: format!("https://example.com/book-package-{}", i),
                    provider: PACKAGE_PROVIDERS[rng.gen_range(0..PACKAGE_PROVIDERS.len())].to_string(),
                }
            })
            .collect()
    }
}

impl Default for MockSearchProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchProvider for MockSearchProvider {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Itinerary>, ProviderError> {
        let mut rng = self.rng.lock()
            .map_err(|_| ProviderError::Unavailable("mock provider state poisoned".into()))?;

        let mut results = self.flights(&mut rng, query);
        if query.include_packages && query.return_date.is_some() {
            results.extend(self.packages(&mut rng, query));
        }

        results.sort_by(|a, b| a.price().partial_cmp(&b.price()).unwrap_or(std::cmp::Ordering::Equal));
        tracing::debug!(
            "Mock search {} -> {} on {}: {} results",
            query.origin, query.destination, query.departure_date, results.len()
        );
        Ok(results)
    }
}

fn random_flight(rng: &mut StdRng, date: NaiveDate, slot: usize) -> FlightDetails {
    let duration = 480 + rng.gen_range(0..240);
    let departure_time: DateTime<Utc> = date
        .and_time(NaiveTime::default())
        .and_utc()
        + Duration::hours(6 + 2 * slot as i64);

    FlightDetails {
        airline: AIRLINES[rng.gen_range(0..AIRLINES.len())].to_string(),
        departure_time,
        arrival_time: departure_time + Duration::minutes(duration as i64),
        duration,
        stops: rng.gen_range(0..3),
    }
}

fn nights_between(departure: NaiveDate, ret: Option<NaiveDate>) -> i64 {
    match ret {
        Some(ret) => (ret - departure).num_days().max(1),
        None => 7,
    }
}

fn hotel_category(rating: u8) -> (&'static [&'static str], f64) {
    match rating {
        5 => (&["Ultra Luxury Resort", "Presidential Ocean Villa", "Five Star Paradise"][..], 2.5),
        4 => (&["Grand Paradise Resort", "Luxury Ocean Hotel", "Premium Beach Resort"][..], 1.5),
        _ => (&["Paradise Resort", "Ocean View Hotel", "Beach Comfort Inn"][..], 1.0),
    }
}

fn hotel_locations(destination: &str) -> &'static [&'static str] {
    match destination {
        "LCA" => &["Larnaca Seafront", "Ayia Napa", "Protaras"][..],
        "TFS" => &["Playa de las Americas", "Los Cristianos", "Costa Adeje"][..],
        "AYT" => &["Lara Beach", "Konyaalti", "Old Town"][..],
        "HRG" => &["Sahl Hasheesh", "El Gouna", "Makadi Bay"][..],
        _ => &["City Center", "Beach Area", "Tourist District"][..],
    }
}
