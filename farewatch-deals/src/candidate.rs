use chrono::{NaiveDate, Utc};
use farewatch_catalog::DealScorer;
use farewatch_core::{Deal, DealStatus, FlightSnapshot, HotelSnapshot, Itinerary, SearchRequest};
use rand::Rng;
use serde::Deserialize;

const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Turn the cheapest itinerary for a request into a new deal.
///
/// `None` when the price is over the request budget. A price equal to the
/// budget still qualifies.
pub fn build_deal(request: &SearchRequest, itinerary: &Itinerary, scorer: &DealScorer) -> Option<Deal> {
    let price = itinerary.price();
    if price > request.budget as f64 {
        return None;
    }

    let now = Utc::now();
    let days = (request.return_date - request.departure_date).num_days().abs();

    Some(Deal {
        id: deal_id(now.timestamp_millis()),
        timestamp: now,
        destination: request.destination_name.clone(),
        origin: request.origin.clone(),
        destination_code: request.destination.clone(),
        price,
        currency: itinerary.currency().to_string(),
        airline: itinerary.airline().to_string(),
        departure_date: request.departure_date,
        return_date: request.return_date,
        duration: format!("{} days", days),
        budget: request.budget,
        savings: scorer.savings(price, request.budget),
        passengers: format!("{} adults + {} children", request.adults, request.children),
        flight_details: Some(FlightSnapshot::from_details(itinerary.flight(), itinerary.deep_link())),
        hotel: itinerary.hotel().map(HotelSnapshot::from),
        status: DealStatus::New,
        is_great_deal: scorer.is_great_deal(price, request.budget),
        deal_score: scorer.score(price, request.budget, &request.destination_name),
        updated_at: None,
    })
}

/// A deal entered by hand rather than found by the loop.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualDeal {
    pub origin: String,
    pub destination: String,
    pub destination_code: String,
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub airline: String,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    pub budget: u32,
    #[serde(default)]
    pub passengers: Option<String>,
}

fn default_currency() -> String {
    farewatch_core::search::DEFAULT_CURRENCY.to_string()
}

impl ManualDeal {
    /// Scored like a discovered deal. Validation happens on import.
    pub fn into_deal(self, scorer: &DealScorer) -> Deal {
        let now = Utc::now();
        let days = (self.return_date - self.departure_date).num_days().abs();
        let origin = self.origin.trim().to_uppercase();
        let destination_code = self.destination_code.trim().to_uppercase();

        Deal {
            id: deal_id(now.timestamp_millis()),
            timestamp: now,
            savings: scorer.savings(self.price, self.budget),
            is_great_deal: scorer.is_great_deal(self.price, self.budget),
            deal_score: scorer.score(self.price, self.budget, &self.destination),
            destination: self.destination,
            origin,
            destination_code,
            price: self.price,
            currency: self.currency,
            airline: self.airline,
            departure_date: self.departure_date,
            return_date: self.return_date,
            duration: format!("{} days", days),
            budget: self.budget,
            passengers: self.passengers.unwrap_or_default(),
            flight_details: None,
            hotel: None,
            status: DealStatus::New,
            updated_at: None,
        }
    }
}

/// `deal-{unix millis}-{9 base36 chars}`
fn deal_id(millis: i64) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("deal-{}-{}", millis, suffix)
}
