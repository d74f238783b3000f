use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};

use crate::provider::ProviderError;

pub const DEFAULT_CURRENCY: &str = "GBP";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CabinClass {
    #[default]
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl CabinClass {
    /// Fare multiplier relative to economy.
    pub fn fare_multiplier(&self) -> f64 {
        match self {
            CabinClass::Economy => 1.0,
            CabinClass::PremiumEconomy => 1.5,
            CabinClass::Business => 3.0,
            CabinClass::First => 5.0,
        }
    }
}

/// One concrete query produced by the planner. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// `auto-{destination key}-{origin}-{departure date}`
    pub id: String,
    /// Human label, e.g. "Cyprus from LHR".
    pub name: String,
    pub origin: String,
    pub destination: String,
    pub destination_name: String,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
    pub rooms: u32,
    pub cabin_class: CabinClass,
    pub include_packages: bool,
    /// Whole-party budget in GBP.
    pub budget: u32,
}

impl SearchRequest {
    pub fn query(&self) -> SearchQuery {
        SearchQuery::from(self)
    }

    pub fn passenger_count(&self) -> u32 {
        self.adults + self.children + self.infants
    }
}

/// Parameters handed to a [`crate::SearchProvider`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
    pub rooms: u32,
    pub cabin_class: CabinClass,
    pub include_packages: bool,
}

impl From<&SearchRequest> for SearchQuery {
    fn from(req: &SearchRequest) -> Self {
        Self {
            origin: req.origin.clone(),
            destination: req.destination.clone(),
            departure_date: req.departure_date,
            return_date: Some(req.return_date),
            adults: req.adults,
            children: req.children,
            infants: req.infants,
            rooms: req.rooms,
            cabin_class: req.cabin_class,
            include_packages: req.include_packages,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightDetails {
    pub airline: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    /// Minutes.
    pub duration: u32,
    pub stops: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelDetails {
    pub name: String,
    pub rating: u8,
    pub price_per_night: f64,
    pub location: String,
}

/// A priced result returned by a search provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Itinerary {
    #[serde(rename_all = "camelCase")]
    Flight {
        price: f64,
        currency: String,
        flight: FlightDetails,
        deep_link: String,
    },
    #[serde(rename_all = "camelCase")]
    Package {
        price: f64,
        currency: String,
        flight: FlightDetails,
        hotel: HotelDetails,
        deep_link: String,
        provider: String,
    },
}

impl Itinerary {
    pub fn price(&self) -> f64 {
        match self {
            Itinerary::Flight { price, .. } | Itinerary::Package { price, .. } => *price,
        }
    }

    pub fn currency(&self) -> &str {
        match self {
            Itinerary::Flight { currency, .. } | Itinerary::Package { currency, .. } => currency,
        }
    }

    pub fn flight(&self) -> &FlightDetails {
        match self {
            Itinerary::Flight { flight, .. } | Itinerary::Package { flight, .. } => flight,
        }
    }

    pub fn airline(&self) -> &str {
        &self.flight().airline
    }

    pub fn deep_link(&self) -> &str {
        match self {
            Itinerary::Flight { deep_link, .. } | Itinerary::Package { deep_link, .. } => deep_link,
        }
    }

    pub fn hotel(&self) -> Option<&HotelDetails> {
        match self {
            Itinerary::Flight { .. } => None,
            Itinerary::Package { hotel, .. } => Some(hotel),
        }
    }

    /// Guard against provider payloads that cannot be priced.
    pub fn validate(&self) -> Result<(), ProviderError> {
        let price = self.price();
        if !price.is_finite() || price < 0.0 {
            return Err(ProviderError::MalformedResponse(format!("invalid price {}", price)));
        }
        if self.airline().trim().is_empty() {
            return Err(ProviderError::MalformedResponse("missing airline".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_itinerary_is_tagged_by_kind() {
        let json = r#"
            {
                "type": "package",
                "price": 1850.5,
                "currency": "GBP",
                "flight": {
                    "airline": "Emirates",
                    "departureTime": "2025-08-22T08:00:00Z",
                    "arrivalTime": "2025-08-22T14:30:00Z",
                    "duration": 390,
                    "stops": 0
                },
                "hotel": {
                    "name": "Ocean View Hotel",
                    "rating": 4,
                    "pricePerNight": 180.0,
                    "location": "Beach Area"
                },
                "deepLink": "https://example.com/book-package-0",
                "provider": "Expedia"
            }
        "#;
        let itinerary: Itinerary = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(itinerary.price(), 1850.5);
        assert_eq!(itinerary.airline(), "Emirates");
        assert_eq!(itinerary.hotel().map(|h| h.rating), Some(4));
        assert!(itinerary.validate().is_ok());
    }

    #[test]
    fn test_negative_price_is_malformed() {
        let itinerary = Itinerary::Flight {
            price: -1.0,
            currency: DEFAULT_CURRENCY.into(),
            flight: FlightDetails {
                airline: "British Airways".into(),
                departure_time: Utc::now(),
                arrival_time: Utc::now(),
                duration: 300,
                stops: 0,
            },
            deep_link: "#".into(),
        };
        assert!(matches!(itinerary.validate(), Err(ProviderError::MalformedResponse(_))));
    }
}
