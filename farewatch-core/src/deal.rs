use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::search::{FlightDetails, HotelDetails, DEFAULT_CURRENCY};
use crate::CoreError;

/// Review state of a discovered deal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DealStatus {
    #[default]
    New,
    Saved,
    Dismissed,
}

impl DealStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DealStatus::New => "new",
            DealStatus::Saved => "saved",
            DealStatus::Dismissed => "dismissed",
        }
    }
}

impl fmt::Display for DealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DealStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" => Ok(DealStatus::New),
            "saved" => Ok(DealStatus::Saved),
            "dismissed" => Ok(DealStatus::Dismissed),
            other => Err(CoreError::ValidationError(format!("unknown deal status '{}'", other))),
        }
    }
}

/// Flight leg as seen at discovery time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSnapshot {
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    /// Minutes.
    pub duration: u32,
    pub stops: u32,
    pub deep_link: String,
}

impl FlightSnapshot {
    pub fn from_details(flight: &FlightDetails, deep_link: &str) -> Self {
        Self {
            departure_time: flight.departure_time,
            arrival_time: flight.arrival_time,
            duration: flight.duration,
            stops: flight.stops,
            deep_link: deep_link.to_string(),
        }
    }
}

/// Hotel half of a package deal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelSnapshot {
    pub name: String,
    pub rating: u8,
    pub price_per_night: f64,
    pub location: String,
}

impl From<&HotelDetails> for HotelSnapshot {
    fn from(hotel: &HotelDetails) -> Self {
        Self {
            name: hotel.name.clone(),
            rating: hotel.rating,
            price_per_night: hotel.price_per_night,
            location: hotel.location.clone(),
        }
    }
}

/// A budget-qualifying itinerary kept for review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// Display name, e.g. "Cyprus".
    pub destination: String,
    pub origin: String,
    pub destination_code: String,
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub airline: String,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    /// e.g. "7 days"
    pub duration: String,
    pub budget: u32,
    pub savings: f64,
    pub passengers: String,
    pub flight_details: Option<FlightSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotel: Option<HotelSnapshot>,
    #[serde(default)]
    pub status: DealStatus,
    #[serde(alias = "isGoodDeal")]
    pub is_great_deal: bool,
    pub deal_score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Deal {
    /// Same route and date, priced within `tolerance` of each other.
    pub fn is_duplicate_of(&self, other: &Deal, tolerance: f64) -> bool {
        self.origin == other.origin
            && self.destination_code == other.destination_code
            && self.departure_date == other.departure_date
            && (self.price - other.price).abs() < tolerance
    }

    pub fn set_status(&mut self, status: DealStatus) {
        self.status = status;
        self.updated_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing() {
        assert_eq!("Saved".parse::<DealStatus>().unwrap(), DealStatus::Saved);
        assert_eq!(DealStatus::Dismissed.to_string(), "dismissed");
        assert!("archived".parse::<DealStatus>().is_err());
    }

    #[test]
    fn test_reads_legacy_deal_record() {
        let json = r##"
            {
                "id": "deal-1722000000000-abc123xyz",
                "timestamp": "2025-07-26T10:00:00.000Z",
                "destination": "Cyprus",
                "origin": "LHR",
                "destinationCode": "LCA",
                "price": 1020,
                "airline": "Virgin Atlantic",
                "departureDate": "2025-08-22",
                "returnDate": "2025-08-29",
                "duration": "7 days",
                "budget": 2100,
                "savings": 1080,
                "passengers": "2 adults + 2 children",
                "flightDetails": {
                    "departureTime": "2025-08-22T07:00:00.000Z",
                    "arrivalTime": "2025-08-22T15:00:00.000Z",
                    "duration": 480,
                    "stops": 0,
                    "deepLink": "#"
                },
                "status": "new",
                "isGoodDeal": true,
                "dealScore": 7
            }
        "##;
        let deal: Deal = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(deal.currency, "GBP");
        assert!(deal.is_great_deal);
        assert_eq!(deal.deal_score, 7);
        assert_eq!(deal.status, DealStatus::New);

        let value = serde_json::to_value(&deal).unwrap();
        assert_eq!(value["isGreatDeal"], true);
        assert!(value.get("hotel").is_none());
    }
}
