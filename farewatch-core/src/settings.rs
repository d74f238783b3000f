use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::search::CabinClass;
use crate::{CoreError, CoreResult};

/// Children travel at this fraction of the per-person budget.
pub const CHILD_BUDGET_FACTOR: f64 = 0.75;

/// Process-wide discovery settings, persisted as one JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub travelers: Travelers,
    pub dates: TravelDates,
    pub budget: BudgetSettings,
    pub destinations: Vec<String>,
    pub airports: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Travelers {
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
    #[serde(default)]
    pub infants: u32,
    #[serde(default = "default_rooms")]
    pub rooms: u32,
}

fn default_rooms() -> u32 { 1 }

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelDates {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Trip length in days.
    pub duration: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSettings {
    pub per_person: f64,
    #[serde(default)]
    pub cabin_class: CabinClass,
    #[serde(default)]
    pub search_type: SearchType,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    #[default]
    Flights,
    Packages,
}

impl Settings {
    /// Reject settings the planner cannot expand.
    pub fn validate(&self) -> CoreResult<()> {
        if self.airports.iter().all(|a| a.trim().is_empty()) {
            return Err(CoreError::ValidationError("at least one origin airport is required".into()));
        }
        if self.destinations.iter().all(|d| d.trim().is_empty()) {
            return Err(CoreError::ValidationError("at least one destination is required".into()));
        }
        if self.dates.duration < 1 {
            return Err(CoreError::ValidationError("trip duration must be at least 1 day".into()));
        }
        if self.dates.start_date > self.dates.end_date {
            return Err(CoreError::ValidationError(format!(
                "start date {} is after end date {}",
                self.dates.start_date, self.dates.end_date
            )));
        }
        if self.travelers.adults < 1 {
            return Err(CoreError::ValidationError("at least one adult traveler is required".into()));
        }
        if !self.budget.per_person.is_finite() || self.budget.per_person < 0.0 {
            return Err(CoreError::ValidationError("per-person budget must be a non-negative amount".into()));
        }
        Ok(())
    }

    /// Upper-case airport codes, lower-case destination keys and drop blanks.
    pub fn normalized(mut self) -> Self {
        self.airports = self.airports
            .iter()
            .map(|a| a.trim().to_uppercase())
            .filter(|a| !a.is_empty())
            .collect();
        self.destinations = self.destinations
            .iter()
            .map(|d| d.trim().to_lowercase())
            .filter(|d| !d.is_empty())
            .collect();
        self
    }

    /// Whole-party budget: adults at full rate, children at 75%, rounded.
    pub fn total_budget(&self) -> u32 {
        let per_person = self.budget.per_person;
        let total = self.travelers.adults as f64 * per_person
            + self.travelers.children as f64 * per_person * CHILD_BUDGET_FACTOR;
        total.round().max(0.0) as u32
    }

    pub fn include_packages(&self) -> bool {
        self.budget.search_type == SearchType::Packages
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            travelers: Travelers {
                adults: 2,
                children: 2,
                infants: 0,
                rooms: 2,
            },
            dates: TravelDates {
                start_date: NaiveDate::from_ymd_opt(2025, 8, 1).expect("valid calendar date"),
                end_date: NaiveDate::from_ymd_opt(2025, 8, 31).expect("valid calendar date"),
                duration: 5,
            },
            budget: BudgetSettings {
                per_person: 600.0,
                cabin_class: CabinClass::Economy,
                search_type: SearchType::Flights,
            },
            destinations: [
                "cyprus", "malta", "crete", "athens", "tenerife", "grancanaria",
                "lanzarote", "antalya", "istanbul", "morocco", "egypt",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            airports: ["LHR", "LGW", "MAN"].iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family(per_person: f64) -> Settings {
        let mut settings = Settings::default();
        settings.budget.per_person = per_person;
        settings
    }

    #[test]
    fn test_total_budget_counts_children_at_three_quarters() {
        assert_eq!(family(600.0).total_budget(), 2100);

        let mut settings = family(333.0);
        settings.travelers.children = 1;
        // 2 * 333 + 249.75 = 915.75
        assert_eq!(settings.total_budget(), 916);
    }

    #[test]
    fn test_default_settings_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_settings() {
        let mut settings = Settings::default();
        settings.airports.clear();
        assert!(matches!(settings.validate(), Err(CoreError::ValidationError(_))));

        let mut settings = Settings::default();
        settings.destinations = vec!["  ".into()];
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.dates.duration = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.dates.start_date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.budget.per_person = f64::NAN;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_settings_json_shape() {
        let json = r#"
            {
                "travelers": { "adults": 2, "children": 1 },
                "dates": { "startDate": "2025-08-01", "endDate": "2025-08-20", "duration": 7 },
                "budget": { "perPerson": 500, "cabinClass": "premium_economy", "searchType": "packages" },
                "destinations": ["Cyprus", " malta "],
                "airports": ["lhr"]
            }
        "#;
        let settings: Settings = serde_json::from_str(json).expect("Failed to deserialize");
        let settings = settings.normalized();

        assert_eq!(settings.travelers.rooms, 1);
        assert_eq!(settings.budget.cabin_class, CabinClass::PremiumEconomy);
        assert!(settings.include_packages());
        assert_eq!(settings.destinations, vec!["cyprus", "malta"]);
        assert_eq!(settings.airports, vec!["LHR"]);
    }
}
